// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Beta license agreements shown to testers, one per app.

use {
    crate::{
        app_api::AppResponse,
        resource::{Document, Documents, LinkageDocument, Request},
        Result, TestFlight,
    },
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaLicenseAgreementAttributes {
    pub agreement_text: Option<String>,
}

pub type BetaLicenseAgreementResponse = Document<BetaLicenseAgreementAttributes>;
pub type BetaLicenseAgreementsResponse = Documents<BetaLicenseAgreementAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaLicenseAgreementUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreement_text: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaLicenseAgreementFields {
    pub apps: Vec<String>,
    pub beta_license_agreements: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BetaLicenseAgreementFilter {
    pub app: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListBetaLicenseAgreementsQuery {
    pub fields: BetaLicenseAgreementFields,
    pub filter: BetaLicenseAgreementFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReadBetaLicenseAgreementQuery {
    pub fields: BetaLicenseAgreementFields,
    pub include: Vec<String>,
}

const AGREEMENTS: &str = "/betaLicenseAgreements";

impl TestFlight {
    pub async fn list_beta_license_agreements(
        &self,
        query: &ListBetaLicenseAgreementsQuery,
    ) -> Result<BetaLicenseAgreementsResponse> {
        self.api.get_json(AGREEMENTS, Some(query)).await
    }

    pub async fn get_beta_license_agreement(
        &self,
        id: &str,
        query: &ReadBetaLicenseAgreementQuery,
    ) -> Result<BetaLicenseAgreementResponse> {
        self.api
            .get_json(&format!("{AGREEMENTS}/{id}"), Some(query))
            .await
    }

    pub async fn get_beta_license_agreement_app(&self, id: &str) -> Result<AppResponse> {
        self.api
            .get_json::<_, ()>(&format!("{AGREEMENTS}/{id}/app"), None)
            .await
    }

    pub async fn get_beta_license_agreement_app_id(&self, id: &str) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(&format!("{AGREEMENTS}/{id}/relationships/app"), None)
            .await
    }

    pub async fn modify_beta_license_agreement(
        &self,
        id: &str,
        agreement_text: impl ToString,
    ) -> Result<BetaLicenseAgreementResponse> {
        let body: Request<_> = Request::update(
            "betaLicenseAgreements",
            id,
            BetaLicenseAgreementUpdateAttributes {
                agreement_text: Some(agreement_text.to_string()),
            },
        );

        self.api
            .send_json(Method::PATCH, &format!("{AGREEMENTS}/{id}"), &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn parse_agreement() {
        let doc: BetaLicenseAgreementResponse = serde_json::from_value(json!({
            "data": {
                "id": "A1",
                "type": "betaLicenseAgreements",
                "attributes": {"agreementText": "Do not share."},
            },
        }))
        .unwrap();

        assert_eq!(
            doc.data.attributes.unwrap().agreement_text.as_deref(),
            Some("Do not share.")
        );
    }
}
