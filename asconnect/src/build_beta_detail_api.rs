// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-build TestFlight state and tester notifications.

use {
    crate::{
        build_api::BuildResponse,
        resource::{Document, Documents, LinkageDocument, Relationship, Request},
        Result, TestFlight,
    },
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildBetaDetailAttributes {
    /// Whether testers are notified automatically when the build becomes available.
    pub auto_notify_enabled: Option<bool>,
    /// E.g. `READY_FOR_BETA_TESTING`, `IN_BETA_TESTING`, `EXPIRED`.
    pub internal_build_state: Option<String>,
    /// E.g. `WAITING_FOR_BETA_REVIEW`, `BETA_APPROVED`, `BETA_REJECTED`.
    pub external_build_state: Option<String>,
}

pub type BuildBetaDetailResponse = Document<BuildBetaDetailAttributes>;
pub type BuildBetaDetailsResponse = Documents<BuildBetaDetailAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildBetaDetailUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_notify_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildBetaDetailFields {
    pub builds: Vec<String>,
    pub build_beta_details: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BuildBetaDetailFilter {
    pub build: Vec<String>,
    pub id: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListBuildBetaDetailsQuery {
    pub fields: BuildBetaDetailFields,
    pub filter: BuildBetaDetailFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReadBuildBetaDetailQuery {
    pub fields: BuildBetaDetailFields,
    pub include: Vec<String>,
}

/// A sent "new build available" notification. Carries no attributes.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BuildBetaNotificationAttributes {}

pub type BuildBetaNotificationResponse = Document<BuildBetaNotificationAttributes>;

#[derive(Clone, Debug, Serialize)]
pub struct BuildBetaNotificationCreateRelationships {
    pub build: Relationship,
}

const BUILD_BETA_DETAILS: &str = "/buildBetaDetails";

impl TestFlight {
    pub async fn list_build_beta_details(
        &self,
        query: &ListBuildBetaDetailsQuery,
    ) -> Result<BuildBetaDetailsResponse> {
        self.api.get_json(BUILD_BETA_DETAILS, Some(query)).await
    }

    pub async fn get_build_beta_detail(
        &self,
        id: &str,
        query: &ReadBuildBetaDetailQuery,
    ) -> Result<BuildBetaDetailResponse> {
        self.api
            .get_json(&format!("{BUILD_BETA_DETAILS}/{id}"), Some(query))
            .await
    }

    pub async fn get_build_beta_detail_build(&self, id: &str) -> Result<BuildResponse> {
        self.api
            .get_json::<_, ()>(&format!("{BUILD_BETA_DETAILS}/{id}/build"), None)
            .await
    }

    pub async fn get_build_beta_detail_build_id(&self, id: &str) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(
                &format!("{BUILD_BETA_DETAILS}/{id}/relationships/build"),
                None,
            )
            .await
    }

    pub async fn modify_build_beta_detail(
        &self,
        id: &str,
        attributes: BuildBetaDetailUpdateAttributes,
    ) -> Result<BuildBetaDetailResponse> {
        let body: Request<_> = Request::update("buildBetaDetails", id, attributes);

        self.api
            .send_json(Method::PATCH, &format!("{BUILD_BETA_DETAILS}/{id}"), &body)
            .await
    }

    /// Tell every assigned tester that a build is ready.
    ///
    /// Only needed when automatic notification is off for the build.
    pub async fn notify_build_testers(
        &self,
        build_id: &str,
    ) -> Result<BuildBetaNotificationResponse> {
        let body = Request::link(
            "buildBetaNotifications",
            BuildBetaNotificationCreateRelationships {
                build: Relationship::new("builds", build_id),
            },
        );

        self.api
            .send_json(Method::POST, "/buildBetaNotifications", &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn parse_detail() {
        let doc: BuildBetaDetailResponse = serde_json::from_value(json!({
            "data": {
                "id": "BD1",
                "type": "buildBetaDetails",
                "attributes": {
                    "autoNotifyEnabled": false,
                    "internalBuildState": "IN_BETA_TESTING",
                    "externalBuildState": "READY_FOR_BETA_SUBMISSION",
                },
            },
        }))
        .unwrap();

        let attributes = doc.data.attributes.unwrap();
        assert_eq!(attributes.auto_notify_enabled, Some(false));
        assert_eq!(
            attributes.external_build_state.as_deref(),
            Some("READY_FOR_BETA_SUBMISSION")
        );
    }

    #[test]
    fn parse_notification() {
        let doc: BuildBetaNotificationResponse = serde_json::from_value(json!({
            "data": {"id": "N1", "type": "buildBetaNotifications"},
            "links": {"self": "https://api.appstoreconnect.apple.com/v1/buildBetaNotifications"},
        }))
        .unwrap();

        assert_eq!(doc.data.id, "N1");
    }
}
