// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Apps as seen by TestFlight.

use {
    crate::{
        beta_group_api::BetaGroupsResponse,
        beta_license_agreement_api::BetaLicenseAgreementResponse,
        beta_localization_api::BetaAppLocalizationsResponse,
        beta_review_api::BetaAppReviewDetailResponse,
        build_api::{BuildFields, BuildsResponse},
        pre_release_version_api::PreReleaseVersionsResponse,
        query::PageQuery,
        resource::{Document, Documents, LinkageDocument, LinkagesDocument, Relationships},
        Result, TestFlight,
    },
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppAttributes {
    pub bundle_id: Option<String>,
    pub name: Option<String>,
    pub primary_locale: Option<String>,
    pub sku: Option<String>,
}

pub type AppResponse = Document<AppAttributes>;
pub type AppsResponse = Documents<AppAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFields {
    pub apps: Vec<String>,
    pub builds: Vec<String>,
    pub beta_groups: Vec<String>,
    pub pre_release_versions: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFilter {
    pub bundle_id: Vec<String>,
    pub id: Vec<String>,
    pub name: Vec<String>,
    pub sku: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRelatedLimits {
    pub beta_groups: Option<u32>,
    pub builds: Option<u32>,
    pub pre_release_versions: Option<u32>,
}

/// Query for [TestFlight::list_apps].
///
/// `sort` accepts `bundleId`, `name`, `sku`, each optionally prefixed by `-`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAppsQuery {
    pub fields: AppFields,
    pub filter: AppFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub limit_field: AppRelatedLimits,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadAppQuery {
    pub fields: AppFields,
    pub include: Vec<String>,
    pub limit_field: AppRelatedLimits,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListAppBuildsQuery {
    pub fields: BuildFields,
    pub limit: Option<u32>,
}

const APPS: &str = "/apps";

impl TestFlight {
    pub async fn list_apps(&self, query: &ListAppsQuery) -> Result<AppsResponse> {
        self.api.get_json(APPS, Some(query)).await
    }

    pub async fn get_app(&self, id: &str, query: &ReadAppQuery) -> Result<AppResponse> {
        self.api.get_json(&format!("{APPS}/{id}"), Some(query)).await
    }

    pub async fn list_app_builds(
        &self,
        id: &str,
        query: &ListAppBuildsQuery,
    ) -> Result<BuildsResponse> {
        self.api
            .get_json(&format!("{APPS}/{id}/builds"), Some(query))
            .await
    }

    pub async fn get_app_build_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.get_app_linkages(id, "builds", limit).await
    }

    pub async fn list_app_beta_groups(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<BetaGroupsResponse> {
        self.api
            .get_json(&format!("{APPS}/{id}/betaGroups"), Some(&PageQuery { limit }))
            .await
    }

    pub async fn get_app_beta_group_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.get_app_linkages(id, "betaGroups", limit).await
    }

    pub async fn list_app_pre_release_versions(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<PreReleaseVersionsResponse> {
        self.api
            .get_json(
                &format!("{APPS}/{id}/preReleaseVersions"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn get_app_pre_release_version_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.get_app_linkages(id, "preReleaseVersions", limit).await
    }

    pub async fn get_app_beta_app_review_detail(
        &self,
        id: &str,
    ) -> Result<BetaAppReviewDetailResponse> {
        self.api
            .get_json::<_, ()>(&format!("{APPS}/{id}/betaAppReviewDetail"), None)
            .await
    }

    pub async fn get_app_beta_app_review_detail_id(&self, id: &str) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(
                &format!("{APPS}/{id}/relationships/betaAppReviewDetail"),
                None,
            )
            .await
    }

    pub async fn get_app_beta_license_agreement(
        &self,
        id: &str,
    ) -> Result<BetaLicenseAgreementResponse> {
        self.api
            .get_json::<_, ()>(&format!("{APPS}/{id}/betaLicenseAgreement"), None)
            .await
    }

    pub async fn get_app_beta_license_agreement_id(&self, id: &str) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(
                &format!("{APPS}/{id}/relationships/betaLicenseAgreement"),
                None,
            )
            .await
    }

    pub async fn list_app_beta_app_localizations(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<BetaAppLocalizationsResponse> {
        self.api
            .get_json(
                &format!("{APPS}/{id}/betaAppLocalizations"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn get_app_beta_app_localization_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.get_app_linkages(id, "betaAppLocalizations", limit)
            .await
    }

    /// Remove testers from every group and build of an app.
    pub async fn remove_app_beta_testers(&self, id: &str, tester_ids: &[String]) -> Result<()> {
        let body = Relationships::new("betaTesters", tester_ids);

        self.api
            .send_void(
                Method::DELETE,
                &format!("{APPS}/{id}/relationships/betaTesters"),
                Some(&body),
            )
            .await
    }

    async fn get_app_linkages(
        &self,
        id: &str,
        relationship: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{APPS}/{id}/relationships/{relationship}"),
                Some(&PageQuery { limit }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::query::serialize_query, serde_json::json};

    #[test]
    fn list_query() {
        let query = ListAppsQuery {
            filter: AppFilter {
                bundle_id: vec!["com.example.app".into()],
                ..Default::default()
            },
            include: vec!["builds".into(), "betaGroups".into()],
            limit_field: AppRelatedLimits {
                builds: Some(10),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some(
                "filter[bundleId]=com.example.app&include=builds&include=betaGroups\
                 &limit[builds]=10"
            )
        );
    }

    #[test]
    fn parse_app() {
        let doc: AppsResponse = serde_json::from_value(json!({
            "data": [{
                "id": "1",
                "type": "apps",
                "attributes": {"bundleId": "com.example.app", "name": "Example", "sku": "EX"},
            }],
        }))
        .unwrap();

        let attributes = doc.data[0].attributes.as_ref().unwrap();
        assert_eq!(attributes.bundle_id.as_deref(), Some("com.example.app"));
        assert!(attributes.primary_locale.is_none());
    }
}
