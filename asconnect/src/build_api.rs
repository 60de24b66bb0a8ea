// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Builds and who may test them.

use {
    crate::{
        app_api::AppResponse,
        app_encryption_api::AppEncryptionDeclarationResponse,
        beta_localization_api::BetaBuildLocalizationsResponse,
        beta_review_api::BetaAppReviewSubmissionResponse,
        beta_tester_api::BetaTestersResponse,
        build_beta_detail_api::BuildBetaDetailResponse,
        pre_release_version_api::PreReleaseVersionResponse,
        query::PageQuery,
        resource::{
            Document, Documents, LinkageDocument, LinkagesDocument, Relationship, Relationships,
            Request,
        },
        value::deserialize_optional_datetime,
        Result, TestFlight,
    },
    chrono::{DateTime, FixedOffset},
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingState {
    Processing,
    Failed,
    Invalid,
    Valid,
    /// A state this crate does not know about.
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildAttributes {
    pub version: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub uploaded_date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub expiration_date: Option<DateTime<FixedOffset>>,
    pub expired: Option<bool>,
    pub min_os_version: Option<String>,
    pub processing_state: Option<ProcessingState>,
    pub uses_non_exempt_encryption: Option<bool>,
}

pub type BuildResponse = Document<BuildAttributes>;
pub type BuildsResponse = Documents<BuildAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses_non_exempt_encryption: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildFields {
    pub builds: Vec<String>,
    pub apps: Vec<String>,
    pub beta_testers: Vec<String>,
    pub pre_release_versions: Vec<String>,
}

/// Filters for [ListBuildsQuery].
///
/// `app` and `pre_release_version` take resource IDs. `expired` takes `true` or `false`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildFilter {
    pub app: Vec<String>,
    pub expired: Vec<String>,
    pub id: Vec<String>,
    pub pre_release_version: Vec<String>,
    pub processing_state: Vec<ProcessingState>,
    pub version: Vec<String>,
    #[serde(rename = "preReleaseVersion.version")]
    pub pre_release_version_version: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRelatedLimits {
    pub individual_testers: Option<u32>,
    pub beta_build_localizations: Option<u32>,
}

/// Query for [TestFlight::list_builds].
///
/// `sort` accepts `version`, `uploadedDate`, `preReleaseVersion`, each
/// optionally prefixed by `-`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBuildsQuery {
    pub fields: BuildFields,
    pub filter: BuildFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub limit_field: BuildRelatedLimits,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadBuildQuery {
    pub fields: BuildFields,
    pub include: Vec<String>,
    pub limit_field: BuildRelatedLimits,
}

const BUILDS: &str = "/builds";

impl TestFlight {
    pub async fn list_builds(&self, query: &ListBuildsQuery) -> Result<BuildsResponse> {
        self.api.get_json(BUILDS, Some(query)).await
    }

    pub async fn get_build(&self, id: &str, query: &ReadBuildQuery) -> Result<BuildResponse> {
        self.api
            .get_json(&format!("{BUILDS}/{id}"), Some(query))
            .await
    }

    /// Expire a build or record its encryption usage.
    pub async fn modify_build(
        &self,
        id: &str,
        attributes: BuildUpdateAttributes,
    ) -> Result<BuildResponse> {
        let body: Request<_> = Request::update("builds", id, attributes);

        self.api
            .send_json(Method::PATCH, &format!("{BUILDS}/{id}"), &body)
            .await
    }

    pub async fn get_build_app(&self, id: &str) -> Result<AppResponse> {
        self.api
            .get_json::<_, ()>(&format!("{BUILDS}/{id}/app"), None)
            .await
    }

    pub async fn get_build_app_id(&self, id: &str) -> Result<LinkageDocument> {
        self.get_build_linkage(id, "app").await
    }

    pub async fn get_build_pre_release_version(
        &self,
        id: &str,
    ) -> Result<PreReleaseVersionResponse> {
        self.api
            .get_json::<_, ()>(&format!("{BUILDS}/{id}/preReleaseVersion"), None)
            .await
    }

    pub async fn get_build_pre_release_version_id(&self, id: &str) -> Result<LinkageDocument> {
        self.get_build_linkage(id, "preReleaseVersion").await
    }

    pub async fn get_build_beta_app_review_submission(
        &self,
        id: &str,
    ) -> Result<BetaAppReviewSubmissionResponse> {
        self.api
            .get_json::<_, ()>(&format!("{BUILDS}/{id}/betaAppReviewSubmission"), None)
            .await
    }

    pub async fn get_build_beta_app_review_submission_id(
        &self,
        id: &str,
    ) -> Result<LinkageDocument> {
        self.get_build_linkage(id, "betaAppReviewSubmission").await
    }

    pub async fn get_build_build_beta_detail(&self, id: &str) -> Result<BuildBetaDetailResponse> {
        self.api
            .get_json::<_, ()>(&format!("{BUILDS}/{id}/buildBetaDetail"), None)
            .await
    }

    pub async fn get_build_build_beta_detail_id(&self, id: &str) -> Result<LinkageDocument> {
        self.get_build_linkage(id, "buildBetaDetail").await
    }

    pub async fn get_build_app_encryption_declaration(
        &self,
        id: &str,
    ) -> Result<AppEncryptionDeclarationResponse> {
        self.api
            .get_json::<_, ()>(&format!("{BUILDS}/{id}/appEncryptionDeclaration"), None)
            .await
    }

    pub async fn get_build_app_encryption_declaration_id(
        &self,
        id: &str,
    ) -> Result<LinkageDocument> {
        self.get_build_linkage(id, "appEncryptionDeclaration").await
    }

    /// Attach an export compliance declaration to a build.
    pub async fn assign_build_app_encryption_declaration(
        &self,
        id: &str,
        declaration_id: &str,
    ) -> Result<()> {
        let body = Relationship::new("appEncryptionDeclarations", declaration_id);

        self.api
            .send_void(
                Method::PATCH,
                &format!("{BUILDS}/{id}/relationships/appEncryptionDeclaration"),
                Some(&body),
            )
            .await
    }

    pub async fn list_build_beta_build_localizations(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<BetaBuildLocalizationsResponse> {
        self.api
            .get_json(
                &format!("{BUILDS}/{id}/betaBuildLocalizations"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn get_build_beta_build_localization_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{BUILDS}/{id}/relationships/betaBuildLocalizations"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn add_build_beta_groups(&self, id: &str, group_ids: &[String]) -> Result<()> {
        self.modify_build_linkages(Method::POST, id, "betaGroups", group_ids)
            .await
    }

    pub async fn remove_build_beta_groups(&self, id: &str, group_ids: &[String]) -> Result<()> {
        self.modify_build_linkages(Method::DELETE, id, "betaGroups", group_ids)
            .await
    }

    /// Give testers access to a build outside of any group.
    pub async fn add_build_individual_testers(
        &self,
        id: &str,
        tester_ids: &[String],
    ) -> Result<()> {
        self.modify_build_linkages(Method::POST, id, "individualTesters", tester_ids)
            .await
    }

    pub async fn remove_build_individual_testers(
        &self,
        id: &str,
        tester_ids: &[String],
    ) -> Result<()> {
        self.modify_build_linkages(Method::DELETE, id, "individualTesters", tester_ids)
            .await
    }

    pub async fn list_build_individual_testers(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<BetaTestersResponse> {
        self.api
            .get_json(
                &format!("{BUILDS}/{id}/individualTesters"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn get_build_individual_tester_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{BUILDS}/{id}/relationships/individualTesters"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    async fn get_build_linkage(&self, id: &str, relationship: &str) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(&format!("{BUILDS}/{id}/relationships/{relationship}"), None)
            .await
    }

    async fn modify_build_linkages(
        &self,
        method: Method,
        id: &str,
        relationship: &str,
        ids: &[String],
    ) -> Result<()> {
        let linkage_type = match relationship {
            "individualTesters" => "betaTesters",
            other => other,
        };
        let body = Relationships::new(linkage_type, ids);

        self.api
            .send_void(
                method,
                &format!("{BUILDS}/{id}/relationships/{relationship}"),
                Some(&body),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::query::serialize_query, serde_json::json};

    #[test]
    fn list_query() {
        let query = ListBuildsQuery {
            filter: BuildFilter {
                app: vec!["123".into()],
                processing_state: vec![ProcessingState::Valid],
                pre_release_version_version: vec!["1.2".into()],
                ..Default::default()
            },
            limit: Some(1),
            sort: vec!["-uploadedDate".into()],
            ..Default::default()
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some(
                "filter[app]=123&filter[processingState]=VALID\
                 &filter[preReleaseVersion.version]=1.2&limit=1&sort=-uploadedDate"
            )
        );
    }

    #[test]
    fn parse_build() {
        let doc: BuildResponse = serde_json::from_value(json!({
            "data": {
                "id": "B1",
                "type": "builds",
                "attributes": {
                    "version": "42",
                    "uploadedDate": "2023-03-01T10:00:00-08:00",
                    "expired": false,
                    "processingState": "VALID",
                },
            },
        }))
        .unwrap();

        let attributes = doc.data.attributes.unwrap();
        assert_eq!(attributes.processing_state, Some(ProcessingState::Valid));
        assert_eq!(
            attributes.uploaded_date.unwrap().to_rfc3339(),
            "2023-03-01T10:00:00-08:00"
        );
    }

    #[test]
    fn update_body() {
        let body: Request<_> = Request::update(
            "builds",
            "B1",
            BuildUpdateAttributes {
                expired: Some(true),
                ..Default::default()
            },
        );

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"data": {"type": "builds", "id": "B1", "attributes": {"expired": true}}})
        );
    }

    #[test]
    fn unknown_processing_state() {
        let doc: BuildResponse = serde_json::from_value(json!({
            "data": {
                "id": "B2",
                "type": "builds",
                "attributes": {"processingState": "QUARANTINED"},
            },
        }))
        .unwrap();

        assert_eq!(
            doc.data.attributes.unwrap().processing_state,
            Some(ProcessingState::Unknown)
        );
    }
}
