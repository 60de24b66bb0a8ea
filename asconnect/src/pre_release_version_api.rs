// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Prerelease versions, the version trains that TestFlight builds belong to.

use {
    crate::{
        app_api::AppResponse,
        build_api::{BuildFields, BuildsResponse, ProcessingState},
        query::PageQuery,
        resource::{Document, Documents, LinkageDocument, LinkagesDocument},
        Result, TestFlight,
    },
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreReleaseVersionAttributes {
    pub version: Option<String>,
    /// `IOS`, `MAC_OS`, `TV_OS`, or platforms newer than this crate.
    pub platform: Option<String>,
}

pub type PreReleaseVersionResponse = Document<PreReleaseVersionAttributes>;
pub type PreReleaseVersionsResponse = Documents<PreReleaseVersionAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreReleaseVersionFields {
    pub apps: Vec<String>,
    pub builds: Vec<String>,
    pub pre_release_versions: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreReleaseVersionFilter {
    pub app: Vec<String>,
    pub builds: Vec<String>,
    #[serde(rename = "builds.expired")]
    pub builds_expired: Vec<String>,
    #[serde(rename = "builds.processingState")]
    pub builds_processing_state: Vec<ProcessingState>,
    pub platform: Vec<String>,
    pub version: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct PreReleaseVersionRelatedLimits {
    pub builds: Option<u32>,
}

/// Query for [TestFlight::list_pre_release_versions].
///
/// `include` accepts `app` and `builds`. `sort` accepts `version` or `-version`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPreReleaseVersionsQuery {
    pub fields: PreReleaseVersionFields,
    pub filter: PreReleaseVersionFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub limit_field: PreReleaseVersionRelatedLimits,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadPreReleaseVersionQuery {
    pub fields: PreReleaseVersionFields,
    pub include: Vec<String>,
    pub limit_field: PreReleaseVersionRelatedLimits,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListPreReleaseVersionBuildsQuery {
    pub fields: BuildFields,
    pub limit: Option<u32>,
}

const PRE_RELEASE_VERSIONS: &str = "/preReleaseVersions";

impl TestFlight {
    pub async fn list_pre_release_versions(
        &self,
        query: &ListPreReleaseVersionsQuery,
    ) -> Result<PreReleaseVersionsResponse> {
        self.api.get_json(PRE_RELEASE_VERSIONS, Some(query)).await
    }

    pub async fn get_pre_release_version(
        &self,
        id: &str,
        query: &ReadPreReleaseVersionQuery,
    ) -> Result<PreReleaseVersionResponse> {
        self.api
            .get_json(&format!("{PRE_RELEASE_VERSIONS}/{id}"), Some(query))
            .await
    }

    pub async fn get_pre_release_version_app(&self, id: &str) -> Result<AppResponse> {
        self.api
            .get_json::<_, ()>(&format!("{PRE_RELEASE_VERSIONS}/{id}/app"), None)
            .await
    }

    pub async fn get_pre_release_version_app_id(&self, id: &str) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(
                &format!("{PRE_RELEASE_VERSIONS}/{id}/relationships/app"),
                None,
            )
            .await
    }

    pub async fn list_pre_release_version_builds(
        &self,
        id: &str,
        query: &ListPreReleaseVersionBuildsQuery,
    ) -> Result<BuildsResponse> {
        self.api
            .get_json(&format!("{PRE_RELEASE_VERSIONS}/{id}/builds"), Some(query))
            .await
    }

    pub async fn get_pre_release_version_build_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{PRE_RELEASE_VERSIONS}/{id}/relationships/builds"),
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
        let query = ListPreReleaseVersionsQuery {
            filter: PreReleaseVersionFilter {
                app: vec!["123".into()],
                builds_processing_state: vec![ProcessingState::Processing],
                ..Default::default()
            },
            include: vec!["builds".into()],
            limit_field: PreReleaseVersionRelatedLimits { builds: Some(5) },
            sort: vec!["-version".into()],
            ..Default::default()
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some(
                "filter[app]=123&filter[builds.processingState]=PROCESSING\
                 &include=builds&limit[builds]=5&sort=-version"
            )
        );
    }

    #[test]
    fn parse_version() {
        let doc: PreReleaseVersionsResponse = serde_json::from_value(json!({
            "data": [{
                "id": "V1",
                "type": "preReleaseVersions",
                "attributes": {"version": "2.1", "platform": "VISION_OS"},
            }],
        }))
        .unwrap();

        let attributes = doc.data[0].attributes.as_ref().unwrap();
        assert_eq!(attributes.version.as_deref(), Some("2.1"));
        assert_eq!(attributes.platform.as_deref(), Some("VISION_OS"));
    }
}
