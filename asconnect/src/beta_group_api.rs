// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! TestFlight beta groups.

use {
    crate::{
        app_api::AppResponse,
        beta_tester_api::BetaTestersResponse,
        build_api::BuildsResponse,
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

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaGroupAttributes {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_date: Option<DateTime<FixedOffset>>,
    pub is_internal_group: Option<bool>,
    pub public_link_enabled: Option<bool>,
    pub public_link_id: Option<String>,
    pub public_link_limit_enabled: Option<bool>,
    pub public_link_limit: Option<u32>,
    pub public_link: Option<String>,
    pub feedback_enabled: Option<bool>,
}

pub type BetaGroupResponse = Document<BetaGroupAttributes>;
pub type BetaGroupsResponse = Documents<BetaGroupAttributes>;

/// Attributes of a group being created or modified. Unset fields are left alone.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaGroupWriteAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_link_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_link_limit_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_link_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_enabled: Option<bool>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaGroupCreateRelationships {
    pub app: Relationship,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builds: Option<Relationships>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta_testers: Option<Relationships>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaGroupFields {
    pub beta_groups: Vec<String>,
    pub apps: Vec<String>,
    pub builds: Vec<String>,
    pub beta_testers: Vec<String>,
}

/// Filters for [ListBetaGroupsQuery]. `app` and `builds` take resource IDs.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaGroupFilter {
    pub app: Vec<String>,
    pub builds: Vec<String>,
    pub id: Vec<String>,
    pub is_internal_group: Vec<bool>,
    pub name: Vec<String>,
    pub public_link_enabled: Vec<bool>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaGroupRelatedLimits {
    pub beta_testers: Option<u32>,
    pub builds: Option<u32>,
}

/// Query for [TestFlight::list_beta_groups].
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBetaGroupsQuery {
    pub fields: BetaGroupFields,
    pub filter: BetaGroupFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub limit_field: BetaGroupRelatedLimits,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadBetaGroupQuery {
    pub fields: BetaGroupFields,
    pub include: Vec<String>,
    pub limit_field: BetaGroupRelatedLimits,
}

const BETA_GROUPS: &str = "/betaGroups";

impl TestFlight {
    /// Create a group for an app, optionally seeded with builds and testers.
    pub async fn create_beta_group(
        &self,
        app_id: &str,
        attributes: BetaGroupWriteAttributes,
        build_ids: Option<&[String]>,
        tester_ids: Option<&[String]>,
    ) -> Result<BetaGroupResponse> {
        let body = Request::create("betaGroups", attributes).with_relationships(
            BetaGroupCreateRelationships {
                app: Relationship::new("apps", app_id),
                builds: build_ids.map(|ids| Relationships::new("builds", ids)),
                beta_testers: tester_ids.map(|ids| Relationships::new("betaTesters", ids)),
            },
        );

        self.api.send_json(Method::POST, BETA_GROUPS, &body).await
    }

    pub async fn list_beta_groups(
        &self,
        query: &ListBetaGroupsQuery,
    ) -> Result<BetaGroupsResponse> {
        self.api.get_json(BETA_GROUPS, Some(query)).await
    }

    pub async fn get_beta_group(
        &self,
        id: &str,
        query: &ReadBetaGroupQuery,
    ) -> Result<BetaGroupResponse> {
        self.api
            .get_json(&format!("{BETA_GROUPS}/{id}"), Some(query))
            .await
    }

    pub async fn modify_beta_group(
        &self,
        id: &str,
        attributes: BetaGroupWriteAttributes,
    ) -> Result<BetaGroupResponse> {
        let body: Request<_> = Request::update("betaGroups", id, attributes);

        self.api
            .send_json(Method::PATCH, &format!("{BETA_GROUPS}/{id}"), &body)
            .await
    }

    pub async fn delete_beta_group(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(Method::DELETE, &format!("{BETA_GROUPS}/{id}"), None)
            .await
    }

    pub async fn get_beta_group_app(&self, id: &str) -> Result<AppResponse> {
        self.api
            .get_json::<_, ()>(&format!("{BETA_GROUPS}/{id}/app"), None)
            .await
    }

    pub async fn get_beta_group_app_id(&self, id: &str) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(&format!("{BETA_GROUPS}/{id}/relationships/app"), None)
            .await
    }

    pub async fn get_beta_group_tester_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{BETA_GROUPS}/{id}/relationships/betaTesters"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn get_beta_group_build_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{BETA_GROUPS}/{id}/relationships/builds"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn add_beta_group_testers(&self, id: &str, tester_ids: &[String]) -> Result<()> {
        self.modify_group_linkages(Method::POST, id, "betaTesters", tester_ids)
            .await
    }

    pub async fn remove_beta_group_testers(&self, id: &str, tester_ids: &[String]) -> Result<()> {
        self.modify_group_linkages(Method::DELETE, id, "betaTesters", tester_ids)
            .await
    }

    pub async fn add_beta_group_builds(&self, id: &str, build_ids: &[String]) -> Result<()> {
        self.modify_group_linkages(Method::POST, id, "builds", build_ids)
            .await
    }

    pub async fn remove_beta_group_builds(&self, id: &str, build_ids: &[String]) -> Result<()> {
        self.modify_group_linkages(Method::DELETE, id, "builds", build_ids)
            .await
    }

    pub async fn list_beta_group_testers(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<BetaTestersResponse> {
        self.api
            .get_json(
                &format!("{BETA_GROUPS}/{id}/betaTesters"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn list_beta_group_builds(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<BuildsResponse> {
        self.api
            .get_json(&format!("{BETA_GROUPS}/{id}/builds"), Some(&PageQuery { limit }))
            .await
    }

    async fn modify_group_linkages(
        &self,
        method: Method,
        id: &str,
        relationship: &str,
        ids: &[String],
    ) -> Result<()> {
        self.api
            .send_void(
                method,
                &format!("{BETA_GROUPS}/{id}/relationships/{relationship}"),
                Some(&Relationships::new(relationship, ids)),
            )
            .await
    }
}
