// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! TestFlight beta testers.

use {
    crate::{
        app_api::AppsResponse,
        beta_group_api::BetaGroupsResponse,
        build_api::BuildsResponse,
        query::PageQuery,
        resource::{Document, Documents, LinkagesDocument, Relationship, Relationships, Request},
        Result, TestFlight,
    },
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetaInviteType {
    Email,
    PublicLink,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaTesterAttributes {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub invite_type: Option<BetaInviteType>,
}

pub type BetaTesterResponse = Document<BetaTesterAttributes>;
pub type BetaTestersResponse = Documents<BetaTesterAttributes>;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaTesterCreateAttributes {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Where a new tester gets access. At least one of the two must be set.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaTesterCreateRelationships {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta_groups: Option<Relationships>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builds: Option<Relationships>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaTesterFields {
    pub beta_testers: Vec<String>,
    pub apps: Vec<String>,
    pub beta_groups: Vec<String>,
    pub builds: Vec<String>,
}

/// Filters for [ListBetaTestersQuery]. `apps`, `beta_groups`, and `builds` take resource IDs.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaTesterFilter {
    pub apps: Vec<String>,
    pub beta_groups: Vec<String>,
    pub builds: Vec<String>,
    pub email: Vec<String>,
    pub first_name: Vec<String>,
    pub invite_type: Vec<BetaInviteType>,
    pub last_name: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaTesterRelatedLimits {
    pub apps: Option<u32>,
    pub beta_groups: Option<u32>,
    pub builds: Option<u32>,
}

/// Query for [TestFlight::list_beta_testers].
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBetaTestersQuery {
    pub fields: BetaTesterFields,
    pub filter: BetaTesterFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub limit_field: BetaTesterRelatedLimits,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadBetaTesterQuery {
    pub fields: BetaTesterFields,
    pub include: Vec<String>,
    pub limit_field: BetaTesterRelatedLimits,
}

/// A sent TestFlight invitation. Carries no attributes.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BetaTesterInvitationAttributes {}

pub type BetaTesterInvitationResponse = Document<BetaTesterInvitationAttributes>;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaTesterInvitationCreateRelationships {
    pub app: Relationship,
    pub beta_tester: Relationship,
}

const BETA_TESTERS: &str = "/betaTesters";

impl TestFlight {
    /// Create a tester and give them access through groups or builds.
    pub async fn create_beta_tester(
        &self,
        attributes: BetaTesterCreateAttributes,
        relationships: BetaTesterCreateRelationships,
    ) -> Result<BetaTesterResponse> {
        let body = Request::create("betaTesters", attributes).with_relationships(relationships);

        self.api.send_json(Method::POST, BETA_TESTERS, &body).await
    }

    pub async fn list_beta_testers(
        &self,
        query: &ListBetaTestersQuery,
    ) -> Result<BetaTestersResponse> {
        self.api.get_json(BETA_TESTERS, Some(query)).await
    }

    pub async fn get_beta_tester(
        &self,
        id: &str,
        query: &ReadBetaTesterQuery,
    ) -> Result<BetaTesterResponse> {
        self.api
            .get_json(&format!("{BETA_TESTERS}/{id}"), Some(query))
            .await
    }

    pub async fn delete_beta_tester(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(Method::DELETE, &format!("{BETA_TESTERS}/{id}"), None)
            .await
    }

    pub async fn list_beta_tester_apps(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<AppsResponse> {
        self.api
            .get_json(&format!("{BETA_TESTERS}/{id}/apps"), Some(&PageQuery { limit }))
            .await
    }

    /// Send, or resend, the TestFlight invitation for an app to a tester.
    pub async fn send_beta_tester_invitation(
        &self,
        app_id: &str,
        tester_id: &str,
    ) -> Result<BetaTesterInvitationResponse> {
        let body = Request::link(
            "betaTesterInvitations",
            BetaTesterInvitationCreateRelationships {
                app: Relationship::new("apps", app_id),
                beta_tester: Relationship::new("betaTesters", tester_id),
            },
        );

        self.api
            .send_json(Method::POST, "/betaTesterInvitations", &body)
            .await
    }

    pub async fn get_beta_tester_app_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.get_tester_linkages(id, "apps", limit).await
    }

    /// Remove a tester from all groups and builds of the given apps.
    pub async fn remove_beta_tester_apps(&self, id: &str, app_ids: &[String]) -> Result<()> {
        self.modify_tester_linkages(Method::DELETE, id, "apps", app_ids)
            .await
    }

    pub async fn add_beta_tester_to_groups(&self, id: &str, group_ids: &[String]) -> Result<()> {
        self.modify_tester_linkages(Method::POST, id, "betaGroups", group_ids)
            .await
    }

    pub async fn remove_beta_tester_from_groups(
        &self,
        id: &str,
        group_ids: &[String],
    ) -> Result<()> {
        self.modify_tester_linkages(Method::DELETE, id, "betaGroups", group_ids)
            .await
    }

    pub async fn list_beta_tester_beta_groups(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<BetaGroupsResponse> {
        self.api
            .get_json(
                &format!("{BETA_TESTERS}/{id}/betaGroups"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn get_beta_tester_beta_group_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.get_tester_linkages(id, "betaGroups", limit).await
    }

    /// Give a tester access to builds outside of any group.
    pub async fn assign_beta_tester_builds(&self, id: &str, build_ids: &[String]) -> Result<()> {
        self.modify_tester_linkages(Method::POST, id, "builds", build_ids)
            .await
    }

    pub async fn unassign_beta_tester_builds(
        &self,
        id: &str,
        build_ids: &[String],
    ) -> Result<()> {
        self.modify_tester_linkages(Method::DELETE, id, "builds", build_ids)
            .await
    }

    pub async fn list_beta_tester_builds(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<BuildsResponse> {
        self.api
            .get_json(&format!("{BETA_TESTERS}/{id}/builds"), Some(&PageQuery { limit }))
            .await
    }

    pub async fn get_beta_tester_build_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.get_tester_linkages(id, "builds", limit).await
    }

    async fn get_tester_linkages(
        &self,
        id: &str,
        relationship: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{BETA_TESTERS}/{id}/relationships/{relationship}"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    async fn modify_tester_linkages(
        &self,
        method: Method,
        id: &str,
        relationship: &str,
        ids: &[String],
    ) -> Result<()> {
        let body = Relationships::new(relationship, ids);

        self.api
            .send_void(
                method,
                &format!("{BETA_TESTERS}/{id}/relationships/{relationship}"),
                Some(&body),
            )
            .await
    }
}
