// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Invitations to join the team.

use {
    crate::{
        app_api::{AppFields, AppsResponse},
        query::PageQuery,
        resource::{Document, Documents, LinkagesDocument, Relationships, Request},
        user_api::UserRole,
        value::deserialize_optional_datetime,
        Result, UserInvitations,
    },
    chrono::{DateTime, FixedOffset},
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitationAttributes {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub expiration_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub roles: Vec<UserRole>,
    pub all_apps_visible: Option<bool>,
    pub provisioning_allowed: Option<bool>,
}

pub type UserInvitationResponse = Document<UserInvitationAttributes>;
pub type UserInvitationsResponse = Documents<UserInvitationAttributes>;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitationCreateAttributes {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_apps_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_allowed: Option<bool>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitationCreateRelationships {
    pub visible_apps: Relationships,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitationFields {
    pub user_invitations: Vec<String>,
    pub apps: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitationFilter {
    pub email: Vec<String>,
    pub roles: Vec<UserRole>,
    /// App resource IDs.
    pub visible_apps: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitationRelatedLimits {
    pub visible_apps: Option<u32>,
}

/// Query for [UserInvitations::list_invitations].
///
/// `sort` accepts `email` and `lastName`, each optionally prefixed by `-`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUserInvitationsQuery {
    pub fields: UserInvitationFields,
    pub filter: UserInvitationFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub limit_field: UserInvitationRelatedLimits,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadUserInvitationQuery {
    pub fields: UserInvitationFields,
    pub include: Vec<String>,
    pub limit_field: UserInvitationRelatedLimits,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListInvitedVisibleAppsQuery {
    pub fields: AppFields,
    pub limit: Option<u32>,
}

const USER_INVITATIONS: &str = "/userInvitations";

impl UserInvitations {
    pub async fn list_invitations(
        &self,
        query: &ListUserInvitationsQuery,
    ) -> Result<UserInvitationsResponse> {
        self.api.get_json(USER_INVITATIONS, Some(query)).await
    }

    pub async fn get_invitation(
        &self,
        id: &str,
        query: &ReadUserInvitationQuery,
    ) -> Result<UserInvitationResponse> {
        self.api
            .get_json(&format!("{USER_INVITATIONS}/{id}"), Some(query))
            .await
    }

    /// Invite someone to the team.
    ///
    /// `visible_app_ids` is required unless `all_apps_visible` is set.
    pub async fn invite_user(
        &self,
        attributes: UserInvitationCreateAttributes,
        visible_app_ids: Option<&[String]>,
    ) -> Result<UserInvitationResponse> {
        let mut body: Request<_, UserInvitationCreateRelationships> =
            Request::create("userInvitations", attributes);

        if let Some(ids) = visible_app_ids {
            body = body.with_relationships(UserInvitationCreateRelationships {
                visible_apps: Relationships::new("apps", ids),
            });
        }

        self.api
            .send_json(Method::POST, USER_INVITATIONS, &body)
            .await
    }

    pub async fn cancel_invitation(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(Method::DELETE, &format!("{USER_INVITATIONS}/{id}"), None)
            .await
    }

    pub async fn list_invited_visible_apps(
        &self,
        id: &str,
        query: &ListInvitedVisibleAppsQuery,
    ) -> Result<AppsResponse> {
        self.api
            .get_json(&format!("{USER_INVITATIONS}/{id}/visibleApps"), Some(query))
            .await
    }

    pub async fn get_invited_visible_app_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{USER_INVITATIONS}/{id}/relationships/visibleApps"),
                Some(&PageQuery { limit }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::query::serialize_query, serde_json::json};

    #[test]
    fn invitation_attributes() {
        let doc: UserInvitationResponse = serde_json::from_value(json!({
            "data": {
                "id": "I1",
                "type": "userInvitations",
                "attributes": {
                    "email": "jane@example.com",
                    "expirationDate": "2024-02-01T00:00:00Z",
                    "roles": ["DEVELOPER"],
                    "allAppsVisible": true,
                },
            },
        }))
        .unwrap();

        let attributes = doc.data.attributes.unwrap();
        assert_eq!(attributes.roles, vec![UserRole::Developer]);
        assert!(attributes.expiration_date.is_some());
    }

    #[test]
    fn create_body() {
        let attributes = UserInvitationCreateAttributes {
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            roles: vec![UserRole::Developer],
            all_apps_visible: Some(true),
            provisioning_allowed: None,
        };
        let body: Request<_, UserInvitationCreateRelationships> =
            Request::create("userInvitations", attributes);

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "data": {
                    "type": "userInvitations",
                    "attributes": {
                        "email": "jane@example.com",
                        "firstName": "Jane",
                        "lastName": "Doe",
                        "roles": ["DEVELOPER"],
                        "allAppsVisible": true,
                    },
                },
            })
        );
    }

    #[test]
    fn list_query() {
        let query = ListUserInvitationsQuery {
            filter: UserInvitationFilter {
                email: vec!["jane@example.com".into()],
                ..Default::default()
            },
            limit: Some(10),
            ..Default::default()
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some("filter[email]=jane%40example.com&limit=10")
        );
    }
}
