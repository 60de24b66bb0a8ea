// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Team members and the apps they can see.

use {
    crate::{
        app_api::AppsResponse,
        query::PageQuery,
        resource::{Document, Documents, LinkagesDocument, Relationships, Request},
        Result, Users,
    },
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    AccountHolder,
    Admin,
    AppManager,
    CustomerSupport,
    Developer,
    Finance,
    Marketing,
    ReadOnly,
    Sales,
    Technical,
    AccessToReports,
    /// A role this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::AccountHolder => "ACCOUNT_HOLDER",
            Self::Admin => "ADMIN",
            Self::AppManager => "APP_MANAGER",
            Self::CustomerSupport => "CUSTOMER_SUPPORT",
            Self::Developer => "DEVELOPER",
            Self::Finance => "FINANCE",
            Self::Marketing => "MARKETING",
            Self::ReadOnly => "READ_ONLY",
            Self::Sales => "SALES",
            Self::Technical => "TECHNICAL",
            Self::AccessToReports => "ACCESS_TO_REPORTS",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributes {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<UserRole>,
    pub all_apps_visible: Option<bool>,
    pub provisioning_allowed: Option<bool>,
}

pub type UserResponse = Document<UserAttributes>;
pub type UsersResponse = Documents<UserAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<UserRole>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_apps_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_allowed: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct UserFields {
    pub users: Vec<String>,
    pub apps: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub roles: Vec<UserRole>,
    pub username: Vec<String>,
    /// App resource IDs.
    pub visible_apps: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRelatedLimits {
    pub visible_apps: Option<u32>,
}

/// Query for [Users::list_users].
///
/// `sort` accepts `lastName` and `username`, each optionally prefixed by `-`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub fields: UserFields,
    pub filter: UserFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub limit_field: UserRelatedLimits,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadUserQuery {
    pub fields: UserFields,
    pub include: Vec<String>,
    pub limit_field: UserRelatedLimits,
}

const USERS: &str = "/users";

impl Users {
    pub async fn list_users(&self, query: &ListUsersQuery) -> Result<UsersResponse> {
        self.api.get_json(USERS, Some(query)).await
    }

    pub async fn get_user(&self, id: &str, query: &ReadUserQuery) -> Result<UserResponse> {
        self.api.get_json(&format!("{USERS}/{id}"), Some(query)).await
    }

    pub async fn modify_user(
        &self,
        id: &str,
        attributes: UserUpdateAttributes,
    ) -> Result<UserResponse> {
        let body: Request<_> = Request::update("users", id, attributes);

        self.api
            .send_json(Method::PATCH, &format!("{USERS}/{id}"), &body)
            .await
    }

    pub async fn remove_user(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(Method::DELETE, &format!("{USERS}/{id}"), None)
            .await
    }

    pub async fn list_visible_apps(&self, id: &str, limit: Option<u32>) -> Result<AppsResponse> {
        self.api
            .get_json(&format!("{USERS}/{id}/visibleApps"), Some(&PageQuery { limit }))
            .await
    }

    pub async fn get_visible_app_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{USERS}/{id}/relationships/visibleApps"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn add_visible_apps(&self, id: &str, app_ids: &[String]) -> Result<()> {
        self.modify_visible_apps(Method::POST, id, app_ids).await
    }

    /// Make exactly `app_ids` visible to the user.
    pub async fn replace_visible_apps(&self, id: &str, app_ids: &[String]) -> Result<()> {
        self.modify_visible_apps(Method::PATCH, id, app_ids).await
    }

    pub async fn remove_visible_apps(&self, id: &str, app_ids: &[String]) -> Result<()> {
        self.modify_visible_apps(Method::DELETE, id, app_ids).await
    }

    async fn modify_visible_apps(
        &self,
        method: Method,
        id: &str,
        app_ids: &[String],
    ) -> Result<()> {
        self.api
            .send_void(
                method,
                &format!("{USERS}/{id}/relationships/visibleApps"),
                Some(&Relationships::new("apps", app_ids)),
            )
            .await
    }
}
