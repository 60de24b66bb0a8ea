// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Localized TestFlight text.
//!
//! App localizations carry the description and contact links testers see for
//! an app. Build localizations carry the "What to Test" notes of one build.

use {
    crate::{
        app_api::AppResponse,
        build_api::BuildResponse,
        resource::{Document, Documents, LinkageDocument, Relationship, Request},
        Result, TestFlight,
    },
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppLocalizationAttributes {
    pub description: Option<String>,
    pub feedback_email: Option<String>,
    pub locale: Option<String>,
    pub marketing_url: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub tv_os_privacy_policy: Option<String>,
}

pub type BetaAppLocalizationResponse = Document<BetaAppLocalizationAttributes>;
pub type BetaAppLocalizationsResponse = Documents<BetaAppLocalizationAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppLocalizationCreateAttributes {
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_policy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tv_os_privacy_policy: Option<String>,
}

/// Everything but the locale can change after creation.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppLocalizationUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_policy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tv_os_privacy_policy: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BetaAppLocalizationCreateRelationships {
    pub app: Relationship,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppLocalizationFields {
    pub apps: Vec<String>,
    pub beta_app_localizations: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BetaAppLocalizationFilter {
    pub app: Vec<String>,
    pub locale: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListBetaAppLocalizationsQuery {
    pub fields: BetaAppLocalizationFields,
    pub filter: BetaAppLocalizationFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReadBetaAppLocalizationQuery {
    pub fields: BetaAppLocalizationFields,
    pub include: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaBuildLocalizationAttributes {
    pub locale: Option<String>,
    pub whats_new: Option<String>,
}

pub type BetaBuildLocalizationResponse = Document<BetaBuildLocalizationAttributes>;
pub type BetaBuildLocalizationsResponse = Documents<BetaBuildLocalizationAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaBuildLocalizationCreateAttributes {
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whats_new: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaBuildLocalizationUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whats_new: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BetaBuildLocalizationCreateRelationships {
    pub build: Relationship,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaBuildLocalizationFields {
    pub builds: Vec<String>,
    pub beta_build_localizations: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BetaBuildLocalizationFilter {
    pub build: Vec<String>,
    pub locale: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListBetaBuildLocalizationsQuery {
    pub fields: BetaBuildLocalizationFields,
    pub filter: BetaBuildLocalizationFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReadBetaBuildLocalizationQuery {
    pub fields: BetaBuildLocalizationFields,
    pub include: Vec<String>,
}

const APP_LOCALIZATIONS: &str = "/betaAppLocalizations";
const BUILD_LOCALIZATIONS: &str = "/betaBuildLocalizations";

impl TestFlight {
    pub async fn create_beta_app_localization(
        &self,
        app_id: &str,
        attributes: BetaAppLocalizationCreateAttributes,
    ) -> Result<BetaAppLocalizationResponse> {
        let body = Request::create("betaAppLocalizations", attributes).with_relationships(
            BetaAppLocalizationCreateRelationships {
                app: Relationship::new("apps", app_id),
            },
        );

        self.api
            .send_json(Method::POST, APP_LOCALIZATIONS, &body)
            .await
    }

    pub async fn list_beta_app_localizations(
        &self,
        query: &ListBetaAppLocalizationsQuery,
    ) -> Result<BetaAppLocalizationsResponse> {
        self.api.get_json(APP_LOCALIZATIONS, Some(query)).await
    }

    pub async fn get_beta_app_localization(
        &self,
        id: &str,
        query: &ReadBetaAppLocalizationQuery,
    ) -> Result<BetaAppLocalizationResponse> {
        self.api
            .get_json(&format!("{APP_LOCALIZATIONS}/{id}"), Some(query))
            .await
    }

    pub async fn get_beta_app_localization_app(&self, id: &str) -> Result<AppResponse> {
        self.api
            .get_json::<_, ()>(&format!("{APP_LOCALIZATIONS}/{id}/app"), None)
            .await
    }

    pub async fn get_beta_app_localization_app_id(&self, id: &str) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(
                &format!("{APP_LOCALIZATIONS}/{id}/relationships/app"),
                None,
            )
            .await
    }

    pub async fn modify_beta_app_localization(
        &self,
        id: &str,
        attributes: BetaAppLocalizationUpdateAttributes,
    ) -> Result<BetaAppLocalizationResponse> {
        let body: Request<_> = Request::update("betaAppLocalizations", id, attributes);

        self.api
            .send_json(Method::PATCH, &format!("{APP_LOCALIZATIONS}/{id}"), &body)
            .await
    }

    pub async fn delete_beta_app_localization(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(Method::DELETE, &format!("{APP_LOCALIZATIONS}/{id}"), None)
            .await
    }

    pub async fn create_beta_build_localization(
        &self,
        build_id: &str,
        attributes: BetaBuildLocalizationCreateAttributes,
    ) -> Result<BetaBuildLocalizationResponse> {
        let body = Request::create("betaBuildLocalizations", attributes).with_relationships(
            BetaBuildLocalizationCreateRelationships {
                build: Relationship::new("builds", build_id),
            },
        );

        self.api
            .send_json(Method::POST, BUILD_LOCALIZATIONS, &body)
            .await
    }

    pub async fn list_beta_build_localizations(
        &self,
        query: &ListBetaBuildLocalizationsQuery,
    ) -> Result<BetaBuildLocalizationsResponse> {
        self.api.get_json(BUILD_LOCALIZATIONS, Some(query)).await
    }

    pub async fn get_beta_build_localization(
        &self,
        id: &str,
        query: &ReadBetaBuildLocalizationQuery,
    ) -> Result<BetaBuildLocalizationResponse> {
        self.api
            .get_json(&format!("{BUILD_LOCALIZATIONS}/{id}"), Some(query))
            .await
    }

    pub async fn get_beta_build_localization_build(&self, id: &str) -> Result<BuildResponse> {
        self.api
            .get_json::<_, ()>(&format!("{BUILD_LOCALIZATIONS}/{id}/build"), None)
            .await
    }

    pub async fn get_beta_build_localization_build_id(
        &self,
        id: &str,
    ) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(
                &format!("{BUILD_LOCALIZATIONS}/{id}/relationships/build"),
                None,
            )
            .await
    }

    pub async fn modify_beta_build_localization(
        &self,
        id: &str,
        attributes: BetaBuildLocalizationUpdateAttributes,
    ) -> Result<BetaBuildLocalizationResponse> {
        let body: Request<_> = Request::update("betaBuildLocalizations", id, attributes);

        self.api
            .send_json(Method::PATCH, &format!("{BUILD_LOCALIZATIONS}/{id}"), &body)
            .await
    }

    pub async fn delete_beta_build_localization(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(
                Method::DELETE,
                &format!("{BUILD_LOCALIZATIONS}/{id}"),
                None,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::query::serialize_query, serde_json::json};

    #[test]
    fn build_localization_body() {
        let body = Request::create(
            "betaBuildLocalizations",
            BetaBuildLocalizationCreateAttributes {
                locale: "en-US".into(),
                whats_new: Some("Try the new onboarding.".into()),
            },
        )
        .with_relationships(BetaBuildLocalizationCreateRelationships {
            build: Relationship::new("builds", "B1"),
        });

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "data": {
                    "type": "betaBuildLocalizations",
                    "attributes": {"locale": "en-US", "whatsNew": "Try the new onboarding."},
                    "relationships": {"build": {"data": {"id": "B1", "type": "builds"}}},
                },
            })
        );
    }

    #[test]
    fn app_localization_update_skips_unset() {
        let body: Request<_> = Request::update(
            "betaAppLocalizations",
            "L1",
            BetaAppLocalizationUpdateAttributes {
                feedback_email: Some("beta@example.com".into()),
                ..Default::default()
            },
        );

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "data": {
                    "type": "betaAppLocalizations",
                    "id": "L1",
                    "attributes": {"feedbackEmail": "beta@example.com"},
                },
            })
        );
    }

    #[test]
    fn list_query() {
        let query = ListBetaAppLocalizationsQuery {
            filter: BetaAppLocalizationFilter {
                app: vec!["123".into()],
                locale: vec!["de-DE".into(), "fr-FR".into()],
            },
            limit: Some(10),
            ..Default::default()
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some("filter[app]=123&filter[locale]=de-DE&filter[locale]=fr-FR&limit=10")
        );
    }
}
