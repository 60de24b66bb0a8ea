// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bundle IDs and their capabilities.

use {
    crate::{
        profile_api::ProfilesResponse,
        query::PageQuery,
        resource::{Document, Documents, LinkagesDocument, Relationship, Request},
        Provisioning, Result,
    },
    reqwest::Method,
    serde::{Deserialize, Serialize},
    serde_json::Value as JsonValue,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BundleIdPlatform {
    Ios,
    MacOs,
    Universal,
}

impl std::fmt::Display for BundleIdPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Ios => "IOS",
            Self::MacOs => "MAC_OS",
            Self::Universal => "UNIVERSAL",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleIdAttributes {
    pub identifier: Option<String>,
    pub name: Option<String>,
    /// `IOS`, `MAC_OS`, `UNIVERSAL`, or platforms newer than this crate.
    pub platform: Option<String>,
    pub seed_id: Option<String>,
}

pub type BundleIdResponse = Document<BundleIdAttributes>;
pub type BundleIdsResponse = Documents<BundleIdAttributes>;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleIdCreateAttributes {
    pub identifier: String,
    pub name: String,
    pub platform: BundleIdPlatform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_id: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleIdUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleIdFields {
    pub bundle_ids: Vec<String>,
    pub profiles: Vec<String>,
    pub bundle_id_capabilities: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleIdFilter {
    pub id: Vec<String>,
    pub identifier: Vec<String>,
    pub name: Vec<String>,
    pub platform: Vec<BundleIdPlatform>,
    pub seed_id: Vec<String>,
}

/// Query for [Provisioning::list_bundle_ids].
///
/// `sort` accepts `id`, `name`, `platform`, `seedId`, each optionally prefixed by `-`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBundleIdsQuery {
    pub fields: BundleIdFields,
    pub filter: BundleIdFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BundleIdRelatedLimits {
    pub profiles: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadBundleIdQuery {
    pub fields: BundleIdFields,
    pub include: Vec<String>,
    /// Caps on included relationships, sent as `limit[...]`.
    pub limit_field: BundleIdRelatedLimits,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleIdCapabilityAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<JsonValue>,
}

pub type BundleIdCapabilityResponse = Document<BundleIdCapabilityAttributes>;
pub type BundleIdCapabilitiesResponse = Documents<BundleIdCapabilityAttributes>;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleIdCapabilityRelationships {
    pub bundle_id: Relationship,
}

const BUNDLE_IDS: &str = "/bundleIds";
const BUNDLE_ID_CAPABILITIES: &str = "/bundleIdCapabilities";

impl Provisioning {
    pub async fn register_bundle_id(
        &self,
        identifier: &str,
        name: &str,
        platform: BundleIdPlatform,
    ) -> Result<BundleIdResponse> {
        let body: Request<_> = Request::create(
            "bundleIds",
            BundleIdCreateAttributes {
                identifier: identifier.into(),
                name: name.into(),
                platform,
                seed_id: None,
            },
        );

        self.api.send_json(Method::POST, BUNDLE_IDS, &body).await
    }

    pub async fn modify_bundle_id(&self, id: &str, name: &str) -> Result<BundleIdResponse> {
        let body: Request<_> = Request::update(
            "bundleIds",
            id,
            BundleIdUpdateAttributes {
                name: Some(name.into()),
            },
        );

        self.api
            .send_json(Method::PATCH, &format!("{BUNDLE_IDS}/{id}"), &body)
            .await
    }

    pub async fn delete_bundle_id(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(Method::DELETE, &format!("{BUNDLE_IDS}/{id}"), None)
            .await
    }

    pub async fn list_bundle_ids(&self, query: &ListBundleIdsQuery) -> Result<BundleIdsResponse> {
        self.api.get_json(BUNDLE_IDS, Some(query)).await
    }

    pub async fn get_bundle_id(
        &self,
        id: &str,
        query: &ReadBundleIdQuery,
    ) -> Result<BundleIdResponse> {
        self.api
            .get_json(&format!("{BUNDLE_IDS}/{id}"), Some(query))
            .await
    }

    /// List the provisioning profiles of a bundle ID.
    pub async fn list_bundle_id_profiles(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<ProfilesResponse> {
        self.api
            .get_json(&format!("{BUNDLE_IDS}/{id}/profiles"), Some(&PageQuery { limit }))
            .await
    }

    pub async fn get_bundle_id_profile_ids(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<LinkagesDocument> {
        self.api
            .get_json(
                &format!("{BUNDLE_IDS}/{id}/relationships/profiles"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    pub async fn list_bundle_id_capabilities(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<BundleIdCapabilitiesResponse> {
        self.api
            .get_json(
                &format!("{BUNDLE_IDS}/{id}/bundleIdCapabilities"),
                Some(&PageQuery { limit }),
            )
            .await
    }

    /// Enable a capability, e.g. `PUSH_NOTIFICATIONS`, for a bundle ID.
    pub async fn enable_capability(
        &self,
        bundle_id: &str,
        capability_type: &str,
        settings: Option<JsonValue>,
    ) -> Result<BundleIdCapabilityResponse> {
        let body = Request::create(
            "bundleIdCapabilities",
            BundleIdCapabilityAttributes {
                capability_type: Some(capability_type.into()),
                settings,
            },
        )
        .with_relationships(BundleIdCapabilityRelationships {
            bundle_id: Relationship::new("bundleIds", bundle_id),
        });

        self.api
            .send_json(Method::POST, BUNDLE_ID_CAPABILITIES, &body)
            .await
    }

    pub async fn modify_capability(
        &self,
        id: &str,
        capability_type: &str,
        settings: Option<JsonValue>,
    ) -> Result<BundleIdCapabilityResponse> {
        let body: Request<_> = Request::update(
            "bundleIdCapabilities",
            id,
            BundleIdCapabilityAttributes {
                capability_type: Some(capability_type.into()),
                settings,
            },
        );

        self.api
            .send_json(Method::PATCH, &format!("{BUNDLE_ID_CAPABILITIES}/{id}"), &body)
            .await
    }

    pub async fn disable_capability(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(Method::DELETE, &format!("{BUNDLE_ID_CAPABILITIES}/{id}"), None)
            .await
    }
}
