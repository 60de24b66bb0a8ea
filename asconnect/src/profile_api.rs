// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Provisioning profiles.

use {
    crate::{
        bundle_api::BundleIdResponse,
        certs_api::CertificatesResponse,
        device_api::DevicesResponse,
        query::PageQuery,
        resource::{Document, Documents, Relationship, Relationships, Request},
        value::deserialize_optional_datetime,
        Provisioning, Result,
    },
    chrono::{DateTime, FixedOffset},
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileType {
    IosAppDevelopment,
    IosAppStore,
    IosAppAdhoc,
    IosAppInhouse,
    MacAppDevelopment,
    MacAppStore,
    MacAppDirect,
    TvosAppDevelopment,
    TvosAppStore,
    MacCatalystAppDevelopment,
    MacCatalystAppStore,
    MacCatalystAppDirect,
}

impl std::fmt::Display for ProfileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::IosAppDevelopment => "IOS_APP_DEVELOPMENT",
            Self::IosAppStore => "IOS_APP_STORE",
            Self::IosAppAdhoc => "IOS_APP_ADHOC",
            Self::IosAppInhouse => "IOS_APP_INHOUSE",
            Self::MacAppDevelopment => "MAC_APP_DEVELOPMENT",
            Self::MacAppStore => "MAC_APP_STORE",
            Self::MacAppDirect => "MAC_APP_DIRECT",
            Self::TvosAppDevelopment => "TVOS_APP_DEVELOPMENT",
            Self::TvosAppStore => "TVOS_APP_STORE",
            Self::MacCatalystAppDevelopment => "MAC_CATALYST_APP_DEVELOPMENT",
            Self::MacCatalystAppStore => "MAC_CATALYST_APP_STORE",
            Self::MacCatalystAppDirect => "MAC_CATALYST_APP_DIRECT",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAttributes {
    pub name: Option<String>,
    pub platform: Option<String>,
    /// Base64 of the signed profile.
    pub profile_content: Option<String>,
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_date: Option<DateTime<FixedOffset>>,
    /// `ACTIVE` or `INVALID`.
    pub profile_state: Option<String>,
    pub profile_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub expiration_date: Option<DateTime<FixedOffset>>,
}

pub type ProfileResponse = Document<ProfileAttributes>;
pub type ProfilesResponse = Documents<ProfileAttributes>;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCreateAttributes {
    pub name: String,
    pub profile_type: ProfileType,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCreateRelationships {
    pub bundle_id: Relationship,
    pub certificates: Relationships,
    /// Omitted for distribution profiles, which cover all devices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Relationships>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    pub profiles: Vec<String>,
    pub bundle_ids: Vec<String>,
    pub certificates: Vec<String>,
    pub devices: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFilter {
    pub id: Vec<String>,
    pub name: Vec<String>,
    pub profile_state: Vec<String>,
    pub profile_type: Vec<ProfileType>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfileRelatedLimits {
    pub certificates: Option<u32>,
    pub devices: Option<u32>,
}

/// Query for [Provisioning::list_profiles].
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProfilesQuery {
    pub fields: ProfileFields,
    pub filter: ProfileFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub limit_field: ProfileRelatedLimits,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadProfileQuery {
    pub fields: ProfileFields,
    pub include: Vec<String>,
    pub limit_field: ProfileRelatedLimits,
}

const PROFILES: &str = "/profiles";

impl Provisioning {
    pub async fn create_profile(
        &self,
        name: &str,
        profile_type: ProfileType,
        bundle_id: &str,
        certificates: &[String],
        devices: Option<&[String]>,
    ) -> Result<ProfileResponse> {
        let body = Request::create(
            "profiles",
            ProfileCreateAttributes {
                name: name.into(),
                profile_type,
            },
        )
        .with_relationships(ProfileCreateRelationships {
            bundle_id: Relationship::new("bundleIds", bundle_id),
            certificates: Relationships::new("certificates", certificates),
            devices: devices.map(|devices| Relationships::new("devices", devices)),
        });

        self.api.send_json(Method::POST, PROFILES, &body).await
    }

    pub async fn list_profiles(&self, query: &ListProfilesQuery) -> Result<ProfilesResponse> {
        self.api.get_json(PROFILES, Some(query)).await
    }

    pub async fn get_profile(&self, id: &str, query: &ReadProfileQuery) -> Result<ProfileResponse> {
        self.api
            .get_json(&format!("{PROFILES}/{id}"), Some(query))
            .await
    }

    pub async fn delete_profile(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(Method::DELETE, &format!("{PROFILES}/{id}"), None)
            .await
    }

    pub async fn get_profile_bundle_id(&self, id: &str) -> Result<BundleIdResponse> {
        self.api
            .get_json::<_, ()>(&format!("{PROFILES}/{id}/bundleId"), None)
            .await
    }

    pub async fn list_profile_certificates(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<CertificatesResponse> {
        self.api
            .get_json(&format!("{PROFILES}/{id}/certificates"), Some(&PageQuery { limit }))
            .await
    }

    pub async fn list_profile_devices(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<DevicesResponse> {
        self.api
            .get_json(&format!("{PROFILES}/{id}/devices"), Some(&PageQuery { limit }))
            .await
    }
}
