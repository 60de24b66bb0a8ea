// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Async client for the App Store Connect API.
//!
//! [ApiClient] is the HTTP call adapter everything else is built on: it
//! serializes JSON-API query parameters ([query]), attaches the bearer token,
//! and normalizes responses ([response]), including JSON-API error envelopes.
//!
//! [AppStoreConnect] groups typed route helpers by area:
//!
//! ```no_run
//! # async fn run() -> asconnect::Result<()> {
//! use asconnect::{device_api::ListDevicesQuery, AppStoreConnect, UnifiedApiKey};
//!
//! let key = UnifiedApiKey::from_env()?;
//! let api = AppStoreConnect::from_unified_api_key(&key)?;
//!
//! let devices = api
//!     .provisioning
//!     .list_devices(&ListDevicesQuery {
//!         limit: Some(10),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod api_key;
mod api_token;
pub mod app_api;
pub mod app_encryption_api;
pub mod beta_group_api;
pub mod beta_license_agreement_api;
pub mod beta_localization_api;
pub mod beta_review_api;
pub mod beta_tester_api;
pub mod build_api;
pub mod build_beta_detail_api;
pub mod bundle_api;
pub mod certs_api;
pub mod cli;
pub mod client;
pub mod device_api;
mod error;
pub mod finance_api;
pub mod pre_release_version_api;
pub mod profile_api;
pub mod query;
pub mod resource;
pub mod response;
pub mod user_api;
pub mod user_invitation_api;
pub mod value;

use std::path::Path;

pub use crate::{
    api_key::{
        UnifiedApiKey, ENV_ISSUER_ID, ENV_KEY_ID, ENV_PRIVATE_KEY, ENV_PRIVATE_KEY_PATH,
    },
    api_token::{AppStoreConnectToken, ConnectTokenEncoder, TOKEN_AUDIENCE, TOKEN_LIFETIME},
    client::{ApiClient, ApiClientBuilder, ApiContext, CallOptions, DEFAULT_BASE_URL},
    error::{ApiError, CredentialError, Error, ErrorObject, ErrorResponse},
    response::{ContentType, Normalized},
};

pub type Result<T> = std::result::Result<T, Error>;

/// Certificates, bundle IDs, devices, and provisioning profiles.
#[derive(Clone)]
pub struct Provisioning {
    api: ApiClient,
}

/// Apps, builds, beta groups, and beta testers.
#[derive(Clone)]
pub struct TestFlight {
    api: ApiClient,
}

/// Users on the team.
#[derive(Clone)]
pub struct Users {
    api: ApiClient,
}

/// Pending invitations to join the team.
#[derive(Clone)]
pub struct UserInvitations {
    api: ApiClient,
}

/// Sales and finance report downloads.
#[derive(Clone)]
pub struct Reports {
    api: ApiClient,
}

/// A client for App Store Connect API.
///
/// Route helpers are grouped into sub-clients sharing one [ApiClient].
#[derive(Clone)]
pub struct AppStoreConnect {
    pub provisioning: Provisioning,
    pub testflight: TestFlight,
    pub users: Users,
    pub user_invitations: UserInvitations,
    pub reports: Reports,
    api: ApiClient,
}

impl AppStoreConnect {
    pub fn new(api: ApiClient) -> Self {
        Self {
            provisioning: Provisioning { api: api.clone() },
            testflight: TestFlight { api: api.clone() },
            users: Users { api: api.clone() },
            user_invitations: UserInvitations { api: api.clone() },
            reports: Reports { api: api.clone() },
            api,
        }
    }

    /// Construct a client authenticating with a freshly minted token.
    ///
    /// The token expires after [TOKEN_LIFETIME] seconds; construct a new client after that.
    pub fn from_token_encoder(encoder: &ConnectTokenEncoder) -> Result<Self> {
        Ok(Self::new(ApiClient::new(Some(encoder.mint()?))?))
    }

    pub fn from_unified_api_key(key: &UnifiedApiKey) -> Result<Self> {
        Self::from_token_encoder(&key.token_encoder()?)
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        Self::from_unified_api_key(&UnifiedApiKey::from_json_path(path)?)
    }

    /// The underlying call adapter, for endpoints without a typed helper.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
