// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! App Store Connect API tokens.

use {
    crate::{CredentialError, Result},
    jsonwebtoken::{Algorithm, EncodingKey, Header},
    serde::{Deserialize, Serialize},
    std::{path::Path, time::SystemTime},
};

/// Lifetime of minted tokens, in seconds.
///
/// Apple rejects tokens that live longer than 20 minutes.
pub const TOKEN_LIFETIME: u64 = 1200;

/// Audience claim expected by the API.
pub const TOKEN_AUDIENCE: &str = "appstoreconnect-v1";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct ConnectTokenClaims {
    pub(crate) iss: String,
    pub(crate) iat: u64,
    pub(crate) exp: u64,
    pub(crate) aud: String,
}

/// A JWT Token for use with App Store Connect API.
pub type AppStoreConnectToken = String;

/// Issues JWT bearer tokens for App Store Connect.
///
/// See
/// https://developer.apple.com/documentation/appstoreconnectapi/generating_tokens_for_api_requests
///
/// Tokens are derived from:
///
/// * A key identifier. This is a short alphanumeric string like `DEADBEEF42`.
/// * An issuer ID. This is likely a UUID.
/// * An ECDSA P-256 private key.
///
/// Minted tokens are opaque to the rest of this crate. Nothing refreshes them;
/// callers needing long sessions mint again before [TOKEN_LIFETIME] elapses.
#[derive(Clone)]
pub struct ConnectTokenEncoder {
    key_id: String,
    issuer_id: String,
    encoding_key: EncodingKey,
}

impl ConnectTokenEncoder {
    /// Construct an instance from an [EncodingKey] instance.
    pub fn from_jwt_encoding_key(
        key_id: String,
        issuer_id: String,
        encoding_key: EncodingKey,
    ) -> Self {
        Self {
            key_id,
            issuer_id,
            encoding_key,
        }
    }

    /// Construct an instance from a DER encoded ECDSA private key.
    pub fn from_ecdsa_der(key_id: String, issuer_id: String, der_data: &[u8]) -> Self {
        let encoding_key = EncodingKey::from_ec_der(der_data);

        Self::from_jwt_encoding_key(key_id, issuer_id, encoding_key)
    }

    /// Construct an instance from a PEM encoded ECDSA private key.
    pub fn from_ecdsa_pem(key_id: String, issuer_id: String, pem_data: &[u8]) -> Result<Self> {
        let encoding_key = EncodingKey::from_ec_pem(pem_data).map_err(CredentialError::from)?;

        Ok(Self::from_jwt_encoding_key(key_id, issuer_id, encoding_key))
    }

    /// Construct an instance from a PEM encoded ECDSA private key in a filesystem path.
    pub fn from_ecdsa_pem_path(
        key_id: String,
        issuer_id: String,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;

        Self::from_ecdsa_pem(key_id, issuer_id, &data)
    }

    /// Attempt to construct an instance from an API Key ID.
    ///
    /// e.g. `DEADBEEF42`. This looks for an `AuthKey_<id>.p8` file in default search
    /// locations like `~/.appstoreconnect/private_keys`.
    pub fn from_api_key_id(key_id: String, issuer_id: String) -> Result<Self> {
        let mut search_paths = vec![std::env::current_dir()?.join("private_keys")];

        if let Some(home) = dirs::home_dir() {
            search_paths.extend([
                home.join("private_keys"),
                home.join(".private_keys"),
                home.join(".appstoreconnect").join("private_keys"),
            ]);
        }

        let filename = format!("AuthKey_{key_id}.p8");

        for path in search_paths {
            let candidate = path.join(filename.as_str());

            if candidate.exists() {
                log::debug!("using API key {}", candidate.display());
                return Self::from_ecdsa_pem_path(key_id, issuer_id, candidate);
            }
        }

        Err(CredentialError::MissingApiKey.into())
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn issuer_id(&self) -> &str {
        &self.issuer_id
    }

    /// Mint a token valid for [TOKEN_LIFETIME] seconds.
    pub fn mint(&self) -> Result<AppStoreConnectToken> {
        self.new_token(TOKEN_LIFETIME)
    }

    /// Mint a token on the blocking thread pool.
    pub async fn mint_async(&self) -> Result<AppStoreConnectToken> {
        let encoder = self.clone();

        tokio::task::spawn_blocking(move || encoder.mint())
            .await
            .map_err(|e| CredentialError::Task(e.to_string()))?
    }

    /// Mint a new JWT token valid for `duration` seconds.
    pub fn new_token(&self, duration: u64) -> Result<AppStoreConnectToken> {
        let header = Header {
            kid: Some(self.key_id.clone()),
            alg: Algorithm::ES256,
            ..Default::default()
        };

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let claims = ConnectTokenClaims {
            iss: self.issuer_id.clone(),
            iat: now,
            exp: now + duration,
            aud: TOKEN_AUDIENCE.to_string(),
        };

        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(CredentialError::from)?;

        Ok(token)
    }
}
