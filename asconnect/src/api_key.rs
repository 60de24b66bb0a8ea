// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! API key material and where to find it.

use {
    crate::{ConnectTokenEncoder, CredentialError, Error, Result},
    base64::{engine::general_purpose::STANDARD as STANDARD_ENGINE, Engine},
    serde::{Deserialize, Serialize},
    std::{fs::Permissions, io::Write, path::Path},
};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Environment variable holding the issuer ID.
pub const ENV_ISSUER_ID: &str = "ASC_ISSUER_ID";
/// Environment variable holding the key ID.
pub const ENV_KEY_ID: &str = "ASC_KEY_ID";
/// Environment variable holding PEM encoded private key content.
pub const ENV_PRIVATE_KEY: &str = "ASC_PRIVATE_KEY";
/// Environment variable holding the path to a PEM encoded private key.
pub const ENV_PRIVATE_KEY_PATH: &str = "ASC_PRIVATE_KEY_PATH";

#[cfg(unix)]
fn set_permissions_private(p: &mut Permissions) {
    p.set_mode(0o600);
}

#[cfg(windows)]
fn set_permissions_private(_: &mut Permissions) {}

/// All components of an App Store Connect API Key in one place.
///
/// Apple hands out the issuer ID, the key ID, and the private key separately. This
/// type bundles them so they can be stored as a single JSON file or read from the
/// environment.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UnifiedApiKey {
    /// Who issued the key. Likely a UUID.
    issuer_id: String,

    /// Key identifier, like `DEADBEEF42`.
    key_id: String,

    /// Base64 encoded DER of ECDSA private key material.
    private_key: String,
}

impl UnifiedApiKey {
    /// Construct an instance from PEM encoded private key data.
    pub fn from_ecdsa_pem(
        issuer_id: impl ToString,
        key_id: impl ToString,
        pem_data: impl AsRef<[u8]>,
    ) -> Result<Self> {
        let parsed = pem::parse(pem_data).map_err(|_| CredentialError::InvalidPemPrivateKey)?;

        if parsed.tag() != "PRIVATE KEY" {
            return Err(CredentialError::InvalidPemPrivateKey.into());
        }

        Ok(Self {
            issuer_id: issuer_id.to_string(),
            key_id: key_id.to_string(),
            private_key: STANDARD_ENGINE.encode(parsed.contents()),
        })
    }

    /// Construct an instance from a PEM file, e.g. the `AuthKey_<id>.p8` downloaded
    /// from the App Store Connect web interface.
    pub fn from_ecdsa_pem_path(
        issuer_id: impl ToString,
        key_id: impl ToString,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let pem_data = std::fs::read(path.as_ref())?;

        Self::from_ecdsa_pem(issuer_id, key_id, pem_data)
    }

    /// Construct an instance from the `ASC_*` environment variables.
    ///
    /// `ASC_ISSUER_ID` and `ASC_KEY_ID` are required. The key comes from
    /// `ASC_PRIVATE_KEY` if set, else from the file named by `ASC_PRIVATE_KEY_PATH`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let issuer_id = lookup(ENV_ISSUER_ID)
            .ok_or(CredentialError::MissingEnvironmentVariable(ENV_ISSUER_ID))?;
        let key_id =
            lookup(ENV_KEY_ID).ok_or(CredentialError::MissingEnvironmentVariable(ENV_KEY_ID))?;

        if let Some(pem_data) = lookup(ENV_PRIVATE_KEY) {
            Self::from_ecdsa_pem(issuer_id, key_id, pem_data)
        } else if let Some(path) = lookup(ENV_PRIVATE_KEY_PATH) {
            Self::from_ecdsa_pem_path(issuer_id, key_id, path)
        } else {
            Err(CredentialError::MissingEnvironmentVariable(ENV_PRIVATE_KEY).into())
        }
    }

    pub fn issuer_id(&self) -> &str {
        &self.issuer_id
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Construct an instance from serialized JSON.
    pub fn from_json(data: impl AsRef<[u8]>) -> Result<Self> {
        Ok(serde_json::from_slice(data.as_ref()).map_err(CredentialError::KeyFile)?)
    }

    /// Construct an instance from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;

        Self::from_json(data)
    }

    /// Serialize this instance to a JSON object.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self).map_err(CredentialError::KeyFile)?)
    }

    /// Write this instance to a JSON file.
    ///
    /// The file holds a private key, so it is made readable only by its owner on
    /// unix. Missing parent directories are created with default permissions.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = self.to_json_string()?;

        let mut fh = std::fs::File::create(path)?;
        let mut permissions = fh.metadata()?.permissions();
        set_permissions_private(&mut permissions);
        fh.set_permissions(permissions)?;
        fh.write_all(data.as_bytes())?;

        Ok(())
    }

    /// Obtain a token encoder for this key.
    pub fn token_encoder(&self) -> Result<ConnectTokenEncoder> {
        self.clone().try_into()
    }
}

impl TryFrom<UnifiedApiKey> for ConnectTokenEncoder {
    type Error = Error;

    fn try_from(value: UnifiedApiKey) -> Result<Self> {
        let der = STANDARD_ENGINE
            .decode(value.private_key)
            .map_err(CredentialError::from)?;

        Ok(Self::from_ecdsa_der(value.key_id, value.issuer_id, &der))
    }
}
