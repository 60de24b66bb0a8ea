// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types.

use {
    serde::{Deserialize, Serialize},
    serde_json::Value as JsonValue,
    thiserror::Error,
};

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP exchange itself failed (connect, timeout, reading the body).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON or did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// The API answered with a JSON-API error envelope.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A bearer token could not be minted.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Query parameters or a request body could not be serialized.
    #[error("unable to serialize request: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A response parsed fine but lacks something the operation needs.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("unable to generate certificate signing request: {0}")]
    CertificateRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Obtain the [ApiError] if this is an API level failure.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Failures minting or sourcing App Store Connect credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("invalid PEM formatted private key")]
    InvalidPemPrivateKey,

    #[error("invalid api key file: {0}")]
    KeyFile(#[source] serde_json::Error),

    #[error("invalid unified api key: {0}")]
    InvalidUnifiedKey(#[from] base64::DecodeError),

    #[error("no app store connect api key found")]
    MissingApiKey,

    #[error("environment variable {0} is not set")]
    MissingEnvironmentVariable(&'static str),

    #[error("token minting task failed: {0}")]
    Task(String),
}

/// A single error object from a JSON-API error envelope.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Pointer or parameter identifying the offending part of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<JsonValue>,
}

/// The JSON-API error envelope, `{"errors": [...]}`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorObject>,
}

/// An error reported by the App Store Connect API.
#[derive(Clone, Debug, Error)]
#[error("{status_code} {status_message}{}", render_errors(.response))]
pub struct ApiError {
    pub status_code: u16,
    pub status_message: String,
    pub response: ErrorResponse,
}

fn render_errors(response: &ErrorResponse) -> String {
    response
        .errors
        .iter()
        .map(|e| match &e.detail {
            Some(detail) => format!("\n{}: {} ({})", e.code, e.title, detail),
            None => format!("\n{}: {}", e.code, e.title),
        })
        .collect()
}
