// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Response normalization.

use {
    crate::{
        value::{Reviver, Value},
        ApiError, Error, ErrorResponse, Result,
    },
    bytes::Bytes,
    serde::de::DeserializeOwned,
    serde_json::Value as JsonValue,
};

pub const JSON_MIME_TYPE: &str = "application/json";
pub const GZIP_MIME_TYPE: &str = "application/a-gzip";

/// Content type negotiated for a call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ContentType {
    /// JSON request and response bodies.
    #[default]
    Json,
    /// Gzip archives, e.g. sales and finance reports. Responses are returned as raw bytes.
    Gzip,
}

impl ContentType {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => JSON_MIME_TYPE,
            Self::Gzip => GZIP_MIME_TYPE,
        }
    }
}

/// The normalized outcome of a successful call.
#[derive(Clone, Debug, PartialEq)]
pub enum Normalized {
    /// The server sent no body.
    Empty,
    /// Raw bytes of a binary download.
    Binary(Bytes),
    /// Parsed and revived JSON.
    Json(Value),
}

impl Normalized {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Obtain the raw bytes of a binary response.
    ///
    /// An empty response yields empty bytes. JSON responses are re-encoded.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Binary(data) => Ok(data),
            Self::Json(value) => Ok(serde_json::to_vec(&value.into_json())
                .map_err(Error::MalformedResponse)?
                .into()),
        }
    }

    /// Decode into a typed document.
    ///
    /// Revived leaves are written back as strings first, so URLs and dates
    /// come back in canonical form rather than as sent. [crate::ApiClient::call_json]
    /// avoids this by normalizing without a reviver.
    ///
    /// An empty response decodes from JSON `null`, so `()` and `Option<T>` accept
    /// it while documents report a malformed response.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let decoded = match self {
            Self::Empty => serde_json::from_value(JsonValue::Null),
            Self::Binary(data) => serde_json::from_slice(&data),
            Self::Json(value) => serde_json::from_value(value.into_json()),
        };

        decoded.map_err(Error::MalformedResponse)
    }
}

/// Raw pieces of an HTTP response needed for normalization.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status_code: u16,
    pub status_message: String,
    /// Value of the `Content-Type` response header, if any.
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Turn a raw response into a [Normalized] value or an [Error].
pub fn normalize(
    response: RawResponse,
    requested: ContentType,
    reviver: &dyn Reviver,
) -> Result<Normalized> {
    if response.body.is_empty() {
        return Ok(Normalized::Empty);
    }

    let declared_json = response
        .content_type
        .as_deref()
        .map(|v| v.trim_start().starts_with(JSON_MIME_TYPE))
        .unwrap_or(false);

    if requested == ContentType::Gzip && !declared_json {
        return Ok(Normalized::Binary(response.body));
    }

    let json: JsonValue =
        serde_json::from_slice(&response.body).map_err(Error::MalformedResponse)?;

    if let Some(errors) = error_envelope(&json) {
        return Err(ApiError {
            status_code: response.status_code,
            status_message: response.status_message,
            response: errors,
        }
        .into());
    }

    Ok(Normalized::Json(reviver.revive(json)))
}

/// Extract a non-empty `errors` array from a top-level object.
fn error_envelope(json: &JsonValue) -> Option<ErrorResponse> {
    let errors = json.get("errors")?.as_array()?;

    if errors.is_empty() {
        return None;
    }

    // Keep whatever is parseable so a partially unexpected envelope still
    // surfaces as an API error.
    let errors = errors
        .iter()
        .map(|e| serde_json::from_value(e.clone()).unwrap_or_default())
        .collect();

    Some(ErrorResponse { errors })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::value::{NoopReviver, UrlThenDateReviver},
    };

    fn raw(status_code: u16, content_type: Option<&str>, body: &'static [u8]) -> RawResponse {
        RawResponse {
            status_code,
            status_message: "Whatever".into(),
            content_type: content_type.map(String::from),
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn empty_body_is_void() {
        for status in [200, 204, 404, 500] {
            let res = normalize(raw(status, None, b""), ContentType::Json, &UrlThenDateReviver);
            assert_eq!(res.unwrap(), Normalized::Empty);
        }
    }

    #[test]
    fn errors_envelope() {
        let mut response = raw(
            409,
            Some("application/json"),
            br#"{"errors":[{"code":"X","title":"Y"}]}"#,
        );
        response.status_message = "Conflict".into();

        let err = normalize(response, ContentType::Json, &UrlThenDateReviver).unwrap_err();
        let api = err.as_api_error().unwrap();

        assert_eq!(api.status_code, 409);
        assert_eq!(api.status_message, "Conflict");
        assert_eq!(api.response.errors.len(), 1);
        assert_eq!(api.response.errors[0].code, "X");
        assert_eq!(api.response.errors[0].title, "Y");
    }

    #[test]
    fn errors_even_with_success_status() {
        let err = normalize(
            raw(200, None, br#"{"errors":[{"code":"X"},{"weird":true}]}"#),
            ContentType::Json,
            &UrlThenDateReviver,
        )
        .unwrap_err();

        assert_eq!(err.as_api_error().unwrap().response.errors.len(), 2);
    }

    #[test]
    fn empty_errors_is_success() {
        let res = normalize(
            raw(200, None, br#"{"data":[],"errors":[]}"#),
            ContentType::Json,
            &NoopReviver,
        )
        .unwrap();

        assert!(matches!(res, Normalized::Json(_)));
    }

    #[test]
    fn data_document() {
        let res = normalize(
            raw(200, Some("application/json"), br#"{"data":{"id":"1","type":"apps"}}"#),
            ContentType::Json,
            &UrlThenDateReviver,
        )
        .unwrap();

        let Normalized::Json(value) = res else {
            panic!("expected json");
        };
        assert_eq!(
            value.into_json(),
            serde_json::json!({"data": {"id": "1", "type": "apps"}})
        );
    }

    #[test]
    fn malformed_json() {
        for status in [200, 409, 500] {
            let err = normalize(
                raw(status, Some("application/json"), br#"{"data":"#),
                ContentType::Json,
                &UrlThenDateReviver,
            )
            .unwrap_err();

            assert!(matches!(err, Error::MalformedResponse(_)));
        }
    }

    #[test]
    fn binary_passthrough() {
        let res = normalize(
            raw(200, Some("application/a-gzip"), b"\x1f\x8b\x08\x00"),
            ContentType::Gzip,
            &UrlThenDateReviver,
        )
        .unwrap();

        assert_eq!(res, Normalized::Binary(Bytes::from_static(b"\x1f\x8b\x08\x00")));
    }

    #[test]
    fn binary_request_with_json_error() {
        let err = normalize(
            raw(
                404,
                Some("application/json; charset=utf-8"),
                br#"{"errors":[{"code":"NOT_FOUND","title":"no report"}]}"#,
            ),
            ContentType::Gzip,
            &UrlThenDateReviver,
        )
        .unwrap_err();

        assert_eq!(err.as_api_error().unwrap().status_code, 404);
    }

    #[test]
    fn typed_decoding() {
        #[derive(serde::Deserialize)]
        struct Doc {
            data: Vec<u32>,
        }

        let value = UrlThenDateReviver.revive(serde_json::json!({"data": [1, 2]}));
        let doc: Doc = Normalized::Json(value).decode().unwrap();
        assert_eq!(doc.data, vec![1, 2]);

        Normalized::Empty.decode::<()>().unwrap();
        assert!(Normalized::Empty.decode::<Option<Doc>>().unwrap().is_none());

        assert!(matches!(
            Normalized::Empty.decode::<Doc>(),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            Normalized::Json(Value::Bool(true)).decode::<Doc>(),
            Err(Error::MalformedResponse(_))
        ));
    }
}
