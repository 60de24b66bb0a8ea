// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Coerced JSON values.
//!
//! Response bodies are parsed into [serde_json::Value] and then run through a
//! [Reviver], which gets a chance to turn every string leaf into a richer type.
//! The default [UrlThenDateReviver] recognizes absolute URLs and ISO-8601
//! date-times, in that order.

use {
    chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat},
    serde::{de::Error as _, Deserialize, Deserializer},
    indexmap::IndexMap,
    serde_json::{Map, Number, Value as JsonValue},
    url::Url,
};

/// A JSON value whose string leaves may have been coerced to URLs or date-times.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Url(Url),
    DateTime(DateTime<FixedOffset>),
    Array(Vec<Value>),
    /// Keys keep the order they had in the response.
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Look up a key in an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Self::Url(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Convert back to a plain JSON value.
    ///
    /// URLs become their string form and date-times an RFC 3339 string, so
    /// running the result through the reviver again yields an equal value.
    pub fn into_json(self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(v),
            Self::Number(v) => JsonValue::Number(v),
            Self::String(v) => JsonValue::String(v),
            Self::Url(v) => JsonValue::String(v.into()),
            Self::DateTime(v) => {
                JsonValue::String(v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Array(v) => JsonValue::Array(v.into_iter().map(Self::into_json).collect()),
            Self::Object(v) => JsonValue::Object(
                v.into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

/// Post-parse transform applied to every string leaf of a response.
pub trait Reviver: Send + Sync {
    /// Turn a string leaf into a [Value]. Must not fail.
    fn revive_string(&self, s: String) -> Value;

    /// Walk a parsed document, reviving string leaves.
    fn revive(&self, value: JsonValue) -> Value {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(v) => Value::Bool(v),
            JsonValue::Number(v) => Value::Number(v),
            JsonValue::String(v) => self.revive_string(v),
            JsonValue::Array(v) => Value::Array(v.into_iter().map(|v| self.revive(v)).collect()),
            JsonValue::Object(v) => Value::Object(
                v.into_iter()
                    .map(|(k, v)| (k, self.revive(v)))
                    .collect(),
            ),
        }
    }
}

/// Coerces absolute URLs, then ISO-8601 date-times. Everything else stays a string.
#[derive(Clone, Copy, Debug, Default)]
pub struct UrlThenDateReviver;

impl Reviver for UrlThenDateReviver {
    fn revive_string(&self, s: String) -> Value {
        // URL has to be probed first.
        if let Ok(url) = Url::parse(&s) {
            return Value::Url(url);
        }

        if let Some(dt) = parse_iso8601(&s) {
            return Value::DateTime(dt);
        }

        Value::String(s)
    }
}

/// Leaves all strings untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReviver;

impl Reviver for NoopReviver {
    fn revive_string(&self, s: String) -> Value {
        Value::String(s)
    }
}

/// Parse an ISO-8601 date or date-time.
///
/// Accepts RFC 3339 (`2020-01-02T03:04:05.123-07:00`), the same with a
/// colon-less offset (`+0000`), date-times lacking an
/// offset (taken as UTC), and calendar dates (`2020-01-02`, midnight UTC).
pub fn parse_iso8601(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    // App Store Connect commonly emits offsets without a colon, e.g. `+0000`.
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }

    let utc = FixedOffset::east_opt(0)?;

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().with_timezone(&utc));
        }
    }

    if s.len() == 10 {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc().with_timezone(&utc));
        }
    }

    None
}

/// Deserialize an optional date-time field with [parse_iso8601].
///
/// Use with `#[serde(default, deserialize_with = "...")]`.
pub fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) => parse_iso8601(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid ISO-8601 date-time: {s}"))),
    }
}
