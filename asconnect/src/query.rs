// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! JSON-API query string serialization.
//!
//! App Store Connect expects a bracketed query grammar:
//!
//! * `fields[apps]=name&fields[apps]=bundleId` for nested mappings.
//! * Arrays as repeated keys (`sort=name&sort=-id`), never comma joined.
//! * `limit=50` for the page size and `limit[betaTesters]=10` for caps on
//!   included relationships.
//!
//! Query parameter types are plain [Serialize] structs. They are converted to a
//! [serde_json::Value] mapping and then flattened by [to_query_string]. Dates and
//! URLs need no special handling: `chrono` and `url` serialize them to their
//! ISO-8601 and string forms respectively.

use {
    crate::{Error, Result},
    percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC},
    serde::Serialize,
    serde_json::Value,
};

/// Characters escaped in values. Everything but RFC 3986 unreserved characters.
const VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Top-level key naming included-relationship limits. Emitted as `limit[...]`.
pub const LIMIT_FIELD_KEY: &str = "limitField";

/// Query carrying only a page size.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PageQuery {
    /// Number of resources to return.
    pub limit: Option<u32>,
}

/// Serialize a query parameter struct into a query string.
///
/// Returns `None` when there is nothing to send, so callers never append a bare `?`.
pub fn serialize_query<T: Serialize + ?Sized>(query: &T) -> Result<Option<String>> {
    let value = serde_json::to_value(query).map_err(Error::Serialization)?;

    Ok(to_query_string(&value))
}

/// Flatten a JSON mapping into a query string.
///
/// Key order follows the mapping's iteration order. `null` leaves are skipped.
/// Non-object roots produce no query.
pub fn to_query_string(value: &Value) -> Option<String> {
    let Value::Object(map) = value else {
        return None;
    };

    let mut pairs = Vec::new();

    for (key, value) in map {
        let key = if key == LIMIT_FIELD_KEY && value.is_object() {
            "limit"
        } else {
            key.as_str()
        };

        flatten(key, value, &mut pairs);
    }

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("&"))
    }
}

fn flatten(key: &str, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Bool(v) => pairs.push(pair(key, if *v { "true" } else { "false" })),
        Value::Number(v) => pairs.push(pair(key, &v.to_string())),
        Value::String(v) => pairs.push(pair(key, v)),
        Value::Array(values) => {
            for v in values {
                flatten(key, v, pairs);
            }
        }
        Value::Object(map) => {
            for (inner, v) in map {
                flatten(&format!("{key}[{inner}]"), v, pairs);
            }
        }
    }
}

fn pair(key: &str, value: &str) -> String {
    format!("{key}={}", utf8_percent_encode(value, VALUE_ENCODE_SET))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        chrono::{TimeZone, Utc},
        serde_json::json,
        std::collections::BTreeMap,
    };

    #[test]
    fn absent_query() {
        assert_eq!(to_query_string(&Value::Null), None);
        assert_eq!(to_query_string(&json!({})), None);
        assert_eq!(to_query_string(&json!({"limit": null})), None);
        assert_eq!(serialize_query(&Option::<u32>::None).unwrap(), None);
    }

    #[test]
    fn filter_and_limit() {
        assert_eq!(
            to_query_string(&json!({"filter": {"id": ["1", "2"]}, "limit": 5})).unwrap(),
            "filter[id]=1&filter[id]=2&limit=5"
        );
    }

    #[test]
    fn arrays_repeat_in_order() {
        assert_eq!(
            to_query_string(&json!({"sort": ["-name", "id", "+udid"]})).unwrap(),
            "sort=-name&sort=id&sort=%2Budid"
        );
    }

    #[test]
    fn nested_fields() {
        assert_eq!(
            to_query_string(&json!({
                "fields": {"apps": ["name", "bundleId"], "builds": ["version"]},
                "include": "builds",
            }))
            .unwrap(),
            "fields[apps]=name&fields[apps]=bundleId&fields[builds]=version&include=builds"
        );
    }

    #[test]
    fn limit_field_alias() {
        assert_eq!(
            to_query_string(&json!({"limit": 10, "limitField": {"visibleApps": 3}})).unwrap(),
            "limit=10&limit[visibleApps]=3"
        );
        assert_eq!(
            to_query_string(&json!({"limit": {"profiles": 2}})).unwrap(),
            "limit[profiles]=2"
        );
        // Only mappings are aliased.
        assert_eq!(
            to_query_string(&json!({"limitField": 4})).unwrap(),
            "limitField=4"
        );
    }

    #[test]
    fn deep_nesting() {
        assert_eq!(
            to_query_string(&json!({"a": {"b": {"c": true}}})).unwrap(),
            "a[b][c]=true"
        );
    }

    #[test]
    fn values_encoded_individually() {
        assert_eq!(
            to_query_string(&json!({"filter": {"name": ["My App & Co", "a=b"]}})).unwrap(),
            "filter[name]=My%20App%20%26%20Co&filter[name]=a%3Db"
        );
    }

    #[test]
    fn dates_and_urls() {
        #[derive(Serialize)]
        struct Query {
            since: chrono::DateTime<Utc>,
            callback: url::Url,
        }

        let q = Query {
            since: Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap(),
            callback: url::Url::parse("https://example.com/a b").unwrap(),
        };

        assert_eq!(
            serialize_query(&q).unwrap().unwrap(),
            "since=2020-01-02T03%3A04%3A05Z&callback=https%3A%2F%2Fexample.com%2Fa%2520b"
        );
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut sorted = BTreeMap::new();
        sorted.insert("b", 1);
        sorted.insert("a", 2);
        assert_eq!(serialize_query(&sorted).unwrap().unwrap(), "a=2&b=1");

        assert_eq!(
            to_query_string(&json!({"z": 1, "a": 2})).unwrap(),
            "z=1&a=2"
        );
    }
}
