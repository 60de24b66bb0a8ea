// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use {
    crate::{
        bundle_api::BundleIdPlatform,
        resource::{Document, Documents, Request},
        value::deserialize_optional_datetime,
        Provisioning, Result,
    },
    chrono::{DateTime, FixedOffset},
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    Enabled,
    Disabled,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAttributes {
    pub device_class: Option<String>,
    pub model: Option<String>,
    pub name: Option<String>,
    pub platform: Option<String>,
    pub status: Option<DeviceStatus>,
    pub udid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub added_date: Option<DateTime<FixedOffset>>,
}

pub type DeviceResponse = Document<DeviceAttributes>;
pub type DevicesResponse = Documents<DeviceAttributes>;

#[derive(Clone, Debug, Serialize)]
pub struct DeviceCreateAttributes {
    pub name: String,
    pub platform: BundleIdPlatform,
    pub udid: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DeviceUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DeviceFields {
    pub devices: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DeviceFilter {
    pub id: Vec<String>,
    pub name: Vec<String>,
    pub platform: Vec<BundleIdPlatform>,
    pub status: Vec<DeviceStatus>,
    pub udid: Vec<String>,
}

/// Query for [Provisioning::list_devices].
#[derive(Clone, Debug, Default, Serialize)]
pub struct ListDevicesQuery {
    pub fields: DeviceFields,
    pub filter: DeviceFilter,
    pub limit: Option<u32>,
    pub sort: Vec<String>,
}

const DEVICES: &str = "/devices";

impl Provisioning {
    pub async fn register_device(
        &self,
        name: &str,
        platform: BundleIdPlatform,
        udid: &str,
    ) -> Result<DeviceResponse> {
        let body: Request<_> = Request::create(
            "devices",
            DeviceCreateAttributes {
                name: name.into(),
                platform,
                udid: udid.into(),
            },
        );

        self.api.send_json(Method::POST, DEVICES, &body).await
    }

    pub async fn list_devices(&self, query: &ListDevicesQuery) -> Result<DevicesResponse> {
        self.api.get_json(DEVICES, Some(query)).await
    }

    pub async fn get_device(&self, id: &str, fields: &DeviceFields) -> Result<DeviceResponse> {
        #[derive(Serialize)]
        struct Query<'a> {
            fields: &'a DeviceFields,
        }

        self.api
            .get_json(&format!("{DEVICES}/{id}"), Some(&Query { fields }))
            .await
    }

    /// Rename a device, or enable or disable it.
    pub async fn modify_device(
        &self,
        id: &str,
        attributes: DeviceUpdateAttributes,
    ) -> Result<DeviceResponse> {
        let body: Request<_> = Request::update("devices", id, attributes);

        self.api
            .send_json(Method::PATCH, &format!("{DEVICES}/{id}"), &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::query::serialize_query, serde_json::json};

    #[test]
    fn list_query() {
        let query = ListDevicesQuery {
            filter: DeviceFilter {
                status: vec![DeviceStatus::Enabled],
                udid: vec!["0000-1111".into()],
                ..Default::default()
            },
            sort: vec!["name".into()],
            ..Default::default()
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some("filter[status]=ENABLED&filter[udid]=0000-1111&sort=name")
        );
    }

    #[test]
    fn update_body() {
        let body: Request<_> = Request::update(
            "devices",
            "D1",
            DeviceUpdateAttributes {
                status: Some(DeviceStatus::Disabled),
                ..Default::default()
            },
        );

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"data": {"type": "devices", "id": "D1", "attributes": {"status": "DISABLED"}}})
        );
    }

    #[test]
    fn unknown_status() {
        let docs: DevicesResponse = serde_json::from_value(json!({
            "data": [
                {"id": "D1", "type": "devices", "attributes": {"status": "ENABLED"}},
                {"id": "D2", "type": "devices", "attributes": {"status": "PROCESSING"}},
            ],
        }))
        .unwrap();

        let statuses = docs
            .data
            .iter()
            .map(|d| d.attributes.as_ref().and_then(|a| a.status))
            .collect::<Vec<_>>();
        assert_eq!(
            statuses,
            vec![Some(DeviceStatus::Enabled), Some(DeviceStatus::Unknown)]
        );
    }
}
