// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Calls against a local mock server.

use {
    asconnect::{
        beta_review_api::BetaReviewState,
        build_api::ListBuildsQuery,
        device_api::{DeviceFields, DeviceStatus, ListDevicesQuery},
        finance_api::{
            SalesReportFilter, SalesReportFrequency, SalesReportSubType, SalesReportType,
            SalesReportsQuery,
        },
        value::{NoopReviver, Value},
        ApiClient, AppStoreConnect, CallOptions, ContentType, Error, Normalized,
    },
    mockito::{Matcher, Server, ServerGuard},
    reqwest::Method,
    serde_json::json,
};

fn client(server: &ServerGuard, token: Option<&str>) -> ApiClient {
    let mut builder = ApiClient::builder().base_url(server.url());
    if let Some(token) = token {
        builder = builder.token(token);
    }

    builder.build().unwrap()
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/apps")
        .match_header("authorization", "Bearer abc")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let res = client(&server, Some("abc"))
        .get("/apps", CallOptions::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(matches!(res, Normalized::Json(_)));
}

#[tokio::test]
async fn no_token_no_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/apps")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    client(&server, None)
        .get("/apps", CallOptions::new())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn query_string() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/devices")
        .match_query(Matcher::Exact("filter[id]=1&filter[id]=2&limit=5".into()))
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let options = CallOptions::new()
        .query(&json!({"filter": {"id": ["1", "2"]}, "limit": 5}))
        .unwrap();
    client(&server, None).get("/devices", options).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn empty_query_has_no_question_mark() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/builds")
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    AppStoreConnect::new(client(&server, None))
        .testflight
        .list_builds(&ListBuildsQuery::default())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn api_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/bundleIds")
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"errors":[{"status":"409","code":"ENTITY_ERROR","title":"X","detail":"taken"}]}"#,
        )
        .create_async()
        .await;

    let err = client(&server, Some("abc"))
        .post("/bundleIds", CallOptions::new().body(&json!({"data": {}})).unwrap())
        .await
        .unwrap_err();

    let api = err.as_api_error().expect("api error");
    assert_eq!(api.status_code, 409);
    assert_eq!(api.status_message, "Conflict");
    assert_eq!(api.response.errors[0].code, "ENTITY_ERROR");
    assert_eq!(api.response.errors[0].detail.as_deref(), Some("taken"));
}

#[tokio::test]
async fn error_without_envelope_is_success() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/apps/1")
        .with_status(500)
        .with_body(r#"{"message":"oops"}"#)
        .create_async()
        .await;

    let res = client(&server, None)
        .get("/apps/1", CallOptions::new())
        .await
        .unwrap();

    let Normalized::Json(value) = res else {
        panic!("expected json");
    };
    assert_eq!(value.get("message").and_then(Value::as_str), Some("oops"));
}

#[tokio::test]
async fn empty_body() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/profiles/P1")
        .with_status(204)
        .create_async()
        .await;

    let res = client(&server, None)
        .delete("/profiles/P1", CallOptions::new())
        .await
        .unwrap();

    assert_eq!(res, Normalized::Empty);
}

#[tokio::test]
async fn malformed_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/apps")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": ["#)
        .create_async()
        .await;

    let err = client(&server, None)
        .get("/apps", CallOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn revives_urls_and_dates() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/builds/B1")
        .with_status(200)
        .with_body(
            r#"{"data":{"id":"B1","type":"builds",
                "attributes":{"version":"7","uploadedDate":"2021-01-02T03:04:05.000+0000"},
                "links":{"self":"https://api.appstoreconnect.apple.com/v1/builds/B1"}}}"#,
        )
        .create_async()
        .await;

    let res = client(&server, None)
        .get("/builds/B1", CallOptions::new())
        .await
        .unwrap();
    let Normalized::Json(value) = res else {
        panic!("expected json");
    };
    let data = value.get("data").unwrap();

    assert!(data
        .get("links")
        .and_then(|l| l.get("self"))
        .and_then(Value::as_url)
        .is_some());
    assert_eq!(
        data.get("attributes")
            .and_then(|a| a.get("uploadedDate"))
            .and_then(Value::as_datetime)
            .map(|d| d.timestamp()),
        Some(1609556645)
    );
    assert_eq!(
        data.get("attributes")
            .and_then(|a| a.get("version"))
            .and_then(Value::as_str),
        Some("7")
    );

    let client = ApiClient::builder()
        .base_url(server.url())
        .reviver(NoopReviver)
        .build()
        .unwrap();
    let Normalized::Json(value) = client
        .get("/builds/B1", CallOptions::new())
        .await
        .unwrap()
    else {
        panic!("expected json");
    };
    assert!(value
        .get("data")
        .and_then(|d| d.get("links"))
        .and_then(|l| l.get("self"))
        .and_then(Value::as_str)
        .is_some());
}

#[tokio::test]
async fn gzip_download() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/salesReports")
        .match_header("accept", "application/a-gzip")
        .match_query(Matcher::Exact(
            "filter[frequency]=MONTHLY&filter[reportDate]=2024-01\
             &filter[reportSubType]=SUMMARY&filter[reportType]=SALES&filter[vendorNumber]=85"
                .into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/a-gzip")
        .with_body(b"\x1f\x8b\x08\x00report")
        .create_async()
        .await;

    let query = SalesReportsQuery {
        filter: SalesReportFilter {
            frequency: SalesReportFrequency::Monthly,
            report_date: Some("2024-01".into()),
            report_sub_type: SalesReportSubType::Summary,
            report_type: SalesReportType::Sales,
            vendor_number: "85".into(),
            version: None,
        },
    };
    let data = AppStoreConnect::new(client(&server, Some("abc")))
        .reports
        .download_sales_reports(&query)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(&data[..], b"\x1f\x8b\x08\x00report");
}

#[tokio::test]
async fn gzip_request_with_json_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/financeReports")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"errors":[{"code":"NOT_FOUND","title":"no report"}]}"#)
        .create_async()
        .await;

    let err = client(&server, None)
        .get(
            "/financeReports",
            CallOptions::new().content_type(ContentType::Gzip),
        )
        .await
        .unwrap_err();

    assert_eq!(err.as_api_error().unwrap().status_code, 404);
}

#[tokio::test]
async fn typed_device_listing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/devices")
        .match_query(Matcher::Exact("filter[status]=ENABLED&limit=2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [{
                    "id": "D1",
                    "type": "devices",
                    "attributes": {
                        "name": "iPhone",
                        "udid": "0000",
                        "status": "ENABLED",
                        "addedDate": "2022-06-01T12:00:00.000+0000",
                    },
                }],
                "links": {
                    "self": "https://api.appstoreconnect.apple.com/v1/devices",
                    "next": "https://api.appstoreconnect.apple.com/v1/devices?cursor=Ag",
                },
                "meta": {"paging": {"total": 3, "limit": 2}},
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = AppStoreConnect::new(client(&server, Some("abc")));
    let mut query = ListDevicesQuery {
        limit: Some(2),
        ..Default::default()
    };
    query.filter.status = vec![DeviceStatus::Enabled];

    let devices = api.provisioning.list_devices(&query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(devices.data.len(), 1);
    let attributes = devices.data[0].attributes.as_ref().unwrap();
    assert_eq!(attributes.status, Some(DeviceStatus::Enabled));
    assert_eq!(
        attributes.added_date.map(|d| d.timestamp()),
        Some(1654084800)
    );
    assert_eq!(
        devices.next_page().map(|u| u.as_str()),
        Some("https://api.appstoreconnect.apple.com/v1/devices?cursor=Ag")
    );
}

#[tokio::test]
async fn typed_attributes_keep_server_text() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/devices/D1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": {
                    "id": "D1",
                    "type": "devices",
                    "attributes": {
                        "name": "QA:iPhone",
                        "model": "2024-01-02",
                        "udid": "HTTPS://Example.com",
                        "addedDate": "2024-01-02T03:04:05.000+0000",
                    },
                },
            })
            .to_string(),
        )
        .create_async()
        .await;

    let device = AppStoreConnect::new(client(&server, Some("abc")))
        .provisioning
        .get_device("D1", &DeviceFields::default())
        .await
        .unwrap();

    let attributes = device.data.attributes.unwrap();
    assert_eq!(attributes.name.as_deref(), Some("QA:iPhone"));
    assert_eq!(attributes.model.as_deref(), Some("2024-01-02"));
    assert_eq!(attributes.udid.as_deref(), Some("HTTPS://Example.com"));
    assert_eq!(
        attributes.added_date.map(|d| d.timestamp()),
        Some(1704164645)
    );
}

#[tokio::test]
async fn delete_with_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/builds/B1/relationships/individualTesters")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "data": [
                {"id": "T1", "type": "betaTesters"},
                {"id": "T2", "type": "betaTesters"},
            ],
        })))
        .with_status(204)
        .create_async()
        .await;

    AppStoreConnect::new(client(&server, Some("abc")))
        .testflight
        .remove_build_individual_testers("B1", &["T1".into(), "T2".into()])
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn build_tester_notification() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/buildBetaNotifications")
        .match_body(Matcher::Json(json!({
            "data": {
                "type": "buildBetaNotifications",
                "relationships": {"build": {"data": {"id": "B1", "type": "builds"}}},
            },
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"id":"N1","type":"buildBetaNotifications"}}"#)
        .create_async()
        .await;

    let doc = AppStoreConnect::new(client(&server, Some("abc")))
        .testflight
        .notify_build_testers("B1")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(doc.data.id, "N1");
}

#[tokio::test]
async fn beta_review_submission() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/betaAppReviewSubmissions")
        .match_body(Matcher::Json(json!({
            "data": {
                "type": "betaAppReviewSubmissions",
                "relationships": {"build": {"data": {"id": "B1", "type": "builds"}}},
            },
        })))
        .with_status(201)
        .with_body(
            json!({
                "data": {
                    "id": "S1",
                    "type": "betaAppReviewSubmissions",
                    "attributes": {"betaReviewState": "WAITING_FOR_REVIEW"},
                },
            })
            .to_string(),
        )
        .create_async()
        .await;

    let doc = AppStoreConnect::new(client(&server, Some("abc")))
        .testflight
        .submit_for_beta_review("B1")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        doc.data.attributes.and_then(|a| a.beta_review_state),
        Some(BetaReviewState::WaitingForReview)
    );
}

#[tokio::test]
async fn call_json_decodes() {
    #[derive(serde::Deserialize)]
    struct Doc {
        data: Vec<serde_json::Value>,
    }

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users")
        .with_status(200)
        .with_body(r#"{"data":[{"id":"U1","type":"users"}]}"#)
        .create_async()
        .await;

    let doc: Doc = client(&server, None)
        .call_json(Method::GET, "/users", CallOptions::new())
        .await
        .unwrap();

    assert_eq!(doc.data.len(), 1);
}

#[tokio::test]
async fn transport_error() {
    let client = ApiClient::builder()
        .base_url("http://127.0.0.1:1/v1")
        .build()
        .unwrap();

    let err = client.get("/apps", CallOptions::new()).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}
