// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTTP call adapter.
//!
//! [ApiClient] turns a verb, a path relative to the API base URL, and
//! [CallOptions] into exactly one HTTP request, then hands the response to
//! [crate::response::normalize]. There is no retry and no token refresh.

use {
    crate::{
        query,
        response::{normalize, ContentType, Normalized, RawResponse},
        value::{NoopReviver, Reviver, UrlThenDateReviver},
        Error, Result,
    },
    reqwest::{header, Client, ClientBuilder, Method},
    serde::{de::DeserializeOwned, Serialize},
    serde_json::Value as JsonValue,
    std::{sync::Arc, time::Duration},
    url::Url,
};

/// Base URL of version 1 of the App Store Connect API.
pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

const USER_AGENT: &str = "asconnect crate (https://crates.io/crates/asconnect)";

/// Where calls go and who makes them.
///
/// Created once and shared read-only between all calls.
#[derive(Clone, Debug)]
pub struct ApiContext {
    base_url: Url,
    token: Option<String>,
}

impl ApiContext {
    pub fn new(base_url: Url, token: Option<String>) -> Self {
        Self { base_url, token }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Resolve a path relative to the base URL.
    ///
    /// The path is appended textually, so the base URL's own path is kept.
    pub fn url(&self, path: &str, query: Option<&str>) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');

        let mut url = Url::parse(&format!("{base}/{path}"))?;
        url.set_query(query);

        Ok(url)
    }
}

/// Per-call options.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    query: Option<JsonValue>,
    body: Option<JsonValue>,
    content_type: ContentType,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach query parameters.
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Result<Self> {
        self.query = Some(serde_json::to_value(query).map_err(Error::Serialization)?);
        Ok(self)
    }

    /// Attach a JSON request body.
    pub fn body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(Error::Serialization)?);
        Ok(self)
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn query_string(&self) -> Option<String> {
        self.query.as_ref().and_then(query::to_query_string)
    }
}

/// Builder for [ApiClient].
pub struct ApiClientBuilder {
    base_url: String,
    token: Option<String>,
    user_agent: String,
    timeout: Option<Duration>,
    reviver: Arc<dyn Reviver>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            user_agent: USER_AGENT.to_string(),
            timeout: None,
            reviver: Arc::new(UrlThenDateReviver),
        }
    }
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: impl ToString) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Bearer token sent with every request. No token means anonymous calls.
    pub fn token(mut self, token: impl ToString) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn user_agent(mut self, user_agent: impl ToString) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Timeout applied to each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the transform applied to string leaves of JSON responses.
    pub fn reviver(mut self, reviver: impl Reviver + 'static) -> Self {
        self.reviver = Arc::new(reviver);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let mut builder = ClientBuilder::default().user_agent(self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ApiClient {
            client: builder.build()?,
            context: Arc::new(ApiContext::new(Url::parse(&self.base_url)?, self.token)),
            reviver: self.reviver,
        })
    }
}

/// A client for the App Store Connect API.
///
/// Cheap to clone. Clones share the connection pool and the [ApiContext].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    context: Arc<ApiContext>,
    reviver: Arc<dyn Reviver>,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Create a client against the default base URL.
    pub fn new(token: Option<String>) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(token) = token {
            builder = builder.token(token);
        }

        builder.build()
    }

    pub fn context(&self) -> &ApiContext {
        &self.context
    }

    /// Issue a single request and normalize the response.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        options: CallOptions,
    ) -> Result<Normalized> {
        let raw = self.execute(method, path, &options).await?;

        normalize(raw, options.content_type, self.reviver.as_ref())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        options: &CallOptions,
    ) -> Result<RawResponse> {
        let query = options.query_string();
        let url = self.context.url(path, query.as_deref())?;
        let mime_type = options.content_type.mime_type();

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(header::ACCEPT, mime_type)
            .header(header::CONTENT_TYPE, mime_type);

        if let Some(token) = self.context.token() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = &options.body {
            let body = serde_json::to_vec(body).map_err(Error::Serialization)?;
            log::trace!("request body: {}", String::from_utf8_lossy(&body));
            request = request.body(body);
        }

        log::debug!("{} {}", method, url);

        let response = self.client.execute(request.build()?).await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?;

        log::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        if options.content_type == ContentType::Json {
            log::trace!("response body: {}", String::from_utf8_lossy(&body));
        }

        Ok(RawResponse {
            status_code: status.as_u16(),
            status_message: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }

    pub async fn head(&self, path: &str, options: CallOptions) -> Result<Normalized> {
        self.call(Method::HEAD, path, options).await
    }

    pub async fn get(&self, path: &str, options: CallOptions) -> Result<Normalized> {
        self.call(Method::GET, path, options).await
    }

    pub async fn post(&self, path: &str, options: CallOptions) -> Result<Normalized> {
        self.call(Method::POST, path, options).await
    }

    pub async fn put(&self, path: &str, options: CallOptions) -> Result<Normalized> {
        self.call(Method::PUT, path, options).await
    }

    pub async fn patch(&self, path: &str, options: CallOptions) -> Result<Normalized> {
        self.call(Method::PATCH, path, options).await
    }

    pub async fn delete(&self, path: &str, options: CallOptions) -> Result<Normalized> {
        self.call(Method::DELETE, path, options).await
    }

    /// Issue a request and decode the response into `T`.
    ///
    /// The reviver is bypassed, so `T` sees string leaves exactly as sent.
    /// Typed date fields parse themselves with
    /// [crate::value::deserialize_optional_datetime].
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: CallOptions,
    ) -> Result<T> {
        let raw = self.execute(method, path, &options).await?;

        normalize(raw, options.content_type, &NoopReviver)?.decode()
    }

    /// `GET` with optional query parameters, decoding into `T`.
    pub(crate) async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let mut options = CallOptions::new();
        if let Some(query) = query {
            options = options.query(query)?;
        }

        self.call_json(Method::GET, path, options).await
    }

    /// Send a JSON body with `method`, decoding the response into `T`.
    pub(crate) async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.call_json(method, path, CallOptions::new().body(body)?)
            .await
    }

    /// Issue a request whose response carries nothing of interest.
    pub(crate) async fn send_void<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()> {
        let mut options = CallOptions::new();
        if let Some(body) = body {
            options = options.body(body)?;
        }

        self.call(method, path, options).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn resolve_urls() {
        let context = ApiContext::new(Url::parse(DEFAULT_BASE_URL).unwrap(), None);

        assert_eq!(
            context.url("/devices", None).unwrap().as_str(),
            "https://api.appstoreconnect.apple.com/v1/devices"
        );
        assert_eq!(
            context
                .url("/devices/ABC", Some("fields[devices]=name&limit=5"))
                .unwrap()
                .as_str(),
            "https://api.appstoreconnect.apple.com/v1/devices/ABC?fields[devices]=name&limit=5"
        );
        assert_eq!(
            context.url("profiles/", None).unwrap().as_str(),
            "https://api.appstoreconnect.apple.com/v1/profiles/"
        );

        let context = ApiContext::new(Url::parse("http://127.0.0.1:1234/").unwrap(), None);
        assert_eq!(
            context.url("/builds", None).unwrap().as_str(),
            "http://127.0.0.1:1234/builds"
        );
    }

    #[test]
    fn call_options() {
        let options = CallOptions::new()
            .query(&json!({"filter": {"id": ["1", "2"]}, "limit": 5}))
            .unwrap()
            .content_type(ContentType::Gzip);

        assert_eq!(
            options.query_string().as_deref(),
            Some("filter[id]=1&filter[id]=2&limit=5")
        );
        assert_eq!(options.content_type, ContentType::Gzip);
        assert!(CallOptions::new().query_string().is_none());
    }

    #[test]
    fn builder() {
        let client = ApiClient::builder()
            .base_url("http://localhost:8080/v1")
            .token("abc")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(client.context().token(), Some("abc"));
        assert_eq!(client.context().base_url().as_str(), "http://localhost:8080/v1");

        assert!(matches!(
            ApiClient::builder().base_url("not a url").build(),
            Err(Error::InvalidUrl(_))
        ));
    }
}
