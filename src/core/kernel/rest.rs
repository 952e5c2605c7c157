use crate::core::errors::PexError;
use crate::core::kernel::auth::Authorization;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, trace};

/// A single outbound API call.
///
/// Authorization travels with the request rather than living on the
/// client, so every call is independently authorized.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub authorization: Authorization,
    pub body: Option<Value>,
}

impl RestRequest {
    pub fn new(method: Method, endpoint: impl Into<String>, authorization: Authorization) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            authorization,
            body: None,
        }
    }

    pub fn get(endpoint: impl Into<String>, authorization: Authorization) -> Self {
        Self::new(Method::GET, endpoint, authorization)
    }

    pub fn post(endpoint: impl Into<String>, authorization: Authorization) -> Self {
        Self::new(Method::POST, endpoint, authorization)
    }

    pub fn put(endpoint: impl Into<String>, authorization: Authorization) -> Self {
        Self::new(Method::PUT, endpoint, authorization)
    }

    pub fn delete(endpoint: impl Into<String>, authorization: Authorization) -> Self {
        Self::new(Method::DELETE, endpoint, authorization)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a query parameter by name
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and untouched body text of a completed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// REST transport used by the API layer.
///
/// Implementations perform exactly one round trip per call: no retries,
/// no caching, and no state carried between calls.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Dispatch a request and return the raw outcome
    async fn execute(&self, request: RestRequest) -> Result<RawResponse, PexError>;

    /// Make a GET request
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, String)],
        authorization: Authorization,
    ) -> Result<RawResponse, PexError> {
        let mut request = RestRequest::get(endpoint, authorization);
        for (key, value) in query_params {
            request = request.with_query(*key, value.clone());
        }
        self.execute(request).await
    }

    /// Make a POST request with an optional JSON body
    async fn post(
        &self,
        endpoint: &str,
        body: Option<Value>,
        authorization: Authorization,
    ) -> Result<RawResponse, PexError> {
        let mut request = RestRequest::post(endpoint, authorization);
        request.body = body;
        self.execute(request).await
    }

    /// Make a PUT request with a JSON body
    async fn put(
        &self,
        endpoint: &str,
        body: Value,
        authorization: Authorization,
    ) -> Result<RawResponse, PexError> {
        self.execute(RestRequest::put(endpoint, authorization).with_body(body))
            .await
    }

    /// Make a DELETE request
    async fn delete(
        &self,
        endpoint: &str,
        authorization: Authorization,
    ) -> Result<RawResponse, PexError> {
        self.execute(RestRequest::delete(endpoint, authorization))
            .await
    }
}

#[async_trait]
impl<R: RestClient + ?Sized> RestClient for Arc<R> {
    async fn execute(&self, request: RestRequest) -> Result<RawResponse, PexError> {
        (**self).execute(request).await
    }
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API, without a trailing slash
    pub base_url: String,
    /// Client name for logging and tracing
    pub client_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(base_url: String, client_name: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_name,
            timeout_seconds: 30,
            user_agent: format!("pexcard-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    /// Build the REST client
    ///
    /// The underlying `reqwest::Client` is built without default
    /// credentials; authorization is attached per request.
    pub fn build(self) -> Result<ReqwestRest, PexError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                PexError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn new(base_url: String, client_name: String) -> Result<Self, PexError> {
        RestClientBuilder::new(RestClientConfig::new(base_url, client_name)).build()
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url,
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(
        skip(self, request),
        fields(
            client = %self.config.client_name,
            method = %request.method,
            endpoint = %request.endpoint,
            status = tracing::field::Empty
        )
    )]
    async fn execute(&self, request: RestRequest) -> Result<RawResponse, PexError> {
        let url = self.build_url(&request.endpoint);
        let mut builder = self.client.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(header) = request.authorization.header_value()? {
            builder = builder.header(AUTHORIZATION, header);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);

        let body = response.text().await?;
        trace!("Response body: {}", body);

        Ok(RawResponse { status, body })
    }
}
