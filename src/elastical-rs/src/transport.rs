use std::time::Duration;

use async_trait::async_trait;
use elastical_core::{Method, Request};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::Result;

/// Status and body of a server reply, kept alongside every parsed result
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

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Parsed result plus the raw response it came from
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub result: T,
    pub raw: RawResponse,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> T {
        self.result
    }
}

/// Sends a built request and returns whatever the server answered.
///
/// Implementations must not interpret the status code.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request, timeout: Duration) -> Result<RawResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
        }
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request, timeout: Duration) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(http_method(request.method), request.url)
            .timeout(timeout);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
