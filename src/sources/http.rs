use crate::errors::ToolError;
use crate::sources::{HttpResponse, PollRequest, Transport};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

/// Configuration surface for an `http` source, as supplied by the external
/// config-loading layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    pub base_url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// An HTTP source: base URL, default headers, and one shared client whose
/// pool is borrowed per request. Tools apply their own stricter per-request
/// timeout on the request itself; the client is never reconfigured.
pub struct HttpSource {
    base_url: String,
    default_headers: HashMap<String, String>,
    client: Client,
}

impl HttpSource {
    pub fn new(config: SourceConfig) -> Result<Self, ToolError> {
        let client = Client::builder()
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            base_url: config.base_url,
            default_headers: config.headers,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }
}

#[async_trait]
impl Transport for HttpSource {
    async fn execute(&self, request: &PollRequest) -> Result<HttpResponse, ToolError> {
        let headers = headers_to_headermap(&request.headers)?;
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(headers)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok(HttpResponse { status, body })
    }
}

fn headers_to_headermap(headers: &HashMap<String, String>) -> Result<HeaderMap, ToolError> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| ToolError::invalid_params(format!("Invalid header name {:?}", key)))?;
        let val = HeaderValue::from_str(value)
            .map_err(|_| ToolError::invalid_params(format!("Invalid header value for {:?}", key)))?;
        map.insert(name, val);
    }
    Ok(map)
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        return ToolError::transport("HTTP request timed out");
    }
    ToolError::transport(err.to_string())
}
