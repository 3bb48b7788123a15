pub mod http;

pub use http::{HttpSource, SourceConfig};

use crate::errors::ToolError;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Configured sources by name, shared across tools.
pub type Sources = HashMap<String, Arc<HttpSource>>;

/// One request issued by the poll engine.
#[derive(Debug, Clone)]
pub struct PollRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HashMap<String, String>,
    /// Bounds this single request, independent of the overall deadline.
    pub timeout: Duration,
}

/// Response surfaced to the poll engine. Non-2xx statuses are data here;
/// classification happens in the engine.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport seam between the poll engine and the HTTP client. Errors from
/// `execute` are transport-level only (connect, DNS, timeout).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &PollRequest) -> Result<HttpResponse, ToolError>;
}
