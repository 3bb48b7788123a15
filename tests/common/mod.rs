use opwait::sources::{HttpSource, SourceConfig, Sources};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub const SOURCE_NAME: &str = "status-api";

pub fn sources_for(base_url: &str) -> Sources {
    sources_with_headers(base_url, HashMap::new())
}

pub fn sources_with_headers(base_url: &str, headers: HashMap<String, String>) -> Sources {
    let source = HttpSource::new(SourceConfig {
        base_url: base_url.to_string(),
        headers,
    })
    .expect("http source builds");
    let mut sources = Sources::new();
    sources.insert(SOURCE_NAME.to_string(), Arc::new(source));
    sources
}

/// Wait tool config polling `/operations/{{.opId}}` with millisecond-scale
/// backoff so tests finish quickly.
pub fn fast_wait_config() -> Value {
    json!({
        "source": SOURCE_NAME,
        "description": "Waits for an operation to complete",
        "method": "GET",
        "path": "/operations/{{.opId}}",
        "pathParams": [
            {"name": "opId", "type": "string", "description": "The operation ID"}
        ],
        "poll": {
            "initialDelayMs": 10,
            "maxDelayMs": 40,
            "maxRetries": 5,
            "deadlineMs": 5000,
            "requestTimeoutMs": 1000
        }
    })
}
