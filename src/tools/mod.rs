pub mod manifest;
pub mod params;
pub mod poll;
pub mod registry;
pub mod wait_for_operation;

use crate::errors::ToolError;
use crate::tools::manifest::{Manifest, McpManifest};
use async_trait::async_trait;
use serde_json::Value;

/// Runtime interface exposed to the invocation dispatcher.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Static discovery data; no runtime behavior.
    fn manifest(&self) -> &Manifest;

    fn mcp_manifest(&self) -> &McpManifest;

    fn authorized(&self, verified_services: &[String]) -> bool {
        is_authorized(&self.manifest().auth_required, verified_services)
    }

    /// Runs the tool. On success the result is a sequence of JSON values;
    /// for the wait tool, a single element holding the final response body
    /// as text.
    async fn invoke(&self, args: Value) -> Result<Vec<Value>, ToolError>;
}

/// A tool with no auth requirements is open; otherwise at least one
/// required service must have been verified.
pub fn is_authorized(auth_required: &[String], verified_services: &[String]) -> bool {
    if auth_required.is_empty() {
        return true;
    }
    auth_required
        .iter()
        .any(|required| verified_services.contains(required))
}

#[cfg(test)]
mod tests {
    use super::is_authorized;

    #[test]
    fn open_tool_needs_no_verified_services() {
        assert!(is_authorized(&[], &[]));
    }

    #[test]
    fn any_matching_service_authorizes() {
        let required = vec!["google".to_string(), "github".to_string()];
        assert!(is_authorized(&required, &["github".to_string()]));
        assert!(!is_authorized(&required, &["gitlab".to_string()]));
    }
}
