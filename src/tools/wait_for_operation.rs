use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::sources::{HttpSource, PollRequest, Sources};
use crate::tools::manifest::{Manifest, McpManifest};
use crate::tools::params::{manifest_for, ParameterSpec};
use crate::tools::poll::{PollEngine, PollOverrides, PollPolicy};
use crate::tools::Tool;
use crate::utils::request::{build_headers, build_url};
use crate::utils::template::validate_placeholders;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub const KIND: &str = "wait-for-operation";

/// Declarative configuration for one wait-for-operation tool, as produced
/// by the external config-loading layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitForOperationConfig {
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub auth_required: Vec<String>,
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub path_params: Vec<ParameterSpec>,
    #[serde(default)]
    pub header_params: Vec<ParameterSpec>,
    #[serde(default)]
    pub poll: PollOverrides,
}

/// Polls a status endpoint until the operation reports `done`, a terminal
/// error, the overall deadline, or retry exhaustion. Immutable after
/// construction and safe to share across concurrent invocations; all
/// per-invocation state lives inside `invoke`.
pub struct WaitForOperationTool {
    name: String,
    path: String,
    method: Method,
    headers: HashMap<String, String>,
    path_params: Vec<ParameterSpec>,
    header_params: Vec<ParameterSpec>,
    all_params: Vec<ParameterSpec>,
    policy: PollPolicy,
    source: Arc<HttpSource>,
    validation: Validation,
    logger: Logger,
    manifest: Manifest,
    mcp_manifest: McpManifest,
}

impl WaitForOperationTool {
    pub fn from_config(
        name: &str,
        config: WaitForOperationConfig,
        sources: &Sources,
    ) -> Result<Self, ToolError> {
        let source = sources.get(&config.source).cloned().ok_or_else(|| {
            ToolError::config(format!("No source named {:?} configured", config.source))
        })?;

        let method = Method::from_bytes(config.method.to_uppercase().as_bytes())
            .map_err(|_| ToolError::config(format!("Invalid HTTP method {:?}", config.method)))?;

        // A broken path template is a config defect; reject it here
        // rather than on the first invocation.
        validate_placeholders(&config.path)
            .map_err(|err| ToolError::config(format!("Invalid path template: {}", err.message)))?;

        // Source defaults sit under the tool's static headers.
        let mut headers = source.default_headers().clone();
        headers.extend(config.headers);

        let mut all_params = config.path_params.clone();
        all_params.extend(config.header_params.iter().cloned());

        let manifest = Manifest {
            description: config.description.clone(),
            parameters: manifest_for(&all_params),
            auth_required: config.auth_required,
        };
        let mcp_manifest = McpManifest::new(name, &config.description, &all_params);

        Ok(Self {
            name: name.to_string(),
            path: config.path,
            method,
            headers,
            path_params: config.path_params,
            header_params: config.header_params,
            all_params,
            policy: PollPolicy::with_overrides(&config.poll)?,
            source,
            validation: Validation::new(),
            logger: Logger::new("tools").child(name),
            manifest,
            mcp_manifest,
        })
    }
}

#[async_trait]
impl Tool for WaitForOperationTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn mcp_manifest(&self) -> &McpManifest {
        &self.mcp_manifest
    }

    async fn invoke(&self, args: Value) -> Result<Vec<Value>, ToolError> {
        let args = self.validation.validate_args(&self.all_params, &args)?;

        // The URL is fixed for the whole invocation; build it once so a
        // malformed result fails before the first round.
        let url = build_url(
            self.source.base_url(),
            &self.path,
            &self.path_params,
            &[],
            &BTreeMap::new(),
            &args,
        )?;

        let engine = PollEngine::new(self.source.as_ref(), &self.policy, &self.logger);
        let body = engine
            .run(|| {
                let headers = build_headers(&self.headers, &self.header_params, &args)?;
                Ok(PollRequest {
                    method: self.method.clone(),
                    url: url.clone(),
                    headers,
                    timeout: self.policy.request_timeout,
                })
            })
            .await?;

        Ok(vec![Value::String(body)])
    }
}
