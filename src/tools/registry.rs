use crate::errors::ToolError;
use crate::sources::Sources;
use crate::tools::wait_for_operation::{self, WaitForOperationConfig, WaitForOperationTool};
use crate::tools::Tool;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub type ToolConstructor =
    fn(name: &str, config: Value, sources: &Sources) -> Result<Arc<dyn Tool>, ToolError>;

/// Explicit kind-name to constructor mapping. Populated by a startup
/// registration list; there are no import-time side effects.
pub struct ToolRegistry {
    constructors: HashMap<&'static str, ToolConstructor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Result<Self, ToolError> {
        let mut registry = Self::new();
        registry.register(wait_for_operation::KIND, build_wait_for_operation)?;
        Ok(registry)
    }

    pub fn register(&mut self, kind: &'static str, ctor: ToolConstructor) -> Result<(), ToolError> {
        if self.constructors.insert(kind, ctor).is_some() {
            return Err(ToolError::config(format!(
                "Tool kind {:?} already registered",
                kind
            )));
        }
        Ok(())
    }

    pub fn build(
        &self,
        kind: &str,
        name: &str,
        config: Value,
        sources: &Sources,
    ) -> Result<Arc<dyn Tool>, ToolError> {
        let ctor = self
            .constructors
            .get(kind)
            .ok_or_else(|| ToolError::config(format!("Unknown tool kind {:?}", kind)))?;
        ctor(name, config, sources)
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<&'static str> = self.constructors.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }
}

fn build_wait_for_operation(
    name: &str,
    config: Value,
    sources: &Sources,
) -> Result<Arc<dyn Tool>, ToolError> {
    let config: WaitForOperationConfig = serde_json::from_value(config).map_err(|err| {
        ToolError::config(format!("Invalid wait-for-operation config: {}", err))
    })?;
    Ok(Arc::new(WaitForOperationTool::from_config(
        name, config, sources,
    )?))
}
