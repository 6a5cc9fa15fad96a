//! Tools exposed to delivery agents

pub mod ctm;
pub mod tracking;

pub use ctm::{BookCtmTransportTool, EstimateIntercityEtaTool, GetIntercityRoutesTool};
pub use tracking::{GetParcelHistoryTool, GetParcelStatusTool, UpdateParcelStatusTool};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use parceltrack_tracking::TrackingStore;

use crate::network::RouteTable;
use crate::AgentError;

type BoxedTool = Box<dyn ToolTrait + Send + Sync>;

#[async_trait]
pub trait ToolTrait: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the arguments
    fn parameters(&self) -> Value;
    async fn execute(
        &self,
        args: Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Function-calling description of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

pub fn to_definition(tool: &dyn ToolTrait) -> ToolDefinition {
    ToolDefinition::new(tool.name(), tool.description(), tool.parameters())
}

pub struct ToolRegistry {
    tools: HashMap<String, BoxedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register<T: ToolTrait + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&(dyn ToolTrait + Send + Sync)> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Definitions of all tools, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|t| to_definition(t.as_ref()))
            .collect();
        definitions.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        definitions
    }

    pub async fn execute(
        &self,
        name: &str,
        args: Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;
        tool.execute(args).await
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the tracking and intercity tools over a shared store
pub fn register_default_tools(registry: &mut ToolRegistry, store: TrackingStore, routes: RouteTable) {
    // Tracking tools
    registry.register(UpdateParcelStatusTool::new(store.clone()));
    registry.register(GetParcelStatusTool::new(store.clone()));
    registry.register(GetParcelHistoryTool::new(store.clone()));

    // Intercity tools
    registry.register(GetIntercityRoutesTool::new(routes.clone()));
    registry.register(EstimateIntercityEtaTool::new(routes.clone()));
    registry.register(BookCtmTransportTool::new(routes, store));
}
