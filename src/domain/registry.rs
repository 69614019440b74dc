//! Registered tools and the registry that owns them
//!
//! The registry is built once at startup and shared read-only behind an `Arc`,
//! so lookups need no locking.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::schema::{compile, CompiledValidator, SchemaDefinition};
use crate::errors::{RegistryError, ToolError};

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, params: Map<String, Value>) -> Result<Value, ToolError>;
}

#[async_trait]
impl<F> ToolHandler for F
where
    F: Fn(Map<String, Value>) -> Result<Value, ToolError> + Send + Sync,
{
    async fn call(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        self(params)
    }
}

#[derive(Clone)]
pub struct Tool {
    name: String,
    parameter_schema: Option<SchemaDefinition>,
    handler: Arc<dyn ToolHandler>,
}

/// A tool that passed registration, with its schema already compiled.
#[derive(Clone)]
pub struct RegisteredTool {
    tool: Tool,
    validator: Option<CompiledValidator>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor<'a> {
    pub name: &'a str,
    pub parameter_schema: Option<&'a SchemaDefinition>,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl Tool {
    pub fn new(name: impl Into<String>, handler: impl ToolHandler + 'static) -> Self {
        Self {
            name: name.into(),
            parameter_schema: None,
            handler: Arc::new(handler),
        }
    }

    pub fn with_schema(mut self, schema: SchemaDefinition) -> Self {
        self.parameter_schema = Some(schema);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_schema(&self) -> Option<&SchemaDefinition> {
        self.parameter_schema.as_ref()
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("parameter_schema", &self.parameter_schema)
            .finish_non_exhaustive()
    }
}

impl RegisteredTool {
    pub fn name(&self) -> &str {
        self.tool.name()
    }

    pub fn parameter_schema(&self) -> Option<&SchemaDefinition> {
        self.tool.parameter_schema()
    }

    pub fn validator(&self) -> Option<&CompiledValidator> {
        self.validator.as_ref()
    }

    pub fn handler(&self) -> Arc<dyn ToolHandler> {
        Arc::clone(&self.tool.handler)
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Tool) -> Result<(), RegistryError> {
        if self.index.contains_key(tool.name()) {
            return Err(RegistryError::DuplicateTool(tool.name.clone()));
        }

        let validator = tool
            .parameter_schema()
            .map(compile)
            .transpose()
            .map_err(|source| RegistryError::InvalidSchema {
                tool: tool.name.clone(),
                source,
            })?;

        self.index.insert(tool.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool { tool, validator });
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|position| &self.tools[*position])
    }

    /// Tool descriptors in registration order.
    pub fn list_all(&self) -> Vec<ToolDescriptor<'_>> {
        self.tools
            .iter()
            .map(|registered| ToolDescriptor {
                name: registered.name(),
                parameter_schema: registered.parameter_schema(),
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(RegisteredTool::name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
