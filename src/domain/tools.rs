//! Built-in reasoning tools exposed through `tools/call`
//!
//! Both tools are pure string formatters: the same input always yields the
//! same output and nothing is kept between calls.

use serde_json::{Map, Value};

use crate::domain::{
    registry::{Tool, ToolRegistry},
    schema::SchemaDefinition,
};
use crate::errors::{RegistryError, ToolError};

pub const DYNAMIC_THOUGHT_BRANCHING: &str = "dynamic_thought_branching";
pub const HYPOTHESIS_GENERATION: &str = "hypothesis_generation";

pub fn dynamic_thought_branching() -> Tool {
    Tool::new(DYNAMIC_THOUGHT_BRANCHING, branch_thought).with_schema(SchemaDefinition::object(
        [("thought", SchemaDefinition::String)],
        ["thought"],
    ))
}

pub fn hypothesis_generation() -> Tool {
    Tool::new(HYPOTHESIS_GENERATION, generate_hypothesis).with_schema(SchemaDefinition::object(
        [("context", SchemaDefinition::String)],
        ["context"],
    ))
}

/// Registry holding the built-in tools, in their advertised order.
pub fn builtin_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    registry.register(dynamic_thought_branching())?;
    registry.register(hypothesis_generation())?;
    Ok(registry)
}

fn branch_thought(params: Map<String, Value>) -> Result<Value, ToolError> {
    let thought = string_param(&params, "thought")?;
    tracing::debug!(thought, "branching thought");
    Ok(Value::String(format!("Branching thought: {thought}")))
}

fn generate_hypothesis(params: Map<String, Value>) -> Result<Value, ToolError> {
    let context = string_param(&params, "context")?;
    tracing::debug!(context, "generating hypothesis");
    Ok(Value::String(format!(
        "Generating hypothesis for context: {context}"
    )))
}

fn string_param<'a>(params: &'a Map<String, Value>, name: &str) -> Result<&'a str, ToolError> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::execution(format!("{name} must be a string")))
}
