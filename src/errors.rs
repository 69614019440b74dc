use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::domain::schema::{FieldError, SchemaError};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Every way a single request can fail once it reaches the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),
    #[error("unknown method `{0}`")]
    UnknownMethod(String),
    #[error("unknown tool `{0}`")]
    UnknownTool(String),
    #[error("invalid params: {} violation(s)", .0.len())]
    ParamValidationFailed(Vec<FieldError>),
    #[error("tool handler fault: {0}")]
    HandlerFault(String),
}

impl DispatchError {
    pub fn code(&self) -> i64 {
        match self {
            Self::MalformedEnvelope(_) => INVALID_REQUEST,
            Self::UnknownMethod(_) | Self::UnknownTool(_) => METHOD_NOT_FOUND,
            Self::ParamValidationFailed(_) => INVALID_PARAMS,
            Self::HandlerFault(_) => INTERNAL_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MalformedEnvelope(_) => "Invalid Request",
            Self::UnknownMethod(_) => "Method not found",
            Self::UnknownTool(_) => "Tool not found",
            Self::ParamValidationFailed(_) => "Invalid params",
            Self::HandlerFault(_) => "Internal error",
        }
    }

    pub fn data(&self) -> Option<Value> {
        match self {
            Self::ParamValidationFailed(errors) => serde_json::to_value(errors).ok(),
            Self::HandlerFault(description) => Some(Value::String(description.clone())),
            Self::MalformedEnvelope(_) | Self::UnknownMethod(_) | Self::UnknownTool(_) => None,
        }
    }
}

impl From<ToolError> for DispatchError {
    fn from(err: ToolError) -> Self {
        Self::HandlerFault(err.to_string())
    }
}

/// Failure raised while a tool handler runs.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Execution(String),
    #[error("tool execution timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
    #[error("tool handler panicked")]
    Panicked,
    #[error("tool handler was cancelled")]
    Cancelled,
}

impl ToolError {
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool `{0}` is already registered")]
    DuplicateTool(String),
    #[error("tool `{tool}` declares an invalid parameter schema: {source}")]
    InvalidSchema {
        tool: String,
        #[source]
        source: SchemaError,
    },
}
