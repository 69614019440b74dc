//! JSON-RPC 2.0 envelope types
//!
//! Provides parsing of the request envelope and the response shapes the
//! dispatcher emits. Exactly one of `result` / `error` is ever serialized.

use serde::Serialize;
use serde_json::Value;

use crate::errors::{DispatchError, PARSE_ERROR};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub params: Option<Value>,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(RpcError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// JSON-RPC error code of a failed call, attached to the HTTP response so
/// the request logging layer can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcErrorCode(pub i64);

impl Request {
    /// Checks the envelope and splits it into its parts.
    ///
    /// Only a non-object payload or a missing or unsupported `jsonrpc` version
    /// is a `MalformedEnvelope`; the caller answers it with `id: null` because
    /// the id of a malformed envelope is not trusted. A missing or non-string
    /// `method` is kept as an empty name so that method resolution rejects it
    /// with the id echoed.
    pub fn from_value(payload: Value) -> Result<Self, DispatchError> {
        let Value::Object(mut envelope) = payload else {
            return Err(DispatchError::MalformedEnvelope("request is not a JSON object"));
        };

        match envelope.get("jsonrpc").and_then(Value::as_str) {
            Some(JSONRPC_VERSION) => {}
            Some(_) => return Err(DispatchError::MalformedEnvelope("unsupported jsonrpc version")),
            None => return Err(DispatchError::MalformedEnvelope("jsonrpc version is missing")),
        }

        let method = match envelope.remove("method") {
            Some(Value::String(method)) => method,
            _ => String::new(),
        };

        Ok(Self {
            method,
            params: envelope.remove("params").filter(|params| !params.is_null()),
            id: envelope.remove("id").unwrap_or(Value::Null),
        })
    }
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            outcome: Outcome::Result(result),
            id,
        }
    }

    pub fn failure(id: Value, error: &DispatchError) -> Self {
        Self::error(id, error.code(), error.message(), error.data())
    }

    pub fn error(id: Value, code: i64, message: &str, data: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            outcome: Outcome::Error(RpcError {
                code,
                message: message.to_string(),
                data,
            }),
            id,
        }
    }

    /// Answer for a body that is not valid JSON at all.
    pub fn parse_error() -> Self {
        Self::error(Value::Null, PARSE_ERROR, "Parse error", None)
    }

    pub fn error_code(&self) -> Option<i64> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(error) => Some(error.code),
        }
    }
}
