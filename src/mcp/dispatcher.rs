//! The JSON-RPC request dispatcher
//!
//! Turns one decoded request body into exactly one response: envelope check,
//! method resolution, tool lookup, parameter validation and tool invocation.
//! Every stage returns a `Result`, and every failure, including a panicking or
//! hung tool handler, ends as a JSON-RPC error response here.

use std::{sync::Arc, time::Duration};

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::domain::registry::{RegisteredTool, ToolRegistry};
use crate::errors::{DispatchError, ToolError};
use crate::mcp::rpc::{Request, Response};

pub const TOOLS_LIST: &str = "tools/list";
pub const TOOLS_CALL: &str = "tools/call";
pub const TOOL_NAME_PARAM: &str = "toolName";

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    tool_timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            tool_timeout: None,
        }
    }

    /// Bounds every tool invocation; `None` lets handlers run indefinitely.
    pub fn with_tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn handle(&self, payload: Value) -> Response {
        let request = match Request::from_value(payload) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "rejected json-rpc envelope");
                return Response::failure(Value::Null, &err);
            }
        };

        debug!(method = %request.method, id = %request.id, "mcp request received");

        let Request { method, params, id } = request;
        match self.dispatch(&method, params).await {
            Ok(result) => Response::success(id, result),
            Err(err) => {
                match &err {
                    DispatchError::HandlerFault(_) => {
                        error!(method = %method, id = %id, error = %err, "tool execution failed")
                    }
                    _ => warn!(method = %method, id = %id, error = %err, "mcp dispatch failed"),
                }
                Response::failure(id, &err)
            }
        }
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, DispatchError> {
        match method {
            TOOLS_LIST => self.list_tools(),
            TOOLS_CALL => {
                let params = match params {
                    Some(Value::Object(params)) => params,
                    _ => Map::new(),
                };
                self.call_tool(params).await
            }
            other => Err(DispatchError::UnknownMethod(other.to_string())),
        }
    }

    fn list_tools(&self) -> Result<Value, DispatchError> {
        serde_json::to_value(self.registry.list_all())
            .map_err(|err| DispatchError::HandlerFault(format!("failed to list tools: {err}")))
    }

    async fn call_tool(&self, params: Map<String, Value>) -> Result<Value, DispatchError> {
        let tool = self.resolve_tool(&params)?;

        if let Some(validator) = tool.validator() {
            validator
                .validate_object(&params)
                .map_err(DispatchError::ParamValidationFailed)?;
        }

        self.invoke(tool, params).await
    }

    /// A missing or non-string `toolName` matches no tool.
    fn resolve_tool(&self, params: &Map<String, Value>) -> Result<&RegisteredTool, DispatchError> {
        let Some(name) = params.get(TOOL_NAME_PARAM).and_then(Value::as_str) else {
            return Err(DispatchError::UnknownTool(String::new()));
        };

        self.registry
            .find(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))
    }

    async fn invoke(
        &self,
        tool: &RegisteredTool,
        params: Map<String, Value>,
    ) -> Result<Value, DispatchError> {
        info!(tool = tool.name(), "tool invoked");

        let handler = tool.handler();
        let task = tokio::spawn(async move { handler.call(params).await });
        let abort = task.abort_handle();

        let joined = match self.tool_timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    abort.abort();
                    return Err(ToolError::TimedOut(limit).into());
                }
            },
            None => task.await,
        };

        match joined {
            Ok(outcome) => outcome.map_err(DispatchError::from),
            Err(join_error) if join_error.is_panic() => Err(ToolError::Panicked.into()),
            Err(_) => Err(ToolError::Cancelled.into()),
        }
    }
}
