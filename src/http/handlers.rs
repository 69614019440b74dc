//! Axum HTTP handlers for the web server
//!
//! Provides the JSON-RPC tool endpoint plus health and server info endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::mcp::rpc;
use crate::{AppState, HEALTH_PATH, MCP_PATH};

pub const SERVER_NAME: &str = "Sequential Thinking MCP Server";
pub const SERVER_DESCRIPTION: &str =
    "A server for AI sequential thinking processes using thought branching and dynamic hypothesis generation";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub log_level: String,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct ServerInfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Endpoints,
    pub tools: Vec<String>,
    pub configuration: Configuration,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub mcp: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub log_level: String,
    pub environment: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    tracing::debug!("health check requested");
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: env!("CARGO_PKG_VERSION"),
        log_level: state.log_level.to_string(),
        environment: state.environment.to_string(),
    })
}

pub async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    tracing::debug!("server info requested");
    Json(ServerInfoResponse {
        name: SERVER_NAME,
        version: env!("CARGO_PKG_VERSION"),
        description: SERVER_DESCRIPTION,
        endpoints: Endpoints {
            health: HEALTH_PATH,
            mcp: MCP_PATH,
        },
        tools: state
            .dispatcher
            .registry()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        configuration: Configuration {
            log_level: state.log_level.to_string(),
            environment: state.environment.to_string(),
        },
    })
}

pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "request body is not valid json");
            return into_http(rpc::Response::parse_error());
        }
    };

    into_http(state.dispatcher.handle(payload).await)
}

fn into_http(response: rpc::Response) -> Response {
    let code = response.error_code();
    let mut http = (status_for(&response), Json(response)).into_response();
    if let Some(code) = code {
        http.extensions_mut().insert(rpc::RpcErrorCode(code));
    }
    http
}

/// HTTP status carried alongside a JSON-RPC response.
pub fn status_for(response: &rpc::Response) -> StatusCode {
    match response.error_code() {
        None => StatusCode::OK,
        Some(PARSE_ERROR | INVALID_REQUEST | INVALID_PARAMS) => StatusCode::BAD_REQUEST,
        Some(METHOD_NOT_FOUND) => StatusCode::NOT_FOUND,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
