use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use mcp::dispatcher::Dispatcher;

pub const MCP_PATH: &str = "/api/mcp";
pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub log_level: Arc<str>,
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, log_level: String, environment: String) -> Self {
        Self {
            dispatcher,
            log_level: Arc::<str>::from(log_level),
            environment: Arc::<str>::from(environment),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::server_info))
        .route(HEALTH_PATH, get(http::handlers::health))
        .route(MCP_PATH, post(http::handlers::mcp_endpoint))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::tools::builtin_registry;
    use crate::mcp::rpc::RpcErrorCode;

    use super::*;

    fn app() -> Router {
        let registry = builtin_registry().expect("built-ins register");
        let state = AppState::new(
            Dispatcher::new(Arc::new(registry)),
            "info".to_string(),
            "test".to_string(),
        );
        build_app(state)
    }

    async fn post_mcp(body: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/mcp")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let body_json: Value = serde_json::from_slice(&body).expect("valid json response");
        (status, body_json)
    }

    #[tokio::test]
    async fn health_reports_status_and_configuration() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let body_json: Value = serde_json::from_slice(&body).expect("valid json response");
        assert_eq!(body_json["status"], "healthy");
        assert_eq!(body_json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body_json["logLevel"], "info");
        assert_eq!(body_json["environment"], "test");
        assert!(body_json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn root_lists_endpoints_and_tools() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let body_json: Value = serde_json::from_slice(&body).expect("valid json response");
        assert_eq!(body_json["endpoints"]["mcp"], "/api/mcp");
        assert_eq!(body_json["endpoints"]["health"], "/health");
        assert_eq!(
            body_json["tools"],
            json!(["dynamic_thought_branching", "hypothesis_generation"])
        );
        assert_eq!(body_json["configuration"]["environment"], "test");
    }

    #[tokio::test]
    async fn mcp_tools_call_returns_branching_result() {
        let (status, body) = post_mcp(
            r#"{"jsonrpc":"2.0","method":"tools/call","params":{"toolName":"dynamic_thought_branching","thought":"Analyzing market trends","branch_id":"b-1","confidence_score":0.8},"id":1}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"jsonrpc": "2.0", "result": "Branching thought: Analyzing market trends", "id": 1})
        );
    }

    #[tokio::test]
    async fn mcp_tools_list_returns_schemas() {
        let (status, body) =
            post_mcp(r#"{"jsonrpc":"2.0","method":"tools/list","id":"list-1"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "list-1");
        assert_eq!(
            body["result"][0],
            json!({
                "name": "dynamic_thought_branching",
                "parameterSchema": {
                    "type": "object",
                    "properties": {"thought": {"type": "string"}},
                    "required": ["thought"]
                }
            })
        );
    }

    #[tokio::test]
    async fn mcp_missing_param_is_bad_request() {
        let (status, body) = post_mcp(
            r#"{"jsonrpc":"2.0","method":"tools/call","params":{"toolName":"hypothesis_generation"},"id":2}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], -32602);
        assert_eq!(body["id"], 2);
    }

    #[tokio::test]
    async fn mcp_wrong_version_is_invalid_request_with_null_id() {
        let (status, body) =
            post_mcp(r#"{"jsonrpc":"1.0","method":"tools/list","id":3}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], -32600);
        assert_eq!(body["error"]["message"], "Invalid Request");
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn mcp_unknown_method_is_not_found() {
        let (status, body) =
            post_mcp(r#"{"jsonrpc":"2.0","method":"initialize","id":4}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], -32601);
        assert_eq!(body["id"], 4);
    }

    #[tokio::test]
    async fn mcp_blank_method_echoes_id() {
        let (status, body) = post_mcp(r#"{"jsonrpc":"2.0","method":"","id":5}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], -32601);
        assert_eq!(body["id"], 5);
    }

    #[tokio::test]
    async fn mcp_error_code_is_attached_for_request_logging() {
        let request = |body: &str| {
            Request::builder()
                .uri("/api/mcp")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request build")
        };

        let failed = app()
            .oneshot(request(r#"{"jsonrpc":"2.0","method":"tools/call","params":{"thought":"x"},"id":7}"#))
            .await
            .expect("request execution");
        assert_eq!(failed.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            failed.extensions().get::<RpcErrorCode>(),
            Some(&RpcErrorCode(-32601))
        );

        let succeeded = app()
            .oneshot(request(r#"{"jsonrpc":"2.0","method":"tools/list","id":8}"#))
            .await
            .expect("request execution");
        assert_eq!(succeeded.status(), StatusCode::OK);
        assert_eq!(succeeded.extensions().get::<RpcErrorCode>(), None);
    }

    #[tokio::test]
    async fn mcp_batch_is_rejected() {
        let (status, body) =
            post_mcp(r#"[{"jsonrpc":"2.0","method":"tools/list","id":5}]"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], -32600);
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn mcp_parse_error_for_invalid_json() {
        let (status, body) = post_mcp("{").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], -32700);
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn mcp_get_is_not_allowed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/mcp")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
