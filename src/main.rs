use std::sync::Arc;

use sequential_thinking_mcp::{
    build_app, config::Config, domain::tools::builtin_registry, logging,
    mcp::dispatcher::Dispatcher, AppState, HEALTH_PATH, MCP_PATH,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init_logging(&config.log_level);

    let registry = builtin_registry()?;
    if registry.is_empty() {
        warn!("no tools registered, every tools/call will answer Tool not found");
    }
    let tool_count = registry.len();
    let registry = Arc::new(registry);
    let dispatcher = Dispatcher::new(registry).with_tool_timeout(config.tool_timeout);
    let state = AppState::new(
        dispatcher,
        config.log_level.clone(),
        config.environment.clone(),
    );
    let app = build_app(state);

    let bind_socket = config.bind_socket()?;
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        log_level = %config.log_level,
        environment = %config.environment,
        tool_timeout_ms = config.tool_timeout.map(|limit| limit.as_millis() as u64),
        tools = tool_count,
        health = HEALTH_PATH,
        mcp = MCP_PATH,
        "server starting"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, shutting down gracefully"),
        _ = terminate => info!("SIGTERM received, shutting down gracefully"),
    }
}
