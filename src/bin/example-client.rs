//! Sends one `tools/call` request to a locally running server and prints the reply.

use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let endpoint = format!("http://localhost:{port}{}", sequential_thinking_mcp::MCP_PATH);

    let response = reqwest::Client::new()
        .post(&endpoint)
        .json(&json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {
                "toolName": "dynamic_thought_branching",
                "thought": "Analyzing market trends",
                "confidence_score": 0.8
            },
            "id": 1
        }))
        .send()
        .await?;

    let status = response.status();
    let body: Value = response.json().await?;
    println!("{status} {}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
