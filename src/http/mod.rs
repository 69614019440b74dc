//! HTTP transport for the JSON-RPC tool endpoint
//!
//! Provides the external API routing: `/api/mcp`, `/health` and the root info page.

pub mod handlers;
