//! JSON-RPC envelope handling and tool dispatch
//!
//! Provides the request/response types and the dispatcher that routes
//! `tools/list` and `tools/call` to the tool registry.

pub mod dispatcher;
pub mod rpc;
