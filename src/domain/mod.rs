//! Tool domain: parameter schemas, the tool registry and the built-in tools
//!
//! Nothing in here knows about JSON-RPC envelopes or HTTP.

pub mod registry;
pub mod schema;
pub mod tools;
