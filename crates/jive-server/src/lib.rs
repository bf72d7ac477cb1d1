//! Server layer for Jive.
//!
//! The MCP tool surface (nine consolidated tools over rmcp), the HTTP
//! companion endpoints consumed by the web UI, the uniform response
//! envelope, and the dispatcher that validates, routes, and guards every
//! call with the configured timeout and transport cancellation.

pub mod args;
pub mod dispatcher;
pub mod envelope;
pub mod http;
pub mod mcp;
pub mod tools;

pub use dispatcher::{Dispatcher, TOOL_NAMES};
pub use envelope::{ErrorBody, ToolResponse};
pub use http::serve_http;
pub use mcp::{JiveServer, serve_stdio};
