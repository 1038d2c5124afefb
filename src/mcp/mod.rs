//! JSON-RPC server handling for the Model Context Protocol surface
//!
//! Provides protocol-level specifics surrounding envelope formatting, error-code
//! mapping, and method routing.

pub mod rpc;
pub mod server;
