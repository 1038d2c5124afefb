//! HTTP transport layer for the JSON-RPC endpoint
//!
//! Provides the external API routing, transport-level policy, and metadata endpoints.

pub mod handlers;
