//! The protocol shell around the LabGate core.
//!
//! Exposes the operation catalog over MCP (JSON-RPC 2.0): a stdio mode
//! with one static credential, and an HTTP mode that binds one credential
//! per logical session.  The core (`lg-catalog`) never reads ambient
//! state; this crate resolves the per-call client and injects it.

pub mod cli;
pub mod http;
pub mod mcp;
pub mod sessions;
pub mod stdio;
