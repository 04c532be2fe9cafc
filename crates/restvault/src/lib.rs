//! # restvault
//!
//! MCP server binary crate. Wires a [`restvault_client::VaultClient`] and the
//! [`restvault_tools::ToolRegistry`] into a newline-delimited JSON-RPC loop
//! over stdio.

pub mod server;

pub use server::McpServer;
