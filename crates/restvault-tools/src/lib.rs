//! # Vault Tools
//!
//! The MCP-facing tool set backed by a [`restvault_client::VaultClient`].
//! Each tool describes itself with a JSON Schema and executes against the
//! Obsidian Local REST API.
//!
//! ## Tool Categories
//!
//! ### File Tools
//!
//! [`file_tools`] - Listing and reading vault content:
//! - List files in the vault root or a directory
//! - Read a single file
//! - Batch-read multiple files with per-file error reporting
//! - Append content to a file
//!
//! ### Edit Tools
//!
//! [`edit_tools`] - Structured note modification:
//! - Patch content relative to a heading, block reference, or frontmatter
//!   field
//!
//! ### Search Tools
//!
//! [`search_tools`] - Vault search:
//! - Plain-text search with contextual snippets
//! - JsonLogic structured queries
//!
//! ### Periodic Tools
//!
//! [`periodic_tools`] - Calendar notes and recency:
//! - Fetch the current periodic note
//! - List recent periodic notes
//! - List recently modified files
//!
//! ## Dispatch
//!
//! Handlers register into a [`ToolRegistry`], which validates arguments
//! against the declared schema before any handler runs.

pub mod edit_tools;
pub mod file_tools;
pub mod handler;
pub mod periodic_tools;
pub mod registry;
pub mod search_tools;

pub use handler::{Content, ToolArgs, ToolDescriptor, ToolHandler};
pub use registry::ToolRegistry;
