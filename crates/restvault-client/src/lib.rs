//! # restvault-client
//!
//! Authenticated HTTP client for the Obsidian Local REST API.
//!
//! [`VaultClient`] exposes one method per vault capability and normalizes
//! transport/HTTP failures into the workspace's single error taxonomy. The
//! network sits behind the [`transport::Transport`] trait so tests can
//! observe requests without a live vault. The harder client-side logic —
//! patch target descriptor encoding and search snippet aggregation — lives
//! in [`target`] and [`snippet`].

pub mod client;
pub mod snippet;
pub mod target;
pub mod transport;

pub use client::{SearchResponse, VaultClient};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
