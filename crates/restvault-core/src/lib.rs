//! # restvault-core
//!
//! Core data models, error taxonomy, and configuration for the restvault
//! system. This crate defines the canonical types that all other crates
//! depend on.
//!
//! ## Modules
//!
//! - [`models`] — vault data types (VaultFile, PatchTarget, SearchQuery, ...)
//! - [`error`] — the single [`Error`](error::Error) taxonomy and `Result` alias
//! - [`config`] — immutable client configuration with builder and layered loading
//!
//! Libraries in this workspace never panic on failure: everything returns
//! `Result<T>` carrying a taxonomy variant that callers inspect by kind.

pub mod config;
pub mod error;
pub mod models;

pub use config::{ClientConfig, ClientConfigBuilder, Protocol};
pub use error::{Error, Result};

/// Common imports for downstream crates
pub mod prelude {
    pub use crate::config::{ClientConfig, ClientConfigBuilder, Protocol};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        BatchEntry, BatchOutcome, InsertionSpec, PatchContentType, PatchOperation, PatchTarget,
        Period, PeriodicNoteSpec, SearchMatch, SearchQuery, SearchResult, VaultFile,
        DEFAULT_TARGET_DELIMITER,
    };
}
