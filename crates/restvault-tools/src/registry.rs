//! The tool registry and dispatcher.
//!
//! An immutable name-to-handler table populated once at startup. Duplicate
//! names are a construction-time configuration error, never a silent
//! overwrite. Argument validation against the declared schema happens here,
//! before any handler body runs, so malformed calls never reach the network
//! layer.

use crate::edit_tools::PatchContent;
use crate::file_tools::{
    AppendContent, BatchGetFileContents, GetFileContents, ListFilesInDir, ListFilesInVault,
};
use crate::handler::{Content, ToolArgs, ToolDescriptor, ToolHandler};
use crate::periodic_tools::{GetPeriodicNote, GetRecentChanges, GetRecentPeriodicNotes};
use crate::search_tools::{ComplexSearch, SimpleSearch};
use restvault_client::VaultClient;
use restvault_core::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Immutable dispatch table over registered tool handlers.
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry holding the full vault tool set.
    pub fn with_default_tools(client: Arc<VaultClient>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(ListFilesInVault::new(client.clone())))?;
        registry.register(Arc::new(ListFilesInDir::new(client.clone())))?;
        registry.register(Arc::new(GetFileContents::new(client.clone())))?;
        registry.register(Arc::new(BatchGetFileContents::new(client.clone())))?;
        registry.register(Arc::new(AppendContent::new(client.clone())))?;
        registry.register(Arc::new(PatchContent::new(client.clone())))?;
        registry.register(Arc::new(SimpleSearch::new(client.clone())))?;
        registry.register(Arc::new(ComplexSearch::new(client.clone())))?;
        registry.register(Arc::new(GetPeriodicNote::new(client.clone())))?;
        registry.register(Arc::new(GetRecentPeriodicNotes::new(client.clone())))?;
        registry.register(Arc::new(GetRecentChanges::new(client)))?;
        Ok(registry)
    }

    /// Register a handler. Registration order is insignificant for dispatch;
    /// a duplicate name fails fast.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<()> {
        let name = handler.descriptor().name;
        if self.by_name.contains_key(&name) {
            return Err(Error::config(format!("Duplicate tool name: {name}")));
        }
        self.by_name.insert(name, self.handlers.len());
        self.handlers.push(handler);
        Ok(())
    }

    /// Descriptors of all registered tools
    pub fn tools(&self) -> Vec<ToolDescriptor> {
        self.handlers.iter().map(|h| h.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke a tool by name. Unknown names and schema violations fail
    /// before the handler body runs; handler errors propagate unmodified
    /// with no retry.
    pub async fn call(&self, name: &str, args: &ToolArgs) -> Result<Vec<Content>> {
        let handler = self
            .by_name
            .get(name)
            .map(|&idx| &self.handlers[idx])
            .ok_or_else(|| Error::validation(format!("Unknown tool: {name}")))?;

        let descriptor = handler.descriptor();
        validate_args(&descriptor.input_schema, args)?;

        debug!(tool = name, "dispatching tool call");
        handler.run(args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check declared required fields and the JSON type of every supplied
/// declared field against the handler's schema.
fn validate_args(schema: &Value, args: &ToolArgs) -> Result<()> {
    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for key in required.iter().filter_map(Value::as_str) {
            if !args.contains_key(key) {
                return Err(Error::validation(format!(
                    "Missing required argument: {key}"
                )));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (key, property) in properties {
            let Some(value) = args.get(key) else {
                continue;
            };
            let Some(expected) = property.get("type").and_then(Value::as_str) else {
                continue;
            };
            let ok = match expected {
                "string" => value.is_string(),
                "integer" => value.is_u64() || value.is_i64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => true,
            };
            if !ok {
                return Err(Error::validation(format!(
                    "Argument '{key}' must be of type {expected}"
                )));
            }
        }
    }

    Ok(())
}
