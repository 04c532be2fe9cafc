//! The tool handler contract.
//!
//! A handler is a stateless unit with two operations: describe itself
//! (name, human description, JSON-Schema argument contract) and run with
//! validated arguments. Handlers never catch client errors silently; they
//! propagate the taxonomy untouched to the dispatcher.

use async_trait::async_trait;
use restvault_core::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Tool-call arguments as received from the protocol layer.
pub type ToolArgs = Map<String, Value>;

/// Machine-readable description of one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    /// Unique, namespaced name
    pub name: String,
    pub description: String,
    /// JSON-Schema argument contract; the sole basis for pre-dispatch
    /// validation
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Protocol content produced by a tool run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

impl Content {
    /// Plain text content
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    /// Structured data rendered as pretty-printed JSON text
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| Error::validation(format!("Unserializable tool result: {e}")))?;
        Ok(Content::Text { text })
    }
}

/// A named, schema-described vault operation.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The tool's machine-readable description
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute with arguments already checked against the descriptor schema
    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>>;
}

// ---- Typed argument extraction ----
//
// Schema validation guarantees presence and JSON type for declared fields;
// these helpers give handlers ergonomic access plus Validation errors for
// anything the schema cannot express (enums, minimums).

pub fn require_str<'a>(args: &'a ToolArgs, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::validation(format!("Missing required argument: {key}")))
}

pub fn optional_str<'a>(args: &'a ToolArgs, key: &str, default: &'a str) -> Result<&'a str> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_str()
            .ok_or_else(|| Error::validation(format!("Argument '{key}' must be a string"))),
    }
}

pub fn optional_u32(args: &ToolArgs, key: &str, default: u32) -> Result<u32> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                Error::validation(format!("Argument '{key}' must be a non-negative integer"))
            }),
    }
}

pub fn optional_usize(args: &ToolArgs, key: &str, default: usize) -> Result<usize> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_u64().map(|n| n as usize).ok_or_else(|| {
            Error::validation(format!("Argument '{key}' must be a non-negative integer"))
        }),
    }
}

pub fn optional_bool(args: &ToolArgs, key: &str, default: bool) -> Result<bool> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| Error::validation(format!("Argument '{key}' must be a boolean"))),
    }
}

pub fn require_string_array(args: &ToolArgs, key: &str) -> Result<Vec<String>> {
    let values = args
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::validation(format!("Missing required argument: {key}")))?;
    values
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                Error::validation(format!("Argument '{key}' must be an array of strings"))
            })
        })
        .collect()
}

pub fn require_object(args: &ToolArgs, key: &str) -> Result<Value> {
    let value = args
        .get(key)
        .ok_or_else(|| Error::validation(format!("Missing required argument: {key}")))?;
    if !value.is_object() {
        return Err(Error::validation(format!(
            "Argument '{key}' must be an object"
        )));
    }
    Ok(value.clone())
}
