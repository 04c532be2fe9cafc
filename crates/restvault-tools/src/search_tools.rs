//! Plain-text and structured search tools.

use crate::handler::{
    optional_usize, require_object, require_str, Content, ToolArgs, ToolDescriptor, ToolHandler,
};
use async_trait::async_trait;
use restvault_client::{SearchResponse, VaultClient};
use restvault_core::models::SearchQuery;
use restvault_core::{Error, Result};
use serde_json::json;
use std::sync::Arc;

const DEFAULT_CONTEXT_LENGTH: usize = 100;

/// Substring search with contextual snippets.
pub struct SimpleSearch {
    client: Arc<VaultClient>,
}

impl SimpleSearch {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for SimpleSearch {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_simple_search".to_string(),
            description: "Simple search for documents matching a specified text query across all \
                          files in the vault. Use this tool when you want to do a simple text search."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Text to a simple search for in the vault.",
                    },
                    "context_length": {
                        "type": "integer",
                        "description": "How much context to return around the matching string (default: 100)",
                        "default": DEFAULT_CONTEXT_LENGTH,
                    },
                },
                "required": ["query"],
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let query = require_str(args, "query")?;
        let context_length = optional_usize(args, "context_length", DEFAULT_CONTEXT_LENGTH)?;

        let response = self
            .client
            .search(&SearchQuery::PlainText {
                query: query.to_string(),
                context_length,
            })
            .await?;

        match response {
            SearchResponse::Plain(results) => Ok(vec![Content::json(&results)?]),
            SearchResponse::Structured(_) => Err(Error::server(
                200,
                "Unexpected structured payload for a plain-text search",
            )),
        }
    }
}

/// JsonLogic predicate-tree search, passed through opaquely.
pub struct ComplexSearch {
    client: Arc<VaultClient>,
}

impl ComplexSearch {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for ComplexSearch {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_complex_search".to_string(),
            description: "Complex search for documents using a JsonLogic query. Supports standard \
                          JsonLogic operators plus 'glob' and 'regexp' for pattern matching. Use this \
                          tool when you want to do a complex search, e.g. for all documents with \
                          certain tags."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "object",
                        "description": "JsonLogic query object. Example: {\"glob\": [\"*.md\", {\"var\": \"path\"}]} matches all markdown files",
                    },
                },
                "required": ["query"],
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let expression = require_object(args, "query")?;

        let response = self
            .client
            .search(&SearchQuery::Structured { expression })
            .await?;

        match response {
            SearchResponse::Structured(value) => Ok(vec![Content::json(&value)?]),
            SearchResponse::Plain(_) => Err(Error::server(
                200,
                "Unexpected snippet payload for a structured search",
            )),
        }
    }
}
