//! Targeted patch tool: insert content relative to a heading path, block
//! reference, or frontmatter field.

use crate::handler::{
    optional_bool, optional_str, require_str, Content, ToolArgs, ToolDescriptor, ToolHandler,
};
use async_trait::async_trait;
use restvault_client::VaultClient;
use restvault_core::models::{InsertionSpec, PatchTarget, DEFAULT_TARGET_DELIMITER};
use restvault_core::{Error, Result};
use serde_json::json;
use std::sync::Arc;

/// Patch a note relative to a resolved anchor.
pub struct PatchContent {
    client: Arc<VaultClient>,
}

impl PatchContent {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for PatchContent {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_patch_content".to_string(),
            description: "Insert content into an existing note relative to a heading, block reference, \
                          or frontmatter field. Duplicate headings resolve to the first match in \
                          document order."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filepath": {
                        "type": "string",
                        "description": "Path to the file (relative to vault root)",
                        "format": "path",
                    },
                    "operation": {
                        "type": "string",
                        "description": "Operation to perform (append, prepend, or replace)",
                        "enum": ["append", "prepend", "replace"],
                    },
                    "target_type": {
                        "type": "string",
                        "description": "Type of target to patch",
                        "enum": ["heading", "block", "frontmatter"],
                    },
                    "target": {
                        "type": "string",
                        "description": "Target identifier (heading path joined by the target delimiter, \
                                        block reference, or frontmatter field)",
                    },
                    "content": {
                        "type": "string",
                        "description": "Content to insert",
                    },
                    "target_delimiter": {
                        "type": "string",
                        "description": "Delimiter separating heading path segments (default: '::')",
                        "default": "::",
                    },
                    "content_type": {
                        "type": "string",
                        "description": "How to interpret the content (default: markdown)",
                        "enum": ["text", "markdown", "application/json"],
                        "default": "markdown",
                    },
                    "trim_target_whitespace": {
                        "type": "boolean",
                        "description": "Trim surrounding whitespace when matching the target (default: false)",
                        "default": false,
                    },
                },
                "required": ["filepath", "operation", "target_type", "target", "content"],
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let filepath = require_str(args, "filepath")?;
        let operation = require_str(args, "operation")?.parse()?;
        let target_type = require_str(args, "target_type")?;
        let target = require_str(args, "target")?;
        let content = require_str(args, "content")?;
        let delimiter = optional_str(args, "target_delimiter", DEFAULT_TARGET_DELIMITER)?;
        let content_type = optional_str(args, "content_type", "markdown")?.parse()?;
        let trim = optional_bool(args, "trim_target_whitespace", false)?;

        let target = match target_type {
            // Heading paths arrive pre-joined; split on the active delimiter
            // so segment-level validation still applies.
            "heading" => PatchTarget::Heading(if target.is_empty() {
                vec![]
            } else {
                target.split(delimiter).map(str::to_string).collect()
            }),
            "block" => PatchTarget::Block(target.to_string()),
            "frontmatter" => PatchTarget::Frontmatter(target.to_string()),
            other => {
                return Err(Error::validation(format!(
                    "Invalid target_type '{other}': must be one of heading, block, frontmatter"
                )))
            }
        };

        let spec = InsertionSpec::new(target, operation, content)
            .with_content_type(content_type)
            .with_target_delimiter(delimiter)
            .with_trim_target_whitespace(trim);

        self.client.patch(filepath, &spec).await?;
        Ok(vec![Content::text(format!(
            "Successfully patched content in {filepath}"
        ))])
    }
}
