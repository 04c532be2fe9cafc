//! File listing, reading, and append tools.

use crate::handler::{
    require_str, require_string_array, Content, ToolArgs, ToolDescriptor, ToolHandler,
};
use async_trait::async_trait;
use restvault_client::VaultClient;
use restvault_core::models::BatchOutcome;
use restvault_core::Result;
use serde_json::json;
use std::sync::Arc;

/// List all entries in the vault root.
pub struct ListFilesInVault {
    client: Arc<VaultClient>,
}

impl ListFilesInVault {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for ListFilesInVault {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_list_files_in_vault".to_string(),
            description: "Lists all files and directories in the root directory of your Obsidian vault."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        }
    }

    async fn run(&self, _args: &ToolArgs) -> Result<Vec<Content>> {
        let files = self.client.list_root().await?;
        Ok(vec![Content::json(&files)?])
    }
}

/// List entries under a specific vault directory.
pub struct ListFilesInDir {
    client: Arc<VaultClient>,
}

impl ListFilesInDir {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for ListFilesInDir {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_list_files_in_dir".to_string(),
            description: "Lists all files and directories that exist in a specific Obsidian directory."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dirpath": {
                        "type": "string",
                        "description": "Path to list files from (relative to your vault root).",
                    },
                },
                "required": ["dirpath"],
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let dirpath = require_str(args, "dirpath")?;
        let files = self.client.list_dir(dirpath).await?;
        Ok(vec![Content::json(&files)?])
    }
}

/// Read a single file's content.
pub struct GetFileContents {
    client: Arc<VaultClient>,
}

impl GetFileContents {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetFileContents {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_get_file_contents".to_string(),
            description: "Return the content of a single file in your vault.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filepath": {
                        "type": "string",
                        "description": "Path to the relevant file (relative to your vault root).",
                        "format": "path",
                    },
                },
                "required": ["filepath"],
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let filepath = require_str(args, "filepath")?;
        let file = self.client.get_file(filepath).await?;
        Ok(vec![Content::text(file.content)])
    }
}

/// Read several files, concatenated with per-file headers. Partial failure
/// is reported inline, not raised.
pub struct BatchGetFileContents {
    client: Arc<VaultClient>,
}

impl BatchGetFileContents {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for BatchGetFileContents {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_batch_get_file_contents".to_string(),
            description: "Return the contents of multiple files in your vault, concatenated with headers."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filepaths": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "description": "Path to a file (relative to your vault root)",
                            "format": "path",
                        },
                        "description": "List of file paths to read",
                    },
                },
                "required": ["filepaths"],
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let filepaths = require_string_array(args, "filepaths")?;
        let entries = self.client.get_batch(&filepaths).await?;

        let mut out = String::new();
        for entry in entries {
            match entry.outcome {
                BatchOutcome::Ok { file } => {
                    out.push_str(&format!("# {}\n\n{}\n\n---\n\n", entry.path, file.content));
                }
                BatchOutcome::Error { message, .. } => {
                    out.push_str(&format!(
                        "# {}\n\nError reading file: {}\n\n---\n\n",
                        entry.path, message
                    ));
                }
            }
        }
        Ok(vec![Content::text(out)])
    }
}

/// Append content to a new or existing file.
pub struct AppendContent {
    client: Arc<VaultClient>,
}

impl AppendContent {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for AppendContent {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_append_content".to_string(),
            description: "Append content to a new or existing file in the vault.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filepath": {
                        "type": "string",
                        "description": "Path to the file (relative to vault root)",
                        "format": "path",
                    },
                    "content": {
                        "type": "string",
                        "description": "Content to append to the file",
                    },
                },
                "required": ["filepath", "content"],
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let filepath = require_str(args, "filepath")?;
        let content = require_str(args, "content")?;
        self.client.append(filepath, content).await?;
        Ok(vec![Content::text(format!(
            "Successfully appended content to {filepath}"
        ))])
    }
}
