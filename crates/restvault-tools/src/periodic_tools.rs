//! Periodic-note and recent-activity tools.

use crate::handler::{
    optional_bool, optional_u32, require_str, Content, ToolArgs, ToolDescriptor, ToolHandler,
};
use async_trait::async_trait;
use restvault_client::VaultClient;
use restvault_core::models::{Period, PeriodicNoteSpec};
use restvault_core::{Error, Result};
use serde_json::json;
use std::sync::Arc;

const DEFAULT_RECENT_LIMIT: u32 = 5;
const DEFAULT_CHANGES_LIMIT: u32 = 10;
const DEFAULT_CHANGES_DAYS: u32 = 90;

fn parse_period(args: &ToolArgs) -> Result<Period> {
    require_str(args, "period")?.parse()
}

/// Fetch the current periodic note for the requested calendar period.
pub struct GetPeriodicNote {
    client: Arc<VaultClient>,
}

impl GetPeriodicNote {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetPeriodicNote {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_get_periodic_note".to_string(),
            description: "Get current periodic note for the specified period.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "period": {
                        "type": "string",
                        "description": "The period type (daily, weekly, monthly, quarterly, yearly)",
                        "enum": ["daily", "weekly", "monthly", "quarterly", "yearly"],
                    },
                },
                "required": ["period"],
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let period = parse_period(args)?;
        let file = self.client.get_periodic(period).await?;
        Ok(vec![Content::text(file.content)])
    }
}

/// List the most recent periodic notes for a period type.
pub struct GetRecentPeriodicNotes {
    client: Arc<VaultClient>,
}

impl GetRecentPeriodicNotes {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetRecentPeriodicNotes {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_get_recent_periodic_notes".to_string(),
            description: "Get most recent periodic notes for the specified period type."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "period": {
                        "type": "string",
                        "description": "The period type (daily, weekly, monthly, quarterly, yearly)",
                        "enum": ["daily", "weekly", "monthly", "quarterly", "yearly"],
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of notes to return (default: 5)",
                        "default": DEFAULT_RECENT_LIMIT,
                        "minimum": 1,
                        "maximum": 50,
                    },
                    "include_content": {
                        "type": "boolean",
                        "description": "Whether to include note content (default: false)",
                        "default": false,
                    },
                },
                "required": ["period"],
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let period = parse_period(args)?;
        let limit = optional_u32(args, "limit", DEFAULT_RECENT_LIMIT)?;
        let include_content = optional_bool(args, "include_content", false)?;

        let spec = PeriodicNoteSpec::new(period, limit, include_content)?;
        let notes = self.client.get_recent_periodic(&spec).await?;
        Ok(vec![Content::json(&notes)?])
    }
}

/// List recently modified files, ordered newest first.
pub struct GetRecentChanges {
    client: Arc<VaultClient>,
}

impl GetRecentChanges {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetRecentChanges {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "obsidian_get_recent_changes".to_string(),
            description: "Get recently modified files in the vault.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of files to return (default: 10)",
                        "default": DEFAULT_CHANGES_LIMIT,
                        "minimum": 1,
                        "maximum": 100,
                    },
                    "days": {
                        "type": "integer",
                        "description": "Only include files modified within this many days (default: 90)",
                        "default": DEFAULT_CHANGES_DAYS,
                        "minimum": 1,
                    },
                },
            }),
        }
    }

    async fn run(&self, args: &ToolArgs) -> Result<Vec<Content>> {
        let limit = optional_u32(args, "limit", DEFAULT_CHANGES_LIMIT)?;
        let days = optional_u32(args, "days", DEFAULT_CHANGES_DAYS)?;
        if limit < 1 {
            return Err(Error::validation("limit must be at least 1"));
        }
        if days < 1 {
            return Err(Error::validation("days must be at least 1"));
        }

        let changes = self.client.get_recent_changes(limit, days).await?;
        Ok(vec![Content::json(&changes)?])
    }
}
