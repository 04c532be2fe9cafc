//! Canonical data models for vault operations.
//!
//! Strong types replace the string-and-dict shapes of the wire protocol:
//! patch anchors, insertion semantics, search queries, and periodic note
//! requests are all enums validated at construction, so malformed values are
//! rejected before any request is built.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single file read from the vault.
///
/// Read on demand per call and never cached beyond a single response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultFile {
    /// Vault-relative path, `/`-separated
    pub path: String,
    /// File body
    pub content: String,
    /// Optional server-side metadata (frontmatter, stat info)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl VaultFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            metadata: None,
        }
    }
}

/// Insertion semantics relative to a resolved patch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperation {
    /// Insert immediately before the anchor, at its structural depth
    Prepend,
    /// Insert immediately after the anchor's owned content
    Append,
    /// Substitute the content owned by the anchor in full
    Replace,
}

impl PatchOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOperation::Prepend => "prepend",
            PatchOperation::Append => "append",
            PatchOperation::Replace => "replace",
        }
    }
}

impl std::str::FromStr for PatchOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prepend" => Ok(PatchOperation::Prepend),
            "append" => Ok(PatchOperation::Append),
            "replace" => Ok(PatchOperation::Replace),
            other => Err(Error::validation(format!(
                "Invalid operation '{other}': must be one of prepend, append, replace"
            ))),
        }
    }
}

/// The anchor at which patch content is inserted.
///
/// Exactly one variant is active per patch call; the variant determines the
/// server-side lookup strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PatchTarget {
    /// Ordered heading path, outermost to innermost. Duplicate headings
    /// resolve to the first match in document order (server policy).
    Heading(Vec<String>),
    /// Block reference identifier, passed verbatim
    Block(String),
    /// Frontmatter field key, bypasses heading/delimiter logic entirely
    Frontmatter(String),
}

impl PatchTarget {
    /// Wire value of the `Target-Type` header
    pub fn type_str(&self) -> &'static str {
        match self {
            PatchTarget::Heading(_) => "heading",
            PatchTarget::Block(_) => "block",
            PatchTarget::Frontmatter(_) => "frontmatter",
        }
    }
}

/// Serialization of patch content on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchContentType {
    Text,
    Markdown,
    Json,
}

impl PatchContentType {
    /// MIME type sent as `Content-Type`
    pub fn mime(&self) -> &'static str {
        match self {
            PatchContentType::Text => "text/plain",
            PatchContentType::Markdown => "text/markdown",
            PatchContentType::Json => "application/json",
        }
    }
}

impl std::str::FromStr for PatchContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(PatchContentType::Text),
            "markdown" => Ok(PatchContentType::Markdown),
            "application/json" | "json" => Ok(PatchContentType::Json),
            other => Err(Error::validation(format!(
                "Invalid content type '{other}': must be text, markdown, or application/json"
            ))),
        }
    }
}

/// Default delimiter joining heading path segments in a target descriptor.
pub const DEFAULT_TARGET_DELIMITER: &str = "::";

/// A complete patch request: where to insert, how, and what.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertionSpec {
    pub target: PatchTarget,
    pub operation: PatchOperation,
    pub content: String,
    pub content_type: PatchContentType,
    /// Joins heading path segments; must not occur inside any segment
    pub target_delimiter: String,
    /// Ask the server to trim surrounding whitespace when matching the target
    pub trim_target_whitespace: bool,
}

impl InsertionSpec {
    /// Create a spec with markdown content and default delimiter
    pub fn new(target: PatchTarget, operation: PatchOperation, content: impl Into<String>) -> Self {
        Self {
            target,
            operation,
            content: content.into(),
            content_type: PatchContentType::Markdown,
            target_delimiter: DEFAULT_TARGET_DELIMITER.to_string(),
            trim_target_whitespace: false,
        }
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: PatchContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Set the heading path delimiter
    pub fn with_target_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.target_delimiter = delimiter.into();
        self
    }

    /// Set whitespace trimming for target matching
    pub fn with_trim_target_whitespace(mut self, trim: bool) -> Self {
        self.trim_target_whitespace = trim;
        self
    }
}

/// A search request: exactly one form per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SearchQuery {
    /// Substring search with contextual snippets
    PlainText {
        query: String,
        /// Characters of context on each side of a match
        context_length: usize,
    },
    /// JsonLogic-style predicate tree evaluated server-side; bypasses
    /// snippet extraction
    Structured { expression: serde_json::Value },
}

/// One contextual snippet within a search result.
///
/// `start`/`end` are offsets into `context`, not into the full file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub context: String,
    pub start: usize,
    pub end: usize,
}

/// All matches for a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub path: String,
    pub score: f64,
    pub matches: Vec<SearchMatch>,
}

/// Calendar period of a periodic note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Daily,
        Period::Weekly,
        Period::Monthly,
        Period::Quarterly,
        Period::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Period::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| {
                Error::validation(format!(
                    "Invalid period '{s}': must be one of daily, weekly, monthly, quarterly, yearly"
                ))
            })
    }
}

/// A request for recent periodic notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicNoteSpec {
    pub period: Period,
    /// Maximum number of notes to return, at least 1
    pub limit: u32,
    /// Whether the response should carry note bodies
    pub include_content: bool,
}

impl PeriodicNoteSpec {
    pub fn new(period: Period, limit: u32, include_content: bool) -> Result<Self> {
        if limit < 1 {
            return Err(Error::validation(format!(
                "Invalid limit {limit}: must be a positive integer"
            )));
        }
        Ok(Self {
            period,
            limit,
            include_content,
        })
    }
}

/// Per-path outcome of a batch read. A failed path is data, not an error:
/// it never aborts the remaining paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub path: String,
    pub outcome: BatchOutcome,
}

/// The two shapes a batch entry can take.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome {
    Ok { file: VaultFile },
    Error { kind: String, message: String },
}

impl BatchEntry {
    pub fn ok(file: VaultFile) -> Self {
        Self {
            path: file.path.clone(),
            outcome: BatchOutcome::Ok { file },
        }
    }

    pub fn failed(path: impl Into<String>, err: &Error) -> Self {
        Self {
            path: path.into(),
            outcome: BatchOutcome::Error {
                kind: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Ok { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_period_round_trip() {
        for period in Period::ALL {
            assert_eq!(Period::from_str(period.as_str()).unwrap(), period);
        }
        assert!(Period::from_str("hourly").is_err());
    }

    #[test]
    fn test_operation_parse() {
        assert_eq!(
            PatchOperation::from_str("replace").unwrap(),
            PatchOperation::Replace
        );
        assert_eq!(
            PatchOperation::from_str("delete").unwrap_err().kind(),
            "validation"
        );
    }

    #[test]
    fn test_periodic_spec_rejects_zero_limit() {
        let err = PeriodicNoteSpec::new(Period::Daily, 0, false).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_batch_entry_failure_is_data() {
        let entry = BatchEntry::failed("missing.md", &Error::not_found("missing.md"));
        assert!(!entry.is_ok());
        match entry.outcome {
            BatchOutcome::Error { ref kind, .. } => assert_eq!(kind, "not_found"),
            _ => panic!("expected error outcome"),
        }
    }
}
