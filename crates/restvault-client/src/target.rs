//! Patch target descriptor encoding.
//!
//! The vault API resolves patch anchors server-side; the client's job is to
//! construct an unambiguous, correctly escaped descriptor. Heading path
//! segments are joined with the configured delimiter and must not contain
//! it; block references and frontmatter keys pass through verbatim. All
//! shape problems are rejected here, before any request is built.

use restvault_core::error::{Error, Result};
use restvault_core::models::{InsertionSpec, PatchContentType, PatchTarget};

/// Encode a patch target into its wire descriptor (not yet percent-encoded).
pub fn encode_target(target: &PatchTarget, delimiter: &str) -> Result<String> {
    match target {
        PatchTarget::Heading(segments) => {
            if segments.is_empty() {
                return Err(Error::validation("Heading path cannot be empty"));
            }
            if delimiter.is_empty() {
                return Err(Error::validation("Target delimiter cannot be empty"));
            }
            for segment in segments {
                if segment.is_empty() {
                    return Err(Error::validation("Heading path segment cannot be empty"));
                }
                if segment.contains(delimiter) {
                    return Err(Error::validation(format!(
                        "Heading segment '{segment}' contains the target delimiter \
                         '{delimiter}'; choose a different delimiter"
                    )));
                }
            }
            Ok(segments.join(delimiter))
        }
        PatchTarget::Block(id) => {
            if id.is_empty() {
                return Err(Error::validation("Block reference cannot be empty"));
            }
            Ok(id.clone())
        }
        PatchTarget::Frontmatter(key) => {
            if key.is_empty() {
                return Err(Error::validation("Frontmatter key cannot be empty"));
            }
            Ok(key.clone())
        }
    }
}

/// Build the full header set for a PATCH request from an insertion spec.
///
/// JSON content is parsed here so a body that could never merge into a
/// frontmatter value fails as a precondition instead of a confusing server
/// response.
pub fn patch_headers(spec: &InsertionSpec) -> Result<Vec<(String, String)>> {
    let descriptor = encode_target(&spec.target, &spec.target_delimiter)?;

    if spec.content_type == PatchContentType::Json {
        serde_json::from_str::<serde_json::Value>(&spec.content)
            .map_err(|e| Error::precondition(format!("Content is not valid JSON: {e}")))?;
    }

    Ok(vec![
        ("Operation".to_string(), spec.operation.as_str().to_string()),
        ("Target-Type".to_string(), spec.target.type_str().to_string()),
        (
            "Target".to_string(),
            urlencoding::encode(&descriptor).into_owned(),
        ),
        (
            "Target-Delimiter".to_string(),
            spec.target_delimiter.clone(),
        ),
        (
            "Trim-Target-Whitespace".to_string(),
            spec.trim_target_whitespace.to_string(),
        ),
        (
            "Content-Type".to_string(),
            spec.content_type.mime().to_string(),
        ),
    ])
}
