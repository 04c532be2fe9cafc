//! The vault API client.
//!
//! One method per vault capability, all funneled through a single dispatch
//! wrapper that owns the error taxonomy mapping. The client performs zero
//! automatic retries; transient failures are the caller's concern.

use crate::snippet;
use crate::target;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use restvault_core::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Accept header value asking for note JSON instead of raw markdown.
const NOTE_JSON: &str = "application/vnd.olrapi.note+json";
/// Content type of a JsonLogic search body.
const JSONLOGIC: &str = "application/vnd.olrapi.jsonlogic+json";
/// Content type of a Dataview DQL search body.
const DQL: &str = "application/vnd.olrapi.dataview.dql+txt";

/// Outcome of a [`VaultClient::search`] call. Structured queries bypass
/// snippet extraction and pass the server payload through opaquely.
#[derive(Debug, Clone)]
pub enum SearchResponse {
    Plain(Vec<SearchResult>),
    Structured(serde_json::Value),
}

/// Synchronous-per-call HTTP wrapper around the vault's REST surface.
///
/// Owns the connection configuration for its lifetime; safe to share across
/// invocations because nothing is mutated after construction.
pub struct VaultClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl VaultClient {
    /// Create a client with the production HTTP transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client over an explicit transport (test seam).
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// List entries at the vault root.
    pub async fn list_root(&self) -> Result<Vec<String>> {
        let request = ApiRequest::get(format!("{}/vault/", self.config.base_url()));
        let response = self.dispatch(request, "vault root").await?;
        parse_file_listing(&response)
    }

    /// List entries under a directory. An empty directory yields an empty
    /// sequence, not an error.
    pub async fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        if path.is_empty() {
            return Err(Error::validation("Directory path cannot be empty"));
        }
        let request = ApiRequest::get(format!(
            "{}/vault/{}/",
            self.config.base_url(),
            encode_path(path)
        ));
        let response = self.dispatch(request, path).await?;
        parse_file_listing(&response)
    }

    /// Read a single file.
    pub async fn get_file(&self, path: &str) -> Result<VaultFile> {
        if path.is_empty() {
            return Err(Error::validation("File path cannot be empty"));
        }
        let request = ApiRequest::get(self.vault_url(path));
        let response = self.dispatch(request, path).await?;
        Ok(VaultFile::new(path, response.body))
    }

    /// Read many files in one bounded sequential pass. A per-path failure is
    /// recorded as data and never aborts the remaining paths.
    pub async fn get_batch(&self, paths: &[String]) -> Result<Vec<BatchEntry>> {
        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            match self.get_file(path).await {
                Ok(file) => entries.push(BatchEntry::ok(file)),
                Err(err) => {
                    debug!(path = %path, error = %err, "batch read failed for one path");
                    entries.push(BatchEntry::failed(path.clone(), &err));
                }
            }
        }
        Ok(entries)
    }

    /// Search the vault. Plain-text queries produce ordered snippet results
    /// (server relevance, then path); structured queries pass through with
    /// server-defined ordering untouched.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        match query {
            SearchQuery::PlainText {
                query,
                context_length,
            } => {
                let request = ApiRequest::post(format!("{}/search/simple/", self.config.base_url()))
                    .query("query", query)
                    .query("contextLength", context_length.to_string());
                let response = self.dispatch(request, "simple search").await?;

                let files: Vec<WireSearchFile> =
                    serde_json::from_str(&response.body).map_err(|e| {
                        Error::server(response.status, format!("Invalid search response: {e}"))
                    })?;

                let mut results: Vec<SearchResult> = files
                    .into_iter()
                    .map(|file| {
                        let spans: Vec<(usize, usize)> =
                            file.matches.iter().map(|m| (m.start, m.end)).collect();
                        SearchResult {
                            matches: snippet::context_windows(
                                &file.content,
                                &spans,
                                *context_length,
                            ),
                            path: file.filename,
                            score: file.score,
                        }
                    })
                    .collect();
                results.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.path.cmp(&b.path))
                });
                Ok(SearchResponse::Plain(results))
            }
            SearchQuery::Structured { expression } => {
                let body = serde_json::to_string(expression)
                    .map_err(|e| Error::validation(format!("Invalid query expression: {e}")))?;
                let request = ApiRequest::post(format!("{}/search/", self.config.base_url()))
                    .header("Content-Type", JSONLOGIC)
                    .body(body);
                let response = self.dispatch(request, "structured search").await?;
                Ok(SearchResponse::Structured(response.json()?))
            }
        }
    }

    /// Append content to a file, creating it when absent. Repeated calls
    /// append repeatedly; there is no deduplication.
    pub async fn append(&self, path: &str, content: &str) -> Result<()> {
        if path.is_empty() {
            return Err(Error::validation("File path cannot be empty"));
        }
        let request = ApiRequest::post(self.vault_url(path))
            .header("Content-Type", "text/markdown")
            .body(content);
        self.dispatch(request, path).await?;
        Ok(())
    }

    /// Patch content relative to a resolved target anchor. Descriptor
    /// construction validates the target before any request is built.
    pub async fn patch(&self, path: &str, spec: &InsertionSpec) -> Result<()> {
        if path.is_empty() {
            return Err(Error::validation("File path cannot be empty"));
        }
        let headers = target::patch_headers(spec)?;

        let mut request = ApiRequest::patch(self.vault_url(path)).body(spec.content.clone());
        for (key, value) in headers {
            request = request.header(key, value);
        }
        self.dispatch(request, path).await?;
        Ok(())
    }

    /// Read the current periodic note for a period.
    pub async fn get_periodic(&self, period: Period) -> Result<VaultFile> {
        let request = ApiRequest::get(format!(
            "{}/periodic/{}/",
            self.config.base_url(),
            period.as_str()
        ))
        .header("Accept", NOTE_JSON);
        let resource = format!("current {} note", period.as_str());
        let response = self.dispatch(request, &resource).await?;
        parse_note_json(&response)
    }

    /// Read the most recent periodic notes for a period.
    pub async fn get_recent_periodic(&self, spec: &PeriodicNoteSpec) -> Result<Vec<VaultFile>> {
        let request = ApiRequest::get(format!(
            "{}/periodic/{}/recent",
            self.config.base_url(),
            spec.period.as_str()
        ))
        .query("limit", spec.limit.to_string())
        .query("includeContent", spec.include_content.to_string());
        let resource = format!("recent {} notes", spec.period.as_str());
        let response = self.dispatch(request, &resource).await?;

        let notes: Vec<WireNote> = serde_json::from_str(&response.body).map_err(|e| {
            Error::server(response.status, format!("Invalid periodic response: {e}"))
        })?;
        Ok(notes.into_iter().map(WireNote::into_file).collect())
    }

    /// List recently modified files via a Dataview DQL query.
    pub async fn get_recent_changes(&self, limit: u32, days: u32) -> Result<Vec<VaultFile>> {
        let dql = format!(
            "TABLE file.mtime\nWHERE file.mtime >= date(today) - dur({days} days)\nSORT file.mtime DESC\nLIMIT {limit}"
        );
        let request = ApiRequest::post(format!("{}/search/", self.config.base_url()))
            .header("Content-Type", DQL)
            .body(dql);
        let response = self.dispatch(request, "recent changes").await?;

        let rows: Vec<WireDqlRow> = serde_json::from_str(&response.body).map_err(|e| {
            Error::server(response.status, format!("Invalid recent-changes response: {e}"))
        })?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let mut file = VaultFile::new(row.filename, "");
                if let serde_json::Value::Object(map) = row.result {
                    file.metadata = Some(map);
                }
                file
            })
            .collect())
    }

    /// The single point where authentication, status mapping, and body
    /// handling are enforced. No operation method re-implements this.
    async fn dispatch(&self, request: ApiRequest, resource: &str) -> Result<ApiResponse> {
        let request = request.header(
            "Authorization",
            format!("Bearer {}", self.config.api_key),
        );
        let response = self.transport.execute(&request).await?;

        if (200..300).contains(&response.status) {
            return Ok(response);
        }

        let (code, message) = parse_error_body(&response.body);
        debug!(
            status = response.status,
            code,
            resource,
            "vault API returned an error"
        );
        Err(match response.status {
            401 | 403 => Error::auth(response.status, message),
            404 => Error::not_found(resource.to_string()),
            400 => Error::precondition(message),
            status => Error::server(status, message),
        })
    }

    fn vault_url(&self, path: &str) -> String {
        format!("{}/vault/{}", self.config.base_url(), encode_path(path))
    }
}

/// Percent-encode each path segment, preserving `/` separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Extract the `{"errorCode", "message"}` shape the vault API uses for
/// failures; fall back to placeholders on anything else.
fn parse_error_body(body: &str) -> (i64, String) {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            let code = value
                .get("errorCode")
                .and_then(|c| c.as_i64())
                .unwrap_or(-1);
            let message = value
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("<unknown>")
                .to_string();
            (code, message)
        }
        Err(_) if !body.is_empty() => (-1, body.to_string()),
        Err(_) => (-1, "<unknown>".to_string()),
    }
}

fn parse_file_listing(response: &ApiResponse) -> Result<Vec<String>> {
    #[derive(Deserialize)]
    struct Listing {
        #[serde(default)]
        files: Vec<String>,
    }
    let listing: Listing = serde_json::from_str(&response.body)
        .map_err(|e| Error::server(response.status, format!("Invalid listing response: {e}")))?;
    Ok(listing.files)
}

fn parse_note_json(response: &ApiResponse) -> Result<VaultFile> {
    let note: WireNote = serde_json::from_str(&response.body)
        .map_err(|e| Error::server(response.status, format!("Invalid note response: {e}")))?;
    Ok(note.into_file())
}

/// One file entry in a simple-search response: relevance score, document
/// body, and absolute match spans into that body.
#[derive(Deserialize)]
struct WireSearchFile {
    filename: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    content: String,
    #[serde(default)]
    matches: Vec<WireSpan>,
}

#[derive(Deserialize)]
struct WireSpan {
    start: usize,
    end: usize,
}

/// Note JSON shape (`application/vnd.olrapi.note+json`).
#[derive(Deserialize)]
struct WireNote {
    path: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    frontmatter: Option<serde_json::Map<String, serde_json::Value>>,
}

impl WireNote {
    fn into_file(self) -> VaultFile {
        VaultFile {
            path: self.path,
            content: self.content,
            metadata: self.frontmatter,
        }
    }
}

#[derive(Deserialize)]
struct WireDqlRow {
    filename: String,
    #[serde(default)]
    result: serde_json::Value,
}
