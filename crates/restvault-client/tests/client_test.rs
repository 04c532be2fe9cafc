//! VaultClient behavior against a recording mock transport.

use async_trait::async_trait;
use restvault_client::{ApiRequest, ApiResponse, Method, Transport, VaultClient};
use restvault_core::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

/// Records every request and answers from a programmable responder.
struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responder: Responder,
}

impl MockTransport {
    fn returning(status: u16, body: &str) -> Arc<Self> {
        let body = body.to_string();
        Self::with(move |_| Ok(ApiResponse::new(status, body.clone())))
    }

    fn with(f: impl Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(vec![]),
            responder: Box::new(f),
        })
    }

    fn recorded(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

fn client(transport: Arc<MockTransport>) -> VaultClient {
    let config = ClientConfig::builder("test-key").build().unwrap();
    VaultClient::with_transport(config, transport)
}

#[tokio::test]
async fn every_request_carries_the_bearer_token() {
    let transport = MockTransport::returning(200, "{\"files\": []}");
    let api = client(transport.clone());
    api.list_root().await.unwrap();

    let requests = transport.recorded();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].header_value("Authorization"),
        Some("Bearer test-key")
    );
    assert_eq!(requests[0].url, "https://127.0.0.1:27124/vault/");
}

#[tokio::test]
async fn status_codes_map_to_the_error_taxonomy() {
    let cases: &[(u16, &str)] = &[
        (401, "auth"),
        (403, "auth"),
        (404, "not_found"),
        (400, "precondition"),
        (500, "server"),
        (502, "server"),
    ];
    for (status, kind) in cases {
        let transport =
            MockTransport::returning(*status, "{\"errorCode\": 40400, \"message\": \"nope\"}");
        let err = client(transport).get_file("a.md").await.unwrap_err();
        assert_eq!(err.kind(), *kind, "status {status}");
    }
}

#[tokio::test]
async fn empty_directory_listing_is_not_an_error() {
    let transport = MockTransport::returning(200, "{\"files\": []}");
    let entries = client(transport).list_dir("empty-dir").await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn list_dir_requests_trailing_slash_and_encodes_segments() {
    let transport = MockTransport::returning(200, "{\"files\": [\"a.md\", \"sub\"]}");
    let api = client(transport.clone());
    let entries = api.list_dir("meeting notes/2024").await.unwrap();
    assert_eq!(entries, vec!["a.md".to_string(), "sub".to_string()]);

    let requests = transport.recorded();
    assert_eq!(
        requests[0].url,
        "https://127.0.0.1:27124/vault/meeting%20notes/2024/"
    );
}

#[tokio::test]
async fn batch_read_records_partial_failure_as_data() {
    let transport = MockTransport::with(|req| {
        if req.url.contains("missing") {
            Ok(ApiResponse::new(
                404,
                "{\"errorCode\": 40400, \"message\": \"File does not exist\"}",
            ))
        } else {
            Ok(ApiResponse::new(200, "file body"))
        }
    });
    let api = client(transport.clone());

    let paths = vec![
        "a.md".to_string(),
        "missing.md".to_string(),
        "b.md".to_string(),
    ];
    let entries = api.get_batch(&paths).await.unwrap();

    assert_eq!(entries.len(), 3);
    assert!(entries[0].is_ok());
    assert!(!entries[1].is_ok());
    assert!(entries[2].is_ok());
    match &entries[1].outcome {
        BatchOutcome::Error { kind, .. } => assert_eq!(kind, "not_found"),
        _ => panic!("expected failure entry"),
    }
    // One nonexistent path must not abort the rest
    assert_eq!(transport.count(), 3);
}

/// In-memory vault for append semantics: creates on first write, appends on
/// subsequent ones.
fn appending_vault() -> (Arc<MockTransport>, Arc<Mutex<HashMap<String, String>>>) {
    let store: Arc<Mutex<HashMap<String, String>>> = Arc::new(Mutex::new(HashMap::new()));
    let files = store.clone();
    let transport = MockTransport::with(move |req| {
        let path = req
            .url
            .rsplit("/vault/")
            .next()
            .unwrap()
            .replace("%20", " ");
        let mut files = files.lock().unwrap();
        match req.method {
            Method::Post => {
                let body = req.body.clone().unwrap_or_default();
                files
                    .entry(path)
                    .and_modify(|c| c.push_str(&body))
                    .or_insert(body);
                Ok(ApiResponse::new(204, ""))
            }
            Method::Get => match files.get(&path) {
                Some(content) => Ok(ApiResponse::new(200, content.clone())),
                None => Ok(ApiResponse::new(
                    404,
                    "{\"errorCode\": 40400, \"message\": \"File does not exist\"}",
                )),
            },
            Method::Patch => Ok(ApiResponse::new(200, "")),
        }
    });
    (transport, store)
}

#[tokio::test]
async fn append_creates_then_extends_a_file() {
    let (transport, _store) = appending_vault();
    let api = client(transport.clone());

    api.append("notes/meeting.md", "Summary: ...").await.unwrap();
    api.append("notes/meeting.md", "\nFollow-up").await.unwrap();

    let file = api.get_file("notes/meeting.md").await.unwrap();
    assert_eq!(file.content, "Summary: ...\nFollow-up");

    let first = &transport.recorded()[0];
    assert_eq!(first.header_value("Content-Type"), Some("text/markdown"));
}

#[tokio::test]
async fn patch_with_empty_heading_path_never_touches_the_transport() {
    let transport = MockTransport::returning(200, "");
    let api = client(transport.clone());

    let spec = InsertionSpec::new(
        PatchTarget::Heading(vec![]),
        PatchOperation::Append,
        "- done",
    );
    let err = api.patch("notes/plan.md", &spec).await.unwrap_err();

    assert_eq!(err.kind(), "validation");
    assert_eq!(transport.count(), 0);
}

#[tokio::test]
async fn patch_sends_the_joined_and_encoded_target_descriptor() {
    let transport = MockTransport::returning(200, "");
    let api = client(transport.clone());

    let spec = InsertionSpec::new(
        PatchTarget::Heading(vec!["Project".to_string(), "Status".to_string()]),
        PatchOperation::Append,
        "- done",
    );
    api.patch("notes/plan.md", &spec).await.unwrap();

    let requests = transport.recorded();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, Method::Patch);
    assert_eq!(req.header_value("Operation"), Some("append"));
    assert_eq!(req.header_value("Target-Type"), Some("heading"));
    assert_eq!(req.header_value("Target"), Some("Project%3A%3AStatus"));
    assert_eq!(req.header_value("Target-Delimiter"), Some("::"));
    assert_eq!(req.body.as_deref(), Some("- done"));
}

#[tokio::test]
async fn unresolvable_patch_target_surfaces_as_precondition() {
    let transport = MockTransport::returning(
        400,
        "{\"errorCode\": 40001, \"message\": \"Target not found\"}",
    );
    let api = client(transport);

    let spec = InsertionSpec::new(
        PatchTarget::Heading(vec!["Nowhere".to_string()]),
        PatchOperation::Replace,
        "x",
    );
    let err = api.patch("notes/plan.md", &spec).await.unwrap_err();
    assert_eq!(err.kind(), "precondition");
    assert!(err.to_string().contains("Target not found"));
}

#[tokio::test]
async fn plain_search_extracts_snippets_and_orders_by_relevance_then_path() {
    let body = serde_json::json!([
        {
            "filename": "b.md",
            "score": 2.0,
            "content": "abcXYZdefXYZghi",
            "matches": [{"start": 3, "end": 6}, {"start": 9, "end": 12}]
        },
        {
            "filename": "a.md",
            "score": 2.0,
            "content": "XYZ at the start",
            "matches": [{"start": 0, "end": 3}]
        },
        {
            "filename": "c.md",
            "score": 9.5,
            "content": "no spans reported",
            "matches": []
        }
    ])
    .to_string();
    let transport = MockTransport::returning(200, &body);
    let api = client(transport.clone());

    let query = SearchQuery::PlainText {
        query: "XYZ".to_string(),
        context_length: 3,
    };
    let results = match api.search(&query).await.unwrap() {
        restvault_client::SearchResponse::Plain(results) => results,
        _ => panic!("expected plain results"),
    };

    let paths: Vec<&str> = results.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["c.md", "a.md", "b.md"]);

    let b = results.iter().find(|r| r.path == "b.md").unwrap();
    assert_eq!(b.matches.len(), 2);
    for m in &b.matches {
        assert!(m.end <= m.context.len());
        assert_eq!(&m.context[m.start..m.end], "XYZ");
    }

    let req = &transport.recorded()[0];
    assert!(req.query.contains(&("query".to_string(), "XYZ".to_string())));
    assert!(req
        .query
        .contains(&("contextLength".to_string(), "3".to_string())));
}

#[tokio::test]
async fn structured_search_passes_ordering_through_unchanged() {
    let body = "[{\"filename\": \"z.md\"}, {\"filename\": \"a.md\"}, {\"filename\": \"m.md\"}]";
    let transport = MockTransport::returning(200, body);
    let api = client(transport.clone());

    let query = SearchQuery::Structured {
        expression: serde_json::json!({"glob": ["*.md", {"var": "path"}]}),
    };
    let value = match api.search(&query).await.unwrap() {
        restvault_client::SearchResponse::Structured(value) => value,
        _ => panic!("expected structured results"),
    };

    let order: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["filename"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["z.md", "a.md", "m.md"]);

    let req = &transport.recorded()[0];
    assert_eq!(
        req.header_value("Content-Type"),
        Some("application/vnd.olrapi.jsonlogic+json")
    );
}

#[tokio::test]
async fn malformed_structured_query_maps_to_precondition() {
    let transport = MockTransport::returning(
        400,
        "{\"errorCode\": 40002, \"message\": \"Invalid jsonlogic\"}",
    );
    let query = SearchQuery::Structured {
        expression: serde_json::json!({"bogus-op": []}),
    };
    let err = client(transport).search(&query).await.unwrap_err();
    assert_eq!(err.kind(), "precondition");
}

#[tokio::test]
async fn periodic_note_uses_note_json_accept_header() {
    let body = "{\"path\": \"daily/2026-08-30.md\", \"content\": \"## Today\", \"frontmatter\": {\"mood\": \"good\"}}";
    let transport = MockTransport::returning(200, body);
    let api = client(transport.clone());

    let file = api.get_periodic(Period::Daily).await.unwrap();
    assert_eq!(file.path, "daily/2026-08-30.md");
    assert_eq!(file.content, "## Today");
    assert!(file.metadata.unwrap().contains_key("mood"));

    let req = &transport.recorded()[0];
    assert_eq!(req.url, "https://127.0.0.1:27124/periodic/daily/");
    assert_eq!(
        req.header_value("Accept"),
        Some("application/vnd.olrapi.note+json")
    );
}

#[tokio::test]
async fn missing_periodic_note_is_not_found() {
    let transport = MockTransport::returning(
        404,
        "{\"errorCode\": 40400, \"message\": \"Periodic note does not exist\"}",
    );
    let err = client(transport).get_periodic(Period::Weekly).await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn recent_periodic_notes_forward_limit_and_content_flag() {
    let body = "[{\"path\": \"daily/a.md\"}, {\"path\": \"daily/b.md\", \"content\": \"x\"}]";
    let transport = MockTransport::returning(200, body);
    let api = client(transport.clone());

    let spec = PeriodicNoteSpec::new(Period::Daily, 2, true).unwrap();
    let notes = api.get_recent_periodic(&spec).await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[1].content, "x");

    let req = &transport.recorded()[0];
    assert_eq!(req.url, "https://127.0.0.1:27124/periodic/daily/recent");
    assert!(req.query.contains(&("limit".to_string(), "2".to_string())));
    assert!(req
        .query
        .contains(&("includeContent".to_string(), "true".to_string())));
}

#[tokio::test]
async fn recent_changes_builds_the_dql_query() {
    let body = "[{\"filename\": \"notes/new.md\", \"result\": {\"file.mtime\": \"2026-08-29\"}}]";
    let transport = MockTransport::returning(200, body);
    let api = client(transport.clone());

    let files = api.get_recent_changes(10, 90).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "notes/new.md");
    assert!(files[0].metadata.as_ref().unwrap().contains_key("file.mtime"));

    let req = &transport.recorded()[0];
    assert_eq!(
        req.header_value("Content-Type"),
        Some("application/vnd.olrapi.dataview.dql+txt")
    );
    let dql = req.body.as_deref().unwrap();
    assert!(dql.contains("TABLE file.mtime"));
    assert!(dql.contains("dur(90 days)"));
    assert!(dql.contains("LIMIT 10"));
}

#[tokio::test]
async fn transport_failures_propagate_without_retry() {
    let transport = MockTransport::with(|_| Err(Error::transport("connection refused")));
    let api = client(transport.clone());

    let err = api.get_file("a.md").await.unwrap_err();
    assert_eq!(err.kind(), "transport");
    // Zero automatic retries
    assert_eq!(transport.count(), 1);
}
