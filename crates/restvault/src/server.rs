//! Newline-delimited JSON-RPC loop over stdio.
//!
//! One request per line in, one response per line out, flushed after each
//! write. Notifications (messages without an `id`) are consumed silently.
//! Tool failures are reported two ways, mirroring how clients expect them:
//! malformed calls become JSON-RPC errors, while failures inside a valid
//! tool call become a successful response carrying `isError: true`.

use anyhow::Context;
use restvault_tools::ToolRegistry;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// MCP server state: the tool registry plus protocol plumbing.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Read newline-delimited requests from stdin until EOF, writing one
    /// response line per request to stdout.
    pub async fn run_stdio(&self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await.context("reading stdin")? {
            if line.trim().is_empty() {
                continue;
            }
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let mut out = serde_json::to_string(&response)?;
            out.push('\n');
            stdout
                .write_all(out.as_bytes())
                .await
                .context("writing stdout")?;
            stdout.flush().await.context("flushing stdout")?;
        }
        debug!("stdin closed, shutting down");
        Ok(())
    }

    async fn handle_line(&self, line: &str) -> Option<Value> {
        let message: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "ignoring unparseable request line");
                return Some(error_response(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };
        self.handle(&message).await
    }

    /// Dispatch one JSON-RPC message. Returns `None` for notifications.
    pub async fn handle(&self, message: &Value) -> Option<Value> {
        let method = message.get("method").and_then(Value::as_str).unwrap_or("");
        let id = message.get("id").cloned();

        // A message without an id is a notification; nothing is ever
        // written back for it, including errors.
        let id = id?;

        debug!(method, "handling request");
        let response = match method {
            "initialize" => self.initialize(id),
            "ping" => ok_response(id, json!({})),
            "tools/list" => self.list_tools(id),
            "tools/call" => self.call_tool(id, message.get("params")).await,
            other => error_response(id, METHOD_NOT_FOUND, format!("Unknown method: {other}")),
        };
        Some(response)
    }

    fn initialize(&self, id: Value) -> Value {
        ok_response(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                },
                "serverInfo": {
                    "name": "restvault",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )
    }

    fn list_tools(&self, id: Value) -> Value {
        ok_response(id, json!({"tools": self.registry.tools()}))
    }

    async fn call_tool(&self, id: Value, params: Option<&Value>) -> Value {
        let Some(name) = params
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
        else {
            return error_response(id, INVALID_PARAMS, "Missing tool name".to_string());
        };
        let args = params
            .and_then(|p| p.get("arguments"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_else(Map::new);

        match self.registry.call(name, &args).await {
            Ok(contents) => ok_response(id, json!({"content": contents, "isError": false})),
            // Malformed calls are protocol errors; everything past
            // validation is a tool-level failure the agent can read.
            Err(err) if err.kind() == "validation" => {
                error_response(id, INVALID_PARAMS, err.to_string())
            }
            Err(err) => {
                warn!(tool = name, error = %err, "tool call failed");
                ok_response(
                    id,
                    json!({
                        "content": [{"type": "text", "text": format!("Error: {err}")}],
                        "isError": true,
                    }),
                )
            }
        }
    }
}

fn ok_response(id: Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn error_response(id: Value, code: i64, message: String) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
}
