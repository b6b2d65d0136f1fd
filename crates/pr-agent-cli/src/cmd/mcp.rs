use crate::tools::ToolRegistry;
use pr_agent_core::prompts;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};
use tracing::{info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "pr-agent";

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Serve JSON-RPC over stdin/stdout until stdin closes.
pub fn run(registry: &ToolRegistry) -> anyhow::Result<()> {
    info!(tools = registry.tools().len(), "pr-agent MCP server listening on stdio");
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(stdin.lock(), stdout.lock(), registry)?;
    info!("stdin closed, shutting down");
    Ok(())
}

/// One JSON-RPC message per line in, one response per line out. Requests are
/// handled strictly in order. Lines are decoded individually, so a line that
/// is not UTF-8 or not JSON gets a parse error and the session continues.
pub fn serve<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    registry: &ToolRegistry,
) -> anyhow::Result<()> {
    for line in input.split(b'\n') {
        let line = line?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        if let Some(response) = handle_line(&line, registry) {
            serde_json::to_writer(&mut output, &response)?;
            writeln!(output)?;
            output.flush()?;
        }
    }
    Ok(())
}

/// Decode one line and answer it. Returns `None` for notifications.
pub fn handle_line(line: &[u8], registry: &ToolRegistry) -> Option<JsonRpcResponse> {
    let raw: Value = match serde_json::from_slice(line) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "unparseable request line");
            return Some(JsonRpcResponse::err(None, -32700, format!("parse error: {e}")));
        }
    };

    // Notifications carry no "id" and get no response.
    if !raw
        .as_object()
        .map(|o| o.contains_key("id"))
        .unwrap_or(false)
    {
        return None;
    }

    let id = raw.get("id").cloned();
    match serde_json::from_value::<JsonRpcRequest>(raw) {
        Ok(request) => Some(handle_request(&request, registry)),
        Err(e) => Some(JsonRpcResponse::err(
            id,
            -32600,
            format!("invalid request: {e}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Request dispatch
// ---------------------------------------------------------------------------

pub fn handle_request(req: &JsonRpcRequest, registry: &ToolRegistry) -> JsonRpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),

        "ping" => JsonRpcResponse::ok(id, serde_json::json!({})),

        "tools/list" => JsonRpcResponse::ok(
            id,
            serde_json::json!({ "tools": registry.descriptors() }),
        ),

        "tools/call" => {
            let Some(params) = &req.params else {
                return JsonRpcResponse::err(id, -32602, "missing params");
            };
            let Some(tool_name) = params["name"].as_str() else {
                return JsonRpcResponse::err(id, -32602, "missing tool name in params");
            };
            let args = params.get("arguments").cloned().unwrap_or(Value::Null);

            let result = registry.call(tool_name, args);
            JsonRpcResponse::ok(
                id,
                serde_json::to_value(&result)
                    .unwrap_or_else(|e| serde_json::json!({"error": e.to_string()})),
            )
        }

        "prompts/list" => {
            let list: Vec<Value> = prompts::PROMPTS
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "description": p.description,
                        "arguments": []
                    })
                })
                .collect();
            JsonRpcResponse::ok(id, serde_json::json!({ "prompts": list }))
        }

        "prompts/get" => {
            let name = req
                .params
                .as_ref()
                .and_then(|p| p["name"].as_str());
            let Some(name) = name else {
                return JsonRpcResponse::err(id, -32602, "missing prompt name in params");
            };
            match prompts::find(name) {
                None => JsonRpcResponse::err(id, -32602, format!("prompt not found: {name}")),
                Some(p) => JsonRpcResponse::ok(
                    id,
                    serde_json::json!({
                        "description": p.description,
                        "messages": [{
                            "role": "user",
                            "content": { "type": "text", "text": p.text }
                        }]
                    }),
                ),
            }
        }

        other => JsonRpcResponse::err(id, -32601, format!("method not found: {other}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
