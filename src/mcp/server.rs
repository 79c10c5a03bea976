//! Main server loop handling JSON-RPC messages over stdio.

use super::handlers::ToolHandlers;
use super::protocol::*;
use super::tools::get_tools;
use crate::core::controller::CompanySearchController;
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub const SERVER_NAME: &str = "gbizinfo-mcp";
const PREVIEW_CHARS: usize = 100;

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", text.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        text.to_string()
    }
}

fn respond<S: Serialize>(id: Option<Value>, result: S) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse::success(id, v),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {}", e)),
    }
}

pub struct McpServer<T: HttpTransport> {
    handlers: ToolHandlers<T>,
}

impl<T: HttpTransport> McpServer<T> {
    pub fn new(controller: CompanySearchController<T>) -> Self {
        Self {
            handlers: ToolHandlers::new(controller),
        }
    }

    /// 讀 stdin、寫 stdout
    pub async fn run(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run_with(stdin, stdout).await
    }

    /// 一行一則訊息；通知不回覆
    pub async fn run_with<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("🚀 MCP server started, waiting for messages...");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            tracing::debug!("<- {}", preview(line));

            let Some(response) = self.handle(line).await else {
                continue;
            };
            let out = serde_json::to_string(&response)?;
            tracing::debug!("-> {}", preview(&out));

            writer.write_all(out.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        tracing::info!("👋 MCP server shutting down");
        Ok(())
    }

    /// 單一 JSON-RPC 訊息；通知回傳 None
    pub async fn handle(&self, msg: &str) -> Option<JsonRpcResponse> {
        let req: JsonRpcRequest = match serde_json::from_str(msg) {
            Ok(r) => r,
            Err(e) => return Some(JsonRpcResponse::error(None, PARSE_ERROR, e.to_string())),
        };

        if req.is_notification() {
            tracing::debug!("Notification received: {}", req.method);
            return None;
        }

        let id = req.id.clone();
        if req.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", req.jsonrpc),
            ));
        }

        let response = match req.method.as_str() {
            "initialize" => respond(
                id,
                InitializeResult {
                    protocol_version: PROTOCOL_VERSION.into(),
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability {
                            list_changed: false,
                        },
                    },
                    server_info: ServerInfo {
                        name: SERVER_NAME.into(),
                        version: env!("CARGO_PKG_VERSION").into(),
                    },
                },
            ),

            "ping" => JsonRpcResponse::success(id, Value::Object(Default::default())),

            "tools/list" => respond(id, ToolsListResult { tools: get_tools() }),

            "tools/call" => {
                let params: ToolCallParams = match serde_json::from_value(req.params) {
                    Ok(p) => p,
                    Err(e) => return Some(JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string())),
                };

                tracing::info!("🔧 Calling tool: {}", params.name);
                let result = self.handlers.handle(&params.name, params.arguments).await;
                respond(id, result)
            }

            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Unknown method: {}", req.method),
            ),
        };

        Some(response)
    }
}
