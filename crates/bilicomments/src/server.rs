// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MCP server exposing the comment tools over stdio.
//!
//! A tool failure is returned as an error-flagged text result, so the
//! calling agent always reads a message instead of a protocol error.

use bilicomments_core::BiliError;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::transport::stdio;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use tracing::{info, warn};

use crate::tools::{
    failure_text, CommentTools, DynamicCommentsArgs, VideoCommentsArgs, DYNAMIC_FAILURE_PREFIX,
    VIDEO_FAILURE_PREFIX,
};

const INSTRUCTIONS: &str = "Reads Bilibili video and dynamic comments, including nested replies. \
Requires a Bilibili cookie with SESSDATA, passed per call or configured on the server.";

/// MCP handler wrapping [`CommentTools`].
#[derive(Clone)]
pub struct CommentServer {
    tools: CommentTools,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CommentServer {
    pub fn new(tools: CommentTools) -> Self {
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Fetch comments of a Bilibili video with paging, sorting and nested replies. Requires a valid Bilibili cookie."
    )]
    async fn get_video_comments(
        &self,
        Parameters(args): Parameters<VideoCommentsArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(
            self.tools.video_comments(args).await,
            VIDEO_FAILURE_PREFIX,
        ))
    }

    #[tool(
        description = "Fetch comments of a Bilibili dynamic with paging and nested replies. Requires a valid Bilibili cookie."
    )]
    async fn get_dynamic_comments(
        &self,
        Parameters(args): Parameters<DynamicCommentsArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(
            self.tools.dynamic_comments(args).await,
            DYNAMIC_FAILURE_PREFIX,
        ))
    }
}

#[tool_handler]
impl ServerHandler for CommentServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

fn into_tool_result(result: Result<String, BiliError>, prefix: &str) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => {
            warn!(error = %err, "tool call failed");
            CallToolResult::error(vec![Content::text(failure_text(prefix, &err))])
        }
    }
}

/// Serves the tools on stdin/stdout until the client disconnects.
pub async fn run_server(tools: CommentTools) -> Result<(), BiliError> {
    info!(version = env!("CARGO_PKG_VERSION"), "starting MCP server on stdio");

    let service = CommentServer::new(tools)
        .serve(stdio())
        .await
        .map_err(|e| BiliError::Internal(format!("failed to start MCP server: {e}")))?;
    let reason = service
        .waiting()
        .await
        .map_err(|e| BiliError::Internal(format!("MCP server task failed: {e}")))?;

    info!(?reason, "MCP server stopped");
    Ok(())
}
