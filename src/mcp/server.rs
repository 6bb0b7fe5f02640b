//! Hanoi MCP Server Implementation
//!
//! Holds one puzzle and routes MCP tool calls onto it. Results use the same
//! JSON shapes as the tool-calling driver, so a model sees identical
//! answers whichever way it plays.

use crate::agent::tools::{move_by_labels, ToolOutcome, CHECK_SOLVED, GET_STATE, MOVE};
use crate::core::{GameState, HanoiError, TowerId};
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    schemars::{self, JsonSchema},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Arguments of the `move` tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MoveRequest {
    /// Tower to take the top disk from (A, B or C)
    pub source: String,
    /// Tower to place the disk on (A, B or C)
    pub destination: String,
}

/// Hanoi MCP Server
#[derive(Clone)]
pub struct HanoiServer {
    state: Arc<Mutex<GameState>>,
    target: TowerId,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl HanoiServer {
    /// Create a server with `n_disks` on tower A and tower C as the target
    pub fn new(n_disks: u32) -> Result<Self, HanoiError> {
        Ok(Self::with_state(GameState::new(n_disks)?, TowerId::C))
    }

    /// Create a server around an existing puzzle
    pub fn with_state(state: GameState, target: TowerId) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            target,
            tool_router: Self::tool_router(),
        }
    }

    /// Copy of the current puzzle
    pub async fn state(&self) -> GameState {
        self.state.lock().await.clone()
    }

    fn respond(outcome: ToolOutcome) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(&outcome.to_json())
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        if outcome.is_success() {
            Ok(CallToolResult::success(vec![Content::text(json)]))
        } else {
            Ok(CallToolResult::error(vec![Content::text(json)]))
        }
    }

    /// Get the disks on every tower and the move count.
    #[tool(
        name = "get_state",
        description = "Get the disks on every tower (bottom to top) and the number of moves made so far"
    )]
    async fn get_state(&self) -> Result<CallToolResult, McpError> {
        let snapshot = self.state.lock().await.snapshot();
        Self::respond(ToolOutcome::State(snapshot))
    }

    /// Move the top disk from one tower to another.
    #[tool(name = "move", description = "Move the top disk from one tower to another")]
    async fn move_disk(
        &self,
        Parameters(request): Parameters<MoveRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let outcome = move_by_labels(&mut state, &request.source, &request.destination);
        debug!(
            source = %request.source,
            destination = %request.destination,
            success = outcome.is_success(),
            "MCP move"
        );
        Self::respond(outcome)
    }

    /// Check whether every disk is on the target tower.
    #[tool(
        name = "check_solved",
        description = "Check whether every disk is on the target tower"
    )]
    async fn check_solved(&self) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        Self::respond(ToolOutcome::Checked {
            solved: state.is_solved(self.target),
            target: self.target,
            moves: state.move_count(),
        })
    }

    /// Put every disk back on the source tower.
    #[tool(
        name = "reset",
        description = "Restart the puzzle with every disk back on the source tower"
    )]
    async fn reset(&self) -> Result<CallToolResult, McpError> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.reset();
            state.snapshot()
        };
        Self::respond(ToolOutcome::State(snapshot))
    }
}

#[tool_handler]
impl ServerHandler for HanoiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "hanoi-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(format!(
                "Tower of Hanoi puzzle. Move every disk to tower {} without ever placing a \
                 larger disk on a smaller one. Available tools: {}, {}, {}, reset.",
                self.target, GET_STATE, MOVE, CHECK_SOLVED
            )),
        }
    }
}
