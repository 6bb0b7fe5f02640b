//! Tool-calling agent
//!
//! - `config`: run settings ([`DriverConfig`])
//! - `tools`: the three tools and their dispatch onto the state machine
//! - `driver`: the turn loop ([`ToolDriver`])

pub mod config;
pub mod driver;
pub mod tools;

pub use config::{DriverConfig, DEFAULT_MAX_TURNS};
pub use driver::{system_prompt, DriverError, RunOutcome, RunReport, ToolDriver};
pub use tools::{
    dispatch, move_by_labels, parse_move, tool_definitions, ToolCallError, ToolOutcome,
};
