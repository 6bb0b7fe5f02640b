//! Tower of Hanoi - Tool-Calling Harness
//!
//! A strict state machine for the puzzle, the optimal recursive solver, and a
//! driver that lets a language model play the puzzle through tool calls:
//!
//! - **State machine** (`core`): legality, atomic moves, win detection
//! - **Solver** (`core::solver`): the `2^n - 1` optimal sequence
//! - **Driver** (`agent`): turn loop with `get_state`, `move` and
//!   `check_solved` tools
//! - **Endpoint** (`llm`): OpenAI-compatible chat client with retry
//! - **MCP** (`mcp`): the same puzzle served over the Model Context Protocol
//!
//! # Quick Start
//!
//! ```rust
//! use hanoi::core::{replay, solve, GameState, TowerId};
//!
//! let mut state = GameState::new(3).unwrap();
//! let record = replay(&mut state, &solve(3, TowerId::A, TowerId::C, TowerId::B));
//!
//! assert_eq!(record.len(), 7);
//! assert!(state.is_solved(TowerId::C));
//! ```

pub mod agent;
pub mod compare;
pub mod core;
pub mod events;
pub mod llm;
pub mod mcp;
pub mod render;

// Re-export commonly used items at crate root
pub use agent::{DriverConfig, DriverError, RunOutcome, RunReport, ToolDriver};
pub use crate::core::{GameState, HanoiError, Move, MoveViolation, TowerId};
pub use events::observers::LoggingObserver;
pub use events::{EventBus, HanoiEvent};
pub use mcp::HanoiServer;
