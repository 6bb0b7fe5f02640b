//! MCP Server for the Puzzle
//!
//! Exposes a single puzzle as MCP tools over stdio, so any MCP client can
//! play it.
//!
//! # Available Tools
//!
//! - `get_state` - Disks on every tower and the move count
//! - `move` - Move the top disk between two towers
//! - `check_solved` - Whether the target tower holds every disk
//! - `reset` - Restart the puzzle

pub mod server;

pub use server::{HanoiServer, MoveRequest};
