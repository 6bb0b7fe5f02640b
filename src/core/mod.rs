//! Core puzzle logic
//!
//! - `tower`: closed set of tower identifiers
//! - `state`: state machine (legality, mutation, win detection)
//! - `solver`: optimal recursive solver and move records
//! - `baseline`: random-walk efficiency baseline

pub mod baseline;
pub mod solver;
pub mod state;
pub mod tower;

pub use baseline::{random_walk, random_walk_baseline, RandomWalkBaseline};
pub use solver::{
    optimal_move_count, replay, solve, solve_iter, MoveEntry, MoveRecord, SolveMoves,
    MAX_REPLAY_DISKS,
};
pub use state::{
    GameState, HanoiError, Move, MoveApplied, MoveViolation, TopSnapshot, TowerSnapshot,
    MAX_DISKS,
};
pub use tower::TowerId;
