//! Random-Walk Baseline
//!
//! Estimates how many uniformly random legal moves it takes to stack every
//! disk on the target tower. A model that needs more moves than this is doing
//! no better than chance.

use crate::core::state::{GameState, HanoiError};
use crate::core::tower::TowerId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default move cap for a single walk
pub const DEFAULT_MAX_WALK_MOVES: u64 = 5_000_000;

/// Largest disk count the CLI simulates by default
pub const MAX_SIMULATED_DISKS: u32 = 8;

/// Summary of a batch of random walks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomWalkBaseline {
    /// Disks in each walk
    pub n_disks: u32,
    /// Walks attempted
    pub trials: usize,
    /// Walks that reached the target within the cap
    pub completed: usize,
    /// Mean moves over completed walks
    pub mean_moves: f64,
    /// Fewest moves in a completed walk
    pub min_moves: u64,
    /// Most moves in a completed walk
    pub max_moves: u64,
}

/// Walk randomly from the initial position until `target` holds every disk
///
/// Returns the number of moves taken, or `None` if `max_moves` was reached
/// first.
pub fn random_walk<R: Rng>(
    state: &mut GameState,
    target: TowerId,
    max_moves: u64,
    rng: &mut R,
) -> Option<u64> {
    let mut taken = 0u64;
    while !state.is_solved(target) {
        if taken >= max_moves {
            return None;
        }
        let moves = state.legal_moves();
        let mv = moves[rng.gen_range(0..moves.len())];
        // Only legal moves are drawn, so this cannot fail.
        let _ = state.apply(mv);
        taken += 1;
    }
    Some(taken)
}

/// Run `trials` seeded random walks from tower A to tower C
pub fn random_walk_baseline(
    n_disks: u32,
    trials: usize,
    max_moves: u64,
    seed: u64,
) -> Result<RandomWalkBaseline, HanoiError> {
    let mut state = GameState::new(n_disks)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut completed = 0usize;
    let mut total = 0u128;
    let mut min_moves = u64::MAX;
    let mut max_seen = 0u64;

    for _ in 0..trials {
        state.reset();
        if let Some(moves) = random_walk(&mut state, TowerId::C, max_moves, &mut rng) {
            completed += 1;
            total += u128::from(moves);
            min_moves = min_moves.min(moves);
            max_seen = max_seen.max(moves);
        }
    }

    let mean_moves = if completed == 0 {
        0.0
    } else {
        total as f64 / completed as f64
    };

    Ok(RandomWalkBaseline {
        n_disks,
        trials,
        completed,
        mean_moves,
        min_moves: if completed == 0 { 0 } else { min_moves },
        max_moves: max_seen,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::solver::optimal_move_count;

    #[test]
    fn test_single_disk_mean_near_two() {
        // From A every step reaches C with probability 1/2.
        let baseline = random_walk_baseline(1, 4000, DEFAULT_MAX_WALK_MOVES, 7).unwrap();
        assert_eq!(baseline.completed, 4000);
        assert!(
            (baseline.mean_moves - 2.0).abs() < 0.2,
            "mean was {}",
            baseline.mean_moves
        );
        assert_eq!(baseline.min_moves, 1);
    }

    #[test]
    fn test_walk_never_beats_optimal() {
        let baseline = random_walk_baseline(3, 200, DEFAULT_MAX_WALK_MOVES, 42).unwrap();
        assert!(baseline.min_moves >= optimal_move_count(3));
        assert!(baseline.mean_moves > optimal_move_count(3) as f64);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let a = random_walk_baseline(2, 50, DEFAULT_MAX_WALK_MOVES, 99).unwrap();
        let b = random_walk_baseline(2, 50, DEFAULT_MAX_WALK_MOVES, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_move_cap_marks_walk_unfinished() {
        let mut state = GameState::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_walk(&mut state, TowerId::C, 3, &mut rng), None);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_zero_disks_rejected() {
        assert!(random_walk_baseline(0, 1, 10, 0).is_err());
    }
}
