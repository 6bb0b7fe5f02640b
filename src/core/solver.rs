//! Recursive Solver and Move Records
//!
//! [`solve`] produces the canonical optimal sequence for `n` disks. It is a
//! pure function; to check it against a live puzzle, [`replay`] feeds the
//! sequence through [`GameState::apply_move`] and records the legality of
//! every entry exactly as a live session would.

use crate::core::state::{GameState, Move};
use crate::core::tower::TowerId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Minimum number of moves for `n` disks (`2^n - 1`)
pub fn optimal_move_count(n_disks: u32) -> u64 {
    if n_disks >= 64 {
        return u64::MAX;
    }
    (1u64 << n_disks) - 1
}

/// Largest disk count the CLI will solve and replay move by move
pub const MAX_REPLAY_DISKS: u32 = 20;

/// Optimal move sequence transferring `n` disks from `source` to `destination`
///
/// Moves the top `n - 1` disks to `spare`, the largest disk to
/// `destination`, then the `n - 1` disks from `spare` onto it.
/// Materialises all `2^n - 1` moves; use [`solve_iter`] to stream them.
pub fn solve(n: u32, source: TowerId, destination: TowerId, spare: TowerId) -> Vec<Move> {
    solve_iter(n, source, destination, spare).collect()
}

/// Lazy form of [`solve`]
///
/// Holds at most `2n + 1` pending frames, so any disk count can be
/// started without allocating the whole sequence.
pub fn solve_iter(n: u32, source: TowerId, destination: TowerId, spare: TowerId) -> SolveMoves {
    SolveMoves {
        stack: vec![Frame::Transfer {
            n,
            source,
            destination,
            spare,
        }],
        remaining: (n < 64).then(|| optimal_move_count(n)),
    }
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Transfer {
        n: u32,
        source: TowerId,
        destination: TowerId,
        spare: TowerId,
    },
    Emit(Move),
}

/// Iterator over the optimal move sequence, see [`solve_iter`]
#[derive(Debug, Clone)]
pub struct SolveMoves {
    stack: Vec<Frame>,
    /// Exact count left, when it fits in a `u64`
    remaining: Option<u64>,
}

impl Iterator for SolveMoves {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Emit(mv) => {
                    if let Some(left) = self.remaining.as_mut() {
                        *left = left.saturating_sub(1);
                    }
                    return Some(mv);
                }
                Frame::Transfer { n: 0, .. } => {}
                Frame::Transfer {
                    n,
                    source,
                    destination,
                    spare,
                } => {
                    // Pushed in reverse: first half runs first.
                    self.stack.push(Frame::Transfer {
                        n: n - 1,
                        source: spare,
                        destination,
                        spare: source,
                    });
                    self.stack.push(Frame::Emit(Move::new(source, destination)));
                    self.stack.push(Frame::Transfer {
                        n: n - 1,
                        source,
                        destination: spare,
                        spare: destination,
                    });
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining.map(usize::try_from) {
            Some(Ok(left)) => (left, Some(left)),
            _ => (0, None),
        }
    }
}

/// One attempted move and whether the state machine accepted it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    /// The attempted move
    #[serde(flatten)]
    pub mv: Move,
    /// True if the move was applied
    pub legal: bool,
}

/// Every move a solving method attempted, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    entries: Vec<MoveEntry>,
}

impl MoveRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attempted move
    pub fn push(&mut self, mv: Move, legal: bool) {
        self.entries.push(MoveEntry { mv, legal });
    }

    /// All entries in attempt order
    pub fn entries(&self) -> &[MoveEntry] {
        &self.entries
    }

    /// Number of attempted moves
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was attempted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves the state machine accepted
    pub fn accepted(&self) -> usize {
        self.entries.iter().filter(|e| e.legal).count()
    }

    /// Moves the state machine rejected
    pub fn rejected(&self) -> usize {
        self.entries.iter().filter(|e| !e.legal).count()
    }

    /// Accepted moves that immediately undo the previous accepted move
    pub fn oscillations(&self) -> usize {
        let accepted: Vec<Move> = self
            .entries
            .iter()
            .filter(|e| e.legal)
            .map(|e| e.mv)
            .collect();

        accepted
            .windows(2)
            .filter(|pair| pair[1] == pair[0].reversed())
            .count()
    }
}

/// Apply `moves` to `state` one by one, recording the legality of each
///
/// Every entry is attempted exactly once; a rejected move does not stop
/// the replay. Accepts slices as well as iterators such as [`solve_iter`].
pub fn replay<I>(state: &mut GameState, moves: I) -> MoveRecord
where
    I: IntoIterator,
    I::Item: Borrow<Move>,
{
    let mut record = MoveRecord::new();
    for mv in moves {
        let mv = *mv.borrow();
        let legal = state.apply(mv).is_ok();
        record.push(mv, legal);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tower::TowerId::{A, B, C};

    // ==========================================
    // Solver Tests
    // ==========================================

    #[test]
    fn test_solve_zero_disks() {
        assert!(solve(0, A, C, B).is_empty());
    }

    #[test]
    fn test_solve_one_disk() {
        assert_eq!(solve(1, A, C, B), vec![Move::new(A, C)]);
    }

    #[test]
    fn test_solve_three_disks_sequence() {
        let expected = vec![
            Move::new(A, C),
            Move::new(A, B),
            Move::new(C, B),
            Move::new(A, C),
            Move::new(B, A),
            Move::new(B, C),
            Move::new(A, C),
        ];
        assert_eq!(solve(3, A, C, B), expected);
    }

    #[test]
    fn test_solve_ten_disks_length() {
        assert_eq!(solve(10, A, C, B).len(), 1023);
    }

    #[test]
    fn test_iter_matches_collected_sequence() {
        let lazy: Vec<Move> = solve_iter(6, B, A, C).collect();
        assert_eq!(lazy, solve(6, B, A, C));
        assert_eq!(solve_iter(6, B, A, C).size_hint(), (63, Some(63)));
    }

    #[test]
    fn test_iter_starts_huge_puzzles_lazily() {
        let head: Vec<Move> = solve_iter(64, A, C, B).take(3).collect();
        assert_eq!(head, vec![Move::new(A, B), Move::new(A, C), Move::new(B, C)]);

        let mut moves = solve_iter(100, A, C, B);
        assert_eq!(moves.size_hint(), (0, None));
        assert_eq!(moves.nth(2), Some(Move::new(B, C)));
    }

    #[test]
    fn test_optimal_move_count() {
        assert_eq!(optimal_move_count(0), 0);
        assert_eq!(optimal_move_count(1), 1);
        assert_eq!(optimal_move_count(3), 7);
        assert_eq!(optimal_move_count(32), 4_294_967_295);
    }

    // ==========================================
    // Replay Tests
    // ==========================================

    #[test]
    fn test_replay_solution_solves() {
        let mut state = GameState::new(3).unwrap();
        let record = replay(&mut state, &solve(3, A, C, B));

        assert_eq!(record.len(), 7);
        assert_eq!(record.accepted(), 7);
        assert_eq!(record.rejected(), 0);
        assert!(state.is_solved(C));
        assert_eq!(state.peek(C), &[3, 2, 1]);
    }

    #[test]
    fn test_replay_to_other_tower() {
        let mut state = GameState::new(4).unwrap();
        replay(&mut state, &solve(4, A, B, C));
        assert!(state.is_solved(B));
        assert!(!state.is_solved(C));
    }

    #[test]
    fn test_replay_streams_from_iterator() {
        let mut state = GameState::new(12).unwrap();
        let record = replay(&mut state, solve_iter(12, A, C, B));
        assert_eq!(record.accepted(), 4095);
        assert!(state.is_solved(C));
    }

    #[test]
    fn test_replay_records_rejections() {
        let mut state = GameState::new(2).unwrap();
        let record = replay(&mut state, &[Move::new(A, B), Move::new(A, B), Move::new(A, C)]);

        let legality: Vec<bool> = record.entries().iter().map(|e| e.legal).collect();
        assert_eq!(legality, vec![true, false, true]);
        assert_eq!(state.move_count(), 2);
    }

    // ==========================================
    // MoveRecord Tests
    // ==========================================

    #[test]
    fn test_oscillations_counted() {
        let mut record = MoveRecord::new();
        record.push(Move::new(A, B), true);
        record.push(Move::new(B, A), true);
        record.push(Move::new(A, B), true);
        record.push(Move::new(A, C), false);
        record.push(Move::new(B, C), true);

        assert_eq!(record.oscillations(), 2);
    }

    #[test]
    fn test_optimal_solution_has_no_oscillations() {
        let mut state = GameState::new(5).unwrap();
        let record = replay(&mut state, &solve(5, A, C, B));
        assert_eq!(record.oscillations(), 0);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = MoveEntry {
            mv: Move::new(A, C),
            legal: true,
        };
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"source": "A", "destination": "C", "legal": true})
        );
    }
}
