//! Method comparison
//!
//! Puts the recursive solver, a model run and the random-walk baseline side
//! by side. The solver is measured through [`GameState::apply`], the same
//! path a live session uses, so its move count and legality are directly
//! comparable.

use crate::agent::{RunOutcome, RunReport};
use crate::core::{
    optimal_move_count, solve_iter, GameState, HanoiError, RandomWalkBaseline, TowerId,
};
use serde::Serialize;
use std::fmt::Write;

/// Recursive solver measured on a live puzzle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmResult {
    /// Moves attempted
    pub moves: u64,
    /// True if the state machine accepted every move
    pub all_legal: bool,
    /// True if the target tower ended up full
    pub solved: bool,
}

/// A model run reduced to the numbers worth comparing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelResult {
    /// Model name
    pub model: String,
    /// How the run ended
    pub outcome: RunOutcome,
    /// Accepted moves
    pub moves: u64,
    /// Moves the state machine refused
    pub rejected: usize,
    /// Accepted moves that undid the previous one
    pub oscillations: usize,
    /// Malformed tool calls
    pub invalid_calls: usize,
    /// Round-trips with the model
    pub turns: usize,
    /// `optimal / moves` for solved runs
    pub efficiency: Option<f64>,
    /// Wall-clock seconds
    pub elapsed_secs: f64,
    /// Estimated cost in USD
    pub cost_usd: f64,
}

/// Everything `compare` mode reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Disks in the puzzle
    pub n_disks: u32,
    /// `2^n - 1`
    pub optimal_moves: u64,
    /// Recursive solver
    pub algorithm: AlgorithmResult,
    /// Model run, if one was made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelResult>,
    /// Random-walk baseline, if simulated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<RandomWalkBaseline>,
}

/// `optimal / moves`, or `None` when no move was made
pub fn efficiency(optimal: u64, moves: u64) -> Option<f64> {
    if moves == 0 {
        None
    } else {
        Some(optimal as f64 / moves as f64)
    }
}

/// Replay the optimal sequence on a fresh A-to-C puzzle
///
/// Moves are streamed from [`solve_iter`] and only counted, so memory use
/// does not grow with the disk count.
pub fn measure_algorithm(n_disks: u32) -> Result<AlgorithmResult, HanoiError> {
    let mut state = GameState::new(n_disks)?;
    let mut moves = 0u64;
    let mut all_legal = true;
    for mv in solve_iter(n_disks, TowerId::A, TowerId::C, TowerId::B) {
        moves += 1;
        all_legal &= state.apply(mv).is_ok();
    }
    Ok(AlgorithmResult {
        moves,
        all_legal,
        solved: state.is_solved(TowerId::C),
    })
}

impl ModelResult {
    /// Summarise a driver report
    pub fn from_report(n_disks: u32, report: &RunReport) -> Self {
        let efficiency = if report.outcome.is_solved() {
            efficiency(optimal_move_count(n_disks), report.move_count)
        } else {
            None
        };

        Self {
            model: report.model.clone(),
            outcome: report.outcome,
            moves: report.move_count,
            rejected: report.moves.rejected(),
            oscillations: report.moves.oscillations(),
            invalid_calls: report.invalid_calls,
            turns: report.turns,
            efficiency,
            elapsed_secs: report.elapsed.as_secs_f64(),
            cost_usd: report.cost_usd,
        }
    }
}

impl ComparisonReport {
    /// Build a report; the solver is always measured
    pub fn new(
        n_disks: u32,
        model: Option<ModelResult>,
        baseline: Option<RandomWalkBaseline>,
    ) -> Result<Self, HanoiError> {
        Ok(Self {
            n_disks,
            optimal_moves: optimal_move_count(n_disks),
            algorithm: measure_algorithm(n_disks)?,
            model,
            baseline,
        })
    }

    /// Human-readable report
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Comparing methods for solving {}-disk Tower of Hanoi puzzle...",
            self.n_disks
        );
        let _ = writeln!(
            out,
            "Optimal solution requires {} moves.\n",
            self.optimal_moves
        );

        let verdict = if self.algorithm.all_legal && self.algorithm.solved {
            "optimal"
        } else {
            "INVALID"
        };
        let _ = writeln!(
            out,
            "Algorithm solution: {} moves ({})\n",
            self.algorithm.moves, verdict
        );

        if let Some(model) = &self.model {
            let _ = writeln!(out, "Model solution ({}):", model.model);
            match model.outcome {
                RunOutcome::Solved => {
                    let _ = writeln!(
                        out,
                        "  - Moves: {} (Efficiency: {:.2}%)",
                        model.moves,
                        model.efficiency.unwrap_or(0.0) * 100.0
                    );
                }
                other => {
                    let _ = writeln!(out, "  - Failed to solve the puzzle: {}", other);
                    let _ = writeln!(out, "  - Moves made: {}", model.moves);
                }
            }
            let _ = writeln!(
                out,
                "  - Rejected moves: {}, reversals: {}, invalid calls: {}",
                model.rejected, model.oscillations, model.invalid_calls
            );
            let _ = writeln!(out, "  - Turns: {}", model.turns);
            let _ = writeln!(out, "  - Time taken: {:.2} seconds", model.elapsed_secs);
            let _ = writeln!(out);
        }

        if let Some(baseline) = &self.baseline {
            if baseline.completed > 0 {
                let _ = writeln!(
                    out,
                    "Random-walk baseline ({} of {} walks finished): mean {:.1} moves (min {}, max {})",
                    baseline.completed,
                    baseline.trials,
                    baseline.mean_moves,
                    baseline.min_moves,
                    baseline.max_moves
                );
            } else {
                let _ = writeln!(
                    out,
                    "Random-walk baseline: none of {} walks finished",
                    baseline.trials
                );
            }
            let _ = writeln!(out);
        }

        out.push_str("Comparison complete.");
        out
    }
}
