//! Baseline Scaling Benchmark
//!
//! Compares the optimal solver with the random-walk baseline across disk
//! counts and fits the growth of the random walk on a log scale.
//!
//! # Usage
//!
//! ```bash
//! cargo bench --bench baseline_scaling
//! ```

use hanoi::core::baseline::DEFAULT_MAX_WALK_MOVES;
use hanoi::core::{optimal_move_count, random_walk_baseline, replay, solve, GameState, TowerId};
use std::time::Instant;

#[derive(Debug)]
struct BenchmarkResult {
    n_disks: u32,
    optimal: u64,
    solver_us: f64,
    walk_mean: f64,
    walk_completed: usize,
    walk_ms: f64,
}

/// Time `reps` solve+replay rounds and one batch of random walks
fn run_disk_count(n_disks: u32, reps: usize, trials: usize, seed: u64) -> BenchmarkResult {
    let start = Instant::now();
    for _ in 0..reps {
        let mut state = GameState::new(n_disks).unwrap();
        let record = replay(&mut state, &solve(n_disks, TowerId::A, TowerId::C, TowerId::B));
        assert!(state.is_solved(TowerId::C) && record.rejected() == 0);
    }
    let solver_us = start.elapsed().as_secs_f64() * 1e6 / reps as f64;

    let start = Instant::now();
    let baseline =
        random_walk_baseline(n_disks, trials, DEFAULT_MAX_WALK_MOVES, seed).unwrap();
    let walk_ms = start.elapsed().as_secs_f64() * 1e3;

    BenchmarkResult {
        n_disks,
        optimal: optimal_move_count(n_disks),
        solver_us,
        walk_mean: baseline.mean_moves,
        walk_completed: baseline.completed,
        walk_ms,
    }
}

/// Least-squares slope and intercept for y = a*x + b
fn linear_fit(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(xi, yi)| xi * yi).sum();
    let sum_x2: f64 = x.iter().map(|xi| xi * xi).sum();

    let denom = n * sum_x2 - sum_x * sum_x;
    if denom.abs() < 1e-10 {
        return (0.0, sum_y / n);
    }

    let a = (n * sum_xy - sum_x * sum_y) / denom;
    let b = (sum_y - a * sum_x) / n;
    (a, b)
}

fn main() {
    let reps = 200;
    let trials = 200;
    let seed = 42;

    println!("=== Hanoi Baseline Scaling Benchmark ===\n");
    println!("Parameters: reps={}, trials={}, seed={}", reps, trials, seed);
    println!();

    let mut results = Vec::new();
    for n in 1..=6 {
        let result = run_disk_count(n, reps, trials, seed);
        println!(
            "n={:2} | optimal={:>4} | solver={:>8.2}us | walk_mean={:>10.1} ({}/{}) | ratio={:>7.1} | walk={:>7.1}ms",
            result.n_disks,
            result.optimal,
            result.solver_us,
            result.walk_mean,
            result.walk_completed,
            trials,
            result.walk_mean / result.optimal as f64,
            result.walk_ms,
        );
        results.push(result);
    }

    let x: Vec<f64> = results.iter().map(|r| r.n_disks as f64).collect();
    let y: Vec<f64> = results.iter().map(|r| r.walk_mean.max(1.0).ln()).collect();
    let (slope, _) = linear_fit(&x, &y);

    println!();
    println!("Random walk grows by ~{:.2}x per extra disk (optimal: 2x)", slope.exp());

    let json_results: Vec<serde_json::Value> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "n_disks": r.n_disks,
                "optimal": r.optimal,
                "solver_us": r.solver_us,
                "walk_mean": r.walk_mean,
                "walk_completed": r.walk_completed,
                "walk_ms": r.walk_ms,
            })
        })
        .collect();

    let output = serde_json::json!({
        "parameters": { "reps": reps, "trials": trials, "seed": seed },
        "results": json_results,
        "analysis": { "walk_growth_per_disk": slope.exp() }
    });

    println!("\n=== JSON Output ===\n");
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
