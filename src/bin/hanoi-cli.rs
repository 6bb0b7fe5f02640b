//! Hanoi CLI - play, solve, or let a model solve the Tower of Hanoi
//!
//! Modes:
//! - `manual`: type moves like `A C`, `q` to quit
//! - `algorithm`: watch the recursive solver
//! - `ai`: a model solves the puzzle through tool calls (needs `OPENAI_API_KEY`,
//!   from the environment or a `.env` file)
//! - `compare`: solver vs. model vs. random walk

use clap::{Parser, ValueEnum};
use hanoi::agent::{DriverConfig, RunOutcome, RunReport, ToolDriver, DEFAULT_MAX_TURNS};
use hanoi::compare::{ComparisonReport, ModelResult};
use hanoi::core::baseline::{DEFAULT_MAX_WALK_MOVES, MAX_SIMULATED_DISKS};
use hanoi::core::{
    optimal_move_count, random_walk_baseline, solve_iter, GameState, HanoiError, TowerId,
    MAX_DISKS, MAX_REPLAY_DISKS,
};
use hanoi::events::observers::LoggingObserver;
use hanoi::events::EventBus;
use hanoi::llm::openai::{OpenAiClient, OpenAiConfig, DEFAULT_MODEL};
use hanoi::render::render_towers;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Hanoi CLI - Tower of Hanoi with a tool-calling model
#[derive(Parser)]
#[command(name = "hanoi-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Mode of operation
    #[arg(short, long, value_enum, default_value = "manual")]
    mode: Mode,

    /// Number of disks
    #[arg(short, long, default_value_t = 3)]
    disks: u32,

    /// Model to use in ai and compare modes
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum model round-trips
    #[arg(long, visible_alias = "iterations", default_value_t = DEFAULT_MAX_TURNS)]
    max_turns: usize,

    /// Pause between moves in algorithm mode (milliseconds)
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Random walks simulated in compare mode (0 = skip)
    #[arg(long, default_value_t = 200)]
    baseline_trials: usize,

    /// Seed for the random-walk baseline
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play by typing moves
    Manual,
    /// Let a model solve the puzzle
    Ai,
    /// Watch the recursive solver
    Algorithm,
    /// Compare solver, model and random walk
    Compare,
}

/// Output format for CLI responses
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for programmatic use
    Json,
}

#[derive(Serialize)]
struct AlgorithmResponse {
    n_disks: u32,
    optimal_moves: u64,
    moves: Vec<String>,
    solved: bool,
}

#[derive(Serialize)]
struct AiResponse<'a> {
    n_disks: u32,
    optimal_moves: u64,
    #[serde(flatten)]
    report: &'a RunReport,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; real environment variables take precedence.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .init();

    let result = match cli.mode {
        Mode::Manual => execute_manual(cli.disks),
        Mode::Algorithm => execute_algorithm(&cli).await,
        Mode::Ai => execute_ai(&cli).await,
        Mode::Compare => execute_compare(&cli).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn new_game(n_disks: u32) -> Result<GameState, String> {
    GameState::new(n_disks).map_err(|e| match e {
        HanoiError::InvalidConfiguration { .. } => {
            format!("Number of disks must be between 1 and {}.", MAX_DISKS)
        }
        other => other.to_string(),
    })
}

/// Algorithm and compare modes walk every optimal move
fn check_replayable(n_disks: u32) -> Result<(), String> {
    if n_disks > MAX_REPLAY_DISKS {
        return Err(format!(
            "Algorithm and compare modes support at most {} disks ({} requested).",
            MAX_REPLAY_DISKS, n_disks
        ));
    }
    Ok(())
}

fn output_json<T: Serialize>(response: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| format!("Failed to serialize response: {}", e))?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// Manual Mode
// ============================================================================

fn execute_manual(n_disks: u32) -> Result<(), String> {
    let mut game = new_game(n_disks)?;
    println!("{}", render_towers(&game));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !game.is_solved(TowerId::C) {
        println!("Enter your move (e.g., 'A C' to move from A to C, or 'q' to quit):");
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let Some(line) = lines.next() else {
            println!("\nExiting game.");
            return Ok(());
        };
        let line = line.map_err(|e| format!("Failed to read input: {}", e))?;
        let input = line.trim();

        if input.eq_ignore_ascii_case("q") {
            println!("Exiting game.");
            return Ok(());
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let [source, destination] = parts.as_slice() else {
            println!(
                "Invalid input. Please enter source and target towers separated by a space."
            );
            continue;
        };

        match game.apply_labels(source, destination) {
            Ok(_) => println!("{}", render_towers(&game)),
            Err(HanoiError::UnknownTower { .. }) => {
                println!("Invalid towers. Please use A, B, or C.");
            }
            Err(HanoiError::IllegalMove { violation, .. }) => {
                println!("Invalid move: {}. Try again.", violation);
            }
            Err(other) => return Err(other.to_string()),
        }
    }

    println!(
        "Congratulations! You solved the puzzle in {} moves.",
        game.move_count()
    );
    println!(
        "The minimum possible moves for {} disks is {}.",
        n_disks,
        optimal_move_count(n_disks)
    );
    Ok(())
}

// ============================================================================
// Algorithm Mode
// ============================================================================

async fn execute_algorithm(cli: &Cli) -> Result<(), String> {
    let mut game = new_game(cli.disks)?;
    check_replayable(cli.disks)?;
    let text = matches!(cli.format, OutputFormat::Text);

    if text {
        println!(
            "Solving {}-disk Tower of Hanoi puzzle with recursive algorithm...",
            cli.disks
        );
        println!("{}", render_towers(&game));
    }

    let mut moves = Vec::new();
    for (i, mv) in solve_iter(cli.disks, TowerId::A, TowerId::C, TowerId::B).enumerate() {
        game.apply(mv).map_err(|e| e.to_string())?;
        if text {
            println!("Move {}: {} → {}", i + 1, mv.source, mv.destination);
            println!("{}", render_towers(&game));
            if cli.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(cli.delay_ms)).await;
            }
        } else {
            moves.push(mv.to_string());
        }
    }

    match cli.format {
        OutputFormat::Text => {
            println!("Puzzle solved in {} moves (optimal).", game.move_count());
            Ok(())
        }
        OutputFormat::Json => output_json(&AlgorithmResponse {
            n_disks: cli.disks,
            optimal_moves: optimal_move_count(cli.disks),
            moves,
            solved: game.is_solved(TowerId::C),
        }),
    }
}

// ============================================================================
// Model Modes
// ============================================================================

async fn run_model(cli: &Cli, config: OpenAiConfig) -> Result<RunReport, String> {
    let mut game = new_game(cli.disks)?;
    let client = OpenAiClient::new(config).map_err(|e| e.to_string())?;

    let bus = EventBus::default();
    let observer = tokio::spawn(LoggingObserver::new(&bus).run());

    let driver_config = DriverConfig::default().with_max_turns(cli.max_turns);
    let mut driver = ToolDriver::new(Arc::new(client), driver_config).with_event_bus(bus);
    let result = driver.run(&mut game).await;

    drop(driver);
    let _ = observer.await;
    result.map_err(|e| e.to_string())
}

async fn execute_ai(cli: &Cli) -> Result<(), String> {
    let config = OpenAiConfig::from_env(&cli.model).map_err(|e| e.to_string())?;

    if matches!(cli.format, OutputFormat::Text) {
        println!(
            "AI attempting to solve {}-disk Tower of Hanoi puzzle...",
            cli.disks
        );
    }

    let report = run_model(cli, config).await?;

    match cli.format {
        OutputFormat::Json => output_json(&AiResponse {
            n_disks: cli.disks,
            optimal_moves: optimal_move_count(cli.disks),
            report: &report,
        }),
        OutputFormat::Text => {
            match report.outcome {
                RunOutcome::Solved => println!(
                    "AI solved the puzzle in {} moves and {:.2} seconds.",
                    report.move_count,
                    report.elapsed.as_secs_f64()
                ),
                RunOutcome::SolvedOnWrongTower { tower } => println!(
                    "AI stacked every disk on tower {} instead of tower C after {} turns.",
                    tower, report.turns
                ),
                RunOutcome::BudgetExhausted => println!(
                    "AI failed to solve the puzzle in {} turns ({} moves made).",
                    report.turns, report.move_count
                ),
            }
            println!(
                "The optimal solution requires {} moves.",
                optimal_move_count(cli.disks)
            );
            println!(
                "Rejected moves: {}, invalid tool calls: {}, tokens: {}",
                report.moves.rejected(),
                report.invalid_calls,
                report.usage.total()
            );
            Ok(())
        }
    }
}

async fn execute_compare(cli: &Cli) -> Result<(), String> {
    let config = OpenAiConfig::from_env(&cli.model).map_err(|e| e.to_string())?;
    new_game(cli.disks)?;
    check_replayable(cli.disks)?;

    if matches!(cli.format, OutputFormat::Text) {
        println!("Running {} with up to {} turns...", cli.model, cli.max_turns);
    }
    let report = run_model(cli, config).await?;
    let model = ModelResult::from_report(cli.disks, &report);

    let baseline = if cli.baseline_trials > 0 && cli.disks <= MAX_SIMULATED_DISKS {
        Some(
            random_walk_baseline(
                cli.disks,
                cli.baseline_trials,
                DEFAULT_MAX_WALK_MOVES,
                cli.seed,
            )
            .map_err(|e| e.to_string())?,
        )
    } else {
        None
    };

    let comparison =
        ComparisonReport::new(cli.disks, Some(model), baseline).map_err(|e| e.to_string())?;

    match cli.format {
        OutputFormat::Json => output_json(&comparison),
        OutputFormat::Text => {
            println!("{}", comparison.to_text());
            Ok(())
        }
    }
}
