//! CLI Functional Tests
//!
//! Spawn the built `hanoi-cli` binary and check its output and exit codes.
//! Nothing here talks to a real model endpoint.

use serde::Deserialize;
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hanoi-cli"))
        .args(args)
        .env_remove("OPENAI_API_KEY")
        .output()
        .expect("Failed to execute hanoi-cli")
}

fn run_cli_with_input(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_hanoi-cli"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn hanoi-cli");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for hanoi-cli")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[derive(Debug, Deserialize)]
struct AlgorithmResponse {
    n_disks: u32,
    optimal_moves: u64,
    moves: Vec<String>,
    solved: bool,
}

// ============================================================================
// Help and Argument Tests
// ============================================================================

#[test]
fn test_help_lists_modes() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("--mode"));
    assert!(stdout.contains("--disks"));
    assert!(stdout.contains("--max-turns"));
}

#[test]
fn test_unknown_mode_rejected() {
    let output = run_cli(&["--mode", "teleport"]);
    assert!(!output.status.success());
}

#[test]
fn test_zero_disks_rejected() {
    let output = run_cli(&["--mode", "algorithm", "--disks", "0", "--delay-ms", "0"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Number of disks must be between 1 and 32"));
}

// ============================================================================
// Algorithm Mode Tests
// ============================================================================

#[test]
fn test_algorithm_text_output() {
    let output = run_cli(&["--mode", "algorithm", "--disks", "2", "--delay-ms", "0"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Move 1: A → B"));
    assert!(stdout.contains("Move 3: B → C"));
    assert!(stdout.contains("Puzzle solved in 3 moves (optimal)."));
}

#[test]
fn test_algorithm_rejects_unreplayable_disk_count() {
    let output = run_cli(&["--mode", "algorithm", "--disks", "32", "--format", "json"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("at most 20 disks"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_algorithm_json_output() {
    let output = run_cli(&["--mode", "algorithm", "--disks", "3", "--format", "json"]);
    assert!(output.status.success());

    let response: AlgorithmResponse = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response.n_disks, 3);
    assert_eq!(response.optimal_moves, 7);
    assert_eq!(response.moves.len(), 7);
    assert_eq!(response.moves[0], "A -> C");
    assert!(response.solved);
}

// ============================================================================
// Model Mode Tests
// ============================================================================

#[test]
fn test_ai_mode_requires_api_key() {
    let output = run_cli(&["--mode", "ai", "--disks", "3"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("OPENAI_API_KEY"));
}

#[test]
fn test_compare_mode_requires_api_key() {
    let output = run_cli(&["--mode", "compare"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("OPENAI_API_KEY"));
}

#[test]
fn test_compare_checks_disk_count_before_model_run() {
    let output = Command::new(env!("CARGO_BIN_EXE_hanoi-cli"))
        .args(["--mode", "compare", "--disks", "25"])
        .env("OPENAI_API_KEY", "sk-test")
        .env("OPENAI_BASE_URL", "http://127.0.0.1:9")
        .output()
        .expect("Failed to execute hanoi-cli");

    assert!(!output.status.success());
    let stdout = stdout_of(&output);
    assert!(!stdout.contains("Running"));
    assert!(stderr_of(&output).contains("at most 20 disks (25 requested)"));
}

#[test]
fn test_api_key_read_from_dotenv_file() {
    let dir = std::env::temp_dir().join(format!("hanoi-cli-dotenv-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(".env"), "OPENAI_API_KEY=sk-from-dotenv\n").unwrap();

    // A zero-turn run needs the key but never contacts the endpoint.
    let output = Command::new(env!("CARGO_BIN_EXE_hanoi-cli"))
        .args(["--mode", "ai", "--disks", "1", "--max-turns", "0"])
        .current_dir(&dir)
        .env_remove("OPENAI_API_KEY")
        .output()
        .expect("Failed to execute hanoi-cli");
    let _ = std::fs::remove_dir_all(&dir);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("AI failed to solve the puzzle in 0 turns"));
}

// ============================================================================
// Manual Mode Tests
// ============================================================================

#[test]
fn test_manual_single_disk_solve() {
    let output = run_cli_with_input(&["--disks", "1"], "A C\n");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Congratulations! You solved the puzzle in 1 moves."));
    assert!(stdout.contains("The minimum possible moves for 1 disks is 1."));
}

#[test]
fn test_manual_reports_bad_input_and_quits() {
    let output = run_cli_with_input(&["--disks", "2"], "A\nA Q\nB C\nA B\nA B\nq\n");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Invalid input."));
    assert!(stdout.contains("Invalid towers. Please use A, B, or C."));
    assert!(stdout.contains("Invalid move: tower B is empty. Try again."));
    assert!(stdout.contains(
        "Invalid move: disk 2 cannot be placed on smaller disk 1. Try again."
    ));
    assert!(stdout.contains("Exiting game."));
    assert!(!stdout.contains("Congratulations"));
}

#[test]
fn test_manual_end_of_input_exits_cleanly() {
    let output = run_cli_with_input(&["--disks", "3"], "");
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Exiting game."));
}
