//! Text rendering of the puzzle
//!
//! [`render_towers`] draws the ASCII picture shown by the CLI;
//! [`describe_state`] is the compact text sent to the model each turn.

use crate::core::{GameState, TowerId};
use std::fmt::Write;

const DISK: char = '█';
const POLE: char = '|';
const BASE: char = '▀';
const GAP: &str = "  ";

/// Draw the three towers side by side with bases and labels
///
/// Each column is `2n + 1` characters wide. Disk `d` is drawn as a bar of
/// `2d - 1` blocks centred on the pole.
pub fn render_towers(state: &GameState) -> String {
    let n = state.n_disks() as usize;
    let width = 2 * n + 1;
    let rule = "=".repeat(40);

    let mut out = String::new();
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "Tower of Hanoi - {} disks - Moves: {}",
        n,
        state.move_count()
    );
    let _ = writeln!(out, "{}", rule);

    for level in (0..n).rev() {
        let row: Vec<String> = TowerId::ALL
            .iter()
            .map(|tower| match state.peek(*tower).get(level) {
                Some(disk) => disk_cell(*disk as usize, n),
                None => pole_cell(n),
            })
            .collect();
        let _ = writeln!(out, "{}", row.join(GAP).trim_end());
    }

    let bases = vec![BASE.to_string().repeat(width); 3];
    let _ = writeln!(out, "{}", bases.join(GAP));

    let labels: Vec<String> = TowerId::ALL
        .iter()
        .map(|tower| format!("{:^width$}", tower.label(), width = width))
        .collect();
    let _ = writeln!(out, "{}", labels.join(GAP).trim_end());

    out
}

fn disk_cell(disk: usize, n: usize) -> String {
    let padding = " ".repeat(n + 1 - disk);
    let bar = DISK.to_string().repeat(2 * disk - 1);
    format!("{}{}{}", padding, bar, padding)
}

fn pole_cell(n: usize) -> String {
    let padding = " ".repeat(n);
    format!("{}{}{}", padding, POLE, padding)
}

/// Describe the towers for the model
///
/// ```text
/// Moves so far: 0
/// Tower A: [3, 2, 1] (top disk is 1)
/// Tower B: [] (empty)
/// Tower C: [] (empty)
/// ```
pub fn describe_state(state: &GameState) -> String {
    let mut lines = vec![format!("Moves so far: {}", state.move_count())];

    for tower in TowerId::ALL {
        let disks = state.peek(tower);
        match disks.last() {
            Some(top) => {
                let listed: Vec<String> = disks.iter().map(u32::to_string).collect();
                lines.push(format!(
                    "Tower {}: [{}] (top disk is {})",
                    tower,
                    listed.join(", "),
                    top
                ));
            }
            None => lines.push(format!("Tower {}: [] (empty)", tower)),
        }
    }

    lines.join("\n")
}
