//! Tower of Hanoi State Machine
//!
//! Owns the three towers, enforces move legality and reports whether a
//! tower holds the complete stack.
//!
//! # Invariants
//!
//! - Every tower is strictly decreasing from bottom to top.
//! - The disks across all towers are exactly `{1..=n}`, each once.
//! - A rejected move leaves the state untouched.

use crate::core::tower::TowerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported disk count (keeps `2^n - 1` inside `u64`)
pub const MAX_DISKS: u32 = 32;

/// The rule a rejected move broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MoveViolation {
    /// The source tower has no disk to move
    EmptySource {
        /// The empty tower
        tower: TowerId,
    },
    /// The moving disk is larger than the destination's top disk
    LargerOnSmaller {
        /// Disk that was about to move
        disk: u32,
        /// Top disk of the destination
        onto: u32,
    },
    /// Source and destination are the same tower
    SameTower {
        /// The tower named twice
        tower: TowerId,
    },
}

impl MoveViolation {
    /// Stable machine-readable name of the rule
    pub fn code(&self) -> &'static str {
        match self {
            MoveViolation::EmptySource { .. } => "empty_source",
            MoveViolation::LargerOnSmaller { .. } => "larger_on_smaller",
            MoveViolation::SameTower { .. } => "same_tower",
        }
    }
}

impl fmt::Display for MoveViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveViolation::EmptySource { tower } => {
                write!(f, "tower {} is empty", tower)
            }
            MoveViolation::LargerOnSmaller { disk, onto } => {
                write!(f, "disk {} cannot be placed on smaller disk {}", disk, onto)
            }
            MoveViolation::SameTower { tower } => {
                write!(f, "source and destination are both tower {}", tower)
            }
        }
    }
}

/// Errors raised by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HanoiError {
    /// Disk count outside `1..=MAX_DISKS`
    InvalidConfiguration {
        /// Requested disk count
        n_disks: u32,
    },
    /// Label does not name one of the three towers
    UnknownTower {
        /// The rejected label
        label: String,
    },
    /// Move rejected by the rules
    IllegalMove {
        /// Requested source
        source: TowerId,
        /// Requested destination
        destination: TowerId,
        /// Rule that was violated
        violation: MoveViolation,
    },
}

impl fmt::Display for HanoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HanoiError::InvalidConfiguration { n_disks } => write!(
                f,
                "Invalid configuration: disk count {} must be between 1 and {}",
                n_disks, MAX_DISKS
            ),
            HanoiError::UnknownTower { label } => {
                write!(f, "Unknown tower '{}': expected A, B or C", label)
            }
            HanoiError::IllegalMove {
                source,
                destination,
                violation,
            } => write!(
                f,
                "Illegal move {} -> {}: {}",
                source, destination, violation
            ),
        }
    }
}

impl std::error::Error for HanoiError {}

/// A transfer of the top disk from one tower to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Tower the disk leaves
    pub source: TowerId,
    /// Tower the disk lands on
    pub destination: TowerId,
}

impl Move {
    /// Create a move
    pub fn new(source: TowerId, destination: TowerId) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// The move that undoes this one
    pub fn reversed(self) -> Self {
        Self::new(self.destination, self.source)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// Top disk of each tower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSnapshot {
    /// Top of tower A
    #[serde(rename = "A")]
    pub a: Option<u32>,
    /// Top of tower B
    #[serde(rename = "B")]
    pub b: Option<u32>,
    /// Top of tower C
    #[serde(rename = "C")]
    pub c: Option<u32>,
}

/// Full contents of every tower, bottom to top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Disks on tower A
    #[serde(rename = "A")]
    pub a: Vec<u32>,
    /// Disks on tower B
    #[serde(rename = "B")]
    pub b: Vec<u32>,
    /// Disks on tower C
    #[serde(rename = "C")]
    pub c: Vec<u32>,
    /// Accepted moves so far
    pub moves: u64,
}

impl TowerSnapshot {
    /// Disks on the given tower
    pub fn tower(&self, tower: TowerId) -> &[u32] {
        match tower {
            TowerId::A => &self.a,
            TowerId::B => &self.b,
            TowerId::C => &self.c,
        }
    }
}

/// Result of an accepted move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveApplied {
    /// Disk that moved
    pub disk: u32,
    /// Tower it left
    pub source: TowerId,
    /// Tower it landed on
    pub destination: TowerId,
    /// Top of each tower after the move
    pub tops: TopSnapshot,
}

/// Live puzzle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Towers indexed by [`TowerId::index`], each stored bottom to top
    towers: [Vec<u32>; 3],
    n_disks: u32,
    source: TowerId,
    moves: u64,
}

impl GameState {
    /// Create a puzzle with `n_disks` stacked on tower A
    pub fn new(n_disks: u32) -> Result<Self, HanoiError> {
        Self::with_source(n_disks, TowerId::A)
    }

    /// Create a puzzle with `n_disks` stacked on `source`
    pub fn with_source(n_disks: u32, source: TowerId) -> Result<Self, HanoiError> {
        if n_disks == 0 || n_disks > MAX_DISKS {
            return Err(HanoiError::InvalidConfiguration { n_disks });
        }

        let mut towers: [Vec<u32>; 3] = Default::default();
        towers[source.index()] = (1..=n_disks).rev().collect();

        Ok(Self {
            towers,
            n_disks,
            source,
            moves: 0,
        })
    }

    /// Restore the initial configuration
    pub fn reset(&mut self) {
        for tower in &mut self.towers {
            tower.clear();
        }
        self.towers[self.source.index()] = (1..=self.n_disks).rev().collect();
        self.moves = 0;
    }

    /// Number of disks in play
    pub fn n_disks(&self) -> u32 {
        self.n_disks
    }

    /// Tower the disks started on
    pub fn source(&self) -> TowerId {
        self.source
    }

    /// Disks on `tower`, bottom to top
    pub fn peek(&self, tower: TowerId) -> &[u32] {
        &self.towers[tower.index()]
    }

    /// Disks on the tower named by `label`
    pub fn peek_label(&self, label: &str) -> Result<&[u32], HanoiError> {
        let tower: TowerId = label.parse()?;
        Ok(self.peek(tower))
    }

    /// Smallest disk on `tower`, if any
    pub fn top_disk(&self, tower: TowerId) -> Option<u32> {
        self.towers[tower.index()].last().copied()
    }

    /// Why a move would be rejected, if it would be
    pub fn check_move(&self, source: TowerId, destination: TowerId) -> Result<(), MoveViolation> {
        let Some(disk) = self.top_disk(source) else {
            return Err(MoveViolation::EmptySource { tower: source });
        };

        if source == destination {
            return Err(MoveViolation::SameTower { tower: source });
        }

        match self.top_disk(destination) {
            Some(onto) if disk > onto => Err(MoveViolation::LargerOnSmaller { disk, onto }),
            _ => Ok(()),
        }
    }

    /// Source non-empty and destination empty or topped by a larger disk
    pub fn is_legal_move(&self, source: TowerId, destination: TowerId) -> bool {
        self.check_move(source, destination).is_ok()
    }

    /// Move the top disk of `source` onto `destination`
    ///
    /// Either the move is applied in full or the state is left untouched
    /// and [`HanoiError::IllegalMove`] names the broken rule.
    pub fn apply_move(
        &mut self,
        source: TowerId,
        destination: TowerId,
    ) -> Result<MoveApplied, HanoiError> {
        self.check_move(source, destination)
            .map_err(|violation| HanoiError::IllegalMove {
                source,
                destination,
                violation,
            })?;

        let Some(disk) = self.towers[source.index()].pop() else {
            return Err(HanoiError::IllegalMove {
                source,
                destination,
                violation: MoveViolation::EmptySource { tower: source },
            });
        };
        self.towers[destination.index()].push(disk);
        self.moves += 1;

        Ok(MoveApplied {
            disk,
            source,
            destination,
            tops: self.tops(),
        })
    }

    /// Apply a [`Move`]
    pub fn apply(&mut self, mv: Move) -> Result<MoveApplied, HanoiError> {
        self.apply_move(mv.source, mv.destination)
    }

    /// Apply a move given as tower labels
    pub fn apply_labels(
        &mut self,
        source: &str,
        destination: &str,
    ) -> Result<MoveApplied, HanoiError> {
        let source: TowerId = source.parse()?;
        let destination: TowerId = destination.parse()?;
        self.apply_move(source, destination)
    }

    /// True iff `target` holds all disks
    pub fn is_solved(&self, target: TowerId) -> bool {
        self.towers[target.index()].len() == self.n_disks as usize
    }

    /// The tower holding all disks, if one does
    pub fn full_tower(&self) -> Option<TowerId> {
        TowerId::ALL.into_iter().find(|t| self.is_solved(*t))
    }

    /// Accepted moves this session
    pub fn move_count(&self) -> u64 {
        self.moves
    }

    /// Top of every tower
    pub fn tops(&self) -> TopSnapshot {
        TopSnapshot {
            a: self.top_disk(TowerId::A),
            b: self.top_disk(TowerId::B),
            c: self.top_disk(TowerId::C),
        }
    }

    /// Copy of every tower plus the move count
    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            a: self.towers[0].clone(),
            b: self.towers[1].clone(),
            c: self.towers[2].clone(),
            moves: self.moves,
        }
    }

    /// Every legal move from the current position
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(3);
        for source in TowerId::ALL {
            for destination in TowerId::ALL {
                if self.is_legal_move(source, destination) {
                    moves.push(Move::new(source, destination));
                }
            }
        }
        moves
    }

    /// Check both structural invariants
    pub fn is_consistent(&self) -> bool {
        let ordered = self
            .towers
            .iter()
            .all(|t| t.windows(2).all(|pair| pair[0] > pair[1]));

        let mut all: Vec<u32> = self.towers.iter().flatten().copied().collect();
        all.sort_unstable();
        let conserved = all.len() == self.n_disks as usize
            && all.iter().zip(1..=self.n_disks).all(|(d, e)| *d == e);

        ordered && conserved
    }
}
