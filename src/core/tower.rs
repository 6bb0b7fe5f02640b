//! Tower Identifiers
//!
//! The puzzle has exactly three towers, so tower identity is a closed enum.
//! Free-form labels coming from humans or models are parsed into a
//! [`TowerId`] at the boundary; everything past that point cannot name a
//! tower that does not exist.

use crate::core::state::HanoiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three towers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerId {
    /// Leftmost tower, the default source
    A,
    /// Middle tower, the default spare
    B,
    /// Rightmost tower, the default target
    C,
}

impl TowerId {
    /// All towers in display order
    pub const ALL: [TowerId; 3] = [TowerId::A, TowerId::B, TowerId::C];

    /// Zero-based index (A=0, B=1, C=2)
    pub fn index(self) -> usize {
        match self {
            TowerId::A => 0,
            TowerId::B => 1,
            TowerId::C => 2,
        }
    }

    /// Tower for a zero-based index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Single-letter label
    pub fn label(self) -> char {
        match self {
            TowerId::A => 'A',
            TowerId::B => 'B',
            TowerId::C => 'C',
        }
    }

    /// The tower that is neither `self` nor `other`
    ///
    /// Returns `None` when both arguments name the same tower.
    pub fn third(self, other: TowerId) -> Option<TowerId> {
        if self == other {
            return None;
        }
        Self::ALL.into_iter().find(|t| *t != self && *t != other)
    }
}

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TowerId {
    type Err = HanoiError;

    /// Accepts `A`/`B`/`C` in either case and the indices `0`/`1`/`2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" | "0" => Ok(TowerId::A),
            "B" | "b" | "1" => Ok(TowerId::B),
            "C" | "c" | "2" => Ok(TowerId::C),
            other => Err(HanoiError::UnknownTower {
                label: other.to_string(),
            }),
        }
    }
}
