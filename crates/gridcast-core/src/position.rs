// Football positions and the roster slot catalog.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::Player;

/// Football positions a draftable player can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Defense,
    Kicker,
    Linebacker,
    DefensiveEnd,
    DefensiveTackle,
    Cornerback,
    Safety,
}

impl Position {
    /// Every position, in declaration order.
    pub const ALL: [Position; 11] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Defense,
        Position::Kicker,
        Position::Linebacker,
        Position::DefensiveEnd,
        Position::DefensiveTackle,
        Position::Cornerback,
        Position::Safety,
    ];

    /// Parse a position abbreviation into a Position.
    ///
    /// Accepts the usual cheatsheet spellings, case-insensitively:
    /// - "DST", "D/ST" and "DEF" -> Defense
    /// - "PK" -> Kicker
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "DST" | "D/ST" | "DEF" => Some(Position::Defense),
            "K" | "PK" => Some(Position::Kicker),
            "LB" => Some(Position::Linebacker),
            "DE" => Some(Position::DefensiveEnd),
            "DT" => Some(Position::DefensiveTackle),
            "CB" => Some(Position::Cornerback),
            "S" => Some(Position::Safety),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Defense => "DST",
            Position::Kicker => "K",
            Position::Linebacker => "LB",
            Position::DefensiveEnd => "DE",
            Position::DefensiveTackle => "DT",
            Position::Cornerback => "CB",
            Position::Safety => "S",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Slot catalog
// ---------------------------------------------------------------------------

use Position::*;

/// Label and accepted positions of every slot kind the catalog knows about.
/// Bench ("BN") is handled separately since it accepts everything.
const CATALOG: &[(&str, &[Position])] = &[
    ("QB", &[Quarterback]),
    ("RB", &[RunningBack]),
    ("WR", &[WideReceiver]),
    ("TE", &[TightEnd]),
    ("WR/RB", &[WideReceiver, RunningBack]),
    ("WR/TE", &[WideReceiver, TightEnd]),
    ("RB/TE", &[RunningBack, TightEnd]),
    ("WR/RB/TE", &[WideReceiver, RunningBack, TightEnd]),
    ("QB/WR/RB/TE", &[Quarterback, WideReceiver, RunningBack, TightEnd]),
    ("DST", &[Defense]),
    ("K", &[Kicker]),
    ("DL", &[DefensiveTackle, DefensiveEnd]),
    ("LB", &[Linebacker]),
    ("DB", &[Cornerback, Safety]),
    ("IDP", &[Linebacker, DefensiveEnd, DefensiveTackle, Cornerback, Safety]),
    ("DE", &[DefensiveEnd]),
    ("DT", &[DefensiveTackle]),
    ("CB", &[Cornerback]),
    ("S", &[Safety]),
];

const BENCH_LABEL: &str = "BN";

/// A kind of roster opening: the set of positions it accepts plus a label.
///
/// Bench slots are flagged separately because scoring weighs bench value
/// apart from the starting lineup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterSlotKind {
    label: String,
    positions: BTreeSet<Position>,
    bench: bool,
}

impl RosterSlotKind {
    /// A starting-lineup slot accepting the given positions.
    pub fn new(label: impl Into<String>, positions: impl IntoIterator<Item = Position>) -> Self {
        RosterSlotKind {
            label: label.into(),
            positions: positions.into_iter().collect(),
            bench: false,
        }
    }

    /// The catch-all bench slot.
    pub fn bench() -> Self {
        RosterSlotKind {
            label: BENCH_LABEL.to_string(),
            positions: Position::ALL.into_iter().collect(),
            bench: true,
        }
    }

    /// Look up a catalog slot by label (e.g. "QB", "WR/RB/TE", "BN").
    ///
    /// "BE" is accepted as an alias for the bench.
    pub fn from_label(label: &str) -> Option<Self> {
        let upper = label.trim().to_uppercase();
        if upper == BENCH_LABEL || upper == "BE" {
            return Some(Self::bench());
        }
        CATALOG
            .iter()
            .find(|(l, _)| *l == upper)
            .map(|(l, positions)| Self::new(*l, positions.iter().copied()))
    }

    /// Every slot kind in the catalog, bench included.
    pub fn catalog() -> Vec<Self> {
        let mut kinds: Vec<Self> = CATALOG
            .iter()
            .map(|(l, positions)| Self::new(*l, positions.iter().copied()))
            .collect();
        kinds.push(Self::bench());
        kinds
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }

    pub fn is_bench(&self) -> bool {
        self.bench
    }

    /// Whether a player's position may fill this slot.
    pub fn accepts(&self, player: &Player) -> bool {
        self.accepts_position(player.position)
    }

    pub fn accepts_position(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    /// Number of accepted positions. Fewer means more specific; slot
    /// assignment tries the most specific slots first.
    pub fn specificity(&self) -> usize {
        self.positions.len()
    }
}

impl fmt::Display for RosterSlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
