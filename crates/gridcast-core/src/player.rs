// Draftable players.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// Unique player identifier. Two players are the same player iff their ids match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A draftable player: who they are, where they play, and how much they
/// are worth to a roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Integer value score; higher is better.
    pub value: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, position: Position, value: u32) -> Self {
        Player {
            id,
            name: name.into(),
            position,
            value,
        }
    }
}

// Identity is the id alone; name and value are descriptive.
impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (${})", self.position, self.name, self.value)
    }
}
