//! Protocol types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique session identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Round result from the user's side of the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    Win,
    Loss,
    Tie,
}

impl RoundResult {
    /// Compare the user's roll with the computer's
    pub fn from_rolls(user: i32, computer: i32) -> Self {
        match user.cmp(&computer) {
            std::cmp::Ordering::Greater => RoundResult::Win,
            std::cmp::Ordering::Less => RoundResult::Loss,
            std::cmp::Ordering::Equal => RoundResult::Tie,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundResult::Win => "You win",
            RoundResult::Loss => "You lose",
            RoundResult::Tie => "Tie",
        }
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two parties at the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    User,
    Computer,
}

impl Party {
    /// Get the opponent
    pub fn opponent(&self) -> Party {
        match self {
            Party::User => Party::Computer,
            Party::Computer => Party::User,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::User => write!(f, "user"),
            Party::Computer => write!(f, "computer"),
        }
    }
}
