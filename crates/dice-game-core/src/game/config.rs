//! Game configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the computer picks its die
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentStrategy {
    /// Uniformly among the dice still available
    Random,
    /// The die with the best odds, from the probability matrix
    #[default]
    Best,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown opponent strategy '{0}' (expected 'random' or 'best')")]
pub struct UnknownStrategy(pub String);

impl FromStr for OpponentStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(OpponentStrategy::Random),
            "best" => Ok(OpponentStrategy::Best),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for OpponentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpponentStrategy::Random => write!(f, "random"),
            OpponentStrategy::Best => write!(f, "best"),
        }
    }
}

/// Session settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Decide who picks first with a fair 0/1 draw; otherwise the user
    /// always picks first
    pub move_order_draw: bool,
    pub opponent: OpponentStrategy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            move_order_draw: true,
            opponent: OpponentStrategy::Best,
        }
    }
}
