//! Game session: configuration and the round state machine.

mod config;
mod round;

pub use config::{GameConfig, OpponentStrategy, UnknownStrategy};
pub use round::{Game, GameError, Input, Phase, RoundEvent, Score, SelectionError};
