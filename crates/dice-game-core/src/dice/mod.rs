//! Dice definitions and the exact probability engine.

mod die;
mod probability;

pub use die::{DiceError, DiceSet, Die, FACES, MIN_DICE};
pub use probability::{
    format_fraction, outcome_distribution, win_probability, OutcomeDistribution,
    ProbabilityMatrix, DISPLAY_PRECISION,
};
