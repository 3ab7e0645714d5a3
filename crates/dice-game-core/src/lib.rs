//! Dice Game Core Library
//!
//! This crate provides the fair-random commit-reveal protocol, the dice model
//! with its exact probability engine, and the round state machine for a
//! two-party non-transitive dice game.

pub mod crypto;
pub mod dice;
pub mod game;
pub mod protocol;

pub use crypto::{verify_commitment, Commitment, CommitmentDigest, FairRandom, Reveal, SecretKey};
pub use dice::{DiceError, DiceSet, Die, OutcomeDistribution, ProbabilityMatrix};
pub use game::{Game, GameConfig, GameError, Input, OpponentStrategy, Phase, RoundEvent};
pub use protocol::{DrawPurpose, DrawRecord, Party, RoundOutcome, RoundResult, SessionId};
