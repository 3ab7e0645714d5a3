//! Cryptographic primitives for the fair dice protocol.
//!
//! This module provides:
//! - SecretKey and CommitmentDigest, the two halves of an HMAC commitment
//! - FairRandom, Commitment and Reveal for the commit-reveal draw

mod commitment;
mod hex_serde;

pub use commitment::{
    encode_value, verify_commitment, Commitment, CommitmentDigest, CommitmentError, FairRandom,
    Reveal, SecretKey, KEY_LEN,
};
