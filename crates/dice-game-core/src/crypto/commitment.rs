//! Fair random draws via HMAC commit-reveal.
//!
//! The committing party picks a value and publishes
//! `HMAC-SHA256(key, decimal(value))` before the counterparty gives its
//! input. Revealing the key afterwards lets anyone recompute the digest and
//! check that the value was fixed up front.

use hmac::{Hmac, Mac};
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Length of a commitment key in bytes
pub const KEY_LEN: usize = 32;

/// Errors from the commit-reveal draw
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommitmentError {
    #[error("Cannot draw from an empty range (max_exclusive must be > 0)")]
    EmptyRange,
}

/// Secret HMAC key for a single commitment
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKey(#[serde(with = "super::hex_serde")] [u8; KEY_LEN]);

impl SecretKey {
    /// Create a new random key
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(..)")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

/// Digest = HMAC-SHA256(key, decimal(value))
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitmentDigest(#[serde(with = "super::hex_serde")] [u8; 32]);

impl CommitmentDigest {
    /// Compute the digest of a value under a key
    pub fn compute(value: u32, key: &SecretKey) -> Self {
        Self(keyed_mac(value, key).finalize().into_bytes().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for CommitmentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitmentDigest({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for CommitmentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

/// Message bytes a value is committed under: its decimal ASCII form.
pub fn encode_value(value: u32) -> Vec<u8> {
    value.to_string().into_bytes()
}

fn keyed_mac(value: u32, key: &SecretKey) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(&encode_value(value));
    mac
}

/// Check a revealed `(value, key)` pair against a published digest.
///
/// The comparison is constant time.
pub fn verify_commitment(value: u32, key: &SecretKey, digest: &CommitmentDigest) -> bool {
    keyed_mac(value, key).verify_slice(digest.as_bytes()).is_ok()
}

/// A fresh commit-reveal instance holding only its key.
///
/// `generate` consumes the instance, so one key can never back two draws.
pub struct FairRandom {
    key: SecretKey,
}

impl FairRandom {
    /// Allocate a new instance with a key from a cryptographically secure source
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            key: SecretKey::random(rng),
        }
    }

    /// Draw a value uniformly from `[0, max_exclusive)` and commit to it.
    ///
    /// `gen_range` rejects out-of-zone samples, so the draw has no modulo
    /// bias for any range.
    pub fn generate<R: RngCore + CryptoRng>(
        self,
        max_exclusive: u32,
        rng: &mut R,
    ) -> Result<Commitment, CommitmentError> {
        if max_exclusive == 0 {
            return Err(CommitmentError::EmptyRange);
        }
        let value = rng.gen_range(0..max_exclusive);
        let digest = CommitmentDigest::compute(value, &self.key);
        debug!(max_exclusive, %digest, "committed to fair random value");

        Ok(Commitment {
            key: self.key,
            value,
            max_exclusive,
            digest,
        })
    }
}

/// A generated value bound to its published digest, key still hidden
pub struct Commitment {
    key: SecretKey,
    value: u32,
    max_exclusive: u32,
    digest: CommitmentDigest,
}

impl Commitment {
    /// The committed value, for the generating party only
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Upper bound (exclusive) of the draw
    pub fn max_exclusive(&self) -> u32 {
        self.max_exclusive
    }

    /// The digest to publish before asking for the counterparty's input
    pub fn commitment_digest(&self) -> &CommitmentDigest {
        &self.digest
    }

    /// Reveal the key, ending the commitment
    pub fn reveal_key(self) -> Reveal {
        debug!(digest = %self.digest, value = self.value, "revealed commitment key");
        Reveal {
            value: self.value,
            max_exclusive: self.max_exclusive,
            key: self.key,
            digest: self.digest,
        }
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("max_exclusive", &self.max_exclusive)
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

/// Everything a counterparty needs to verify a finished draw
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub value: u32,
    pub max_exclusive: u32,
    pub key: SecretKey,
    pub digest: CommitmentDigest,
}

impl Reveal {
    /// Verify the revealed key and value against the digest
    pub fn verify(&self) -> bool {
        self.value < self.max_exclusive && verify_commitment(self.value, &self.key, &self.digest)
    }

    /// Combine the committed value with the counterparty's offset.
    ///
    /// The sum is taken in `u64`, so any `u32` range works.
    pub fn combine(&self, offset: u32) -> Result<u32, CommitmentError> {
        if self.max_exclusive == 0 {
            return Err(CommitmentError::EmptyRange);
        }
        let sum = u64::from(self.value) + u64::from(offset);
        Ok((sum % u64::from(self.max_exclusive)) as u32)
    }
}
