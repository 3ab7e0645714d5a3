//! Protocol records handed to the presentation layer.

use crate::crypto::{CommitmentDigest, CommitmentError, Reveal, SecretKey};
use crate::dice::Die;
use crate::protocol::{Party, RoundResult, SessionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a fair draw decides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "party")]
pub enum DrawPurpose {
    /// Who picks a die first
    MoveOrder,
    /// Face index for a party's roll
    Roll(Party),
}

impl fmt::Display for DrawPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawPurpose::MoveOrder => write!(f, "move order"),
            DrawPurpose::Roll(party) => write!(f, "{} roll", party),
        }
    }
}

/// A finished draw: everything needed to re-check it by hand
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub session_id: SessionId,
    pub purpose: DrawPurpose,
    /// Exclusive upper bound of the committed value
    pub modulus: u32,
    /// Computer's committed value
    pub value: u32,
    pub key: SecretKey,
    pub hmac: CommitmentDigest,
    /// User's offset, supplied before the key was revealed
    pub offset: u32,
    /// `(value + offset) % modulus`
    pub result: u32,
}

impl DrawRecord {
    pub fn new(
        session_id: SessionId,
        purpose: DrawPurpose,
        reveal: Reveal,
        offset: u32,
    ) -> Result<Self, CommitmentError> {
        let result = reveal.combine(offset)?;
        Ok(Self {
            session_id,
            purpose,
            modulus: reveal.max_exclusive,
            value: reveal.value,
            key: reveal.key,
            hmac: reveal.digest,
            offset,
            result,
        })
    }

    /// Re-check the HMAC and the combined result
    pub fn verify(&self) -> bool {
        let reveal = Reveal {
            value: self.value,
            max_exclusive: self.modulus,
            key: self.key.clone(),
            digest: self.hmac,
        };
        reveal.verify() && reveal.combine(self.offset) == Ok(self.result)
    }
}

/// Resolved round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub first_mover: Party,
    /// `(user die, computer die)`
    pub chosen_dice: (Die, Die),
    /// `(user roll, computer roll)`
    pub roll_values: (i32, i32),
    pub result: RoundResult,
}
