//! Protocol types and records.

mod messages;
mod types;

pub use messages::{DrawPurpose, DrawRecord, RoundOutcome};
pub use types::{Party, RoundResult, SessionId};
