//! Round state machine.
//!
//! A round moves through
//! `AwaitingMoveOrderGuess -> AwaitingDieChoice -> AwaitingOffset(first)
//! -> AwaitingOffset(second) -> RoundResolved`, skipping the move-order
//! draw when it is disabled. Every step takes one [`Input`] and returns the
//! [`RoundEvent`]s the presentation layer should show, in order.
//!
//! Each draw publishes its HMAC in the step that opens the offset prompt and
//! reveals the key only in the step that consumes the offset, so the user
//! never sees a key before committing to an offset.

use super::config::{GameConfig, OpponentStrategy};
use crate::crypto::{Commitment, CommitmentDigest, CommitmentError, FairRandom};
use crate::dice::{DiceSet, ProbabilityMatrix, FACES};
use crate::protocol::{DrawPurpose, DrawRecord, Party, RoundOutcome, RoundResult, SessionId};
use rand::{CryptoRng, Rng, RngCore};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Range of the move-order draw
const MOVE_ORDER_MODULUS: u32 = 2;

/// Range of a roll draw: one value per face
const ROLL_MODULUS: u32 = FACES as u32;

/// Where the round is waiting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No round started yet
    Ready,
    /// Move-order HMAC published, waiting for the user's 0/1 guess
    AwaitingMoveOrderGuess,
    /// Waiting for the user to pick a die
    AwaitingDieChoice,
    /// Roll HMAC published for the given party, waiting for the user's offset
    AwaitingOffset(Party),
    RoundResolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Ready => write!(f, "ready"),
            Phase::AwaitingMoveOrderGuess => write!(f, "awaiting move-order guess"),
            Phase::AwaitingDieChoice => write!(f, "awaiting die choice"),
            Phase::AwaitingOffset(party) => write!(f, "awaiting offset for {} roll", party),
            Phase::RoundResolved => write!(f, "round resolved"),
        }
    }
}

/// User input driving the round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// Guess of the computer's 0/1 move-order value
    Guess(u32),
    /// Index into the dice set
    ChooseDie(usize),
    /// Offset added to the computer's committed roll value
    Offset(u32),
}

/// Something the presentation layer should show
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    /// The computer committed to a value in `[0, modulus)`
    Committed {
        purpose: DrawPurpose,
        modulus: u32,
        hmac: CommitmentDigest,
    },
    /// Key revealed and combined with the user's offset
    Revealed(DrawRecord),
    FirstMover(Party),
    DieChosen { party: Party, index: usize },
    Rolled {
        party: Party,
        face_index: usize,
        value: i32,
    },
    Resolved(RoundOutcome),
}

/// Rejected user selections. The round stays in the same phase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Die index {index} is out of range (choose 0..{count})")]
    DieIndexOutOfRange { index: usize, count: usize },

    #[error("Die {index} is already taken by the computer")]
    DieTaken { index: usize },

    #[error("Value {value} is out of range (choose 0..{modulus})")]
    OffsetOutOfRange { value: u32, modulus: u32 },

    #[error("{input:?} is not expected while {phase}")]
    UnexpectedInput { phase: Phase, input: Input },
}

/// Errors from driving a round
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid selection: {0}")]
    InvalidUserSelection(#[from] SelectionError),

    #[error("No round in progress")]
    NoRoundInProgress,

    #[error(transparent)]
    Commitment(#[from] CommitmentError),
}

/// Running tally of resolved rounds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Score {
    fn record(&mut self, result: RoundResult) {
        match result {
            RoundResult::Win => self.wins += 1,
            RoundResult::Loss => self.losses += 1,
            RoundResult::Tie => self.ties += 1,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

/// Per-round working state
#[derive(Default)]
struct RoundState {
    pending: Option<Commitment>,
    first_mover: Option<Party>,
    user_die: Option<usize>,
    computer_die: Option<usize>,
    user_roll: Option<i32>,
    computer_roll: Option<i32>,
}

impl RoundState {
    fn die_of(&self, party: Party) -> Option<usize> {
        match party {
            Party::User => self.user_die,
            Party::Computer => self.computer_die,
        }
    }

    fn roll_of(&self, party: Party) -> Option<i32> {
        match party {
            Party::User => self.user_roll,
            Party::Computer => self.computer_roll,
        }
    }

    fn set_roll(&mut self, party: Party, value: i32) {
        match party {
            Party::User => self.user_roll = Some(value),
            Party::Computer => self.computer_roll = Some(value),
        }
    }
}

/// One game session over a fixed dice set.
///
/// All randomness, for keys, committed values and the computer's die choice,
/// comes from the injected cryptographically secure `rng`.
pub struct Game<R> {
    session_id: SessionId,
    dice: DiceSet,
    matrix: ProbabilityMatrix,
    config: GameConfig,
    rng: R,
    phase: Phase,
    round: RoundState,
    score: Score,
}

impl<R> Game<R> {
    pub fn new(dice: DiceSet, config: GameConfig, rng: R) -> Self {
        let matrix = ProbabilityMatrix::build(&dice);
        Self {
            session_id: SessionId::new(),
            dice,
            matrix,
            config,
            rng,
            phase: Phase::Ready,
            round: RoundState::default(),
            score: Score::default(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    pub fn matrix(&self) -> &ProbabilityMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Die already taken by the computer in the current round
    pub fn computer_die(&self) -> Option<usize> {
        self.round.computer_die
    }
}

impl<R: RngCore + CryptoRng> Game<R> {
    /// Begin a new round. Any unfinished round is abandoned.
    pub fn start_round(&mut self) -> Result<Vec<RoundEvent>, GameError> {
        if self.round.pending.is_some() {
            debug!(session = %self.session_id, phase = %self.phase, "abandoning unfinished round");
        }
        self.round = RoundState::default();

        if self.config.move_order_draw {
            let event = self.commit(DrawPurpose::MoveOrder, MOVE_ORDER_MODULUS)?;
            self.phase = Phase::AwaitingMoveOrderGuess;
            return Ok(vec![event]);
        }

        self.round.first_mover = Some(Party::User);
        self.phase = Phase::AwaitingDieChoice;
        Ok(vec![RoundEvent::FirstMover(Party::User)])
    }

    /// Feed one user input into the current phase
    pub fn apply(&mut self, input: Input) -> Result<Vec<RoundEvent>, GameError> {
        match (self.phase, input) {
            (Phase::AwaitingMoveOrderGuess, Input::Guess(guess)) => self.on_guess(guess),
            (Phase::AwaitingDieChoice, Input::ChooseDie(index)) => self.on_die_choice(index),
            (Phase::AwaitingOffset(party), Input::Offset(offset)) => self.on_offset(party, offset),
            (Phase::Ready | Phase::RoundResolved, _) => Err(GameError::NoRoundInProgress),
            (phase, input) => Err(SelectionError::UnexpectedInput { phase, input }.into()),
        }
    }

    fn on_guess(&mut self, guess: u32) -> Result<Vec<RoundEvent>, GameError> {
        check_range(guess, MOVE_ORDER_MODULUS)?;
        let record = self.reveal(DrawPurpose::MoveOrder, guess)?;

        // (value + guess) % 2 == 0 exactly when the guess matches the value
        let first = if record.result == 0 {
            Party::User
        } else {
            Party::Computer
        };
        self.round.first_mover = Some(first);

        let mut events = vec![RoundEvent::Revealed(record), RoundEvent::FirstMover(first)];
        if first == Party::Computer {
            let index = self.computer_choice(None);
            self.round.computer_die = Some(index);
            events.push(RoundEvent::DieChosen {
                party: Party::Computer,
                index,
            });
        }
        self.phase = Phase::AwaitingDieChoice;
        Ok(events)
    }

    fn on_die_choice(&mut self, index: usize) -> Result<Vec<RoundEvent>, GameError> {
        if index >= self.dice.len() {
            return Err(SelectionError::DieIndexOutOfRange {
                index,
                count: self.dice.len(),
            }
            .into());
        }
        if self.round.computer_die == Some(index) {
            return Err(SelectionError::DieTaken { index }.into());
        }

        self.round.user_die = Some(index);
        let mut events = vec![RoundEvent::DieChosen {
            party: Party::User,
            index,
        }];

        if self.round.computer_die.is_none() {
            let choice = self.computer_choice(Some(index));
            self.round.computer_die = Some(choice);
            events.push(RoundEvent::DieChosen {
                party: Party::Computer,
                index: choice,
            });
        }

        let first = self.round.first_mover.unwrap_or(Party::User);
        events.push(self.commit(DrawPurpose::Roll(first), ROLL_MODULUS)?);
        self.phase = Phase::AwaitingOffset(first);
        Ok(events)
    }

    fn on_offset(&mut self, party: Party, offset: u32) -> Result<Vec<RoundEvent>, GameError> {
        check_range(offset, ROLL_MODULUS)?;
        let record = self.reveal(DrawPurpose::Roll(party), offset)?;

        let face_index = record.result as usize;
        let die = self
            .round
            .die_of(party)
            .and_then(|i| self.dice.get(i))
            .ok_or(GameError::NoRoundInProgress)?;
        let value = die.face(face_index).ok_or(GameError::NoRoundInProgress)?;
        self.round.set_roll(party, value);

        let mut events = vec![
            RoundEvent::Revealed(record),
            RoundEvent::Rolled {
                party,
                face_index,
                value,
            },
        ];

        let other = party.opponent();
        if self.round.roll_of(other).is_none() {
            events.push(self.commit(DrawPurpose::Roll(other), ROLL_MODULUS)?);
            self.phase = Phase::AwaitingOffset(other);
            return Ok(events);
        }

        let outcome = self.resolve()?;
        events.push(RoundEvent::Resolved(outcome));
        Ok(events)
    }

    fn resolve(&mut self) -> Result<RoundOutcome, GameError> {
        let round = &self.round;
        let (Some(user_die), Some(computer_die), Some(user_roll), Some(computer_roll)) = (
            round.user_die,
            round.computer_die,
            round.user_roll,
            round.computer_roll,
        ) else {
            return Err(GameError::NoRoundInProgress);
        };

        let result = RoundResult::from_rolls(user_roll, computer_roll);
        let outcome = RoundOutcome {
            first_mover: round.first_mover.unwrap_or(Party::User),
            chosen_dice: (self.dice[user_die], self.dice[computer_die]),
            roll_values: (user_roll, computer_roll),
            result,
        };

        self.score.record(result);
        self.phase = Phase::RoundResolved;
        info!(
            session = %self.session_id,
            user_roll,
            computer_roll,
            result = %result,
            "round resolved"
        );
        Ok(outcome)
    }

    /// Pick the computer's die; `user` is the user's die when already chosen
    fn computer_choice(&mut self, user: Option<usize>) -> usize {
        let available: Vec<usize> = (0..self.dice.len()).filter(|i| Some(*i) != user).collect();
        let best = match (self.config.opponent, user) {
            (OpponentStrategy::Best, Some(user)) => self.matrix.best_response(user, &[user]),
            (OpponentStrategy::Best, None) => self.matrix.strongest(),
            (OpponentStrategy::Random, _) => None,
        };
        best.unwrap_or_else(|| available[self.rng.gen_range(0..available.len())])
    }

    fn commit(&mut self, purpose: DrawPurpose, modulus: u32) -> Result<RoundEvent, GameError> {
        let commitment = FairRandom::new(&mut self.rng).generate(modulus, &mut self.rng)?;
        let hmac = *commitment.commitment_digest();
        self.round.pending = Some(commitment);
        debug!(session = %self.session_id, %purpose, %hmac, "published commitment");
        Ok(RoundEvent::Committed {
            purpose,
            modulus,
            hmac,
        })
    }

    fn reveal(&mut self, purpose: DrawPurpose, offset: u32) -> Result<DrawRecord, GameError> {
        let commitment = self
            .round
            .pending
            .take()
            .ok_or(GameError::NoRoundInProgress)?;
        Ok(DrawRecord::new(
            self.session_id,
            purpose,
            commitment.reveal_key(),
            offset,
        )?)
    }
}

fn check_range(value: u32, modulus: u32) -> Result<(), SelectionError> {
    if value >= modulus {
        return Err(SelectionError::OffsetOutOfRange { value, modulus });
    }
    Ok(())
}
