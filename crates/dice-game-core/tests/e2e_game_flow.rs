//! End-to-end tests for the round flow.
//!
//! These tests drive whole sessions through the state machine the way the
//! console front end does, and check every revealed draw the way a
//! suspicious user would.

use dice_game_core::crypto::verify_commitment;
use dice_game_core::dice::{outcome_distribution, DiceSet, ProbabilityMatrix};
use dice_game_core::game::{Game, GameConfig, GameError, Input, OpponentStrategy, Phase, RoundEvent};
use dice_game_core::protocol::{DrawPurpose, DrawRecord, Party, RoundResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn classic_set() -> DiceSet {
    DiceSet::parse(&["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap()
}

/// Plays one round, picking inputs with `chooser`, and returns every event
fn play_round<R: Rng>(
    game: &mut Game<StdRng>,
    chooser: &mut R,
) -> Vec<RoundEvent> {
    let mut events = game.start_round().unwrap();
    loop {
        let input = match game.phase() {
            Phase::AwaitingMoveOrderGuess => Input::Guess(chooser.gen_range(0..2)),
            Phase::AwaitingDieChoice => {
                let taken = game.computer_die();
                let free: Vec<usize> = (0..game.dice().len())
                    .filter(|i| Some(*i) != taken)
                    .collect();
                Input::ChooseDie(free[chooser.gen_range(0..free.len())])
            }
            Phase::AwaitingOffset(_) => Input::Offset(chooser.gen_range(0..6)),
            Phase::RoundResolved => return events,
            Phase::Ready => panic!("round never started"),
        };
        events.extend(game.apply(input).unwrap());
    }
}

/// Checks that every commitment is published before its reveal and verifies
fn assert_protocol_order(events: &[RoundEvent]) {
    let mut published = None;
    for event in events {
        match event {
            RoundEvent::Committed { hmac, purpose, .. } => {
                assert!(published.is_none(), "two commitments open at once");
                published = Some((*hmac, *purpose));
            }
            RoundEvent::Revealed(record) => {
                let (hmac, purpose) = published.take().expect("reveal without commitment");
                assert_eq!(record.hmac, hmac);
                assert_eq!(record.purpose, purpose);
                assert!(verify_commitment(record.value, &record.key, &record.hmac));
                assert!(record.verify());
            }
            _ => {}
        }
    }
    assert!(published.is_none(), "commitment left unrevealed");
}

fn records(events: &[RoundEvent]) -> Vec<&DrawRecord> {
    events
        .iter()
        .filter_map(|e| match e {
            RoundEvent::Revealed(record) => Some(record),
            _ => None,
        })
        .collect()
}

#[test]
fn test_full_session_with_move_order_draw() {
    let mut game = Game::new(classic_set(), GameConfig::default(), StdRng::seed_from_u64(100));
    let mut chooser = StdRng::seed_from_u64(200);

    for _ in 0..25 {
        let events = play_round(&mut game, &mut chooser);
        assert_protocol_order(&events);

        let draws = records(&events);
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].purpose, DrawPurpose::MoveOrder);
        assert_eq!(draws[0].modulus, 2);
        assert!(draws[1..].iter().all(|r| r.modulus == 6));
        assert!(draws.iter().all(|r| r.session_id == game.session_id()));

        let Some(RoundEvent::Resolved(outcome)) = events.last() else {
            panic!("round did not resolve: {:?}", events);
        };
        assert_ne!(outcome.chosen_dice.0, outcome.chosen_dice.1);
        assert_eq!(
            outcome.result,
            RoundResult::from_rolls(outcome.roll_values.0, outcome.roll_values.1)
        );

        // First mover rolls first
        assert_eq!(draws[1].purpose, DrawPurpose::Roll(outcome.first_mover));
        assert_eq!(
            draws[2].purpose,
            DrawPurpose::Roll(outcome.first_mover.opponent())
        );
    }
    assert_eq!(game.score().rounds(), 25);
}

#[test]
fn test_rolls_match_revealed_draws() {
    let config = GameConfig {
        move_order_draw: false,
        opponent: OpponentStrategy::Random,
    };
    let mut game = Game::new(classic_set(), config, StdRng::seed_from_u64(300));
    let mut chooser = StdRng::seed_from_u64(400);

    for _ in 0..25 {
        let events = play_round(&mut game, &mut chooser);
        assert_protocol_order(&events);

        let mut dice_by_party = HashMap::new();
        let mut last_record: Option<&DrawRecord> = None;
        for event in &events {
            match event {
                RoundEvent::DieChosen { party, index } => {
                    dice_by_party.insert(*party, *index);
                }
                RoundEvent::Revealed(record) => last_record = Some(record),
                RoundEvent::Rolled {
                    party,
                    face_index,
                    value,
                } => {
                    let record = last_record.take().expect("roll without reveal");
                    assert_eq!(record.purpose, DrawPurpose::Roll(*party));
                    assert_eq!(*face_index as u32, (record.value + record.offset) % 6);
                    let die = &game.dice()[dice_by_party[party]];
                    assert_eq!(die.faces()[*face_index], *value);
                }
                _ => {}
            }
        }
        assert!(matches!(events[0], RoundEvent::FirstMover(Party::User)));
    }
}

#[test]
fn test_invalid_input_does_not_end_session() {
    let config = GameConfig {
        move_order_draw: false,
        opponent: OpponentStrategy::Best,
    };
    let mut game = Game::new(classic_set(), config, StdRng::seed_from_u64(500));
    game.start_round().unwrap();

    assert!(matches!(
        game.apply(Input::ChooseDie(42)),
        Err(GameError::InvalidUserSelection(_))
    ));
    assert!(matches!(
        game.apply(Input::Guess(0)),
        Err(GameError::InvalidUserSelection(_))
    ));

    let events = game.apply(Input::ChooseDie(2)).unwrap();
    // B beats C
    assert!(events.contains(&RoundEvent::DieChosen {
        party: Party::Computer,
        index: 1
    }));
    game.apply(Input::Offset(0)).unwrap();
    game.apply(Input::Offset(0)).unwrap();
    assert_eq!(game.phase(), Phase::RoundResolved);
}

#[test]
fn test_best_response_wins_more_often() {
    let config = GameConfig {
        move_order_draw: false,
        opponent: OpponentStrategy::Best,
    };
    let mut game = Game::new(classic_set(), config, StdRng::seed_from_u64(600));
    let mut chooser = StdRng::seed_from_u64(700);

    for _ in 0..2000 {
        play_round(&mut game, &mut chooser);
    }

    // Each user die faces its counter at 16 wins / 20 losses out of 36
    let score = game.score();
    assert_eq!(score.rounds(), 2000);
    assert_eq!(score.ties, 0);
    assert!(score.losses > score.wins, "{:?}", score);
}

#[test]
fn test_matrix_matches_engine_for_session_dice() {
    let dice = DiceSet::parse(&["2,2,2,2,2,2", "1,2,3,4,5,6", "0,0,4,4,4,4", "6,6,1,1,1,1"]).unwrap();
    let game = Game::new(dice.clone(), GameConfig::default(), StdRng::seed_from_u64(800));

    assert_eq!(*game.matrix(), ProbabilityMatrix::build(&dice));
    for i in 0..dice.len() {
        for j in 0..dice.len() {
            let cell = game.matrix().get(i, j).unwrap();
            assert_eq!(*cell, outcome_distribution(&dice[i], &dice[j]));
            assert_eq!(cell.total(), 36);
        }
    }
    assert_eq!(game.matrix().get(0, 0).unwrap().ties, 36);
}
