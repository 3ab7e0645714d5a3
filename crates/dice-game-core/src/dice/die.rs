//! Six-faced dice and the dice set a session is played with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use thiserror::Error;

/// Number of faces on every die
pub const FACES: usize = 6;

/// Smallest dice set a game can be played with
pub const MIN_DICE: usize = 3;

/// Errors from building dice
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid dice configuration '{input}': {reason}")]
    InvalidDieFormat { input: String, reason: String },

    #[error("At least three dice are required, got {found}")]
    InsufficientDiceCount { found: usize },
}

/// A die with exactly six integer faces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    faces: [i32; FACES],
}

impl Die {
    /// Create a die from its faces
    pub fn new(faces: &[i32]) -> Result<Self, DiceError> {
        let faces: [i32; FACES] = faces.try_into().map_err(|_| DiceError::InvalidDieFormat {
            input: join_faces(faces),
            reason: format!("expected {} faces, got {}", FACES, faces.len()),
        })?;
        Ok(Self { faces })
    }

    /// Get the faces in order
    pub fn faces(&self) -> &[i32; FACES] {
        &self.faces
    }

    /// Face shown at a given index
    pub fn face(&self, index: usize) -> Option<i32> {
        self.faces.get(index).copied()
    }
}

fn join_faces(faces: &[i32]) -> String {
    faces
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl FromStr for Die {
    type Err = DiceError;

    /// Parse a comma separated face list such as `2,2,4,4,9,9`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let faces = s
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DiceError::InvalidDieFormat {
                input: s.to_string(),
                reason: format!("faces must be integers ({})", e),
            })?;

        Die::new(&faces).map_err(|_| DiceError::InvalidDieFormat {
            input: s.to_string(),
            reason: format!("expected {} faces, got {}", FACES, faces.len()),
        })
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join_faces(&self.faces))
    }
}

/// The ordered dice a session is played with
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiceSet(Vec<Die>);

impl DiceSet {
    /// Create a dice set, requiring at least three dice
    pub fn new(dice: Vec<Die>) -> Result<Self, DiceError> {
        if dice.len() < MIN_DICE {
            return Err(DiceError::InsufficientDiceCount { found: dice.len() });
        }
        Ok(Self(dice))
    }

    /// Parse one die per argument, in argument order
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, DiceError> {
        if args.len() < MIN_DICE {
            return Err(DiceError::InsufficientDiceCount { found: args.len() });
        }
        let dice = args
            .iter()
            .map(|arg| arg.as_ref().parse())
            .collect::<Result<Vec<Die>, _>>()?;
        Self::new(dice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Die> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Die> {
        self.0.iter()
    }
}

impl Index<usize> for DiceSet {
    type Output = Die;

    fn index(&self, index: usize) -> &Die {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a DiceSet {
    type Item = &'a Die;
    type IntoIter = std::slice::Iter<'a, Die>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_die() {
        let die: Die = "2,2,4,4,9,9".parse().unwrap();
        assert_eq!(die.faces(), &[2, 2, 4, 4, 9, 9]);
        assert_eq!(die.to_string(), "2,2,4,4,9,9");
    }

    #[test]
    fn test_parse_die_allows_spaces_and_negatives() {
        let die: Die = " -1, 0 ,3,3,10,-7".parse().unwrap();
        assert_eq!(die.faces(), &[-1, 0, 3, 3, 10, -7]);
    }

    #[test]
    fn test_wrong_face_count_rejected() {
        let err = "1,2,3".parse::<Die>().unwrap_err();
        assert!(matches!(err, DiceError::InvalidDieFormat { ref input, .. } if input == "1,2,3"));

        assert!("1,2,3,4,5,6,7".parse::<Die>().is_err());
        assert!(Die::new(&[1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn test_non_integer_face_rejected() {
        for input in ["1,2,3,4,5,x", "1,2,3,4,5,6.5", "", "1,,2,3,4,5"] {
            let err = input.parse::<Die>().unwrap_err();
            assert!(
                matches!(err, DiceError::InvalidDieFormat { .. }),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_error_message_names_input() {
        let err = "1,2,3".parse::<Die>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid dice configuration '1,2,3': expected 6 faces, got 3"
        );
    }

    #[test]
    fn test_dice_set_requires_three() {
        let err = DiceSet::parse(&["1,2,3,4,5,6", "1,2,3,4,5,6"]).unwrap_err();
        assert_eq!(err, DiceError::InsufficientDiceCount { found: 2 });

        let err = DiceSet::new(vec![]).unwrap_err();
        assert_eq!(err, DiceError::InsufficientDiceCount { found: 0 });
    }

    #[test]
    fn test_dice_set_keeps_argument_order() {
        let set = DiceSet::parse(&["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set[0].to_string(), "2,2,4,4,9,9");
        assert_eq!(set[1].to_string(), "1,1,6,6,8,8");
        assert_eq!(set[2].to_string(), "3,3,5,5,7,7");
        assert!(set.get(3).is_none());
    }

    #[test]
    fn test_dice_set_fails_on_any_bad_die() {
        let err = DiceSet::parse(&["2,2,4,4,9,9", "1,1,6", "3,3,5,5,7,7"]).unwrap_err();
        assert!(matches!(err, DiceError::InvalidDieFormat { ref input, .. } if input == "1,1,6"));
    }
}
