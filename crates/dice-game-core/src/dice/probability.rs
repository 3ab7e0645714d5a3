//! Exact win/loss/tie probabilities between dice.
//!
//! Every figure here comes from enumerating all 36 face pairs, so results are
//! exact rationals over 36. Floating point only appears when rendering.

use super::die::{DiceSet, Die, FACES};
use serde::{Deserialize, Serialize};

/// Decimal places used when rendering a fraction
pub const DISPLAY_PRECISION: usize = 4;

/// Pair counts of one die rolled against another
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDistribution {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl OutcomeDistribution {
    /// Number of face pairs counted
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    pub fn win_fraction(&self) -> f64 {
        self.fraction(self.wins)
    }

    pub fn loss_fraction(&self) -> f64 {
        self.fraction(self.losses)
    }

    pub fn tie_fraction(&self) -> f64 {
        self.fraction(self.ties)
    }

    /// The same matchup seen from the other die
    pub fn reversed(&self) -> Self {
        Self {
            wins: self.losses,
            losses: self.wins,
            ties: self.ties,
        }
    }

    fn fraction(&self, count: u32) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(count) / f64::from(total),
        }
    }
}

/// Count wins, losses and ties of `a` against `b` over all face pairs
pub fn outcome_distribution(a: &Die, b: &Die) -> OutcomeDistribution {
    let mut dist = OutcomeDistribution::default();
    for &x in a.faces() {
        for &y in b.faces() {
            match x.cmp(&y) {
                std::cmp::Ordering::Greater => dist.wins += 1,
                std::cmp::Ordering::Less => dist.losses += 1,
                std::cmp::Ordering::Equal => dist.ties += 1,
            }
        }
    }
    debug_assert_eq!(dist.total() as usize, FACES * FACES);
    dist
}

/// Probability that `a` rolls strictly higher than `b`
pub fn win_probability(a: &Die, b: &Die) -> f64 {
    outcome_distribution(a, b).win_fraction()
}

/// Render a fraction with the display precision
pub fn format_fraction(value: f64) -> String {
    format!("{:.*}", DISPLAY_PRECISION, value)
}

/// Square table of matchups over a dice set; cell `(i, j)` is die `i`
/// against die `j`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProbabilityMatrix {
    labels: Vec<String>,
    cells: Vec<OutcomeDistribution>,
}

impl ProbabilityMatrix {
    /// Enumerate every ordered pair, diagonal included
    pub fn build(dice: &DiceSet) -> Self {
        let cells = dice
            .iter()
            .flat_map(|a| dice.iter().map(move |b| outcome_distribution(a, b)))
            .collect();
        Self {
            labels: dice.iter().map(|d| d.to_string()).collect(),
            cells,
        }
    }

    /// Number of dice along each side
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Face list of each die, in dice set order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&OutcomeDistribution> {
        if row >= self.size() || col >= self.size() {
            return None;
        }
        self.cells.get(row * self.size() + col)
    }

    /// Rows of formatted win fractions, with a header row and a label column
    pub fn win_grid(&self) -> Vec<Vec<String>> {
        let mut header = vec!["User die v".to_string()];
        header.extend(self.labels.iter().cloned());

        let mut grid = vec![header];
        for (row, label) in self.labels.iter().enumerate() {
            let mut line = vec![label.clone()];
            line.extend(
                (0..self.size())
                    .filter_map(|col| self.get(row, col))
                    .map(|cell| format_fraction(cell.win_fraction())),
            );
            grid.push(line);
        }
        grid
    }

    /// Die that does best against `against`, skipping `exclude`.
    ///
    /// Ranked by win count, then fewer losses, then lower index.
    pub fn best_response(&self, against: usize, exclude: &[usize]) -> Option<usize> {
        (0..self.size())
            .filter(|i| !exclude.contains(i))
            .filter_map(|i| self.get(i, against).map(|cell| (i, *cell)))
            .max_by(|(ia, a), (ib, b)| {
                a.wins
                    .cmp(&b.wins)
                    .then(b.losses.cmp(&a.losses))
                    .then(ib.cmp(ia))
            })
            .map(|(i, _)| i)
    }

    /// Die with the most wins summed over every other die, lowest index on ties
    pub fn strongest(&self) -> Option<usize> {
        (0..self.size())
            .map(|i| {
                let wins: u32 = (0..self.size())
                    .filter(|j| *j != i)
                    .filter_map(|j| self.get(i, j))
                    .map(|cell| cell.wins)
                    .sum();
                (i, wins)
            })
            .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))
            .map(|(i, _)| i)
    }
}
