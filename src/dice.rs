//! Two fair six-sided dice: the outcome distribution over sums 2..12,
//! split into its doubles and non-doubles mass per sum. Used by both
//! the Markov transition builder (which must distinguish a double roll
//! from a non-double one of the same sum, since only doubles grant an
//! extra roll or risk sending the player to jail) and the roll-EPT
//! calculator (which only needs the combined distance distribution).

use once_cell::sync::Lazy;

/// The probability mass landing on `sum`, split by whether the two
/// dice matched. A sum of 2 or 12 can only be rolled as a double
/// (`non_double_probability == 0.0`); every other sum from 3 to 11 has
/// both components except when there is no double pair for it.
#[derive(Debug, Clone, Copy)]
pub struct RollOutcome {
    pub sum: u8,
    pub double_probability: f64,
    pub non_double_probability: f64,
}

impl RollOutcome {
    pub fn total_probability(&self) -> f64 {
        self.double_probability + self.non_double_probability
    }
}

/// All eleven distinct sums (2..=12), each split into doubles/non-doubles mass.
pub static ROLLS: Lazy<Vec<RollOutcome>> = Lazy::new(|| {
    let single = 1.0 / 36.0;
    let mut rolls: Vec<RollOutcome> = (2..=12)
        .map(|sum| RollOutcome {
            sum,
            double_probability: 0.0,
            non_double_probability: 0.0,
        })
        .collect();

    for d1 in 1..=6u8 {
        for d2 in 1..=6u8 {
            let sum = d1 + d2;
            let outcome = &mut rolls[(sum - 2) as usize];
            if d1 == d2 {
                outcome.double_probability += single;
            } else {
                outcome.non_double_probability += single;
            }
        }
    }

    rolls
});

/// Probability mass of rolling doubles in a single roll: six of the
/// thirty-six outcomes are doubles.
pub const DOUBLES_PROBABILITY: f64 = 6.0 / 36.0;

/// Probability mass of *not* rolling doubles in a single roll.
pub const NON_DOUBLES_PROBABILITY: f64 = 1.0 - DOUBLES_PROBABILITY;

/// The outcome record for `sum` (2..=12), panics outside that range —
/// callers always index with a statically known dice sum.
pub fn outcome(sum: u8) -> &'static RollOutcome {
    ROLLS
        .iter()
        .find(|r| r.sum == sum)
        .expect("dice sums run 2..=12")
}

/// Probability of landing exactly `distance` squares ahead on a single
/// roll (0 if `distance` is not a reachable sum, i.e. outside 2..=12).
pub fn probability_of_distance(distance: u8) -> f64 {
    ROLLS
        .iter()
        .find(|r| r.sum == distance)
        .map(|r| r.total_probability())
        .unwrap_or(0.0)
}

/// Expected value of a single two-die roll (7.0).
pub fn expected_roll() -> f64 {
    ROLLS.iter().map(|r| r.sum as f64 * r.total_probability()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_sum_to_one() {
        let total: f64 = ROLLS.iter().map(|r| r.total_probability()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn doubles_mass_is_one_sixth() {
        let total: f64 = ROLLS.iter().map(|r| r.double_probability).sum();
        assert!((total - DOUBLES_PROBABILITY).abs() < 1e-12);
    }

    #[test]
    fn two_and_twelve_are_pure_doubles() {
        assert_eq!(outcome(2).non_double_probability, 0.0);
        assert_eq!(outcome(12).non_double_probability, 0.0);
        assert!(outcome(2).double_probability > 0.0);
        assert!(outcome(12).double_probability > 0.0);
    }

    #[test]
    fn seven_is_most_likely_and_never_a_double() {
        let seven = outcome(7);
        assert_eq!(seven.double_probability, 0.0);
        assert!((seven.total_probability() - 6.0 / 36.0).abs() < 1e-12);
        for r in ROLLS.iter() {
            assert!(r.total_probability() <= seven.total_probability() + 1e-12);
        }
    }

    #[test]
    fn expected_roll_is_seven() {
        assert!((expected_roll() - 7.0).abs() < 1e-9);
    }
}
