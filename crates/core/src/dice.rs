//! Dice-expression parsing and rolling.
//!
//! Expressions use the conventional `NdS+M` notation: `2d6`, `1d20+5`,
//! `4d8-2`. Parsing is bounded so a request cannot ask for an absurd
//! number of dice.

use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum number of dice in one expression.
pub const MAX_DICE_COUNT: i64 = 100;

/// Maximum number of sides per die.
pub const MAX_DIE_SIDES: i64 = 1000;

/// A parsed dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    /// Number of dice to roll (1 ..= [`MAX_DICE_COUNT`]).
    pub count: i64,
    /// Sides per die (2 ..= [`MAX_DIE_SIDES`]).
    pub sides: i64,
    /// Flat modifier added to the sum (may be negative).
    pub modifier: i64,
}

/// Outcome of rolling a [`DiceExpression`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceOutcome {
    /// Individual die results, in roll order.
    pub rolls: Vec<i64>,
    /// The expression's flat modifier.
    pub modifier: i64,
    /// Sum of rolls plus modifier.
    pub total: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("invalid dice expression: {0}")]
    Invalid(String),

    #[error("dice count must be between 1 and {MAX_DICE_COUNT}")]
    CountOutOfRange,

    #[error("die sides must be between 2 and {MAX_DIE_SIDES}")]
    SidesOutOfRange,
}

fn expression_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)d(\d+)([+-]\d+)?$").expect("dice regex is valid"))
}

impl DiceExpression {
    /// Parse `NdS`, `NdS+M`, or `NdS-M` (case-insensitive, whitespace
    /// trimmed).
    pub fn parse(input: &str) -> Result<Self, DiceError> {
        let normalized = input.trim().to_lowercase().replace(' ', "");
        let captures = expression_regex()
            .captures(&normalized)
            .ok_or_else(|| DiceError::Invalid(input.trim().to_string()))?;

        // Overlong digit runs fail i64 parsing; report them as range errors.
        let count: i64 = captures[1].parse().map_err(|_| DiceError::CountOutOfRange)?;
        let sides: i64 = captures[2].parse().map_err(|_| DiceError::SidesOutOfRange)?;
        let modifier: i64 = captures
            .get(3)
            .map(|m| m.as_str().parse())
            .transpose()
            .map_err(|_| DiceError::Invalid(input.trim().to_string()))?
            .unwrap_or(0);

        if !(1..=MAX_DICE_COUNT).contains(&count) {
            return Err(DiceError::CountOutOfRange);
        }
        if !(2..=MAX_DIE_SIDES).contains(&sides) {
            return Err(DiceError::SidesOutOfRange);
        }

        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    /// Canonical `NdS+M` spelling of this expression.
    pub fn canonical(&self) -> String {
        match self.modifier {
            0 => format!("{}d{}", self.count, self.sides),
            m if m > 0 => format!("{}d{}+{}", self.count, self.sides, m),
            m => format!("{}d{}{}", self.count, self.sides, m),
        }
    }

    /// Roll the expression with the given RNG.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> DiceOutcome {
        let rolls: Vec<i64> = (0..self.count)
            .map(|_| rng.random_range(1..=self.sides))
            .collect();
        let total = rolls.iter().sum::<i64>() + self.modifier;
        DiceOutcome {
            rolls,
            modifier: self.modifier,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn parses_plain_expression() {
        let expr = DiceExpression::parse("2d6").unwrap();
        assert_eq!(
            expr,
            DiceExpression {
                count: 2,
                sides: 6,
                modifier: 0
            }
        );
    }

    #[test]
    fn parses_positive_and_negative_modifiers() {
        assert_eq!(DiceExpression::parse("1d20+5").unwrap().modifier, 5);
        assert_eq!(DiceExpression::parse("4d8-2").unwrap().modifier, -2);
    }

    #[test]
    fn parse_is_case_and_whitespace_insensitive() {
        assert_eq!(
            DiceExpression::parse(" 1D20 + 3 ").unwrap(),
            DiceExpression {
                count: 1,
                sides: 20,
                modifier: 3
            }
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            DiceExpression::parse("d20"),
            Err(DiceError::Invalid(_))
        ));
        assert!(matches!(
            DiceExpression::parse("2x6"),
            Err(DiceError::Invalid(_))
        ));
        assert!(matches!(
            DiceExpression::parse(""),
            Err(DiceError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_counts() {
        assert_eq!(
            DiceExpression::parse("0d6"),
            Err(DiceError::CountOutOfRange)
        );
        assert_eq!(
            DiceExpression::parse("101d6"),
            Err(DiceError::CountOutOfRange)
        );
        assert_eq!(
            DiceExpression::parse("2d1"),
            Err(DiceError::SidesOutOfRange)
        );
        assert_eq!(
            DiceExpression::parse("2d1001"),
            Err(DiceError::SidesOutOfRange)
        );
    }

    #[test]
    fn canonical_round_trips() {
        for input in ["2d6", "1d20+5", "4d8-2"] {
            let expr = DiceExpression::parse(input).unwrap();
            assert_eq!(expr.canonical(), input);
            assert_eq!(DiceExpression::parse(&expr.canonical()).unwrap(), expr);
        }
    }

    #[test]
    fn roll_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let expr = DiceExpression::parse("10d6+2").unwrap();
        let outcome = expr.roll(&mut rng);

        assert_eq!(outcome.rolls.len(), 10);
        assert!(outcome.rolls.iter().all(|&r| (1..=6).contains(&r)));
        assert_eq!(outcome.total, outcome.rolls.iter().sum::<i64>() + 2);
    }

    #[test]
    fn roll_is_deterministic_for_a_seed() {
        let expr = DiceExpression::parse("3d20").unwrap();
        let a = expr.roll(&mut StdRng::seed_from_u64(42));
        let b = expr.roll(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
