use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClubError;

/// A non-negative amount of money, stored as whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Money(cents)
    }

    pub fn from_dollars(dollars: u64) -> Self {
        Money(dollars.saturating_mul(100))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    /// Whole amounts print without decimals ("20"), anything else with two ("20.50").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = self.0 / 100;
        let cents = self.0 % 100;
        if cents == 0 {
            write!(f, "{}", dollars)
        } else {
            write!(f, "{}.{:02}", dollars, cents)
        }
    }
}

impl FromStr for Money {
    type Err = ClubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClubError::InvalidAmount(s.to_string());

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
            || frac.len() > 2
        {
            return Err(invalid());
        }

        let dollars: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Money)
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!("20".parse::<Money>().unwrap(), Money::from_cents(2000));
        assert_eq!("20.5".parse::<Money>().unwrap(), Money::from_cents(2050));
        assert_eq!("20.05".parse::<Money>().unwrap(), Money::from_cents(2005));
        assert_eq!("$7".parse::<Money>().unwrap(), Money::from_cents(700));
        assert_eq!(" .75 ".parse::<Money>().unwrap(), Money::from_cents(75));
        assert_eq!("0".parse::<Money>().unwrap(), Money::ZERO);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["", "  ", "-5", "abc", "1.234", "1.2.3", "$", ".", "1e3", "EXEMPT"] {
            assert_eq!(
                bad.parse::<Money>(),
                Err(ClubError::InvalidAmount(bad.to_string())),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_dollars(20).to_string(), "20");
        assert_eq!(Money::from_cents(2050).to_string(), "20.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::ZERO.to_string(), "0");
    }

    #[test]
    fn test_sum_and_ordering() {
        let total: Money = [Money::from_dollars(20), Money::from_dollars(30)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_dollars(50));
        assert!(Money::from_dollars(50) >= Money::from_cents(4999));
    }
}
