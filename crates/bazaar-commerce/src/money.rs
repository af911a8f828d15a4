//! Money type for representing rupee amounts.
//!
//! Amounts are held as an integer count of paisa (1/100 rupee) so that
//! totals and discount arithmetic never go through floating point. In
//! documents a `Money` is stored as that plain integer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// Paisa per rupee.
const PAISA_PER_RUPEE: i64 = 100;

/// A rupee amount in paisa.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    paisa: i64,
}

impl Money {
    /// Create a Money value from paisa.
    pub const fn from_paisa(paisa: i64) -> Self {
        Self { paisa }
    }

    /// Create a Money value from whole rupees.
    ///
    /// ```
    /// use bazaar_commerce::Money;
    /// assert_eq!(Money::rupees(500).paisa(), 50_000);
    /// ```
    pub const fn rupees(rupees: i64) -> Self {
        Self {
            paisa: rupees * PAISA_PER_RUPEE,
        }
    }

    /// Zero rupees.
    pub const fn zero() -> Self {
        Self { paisa: 0 }
    }

    /// Amount in paisa.
    pub fn paisa(&self) -> i64 {
        self.paisa
    }

    /// Whole-rupee part of the amount.
    pub fn whole_rupees(&self) -> i64 {
        self.paisa / PAISA_PER_RUPEE
    }

    pub fn is_zero(&self) -> bool {
        self.paisa == 0
    }

    pub fn is_negative(&self) -> bool {
        self.paisa < 0
    }

    /// Multiply by a quantity, saturating at the `i64` bounds.
    pub fn multiply(&self, factor: i64) -> Money {
        Money::from_paisa(self.paisa.saturating_mul(factor))
    }

    /// Checked multiplication.
    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        self.paisa.checked_mul(factor).map(Money::from_paisa)
    }

    /// Price after taking `percent` off, rounded to the nearest paisa.
    ///
    /// Percentages above 100 are clamped to 100.
    pub fn percent_off(&self, percent: u8) -> Money {
        let keep = 100 - i64::from(percent.min(100));
        let scaled = i128::from(self.paisa) * i128::from(keep);
        // Round half away from zero.
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        Money::from_paisa(rounded as i64)
    }

    /// Checked addition.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.paisa.checked_add(other.paisa).map(Money::from_paisa)
    }

    /// Format as a display string, e.g. `Rs. 1500` or `Rs. 1499.50`.
    pub fn display(&self) -> String {
        let sign = if self.paisa < 0 { "-" } else { "" };
        let abs = self.paisa.abs();
        let rupees = abs / PAISA_PER_RUPEE;
        let paisa = abs % PAISA_PER_RUPEE;
        if paisa == 0 {
            format!("{}Rs. {}", sign, rupees)
        } else {
            format!("{}Rs. {}.{:02}", sign, rupees, paisa)
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_paisa(self.paisa.saturating_add(other.paisa))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_paisa(self.paisa.saturating_sub(other.paisa))
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        self.multiply(factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_rupees() {
        let m = Money::rupees(500);
        assert_eq!(m.paisa(), 50_000);
        assert_eq!(m.whole_rupees(), 500);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::rupees(1500).display(), "Rs. 1500");
        assert_eq!(Money::from_paisa(149_950).display(), "Rs. 1499.50");
        assert_eq!(Money::from_paisa(-5).display(), "-Rs. 0.05");
    }

    #[test]
    fn test_money_arithmetic() {
        let total = Money::rupees(500) * 2 + Money::rupees(300) + Money::rupees(200);
        assert_eq!(total, Money::rupees(1500));
        assert_eq!(Money::rupees(1000) - Money::rupees(300), Money::rupees(700));
    }

    #[test]
    fn test_money_sum() {
        let amounts = vec![Money::rupees(1), Money::rupees(2), Money::rupees(3)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::rupees(6));
    }

    #[test]
    fn test_percent_off_rounds_to_nearest_paisa() {
        assert_eq!(Money::rupees(1000).percent_off(20), Money::rupees(800));
        // 999 * 0.85 = 849.15
        assert_eq!(Money::rupees(999).percent_off(15), Money::from_paisa(84_915));
        // 0.99 * 0.5 = 0.495 -> 0.50
        assert_eq!(Money::from_paisa(99).percent_off(50), Money::from_paisa(50));
        assert_eq!(Money::rupees(10).percent_off(150), Money::zero());
    }

    #[test]
    fn test_money_serializes_as_integer() {
        let json = serde_json::to_string(&Money::rupees(2)).unwrap();
        assert_eq!(json, "200");
        let back: Money = serde_json::from_str("250").unwrap();
        assert_eq!(back, Money::from_paisa(250));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let price = Money::rupees(500);
        assert_eq!(price.checked_mul(3), Some(Money::rupees(1500)));
        assert_eq!(price.checked_mul(1_000_000_000_000_000), None);
        assert_eq!(Money::from_paisa(i64::MAX).checked_add(Money::from_paisa(1)), None);
    }

    #[test]
    fn test_operators_saturate() {
        let huge = Money::from_paisa(i64::MAX);
        assert_eq!(huge + Money::rupees(1), huge);
        assert_eq!(Money::rupees(500) * 1_000_000_000_000_000, huge);
    }

}
