//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are a single currency (US dollars). Display follows the `en-US`
//! number format the storefront has always shown: a `$` prefix, `,` as the
//! thousands separator and at most three fraction digits with trailing
//! zeros dropped.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency symbol prefixed to every displayed price.
pub const CURRENCY_SYMBOL: &str = "$";

/// Fraction digits kept when formatting for display.
const DISPLAY_FRACTION_DIGITS: u32 = 3;

/// Error parsing a price from text.
#[derive(Debug, Error)]
#[error("invalid price {input:?}: {source}")]
pub struct PriceError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// A non-currency-tagged price amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price, also used for missing or unparseable amounts.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a price, treating empty or non-numeric input as zero.
    #[must_use]
    pub fn parse_or_zero(input: &str) -> Self {
        input.parse().unwrap_or(Self::ZERO)
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display (e.g. `$1,234.5`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{}", format_amount(self.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self)
            .map_err(|source| PriceError {
                input: s.to_string(),
                source,
            })
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Format a decimal amount with `,` thousands separators.
///
/// Rounds half away from zero to three fraction digits and drops trailing
/// zeros, so whole amounts carry no decimal point at all.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(DISPLAY_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(text.len() + whole.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_whole_amount_has_no_fraction() {
        assert_eq!(price("60").display(), "$60");
        assert_eq!(price("60.00").display(), "$60");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(price("1234.5").display(), "$1,234.5");
        assert_eq!(price("1234567").display(), "$1,234,567");
        assert_eq!(price("999").display(), "$999");
        assert_eq!(price("100000").display(), "$100,000");
    }

    #[test]
    fn test_display_rounds_to_three_fraction_digits() {
        assert_eq!(price("2.0005").display(), "$2.001");
        assert_eq!(price("0.1234").display(), "$0.123");
    }

    #[test]
    fn test_display_zero() {
        assert_eq!(Price::ZERO.display(), "$0");
        assert_eq!(Price::ZERO.to_string(), "$0");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(price("-1500").display(), "$-1,500");
    }

    #[test]
    fn test_parse_or_zero_handles_garbage() {
        assert_eq!(Price::parse_or_zero(""), Price::ZERO);
        assert_eq!(Price::parse_or_zero("abc"), Price::ZERO);
        assert_eq!(Price::parse_or_zero(" 25 "), Price::from(25));
    }

    #[test]
    fn test_parse_scientific_notation() {
        assert_eq!(price("1e3"), Price::from(1000));
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [price("10").times(2), price("2.5").times(4)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from(30));
    }
}
