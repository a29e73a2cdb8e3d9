//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are carried as [`rust_decimal::Decimal`] end to end - cart lines,
//! order totals, payment amounts - so checkout math never touches floats.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Displays the way the market writes money: thousands space-grouped with
/// the currency after the amount, e.g. `15 000 FCFA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A price in CFA francs, the market's trading currency.
    #[must_use]
    pub const fn fcfa(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::XAF)
    }

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// The price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.amount.normalize().to_string();
        let (sign, rest) = rendered
            .strip_prefix('-')
            .map_or(("", rendered.as_str()), |r| ("-", r));
        let (int_part, frac_part) = match rest.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (rest, None),
        };

        let digit_count = int_part.chars().count();
        write!(f, "{sign}")?;
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (digit_count - i) % 3 == 0 {
                write!(f, " ")?;
            }
            write!(f, "{c}")?;
        }
        if let Some(frac) = frac_part {
            write!(f, ".{frac}")?;
        }
        write!(f, " {}", self.currency_code.suffix())
    }
}

/// ISO 4217 currency codes accepted by the marketplace.
///
/// The market trades in Central African CFA francs; the other codes exist
/// for diaspora card payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    XAF,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display suffix for the currency (CFA francs are written after the
    /// amount, e.g. "15 000 FCFA").
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::XAF => "FCFA",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_times_multiplies_amount() {
        let unit = Price::fcfa(Decimal::new(1500, 0));
        let line = unit.times(3);
        assert_eq!(line.amount, Decimal::new(4500, 0));
        assert_eq!(line.currency_code, CurrencyCode::XAF);
    }

    #[test]
    fn test_zero() {
        let zero = Price::zero(CurrencyCode::XAF);
        assert_eq!(zero.amount, Decimal::ZERO);
        assert_eq!(zero.to_string(), "0 FCFA");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::fcfa(Decimal::from(15000)).to_string(), "15 000 FCFA");
        assert_eq!(
            Price::fcfa(Decimal::from(2_500_000)).to_string(),
            "2 500 000 FCFA"
        );
        assert_eq!(Price::fcfa(Decimal::from(500)).to_string(), "500 FCFA");
    }

    #[test]
    fn test_display_keeps_fraction_ungrouped() {
        let amount: Decimal = "2500.50".parse().unwrap();
        assert_eq!(Price::fcfa(amount).to_string(), "2 500.5 FCFA");
    }

    #[test]
    fn test_display_other_currencies() {
        let price = Price::new(Decimal::from(25), CurrencyCode::USD);
        assert_eq!(price.to_string(), "25 USD");
    }

    #[test]
    fn test_default_currency_is_xaf() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::XAF);
        assert_eq!(CurrencyCode::default().suffix(), "FCFA");
    }
}
