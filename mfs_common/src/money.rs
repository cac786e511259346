use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

pub const DEFAULT_CURRENCY_CODE: &str = "USD";

/// A monetary amount in integer cents.
///
/// Shopify transmits prices as decimal strings ("19.99"). Storing them as
/// integer cents keeps arithmetic and equality exact, and the string form is
/// reconstructed on the way out with [`Money::to_decimal_string`].
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Money(i64);

#[derive(Debug, Clone, Error)]
#[error("Invalid money amount: {0}")]
pub struct MoneyParseError(String);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Formats the amount as a plain decimal string with two decimals, e.g. `19.99`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        format!("{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    /// Parses a Shopify price string. Accepts `19.99`, `19.9`, `19` and a
    /// leading minus. Anything past two decimals is rejected rather than
    /// silently rounded.
    fn from_str(price: &str) -> Result<Self, Self::Err> {
        let price = price.trim();
        let (sign, digits) = match price.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, price),
        };
        let mut parts = digits.split('.');
        let whole = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MoneyParseError(price.to_string()))?
            .parse::<i64>()
            .map_err(|e| MoneyParseError(format!("{price}: {e}")))?;
        let cents = match parts.next() {
            None | Some("") => 0,
            Some(frac) if frac.len() <= 2 => {
                let v = frac.parse::<i64>().map_err(|e| MoneyParseError(format!("{price}: {e}")))?;
                if frac.len() == 1 {
                    v * 10
                } else {
                    v
                }
            },
            Some(_) => return Err(MoneyParseError(format!("{price}: too many decimal places"))),
        };
        if parts.next().is_some() {
            return Err(MoneyParseError(price.to_string()));
        }
        Ok(Self(sign * (whole * 100 + cents)))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_shopify_price_strings() {
        assert_eq!("19.99".parse::<Money>().unwrap(), Money::from_cents(1999));
        assert_eq!("19.9".parse::<Money>().unwrap(), Money::from_cents(1990));
        assert_eq!("19".parse::<Money>().unwrap(), Money::from_cents(1900));
        assert_eq!("0.05".parse::<Money>().unwrap(), Money::from_cents(5));
        assert_eq!("-2.50".parse::<Money>().unwrap(), Money::from_cents(-250));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("1.999".parse::<Money>().is_err());
    }

    #[test]
    fn round_trips_to_decimal_string() {
        assert_eq!(Money::from_cents(1999).to_decimal_string(), "19.99");
        assert_eq!(Money::from_cents(500).to_decimal_string(), "5.00");
        assert_eq!(Money::from_cents(-250).to_decimal_string(), "-2.50");
        assert_eq!(Money::from_cents(7).to_decimal_string(), "0.07");
    }
}
