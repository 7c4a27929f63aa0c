//! Currency amounts
//!
//! Everything sent to the contract is in minor units (cents). Parsing is done
//! on the decimal string so `25.50` is exactly `2550`, with no float rounding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Shown in place of an amount that cannot be decrypted
pub const PLACEHOLDER: &str = "***.**";

/// A positive amount in cents that fits an encrypted u32
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(u32);

impl Amount {
    pub fn from_cents(cents: u32) -> Result<Self, ValidationError> {
        if cents == 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(Self(cents))
    }

    pub fn cents(&self) -> u32 {
        self.0
    }

    /// Parse user input such as `25.5`, `$100` or `0.99`
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();

        if trimmed.is_empty() {
            return Err(ValidationError::EmptyAmount);
        }
        if trimmed.starts_with('-') {
            return Err(ValidationError::NonPositiveAmount);
        }

        let malformed = || ValidationError::MalformedAmount(input.trim().to_string());
        let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let (whole, frac) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (trimmed, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(malformed());
        }
        if frac.len() > 2 {
            return Err(ValidationError::TooPrecise);
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ValidationError::AmountTooLarge)?
        };
        let frac: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| malformed())? * 10,
            _ => frac.parse().map_err(|_| malformed())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or(ValidationError::AmountTooLarge)?;
        let cents = u32::try_from(cents).map_err(|_| ValidationError::AmountTooLarge)?;

        Self::from_cents(cents)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cents(u64::from(self.0)))
    }
}

/// Render cents as major units with two decimals
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_cents() {
        assert_eq!(Amount::parse("25.50").unwrap().cents(), 2550);
        assert_eq!(Amount::parse("25.5").unwrap().cents(), 2550);
        assert_eq!(Amount::parse("$100").unwrap().cents(), 10000);
        assert_eq!(Amount::parse(" 0.99 ").unwrap().cents(), 99);
        assert_eq!(Amount::parse(".5").unwrap().cents(), 50);
        assert_eq!(Amount::parse("7.").unwrap().cents(), 700);
        // Float parsing would give 1004
        assert_eq!(Amount::parse("10.05").unwrap().cents(), 1005);
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(Amount::parse(""), Err(ValidationError::EmptyAmount));
        assert_eq!(Amount::parse("  $ "), Err(ValidationError::EmptyAmount));
        assert_eq!(Amount::parse("0"), Err(ValidationError::NonPositiveAmount));
        assert_eq!(Amount::parse("0.00"), Err(ValidationError::NonPositiveAmount));
        assert_eq!(Amount::parse("-5"), Err(ValidationError::NonPositiveAmount));
        assert_eq!(Amount::parse("1.234"), Err(ValidationError::TooPrecise));
        assert_eq!(Amount::parse("50000000"), Err(ValidationError::AmountTooLarge));
        assert_eq!(
            Amount::parse("99999999999999999999999"),
            Err(ValidationError::AmountTooLarge)
        );
        assert!(matches!(Amount::parse("12abc"), Err(ValidationError::MalformedAmount(_))));
        assert!(matches!(Amount::parse("1.2.3"), Err(ValidationError::MalformedAmount(_))));
        assert!(matches!(Amount::parse("."), Err(ValidationError::MalformedAmount(_))));
        assert!(matches!(Amount::parse("1e3"), Err(ValidationError::MalformedAmount(_))));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_cents(2550), "25.50");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(7), "0.07");
        assert_eq!(Amount::parse("42").unwrap().to_string(), "42.00");
    }
}
