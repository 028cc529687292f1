//! Exact TON amount handling
//!
//! Amounts arrive as major-unit decimal strings and are carried as nanoton
//! integers. Conversion is pure integer arithmetic; any input that cannot be
//! represented exactly is rejected rather than rounded.

use serde::{Deserialize, Serialize};

use crate::shared::error::AmountError;

/// Number of decimal places in the minor unit (nanotons per TON)
pub const NANO_DECIMALS: u32 = 9;

const NANO_PER_TON: u128 = 1_000_000_000;

/// A positive TON amount, stored in nanotons
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TonAmount(u128);

impl TonAmount {
    /// Parse a major-unit decimal string, e.g. `"1.5"` -> 1_500_000_000
    ///
    /// Rejects non-positive values, malformed input, fractional parts longer
    /// than nine digits, and values that overflow the nanoton range.
    pub fn from_major_units(input: &str) -> Result<Self, AmountError> {
        let s = input.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(AmountError::Malformed(input.to_string()));
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if frac_part.contains('.') || (int_part.is_empty() && frac_part.is_empty()) {
            return Err(AmountError::Malformed(input.to_string()));
        }
        if frac_part.len() > NANO_DECIMALS as usize {
            return Err(AmountError::PrecisionLoss(NANO_DECIMALS));
        }

        let int_value: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| AmountError::Malformed(input.to_string()))?
        };

        let mut frac_value: u128 = 0;
        if !frac_part.is_empty() {
            frac_value = frac_part
                .parse()
                .map_err(|_| AmountError::Malformed(input.to_string()))?;
            frac_value *= NANO_PER_TON / 10u128.pow(frac_part.len() as u32);
        }

        let nano = int_value
            .checked_mul(NANO_PER_TON)
            .and_then(|v| v.checked_add(frac_value))
            .ok_or(AmountError::Overflow)?;

        if nano == 0 {
            return Err(AmountError::NonPositive);
        }
        Ok(Self(nano))
    }

    /// Construct from a nanoton value
    pub fn from_nano(nano: u128) -> Result<Self, AmountError> {
        if nano == 0 {
            return Err(AmountError::NonPositive);
        }
        Ok(Self(nano))
    }

    /// The nanoton value used in transfer requests
    pub fn as_nano(&self) -> u128 {
        self.0
    }

    /// Canonical major-unit decimal rendering, trailing zeros trimmed
    pub fn to_major_units(&self) -> String {
        let int_part = self.0 / NANO_PER_TON;
        let frac_part = self.0 % NANO_PER_TON;
        if frac_part == 0 {
            return int_part.to_string();
        }
        let frac = format!("{:09}", frac_part);
        format!("{}.{}", int_part, frac.trim_end_matches('0'))
    }
}

impl std::fmt::Display for TonAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_major_units())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_to_nano() {
        assert_eq!(TonAmount::from_major_units("1.5").unwrap().as_nano(), 1_500_000_000);
        assert_eq!(TonAmount::from_major_units("2").unwrap().as_nano(), 2_000_000_000);
        assert_eq!(TonAmount::from_major_units("0.000000001").unwrap().as_nano(), 1);
        assert_eq!(TonAmount::from_major_units(".5").unwrap().as_nano(), 500_000_000);
        assert_eq!(TonAmount::from_major_units("10.050").unwrap().as_nano(), 10_050_000_000);
    }

    #[test]
    fn test_round_trip_is_exact() {
        for input in ["1.5", "2", "0.000000001", "123456789.987654321", "10.05"] {
            let amount = TonAmount::from_major_units(input).unwrap();
            assert_eq!(amount.to_major_units(), input);
        }
        // Trailing zeros canonicalize, then round-trip stably
        let amount = TonAmount::from_major_units("1.50").unwrap();
        assert_eq!(amount.to_major_units(), "1.5");
        assert_eq!(
            TonAmount::from_major_units(&amount.to_major_units()).unwrap(),
            amount
        );
    }

    #[test]
    fn test_rejects_precision_loss() {
        assert_eq!(
            TonAmount::from_major_units("1.0000000001"),
            Err(AmountError::PrecisionLoss(NANO_DECIMALS))
        );
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(TonAmount::from_major_units("0"), Err(AmountError::NonPositive));
        assert_eq!(TonAmount::from_major_units("0.0"), Err(AmountError::NonPositive));
        assert!(matches!(
            TonAmount::from_major_units("-1"),
            Err(AmountError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        for input in ["", ".", "1.2.3", "1,5", "abc", "1e9", " "] {
            assert!(
                matches!(TonAmount::from_major_units(input), Err(AmountError::Malformed(_))),
                "expected malformed: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_overflow() {
        // Parses as u128 but overflows the nanoton range
        let huge = format!("1{}", "0".repeat(30));
        assert_eq!(TonAmount::from_major_units(&huge), Err(AmountError::Overflow));
    }
}
