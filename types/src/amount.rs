//! Token amount types for ETH, BETH and WORM.
//!
//! Amounts are stored as wei (u128) to avoid floating-point errors.
//! All three tokens use 18 decimals; display and parsing helpers convert
//! between wei and decimal ether strings.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::AmountParseError;

/// Number of wei per whole token unit (18 decimals).
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Wei per gwei.
pub const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Native ETH amount in wei.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EthAmount(u128);

/// BETH (burnt-ETH token) amount in wei.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BethAmount(u128);

/// WORM reward token amount in wei.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WormAmount(u128);

macro_rules! impl_amount {
    ($name:ident, $symbol:literal) => {
        impl $name {
            pub const ZERO: Self = Self(0);

            pub const fn from_wei(raw: u128) -> Self {
                Self(raw)
            }

            pub const fn wei(&self) -> u128 {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == 0
            }

            /// Convert to a `U256` for contract call arguments.
            pub fn to_u256(&self) -> U256 {
                U256::from(self.0)
            }

            /// Saturating conversion from a chain-reported `U256` balance.
            ///
            /// Balances above `u128::MAX` wei cannot occur for real tokens;
            /// clamping keeps the conversion total.
            pub fn from_u256_saturating(value: U256) -> Self {
                Self(u128::try_from(value).unwrap_or(u128::MAX))
            }

            pub fn checked_add(self, other: Self) -> Option<Self> {
                self.0.checked_add(other.0).map(Self)
            }

            pub fn checked_sub(self, other: Self) -> Option<Self> {
                self.0.checked_sub(other.0).map(Self)
            }

            pub fn saturating_sub(self, other: Self) -> Self {
                Self(self.0.saturating_sub(other.0))
            }

            pub fn saturating_mul(self, factor: u128) -> Self {
                Self(self.0.saturating_mul(factor))
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", format_ether(self.0), $symbol)
            }
        }

        impl FromStr for $name {
            type Err = AmountParseError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_ether(s).map(Self)
            }
        }
    };
}

impl_amount!(EthAmount, "ETH");
impl_amount!(BethAmount, "BETH");
impl_amount!(WormAmount, "WORM");

/// Format a wei amount as a decimal ether string with trailing zeros trimmed.
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:018}");
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Parse a decimal ether string ("0.05", "1", ".5") into wei.
///
/// Pure integer arithmetic; rejects more than 18 fractional digits.
pub fn parse_ether(s: &str) -> Result<u128, AmountParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AmountParseError::Empty);
    }
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if frac.len() > 18 {
        return Err(AmountParseError::TooManyDecimals(frac.len()));
    }
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| AmountParseError::Invalid(s.to_string()))?
    };
    let frac_wei: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<18}");
        padded
            .parse()
            .map_err(|_| AmountParseError::Invalid(s.to_string()))?
    };
    whole
        .checked_mul(WEI_PER_ETHER)
        .and_then(|w| w.checked_add(frac_wei))
        .ok_or_else(|| AmountParseError::Overflow(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_ether() {
        assert_eq!(parse_ether("1").unwrap(), WEI_PER_ETHER);
        assert_eq!(parse_ether("0").unwrap(), 0);
    }

    #[test]
    fn parse_fractional_ether() {
        assert_eq!(parse_ether("0.05").unwrap(), WEI_PER_ETHER / 20);
        assert_eq!(parse_ether("0.001").unwrap(), WEI_PER_ETHER / 1000);
        assert_eq!(parse_ether("0.00001").unwrap(), WEI_PER_ETHER / 100_000);
        assert_eq!(parse_ether(".5").unwrap(), WEI_PER_ETHER / 2);
    }

    #[test]
    fn parse_rejects_excess_precision() {
        assert!(matches!(
            parse_ether("0.0000000000000000001"),
            Err(AmountParseError::TooManyDecimals(19))
        ));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_ether("abc").is_err());
        assert!(parse_ether("").is_err());
        assert!(parse_ether("1.2.3").is_err());
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_ether(WEI_PER_ETHER / 20), "0.05");
        assert_eq!(format_ether(WEI_PER_ETHER), "1");
        assert_eq!(format_ether(0), "0");
    }

    #[test]
    fn format_parse_roundtrip() {
        for s in ["0.05", "0.001", "0.00001", "12.345"] {
            let wei = parse_ether(s).unwrap();
            assert_eq!(format_ether(wei), s);
        }
    }

    #[test]
    fn display_includes_symbol() {
        let amount = EthAmount::from_wei(WEI_PER_ETHER / 20);
        assert_eq!(amount.to_string(), "0.05 ETH");
        let amount = BethAmount::from_wei(WEI_PER_ETHER);
        assert_eq!(amount.to_string(), "1 BETH");
    }

    #[test]
    fn from_str_parses_decimal() {
        let amount: EthAmount = "0.05".parse().unwrap();
        assert_eq!(amount.wei(), WEI_PER_ETHER / 20);
    }

    #[test]
    fn saturating_u256_conversion() {
        let exact = U256::from(42u64);
        assert_eq!(BethAmount::from_u256_saturating(exact).wei(), 42);

        let huge = U256::MAX;
        assert_eq!(BethAmount::from_u256_saturating(huge).wei(), u128::MAX);
    }

    #[test]
    fn checked_sub_underflow() {
        let a = EthAmount::from_wei(1);
        let b = EthAmount::from_wei(2);
        assert!(a.checked_sub(b).is_none());
        assert_eq!(a.saturating_sub(b), EthAmount::ZERO);
    }
}
