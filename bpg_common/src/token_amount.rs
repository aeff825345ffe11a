use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

/// The number of decimal places carried by [`TokenAmount`], and by every money value that crosses
/// the wire. Amounts are always serialized as fixed-point strings with exactly this many decimals,
/// never as binary floats, so that both sides of the gateway agree on rounding.
pub const TOKEN_DECIMALS: u32 = 4;

const SCALE: i64 = 10_000;

//--------------------------------------    TokenAmount    -----------------------------------------------------------
/// A monetary amount held as an integer count of 1/10000 units (4-decimal fixed point).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenAmount(i64);

op!(binary TokenAmount, Add, add);
op!(binary TokenAmount, Sub, sub);
op!(inplace TokenAmount, SubAssign, sub_assign);
op!(unary TokenAmount, Neg, neg);

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a token amount: {0}")]
pub struct TokenAmountError(String);

impl From<i64> for TokenAmount {
    fn from(units: i64) -> Self {
        Self(units)
    }
}

impl TokenAmount {
    /// The raw number of 1/10000 units.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_units(units: i64) -> Self {
        Self(units)
    }

    pub fn from_whole(n: i64) -> Self {
        Self(n * SCALE)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert an on-chain integer token value carrying `decimals` declared decimal places into a
    /// [`TokenAmount`]. Dust below 1/10000 truncates toward zero.
    pub fn from_base_units(value: u64, decimals: u32) -> Result<Self, TokenAmountError> {
        let value = i128::from(value);
        let scaled = if decimals >= TOKEN_DECIMALS {
            let divisor = 10i128
                .checked_pow(decimals - TOKEN_DECIMALS)
                .ok_or_else(|| TokenAmountError(format!("token precision of {decimals} decimals is out of range")))?;
            value / divisor
        } else {
            let factor = 10i128.pow(TOKEN_DECIMALS - decimals);
            value
                .checked_mul(factor)
                .ok_or_else(|| TokenAmountError(format!("{value} at {decimals} decimals overflows")))?
        };
        i64::try_from(scaled)
            .map(Self)
            .map_err(|_| TokenAmountError(format!("{value} at {decimals} decimals overflows")))
    }
}

impl Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:04}", abs / SCALE as u64, abs % SCALE as u64)
    }
}

impl FromStr for TokenAmount {
    type Err = TokenAmountError;

    /// Parses a decimal string into 4-decimal fixed point. Fractional digits beyond the fourth are
    /// truncated, matching the fixed-precision wire format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let (negative, raw) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        if raw.is_empty() {
            return Err(TokenAmountError(format!("'{s}' is not a decimal amount")));
        }
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((i, f)) => (i, f),
            None => (raw, ""),
        };
        if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(TokenAmountError(format!("'{s}' is not a decimal amount")));
        }
        let whole = if int_part.is_empty() { 0 } else {
            int_part.parse::<i64>().map_err(|e| TokenAmountError(format!("'{s}': {e}")))?
        };
        let mut frac = 0i64;
        for c in frac_part.chars().take(TOKEN_DECIMALS as usize) {
            frac = frac * 10 + i64::from(c as u8 - b'0');
        }
        for _ in frac_part.len()..TOKEN_DECIMALS as usize {
            frac *= 10;
        }
        let units = whole
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(|| TokenAmountError(format!("'{s}' is too large")))?;
        Ok(Self(if negative { -units } else { units }))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_is_fixed_four_decimals() {
        assert_eq!(TokenAmount::from_whole(10).to_string(), "10.0000");
        assert_eq!(TokenAmount::from_units(1).to_string(), "0.0001");
        assert_eq!(TokenAmount::from_units(-123456).to_string(), "-12.3456");
        assert_eq!(TokenAmount::default().to_string(), "0.0000");
    }

    #[test]
    fn parse_round_trips() {
        for s in ["0.0000", "10.0000", "12.3456", "-3.1400", "99999.9999"] {
            let amount = s.parse::<TokenAmount>().expect("valid amount");
            assert_eq!(amount.to_string(), s);
        }
    }

    #[test]
    fn parse_pads_and_truncates_fractions() {
        assert_eq!("10".parse::<TokenAmount>().unwrap(), TokenAmount::from_whole(10));
        assert_eq!("10.5".parse::<TokenAmount>().unwrap(), TokenAmount::from_units(105_000));
        assert_eq!("0.123456".parse::<TokenAmount>().unwrap(), TokenAmount::from_units(1234));
        assert_eq!(".25".parse::<TokenAmount>().unwrap(), TokenAmount::from_units(2500));
    }

    #[test]
    fn parse_rejects_garbage() {
        for s in ["", "-", "1,000", "ten", "1.2.3", "1e5"] {
            assert!(s.parse::<TokenAmount>().is_err(), "'{s}' should not parse");
        }
    }

    #[test]
    fn base_unit_conversions() {
        // 100000000 base units at 6 decimals is 100.0
        assert_eq!(TokenAmount::from_base_units(100_000_000, 6).unwrap(), TokenAmount::from_whole(100));
        // fewer declared decimals than the fixed point scale up
        assert_eq!(TokenAmount::from_base_units(5, 0).unwrap(), TokenAmount::from_whole(5));
        assert_eq!(TokenAmount::from_base_units(55, 2).unwrap(), TokenAmount::from_units(5500));
        // dust below 1/10000 truncates toward zero
        assert_eq!(TokenAmount::from_base_units(999, 8).unwrap(), TokenAmount::from_units(0));
        assert!(TokenAmount::from_base_units(u64::MAX, 0).is_err());
    }

    #[test]
    fn arithmetic() {
        let a = TokenAmount::from_whole(10);
        let b = TokenAmount::from_units(25_000);
        assert_eq!((a + b).to_string(), "12.5000");
        assert_eq!((a - b).to_string(), "7.5000");
        assert_eq!((-b).to_string(), "-2.5000");
        assert!(a > b);
        let total: TokenAmount = [a, b, b].into_iter().sum();
        assert_eq!(total.to_string(), "15.0000");
    }
}
