//! Pool accounting unit.
//!
//! Amounts are integer base units with 18 implied decimals, so `1.0` is
//! 10^18 base units. Vote weights use the same unit as balances.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional decimal digits in the display unit.
pub const DECIMALS: u32 = 18;

const UNIT: u128 = 10u128.pow(DECIMALS);

/// Non-negative amount in base units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    pub fn base_units(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            return write!(f, "{}.0", whole);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

/// Parse a decimal string such as `1.0`, `0.5` or `42`.
///
/// At most 18 fractional digits are accepted; anything finer than one base
/// unit is rejected rather than rounded.
impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole_str, frac_str) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole_str.is_empty() && frac_str.is_empty() {
            return Err(format!("Invalid amount: '{}'", s));
        }
        if !whole_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(format!("Invalid amount: '{}'", s));
        }
        if frac_str.len() > DECIMALS as usize {
            return Err(format!(
                "Amount has more than {} decimal places: '{}'",
                DECIMALS, s
            ));
        }

        let whole: u128 = if whole_str.is_empty() {
            0
        } else {
            whole_str
                .parse()
                .map_err(|_| format!("Amount out of range: '{}'", s))?
        };
        let frac: u128 = if frac_str.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac_str, width = DECIMALS as usize);
            padded
                .parse()
                .map_err(|_| format!("Invalid amount: '{}'", s))?
        };

        whole
            .checked_mul(UNIT)
            .and_then(|w| w.checked_add(frac))
            .map(Amount)
            .ok_or_else(|| format!("Amount out of range: '{}'", s))
    }
}
