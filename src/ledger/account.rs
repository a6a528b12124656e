//! Account identifiers.
//!
//! Accounts are 20-byte addresses written as `0x`-prefixed hex. Parsing is
//! case-insensitive; display is always lowercase.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address length in bytes.
pub const ACCOUNT_ID_LEN: usize = 20;

/// Account identifier (20-byte address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Get bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Short form for log lines (`0x1234…cdef`).
    pub fn short(&self) -> String {
        let full = hex::encode(self.0);
        format!("0x{}…{}", &full[..4], &full[full.len() - 4..])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| format!("Account id must start with 0x. Got: {}", s))?;

        if digits.len() != ACCOUNT_ID_LEN * 2 {
            return Err(format!(
                "Invalid account id length: {}. Expected {} hex characters.",
                digits.len(),
                ACCOUNT_ID_LEN * 2
            ));
        }

        let bytes = hex::decode(digits).map_err(|e| format!("Invalid account id hex: {}", e))?;
        let mut id = [0u8; ACCOUNT_ID_LEN];
        id.copy_from_slice(&bytes);
        Ok(Self(id))
    }
}

impl TryFrom<String> for AccountId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_string()
    }
}
