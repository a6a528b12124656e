//! Error taxonomy for pool operations.
//!
//! Every failure is synchronous and final: the call that produced it made no
//! state change. Messages are surfaced verbatim to operators.

use std::fmt;

/// Result type for pool operations.
pub type TreasuryResult<T> = Result<T, TreasuryError>;

/// Which bound a proposal duration violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBound {
    TooLong,
    TooShort,
}

impl fmt::Display for DurationBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong => write!(f, "Duration cannot be more than 30 days"),
            Self::TooShort => write!(f, "Duration cannot be less than 1 day"),
        }
    }
}

/// Pool operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreasuryError {
    #[error("Value must be greater than 0")]
    InvalidAmount,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("{0}")]
    DurationOutOfRange(DurationBound),

    #[error("Withdrawal not found: {0}")]
    NotFound(u64),

    #[error("Invalid vote: {0}")]
    InvalidInput(String),

    #[error("Voting period has expired")]
    VotingClosed,

    #[error("Insufficient tokens")]
    InsufficientTokens,

    #[error("Voting period has not yet expired")]
    VotingNotExpired,

    #[error("Withdrawal has not been approved")]
    NotApproved,

    #[error("Only the owner can execute the withdrawal")]
    Unauthorized,

    #[error("Withdrawal has already been executed")]
    AlreadyExecuted,
}

/// Stable, payload-free discriminant of [`TreasuryError`].
///
/// Drivers that translate failures into their own transport (exit codes,
/// status codes) branch on this instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidAmount,
    InsufficientFunds,
    DurationOutOfRange,
    NotFound,
    InvalidInput,
    VotingClosed,
    InsufficientTokens,
    VotingNotExpired,
    NotApproved,
    Unauthorized,
    AlreadyExecuted,
}

impl ErrorKind {
    /// Name used in logs and machine-readable output.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::InvalidAmount => "InvalidAmount",
            ErrorKind::InsufficientFunds => "InsufficientFunds",
            ErrorKind::DurationOutOfRange => "DurationOutOfRange",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::VotingClosed => "VotingClosed",
            ErrorKind::InsufficientTokens => "InsufficientTokens",
            ErrorKind::VotingNotExpired => "VotingNotExpired",
            ErrorKind::NotApproved => "NotApproved",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::AlreadyExecuted => "AlreadyExecuted",
        }
    }
}

impl TreasuryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount => ErrorKind::InvalidAmount,
            Self::InsufficientFunds => ErrorKind::InsufficientFunds,
            Self::DurationOutOfRange(_) => ErrorKind::DurationOutOfRange,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::VotingClosed => ErrorKind::VotingClosed,
            Self::InsufficientTokens => ErrorKind::InsufficientTokens,
            Self::VotingNotExpired => ErrorKind::VotingNotExpired,
            Self::NotApproved => ErrorKind::NotApproved,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::AlreadyExecuted => ErrorKind::AlreadyExecuted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_messages_differ_but_share_kind() {
        let long = TreasuryError::DurationOutOfRange(DurationBound::TooLong);
        let short = TreasuryError::DurationOutOfRange(DurationBound::TooShort);

        assert_eq!(long.to_string(), "Duration cannot be more than 30 days");
        assert_eq!(short.to_string(), "Duration cannot be less than 1 day");
        assert_eq!(long.kind(), short.kind());
        assert_eq!(long.kind(), ErrorKind::DurationOutOfRange);
    }

    #[test]
    fn test_operator_facing_messages() {
        assert_eq!(
            TreasuryError::InvalidAmount.to_string(),
            "Value must be greater than 0"
        );
        assert_eq!(
            TreasuryError::InsufficientFunds.to_string(),
            "Insufficient funds"
        );
        assert_eq!(
            TreasuryError::VotingClosed.to_string(),
            "Voting period has expired"
        );
        assert_eq!(
            TreasuryError::VotingNotExpired.to_string(),
            "Voting period has not yet expired"
        );
        assert_eq!(
            TreasuryError::Unauthorized.to_string(),
            "Only the owner can execute the withdrawal"
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TreasuryError::NotFound(7).kind().name(), "NotFound");
        assert_eq!(
            TreasuryError::InvalidInput("maybe".to_string()).kind().name(),
            "InvalidInput"
        );
    }
}
