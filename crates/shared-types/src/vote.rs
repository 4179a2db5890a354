//! # Vote
//!
//! The two-valued result every check/deliver handler returns. Only the code
//! is load-bearing; the message is free-form diagnostic text.

use std::fmt;

/// Accept/reject decision for a single transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Vote {
    /// Accepted (code 0).
    Valid(String),
    /// Rejected (code 1).
    Invalid(String),
}

impl Vote {
    /// Response code for an accepted transaction.
    pub const CODE_VALID: u32 = 0;

    /// Response code for a rejected transaction.
    pub const CODE_INVALID: u32 = 1;

    pub fn valid(message: impl Into<String>) -> Self {
        Self::Valid(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Numeric response code handed back to the consensus engine.
    pub fn code(&self) -> u32 {
        match self {
            Self::Valid(_) => Self::CODE_VALID,
            Self::Invalid(_) => Self::CODE_INVALID,
        }
    }

    /// Diagnostic message.
    pub fn log(&self) -> &str {
        match self {
            Self::Valid(message) | Self::Invalid(message) => message,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(message) => write!(f, "valid: {message}"),
            Self::Invalid(message) => write!(f, "invalid: {message}"),
        }
    }
}
