//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by `parse`/`derive` constructors that validate
//! user- or network-supplied inputs.
//!
//! # Examples
//!
//! ```
//! use botdeck::domain::error::DomainError;
//! use botdeck::domain::request::PositiveAmount;
//!
//! let result = PositiveAmount::parse("starting_trade_amount", "-5");
//! assert!(matches!(result, Err(DomainError::NonPositive { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input could not be read as a number.
    #[error("{field} must be a number, got '{input}'")]
    NotANumber {
        /// The field being parsed.
        field: &'static str,
        /// The raw input.
        input: String,
    },

    /// Amount must be strictly positive.
    #[error("{field} must be a positive number, got '{input}'")]
    NonPositive {
        /// The field being parsed.
        field: &'static str,
        /// The rejected input.
        input: String,
    },

    /// Positive amount that a decimal cannot represent.
    #[error("{field} is outside the supported range, got '{input}'")]
    OutOfRange {
        /// The field being parsed.
        field: &'static str,
        /// The rejected input.
        input: String,
    },

    /// Interval is not part of the supported vocabulary.
    #[error("unknown interval '{0}'")]
    UnknownInterval(String),

    /// Trade window is not part of the supported vocabulary.
    #[error("unknown trade window '{0}'")]
    UnknownTradeWindow(String),

    /// Bot identifiers must be non-empty and free of whitespace.
    #[error("invalid bot key '{0}'")]
    InvalidBotKey(String),

    /// Trading symbols must be non-empty ASCII alphanumerics.
    #[error("invalid symbol '{0}'")]
    InvalidSymbol(String),

    /// A value cannot be used as part of a storage identifier.
    #[error("{field} '{value}' is not allowed in a table name")]
    InvalidIdentifier {
        /// Which component of the identifier was rejected.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}
