//! Error types for matrix construction and scanning.

use thiserror::Error;

/// The given character is not a valid symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid symbol: {0:?}")]
pub struct InvalidSymbol(pub char);

/// Invalid data was passed to initialize a matrix or a background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid data")]
pub struct InvalidData;

/// An error preventing a motif from being scanned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// A symbol has a nonzero motif probability but no background frequency.
    #[error("symbol {symbol:?} at motif position {position} has no background frequency")]
    UndefinedBackground { position: usize, symbol: char },

    /// No score threshold reaches the requested *p*-value.
    #[error(
        "motif is too similar to the background to be searched at p-value {pvalue} \
         (best attainable p-value is {min_pvalue})"
    )]
    IndistinguishableMotif { pvalue: f64, min_pvalue: f64 },

    /// The requested *p*-value is not in the open interval `(0, 1)`.
    #[error("invalid p-value: {0} (expected a value in (0, 1))")]
    InvalidPvalue(f64),

    /// The score granularity is not a strictly positive finite number.
    #[error("invalid granularity: {0}")]
    InvalidGranularity(f64),
}

impl ScanError {
    /// Create a new `UndefinedBackground` error.
    pub fn undefined_background(position: usize, symbol: impl Into<char>) -> Self {
        ScanError::UndefinedBackground {
            position,
            symbol: symbol.into(),
        }
    }
}
