//! Error types

use thiserror::Error;

/// Everything that can go wrong while setting up the filter or handing a
/// frame over to it.
///
/// Filtering itself never fails; all of these are detected before any
/// sample is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("only constant format 8-16 bit integer and 32 bit float input supported")]
    InvalidFormat,

    #[error("quant must be between 0 and {max} (inclusive), got {0}", max = crate::tables::QUANT_MAX)]
    QuantOutOfRange(i32),

    #[error("plane index {0} out of range")]
    PlaneIndexOutOfRange(i32),

    #[error("plane {0} specified twice")]
    DuplicatePlane(i32),

    #[error("expected {expected} planes, got {actual}")]
    PlaneCountMismatch { expected: usize, actual: usize },

    /// The plane buffer violates the padding, stride or alignment contract.
    #[error("invalid plane layout: {0}")]
    InvalidPlaneLayout(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
