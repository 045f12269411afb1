//! Error handling for the rowrelay-tester crate.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for tester operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running scenarios.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A scenario argument could not be interpreted.
    #[error("invalid scenario argument: {0}")]
    Argument(String),
    /// The requested move did not verify.
    #[error("move was not verified by any strategy")]
    Unverified,
    /// A matrix pairing verified with an unexpected strategy.
    #[error("matrix mismatch: {0}")]
    MatrixMismatch(String),
}

impl Error {
    /// Helper to build an argument error from an arbitrary message.
    pub fn argument<M: Into<String>>(msg: M) -> Self {
        Self::Argument(msg.into())
    }
}
