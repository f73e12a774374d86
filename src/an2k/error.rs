//! Custom error types for the an2k-codec crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Only the legacy-binary grammar and the I/O collaborators can fail; the
/// tagged grammar is tolerant and degrades malformed regions to partial
/// structures instead of erroring.
#[derive(Debug, Error)]
pub enum An2kError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input ended before a structure could be read in full.
    #[error("Unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    /// A legacy-binary record declared a length outside the valid range
    /// (below the 8-byte minimum, or past the end of the input).
    #[error("Invalid binary record length: declared {declared} bytes with {remaining} remaining")]
    InvalidBinaryLength { declared: u32, remaining: usize },
}

/// A convenience `Result` type alias using the crate's [`An2kError`] type.
pub type Result<T> = std::result::Result<T, An2kError>;
