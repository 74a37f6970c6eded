//! Error type returned by construction and queries.

/// Errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input sequence cannot be encoded as given.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An index outside `0..len` was queried.
    #[error("index out of range: the len is {len} but the index is {index}.")]
    OutOfRange {
        /// Queried index.
        index: usize,
        /// Number of stored elements.
        len: usize,
    },

    /// A bit primitive was called with an argument violating its contract.
    ///
    /// This indicates a broken internal invariant and is not expected from the public query surface.
    #[error("domain error: {0}")]
    Domain(String),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
