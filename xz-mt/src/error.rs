//! Error types for XZ compression and decompression operations.

use thiserror::Error;

pub use lzma_safe::Error as BackendError;

/// Result alias using the crate-level [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes surfaced by the public API.
///
/// The split mirrors how callers recover: `InvalidOption` and
/// `InvalidState` are caller mistakes detectable without touching the
/// codec, `MemLimit` invites a retry with a higher limit, and `Backend`
/// carries the native status for everything the codec itself rejects.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reported by liblzma, carrying the native status.
    #[error("liblzma backend error: {0}")]
    Backend(BackendError),

    /// The decoder memory limit was reached.
    ///
    /// Kept apart from [`Error::Backend`] so callers can retry with a
    /// higher limit without string-matching.
    #[error("memory usage limit was reached during decoding")]
    MemLimit,

    /// The input ended before the stream's end-of-stream marker.
    #[error("compressed data ended before the end-of-stream marker was reached")]
    TruncatedInput,

    /// Invalid argument or argument combination supplied by the caller.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Operation not valid for the object's current lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        if err.is_memlimit() {
            Error::MemLimit
        } else {
            Error::Backend(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Memory-limit trips get their dedicated variant; everything else
    /// stays a backend error with the original status.
    #[test]
    fn backend_conversion_splits_memlimit() {
        assert!(matches!(Error::from(BackendError::MemLimitError), Error::MemLimit));
        assert!(matches!(
            Error::from(BackendError::DataError),
            Error::Backend(BackendError::DataError)
        ));
        assert!(matches!(
            Error::from(BackendError::FormatError),
            Error::Backend(BackendError::FormatError)
        ));
    }

    /// The backend variant keeps the raw status code reachable.
    #[test]
    fn backend_variant_preserves_raw_status() {
        if let Error::Backend(inner) = Error::from(BackendError::DataError) {
            assert_eq!(inner.to_raw(), BackendError::DataError.to_raw());
        } else {
            panic!("expected backend variant");
        }
    }
}
