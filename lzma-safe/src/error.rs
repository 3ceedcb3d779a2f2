//! Error types used by the safe liblzma wrapper.

use std::fmt;

/// Type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Error values returned by encoder/decoder operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Stream reached `LZMA_STREAM_END`; treated as success by callers.
    StreamEnd,

    /// Memory allocation failed (`LZMA_MEM_ERROR`).
    MemError,

    /// Configured memory limit was exceeded (`LZMA_MEMLIMIT_ERROR`).
    MemLimitError,

    /// Input bytes are not recognised (`LZMA_FORMAT_ERROR`).
    FormatError,

    /// Invalid encoder/decoder options (`LZMA_OPTIONS_ERROR`).
    OptionsError,

    /// Corrupted input (`LZMA_DATA_ERROR`).
    DataError,

    /// Not enough output space to make progress (`LZMA_BUF_ERROR`).
    BufError,

    /// Misuse of the liblzma API (`LZMA_PROG_ERROR`).
    ProgError,

    /// Integrity check type is not supported (`LZMA_UNSUPPORTED_CHECK`).
    UnsupportedCheck,

    /// Fallback for error codes not known to this wrapper.
    Unknown(liblzma_sys::lzma_ret),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StreamEnd => write!(f, "end of stream reached"),
            Error::MemError => write!(f, "memory allocation failed"),
            Error::MemLimitError => write!(f, "memory usage limit was reached"),
            Error::FormatError => write!(f, "file format not recognized"),
            Error::OptionsError => write!(f, "invalid or unsupported options"),
            Error::DataError => write!(f, "data is corrupt"),
            Error::BufError => write!(f, "no progress is possible"),
            Error::ProgError => write!(f, "programming error"),
            Error::UnsupportedCheck => write!(f, "integrity check type is not supported"),
            Error::Unknown(code) => write!(f, "unknown liblzma status code {code}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<liblzma_sys::lzma_ret> for Error {
    fn from(ret: liblzma_sys::lzma_ret) -> Error {
        match ret {
            liblzma_sys::lzma_ret_LZMA_OK => unreachable!("LZMA_OK is treated as success"),
            liblzma_sys::lzma_ret_LZMA_STREAM_END => Error::StreamEnd,
            liblzma_sys::lzma_ret_LZMA_MEM_ERROR => Error::MemError,
            liblzma_sys::lzma_ret_LZMA_MEMLIMIT_ERROR => Error::MemLimitError,
            liblzma_sys::lzma_ret_LZMA_FORMAT_ERROR => Error::FormatError,
            liblzma_sys::lzma_ret_LZMA_OPTIONS_ERROR => Error::OptionsError,
            liblzma_sys::lzma_ret_LZMA_DATA_ERROR => Error::DataError,
            liblzma_sys::lzma_ret_LZMA_BUF_ERROR => Error::BufError,
            liblzma_sys::lzma_ret_LZMA_PROG_ERROR => Error::ProgError,
            liblzma_sys::lzma_ret_LZMA_UNSUPPORTED_CHECK => Error::UnsupportedCheck,
            other => Error::Unknown(other),
        }
    }
}

impl Error {
    /// The raw `lzma_ret` code behind this variant.
    pub fn to_raw(self) -> liblzma_sys::lzma_ret {
        match self {
            Error::StreamEnd => liblzma_sys::lzma_ret_LZMA_STREAM_END,
            Error::MemError => liblzma_sys::lzma_ret_LZMA_MEM_ERROR,
            Error::MemLimitError => liblzma_sys::lzma_ret_LZMA_MEMLIMIT_ERROR,
            Error::FormatError => liblzma_sys::lzma_ret_LZMA_FORMAT_ERROR,
            Error::OptionsError => liblzma_sys::lzma_ret_LZMA_OPTIONS_ERROR,
            Error::DataError => liblzma_sys::lzma_ret_LZMA_DATA_ERROR,
            Error::BufError => liblzma_sys::lzma_ret_LZMA_BUF_ERROR,
            Error::ProgError => liblzma_sys::lzma_ret_LZMA_PROG_ERROR,
            Error::UnsupportedCheck => liblzma_sys::lzma_ret_LZMA_UNSUPPORTED_CHECK,
            Error::Unknown(code) => code,
        }
    }

    /// Whether this error was caused by the decoder memory limit.
    pub fn is_memlimit(self) -> bool {
        matches!(self, Error::MemLimitError)
    }
}

/// Translate a `liblzma` status code into a `Result`.
pub(crate) fn result_from_lzma_ret<T>(ret: liblzma_sys::lzma_ret, value: T) -> Result<T> {
    if ret == liblzma_sys::lzma_ret_LZMA_OK {
        Ok(value)
    } else {
        Err(ret.into())
    }
}
