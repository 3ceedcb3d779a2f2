//! Integrity check algorithms supported by liblzma.

use crate::Error;

/// Enum mirroring `lzma_check` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Check {
    /// Do not embed a check value.
    None,

    /// CRC32 checksum.
    Crc32,

    /// CRC64 checksum (the `xz` tool default).
    #[default]
    Crc64,

    /// SHA-256 hash.
    Sha256,
}

impl Check {
    /// Number of bytes the check value occupies in a block footer.
    pub fn size(self) -> usize {
        match self {
            Check::None => 0,
            Check::Crc32 => 4,
            Check::Crc64 => 8,
            Check::Sha256 => 32,
        }
    }
}

impl From<Check> for liblzma_sys::lzma_check {
    fn from(check: Check) -> Self {
        match check {
            Check::None => liblzma_sys::lzma_check_LZMA_CHECK_NONE,
            Check::Crc32 => liblzma_sys::lzma_check_LZMA_CHECK_CRC32,
            Check::Crc64 => liblzma_sys::lzma_check_LZMA_CHECK_CRC64,
            Check::Sha256 => liblzma_sys::lzma_check_LZMA_CHECK_SHA256,
        }
    }
}

impl TryFrom<liblzma_sys::lzma_check> for Check {
    type Error = Error;

    fn try_from(check: liblzma_sys::lzma_check) -> std::result::Result<Self, Self::Error> {
        match check {
            liblzma_sys::lzma_check_LZMA_CHECK_NONE => Ok(Check::None),
            liblzma_sys::lzma_check_LZMA_CHECK_CRC32 => Ok(Check::Crc32),
            liblzma_sys::lzma_check_LZMA_CHECK_CRC64 => Ok(Check::Crc64),
            liblzma_sys::lzma_check_LZMA_CHECK_SHA256 => Ok(Check::Sha256),
            _ => Err(Error::UnsupportedCheck),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Check sizes match the XZ stream format.
    #[test]
    fn sizes_match_xz_format() {
        assert_eq!(Check::None.size(), 0);
        assert_eq!(Check::Crc32.size(), 4);
        assert_eq!(Check::Crc64.size(), 8);
        assert_eq!(Check::Sha256.size(), 32);
    }

    /// Raw conversions round-trip; unknown IDs are rejected.
    #[test]
    fn raw_conversion_round_trips() {
        for check in [Check::None, Check::Crc32, Check::Crc64, Check::Sha256] {
            let raw: liblzma_sys::lzma_check = check.into();
            assert_eq!(Check::try_from(raw).unwrap(), check);
        }
        assert!(Check::try_from(42).is_err());
    }
}
