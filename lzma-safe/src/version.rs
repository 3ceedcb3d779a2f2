//! Runtime access to the linked liblzma version.
//!
//! liblzma encodes its version both as a display string and as a single
//! integer of the form `major * 10000000 + minor * 10000 + patch * 10 +
//! stability` (stability: 0 alpha, 1 beta, 2 stable). The numeric form is
//! what callers should compare against; the string is for diagnostics.

/// Version string reported by the linked library, e.g. `"5.8.1"`.
pub fn string() -> &'static str {
    crate::ffi::lzma_version_string()
}

/// Numeric version reported by the linked library.
pub fn number() -> u32 {
    crate::ffi::lzma_version_number()
}

/// Build the numeric form for a stable `major.minor.patch` release.
///
/// Useful for comparing [`number`] against known release boundaries.
pub const fn encode(major: u32, minor: u32, patch: u32) -> u32 {
    major * 10_000_000 + minor * 10_000 + patch * 10 + 2
}

/// Split a numeric version into `(major, minor, patch)`, dropping stability.
pub const fn decode(number: u32) -> (u32, u32, u32) {
    (
        number / 10_000_000,
        number / 10_000 % 1_000,
        number / 10 % 1_000,
    )
}
