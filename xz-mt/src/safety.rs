//! Runtime gate for the multi-threaded decoder.
//!
//! liblzma releases 5.3.3alpha through 5.8.0 carry a use-after-free in
//! `lzma_stream_decoder_mt` (CVE-2025-31115). Rather than refusing to run
//! on affected systems, decompression silently falls back to the
//! single-threaded decoder there; rejecting would break otherwise-correct
//! programs on older distributions for an opt-in performance feature.

use std::sync::OnceLock;

use lzma_safe::version;

/// First release carrying the vulnerable threaded decoder.
const MT_DECODER_UNSAFE_FROM: (u32, u32, u32) = (5, 3, 3);

/// Last release affected; 5.8.1 ships the fix.
const MT_DECODER_UNSAFE_UNTIL: (u32, u32, u32) = (5, 8, 0);

/// Version of the linked liblzma, formatted `MAJOR.MINOR.PATCH`.
///
/// Built from the numeric version symbol, so pre-release stability
/// suffixes and git build metadata never leak into the result.
pub fn native_version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();

    VERSION.get_or_init(|| {
        let (major, minor, patch) = version::decode(version::number());
        format!("{major}.{minor}.{patch}")
    })
}

/// Whether the linked liblzma's multi-threaded decoder is safe to use.
///
/// Evaluated once per process; the verdict cannot change while the same
/// library stays loaded.
pub fn is_mt_decoder_safe() -> bool {
    static VERDICT: OnceLock<bool> = OnceLock::new();

    *VERDICT.get_or_init(|| {
        let safe = mt_decoder_safe_for(version::decode(version::number()));
        tracing::debug!(
            version = native_version(),
            mt_decoder_safe = safe,
            "probed linked liblzma"
        );
        safe
    })
}

/// The verdict is true for every version outside the closed unsafe range.
fn mt_decoder_safe_for(triplet: (u32, u32, u32)) -> bool {
    triplet < MT_DECODER_UNSAFE_FROM || triplet > MT_DECODER_UNSAFE_UNTIL
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The affected range is rejected, its neighbours are not.
    #[test]
    fn unsafe_range_boundaries() {
        assert!(mt_decoder_safe_for((5, 3, 2)));
        assert!(!mt_decoder_safe_for((5, 3, 3)));
        assert!(!mt_decoder_safe_for((5, 4, 0)));
        assert!(!mt_decoder_safe_for((5, 6, 2)));
        assert!(!mt_decoder_safe_for((5, 8, 0)));
        assert!(mt_decoder_safe_for((5, 8, 1)));
        assert!(mt_decoder_safe_for((6, 0, 0)));
    }

    /// The cached verdict matches a fresh evaluation of the linked version.
    #[test]
    fn cached_verdict_is_consistent() {
        let direct = mt_decoder_safe_for(version::decode(version::number()));
        assert_eq!(is_mt_decoder_safe(), direct);
        // Second call must hit the cache and agree.
        assert_eq!(is_mt_decoder_safe(), direct);
    }

    /// The reported version is exactly three numeric dot-segments, with no
    /// stability suffix or build metadata.
    #[test]
    fn native_version_is_numeric_triplet() {
        let reported = native_version();
        let segments: Vec<&str> = reported.split('.').collect();
        assert_eq!(segments.len(), 3, "unexpected format: {reported}");
        for segment in segments {
            segment
                .parse::<u32>()
                .unwrap_or_else(|_| panic!("non-numeric segment in {reported}"));
        }
    }
}
