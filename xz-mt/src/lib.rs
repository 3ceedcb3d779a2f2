//! # xz-mt
//!
//! Multi-threaded XZ compression and decompression with a streaming API.
//!
//! This crate is a drop-in style wrapper over liblzma that adds opt-in
//! multi-threading to both directions while keeping the output bit-exactly
//! interoperable with single-threaded XZ tooling: the multi-threaded
//! encoder splits the stream into independently decodable blocks, and any
//! conforming decoder, threaded or not, accepts the result.
//!
//! ## One-shot usage
//!
//! ```rust
//! use xz_mt::{compress, decompress, CompressOptions, DecompressOptions};
//!
//! # fn main() -> xz_mt::Result<()> {
//! let data = b"The quick brown fox jumps over the lazy dog";
//! let packed = compress(data, &CompressOptions::default())?;
//! let unpacked = decompress(&packed, &DecompressOptions::default())?;
//! assert_eq!(unpacked, data);
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming with bounded output
//!
//! ```rust
//! use xz_mt::{compress, CompressOptions, Decompressor};
//!
//! # fn main() -> xz_mt::Result<()> {
//! let packed = compress(b"streamed payload", &CompressOptions::default())?;
//!
//! let mut decompressor = Decompressor::with_defaults()?;
//! let mut unpacked = Vec::new();
//! for chunk in packed.chunks(7) {
//!     unpacked.extend(decompressor.decompress(chunk, None)?);
//! }
//! assert!(decompressor.eof());
//! assert_eq!(unpacked, b"streamed payload");
//! # Ok(())
//! # }
//! ```
//!
//! ## Threads
//!
//! ```rust
//! use xz_mt::{compress, CompressOptions, Threading};
//!
//! # fn main() -> xz_mt::Result<()> {
//! let options = CompressOptions::default().with_threads(Threading::Auto);
//! let packed = compress(&vec![0u8; 1 << 20], &options)?;
//! # let _ = packed;
//! # Ok(())
//! # }
//! ```
//!
//! Decoding defaults to a single thread. Requesting threads routes through
//! the native multi-threaded decoder only when the linked liblzma is not
//! affected by its known use-after-free (see [`is_mt_decoder_safe`]);
//! affected versions silently decode single-threaded instead.

mod buffer;
mod compressor;
mod decompressor;
mod error;
mod safety;
mod threading;

pub mod options;

pub use compressor::Compressor;
pub use decompressor::{decompress, Decompressor};
pub use error::{BackendError, Error, Result};
pub use options::{
    Check, CompressOptions, DecodeFormat, DecompressOptions, FilterConfig, FilterType, Format,
    Preset,
};
pub use safety::{is_mt_decoder_safe, native_version};
pub use threading::Threading;

/// One-shot compression of a complete in-memory payload.
///
/// Equivalent to feeding everything to a [`Compressor`] and flushing.
///
/// # Errors
///
/// Returns [`Error::InvalidOption`] for inconsistent settings and
/// [`Error::Backend`] on codec failures.
pub fn compress(data: &[u8], options: &CompressOptions) -> Result<Vec<u8>> {
    let mut compressor = Compressor::new(options)?;
    let mut output = compressor.compress(data)?;
    output.extend(compressor.flush()?);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8], compress_options: &CompressOptions, decompress_options: &DecompressOptions) {
        let packed = compress(data, compress_options).unwrap();
        let unpacked = decompress(&packed, decompress_options).unwrap();
        assert_eq!(unpacked, data);
    }

    fn sample() -> Vec<u8> {
        b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. "
            .iter()
            .copied()
            .cycle()
            .take(20_000)
            .collect()
    }

    /// Round-trip across every preset level.
    #[test]
    fn roundtrip_all_presets() {
        let data = sample();
        for level in 0..=9 {
            let options = CompressOptions::default().with_preset(Preset::new(level));
            roundtrip(&data, &options, &DecompressOptions::default());
        }
    }

    /// The extreme flag changes cost, not correctness.
    #[test]
    fn roundtrip_extreme_preset() {
        let options = CompressOptions::default().with_preset(Preset::new(3).extreme());
        roundtrip(&sample(), &options, &DecompressOptions::default());
    }

    /// Round-trip across every integrity check.
    #[test]
    fn roundtrip_all_checks() {
        let data = sample();
        for check in [Check::None, Check::Crc32, Check::Crc64, Check::Sha256] {
            let options = CompressOptions::default().with_check(check);
            roundtrip(&data, &options, &DecompressOptions::default());
        }
    }

    /// Round-trip across thread counts on both sides, including
    /// auto-detection.
    #[test]
    fn roundtrip_thread_counts() {
        let data = sample();
        for threads in [0, 1, 2, 4, 8] {
            let compress_options = CompressOptions::default()
                .with_preset(Preset::new(1))
                .with_threads(Threading::Exact(threads));
            let decompress_options =
                DecompressOptions::default().with_threads(Threading::Exact(threads));
            roundtrip(&data, &compress_options, &decompress_options);
        }
    }

    /// Threaded and single-threaded encoders accept each other's output.
    #[test]
    fn st_and_mt_outputs_cross_decode() {
        let data = sample();

        let st = compress(&data, &CompressOptions::default()).unwrap();
        let mt = compress(
            &data,
            &CompressOptions::default()
                .with_preset(Preset::new(1))
                .with_threads(Threading::Exact(4))
                .with_block_size(std::num::NonZeroU64::new(4096)),
        )
        .unwrap();

        let mt_reader = DecompressOptions::default().with_threads(Threading::Exact(4));
        assert_eq!(decompress(&st, &mt_reader).unwrap(), data);
        assert_eq!(decompress(&mt, &DecompressOptions::default()).unwrap(), data);
    }

    /// The legacy container round-trips through the facade.
    #[test]
    fn roundtrip_alone_container() {
        let options = CompressOptions::default()
            .with_format(Format::Alone)
            .with_check(Check::None);
        let readers = [DecodeFormat::Auto, DecodeFormat::Alone];
        for reader in readers {
            roundtrip(
                &sample(),
                &options,
                &DecompressOptions::default().with_format(reader),
            );
        }
    }

    /// Raw payloads round-trip when both sides share the chain.
    #[test]
    fn roundtrip_raw_container() {
        let chain = vec![FilterConfig::new(FilterType::Lzma2)];
        let options = CompressOptions::default()
            .with_format(Format::Raw)
            .with_check(Check::None)
            .with_filters(chain.clone());
        let reader = DecompressOptions::default()
            .with_format(DecodeFormat::Raw)
            .with_filters(chain);
        roundtrip(&sample(), &options, &reader);
    }

    /// Compressing empty input produces a decodable header and footer.
    #[test]
    fn empty_input_round_trips() {
        let packed = compress(b"", &CompressOptions::default()).unwrap();
        assert!(!packed.is_empty());
        assert_eq!(decompress(&packed, &DecompressOptions::default()).unwrap(), b"");
    }

    /// The xz magic bytes lead every stream this crate writes.
    #[test]
    fn output_carries_xz_magic() {
        let packed = compress(b"magic", &CompressOptions::default()).unwrap();
        assert_eq!(&packed[..6], &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00]);
    }

    /// The version gate reports a dotted version and a stable verdict.
    #[test]
    fn safety_gate_reports() {
        assert!(native_version().contains('.'));
        assert_eq!(is_mt_decoder_safe(), is_mt_decoder_safe());
    }

    /// Data larger than 4 GiB survives a single-call round trip.
    ///
    /// Needs roughly 10 GiB of memory; run explicitly with
    /// `cargo test -- --ignored`.
    #[test]
    #[ignore = "requires > 10 GiB of memory"]
    fn roundtrip_past_4gib_boundary() {
        let size = 4 * (1usize << 30) + 100;
        let data = vec![b'x'; size];

        let options = CompressOptions::default()
            .with_preset(Preset::new(0))
            .with_threads(Threading::Exact(0));
        let packed = compress(&data, &options).unwrap();
        drop(data);

        let unpacked = decompress(&packed, &DecompressOptions::default()).unwrap();
        assert_eq!(unpacked.len(), size);
        assert!(unpacked.iter().all(|&byte| byte == b'x'));
    }
}
