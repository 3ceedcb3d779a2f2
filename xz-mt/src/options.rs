//! Configuration builders for compression and decompression.

use std::num::NonZeroU64;
use std::time::Duration;

use lzma_safe::decoder::{self, Decoder, Flags};
use lzma_safe::encoder::{self, AloneEncoder, Encoder, RawEncoder};
use lzma_safe::Action;

pub use lzma_safe::encoder::options::{
    BcjOptions, Check, DeltaOptions, FilterConfig, FilterOptions, FilterType, LzmaOptions, Preset,
};

use crate::error::{Error, Result};
use crate::safety::is_mt_decoder_safe;
use crate::threading::{resolve_threads, Threading};

/// Container format produced by a compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// The `.xz` container: one or more independently decodable blocks,
    /// integrity checks, concatenation support. The only format the
    /// multi-threaded encoder can produce.
    #[default]
    Xz,

    /// The legacy `.lzma` (`LZMA_Alone`) container. LZMA1 only, no
    /// integrity check, single-threaded.
    Alone,

    /// A bare filter-chain payload with no container framing at all.
    /// Requires an explicit filter chain; the decoder must be configured
    /// with the identical chain.
    Raw,
}

/// Container format expected by a decompressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeFormat {
    /// Detect `.xz` versus legacy `.lzma` from the stream header.
    #[default]
    Auto,

    /// Accept only `.xz` input.
    Xz,

    /// Accept only legacy `.lzma` input.
    Alone,

    /// Accept a bare filter-chain payload (requires the encoding chain).
    Raw,
}

/// Configuration builder for compression.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    format: Format,
    check: Check,
    preset: Preset,
    filters: Vec<FilterConfig>,
    threads: Threading,
    block_size: Option<NonZeroU64>,
    timeout: Option<Duration>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            format: Format::Xz,
            check: Check::Crc64,
            preset: Preset::DEFAULT,
            filters: Vec::new(),
            threads: Threading::default(),
            block_size: None,
            timeout: None,
        }
    }
}

impl CompressOptions {
    /// Select the output container format.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Select the integrity check embedded in each `.xz` block.
    #[must_use]
    pub fn with_check(mut self, check: Check) -> Self {
        self.check = check;
        self
    }

    /// Select the compression preset.
    ///
    /// Levels outside 0–9 are passed through and rejected by the codec,
    /// surfacing as [`Error::Backend`] rather than a validation failure.
    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Supply an explicit filter chain.
    ///
    /// Required for [`Format::Raw`]; on the single-threaded `.xz` path a
    /// non-empty chain takes precedence over the preset. The
    /// multi-threaded encoder always codes from the preset and ignores
    /// the chain.
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<FilterConfig>) -> Self {
        self.filters = filters;
        self
    }

    /// Configure worker threads. Anything other than `Exact(1)` selects
    /// the multi-threaded encoder, which requires [`Format::Xz`].
    #[must_use]
    pub fn with_threads(mut self, threads: Threading) -> Self {
        self.threads = threads;
        self
    }

    /// Set the block size for multi-threaded compression. Each worker
    /// compresses one block; the default is derived from the preset.
    #[must_use]
    pub fn with_block_size(mut self, block_size: Option<NonZeroU64>) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set a coordination timeout for the multi-threaded encoder.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn build_encoder(&self) -> Result<BuiltEncoder> {
        match self.format {
            Format::Xz => self.build_xz_encoder(),
            Format::Alone => self.build_alone_encoder(),
            Format::Raw => self.build_raw_encoder(),
        }
    }

    fn build_xz_encoder(&self) -> Result<BuiltEncoder> {
        if !self.threads.is_multi_threaded() {
            let encoder = if self.filters.is_empty() {
                Encoder::new_easy(self.preset, self.check)?
            } else {
                Encoder::new_stream(&self.filters, self.check)?
            };
            return Ok(BuiltEncoder::Xz(encoder));
        }

        let mut options = encoder::Options::default()
            .with_preset(self.preset)
            .with_check(self.check)
            .with_threads(resolve_threads(self.threads));
        if let Some(block_size) = self.block_size {
            options = options.with_block_size(block_size.get());
        }
        if let Some(timeout) = self.timeout {
            options = options.with_timeout(duration_to_millis(timeout));
        }

        Ok(BuiltEncoder::Xz(Encoder::new_mt(options)?))
    }

    fn build_alone_encoder(&self) -> Result<BuiltEncoder> {
        if self.check != Check::None {
            return Err(Error::InvalidOption(
                "integrity checks are only supported by the xz container".into(),
            ));
        }
        if let Threading::Exact(requested) = self.threads {
            if requested > 1 {
                return Err(Error::InvalidOption(format!(
                    "multi-threaded encoding with {requested} workers requires the xz container",
                )));
            }
        }
        if !self.filters.is_empty() {
            return Err(Error::InvalidOption(
                "custom filter chains are not supported in the lzma container".into(),
            ));
        }

        let lzma1 = encoder::options::Lzma1Options::from_preset(self.preset)?;
        Ok(BuiltEncoder::Alone(AloneEncoder::new(lzma1)?))
    }

    fn build_raw_encoder(&self) -> Result<BuiltEncoder> {
        if self.check != Check::None {
            return Err(Error::InvalidOption(
                "integrity checks are only supported by the xz container".into(),
            ));
        }
        if let Threading::Exact(requested) = self.threads {
            if requested > 1 {
                return Err(Error::InvalidOption(format!(
                    "multi-threaded encoding with {requested} workers requires the xz container",
                )));
            }
        }
        if self.filters.is_empty() {
            return Err(Error::InvalidOption(
                "the raw format requires an explicit filter chain".into(),
            ));
        }

        Ok(BuiltEncoder::Raw(RawEncoder::new(&self.filters)?))
    }
}

/// Encoder built from [`CompressOptions`].
pub(crate) enum BuiltEncoder {
    Xz(Encoder),
    Alone(AloneEncoder),
    Raw(RawEncoder),
}

impl BuiltEncoder {
    pub(crate) fn process(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        action: Action,
    ) -> std::result::Result<(usize, usize), lzma_safe::Error> {
        match self {
            BuiltEncoder::Xz(encoder) => encoder.process(input, output, action),
            BuiltEncoder::Alone(encoder) => encoder.process(input, output, action),
            BuiltEncoder::Raw(encoder) => encoder.process(input, output, action),
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        match self {
            BuiltEncoder::Xz(encoder) => encoder.is_finished(),
            BuiltEncoder::Alone(encoder) => encoder.is_finished(),
            BuiltEncoder::Raw(encoder) => encoder.is_finished(),
        }
    }
}

/// Configuration builder for decompression.
#[derive(Debug, Clone)]
pub struct DecompressOptions {
    format: DecodeFormat,
    memlimit: u64,
    filters: Vec<FilterConfig>,
    threads: Threading,
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self {
            format: DecodeFormat::Auto,
            memlimit: u64::MAX,
            filters: Vec::new(),
            threads: Threading::default(),
        }
    }
}

impl DecompressOptions {
    /// Select the expected input format.
    #[must_use]
    pub fn with_format(mut self, format: DecodeFormat) -> Self {
        self.format = format;
        self
    }

    /// Cap decoder memory usage in bytes. Streams whose dictionary cannot
    /// be allocated within the cap fail with [`Error::MemLimit`].
    #[must_use]
    pub fn with_memlimit(mut self, memlimit: u64) -> Self {
        self.memlimit = memlimit;
        self
    }

    /// Supply the filter chain a [`DecodeFormat::Raw`] payload was encoded
    /// with.
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<FilterConfig>) -> Self {
        self.filters = filters;
        self
    }

    /// Configure worker threads. Anything other than `Exact(1)` requests
    /// the multi-threaded decoder, subject to the runtime safety gate.
    #[must_use]
    pub fn with_threads(mut self, threads: Threading) -> Self {
        self.threads = threads;
        self
    }

    pub(crate) fn build_decoder(&self) -> Result<Decoder> {
        match self.format {
            DecodeFormat::Auto | DecodeFormat::Xz => {
                if !self.filters.is_empty() {
                    return Err(Error::InvalidOption(
                        "filter chains are only used by the raw format".into(),
                    ));
                }
                self.build_stream_decoder()
            }
            DecodeFormat::Alone => {
                self.reject_threading()?;
                if !self.filters.is_empty() {
                    return Err(Error::InvalidOption(
                        "filter chains are only used by the raw format".into(),
                    ));
                }
                Decoder::new_alone(self.memlimit).map_err(Error::from)
            }
            DecodeFormat::Raw => {
                self.reject_threading()?;
                if self.filters.is_empty() {
                    return Err(Error::InvalidOption(
                        "the raw format requires the filter chain it was encoded with".into(),
                    ));
                }
                Decoder::new_raw(&self.filters).map_err(Error::from)
            }
        }
    }

    fn build_stream_decoder(&self) -> Result<Decoder> {
        if self.threads.is_multi_threaded() {
            if is_mt_decoder_safe() {
                let options = decoder::Options {
                    threads: resolve_threads(self.threads),
                    memlimit_threading: self.memlimit,
                    memlimit_stop: self.memlimit,
                    flags: Flags::empty(),
                    timeout: 0,
                };
                return Decoder::new_mt(options).map_err(Error::from);
            }

            // The only silent degradation in the crate; see the safety
            // module for the affected version range.
            tracing::warn!(
                version = crate::safety::native_version(),
                "liblzma threaded decoder is unsafe on this version; decoding single-threaded"
            );
        }

        match self.format {
            DecodeFormat::Xz => Decoder::new(self.memlimit, Flags::empty()).map_err(Error::from),
            _ => Decoder::new_auto(self.memlimit, Flags::empty()).map_err(Error::from),
        }
    }

    fn reject_threading(&self) -> Result<()> {
        if let Threading::Exact(requested) = self.threads {
            if requested > 1 {
                return Err(Error::InvalidOption(format!(
                    "multi-threaded decoding with {requested} workers requires the xz container",
                )));
            }
        }
        Ok(())
    }
}

fn duration_to_millis(duration: Duration) -> u32 {
    duration.as_millis().try_into().unwrap_or(u32::MAX)
}
