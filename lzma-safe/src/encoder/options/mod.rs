//! Encoder configuration shared by the safe wrappers.

mod check;
mod filter;
mod lzma1;
mod preset;

pub use check::Check;
pub use filter::{BcjOptions, DeltaOptions, FilterConfig, FilterOptions, FilterType, LzmaOptions};
pub use lzma1::Lzma1Options;
pub use preset::Preset;

pub(crate) use filter::{prepare_filters, RawFilters};

/// Options forwarded to `lzma_stream_encoder_mt`.
#[derive(Debug)]
pub struct Options {
    /// Compression preset.
    pub preset: Preset,

    /// Integrity check to embed in the output stream.
    pub check: Check,

    /// Number of worker threads (minimum 1).
    pub threads: u32,

    /// Maximum size of a block in bytes; `0` lets liblzma pick one from
    /// the preset.
    pub block_size: u64,

    /// Timeout in milliseconds for internal worker coordination; `0`
    /// disables it.
    pub timeout: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            preset: Preset::DEFAULT,
            check: Check::Crc64,
            threads: 1,
            block_size: 0,
            timeout: 0,
        }
    }
}

impl Options {
    /// Set the compression preset.
    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Set the integrity check.
    #[must_use]
    pub fn with_check(mut self, check: Check) -> Self {
        self.check = check;
        self
    }

    /// Set the number of worker threads.
    #[must_use]
    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    /// Set the block size in bytes.
    #[must_use]
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the timeout in milliseconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout: u32) -> Self {
        self.timeout = timeout;
        self
    }

    /// Convert to the raw `lzma_mt` structure.
    ///
    /// The second tuple element exists so callers can keep filter chains
    /// alive across the FFI call; the multi-threaded encoder here always
    /// codes from the preset, so it is always `None`.
    pub(crate) fn to_lzma_options(&self) -> (liblzma_sys::lzma_mt, Option<RawFilters>) {
        // SAFETY: lzma_mt is a POD struct; zeroed then filled with the
        // required fields, leaving reserved members at zero.
        let mut options = unsafe { std::mem::zeroed::<liblzma_sys::lzma_mt>() };

        options.threads = self.threads;
        options.block_size = self.block_size;
        options.timeout = self.timeout;
        options.preset = self.preset.to_raw();
        options.check = self.check.into();

        (options, None)
    }
}
