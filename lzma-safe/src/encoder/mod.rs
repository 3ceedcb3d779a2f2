//! High-level encoders built on top of `liblzma`.

use crate::stream::code_step;
use crate::{Action, Result, Stream};

mod alone;
mod raw;

pub mod options;

pub use alone::AloneEncoder;
pub use options::Options;
pub use raw::RawEncoder;

/// Safe wrapper around an `lzma_stream` configured for `.xz` compression.
pub struct Encoder {
    /// Underlying LZMA stream. `None` once the stream has been finished.
    stream: Option<Stream>,
    /// Number of worker threads the encoder was built with.
    threads: u32,
    /// Total number of bytes read from input so far.
    total_in: u64,
    /// Total number of bytes written to output so far.
    total_out: u64,
    /// Keeps filter option buffers alive for the encoder's lifetime.
    _filters: Option<options::RawFilters>,
}

impl Encoder {
    /// Create a single-threaded encoder from a compression preset.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OptionsError`] for presets liblzma rejects,
    /// [`crate::Error::MemError`] when allocation fails and
    /// [`crate::Error::UnsupportedCheck`] when the check type is not
    /// compiled into the linked library.
    pub fn new_easy(preset: options::Preset, check: options::Check) -> Result<Self> {
        let mut stream = Stream::default();
        crate::ffi::lzma_easy_encoder(preset, check, &mut stream)?;

        Ok(Encoder {
            stream: Some(stream),
            threads: 1,
            total_in: 0,
            total_out: 0,
            _filters: None,
        })
    }

    /// Create a single-threaded encoder from an explicit filter chain.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OptionsError`] when the chain is invalid.
    pub fn new_stream(filters: &[options::FilterConfig], check: options::Check) -> Result<Self> {
        let prepared = options::prepare_filters(filters);
        let mut stream = Stream::default();
        crate::ffi::lzma_stream_encoder(&prepared, check, &mut stream)?;

        Ok(Encoder {
            stream: Some(stream),
            threads: 1,
            total_in: 0,
            total_out: 0,
            _filters: Some(prepared),
        })
    }

    /// Create a multi-threaded encoder.
    ///
    /// Every worker compresses an independent block, so the output stream
    /// contains one block per `block_size` chunk of input and remains
    /// decodable by any single-threaded XZ decoder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OptionsError`] when liblzma rejects the
    /// configuration and [`crate::Error::MemError`] when worker allocation
    /// fails.
    pub fn new_mt(options: Options) -> Result<Self> {
        let mut stream = Stream::default();
        let filters = crate::ffi::lzma_stream_encoder_mt(&options, &mut stream)?;

        Ok(Encoder {
            stream: Some(stream),
            threads: options.threads,
            total_in: 0,
            total_out: 0,
            _filters: filters,
        })
    }

    /// Process input through the encoder, producing compressed output.
    ///
    /// Returns `(bytes_read, bytes_written)`. With [`Action::Finish`] the
    /// stream ends once everything is flushed; from then on
    /// [`Encoder::is_finished`] reports `true`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BufError`] when no progress is possible and
    /// [`crate::Error::ProgError`] when finishing an already finished
    /// stream.
    pub fn process(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        action: Action,
    ) -> Result<(usize, usize)> {
        let (read, written) = code_step(&mut self.stream, input, output, action)?;
        self.total_in += read as u64;
        self.total_out += written as u64;
        Ok((read, written))
    }

    /// Whether the underlying stream has been closed.
    pub fn is_finished(&self) -> bool {
        self.stream.is_none()
    }

    /// Number of worker threads configured for compression.
    pub fn threads(&self) -> u32 {
        self.threads
    }

    /// Total number of input bytes consumed.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Total number of output bytes emitted.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }
}

impl Drop for Encoder {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.finish();
        }
    }
}

// SAFETY: the encoder owns its lzma_stream exclusively, so moving it to
// another thread is fine. Concurrent access is not, hence no Sync.
unsafe impl Send for Encoder {}
