//! High-level decoders built on top of `liblzma`.

use crate::encoder::options::{prepare_filters, FilterConfig, RawFilters};
use crate::stream::code_step;
use crate::{Action, Result, Stream};

pub mod options;

pub use options::{Flags, Options};

/// Safe wrapper around an `lzma_stream` configured for decompression.
///
/// A decoder reports stream end through [`Decoder::is_finished`] rather
/// than an error; once finished, the stream has already been released and
/// further `Run` steps report no progress.
pub struct Decoder {
    /// Underlying LZMA stream. `None` once the stream has been finished.
    stream: Option<Stream>,
    /// Memory limit the decoder was built with.
    memlimit: u64,
    /// Total number of bytes read from input so far.
    total_in: u64,
    /// Total number of bytes written to output so far.
    total_out: u64,
    /// Keeps filter option buffers alive for raw decoding.
    _filters: Option<RawFilters>,
}

impl Decoder {
    fn from_stream(stream: Stream, memlimit: u64, filters: Option<RawFilters>) -> Self {
        Decoder {
            stream: Some(stream),
            memlimit,
            total_in: 0,
            total_out: 0,
            _filters: filters,
        }
    }

    /// Create an `.xz` stream decoder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MemError`] when allocation fails and
    /// [`crate::Error::OptionsError`] for invalid flags.
    pub fn new(memlimit: u64, flags: Flags) -> Result<Self> {
        let mut stream = Stream::default();
        crate::ffi::lzma_stream_decoder(memlimit, flags, &mut stream)?;
        Ok(Self::from_stream(stream, memlimit, None))
    }

    /// Create a decoder that auto-detects `.xz` versus legacy `.lzma`
    /// input.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Decoder::new`].
    pub fn new_auto(memlimit: u64, flags: Flags) -> Result<Self> {
        let mut stream = Stream::default();
        crate::ffi::lzma_auto_decoder(memlimit, flags, &mut stream)?;
        Ok(Self::from_stream(stream, memlimit, None))
    }

    /// Create a multi-threaded `.xz` decoder.
    ///
    /// Worker threads pick up blocks as their boundaries are discovered in
    /// the input; streams produced by a single-threaded encoder decode fine
    /// but gain nothing, as they contain a single block.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Decoder::new`].
    pub fn new_mt(options: Options) -> Result<Self> {
        let mut stream = Stream::default();
        crate::ffi::lzma_stream_decoder_mt(&options, &mut stream)?;
        Ok(Self::from_stream(stream, options.memlimit_stop, None))
    }

    /// Create a decoder for the legacy `.lzma` container.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Decoder::new`].
    pub fn new_alone(memlimit: u64) -> Result<Self> {
        let mut stream = Stream::default();
        crate::ffi::lzma_alone_decoder(memlimit, &mut stream)?;
        Ok(Self::from_stream(stream, memlimit, None))
    }

    /// Create a headerless decoder for the given filter chain.
    ///
    /// The chain must match the one the raw payload was encoded with.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OptionsError`] when the chain is empty or
    /// not decodable.
    pub fn new_raw(filters: &[FilterConfig]) -> Result<Self> {
        let prepared = prepare_filters(filters);
        let mut stream = Stream::default();
        crate::ffi::lzma_raw_decoder(&prepared, &mut stream)?;
        Ok(Self::from_stream(stream, u64::MAX, Some(prepared)))
    }

    /// Decompress input, writing into `output`.
    ///
    /// Returns `(bytes_read, bytes_written)`. Stream end is reported via
    /// [`Decoder::is_finished`], not as an error; input bytes past the end
    /// of the stream are left unconsumed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DataError`] for corrupt input,
    /// [`crate::Error::FormatError`] when the header is not recognised and
    /// [`crate::Error::MemLimitError`] when the memory limit is hit.
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

    /// Whether the underlying stream has reached its end.
    pub fn is_finished(&self) -> bool {
        self.stream.is_none()
    }

    /// Memory limit passed to the decoder.
    pub fn memlimit(&self) -> u64 {
        self.memlimit
    }

    /// Total number of bytes consumed from the input side.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Total number of bytes produced by the decoder.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }
}

impl Drop for Decoder {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.finish();
        }
    }
}

// SAFETY: the decoder owns its lzma_stream exclusively, so moving it to
// another thread is fine. Concurrent access is not, hence no Sync.
unsafe impl Send for Decoder {}
