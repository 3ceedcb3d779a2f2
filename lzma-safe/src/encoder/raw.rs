//! Headerless ("raw") encoder.
//!
//! Raw streams carry no container framing at all: no magic bytes, no
//! integrity check, no end marker besides what the filter chain itself
//! produces. The decoder must be configured with the identical chain.

use crate::encoder::options::{prepare_filters, FilterConfig, RawFilters};
use crate::stream::code_step;
use crate::{Action, Result, Stream};

/// Streaming encoder producing a bare filter-chain payload.
pub struct RawEncoder {
    stream: Option<Stream>,
    total_in: u64,
    total_out: u64,
    _filters: RawFilters,
}

impl RawEncoder {
    /// Create a raw encoder from a filter chain.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OptionsError`] when the chain is empty or
    /// not encodable.
    pub fn new(filters: &[FilterConfig]) -> Result<Self> {
        let prepared = prepare_filters(filters);
        let mut stream = Stream::default();
        crate::ffi::lzma_raw_encoder(&prepared, &mut stream)?;
        Ok(Self {
            stream: Some(stream),
            total_in: 0,
            total_out: 0,
            _filters: prepared,
        })
    }

    /// Process input through the encoder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ProgError`] when finishing an already
    /// finished stream.
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

    /// Total number of input bytes consumed.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Total number of output bytes emitted.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }
}

impl Drop for RawEncoder {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.finish();
        }
    }
}

// SAFETY: like `Encoder`, this type owns an independent lzma_stream.
unsafe impl Send for RawEncoder {}
