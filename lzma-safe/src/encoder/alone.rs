//! Legacy `.lzma` (`LZMA_Alone`) encoder.
//!
//! The historical `.lzma` container supports only LZMA1 and stores no
//! integrity check. It exists for compatibility with old tooling.

use crate::encoder::options::Lzma1Options;
use crate::stream::code_step;
use crate::{Action, Result, Stream};

/// Streaming encoder for the legacy `.lzma` container format.
pub struct AloneEncoder {
    stream: Option<Stream>,
    options: Lzma1Options,
    total_in: u64,
    total_out: u64,
}

impl AloneEncoder {
    /// Create a `.lzma` encoder with the given LZMA1 options.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OptionsError`] if the options are invalid
    /// for the linked liblzma.
    pub fn new(options: Lzma1Options) -> Result<Self> {
        let mut stream = Stream::default();
        crate::ffi::lzma_alone_encoder(options.as_raw(), &mut stream)?;
        Ok(Self {
            stream: Some(stream),
            options,
            total_in: 0,
            total_out: 0,
        })
    }

    /// Process input through the encoder, producing `.lzma` output.
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

    /// The LZMA1 options used by this encoder.
    pub fn options(&self) -> &Lzma1Options {
        &self.options
    }
}

impl Drop for AloneEncoder {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.finish();
        }
    }
}

// SAFETY: like `Encoder`, this type owns an independent lzma_stream.
unsafe impl Send for AloneEncoder {}
