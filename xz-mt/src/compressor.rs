//! Streaming compressor.

use lzma_safe::Action;

use crate::buffer::OutputBuffer;
use crate::error::{Error, Result};
use crate::options::{BuiltEncoder, CompressOptions};

/// Incremental compressor accepting arbitrarily chunked input.
///
/// Chunks fed through [`Compressor::compress`] may come back compressed
/// immediately or be buffered inside the codec; the terminal
/// [`Compressor::flush`] emits whatever is still pending together with the
/// stream footer. Concatenating everything returned, in order, yields a
/// stream that decompresses to the concatenation of all input chunks.
///
/// The compressor owns a native codec handle and therefore implements
/// neither `Clone` nor any serialization trait.
pub struct Compressor {
    encoder: BuiltEncoder,
    flushed: bool,
}

impl Compressor {
    /// Build a compressor from the given options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] for inconsistent settings and
    /// [`Error::Backend`] when the codec rejects the configuration.
    pub fn new(options: &CompressOptions) -> Result<Self> {
        Ok(Self {
            encoder: options.build_encoder()?,
            flushed: false,
        })
    }

    /// A compressor with default options (xz container, preset 6, CRC64,
    /// single-threaded).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] when the codec rejects the configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&CompressOptions::default())
    }

    /// Compress a chunk, returning whatever output the codec produced.
    ///
    /// The returned bytes may be empty; the encoder is entitled to buffer
    /// input until a block fills up or the stream is flushed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] once the compressor has been
    /// flushed and [`Error::Backend`] on codec failures.
    pub fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if self.flushed {
            return Err(Error::InvalidState("compressor has already been flushed"));
        }

        let mut output = OutputBuffer::unbounded();
        let mut consumed = 0;
        while consumed < data.len() {
            let spare = output.spare();
            let (read, written) = self.encoder.process(&data[consumed..], spare, Action::Run)?;
            consumed += read;
            output.commit(written);
            if read == 0 && written == 0 {
                break;
            }
        }

        Ok(output.into_bytes())
    }

    /// Finish the stream, returning all remaining output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] when called twice and
    /// [`Error::Backend`] on codec failures.
    pub fn flush(&mut self) -> Result<Vec<u8>> {
        if self.flushed {
            return Err(Error::InvalidState("compressor has already been flushed"));
        }

        let mut output = OutputBuffer::unbounded();
        while !self.encoder.is_finished() {
            let spare = output.spare();
            let (_, written) = self.encoder.process(&[], spare, Action::Finish)?;
            output.commit(written);
        }

        self.flushed = true;
        Ok(output.into_bytes())
    }
}
