//! Streaming decompressor.

use lzma_safe::{Action, Decoder};

use crate::buffer::{InputBuffer, OutputBuffer};
use crate::error::{BackendError, Error, Result};
use crate::options::DecompressOptions;

/// Incremental decompressor accepting arbitrarily chunked input.
///
/// Input that the codec has not consumed yet is buffered internally, so
/// callers can feed whatever chunk sizes they have, including empty ones,
/// and bound each call's output with `max_length`. Decoding stops at the
/// first stream's end; bytes fed past it are exposed through
/// [`Decompressor::unused_data`] so callers can implement their own policy
/// for concatenated payloads.
///
/// The decompressor owns a native codec handle and therefore implements
/// neither `Clone` nor any serialization trait.
pub struct Decompressor {
    decoder: Decoder,
    input: InputBuffer,
    eof: bool,
    needs_input: bool,
    unused_data: Vec<u8>,
    poisoned: bool,
}

impl Decompressor {
    /// Build a decompressor from the given options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] for inconsistent settings and
    /// [`Error::Backend`] when the codec rejects the configuration.
    pub fn new(options: &DecompressOptions) -> Result<Self> {
        Ok(Self {
            decoder: options.build_decoder()?,
            input: InputBuffer::new(),
            eof: false,
            needs_input: true,
            unused_data: Vec::new(),
            poisoned: false,
        })
    }

    /// A decompressor with default options (format auto-detection,
    /// unlimited memory, single-threaded).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] when the codec rejects the configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&DecompressOptions::default())
    }

    /// Decompress a chunk, returning at most `max_length` bytes.
    ///
    /// `None` means unbounded. `Some(0)` buffers the input without
    /// touching the codec and returns nothing. When the returned output
    /// hits the bound, unconsumed input stays buffered for the next call;
    /// feed an empty chunk to keep draining.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] after the end of the stream or
    /// after an earlier failure, [`Error::MemLimit`] when the memory limit
    /// is hit, and [`Error::Backend`] for any other codec failure. Codec
    /// failures are sticky: every later call fails with
    /// [`Error::InvalidState`].
    pub fn decompress(&mut self, data: &[u8], max_length: Option<usize>) -> Result<Vec<u8>> {
        if self.poisoned {
            return Err(Error::InvalidState(
                "decompressor failed earlier and can no longer be used",
            ));
        }
        if self.eof {
            return Err(Error::InvalidState("end of stream already reached"));
        }

        self.input.feed(data);

        if max_length == Some(0) {
            self.needs_input = self.input.is_empty();
            return Ok(Vec::new());
        }

        let mut output = OutputBuffer::new(max_length);
        while !output.is_full() {
            let spare = output.spare();
            let step = self.decoder.process(self.input.remaining(), spare, Action::Run);
            let (read, written) = match step {
                Ok(progress) => progress,
                // With nothing buffered, "no progress possible" just means
                // the codec wants input; it is not a failure.
                Err(BackendError::BufError) if self.input.is_empty() => break,
                Err(err) => {
                    self.poisoned = true;
                    self.needs_input = false;
                    return Err(err.into());
                }
            };

            self.input.consume(read);
            output.commit(written);

            if self.decoder.is_finished() {
                self.eof = true;
                self.unused_data = self.input.take_remaining();
                break;
            }
            if read == 0 && written == 0 {
                break;
            }
        }

        self.needs_input = self.input.is_empty() && !self.eof;
        Ok(output.into_bytes())
    }

    /// Whether the end of the stream has been reached.
    pub fn eof(&self) -> bool {
        self.eof
    }

    /// Whether the codec has consumed all buffered input and wants more.
    pub fn needs_input(&self) -> bool {
        self.needs_input
    }

    /// Bytes fed past the end of the stream. Empty until [`eof`] is true.
    ///
    /// [`eof`]: Decompressor::eof
    pub fn unused_data(&self) -> &[u8] {
        &self.unused_data
    }

    /// Memory limit the decoder was built with.
    pub fn memlimit(&self) -> u64 {
        self.decoder.memlimit()
    }
}

/// One-shot decompression of a complete in-memory payload.
///
/// Unlike the streaming [`Decompressor`], this transparently accepts
/// concatenated streams and ignores trailing bytes that do not form a
/// valid stream, provided at least one complete stream was decoded. A
/// stream that ends prematurely is always an error.
///
/// # Errors
///
/// Returns [`Error::TruncatedInput`] when the payload stops before the
/// first stream's end marker, plus everything [`Decompressor::decompress`]
/// can return.
pub fn decompress(data: &[u8], options: &DecompressOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut completed = 0usize;
    let mut pending = data.to_vec();

    loop {
        let mut decompressor = Decompressor::new(options)?;
        let decoded = match decompressor.decompress(&pending, None) {
            Ok(decoded) => decoded,
            Err(err) => {
                if completed == 0 {
                    return Err(err);
                }
                // Trailing bytes after a complete stream do not parse;
                // drop them.
                break;
            }
        };

        if !decompressor.eof() {
            return Err(Error::TruncatedInput);
        }

        output.extend_from_slice(&decoded);
        completed += 1;

        if decompressor.unused_data().is_empty() {
            break;
        }
        pending = decompressor.unused_data().to_vec();
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use crate::compressor::Compressor;

    use super::*;

    fn fixture() -> (Vec<u8>, Vec<u8>) {
        // Mostly compressible text with an incompressible tail, so the
        // compressed stream is long enough for buffer-path tests.
        let mut input: Vec<u8> = b"The quick brown fox jumps over the lazy dog. "
            .iter()
            .copied()
            .cycle()
            .take(500 * 45)
            .collect();
        for round in 0..20u8 {
            input.extend((0..=255u8).map(|byte| byte.wrapping_mul(round.wrapping_add(7))));
        }

        let mut compressor = Compressor::with_defaults().unwrap();
        let mut compressed = compressor.compress(&input).unwrap();
        compressed.extend(compressor.flush().unwrap());
        assert!(compressed.len() > 350);
        (input, compressed)
    }

    /// A full stream in one call drains completely.
    #[test]
    fn whole_stream_in_one_call() {
        let (input, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();

        let output = decompressor.decompress(&compressed, None).unwrap();
        assert_eq!(output, input);
        assert!(decompressor.eof());
        assert!(decompressor.unused_data().is_empty());
        assert!(!decompressor.needs_input());
    }

    /// Ten bytes at a time: `eof` stays false until the footer arrives.
    #[test]
    fn ten_bytes_at_a_time() {
        let (input, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();
        let mut output = Vec::new();

        let mut chunks = compressed.chunks(10).peekable();
        while let Some(chunk) = chunks.next() {
            output.extend(decompressor.decompress(chunk, None).unwrap());
            if chunks.peek().is_some() {
                assert!(!decompressor.eof());
            }
        }

        assert!(decompressor.eof());
        assert!(decompressor.unused_data().is_empty());
        assert_eq!(output, input);
    }

    /// Byte-by-byte feeding produces the same plaintext.
    #[test]
    fn byte_by_byte() {
        let (input, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();
        let mut output = Vec::new();

        for byte in &compressed {
            output.extend(
                decompressor
                    .decompress(std::slice::from_ref(byte), None)
                    .unwrap(),
            );
            if decompressor.eof() {
                break;
            }
        }

        assert_eq!(output, input);
    }

    /// Bytes past the footer come back verbatim as unused data.
    #[test]
    fn trailing_garbage_becomes_unused_data() {
        let (input, mut compressed) = fixture();
        compressed.extend_from_slice(b"fooblibar");

        let mut decompressor = Decompressor::with_defaults().unwrap();
        let output = decompressor.decompress(&compressed, None).unwrap();

        assert_eq!(output, input);
        assert!(decompressor.eof());
        assert_eq!(decompressor.unused_data(), b"fooblibar");
    }

    /// Feeding after end of stream is a state error, not a codec error.
    #[test]
    fn input_after_eof_is_rejected() {
        let (_, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();
        decompressor.decompress(&compressed, None).unwrap();
        assert!(decompressor.eof());

        assert!(matches!(
            decompressor.decompress(b"more", None),
            Err(Error::InvalidState(_))
        ));
    }

    /// A codec failure poisons the object: the first error is the codec's,
    /// every later call is a state error.
    #[test]
    fn codec_failure_poisons_the_decompressor() {
        let mut decompressor = Decompressor::with_defaults().unwrap();

        let first = decompressor.decompress(b"this is not an xz stream", None);
        assert!(matches!(first, Err(Error::Backend(_))));

        let second = decompressor.decompress(b"anything", None);
        assert!(matches!(second, Err(Error::InvalidState(_))));
        assert!(decompressor.unused_data().is_empty());
    }

    /// `max_length == 0` parks input without producing output.
    #[test]
    fn max_length_zero_parks_input() {
        let (input, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();

        let parked = decompressor.decompress(&compressed, Some(0)).unwrap();
        assert!(parked.is_empty());
        assert!(!decompressor.eof());
        assert!(!decompressor.needs_input());

        let output = decompressor.decompress(b"", None).unwrap();
        assert_eq!(output, input);
        assert!(decompressor.eof());
    }

    /// Every bounded call returns at most `max_length` bytes.
    #[test]
    fn max_length_bounds_every_return() {
        let (input, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();
        let mut output = Vec::new();

        output.extend(decompressor.decompress(&compressed, Some(31)).unwrap());
        assert!(output.len() <= 31);

        while !decompressor.eof() {
            let chunk = decompressor.decompress(b"", Some(31)).unwrap();
            assert!(chunk.len() <= 31);
            if chunk.is_empty() && decompressor.needs_input() {
                break;
            }
            output.extend(chunk);
        }

        assert_eq!(output, input);
    }

    /// Input buffer reuse after the cursor has moved: retrieve a little
    /// output, append a chunk that fits behind the tail, then drain.
    #[test]
    fn input_buffer_append_after_cursor() {
        let (input, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();
        let mut output = Vec::new();

        assert!(decompressor
            .decompress(&compressed[..100], Some(0))
            .unwrap()
            .is_empty());
        output.extend(decompressor.decompress(b"", Some(2)).unwrap());
        output.extend(decompressor.decompress(&compressed[100..105], Some(15)).unwrap());
        output.extend(decompressor.decompress(&compressed[105..], None).unwrap());

        assert_eq!(output, input);
        assert!(decompressor.eof());
    }

    /// Input buffer reuse after a full drain: empty it, refill, extend.
    #[test]
    fn input_buffer_refill_after_drain() {
        let (input, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();
        let mut output = Vec::new();

        assert!(decompressor
            .decompress(&compressed[..200], Some(0))
            .unwrap()
            .is_empty());
        output.extend(decompressor.decompress(b"", None).unwrap());
        output.extend(decompressor.decompress(&compressed[200..280], Some(2)).unwrap());
        output.extend(decompressor.decompress(&compressed[280..300], Some(2)).unwrap());
        output.extend(decompressor.decompress(&compressed[300..], None).unwrap());

        assert_eq!(output, input);
        assert!(decompressor.eof());
    }

    /// Input buffer growth: keep appending while output is throttled.
    #[test]
    fn input_buffer_growth_under_throttle() {
        let (input, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();
        let mut output = Vec::new();

        output.extend(decompressor.decompress(&compressed[..200], Some(5)).unwrap());
        output.extend(decompressor.decompress(&compressed[200..300], Some(5)).unwrap());
        output.extend(decompressor.decompress(&compressed[300..], None).unwrap());

        assert_eq!(output, input);
        assert!(decompressor.eof());
    }

    /// Empty feeds before any data are harmless.
    #[test]
    fn empty_feeds_then_data() {
        let (input, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();
        let mut output = Vec::new();

        output.extend(decompressor.decompress(b"", None).unwrap());
        output.extend(decompressor.decompress(b"", None).unwrap());
        output.extend(decompressor.decompress(&compressed, None).unwrap());

        assert_eq!(output, input);
    }

    /// The one-shot helper walks concatenated streams and drops trailing
    /// garbage after at least one complete stream.
    #[test]
    fn one_shot_concatenated_streams_with_garbage() {
        let mut payload = Vec::new();
        for part in [&b"first"[..], b"second", b"third"] {
            let mut compressor = Compressor::with_defaults().unwrap();
            payload.extend(compressor.compress(part).unwrap());
            payload.extend(compressor.flush().unwrap());
        }
        payload.extend_from_slice(b"this is not a valid lzma stream");

        let output = decompress(&payload, &DecompressOptions::default()).unwrap();
        assert_eq!(output, b"firstsecondthird");
    }

    /// Truncated input is never silently accepted by the one-shot helper.
    #[test]
    fn one_shot_rejects_truncation() {
        let (_, compressed) = fixture();

        let result = decompress(&compressed[..compressed.len() / 2], &DecompressOptions::default());
        assert!(matches!(result, Err(Error::TruncatedInput)));

        let empty = decompress(b"", &DecompressOptions::default());
        assert!(matches!(empty, Err(Error::TruncatedInput)));
    }

    /// Garbage with no leading stream propagates the codec error.
    #[test]
    fn one_shot_propagates_leading_garbage_error() {
        let result = decompress(b"garbage", &DecompressOptions::default());
        assert!(matches!(result, Err(Error::Backend(_))));
    }

    /// A tiny memory limit surfaces as the dedicated error kind.
    #[test]
    fn memlimit_error_kind() {
        let (_, compressed) = fixture();
        let options = DecompressOptions::default().with_memlimit(1024);
        let mut decompressor = Decompressor::new(&options).unwrap();
        assert_eq!(decompressor.memlimit(), 1024);

        let result = decompressor.decompress(&compressed, None);
        assert!(matches!(result, Err(Error::MemLimit)));
    }

    /// An interrupted stream never reports eof, even when input runs dry.
    #[test]
    fn truncated_streaming_input_never_reports_eof() {
        let (_, compressed) = fixture();
        let mut decompressor = Decompressor::with_defaults().unwrap();

        let _ = decompressor
            .decompress(&compressed[..compressed.len() / 2], None)
            .unwrap();
        assert!(!decompressor.eof());
        assert!(decompressor.needs_input());
    }
}
