//! Owned wrapper around the raw `lzma_stream` state.

use std::ptr;

use crate::{Action, Error, Result};

/// Safe wrapper around `lzma_stream`.
///
/// The struct starts zero-initialised as liblzma requires; an encoder or
/// decoder constructor then initialises the internal coder. Dropping the
/// wrapper via [`Stream::finish`] releases the coder with `lzma_end`; the
/// move semantics guarantee that happens at most once.
pub struct Stream {
    inner: liblzma_sys::lzma_stream,
}

impl Default for Stream {
    fn default() -> Self {
        // Equivalent of the LZMA_STREAM_INIT macro: every field zero or null.
        let inner = liblzma_sys::lzma_stream {
            next_in: ptr::null(),
            avail_in: 0,
            total_in: 0,
            next_out: ptr::null_mut(),
            avail_out: 0,
            total_out: 0,
            allocator: ptr::null(),
            internal: ptr::null_mut(),
            reserved_ptr1: ptr::null_mut(),
            reserved_ptr2: ptr::null_mut(),
            reserved_ptr3: ptr::null_mut(),
            reserved_ptr4: ptr::null_mut(),
            seek_pos: 0,
            reserved_int2: 0,
            reserved_int3: 0,
            reserved_int4: 0,
            reserved_enum1: liblzma_sys::lzma_reserved_enum_LZMA_RESERVED_ENUM,
            reserved_enum2: liblzma_sys::lzma_reserved_enum_LZMA_RESERVED_ENUM,
        };

        Self { inner }
    }
}

impl Stream {
    /// Internal helper exposing the raw `lzma_stream`.
    pub(crate) fn lzma_stream(&mut self) -> &mut liblzma_sys::lzma_stream {
        &mut self.inner
    }

    /// Finalise the stream by calling into liblzma.
    pub(crate) fn finish(self) {
        crate::ffi::lzma_end(self);
    }

    /// Point the coder at the next input slice.
    pub(crate) fn set_next_input(&mut self, input: &[u8]) {
        self.inner.next_in = if input.is_empty() {
            ptr::null()
        } else {
            input.as_ptr()
        };
        self.inner.avail_in = input.len();
    }

    /// Point the coder at the next output slice.
    pub(crate) fn set_next_out(&mut self, output: &mut [u8]) {
        self.inner.next_out = if output.is_empty() {
            ptr::null_mut()
        } else {
            output.as_mut_ptr()
        };
        self.inner.avail_out = output.len();
    }

    /// Remaining bytes in the current input slice.
    pub(crate) fn avail_in(&self) -> usize {
        self.inner.avail_in
    }

    /// Remaining space in the current output slice.
    pub(crate) fn avail_out(&self) -> usize {
        self.inner.avail_out
    }
}

/// Drive one `lzma_code` step against the stream held in `slot`.
///
/// The slot becomes `None` once the coder reports `LZMA_STREAM_END`; the
/// stream is finalised right there, so `lzma_end` runs exactly once no
/// matter how the owning coder is dropped. After that, `Run` steps report
/// no progress and `Finish` steps are a programming error. On any other
/// failure the stream is kept so the owner can still release it.
pub(crate) fn code_step(
    slot: &mut Option<Stream>,
    input: &[u8],
    output: &mut [u8],
    action: Action,
) -> Result<(usize, usize)> {
    let Some(mut stream) = slot.take() else {
        if action == Action::Finish {
            return Err(Error::ProgError);
        }
        return Ok((0, 0));
    };

    stream.set_next_input(input);
    stream.set_next_out(output);

    let input_before = stream.avail_in();
    let output_before = stream.avail_out();

    let result = crate::ffi::lzma_code(&mut stream, action);
    let bytes_read = input_before - stream.avail_in();
    let bytes_written = output_before - stream.avail_out();

    match result {
        Ok(()) => {
            *slot = Some(stream);
            Ok((bytes_read, bytes_written))
        }
        Err(Error::StreamEnd) => {
            stream.finish();
            Ok((bytes_read, bytes_written))
        }
        Err(err) => {
            *slot = Some(stream);
            Err(err)
        }
    }
}
