//! Safe FFI bindings to liblzma (XZ Utils).
//!
//! This crate wraps the raw `liblzma-sys` bindings in RAII types: a
//! [`Stream`] owning the `lzma_stream` state, encoder and decoder
//! constructors for each coding mode liblzma offers, and a uniform
//! `process(input, output, action)` step that reports how many bytes moved
//! in each direction. Resource release is tied to ownership; a stream is
//! finalised with `lzma_end` exactly once, on every path.

pub mod decoder;
pub mod encoder;
pub mod version;

mod error;
mod ffi;
mod stream;

pub use decoder::Decoder;
pub use encoder::{AloneEncoder, Encoder, RawEncoder};
pub use error::{Error, Result};
pub use stream::Stream;

/// Coding action passed to `lzma_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Encode or decode as much as possible without forcing an end of stream.
    Run,

    /// Finish the stream; repeat until the coder reports stream end.
    Finish,
}

impl From<Action> for liblzma_sys::lzma_action {
    fn from(action: Action) -> Self {
        match action {
            Action::Run => liblzma_sys::lzma_action_LZMA_RUN,
            Action::Finish => liblzma_sys::lzma_action_LZMA_FINISH,
        }
    }
}
