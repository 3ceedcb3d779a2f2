//! Thin wrappers around the `liblzma` FFI calls used by the safe API.

use std::ffi::CStr;

use crate::encoder::options::RawFilters;
use crate::error::{result_from_lzma_ret, Result};
use crate::{decoder, encoder, Action, Stream};

/// Call `lzma_code` with a safe return type.
pub(crate) fn lzma_code(stream: &mut Stream, action: Action) -> Result<()> {
    // SAFETY: the stream was initialized by one of the constructors below.
    let ret = unsafe { liblzma_sys::lzma_code(stream.lzma_stream(), action.into()) };
    result_from_lzma_ret(ret, ())
}

/// Finalise a stream by calling `lzma_end`.
pub(crate) fn lzma_end(mut stream: Stream) {
    // SAFETY: the stream is valid; move semantics ensure a single call.
    unsafe { liblzma_sys::lzma_end(stream.lzma_stream()) };
}

/// Initialise a single-threaded preset encoder via `lzma_easy_encoder`.
pub(crate) fn lzma_easy_encoder(
    preset: encoder::options::Preset,
    check: encoder::options::Check,
    stream: &mut Stream,
) -> Result<()> {
    // SAFETY: the stream is zero-initialized and not yet owned by a coder.
    let ret = unsafe {
        liblzma_sys::lzma_easy_encoder(stream.lzma_stream(), preset.to_raw(), check.into())
    };
    result_from_lzma_ret(ret, ())
}

/// Initialise a single-threaded encoder with an explicit filter chain via
/// `lzma_stream_encoder`.
pub(crate) fn lzma_stream_encoder(
    filters: &RawFilters,
    check: encoder::options::Check,
    stream: &mut Stream,
) -> Result<()> {
    // SAFETY: the filter chain and its option buffers outlive this call.
    let ret = unsafe {
        liblzma_sys::lzma_stream_encoder(stream.lzma_stream(), filters.as_ptr(), check.into())
    };
    result_from_lzma_ret(ret, ())
}

/// Initialise a multithreaded encoder via `lzma_stream_encoder_mt`.
pub(crate) fn lzma_stream_encoder_mt(
    config: &encoder::Options,
    stream: &mut Stream,
) -> Result<Option<RawFilters>> {
    // Build the lzma_mt struct in this scope so the filter pointers stay valid.
    let (mt, raw_filters) = config.to_lzma_options();

    // SAFETY: `mt` and any filter option memory are valid for this call.
    let ret = unsafe { liblzma_sys::lzma_stream_encoder_mt(stream.lzma_stream(), &raw const mt) };
    result_from_lzma_ret(ret, raw_filters)
}

/// Initialise a legacy `.lzma` encoder via `lzma_alone_encoder`.
pub(crate) fn lzma_alone_encoder(
    options: &liblzma_sys::lzma_options_lzma,
    stream: &mut Stream,
) -> Result<()> {
    // SAFETY: liblzma copies the options during initialization.
    let ret = unsafe { liblzma_sys::lzma_alone_encoder(stream.lzma_stream(), options) };
    result_from_lzma_ret(ret, ())
}

/// Initialise a headerless encoder via `lzma_raw_encoder`.
pub(crate) fn lzma_raw_encoder(filters: &RawFilters, stream: &mut Stream) -> Result<()> {
    // SAFETY: the filter chain and its option buffers outlive this call.
    let ret = unsafe { liblzma_sys::lzma_raw_encoder(stream.lzma_stream(), filters.as_ptr()) };
    result_from_lzma_ret(ret, ())
}

/// Initialise an XZ decoder with `lzma_stream_decoder`.
pub(crate) fn lzma_stream_decoder(
    memlimit: u64,
    flags: decoder::options::Flags,
    stream: &mut Stream,
) -> Result<()> {
    // SAFETY: the stream is zero-initialized and not yet owned by a coder.
    let ret = unsafe {
        liblzma_sys::lzma_stream_decoder(stream.lzma_stream(), memlimit, flags.to_liblzma_flags())
    };
    result_from_lzma_ret(ret, ())
}

/// Initialise a multithreaded decoder with `lzma_stream_decoder_mt`.
pub(crate) fn lzma_stream_decoder_mt(
    options: &decoder::Options,
    stream: &mut Stream,
) -> Result<()> {
    // SAFETY: all required fields of the options struct are populated.
    let ret = unsafe {
        liblzma_sys::lzma_stream_decoder_mt(stream.lzma_stream(), &options.to_lzma_options())
    };
    result_from_lzma_ret(ret, ())
}

/// Initialise an auto-detecting decoder via `lzma_auto_decoder`.
pub(crate) fn lzma_auto_decoder(
    memlimit: u64,
    flags: decoder::options::Flags,
    stream: &mut Stream,
) -> Result<()> {
    // SAFETY: the stream is zero-initialized and not yet owned by a coder.
    let ret = unsafe {
        liblzma_sys::lzma_auto_decoder(stream.lzma_stream(), memlimit, flags.to_liblzma_flags())
    };
    result_from_lzma_ret(ret, ())
}

/// Initialise a legacy `.lzma` decoder via `lzma_alone_decoder`.
pub(crate) fn lzma_alone_decoder(memlimit: u64, stream: &mut Stream) -> Result<()> {
    // SAFETY: the stream is zero-initialized and not yet owned by a coder.
    let ret = unsafe { liblzma_sys::lzma_alone_decoder(stream.lzma_stream(), memlimit) };
    result_from_lzma_ret(ret, ())
}

/// Initialise a headerless decoder via `lzma_raw_decoder`.
pub(crate) fn lzma_raw_decoder(filters: &RawFilters, stream: &mut Stream) -> Result<()> {
    // SAFETY: the filter chain and its option buffers outlive this call.
    let ret = unsafe { liblzma_sys::lzma_raw_decoder(stream.lzma_stream(), filters.as_ptr()) };
    result_from_lzma_ret(ret, ())
}

/// The runtime liblzma version as a static string (e.g. `"5.8.1"`).
pub(crate) fn lzma_version_string() -> &'static str {
    // SAFETY: liblzma returns a pointer to a static NUL-terminated string.
    let raw = unsafe { CStr::from_ptr(liblzma_sys::lzma_version_string()) };
    raw.to_str().unwrap_or("0.0.0")
}

/// The runtime liblzma version in numeric form
/// (`major * 10000000 + minor * 10000 + patch * 10 + stability`).
pub(crate) fn lzma_version_number() -> u32 {
    // SAFETY: trivial accessor with no preconditions.
    unsafe { liblzma_sys::lzma_version_number() }
}
