//! Low-level FFI bindings for liblzma (XZ Utils).
//!
//! This crate exposes the raw C API of liblzma as generated by bindgen.
//! For a safe, RAII-based wrapper, use the `lzma-safe` crate.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::all)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
