//! Decoder configuration shared by the safe wrappers.

/// Wrapper around liblzma's decoder flag bit-field.
#[derive(Debug, Clone, Copy)]
pub struct Flags(u32);

bitflags::bitflags! {
    impl Flags: u32 {
        /// Report that the input stream lacks an integrity check
        /// (`LZMA_TELL_NO_CHECK`).
        const NO_CHECK = 0x01;

        /// Report unsupported check types (`LZMA_TELL_UNSUPPORTED_CHECK`).
        const UNSUPPORTED_CHECK = 0x02;

        /// Emit a status once the check type becomes known
        /// (`LZMA_TELL_ANY_CHECK`).
        const ANY_CHECK = 0x04;

        /// Decode concatenated `.xz` streams as one logical stream
        /// (`LZMA_CONCATENATED`). Note that with this flag set, stream end
        /// is only reported at end of input, never at a stream footer.
        const CONCATENATED = 0x08;

        /// Skip verification of integrity checks (`LZMA_IGNORE_CHECK`).
        const IGNORE_CHECK = 0x10;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}

impl Flags {
    /// Expose the raw bit-field expected by liblzma.
    pub(crate) fn to_liblzma_flags(self) -> u32 {
        self.bits()
    }
}

/// Configuration passed to `lzma_stream_decoder_mt`.
pub struct Options {
    /// Number of worker threads (1 means single-threaded).
    pub threads: u32,

    /// Soft memory limit; the decoder falls back to fewer threads when it
    /// would be exceeded.
    pub memlimit_threading: u64,

    /// Hard memory limit that aborts the operation when exceeded.
    pub memlimit_stop: u64,

    /// Behavioural flags, see [`Flags`].
    pub flags: Flags,

    /// Timeout in milliseconds for worker coordination; `0` disables it.
    pub timeout: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            threads: 1,
            memlimit_threading: u64::MAX,
            memlimit_stop: u64::MAX,
            flags: Flags::empty(),
            timeout: 0,
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderOptions")
            .field("threads", &self.threads)
            .field("memlimit_threading", &self.memlimit_threading)
            .field("memlimit_stop", &self.memlimit_stop)
            .field("flags", &self.flags)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Options {
    /// Convert to the raw `lzma_mt` structure expected by liblzma.
    pub(crate) fn to_lzma_options(&self) -> liblzma_sys::lzma_mt {
        // SAFETY: lzma_mt is a POD struct; zeroed then filled with the
        // fields the decoder reads.
        let mut options = unsafe { std::mem::zeroed::<liblzma_sys::lzma_mt>() };

        options.threads = self.threads;
        options.timeout = self.timeout;
        options.flags = self.flags.to_liblzma_flags();
        options.memlimit_threading = self.memlimit_threading;
        options.memlimit_stop = self.memlimit_stop;

        options
    }
}
