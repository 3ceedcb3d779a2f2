//! Filter chains passed to liblzma encoders and decoders.

use std::os::raw::c_void;

/// Single element of a filter chain.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Which filter to apply.
    pub filter_type: FilterType,

    /// Optional filter-specific configuration.
    pub options: Option<FilterOptions>,
}

impl FilterConfig {
    /// A filter entry with default options.
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            filter_type,
            options: None,
        }
    }
}

/// Filter-specific configuration payloads.
#[derive(Debug, Clone)]
pub enum FilterOptions {
    /// Options for LZMA1/LZMA2 filters.
    Lzma(LzmaOptions),

    /// Options for BCJ filters.
    Bcj(BcjOptions),

    /// Options for the delta filter.
    Delta(DeltaOptions),
}

/// Filter identifiers mirroring the constants in liblzma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum FilterType {
    /// `LZMA_FILTER_LZMA1`.
    Lzma1 = 0x4000_0000_0000_0001,

    /// `LZMA_FILTER_LZMA2`.
    Lzma2 = 0x21,

    /// `LZMA_FILTER_X86`.
    X86 = 0x04,

    /// `LZMA_FILTER_POWERPC`.
    PowerPc = 0x05,

    /// `LZMA_FILTER_IA64`.
    Ia64 = 0x06,

    /// `LZMA_FILTER_ARM`.
    Arm = 0x07,

    /// `LZMA_FILTER_ARMTHUMB`.
    ArmThumb = 0x08,

    /// `LZMA_FILTER_SPARC`.
    Sparc = 0x09,

    /// `LZMA_FILTER_ARM64`.
    Arm64 = 0x0A,

    /// `LZMA_FILTER_RISCV`.
    RiscV = 0x0B,

    /// `LZMA_FILTER_DELTA`.
    Delta = 0x03,
}

/// Parameters for the LZMA1/LZMA2 filters (`lzma_options_lzma`).
#[derive(Debug, Clone)]
pub struct LzmaOptions {
    /// Dictionary size in bytes.
    pub dict_size: u32,

    /// Literal context bits.
    pub lc: u32,

    /// Literal position bits.
    pub lp: u32,

    /// Position bits used for match distances.
    pub pb: u32,

    /// Upper bound for search length when looking for matches.
    pub nice_len: u32,

    /// Maximum search depth; 0 lets liblzma decide.
    pub depth: u32,

    /// Optional preset dictionary bytes.
    pub preset_dict: Option<Vec<u8>>,
}

impl Default for LzmaOptions {
    fn default() -> Self {
        Self {
            dict_size: 1 << 23,
            lc: 3,
            lp: 0,
            pb: 2,
            nice_len: 64,
            depth: 0,
            preset_dict: None,
        }
    }
}

/// Options for BCJ (branch/call/jump) filters.
#[derive(Debug, Clone, Default)]
pub struct BcjOptions {
    /// Start offset added to converted branch targets.
    pub start_offset: u32,
}

/// Options for the delta pre-processing filter.
#[derive(Debug, Clone)]
pub struct DeltaOptions {
    /// Distance in bytes to look back when computing the delta.
    pub distance: u32,
}

impl Default for DeltaOptions {
    fn default() -> Self {
        Self { distance: 1 }
    }
}

/// Owned option buffers whose pointers are referenced by a filter chain.
enum OwnedOptions {
    Lzma {
        opts: Box<liblzma_sys::lzma_options_lzma>,
        #[allow(unused)]
        dict: Option<Box<[u8]>>,
    },
    Bcj(Box<liblzma_sys::lzma_options_bcj>),
    Delta(Box<liblzma_sys::lzma_options_delta>),
}

impl OwnedOptions {
    fn as_ptr(&self) -> *mut c_void {
        match self {
            OwnedOptions::Lzma { opts, .. } => std::ptr::addr_of!(**opts) as *mut c_void,
            OwnedOptions::Bcj(opts) => std::ptr::addr_of!(**opts) as *mut c_void,
            OwnedOptions::Delta(opts) => std::ptr::addr_of!(**opts) as *mut c_void,
        }
    }
}

/// Prepared filter chain plus the owned option storage.
///
/// liblzma reads the chain through raw pointers, so the option buffers must
/// stay alive at least for the duration of the coder-initialisation call;
/// holding this struct alongside the coder keeps them valid for its whole
/// lifetime.
pub struct RawFilters {
    /// The chain as expected by liblzma, terminated by `LZMA_VLI_UNKNOWN`.
    filters: Vec<liblzma_sys::lzma_filter>,
    #[allow(unused)]
    owned: Vec<OwnedOptions>,
}

impl RawFilters {
    /// Pointer to the chain expected by liblzma.
    ///
    /// Valid while `self` is alive.
    pub(crate) fn as_ptr(&self) -> *const liblzma_sys::lzma_filter {
        self.filters.as_ptr()
    }
}

fn lzma_filter_options(user: Option<&LzmaOptions>) -> OwnedOptions {
    let defaults = LzmaOptions::default();
    let config = user.unwrap_or(&defaults);

    // SAFETY: lzma_options_lzma is a POD struct; zeroed reserved fields are
    // exactly what liblzma expects.
    let mut opts = Box::new(unsafe { std::mem::zeroed::<liblzma_sys::lzma_options_lzma>() });
    opts.dict_size = config.dict_size;
    opts.lc = config.lc;
    opts.lp = config.lp;
    opts.pb = config.pb;
    opts.mode = liblzma_sys::lzma_mode_LZMA_MODE_NORMAL;
    opts.nice_len = config.nice_len;
    opts.mf = liblzma_sys::lzma_match_finder_LZMA_MF_BT4;
    opts.depth = config.depth;

    let dict = config
        .preset_dict
        .as_ref()
        .map(|bytes| bytes.clone().into_boxed_slice());
    if let Some(ref d) = dict {
        opts.preset_dict = d.as_ptr();
        opts.preset_dict_size = u32::try_from(d.len()).unwrap_or(u32::MAX);
    }

    OwnedOptions::Lzma { opts, dict }
}

fn bcj_filter_options(user: Option<&BcjOptions>) -> OwnedOptions {
    let opts = Box::new(liblzma_sys::lzma_options_bcj {
        start_offset: user.map_or(0, |bcj| bcj.start_offset),
    });
    OwnedOptions::Bcj(opts)
}

fn delta_filter_options(user: Option<&DeltaOptions>) -> OwnedOptions {
    // SAFETY: POD struct, reserved fields must be zero.
    let mut opts = Box::new(unsafe { std::mem::zeroed::<liblzma_sys::lzma_options_delta>() });
    opts.type_ = liblzma_sys::lzma_delta_type_LZMA_DELTA_TYPE_BYTE;
    opts.dist = user.map_or(DeltaOptions::default().distance, |delta| delta.distance);
    OwnedOptions::Delta(opts)
}

/// Build a liblzma filter chain, allocating and retaining option buffers.
pub(crate) fn prepare_filters(configs: &[FilterConfig]) -> RawFilters {
    let mut filters = Vec::with_capacity(configs.len() + 1);
    let mut owned = Vec::with_capacity(configs.len());

    for config in configs {
        let options = match config.filter_type {
            FilterType::Lzma1 | FilterType::Lzma2 => {
                let user = config.options.as_ref().and_then(|o| match o {
                    FilterOptions::Lzma(lzma) => Some(lzma),
                    _ => None,
                });
                lzma_filter_options(user)
            }
            FilterType::Delta => {
                let user = config.options.as_ref().and_then(|o| match o {
                    FilterOptions::Delta(delta) => Some(delta),
                    _ => None,
                });
                delta_filter_options(user)
            }
            _ => {
                let user = config.options.as_ref().and_then(|o| match o {
                    FilterOptions::Bcj(bcj) => Some(bcj),
                    _ => None,
                });
                bcj_filter_options(user)
            }
        };

        filters.push(liblzma_sys::lzma_filter {
            id: config.filter_type as u64,
            options: options.as_ptr(),
        });
        owned.push(options);
    }

    // Chain terminator (LZMA_VLI_UNKNOWN).
    filters.push(liblzma_sys::lzma_filter {
        id: u64::MAX,
        options: std::ptr::null_mut(),
    });

    RawFilters { filters, owned }
}
