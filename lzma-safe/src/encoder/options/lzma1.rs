//! LZMA1 encoder options for the legacy `.lzma` container.
//!
//! The `.lzma` format supports only LZMA1 and carries no integrity check
//! field; liblzma derives the coder parameters from a preset.

use crate::encoder::options::Preset;
use crate::error::Error;
use crate::Result;

/// Encoder options for LZMA1 (`lzma_options_lzma`), derived from a preset.
#[derive(Clone)]
pub struct Lzma1Options {
    raw: liblzma_sys::lzma_options_lzma,
}

impl Lzma1Options {
    /// Derive LZMA1 options from a compression preset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OptionsError`] when liblzma rejects the preset.
    pub fn from_preset(preset: Preset) -> Result<Self> {
        // SAFETY: lzma_lzma_preset fully initialises the POD struct.
        let mut raw = unsafe { std::mem::zeroed::<liblzma_sys::lzma_options_lzma>() };
        let failed = unsafe { liblzma_sys::lzma_lzma_preset(&mut raw, preset.to_raw()) };
        if failed != 0 {
            return Err(Error::OptionsError);
        }
        Ok(Self { raw })
    }

    /// Dictionary size selected by the preset.
    pub fn dict_size(&self) -> u32 {
        self.raw.dict_size
    }

    pub(crate) fn as_raw(&self) -> &liblzma_sys::lzma_options_lzma {
        &self.raw
    }
}

impl std::fmt::Debug for Lzma1Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lzma1Options")
            .field("dict_size", &self.raw.dict_size)
            .field("lc", &self.raw.lc)
            .field("lp", &self.raw.lp)
            .field("pb", &self.raw.pb)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Valid presets produce fully-populated options.
    #[test]
    fn preset_derivation_succeeds() {
        let options = Lzma1Options::from_preset(Preset::new(6)).unwrap();
        assert!(options.dict_size() > 0);
    }

    /// Out-of-range presets are rejected by liblzma itself.
    #[test]
    fn invalid_preset_is_rejected() {
        assert!(matches!(
            Lzma1Options::from_preset(Preset::new(100)),
            Err(Error::OptionsError)
        ));
    }
}
