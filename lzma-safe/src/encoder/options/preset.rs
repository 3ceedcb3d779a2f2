//! Compression presets exposed by liblzma.

/// A liblzma compression preset: a level plus an optional extreme flag.
///
/// Levels 0–9 trade speed for ratio; the extreme flag raises CPU cost
/// without changing the output format. The level is passed to liblzma
/// unvalidated, so out-of-range values surface as the library's own
/// options error rather than being rejected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    level: u32,
    extreme: bool,
}

impl Preset {
    /// Bit flag enabling "extreme" mode (`LZMA_PRESET_EXTREME`).
    const EXTREME_FLAG: u32 = 1 << 31;

    /// liblzma's default level.
    pub const DEFAULT: Preset = Preset::new(6);

    /// A preset at the given level.
    pub const fn new(level: u32) -> Self {
        Self {
            level,
            extreme: false,
        }
    }

    /// The same level with the extreme flag set.
    #[must_use]
    pub const fn extreme(self) -> Self {
        Self {
            extreme: true,
            ..self
        }
    }

    /// The configured level.
    pub const fn level(self) -> u32 {
        self.level
    }

    /// Whether the extreme flag is set.
    pub const fn is_extreme(self) -> bool {
        self.extreme
    }

    /// The numeric preset expected by liblzma.
    pub(crate) const fn to_raw(self) -> u32 {
        if self.extreme {
            self.level | Self::EXTREME_FLAG
        } else {
            self.level
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for Preset {
    fn from(level: u32) -> Self {
        Self::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::Preset;

    /// Plain levels map straight through.
    #[test]
    fn plain_levels() {
        assert_eq!(Preset::new(0).to_raw(), 0);
        assert_eq!(Preset::new(6).to_raw(), 6);
        assert_eq!(Preset::new(9).to_raw(), 9);
        assert_eq!(Preset::default().to_raw(), 6);
    }

    /// The extreme flag ORs in the high bit.
    #[test]
    fn extreme_flag() {
        let flag = 1u32 << 31;
        assert_eq!(Preset::new(0).extreme().to_raw(), flag);
        assert_eq!(Preset::new(9).extreme().to_raw(), 9 | flag);
        assert!(Preset::new(3).extreme().is_extreme());
        assert!(!Preset::new(3).is_extreme());
    }

    /// Out-of-range levels pass through untouched; liblzma rejects them.
    #[test]
    fn out_of_range_levels_pass_through() {
        assert_eq!(Preset::new(10).to_raw(), 10);
        assert_eq!(Preset::new(255).to_raw(), 255);
    }
}
