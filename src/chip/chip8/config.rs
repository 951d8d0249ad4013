use crate::chip::chip8::{
    constants::{DEFAULT_CYCLES_PER_FRAME, DEFAULT_SPEED_IN_HZ, MAX_SPEED_IN_HZ, MIN_SPEED_IN_HZ},
    quirks::QuirkSet,
};

/// Dimensions of the framebuffer in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSettings {
    pub width: u32,
    pub height: u32,
}

impl ScreenSettings {
    /// The original 64x32 screen.
    pub const SMALL: ScreenSettings = ScreenSettings {
        width: 64,
        height: 32,
    };

    /// ETI-660 64x48 mode.
    pub const ETI_660_48: ScreenSettings = ScreenSettings {
        width: 64,
        height: 48,
    };

    /// ETI-660 64x64 mode.
    pub const ETI_660_64: ScreenSettings = ScreenSettings {
        width: 64,
        height: 64,
    };

    /// 128x64 high resolution mode.
    pub const LARGE: ScreenSettings = ScreenSettings {
        width: 128,
        height: 64,
    };

    /// Number of bytes a bit-packed framebuffer of this size occupies.
    pub fn size_in_bytes(&self) -> usize {
        ((self.width * self.height) as usize + 7) / 8
    }
}

impl Default for ScreenSettings {
    fn default() -> Self {
        ScreenSettings::SMALL
    }
}

/// Everything that can be tuned about a CPU before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    pub screen: ScreenSettings,
    pub quirks: QuirkSet,
    /// Target number of cycles per second.
    pub speed_in_hz: u32,
    pub min_speed_in_hz: u32,
    pub max_speed_in_hz: u32,
    /// Timers decay and the screen is flushed once every this many cycles.
    pub cycles_per_frame: u32,
}

impl Default for CpuConfig {
    fn default() -> Self {
        CpuConfig {
            screen: ScreenSettings::default(),
            quirks: QuirkSet::default(),
            speed_in_hz: DEFAULT_SPEED_IN_HZ,
            min_speed_in_hz: MIN_SPEED_IN_HZ,
            max_speed_in_hz: MAX_SPEED_IN_HZ,
            cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
        }
    }
}
