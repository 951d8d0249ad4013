use std::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Behavioral differences between CHIP-8 interpreters. Quirks are read at decode time
    /// only and never change how state is stored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct QuirkSet: u8 {
        /// `8xy1`, `8xy2` and `8xy3` clear VF before the operation.
        const VF_RESET = 0b0000_0001;
        /// `8xy6` and `8xyE` copy Vy into Vx before shifting.
        const SHIFT_USES_VY = 0b0000_0010;
        /// `Fx55` and `Fx65` leave I pointing past the last register transferred.
        const MEMORY_ADVANCES_INDEX = 0b0000_0100;
        /// Sprites are clipped at the screen edges instead of wrapping around.
        const CLIPPING = 0b0000_1000;
        /// `Bxnn` jumps to `xnn + Vx` instead of `nnn + V0`.
        const JUMP_USES_VX = 0b0001_0000;
    }
}

impl QuirkSet {
    /// Behavior of the original COSMAC VIP interpreter.
    pub const CHIP8: QuirkSet = QuirkSet::VF_RESET
        .union(QuirkSet::SHIFT_USES_VY)
        .union(QuirkSet::MEMORY_ADVANCES_INDEX);

    /// What most contemporary interpreters do.
    pub const MODERN: QuirkSet = QuirkSet::empty();

    /// Behavior of the Super-CHIP interpreters on the HP-48.
    pub const SUPER_CHIP: QuirkSet = QuirkSet::CLIPPING.union(QuirkSet::JUMP_USES_VX);
}

impl Default for QuirkSet {
    fn default() -> Self {
        QuirkSet::CHIP8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quirk preset `{0}`, expected one of: chip8, modern, schip")]
pub struct UnknownQuirkPreset(String);

impl FromStr for QuirkSet {
    type Err = UnknownQuirkPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chip8" | "chip-8" | "vip" => Ok(QuirkSet::CHIP8),
            "modern" | "none" => Ok(QuirkSet::MODERN),
            "schip" | "superchip" | "super-chip" => Ok(QuirkSet::SUPER_CHIP),
            _ => Err(UnknownQuirkPreset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard_chip8() {
        let quirks = QuirkSet::default();
        assert!(quirks.contains(QuirkSet::VF_RESET));
        assert!(quirks.contains(QuirkSet::SHIFT_USES_VY));
        assert!(quirks.contains(QuirkSet::MEMORY_ADVANCES_INDEX));
        assert!(!quirks.contains(QuirkSet::CLIPPING));
        assert!(!quirks.contains(QuirkSet::JUMP_USES_VX));
    }

    #[test]
    fn test_parse_presets() {
        assert_eq!("chip8".parse::<QuirkSet>(), Ok(QuirkSet::CHIP8));
        assert_eq!("Modern".parse::<QuirkSet>(), Ok(QuirkSet::MODERN));
        assert_eq!("schip".parse::<QuirkSet>(), Ok(QuirkSet::SUPER_CHIP));
        assert!("xo-chip".parse::<QuirkSet>().is_err());
    }
}
