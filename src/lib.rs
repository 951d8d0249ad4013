//! A CHIP-8 CPU core. The implementation follows the instruction set
//! described [here](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table) and splits the
//! machine into a cycle-accurate-enough execution engine and three narrow capability
//! ports (display, keyboard and buzzer) that frontends implement.
//!
//! The core owns memory, registers, a bit-packed framebuffer, the compatibility quirks and
//! a registry of lifecycle hooks used for instrumentation. A cursive based text user
//! interface ships as the `emulator_text_ui` binary.
pub mod chip;

pub use chip::{
    chip8::{
        config::{CpuConfig, ScreenSettings},
        control::ControlHandle,
        hooks::HookPoint,
        quirks::QuirkSet,
        snapshot::Snapshot,
        Cpu, CpuState,
    },
    devices::{ChannelDisplay, Frame, KeyboardHandle, Mute, NullDisplay, SharedKeyboard},
    Buzzer, CpuError, Display, Keyboard,
};
