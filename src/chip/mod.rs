pub mod chip8;
pub mod devices;
mod error;

use std::io;

pub use error::CpuError;

/// The display port. The CPU never paints pixels itself: once per frame boundary, and only
/// if the framebuffer changed since the last push, it hands the whole bit-packed screen to
/// `render`.
pub trait Display: Send {
    /// Initializes the display. Called once by `Cpu::boot`.
    fn boot(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Pushes a framebuffer with one bit per pixel, row-major, most significant bit first.
    /// `screen` is exactly `ceil(width * height / 8)` bytes long.
    fn render(&mut self, screen: &[u8], width: u32, height: u32) -> io::Result<()>;
}

/// The keyboard port. Keys are the sixteen hex keys 0x0 - 0xF.
pub trait Keyboard: Send {
    /// Initializes the keyboard. Called once by `Cpu::boot`.
    fn boot(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Returns whether `key` is currently held down. Keys above 0xF are never pressed.
    fn is_pressed(&self, key: u8) -> bool;

    /// Returns any key that is currently held down, used to resolve `Fx0A`.
    fn get_pressed(&self) -> Option<u8>;
}

/// The sound port. `play` is invoked on every frame while the sound timer is active and
/// `stop` once it runs out.
pub trait Buzzer: Send {
    /// Initializes the buzzer. Called once by `Cpu::boot`.
    fn boot(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn play(&mut self);

    fn stop(&mut self);
}
