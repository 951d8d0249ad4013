//! Ready made implementations of the capability ports for headless use and for frontends
//! that run the CPU on a worker thread.
use std::io;
use std::sync::{
    atomic::{AtomicU16, Ordering},
    Arc,
};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::chip::{Buzzer, Display, Keyboard};

/// A display that discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn render(&mut self, _screen: &[u8], _width: u32, _height: u32) -> io::Result<()> {
        Ok(())
    }
}

/// A buzzer that never makes a sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mute;

impl Buzzer for Mute {
    fn play(&mut self) {}

    fn stop(&mut self) {}
}

/// A keyboard whose state lives in a 16 bit mask shared with any number of
/// `KeyboardHandle`s, so keys can be pressed from another thread.
#[derive(Debug, Default, Clone)]
pub struct SharedKeyboard {
    keys: Arc<AtomicU16>,
}

/// The writing side of a `SharedKeyboard`.
#[derive(Debug, Clone)]
pub struct KeyboardHandle {
    keys: Arc<AtomicU16>,
}

impl SharedKeyboard {
    pub fn new() -> Self {
        SharedKeyboard::default()
    }

    pub fn handle(&self) -> KeyboardHandle {
        KeyboardHandle {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl Keyboard for SharedKeyboard {
    fn is_pressed(&self, key: u8) -> bool {
        key <= 0xF && self.keys.load(Ordering::SeqCst) & (1 << key) != 0
    }

    /// Returns the lowest key held down.
    fn get_pressed(&self) -> Option<u8> {
        match self.keys.load(Ordering::SeqCst) {
            0 => None,
            keys => Some(keys.trailing_zeros() as u8),
        }
    }
}

impl KeyboardHandle {
    /// Presses `key`. Keys above 0xF are ignored.
    pub fn press(&self, key: u8) {
        if key <= 0xF {
            self.keys.fetch_or(1 << key, Ordering::SeqCst);
        }
    }

    pub fn release(&self, key: u8) {
        if key <= 0xF {
            self.keys.fetch_and(!(1 << key), Ordering::SeqCst);
        }
    }

    pub fn release_all(&self) {
        self.keys.store(0, Ordering::SeqCst);
    }
}

/// A framebuffer as pushed by the CPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let offset = (y * self.width + x) as usize;
        self.pixels[offset / 8] & (0x80 >> (offset % 8)) != 0
    }
}

/// A display that forwards frames through a bounded channel. When the consumer falls
/// behind the oldest queued frame is dropped, so rendering never blocks the CPU. The
/// display holds a receiver of its own, so the channel stays connected after the
/// frontend lets go of its end and frames keep cycling through the queue.
pub struct ChannelDisplay {
    sender: Sender<Frame>,
    /// Evicts the oldest frame when the channel is full.
    receiver: Receiver<Frame>,
}

impl ChannelDisplay {
    /// Creates the display together with the receiving end for the frontend.
    pub fn new(capacity: usize) -> (Self, Receiver<Frame>) {
        let (sender, receiver) = bounded(capacity.max(1));
        (
            ChannelDisplay {
                sender,
                receiver: receiver.clone(),
            },
            receiver,
        )
    }
}

impl Display for ChannelDisplay {
    fn render(&mut self, screen: &[u8], width: u32, height: u32) -> io::Result<()> {
        let mut frame = Frame {
            pixels: screen.to_vec(),
            width,
            height,
        };
        while let Err(TrySendError::Full(rejected)) = self.sender.try_send(frame) {
            let _ = self.receiver.try_recv();
            frame = rejected;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_keyboard() {
        let keyboard = SharedKeyboard::new();
        let handle = keyboard.handle();
        assert_eq!(keyboard.get_pressed(), None);

        handle.press(0xA);
        handle.press(0x3);
        handle.press(0x10);
        assert!(keyboard.is_pressed(0xA));
        assert!(!keyboard.is_pressed(0x10));
        assert_eq!(keyboard.get_pressed(), Some(0x3));

        handle.release(0x3);
        assert_eq!(keyboard.get_pressed(), Some(0xA));
        handle.release_all();
        assert_eq!(keyboard.get_pressed(), None);
    }

    #[test]
    fn test_channel_display_drops_oldest_frame() {
        let (mut display, frames) = ChannelDisplay::new(2);
        for byte in 1..=3u8 {
            display.render(&[byte; 256], 64, 32).unwrap();
        }
        assert_eq!(frames.len(), 2);
        assert_eq!(frames.recv().unwrap().pixels[0], 2);
        assert_eq!(frames.recv().unwrap().pixels[0], 3);
    }

    #[test]
    fn test_channel_display_keeps_latest_frame_without_consumer() {
        let (mut display, frames) = ChannelDisplay::new(1);
        drop(frames);
        for byte in 1..=3u8 {
            assert!(display.render(&[byte; 256], 64, 32).is_ok());
        }
        assert_eq!(display.receiver.len(), 1);
        assert_eq!(display.receiver.try_recv().unwrap().pixels[0], 3);
    }

    #[test]
    fn test_frame_pixel() {
        let mut pixels = vec![0; 256];
        pixels[1] = 0b0100_0000;
        let frame = Frame {
            pixels,
            width: 64,
            height: 32,
        };
        assert!(frame.pixel(9, 0));
        assert!(!frame.pixel(8, 0));
        assert!(!frame.pixel(64, 0));
    }
}
