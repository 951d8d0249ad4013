use crate::chip::{chip8::config::ScreenSettings, CpuError};

/// The framebuffer. Pixels are stored one bit each, row-major, most significant bit first,
/// so a sprite byte that lands on a byte boundary can be XORed in as a whole.
pub struct Screen {
    settings: ScreenSettings,
    pixels: Vec<u8>,
    /// Whether the pixels changed since the display last received them.
    dirty: bool,
}

impl Screen {
    /// Creates a blank screen. Rows must be made of whole bytes and both dimensions
    /// addressable by an 8-bit coordinate.
    pub fn new(settings: ScreenSettings) -> Result<Self, CpuError> {
        let ScreenSettings { width, height } = settings;
        if width == 0 || width % 8 != 0 || width > 256 || height == 0 || height > 256 {
            return Err(CpuError::InvalidScreen { width, height });
        }

        Ok(Screen {
            settings,
            pixels: vec![0; settings.size_in_bytes()],
            dirty: false,
        })
    }

    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|byte| *byte = 0);
        self.dirty = true;
    }

    /// XORs one sprite row onto the screen at `(x, y)`. Coordinates wrap around both
    /// edges. Returns whether a lit pixel was turned off.
    pub fn blit(&mut self, x: u8, y: u8, sprite: u8) -> bool {
        self.draw_row(x, y, sprite, false)
    }

    /// Like `blit`, but the part of the row that would wrap past the right edge is dropped.
    pub fn blit_clipped(&mut self, x: u8, y: u8, sprite: u8) -> bool {
        self.draw_row(x, y, sprite, true)
    }

    fn draw_row(&mut self, x: u8, y: u8, sprite: u8, clip: bool) -> bool {
        self.dirty = true;

        let width = self.settings.width as usize;
        let height = self.settings.height as usize;
        let offset = (y as usize % height) * width + (x as usize % width);

        let shift = offset % 8;
        let first = offset / 8;
        if shift == 0 {
            return self.xor(first, sprite);
        }

        let mut collided = self.xor(first, sprite >> shift);

        // the spill-over byte belongs to the same row
        let mut second = first + 1;
        if (second * 8) % width == 0 {
            if clip {
                return collided;
            }
            second -= width / 8;
        }
        collided |= self.xor(second, sprite << (8 - shift));

        collided
    }

    fn xor(&mut self, index: usize, bits: u8) -> bool {
        let previous = self.pixels[index];
        self.pixels[index] ^= bits;
        previous & !self.pixels[index] != 0
    }

    /// Returns whether the pixel at `(x, y)` is lit. Out of range coordinates are unlit.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.settings.width || y >= self.settings.height {
            return false;
        }
        let offset = (y * self.settings.width + x) as usize;
        self.pixels[offset / 8] & (0x80 >> (offset % 8)) != 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn settings(&self) -> ScreenSettings {
        self.settings
    }

    pub fn width(&self) -> u32 {
        self.settings.width
    }

    pub fn height(&self) -> u32 {
        self.settings.height
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(super) fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for Screen {
    /// A blank 64x32 screen.
    fn default() -> Self {
        let settings = ScreenSettings::default();
        Screen {
            settings,
            pixels: vec![0; settings.size_in_bytes()],
            dirty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn small_screen() -> Screen {
        Screen::new(ScreenSettings::SMALL).unwrap()
    }

    #[test]
    fn test_new_screen_is_blank_and_clean() {
        let screen = small_screen();
        assert_eq!(screen.as_bytes().len(), 256);
        assert!(screen.as_bytes().iter().all(|b| *b == 0));
        assert!(!screen.is_dirty());
    }

    #[test]
    fn test_rejects_unaligned_or_empty_sizes() {
        for (width, height) in [(0, 32), (60, 32), (64, 0), (264, 32), (64, 257)] {
            assert!(Screen::new(ScreenSettings { width, height }).is_err());
        }
        assert!(Screen::new(ScreenSettings::LARGE).is_ok());
    }

    #[test]
    fn test_aligned_blit() {
        let mut screen = small_screen();
        assert!(!screen.blit(8, 1, 0b1010_0101));
        assert_eq!(screen.as_bytes()[8 + 1], 0b1010_0101);
        assert!(screen.pixel(8, 1));
        assert!(!screen.pixel(9, 1));
        assert!(screen.is_dirty());
    }

    #[test]
    fn test_unaligned_blit_spans_two_bytes() {
        let mut screen = small_screen();
        screen.blit(3, 0, 0xFF);
        assert_eq!(screen.as_bytes()[0], 0b0001_1111);
        assert_eq!(screen.as_bytes()[1], 0b1110_0000);
        assert!((3..11).all(|x| screen.pixel(x, 0)));
        assert!(!screen.pixel(2, 0));
        assert!(!screen.pixel(11, 0));
    }

    #[test]
    fn test_unaligned_blit_wraps_within_the_row() {
        let mut screen = small_screen();
        screen.blit(60, 2, 0xFF);
        // last byte of row 2 and first byte of row 2, not row 3
        assert_eq!(screen.as_bytes()[2 * 8 + 7], 0b0000_1111);
        assert_eq!(screen.as_bytes()[2 * 8], 0b1111_0000);
        assert_eq!(screen.as_bytes()[3 * 8], 0);
        assert!(screen.pixel(63, 2));
        assert!(screen.pixel(0, 2));
        assert!(screen.pixel(3, 2));
        assert!(!screen.pixel(4, 2));
    }

    #[test]
    fn test_clipped_blit_drops_overflow() {
        let mut screen = small_screen();
        screen.blit_clipped(60, 2, 0xFF);
        assert_eq!(screen.as_bytes()[2 * 8 + 7], 0b0000_1111);
        assert_eq!(screen.as_bytes()[2 * 8], 0);
    }

    #[test]
    fn test_coordinates_wrap() {
        let mut screen = small_screen();
        screen.blit(64 + 8, 32 + 1, 0x80);
        assert!(screen.pixel(8, 1));
    }

    #[test]
    fn test_collision_only_when_pixel_turns_off() {
        let mut screen = small_screen();
        assert!(!screen.blit(5, 5, 0b1100_0000));
        assert!(!screen.blit(5, 5, 0b0011_0000));
        assert!(screen.blit(5, 5, 0b0100_0000));
        assert!(screen.pixel(5, 5));
        assert!(!screen.pixel(6, 5));
    }

    #[test]
    fn test_clear_marks_dirty() {
        let mut screen = small_screen();
        screen.blit(0, 0, 0xFF);
        assert!(screen.take_dirty());
        assert!(!screen.is_dirty());
        screen.clear();
        assert!(screen.is_dirty());
        assert!(screen.as_bytes().iter().all(|b| *b == 0));
    }

    #[quickcheck]
    fn prop_blitting_twice_restores_the_screen(
        background: Vec<(u8, u8, u8)>,
        x: u8,
        y: u8,
        sprite: u8,
    ) -> bool {
        let mut screen = small_screen();
        for (bx, by, bsprite) in background {
            screen.blit(bx, by, bsprite);
        }
        let before = screen.as_bytes().to_vec();

        // a lit pixel under the sprite goes dark on one of the two draws
        let first = screen.blit(x, y, sprite);
        let second = screen.blit(x, y, sprite);

        screen.as_bytes() == before.as_slice() && (first || second || sprite == 0)
    }
}
