/// Size of the flat address space in bytes.
pub const CHIP8_MEMORY_SIZE: usize = 4096;

/// Address programs are loaded to and where execution starts.
pub const CHIP8_PROGRAM_START: u16 = 0x200;

/// Largest program that fits between `CHIP8_PROGRAM_START` and the end of memory.
pub const CHIP8_MAX_PROGRAM_SIZE: usize = CHIP8_MEMORY_SIZE - CHIP8_PROGRAM_START as usize;

/// Number of nested subroutine calls the stack can hold.
pub const CHIP8_STACK_DEPTH: usize = 16;

/// Width of an instruction in bytes.
pub const CHIP8_OPCODE_SIZE: u16 = 2;

pub const CHIP8_CHARSET_OFFSET: u16 = 0x00;

/// Every glyph of the built-in font is five bytes tall.
pub const CHIP8_CHARSET_GLYPH_LEN: u16 = 5;

pub const CHIP8_CHARSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub const DEFAULT_SPEED_IN_HZ: u32 = 500;
pub const MIN_SPEED_IN_HZ: u32 = 5;
pub const MAX_SPEED_IN_HZ: u32 = 700;
pub const DEFAULT_CYCLES_PER_FRAME: u32 = 30;
