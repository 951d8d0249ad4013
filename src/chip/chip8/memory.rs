use crate::chip::{
    chip8::constants::{
        CHIP8_CHARSET, CHIP8_CHARSET_OFFSET, CHIP8_MAX_PROGRAM_SIZE, CHIP8_MEMORY_SIZE,
        CHIP8_PROGRAM_START,
    },
    CpuError,
};

/// The 4 KiB address space. The font lives at `CHIP8_CHARSET_OFFSET` and programs are
/// copied to `CHIP8_PROGRAM_START`. Every access wraps around the end of memory, so a
/// guest controlled index can never address outside of it.
pub struct Memory {
    bytes: [u8; CHIP8_MEMORY_SIZE],
}

impl Memory {
    /// Creates a zeroed memory with the built-in font in place.
    pub fn new() -> Self {
        let mut memory = Memory {
            bytes: [0; CHIP8_MEMORY_SIZE],
        };
        memory.load_charset();
        memory
    }

    /// Wipes the memory, restores the font and copies `program` to the start-of-program
    /// address. Nothing is touched if the program does not fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), CpuError> {
        if program.len() > CHIP8_MAX_PROGRAM_SIZE {
            return Err(CpuError::ProgramTooLarge {
                size: program.len(),
                max: CHIP8_MAX_PROGRAM_SIZE,
            });
        }

        self.bytes = [0; CHIP8_MEMORY_SIZE];
        self.load_charset();

        let start = CHIP8_PROGRAM_START as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn read(&self, address: u16) -> u8 {
        self.bytes[Self::wrap(address)]
    }

    pub fn write(&mut self, address: u16, value: u8) {
        self.bytes[Self::wrap(address)] = value;
    }

    /// Reads the big-endian instruction word at `address`.
    pub fn read_opcode(&self, address: u16) -> u16 {
        u16::from(self.read(address)) << 8 | u16::from(self.read(address.wrapping_add(1)))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn load_charset(&mut self) {
        let start = CHIP8_CHARSET_OFFSET as usize;
        self.bytes[start..start + CHIP8_CHARSET.len()].copy_from_slice(&CHIP8_CHARSET);
    }

    fn wrap(address: u16) -> usize {
        address as usize % CHIP8_MEMORY_SIZE
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}
