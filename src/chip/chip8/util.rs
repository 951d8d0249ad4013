use crate::chip::{
    chip8::{constants::CHIP8_OPCODE_SIZE, Cpu},
    CpuError,
};

/// Skips the next instruction if `f` holds for the given instruction and CPU.
pub fn conditional_skip<T>(instruction: &T, cpu: &mut Cpu, f: fn(&T, &Cpu) -> bool) {
    if f(instruction, cpu) {
        increment_program_counter(cpu);
    }
}

pub fn increment_program_counter(cpu: &mut Cpu) {
    cpu.program_counter = cpu.program_counter.wrapping_add(CHIP8_OPCODE_SIZE);
}

/// The error raised for an opcode whose sub-operation does not exist.
pub fn unknown_opcode(opcode: u16, cpu: &Cpu) -> CpuError {
    CpuError::UnknownOpcode {
        opcode,
        pc: cpu.program_counter,
    }
}
