use core::convert::TryFrom;
use std::marker::PhantomData;

use crate::chip::{
    chip8::{
        constants::CHIP8_STACK_DEPTH,
        opcodes::{
            ExecutableOpcode, InstructionParsingError, InstructionWithAddress,
            InstructionWithOperands, InstructionWithRegAndValue, Opcode,
        },
        quirks::QuirkSet,
        util, Cpu,
    },
    CpuError,
};

define_instruction_with_address!(Jmp, JmpInstruction, 0x1);
impl ExecutableOpcode for JmpInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        cpu.program_counter = self.address;
        Ok(())
    }
}

define_instruction_with_address!(Call, CallInstruction, 0x2);
impl ExecutableOpcode for CallInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        if cpu.stack_pointer as usize >= CHIP8_STACK_DEPTH {
            return Err(CpuError::StackOverflow);
        }
        cpu.stack[cpu.stack_pointer as usize] = cpu.program_counter;
        cpu.stack_pointer += 1;
        cpu.program_counter = self.address;
        Ok(())
    }
}

define_instruction_with_reg_and_value!(Se, SeInstruction, 0x3);
impl ExecutableOpcode for SeInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        util::conditional_skip(self, cpu, |instruction, cpu| {
            cpu.registers[instruction.reg as usize] == instruction.value
        });
        Ok(())
    }
}

define_instruction_with_reg_and_value!(Sne, SneInstruction, 0x4);
impl ExecutableOpcode for SneInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        util::conditional_skip(self, cpu, |instruction, cpu| {
            cpu.registers[instruction.reg as usize] != instruction.value
        });
        Ok(())
    }
}

define_instruction_with_operands!(Sre, SreInstruction, 0x5);
impl ExecutableOpcode for SreInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        if self.op3 != 0 {
            return Err(util::unknown_opcode(self.opcode, cpu));
        }
        util::conditional_skip(self, cpu, |instruction, cpu| {
            cpu.registers[instruction.op1 as usize] == cpu.registers[instruction.op2 as usize]
        });
        Ok(())
    }
}

define_instruction_with_operands!(Srne, SrneInstruction, 0x9);
impl ExecutableOpcode for SrneInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        if self.op3 != 0 {
            return Err(util::unknown_opcode(self.opcode, cpu));
        }
        util::conditional_skip(self, cpu, |instruction, cpu| {
            cpu.registers[instruction.op1 as usize] != cpu.registers[instruction.op2 as usize]
        });
        Ok(())
    }
}

define_instruction_with_address!(Jmpr, JmprInstruction, 0xB);
impl ExecutableOpcode for JmprInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        // Bxnn reads the offset register from its own high nibble
        let offset_register = if cpu.quirks.contains(QuirkSet::JUMP_USES_VX) {
            (self.address >> 8) as usize
        } else {
            0
        };
        cpu.program_counter = self
            .address
            .wrapping_add(cpu.registers[offset_register] as u16);
        Ok(())
    }
}

define_instruction_with_reg_and_value!(Sk, SkInstruction, 0xE);
impl ExecutableOpcode for SkInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        let key = cpu.registers[self.reg as usize];
        let skip = match self.value {
            0x9E => cpu.keyboard.is_pressed(key),
            0xA1 => !cpu.keyboard.is_pressed(key),
            _ => return Err(util::unknown_opcode(self.opcode, cpu)),
        };
        if skip {
            util::increment_program_counter(cpu);
        }
        Ok(())
    }
}
