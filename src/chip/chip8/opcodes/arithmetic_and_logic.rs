use core::convert::TryFrom;
use rand::{rngs::OsRng, RngCore};
use std::marker::PhantomData;

use crate::chip::{
    chip8::{
        constants::{CHIP8_CHARSET_GLYPH_LEN, CHIP8_CHARSET_OFFSET},
        opcodes::{
            ExecutableOpcode, InstructionParsingError, InstructionWithAddress,
            InstructionWithOperands, InstructionWithRegAndValue, Opcode,
        },
        quirks::QuirkSet,
        util, Cpu, KeyWait,
    },
    CpuError,
};

define_instruction_with_reg_and_value!(Ldr, LdrInstruction, 0x6);
impl ExecutableOpcode for LdrInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        cpu.registers[self.reg as usize] = self.value;
        Ok(())
    }
}

define_instruction_with_reg_and_value!(Add, AddInstruction, 0x7);
impl ExecutableOpcode for AddInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        cpu.registers[self.reg as usize] = cpu.registers[self.reg as usize].wrapping_add(self.value);
        Ok(())
    }
}

define_instruction_with_operands!(Reg, RegInstruction, 0x8);
impl ExecutableOpcode for RegInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        /// Stores the result of `f` in `r1` and, if `f` reports one, the flag in VF.
        /// VF is written last so it wins when `r1` is VF itself.
        fn modify_registers(cpu: &mut Cpu, r1: u8, r2: u8, f: fn(u8, u8) -> (u8, Option<bool>)) {
            let (val, flag) = f(cpu.registers[r1 as usize], cpu.registers[r2 as usize]);
            cpu.registers[r1 as usize] = val;
            if let Some(flag) = flag {
                cpu.registers[0xF] = flag as u8;
            }
        }

        let (x, y) = (self.op1, self.op2);
        let quirks = cpu.quirks;

        if matches!(self.op3, 0x1..=0x3) && quirks.contains(QuirkSet::VF_RESET) {
            cpu.registers[0xF] = 0;
        }
        if matches!(self.op3, 0x6 | 0xE) && quirks.contains(QuirkSet::SHIFT_USES_VY) {
            cpu.registers[x as usize] = cpu.registers[y as usize];
        }

        match self.op3 {
            0x0 => modify_registers(cpu, x, y, |_, v2| (v2, None)),
            0x1 => modify_registers(cpu, x, y, |v1, v2| (v1 | v2, None)),
            0x2 => modify_registers(cpu, x, y, |v1, v2| (v1 & v2, None)),
            0x3 => modify_registers(cpu, x, y, |v1, v2| (v1 ^ v2, None)),
            0x4 => modify_registers(cpu, x, y, |v1, v2| {
                let (result, overflow) = v1.overflowing_add(v2);
                (result, Some(overflow))
            }),
            0x5 => modify_registers(cpu, x, y, |v1, v2| (v1.wrapping_sub(v2), Some(v1 >= v2))),
            0x6 => modify_registers(cpu, x, x, |v1, _| (v1 >> 1, Some(v1 & 1 != 0))),
            0x7 => modify_registers(cpu, x, y, |v1, v2| (v2.wrapping_sub(v1), Some(v2 >= v1))),
            0xE => modify_registers(cpu, x, x, |v1, _| (v1 << 1, Some(v1 & 0x80 != 0))),
            _ => return Err(util::unknown_opcode(self.opcode, cpu)),
        };
        Ok(())
    }
}

define_instruction_with_address!(Ld, LdInstruction, 0xA);
impl ExecutableOpcode for LdInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        cpu.index = self.address;
        Ok(())
    }
}

define_instruction_with_reg_and_value!(Rnd, RndInstruction, 0xC);
impl ExecutableOpcode for RndInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        let mut sample = [0u8; 1];
        OsRng.try_fill_bytes(&mut sample)?;
        cpu.registers[self.reg as usize] = sample[0] & self.value;
        Ok(())
    }
}

define_instruction_with_operands!(Drw, DrwInstruction, 0xD);
impl ExecutableOpcode for DrwInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        let x = cpu.registers[self.op1 as usize];
        let y = u32::from(cpu.registers[self.op2 as usize]);
        let height = cpu.screen.height();
        let clipping = cpu.quirks.contains(QuirkSet::CLIPPING);

        let mut collided = false;
        for row in 0..u32::from(self.op3) {
            let sprite = cpu.memory.read(cpu.index.wrapping_add(row as u16));
            // height is at most 256, so a row index always fits a byte
            collided |= if clipping {
                let row_y = y % height + row;
                if row_y >= height {
                    break;
                }
                cpu.screen.blit_clipped(x, row_y as u8, sprite)
            } else {
                cpu.screen.blit(x, ((y + row) % height) as u8, sprite)
            };
        }

        cpu.registers[0xF] = collided as u8;
        Ok(())
    }
}

define_instruction_with_reg_and_value!(Ldu, LduInstruction, 0xF);
impl ExecutableOpcode for LduInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        let reg = self.reg as usize;
        match self.value {
            0x07 => {
                cpu.registers[reg] = cpu.delay_timer;
            }
            0x0A => {
                // resolved by the scheduler, which polls the keyboard between cycles
                cpu.key_wait = KeyWait::AwaitingPress(reg);
            }
            0x15 => {
                cpu.delay_timer = cpu.registers[reg];
            }
            0x18 => {
                cpu.sound_timer = cpu.registers[reg];
            }
            0x1E => {
                cpu.index = cpu.index.wrapping_add(cpu.registers[reg] as u16);
            }
            0x29 => {
                let character = cpu.registers[reg] as u16;
                cpu.index = CHIP8_CHARSET_OFFSET + character * CHIP8_CHARSET_GLYPH_LEN;
            }
            0x33 => {
                let value = cpu.registers[reg];
                let index = cpu.index;
                cpu.memory.write(index, value / 100);
                cpu.memory.write(index.wrapping_add(1), value / 10 % 10);
                cpu.memory.write(index.wrapping_add(2), value % 10);
            }
            0x55 => {
                for r in 0..=reg {
                    let address = cpu.index.wrapping_add(r as u16);
                    cpu.memory.write(address, cpu.registers[r]);
                }
                advance_index(cpu, reg);
            }
            0x65 => {
                for r in 0..=reg {
                    cpu.registers[r] = cpu.memory.read(cpu.index.wrapping_add(r as u16));
                }
                advance_index(cpu, reg);
            }
            _ => return Err(util::unknown_opcode(self.opcode, cpu)),
        }
        Ok(())
    }
}

fn advance_index(cpu: &mut Cpu, last_register: usize) {
    if cpu.quirks.contains(QuirkSet::MEMORY_ADVANCES_INDEX) {
        cpu.index = cpu.index.wrapping_add(last_register as u16 + 1);
    }
}
