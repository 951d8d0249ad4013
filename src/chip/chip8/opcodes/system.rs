use core::convert::TryFrom;
use std::marker::PhantomData;

use crate::chip::{
    chip8::{
        opcodes::{ExecutableOpcode, InstructionParsingError, InstructionWithAddress, Opcode},
        Cpu,
    },
    CpuError,
};

define_instruction_with_address!(Sys, SysInstruction, 0x0);
impl ExecutableOpcode for SysInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        match self.address {
            0x0E0 => {
                cpu.screen.clear();
                Ok(())
            }
            0x0EE => {
                if cpu.stack_pointer == 0 {
                    return Err(CpuError::StackUnderflow);
                }
                cpu.stack_pointer -= 1;
                cpu.program_counter = cpu.stack[cpu.stack_pointer as usize];
                Ok(())
            }
            address => {
                // the routine gets the CPU itself, so it is parked outside of it during the call
                match cpu.machine_routine.take() {
                    Some(mut routine) => {
                        log::trace!("handing {:#06X} to the machine routine", self.opcode);
                        let result = routine(address, cpu);
                        cpu.machine_routine.get_or_insert(routine);
                        result
                    }
                    None => Ok(()),
                }
            }
        }
    }
}
