#[macro_use]
mod macros;
mod arithmetic_and_logic;
mod program_flow;
mod system;

use core::convert::TryFrom;
use std::marker::PhantomData;

use crate::chip::{
    chip8::{
        opcodes::{
            arithmetic_and_logic::{
                AddInstruction, DrwInstruction, LdInstruction, LdrInstruction, LduInstruction,
                RegInstruction, RndInstruction,
            },
            program_flow::{
                CallInstruction, JmpInstruction, JmprInstruction, SeInstruction, SkInstruction,
                SneInstruction, SreInstruction, SrneInstruction,
            },
            system::SysInstruction,
        },
        Cpu,
    },
    CpuError,
};

/// Represents a CHIP-8 opcode. A CHIP-8 opcode is two bytes long. The decoded fields are
/// derived from the raw word every time an opcode is constructed and never shared.
#[derive(Debug)]
pub(super) struct Opcode {
    /// The raw instruction word, kept around for error reporting.
    raw: u16,
    /// The instruction class is the most significant nibble of the opcode.
    /// Note that we use a u8 to represent the instruction class here for
    /// convenience, but ensure that a valid opcode can only be constructed
    /// if the four most significant bits of the u8 are 0.
    instruction_class: u8,
    /// The payload constitutes the remaining nibbles of the opcode.
    payload: OpcodePayload,
}

/// Represents the payload of a CHIP-8 opcode. That is the opcode without
/// the most significant nibble.
#[derive(Debug)]
pub(super) struct OpcodePayload {
    /// The nibbles representing the payload. Same as for the instruction class,
    /// the four most significant bits of every element are 0.
    bytes: [u8; 3],
}

impl OpcodePayload {
    /// Interprets the opcode payload as an address in the range 0x000 to
    /// 0xFFF (inclusive).
    fn address(&self) -> u16 {
        (self.bytes[0] as u16) << 8 | (self.bytes[1] as u16) << 4 | self.bytes[2] as u16
    }

    /// Interprets the most significant nibble of the payload as a register
    /// index and the remaining nibbles as a value in range 0x00 - 0xFF.
    fn reg_and_value(&self) -> (u8, u8) {
        (self.bytes[0], (self.bytes[1] << 4) | self.bytes[2])
    }

    /// Interprets the opcode payload as three operands of one nibble each.
    fn operands(&self) -> (u8, u8, u8) {
        (self.bytes[0], self.bytes[1], self.bytes[2])
    }
}

impl Opcode {
    /// Splits a big-endian instruction word into its fields.
    pub(super) fn new(raw: u16) -> Opcode {
        let [high, low] = raw.to_be_bytes();
        Opcode {
            raw,
            instruction_class: high >> 4,
            payload: OpcodePayload {
                bytes: [high & 0xF, low >> 4, low & 0xF],
            },
        }
    }

    pub(super) fn execute(self, cpu: &mut Cpu) -> Result<(), CpuError> {
        let raw = self.raw;
        let executable_opcode = self.decode().map_err(|e| {
            log::debug!("{}", e);
            CpuError::UnknownOpcode {
                opcode: raw,
                pc: cpu.program_counter,
            }
        })?;
        executable_opcode.execute(cpu)
    }

    /// Maps the opcode to the instruction implementing its class.
    fn decode(self) -> Result<Box<dyn ExecutableOpcode>, InstructionParsingError> {
        fn boxed<T>(opcode: Opcode) -> Result<Box<dyn ExecutableOpcode>, InstructionParsingError>
        where
            T: ExecutableOpcode + TryFrom<Opcode, Error = InstructionParsingError> + 'static,
        {
            let instruction: Box<dyn ExecutableOpcode> = Box::new(T::try_from(opcode)?);
            Ok(instruction)
        }

        match self.instruction_class {
            0x0 => boxed::<SysInstruction>(self),
            0x1 => boxed::<JmpInstruction>(self),
            0x2 => boxed::<CallInstruction>(self),
            0x3 => boxed::<SeInstruction>(self),
            0x4 => boxed::<SneInstruction>(self),
            0x5 => boxed::<SreInstruction>(self),
            0x6 => boxed::<LdrInstruction>(self),
            0x7 => boxed::<AddInstruction>(self),
            0x8 => boxed::<RegInstruction>(self),
            0x9 => boxed::<SrneInstruction>(self),
            0xA => boxed::<LdInstruction>(self),
            0xB => boxed::<JmprInstruction>(self),
            0xC => boxed::<RndInstruction>(self),
            0xD => boxed::<DrwInstruction>(self),
            0xE => boxed::<SkInstruction>(self),
            0xF => boxed::<LduInstruction>(self),
            class => Err(InstructionParsingError::InvalidInstructionClass(class, 0xF)),
        }
    }
}

/// Captures errors when converting opcodes to their respective instruction object.
#[derive(Debug, thiserror::Error)]
enum InstructionParsingError {
    #[error("instruction class {0:#X} does not match the expected class {1:#X}")]
    InvalidInstructionClass(u8, u8),
}

/// Represents an opcode that can be executed.
trait ExecutableOpcode {
    /// Executes `self` against the given CPU, modifying it in place. The program counter
    /// already points at the following instruction when this is called.
    fn execute(&self, cpu: &mut Cpu) -> Result<(), CpuError>;
}

/// Represents an opcode that expects the payload to be an address.
struct InstructionWithAddress<T> {
    instruction: PhantomData<T>,
    opcode: u16,
    address: u16,
}

/// Represents an opcode that expects the payload to be three operands.
struct InstructionWithOperands<T> {
    instruction: PhantomData<T>,
    opcode: u16,
    op1: u8,
    op2: u8,
    op3: u8,
}

/// Represents an opcode that expects the payload to be a register pointer and a value.
struct InstructionWithRegAndValue<T> {
    instruction: PhantomData<T>,
    opcode: u16,
    reg: u8,
    value: u8,
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:#06X}", self.raw)
    }
}
