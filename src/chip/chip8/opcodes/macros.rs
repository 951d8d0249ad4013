/// Declares the marker `$instruction` and the alias `$name` for `$shape<$instruction>`, and
/// implements `TryFrom<Opcode>` for it. Opcodes of any class but `$class` are rejected.
/// `$decode` splits the payload into the operand fields of `$shape`. The raw word is kept
/// on every instruction so a failing one can name itself.
macro_rules! define_instruction {
    ($shape:ident, $instruction:ident, $name:ident, $class:expr,
     |$payload:ident| ($($field:ident),+) = $decode:expr) => {
        pub(super) struct $instruction;
        pub(super) type $name = $shape<$instruction>;
        impl TryFrom<Opcode> for $name {
            type Error = InstructionParsingError;

            fn try_from(opcode: Opcode) -> Result<Self, Self::Error> {
                if opcode.instruction_class != $class {
                    return Err(InstructionParsingError::InvalidInstructionClass(
                        opcode.instruction_class,
                        $class,
                    ));
                }
                let $payload = &opcode.payload;
                let ($($field,)+) = $decode;
                Ok(Self {
                    instruction: PhantomData,
                    opcode: opcode.raw,
                    $($field),+
                })
            }
        }
    };
}

/// `nnn`: jumps, calls and system routines.
macro_rules! define_instruction_with_address {
    ($instruction:ident, $name:ident, $class:expr) => {
        define_instruction!(InstructionWithAddress, $instruction, $name, $class,
            |payload| (address) = (payload.address(),));
    };
}

/// `xkk`: a register and an immediate byte.
macro_rules! define_instruction_with_reg_and_value {
    ($instruction:ident, $name:ident, $class:expr) => {
        define_instruction!(InstructionWithRegAndValue, $instruction, $name, $class,
            |payload| (reg, value) = payload.reg_and_value());
    };
}

/// `xyn`: two registers and a sub-operation (or sprite height).
macro_rules! define_instruction_with_operands {
    ($instruction:ident, $name:ident, $class:expr) => {
        define_instruction!(InstructionWithOperands, $instruction, $name, $class,
            |payload| (op1, op2, op3) = payload.operands());
    };
}
