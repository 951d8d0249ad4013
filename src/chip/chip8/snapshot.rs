use crossbeam_channel::{bounded, Receiver};

use crate::chip::chip8::{constants::CHIP8_STACK_DEPTH, hooks::HookPoint, Cpu};

/// A copy of the state a debugger cares about, taken between two cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub opcode: u16,
    pub program_counter: u16,
    pub registers: [u8; 16],
    pub index: u16,
    pub stack_pointer: u8,
    pub stack: [u16; CHIP8_STACK_DEPTH],
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Snapshot {
    /// Size of the wire format produced by `to_bytes`.
    pub const SIZE: usize = 57;

    pub fn of(cpu: &Cpu) -> Self {
        Snapshot {
            opcode: cpu.current_opcode,
            program_counter: cpu.program_counter,
            registers: cpu.registers,
            index: cpu.index,
            stack_pointer: cpu.stack_pointer,
            stack: cpu.stack,
            delay_timer: cpu.delay_timer,
            sound_timer: cpu.sound_timer,
        }
    }

    /// Serializes the snapshot big-endian, in field order: opcode, PC, V0 - VF, I, SP,
    /// the 16 stack slots, DT and ST.
    pub fn to_bytes(&self) -> [u8; Snapshot::SIZE] {
        let mut bytes = [0; Snapshot::SIZE];
        bytes[0..2].copy_from_slice(&self.opcode.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.program_counter.to_be_bytes());
        bytes[4..20].copy_from_slice(&self.registers);
        bytes[20..22].copy_from_slice(&self.index.to_be_bytes());
        bytes[22] = self.stack_pointer;
        for (slot, address) in self.stack.iter().enumerate() {
            let offset = 23 + slot * 2;
            bytes[offset..offset + 2].copy_from_slice(&address.to_be_bytes());
        }
        bytes[55] = self.delay_timer;
        bytes[56] = self.sound_timer;
        bytes
    }

    pub fn from_bytes(bytes: &[u8; Snapshot::SIZE]) -> Self {
        let word = |offset: usize| u16::from_be_bytes([bytes[offset], bytes[offset + 1]]);

        let mut registers = [0; 16];
        registers.copy_from_slice(&bytes[4..20]);
        let mut stack = [0; CHIP8_STACK_DEPTH];
        for (slot, address) in stack.iter_mut().enumerate() {
            *address = word(23 + slot * 2);
        }

        Snapshot {
            opcode: word(0),
            program_counter: word(2),
            registers,
            index: word(20),
            stack_pointer: bytes[22],
            stack,
            delay_timer: bytes[55],
            sound_timer: bytes[56],
        }
    }
}

impl Cpu {
    /// Streams a snapshot after every `every`-th cycle. At most `capacity` snapshots are
    /// queued; while the queue is full new snapshots are dropped so a slow consumer never
    /// holds up the CPU.
    pub fn stream_snapshots(&mut self, every: u64, capacity: usize) -> Receiver<Snapshot> {
        let (sender, receiver) = bounded(capacity);
        let every = every.max(1);
        self.add_hook(HookPoint::AfterCycle, move |cpu| {
            if cpu.cycles() % every == 0 {
                let _ = sender.try_send(Snapshot::of(cpu));
            }
        });
        receiver
    }
}
