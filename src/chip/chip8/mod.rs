/// Tunables of a CPU.
pub mod config;
/// CHIP-8 constants.
mod constants;
/// Shared run controls.
pub mod control;
/// Cursive display output.
pub mod cursive_display;
/// Lifecycle hooks.
pub mod hooks;
/// The address space.
mod memory;
/// Decoding of opcodes and their execution.
mod opcodes;
/// Compatibility quirks.
pub mod quirks;
/// The frame/cycle scheduler.
mod scheduler;
/// The framebuffer and its blitter.
pub mod screen;
/// Debug snapshots of the machine state.
pub mod snapshot;
/// Convenience functions for modification of the CPU state.
mod util;


use log::{debug, info};

use crate::chip::{
    chip8::{
        config::CpuConfig,
        constants::{CHIP8_PROGRAM_START, CHIP8_STACK_DEPTH},
        control::ControlHandle,
        hooks::{Hook, HookPoint, HookRegistry},
        memory::Memory,
        opcodes::Opcode,
        quirks::QuirkSet,
        screen::Screen,
    },
    Buzzer, CpuError, Display, Keyboard,
};

pub use constants::{CHIP8_MAX_PROGRAM_SIZE, CHIP8_MEMORY_SIZE};

/// Handler for `0nnn` machine routine calls. Receives `nnn` and the CPU.
pub type MachineRoutine = Box<dyn FnMut(u16, &mut Cpu) -> Result<(), CpuError> + Send>;

/// Where the CPU stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    NotBooted,
    Running,
    Paused,
    /// Stopped on an error until the next program load or reset.
    Halted,
}

/// Progress of an `Fx0A` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyWait {
    None,
    /// Waiting for any key; the key goes to the given register.
    AwaitingPress(usize),
    /// The key was latched, execution resumes once it is let go.
    AwaitingRelease(u8),
}

/// Represents the state of the CHIP-8 CPU together with the devices it talks to.
pub struct Cpu {
    /// 4096 bytes of main memory
    memory: Memory,

    /// 16 registers where each can store one byte
    registers: [u8; 16],

    /// An index register
    index: u16,

    /// A program counter
    program_counter: u16,

    /// The delay timer. Decremented once per frame.
    delay_timer: u8,

    /// The sound timer. Decremented once per frame, the buzzer sounds while it is non-zero.
    sound_timer: u8,

    /// Return addresses of the active subroutine calls.
    stack: [u16; CHIP8_STACK_DEPTH],

    /// Number of used stack slots, 0 - 16.
    stack_pointer: u8,

    screen: Screen,

    quirks: QuirkSet,

    hooks: HookRegistry,

    display: Box<dyn Display>,
    keyboard: Box<dyn Keyboard>,
    buzzer: Box<dyn Buzzer>,

    machine_routine: Option<MachineRoutine>,

    control: ControlHandle,

    is_booted: bool,

    key_wait: KeyWait,

    /// The error that halted the CPU, returned again by every loop invocation.
    last_error: Option<CpuError>,

    /// Instructions executed since the last reset.
    cycles: u64,

    /// Frame boundaries passed since the last reset.
    frames: u64,

    cycles_since_frame: u32,

    cycles_per_frame: u32,

    /// The opcode executed most recently.
    current_opcode: u16,

    buzzing: bool,
}

impl Cpu {
    /// Constructs a CPU with the default configuration: a 64x32 screen, standard
    /// CHIP-8 quirks and 500 Hz.
    pub fn new(
        display: Box<dyn Display>,
        keyboard: Box<dyn Keyboard>,
        buzzer: Box<dyn Buzzer>,
    ) -> Self {
        let config = CpuConfig::default();
        Cpu::assemble(config, Screen::default(), display, keyboard, buzzer)
    }

    /// Constructs a CPU with the given configuration. Fails if the screen size is not
    /// supported.
    pub fn with_config(
        config: CpuConfig,
        display: Box<dyn Display>,
        keyboard: Box<dyn Keyboard>,
        buzzer: Box<dyn Buzzer>,
    ) -> Result<Self, CpuError> {
        let screen = Screen::new(config.screen)?;
        Ok(Cpu::assemble(config, screen, display, keyboard, buzzer))
    }

    fn assemble(
        config: CpuConfig,
        screen: Screen,
        display: Box<dyn Display>,
        keyboard: Box<dyn Keyboard>,
        buzzer: Box<dyn Buzzer>,
    ) -> Self {
        Cpu {
            memory: Memory::new(),
            registers: [0; 16],
            index: 0,
            program_counter: CHIP8_PROGRAM_START,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; CHIP8_STACK_DEPTH],
            stack_pointer: 0,
            screen,
            quirks: config.quirks,
            hooks: HookRegistry::default(),
            display,
            keyboard,
            buzzer,
            machine_routine: None,
            control: ControlHandle::new(
                config.speed_in_hz,
                config.min_speed_in_hz,
                config.max_speed_in_hz,
            ),
            is_booted: false,
            key_wait: KeyWait::None,
            last_error: None,
            cycles: 0,
            frames: 0,
            cycles_since_frame: 0,
            cycles_per_frame: config.cycles_per_frame.max(1),
            current_opcode: 0,
            buzzing: false,
        }
    }

    /// Boots the display, keyboard and buzzer. Only the first call has an effect.
    pub fn boot(&mut self) -> Result<(), CpuError> {
        if self.is_booted {
            return Ok(());
        }

        self.display
            .boot()
            .map_err(|e| CpuError::boot("display", e))?;
        self.keyboard
            .boot()
            .map_err(|e| CpuError::boot("keyboard", e))?;
        self.buzzer.boot().map_err(|e| CpuError::boot("buzzer", e))?;

        self.is_booted = true;
        info!(
            "booted with a {}x{} screen at {} Hz",
            self.screen.width(),
            self.screen.height(),
            self.control.speed_in_hz()
        );
        Ok(())
    }

    /// Loads `program` at 0x200 and resets the machine. A program that does not fit is
    /// rejected before anything is touched.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), CpuError> {
        self.memory.load_program(program)?;
        self.reset();
        info!("loaded program of {} bytes", program.len());
        Ok(())
    }

    /// Resets registers, stack, timers, screen and counters and clears a halt along with
    /// any pending quit request. Memory keeps its contents, so the loaded program starts
    /// over.
    pub fn reset(&mut self) {
        self.registers = [0; 16];
        self.index = 0;
        self.program_counter = CHIP8_PROGRAM_START;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.stack = [0; CHIP8_STACK_DEPTH];
        self.stack_pointer = 0;
        self.screen.clear();
        self.key_wait = KeyWait::None;
        self.last_error = None;
        self.control.set_halted(false);
        if self.control.take_quit_request() {
            debug!("dropped a quit request left over from an earlier run");
        }
        self.cycles = 0;
        self.frames = 0;
        self.cycles_since_frame = 0;
        self.current_opcode = 0;
        if self.buzzing {
            self.buzzer.stop();
            self.buzzing = false;
        }
        debug!("reset");
    }

    /// Decodes and executes a single instruction against the current state. The program
    /// counter is expected to already point past it.
    pub fn execute(&mut self, opcode: u16) -> Result<(), CpuError> {
        self.current_opcode = opcode;
        Opcode::new(opcode).execute(self)
    }

    /// Replaces the active quirks. Meant to be called between runs only.
    pub fn set_quirks(&mut self, quirks: QuirkSet) {
        debug!("quirks set to {:?}", quirks);
        self.quirks = quirks;
    }

    /// Installs the handler for `0nnn` instructions. Without one they are no-ops.
    pub fn set_machine_routine<F>(&mut self, routine: F)
    where
        F: FnMut(u16, &mut Cpu) -> Result<(), CpuError> + Send + 'static,
    {
        self.machine_routine = Some(Box::new(routine));
    }

    /// Registers a hook to fire at `point`, after all hooks registered before it.
    pub fn add_hook<F>(&mut self, point: HookPoint, hook: F) -> usize
    where
        F: Fn(&Cpu) + Send + 'static,
    {
        let hook: Hook = Box::new(hook);
        self.hooks.add(point, hook)
    }

    pub fn hook_count(&self, point: HookPoint) -> usize {
        self.hooks.len(point)
    }

    /// A handle to pause, resume, stop or retune the CPU from anywhere.
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    pub fn start(&self) {
        self.control.start();
    }

    pub fn stop(&self) {
        self.control.stop();
    }

    pub fn state(&self) -> CpuState {
        if !self.is_booted {
            CpuState::NotBooted
        } else if self.last_error.is_some() {
            CpuState::Halted
        } else if self.control.is_paused() {
            CpuState::Paused
        } else {
            CpuState::Running
        }
    }

    pub fn is_booted(&self) -> bool {
        self.is_booted
    }

    pub fn is_running(&self) -> bool {
        self.state() == CpuState::Running
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.registers
    }

    pub fn register(&self, register: usize) -> u8 {
        self.registers[register & 0xF]
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack(&self) -> &[u16; CHIP8_STACK_DEPTH] {
        &self.stack
    }

    pub fn stack_pointer(&self) -> u8 {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn is_delay_timer_active(&self) -> bool {
        self.delay_timer > 0
    }

    pub fn is_sound_timer_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn quirks(&self) -> QuirkSet {
        self.quirks
    }

    pub fn speed_in_hz(&self) -> u32 {
        self.control.speed_in_hz()
    }

    pub fn set_speed_in_hz(&self, speed_in_hz: u32) -> u32 {
        self.control.set_speed_in_hz(speed_in_hz)
    }

    pub fn cycles_per_frame(&self) -> u32 {
        self.cycles_per_frame
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether an `Fx0A` instruction is still waiting for a key press or its release.
    pub fn is_waiting_for_key(&self) -> bool {
        self.key_wait != KeyWait::None
    }

    pub fn last_error(&self) -> Option<&CpuError> {
        self.last_error.as_ref()
    }

    pub fn current_opcode(&self) -> u16 {
        self.current_opcode
    }
}
