use std::thread;
use std::time::Instant;

use log::{debug, error, info, trace, warn};

use crate::chip::{
    chip8::{
        constants::{CHIP8_MEMORY_SIZE, CHIP8_OPCODE_SIZE},
        hooks::HookPoint,
        util, Cpu, KeyWait,
    },
    CpuError,
};

impl Cpu {
    /// Runs the loaded program at the configured speed until it runs past the end of
    /// memory, a quit is requested through the `ControlHandle`, or an error halts it.
    /// A halted CPU returns its error again until the next program load.
    pub fn run(&mut self) -> Result<(), CpuError> {
        self.ensure_runnable()?;
        info!("running at {} Hz", self.control.speed_in_hz());

        let mut last_tick = Instant::now();
        loop {
            if self.control.take_quit_request() {
                debug!("quit requested after {} cycles", self.cycles);
                return Ok(());
            }

            if self.run_next_cycle()? {
                info!("program finished after {} cycles", self.cycles);
                return Ok(());
            }

            if let Some(remaining) = self.control.tick_duration().checked_sub(last_tick.elapsed())
            {
                thread::sleep(remaining);
            }
            last_tick = Instant::now();
        }
    }

    /// Sets the speed, clamped to the configured bounds, and runs.
    pub fn run_at_speed(&mut self, speed_in_hz: u32) -> Result<(), CpuError> {
        self.control.set_speed_in_hz(speed_in_hz);
        self.run()
    }

    /// Runs exactly one scheduler tick, even while paused. Returns whether the program
    /// finished.
    pub fn loop_once(&mut self) -> Result<bool, CpuError> {
        self.ensure_runnable()?;
        self.unpaused(|cpu| cpu.run_next_cycle())
    }

    /// Runs scheduler ticks, even while paused, until the next frame boundary has been
    /// passed. Returns whether the program finished. A `stop()` issued during the frame,
    /// from a hook or another thread, ends it early.
    pub fn single_frame(&mut self) -> Result<bool, CpuError> {
        self.ensure_runnable()?;
        self.unpaused(|cpu| {
            let frames = cpu.frames;
            while cpu.frames == frames {
                if cpu.run_next_cycle()? {
                    return Ok(true);
                }
                if cpu.control.is_paused() {
                    debug!("frame {} interrupted by a pause", frames);
                    return Ok(false);
                }
            }
            Ok(false)
        })
    }

    /// Runs `f` with the paused flag cleared. A pause requested while `f` runs sticks.
    fn unpaused<T>(&mut self, f: impl FnOnce(&mut Cpu) -> T) -> T {
        let was_paused = self.control.is_paused();
        self.control.set_paused(false);
        let result = f(self);
        if was_paused {
            self.control.set_paused(true);
        }
        result
    }

    fn ensure_runnable(&self) -> Result<(), CpuError> {
        if !self.is_booted {
            return Err(CpuError::NotBooted);
        }
        match &self.last_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// One scheduler tick. Returns `Ok(true)` once the program counter left the address
    /// space.
    pub(super) fn run_next_cycle(&mut self) -> Result<bool, CpuError> {
        self.hooks.run(HookPoint::BeforeFrame, self);

        if self.control.is_paused() {
            return Ok(false);
        }

        match self.key_wait {
            KeyWait::AwaitingPress(register) => {
                if let Some(key) = self.keyboard.get_pressed() {
                    trace!("latched key {:X} into V{:X}", key, register);
                    self.registers[register] = key;
                    self.key_wait = KeyWait::AwaitingRelease(key);
                }
            }
            KeyWait::AwaitingRelease(key) => {
                if !self.keyboard.is_pressed(key) {
                    self.key_wait = KeyWait::None;
                }
            }
            KeyWait::None => {
                if self.program_counter as usize >= CHIP8_MEMORY_SIZE {
                    return Ok(true);
                }

                self.hooks.run(HookPoint::BeforeCycle, self);
                if let Err(e) = self.fetch_and_execute() {
                    return Err(self.halt(e));
                }
                self.cycles += 1;
                self.hooks.run(HookPoint::AfterCycle, self);

                if self.program_counter as usize >= CHIP8_MEMORY_SIZE {
                    return Ok(true);
                }
            }
        }

        self.cycles_since_frame += 1;
        if self.cycles_since_frame >= self.cycles_per_frame {
            self.cycles_since_frame = 0;
            self.end_frame()?;
        }

        self.hooks.run(HookPoint::AfterFrame, self);
        Ok(false)
    }

    fn fetch_and_execute(&mut self) -> Result<(), CpuError> {
        let pc = self.program_counter;
        let opcode = self.memory.read_opcode(pc);
        util::increment_program_counter(self);
        trace!("{:#05X}: {:04X}", pc, opcode);
        self.execute(opcode)
    }

    /// Decays the timers, drives the buzzer and pushes the screen if it changed.
    fn end_frame(&mut self) -> Result<(), CpuError> {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);

        if self.sound_timer > 0 {
            self.buzzer.play();
            self.buzzing = true;
        } else if self.buzzing {
            self.buzzer.stop();
            self.buzzing = false;
        }

        if self.screen.take_dirty() {
            let result = self.display.render(
                self.screen.as_bytes(),
                self.screen.width(),
                self.screen.height(),
            );
            if let Err(e) = result {
                return Err(self.halt(CpuError::Render(e.into())));
            }
            debug!("pushed frame {}", self.frames);
        }

        self.frames += 1;
        Ok(())
    }

    /// Latches `error` as the sticky error and notifies the error hooks.
    fn halt(&mut self, error: CpuError) -> CpuError {
        match error {
            CpuError::Render(_) => error!("halted: {}", error),
            _ => warn!(
                "halted at PC={:#05X} after {} cycles: {}",
                self.program_counter.wrapping_sub(CHIP8_OPCODE_SIZE),
                self.cycles,
                error
            ),
        }
        self.last_error = Some(error.clone());
        self.control.set_halted(true);
        self.hooks.run(HookPoint::OnError, self);
        error
    }
}
