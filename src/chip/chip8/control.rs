use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc,
};
use std::time::Duration;

/// The control plane of a CPU. Cloning is cheap and every clone talks to the same CPU, so
/// a handle can be moved to a UI thread or captured by a hook while the CPU runs elsewhere.
/// All requests are observed by the scheduler at the next tick boundary.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    inner: Arc<Controls>,
}

#[derive(Debug)]
struct Controls {
    paused: AtomicBool,
    quit: AtomicBool,
    halted: AtomicBool,
    speed_in_hz: AtomicU32,
    min_speed_in_hz: u32,
    max_speed_in_hz: u32,
}

impl ControlHandle {
    pub(crate) fn new(speed_in_hz: u32, min_speed_in_hz: u32, max_speed_in_hz: u32) -> Self {
        let min_speed_in_hz = min_speed_in_hz.max(1);
        let max_speed_in_hz = max_speed_in_hz.max(min_speed_in_hz);
        ControlHandle {
            inner: Arc::new(Controls {
                paused: AtomicBool::new(false),
                quit: AtomicBool::new(false),
                halted: AtomicBool::new(false),
                speed_in_hz: AtomicU32::new(speed_in_hz.clamp(min_speed_in_hz, max_speed_in_hz)),
                min_speed_in_hz,
                max_speed_in_hz,
            }),
        }
    }

    /// Resumes execution. Program state is left untouched.
    pub fn start(&self) {
        self.inner.paused.store(false, Ordering::SeqCst);
    }

    /// Pauses execution. The scheduler keeps ticking, but no instruction is executed.
    pub fn stop(&self) {
        self.inner.paused.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::SeqCst)
    }

    pub(crate) fn set_paused(&self, paused: bool) {
        self.inner.paused.store(paused, Ordering::SeqCst);
    }

    /// Makes a running `Cpu::run` return `Ok(())` at the next tick boundary. A request
    /// still pending when a program is loaded or the CPU is reset is dropped.
    pub fn request_quit(&self) {
        self.inner.quit.store(true, Ordering::SeqCst);
    }

    /// Consumes a pending quit request.
    pub(crate) fn take_quit_request(&self) -> bool {
        self.inner.quit.swap(false, Ordering::SeqCst)
    }

    /// Whether the CPU stopped on an error. Cleared by loading a program or a reset.
    pub fn is_halted(&self) -> bool {
        self.inner.halted.load(Ordering::SeqCst)
    }

    pub(crate) fn set_halted(&self, halted: bool) {
        self.inner.halted.store(halted, Ordering::SeqCst);
    }

    /// Sets the target speed, clamped to the configured bounds, and returns the speed
    /// actually applied.
    pub fn set_speed_in_hz(&self, speed_in_hz: u32) -> u32 {
        let speed_in_hz = speed_in_hz.clamp(self.inner.min_speed_in_hz, self.inner.max_speed_in_hz);
        self.inner.speed_in_hz.store(speed_in_hz, Ordering::SeqCst);
        log::debug!("speed set to {} Hz", speed_in_hz);
        speed_in_hz
    }

    pub fn speed_in_hz(&self) -> u32 {
        self.inner.speed_in_hz.load(Ordering::SeqCst)
    }

    pub fn speed_bounds(&self) -> (u32, u32) {
        (self.inner.min_speed_in_hz, self.inner.max_speed_in_hz)
    }

    /// Wall time budget of a single tick at the current speed.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.speed_in_hz().max(1)
    }
}
