use crate::chip::chip8::Cpu;

/// The points in the scheduler at which hooks are fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Start of every scheduler tick, even while paused.
    BeforeFrame,
    /// Right before an instruction is fetched.
    BeforeCycle,
    /// Right after an instruction was executed successfully.
    AfterCycle,
    /// End of every tick that did not halt.
    AfterFrame,
    /// A decode or render error halted the CPU. The error is available through
    /// `Cpu::last_error` by the time these run.
    OnError,
}

const HOOK_POINTS: usize = 5;

impl HookPoint {
    fn slot(self) -> usize {
        self as usize
    }
}

/// An observer of the CPU. Hooks that need to steer the CPU (say, pause it) capture a
/// `ControlHandle` instead of mutating it.
pub type Hook = Box<dyn Fn(&Cpu) + Send>;

/// Append-only lists of hooks, one per `HookPoint`, fired in registration order.
#[derive(Default)]
pub(crate) struct HookRegistry {
    hooks: [Vec<Hook>; HOOK_POINTS],
}

impl HookRegistry {
    /// Registers `hook` and returns its position within the list for `point`.
    pub(crate) fn add(&mut self, point: HookPoint, hook: Hook) -> usize {
        let hooks = &mut self.hooks[point.slot()];
        hooks.push(hook);
        hooks.len() - 1
    }

    pub(crate) fn run(&self, point: HookPoint, cpu: &Cpu) {
        for hook in &self.hooks[point.slot()] {
            hook(cpu);
        }
    }

    pub(crate) fn len(&self, point: HookPoint) -> usize {
        self.hooks[point.slot()].len()
    }
}
