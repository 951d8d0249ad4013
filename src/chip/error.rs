use std::io;
use std::sync::Arc;

/// Errors raised while loading or running a program. Every error that halts a run is
/// latched by the CPU and returned again by subsequent loop invocations, hence `Clone`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CpuError {
    #[error("the CPU has not been booted")]
    NotBooted,

    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("unknown opcode {opcode:#06X} at PC={pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("stack underflow: attempted to return with an empty call stack")]
    StackUnderflow,

    #[error("stack overflow: attempted to call with a full call stack")]
    StackOverflow,

    #[error("random number source failed")]
    Random(#[source] Arc<rand::Error>),

    #[error("display failed to render")]
    Render(#[source] Arc<io::Error>),

    #[error("failed to boot the {device}")]
    Boot {
        device: &'static str,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("unsupported screen size {width}x{height}")]
    InvalidScreen { width: u32, height: u32 },
}

impl CpuError {
    pub(crate) fn boot(device: &'static str, source: io::Error) -> Self {
        CpuError::Boot {
            device,
            source: Arc::new(source),
        }
    }
}

impl From<rand::Error> for CpuError {
    fn from(error: rand::Error) -> Self {
        CpuError::Random(Arc::new(error))
    }
}
