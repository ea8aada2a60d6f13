use std::{io, path::PathBuf};

/// Failures while getting a program into memory.
#[derive(Debug, thiserror::Error)]
pub enum RomError {
    #[error("ROM not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read ROM: {0}")]
    Read(#[from] io::Error),

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    TooLarge { size: usize, max: usize },
}

/// Faults raised while executing. Any of these stops the current step before
/// it touches state it cannot address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MachineError {
    #[error("no program loaded")]
    NoProgram,

    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("write into the font region at address {address:#06X}")]
    ReservedWrite { address: usize },

    #[error("stack overflow: call to {target:#05X} with all 16 frames in use")]
    StackOverflow { target: u16 },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("key index {0:#04X} is outside the 16-key pad")]
    InvalidKey(u8),
}
