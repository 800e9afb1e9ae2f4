use thiserror::Error;

/// Every way the machine can fail.
///
/// All of these are terminal for the loaded program; the machine halts and
/// never resumes. The opcode-class variants carry the raw opcode word and the
/// program counter it was fetched from so the host can report exactly which
/// instruction was at fault.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("machine code routine call {opcode:#06X} at {pc:#05X} is not supported")]
    MachineCall { opcode: u16, pc: u16 },

    #[error("memory access out of bounds at address {address:#05X}")]
    MemoryOutOfBounds { address: usize },

    #[error("call stack overflow: subroutine calls nested deeper than 16 frames")]
    StackOverflow,

    #[error("call stack underflow: return with no subroutine call outstanding")]
    StackUnderflow,

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },
}
