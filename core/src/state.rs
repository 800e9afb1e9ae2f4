use crate::constants::{PROGRAM_START, STACK_DEPTH};
use crate::frame_buffer::FrameBuffer;
use crate::memory::Memory;

/// What the machine will do on its next cycle.
///
/// `FX0A` moves the machine from `Running` to `AwaitingKey`; the next key
/// press moves it back. A fatal error moves it to `Halted`, which is never
/// left.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Running,
    AwaitingKey { register: u8 },
    Halted,
}

/// A snapshot of the Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, starting at 0x200
/// - inside an executing operation the pc already points past the fetched
///   instruction, so a CALL pushes the address of the instruction after it
///
/// Stack
/// - 16 return addresses and a stack pointer
/// - overflow and underflow are fatal rather than silent
///
/// Timers
/// - 2 8-bit countdown timers (delay & sound)
/// - they saturate at zero and tick at 60Hz regardless of the clock speed
///
/// ## Memory & display
/// - the 4096-byte [`Memory`] image, sprite sheet included
/// - the 64x32 [`FrameBuffer`] with its dirty flag
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_DEPTH],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub mode: Mode,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
            delay_timer: 0,
            sound_timer: 0,
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            mode: Mode::Running,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
