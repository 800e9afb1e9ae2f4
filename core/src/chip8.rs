use log::trace;

use crate::error::Chip8Error;
use crate::frame_buffer::Frame;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::state::{Mode, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// The whole machine is one owned aggregate: the CPU/memory/display `state`
/// plus the `keypad` input latch. There is no global state.
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - advancing the timers on their own, independent cadence
/// - taking the frame buffer for rendering by some display
/// - polling the sound and halt status
pub struct Chip8 {
    state: State,
    keypad: Keypad,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            keypad: Keypad::new(),
        }
    }

    /// Copies a ROM into memory at the program start address.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        self.state.memory.load_program(rom)
    }

    /// Returns the current frame if the display changed since the last take.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if self.state.frame_buffer.is_dirty() {
            self.state.frame_buffer.clear_dirty();
            Some(*self.state.frame_buffer.pixels())
        } else {
            None
        }
    }

    /// Set the pressed status of key.
    ///
    /// A press while the machine is blocked on FX0A stores the key in the
    /// waiting register and resumes execution.
    pub fn key_press(&mut self, key: u8) {
        self.keypad.press(key);
        if let (Mode::AwaitingKey { register }, Some(latest)) =
            (self.state.mode, self.keypad.last_pressed())
        {
            self.state.v[register as usize] = latest;
            self.state.mode = Mode::Running;
        }
    }

    /// Unset the pressed status of key.
    pub fn key_release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    /// Executes exactly one instruction: fetch the big-endian word at pc,
    /// advance pc by 2, decode, dispatch.
    ///
    /// A no-op while the machine is awaiting a key or halted. Any error
    /// halts the machine permanently and is returned for reporting; the
    /// visible state stays as it was before the failed cycle.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        if self.state.mode != Mode::Running {
            return Ok(());
        }
        let result = self.cycle();
        if result.is_err() {
            self.state.mode = Mode::Halted;
        }
        result
    }

    fn cycle(&mut self) -> Result<(), Chip8Error> {
        let pc = self.state.pc;
        let op = self.fetch()?;
        let instruction = Instruction::decode(op, pc)?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            pc
        );

        let mut fetched = self.state;
        fetched.pc = pc + 0x2;
        self.state = instruction.execute(&fetched, &self.keypad)?;
        Ok(())
    }

    /// Advances both timers by one tick, saturating at zero.
    ///
    /// The host drives this at 60Hz regardless of how many instructions
    /// execute in between; the two cadences share no counter.
    pub fn tick_timers(&mut self) {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }
        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
        }
    }

    /// True while the sound timer is non-zero and a tone should be audible.
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn is_halted(&self) -> bool {
        self.state.mode == Mode::Halted
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two
    /// subsequent bytes.
    fn fetch(&self) -> Result<u16, Chip8Error> {
        let left = self.state.memory.read(self.state.pc as usize)?;
        let right = self.state.memory.read(self.state.pc as usize + 1)?;
        Ok(u16::from(left) << 8 | u16::from(right))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
