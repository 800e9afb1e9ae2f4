use crate::constants::{MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::Chip8Error;

/// # Memory
/// The Chip-8's flat 4096-byte address space.
///
/// Layout:
/// - `0x000..0x050` the built-in sprite sheet
/// - `0x200..` the loaded program and its working memory
///
/// Every access is bounds checked; an out-of-range address is a fatal
/// [`Chip8Error::MemoryOutOfBounds`].
#[derive(Copy, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[0..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    /// Reads a single byte.
    pub fn read(&self, address: usize) -> Result<u8, Chip8Error> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds { address })
    }

    /// Writes a single byte.
    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Chip8Error> {
        let byte = self
            .bytes
            .get_mut(address)
            .ok_or(Chip8Error::MemoryOutOfBounds { address })?;
        *byte = value;
        Ok(())
    }

    /// Copies a program into memory starting at [`PROGRAM_START`].
    ///
    /// Programs that don't fit between [`PROGRAM_START`] and the end of
    /// memory are rejected before any bytes are copied.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        let start = PROGRAM_START as usize;
        let max_size = MEMORY_SIZE - start;
        if program.len() > max_size {
            return Err(Chip8Error::RomTooLarge {
                size: program.len(),
                max_size,
            });
        }
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
