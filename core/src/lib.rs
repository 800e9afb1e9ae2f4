pub use crate::chip8::Chip8;
pub use crate::error::Chip8Error;
pub use crate::frame_buffer::Frame;

pub mod constants;

mod chip8;
mod error;
mod frame_buffer;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
mod state;
