/// Horizontal pixel count of the display
pub const DISPLAY_WIDTH: usize = 64;

/// Vertical pixel count of the display
pub const DISPLAY_HEIGHT: usize = 32;

/// Total addressable memory in bytes
pub const MEMORY_SIZE: usize = 4096;

/// Address at which loaded programs begin
pub const PROGRAM_START: u16 = 0x200;

/// Maximum number of return addresses the call stack can hold
pub const STACK_DEPTH: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Instructions executed per second by default
pub const CLOCK_HZ: u32 = 700;

/// Timer decrements per second, independent of the instruction cadence
pub const TIMER_HZ: u32 = 60;

/// Number of bytes in a single font glyph
pub const GLYPH_SIZE: u16 = 5;

/// # Sprite sheet
/// Every Chip-8 has a built-in sprite sheet with 5-byte sprites for 0..F.
/// Each glyph row is one byte whose high nibble encodes 4 visible pixels.
/// Stored at 0x000..0x050, below the program space.
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
