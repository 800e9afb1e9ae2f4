use crate::constants::KEY_COUNT;

/// # Keypad
/// The 16-key hexadecimal input latch.
///
/// The host's input layer drives `press`/`release`; the instruction engine
/// only ever reads it. `last_pressed` remembers the most recent key-down so
/// the blocking key-read has a deterministic answer even when several keys
/// are held.
#[derive(Copy, Clone, Default)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
    last_pressed: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    pub fn press(&mut self, key: u8) {
        if let Some(slot) = self.pressed.get_mut(key as usize) {
            *slot = true;
            self.last_pressed = Some(key);
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(slot) = self.pressed.get_mut(key as usize) {
            *slot = false;
        }
    }

    /// Whether `key` is currently held. Keys outside the 16-key matrix are
    /// never pressed; EX9E/EXA1 take the key index from a register, so the
    /// value is program-controlled and can be anything.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed.get(key as usize).copied().unwrap_or(false)
    }

    pub fn last_pressed(&self) -> Option<u8> {
        self.last_pressed
    }

    /// The lowest-indexed key currently held, scanning 0x0..=0xF.
    pub fn first_pressed(&self) -> Option<u8> {
        (0..KEY_COUNT as u8).find(|key| self.is_pressed(*key))
    }
}
