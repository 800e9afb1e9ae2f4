use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// A single Chip-8 frame, indexed as `[y][x]` with one byte per pixel (0 or 1)
pub type Frame = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # FrameBuffer
/// The 64x32 monochrome display surface.
///
/// Only two instructions touch it: CLS zeroes it and DRW XOR-composites
/// sprite rows onto it. Sprite pixels that land outside the grid are clipped;
/// they are never wrapped around to the opposite edge.
///
/// The `dirty` flag records that the surface changed since the host last took
/// a frame for presentation.
#[derive(Copy, Clone)]
pub struct FrameBuffer {
    pixels: Frame,
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            dirty: false,
        }
    }

    /// Zeroes every pixel and marks the surface dirty.
    pub fn clear(&mut self) {
        self.pixels = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.dirty = true;
    }

    /// XORs one 8-pixel sprite row onto the surface with its leftmost pixel
    /// at `(x, y)`, reading `bits` MSB-first.
    ///
    /// Pixels that fall off the right or bottom edge are discarded. Returns
    /// true if any lit pixel was turned off (a collision).
    pub fn xor_row(&mut self, x: u8, y: u8, bits: u8) -> bool {
        if y as usize >= DISPLAY_HEIGHT {
            return false;
        }
        let row = &mut self.pixels[y as usize];

        let mut collision = false;
        for bit in 0..8 {
            let column = x as usize + bit;
            if column >= DISPLAY_WIDTH {
                break;
            }
            let sprite_pixel = (bits >> (7 - bit)) & 1;
            collision |= (sprite_pixel & row[column]) == 1;
            row[column] ^= sprite_pixel;
        }
        self.dirty = true;
        collision
    }

    pub fn pixels(&self) -> &Frame {
        &self.pixels
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
