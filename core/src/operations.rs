//! One pure state transition per instruction.
//!
//! Every operation takes the machine state as it stands after the fetch, with
//! the program counter already advanced past the instruction word. Skips add
//! a further 2 and jumps overwrite the counter outright; everything else
//! leaves it alone.

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, GLYPH_SIZE, STACK_DEPTH};
use crate::error::Chip8Error;
use crate::keypad::Keypad;
use crate::state::{Mode, State};

/// clear the screen
pub fn clr(state: &State) -> Result<State, Chip8Error> {
    let mut frame_buffer = state.frame_buffer;
    frame_buffer.clear();
    Ok(State {
        frame_buffer,
        ..*state
    })
}

/// PC = STACK.pop()
pub fn rts(state: &State) -> Result<State, Chip8Error> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow);
    }
    let sp = state.sp - 1;
    Ok(State {
        pc: state.stack[sp as usize],
        sp,
        ..*state
    })
}

/// PC = addr
pub fn jump(state: &State, addr: u16) -> Result<State, Chip8Error> {
    Ok(State { pc: addr, ..*state })
}

/// STACK.push(PC); PC = addr
///
/// The pushed PC already points past the call, so RTS resumes at the
/// following instruction.
pub fn call(state: &State, addr: u16) -> Result<State, Chip8Error> {
    if state.sp as usize >= STACK_DEPTH {
        return Err(Chip8Error::StackOverflow);
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.pc;
    Ok(State {
        pc: addr,
        sp: state.sp + 1,
        stack,
        ..*state
    })
}

/// if Vx == kk then skip
pub fn ske(state: &State, x: u8, kk: u8) -> Result<State, Chip8Error> {
    let pc = if state.v[x as usize] == kk {
        state.pc + 0x2
    } else {
        state.pc
    };
    Ok(State { pc, ..*state })
}

/// if Vx != kk then skip
pub fn skne(state: &State, x: u8, kk: u8) -> Result<State, Chip8Error> {
    let pc = if state.v[x as usize] != kk {
        state.pc + 0x2
    } else {
        state.pc
    };
    Ok(State { pc, ..*state })
}

/// if Vx == Vy then skip
pub fn skre(state: &State, x: u8, y: u8) -> Result<State, Chip8Error> {
    let pc = if state.v[x as usize] == state.v[y as usize] {
        state.pc + 0x2
    } else {
        state.pc
    };
    Ok(State { pc, ..*state })
}

/// if Vx != Vy then skip
pub fn skrne(state: &State, x: u8, y: u8) -> Result<State, Chip8Error> {
    let pc = if state.v[x as usize] != state.v[y as usize] {
        state.pc + 0x2
    } else {
        state.pc
    };
    Ok(State { pc, ..*state })
}

/// Vx = kk
pub fn load(state: &State, x: u8, kk: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    v[x as usize] = kk;
    Ok(State { v, ..*state })
}

/// Vx += kk
/// Overflow is dropped; no flag is touched.
pub fn add(state: &State, x: u8, kk: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    v[x as usize] = v[x as usize].wrapping_add(kk);
    Ok(State { v, ..*state })
}

/// Vx = Vy
pub fn mv(state: &State, x: u8, y: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    v[x as usize] = v[y as usize];
    Ok(State { v, ..*state })
}

/// Vx |= Vy
pub fn or(state: &State, x: u8, y: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    v[x as usize] |= v[y as usize];
    Ok(State { v, ..*state })
}

/// Vx &= Vy
pub fn and(state: &State, x: u8, y: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    v[x as usize] &= v[y as usize];
    Ok(State { v, ..*state })
}

/// Vx ^= Vy
pub fn xor(state: &State, x: u8, y: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    v[x as usize] ^= v[y as usize];
    Ok(State { v, ..*state })
}

/// Vx += Vy; VF = carry
pub fn addr(state: &State, x: u8, y: u8) -> Result<State, Chip8Error> {
    let (res, carry) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    let mut v = state.v;
    v[x as usize] = res;
    v[0xF] = u8::from(carry);
    Ok(State { v, ..*state })
}

/// Vx -= Vy; VF = 1 if there was no borrow (Vx >= Vy beforehand)
pub fn sub(state: &State, x: u8, y: u8) -> Result<State, Chip8Error> {
    let (res, borrow) = state.v[x as usize].overflowing_sub(state.v[y as usize]);
    let mut v = state.v;
    v[x as usize] = res;
    v[0xF] = u8::from(!borrow);
    Ok(State { v, ..*state })
}

/// Vx >>= 1; VF = the shifted-out bit
pub fn shr(state: &State, x: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    let shifted_out = v[x as usize] & 0x1;
    v[x as usize] >>= 1;
    v[0xF] = shifted_out;
    Ok(State { v, ..*state })
}

/// Vx = Vy - Vx; VF = 1 if there was no borrow (Vy >= Vx beforehand)
pub fn subn(state: &State, x: u8, y: u8) -> Result<State, Chip8Error> {
    let (res, borrow) = state.v[y as usize].overflowing_sub(state.v[x as usize]);
    let mut v = state.v;
    v[x as usize] = res;
    v[0xF] = u8::from(!borrow);
    Ok(State { v, ..*state })
}

/// Vx <<= 1; VF = the shifted-out bit
pub fn shl(state: &State, x: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    let shifted_out = (v[x as usize] & 0x80) >> 7;
    v[x as usize] <<= 1;
    v[0xF] = shifted_out;
    Ok(State { v, ..*state })
}

/// I = addr
pub fn loadi(state: &State, addr: u16) -> Result<State, Chip8Error> {
    Ok(State { i: addr, ..*state })
}

/// PC = V0 + addr
pub fn jumpi(state: &State, addr: u16) -> Result<State, Chip8Error> {
    Ok(State {
        pc: u16::from(state.v[0x0]) + addr,
        ..*state
    })
}

/// Vx = rand_byte & kk
pub fn rand(state: &State, x: u8, kk: u8) -> Result<State, Chip8Error> {
    let rand_byte: u8 = rand::random();
    let mut v = state.v;
    v[x as usize] = rand_byte & kk;
    Ok(State { v, ..*state })
}

/// draw_sprite(x=Vx y=Vy rows=n)
/// XORs the n-row sprite at memory[I..] onto the frame at (Vx % 64, Vy % 32).
/// Rows are read through bounds-checked memory access; pixels past the right
/// or bottom edge are clipped. VF = 1 if any lit pixel was turned off.
pub fn draw(state: &State, x: u8, y: u8, n: u8) -> Result<State, Chip8Error> {
    let origin_x = state.v[x as usize] % DISPLAY_WIDTH as u8;
    let origin_y = state.v[y as usize] % DISPLAY_HEIGHT as u8;

    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;
    let mut collision = false;

    for row in 0..n {
        let bits = state.memory.read(state.i as usize + row as usize)?;
        collision |= frame_buffer.xor_row(origin_x, origin_y + row, bits);
    }
    v[0xF] = u8::from(collision);

    Ok(State {
        v,
        frame_buffer,
        ..*state
    })
}

/// if Vx.pressed then skip
pub fn skpr(state: &State, keypad: &Keypad, x: u8) -> Result<State, Chip8Error> {
    let pc = if keypad.is_pressed(state.v[x as usize]) {
        state.pc + 0x2
    } else {
        state.pc
    };
    Ok(State { pc, ..*state })
}

/// if !Vx.pressed then skip
pub fn skup(state: &State, keypad: &Keypad, x: u8) -> Result<State, Chip8Error> {
    let pc = if !keypad.is_pressed(state.v[x as usize]) {
        state.pc + 0x2
    } else {
        state.pc
    };
    Ok(State { pc, ..*state })
}

/// Vx = DT
pub fn moved(state: &State, x: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    v[x as usize] = state.delay_timer;
    Ok(State { v, ..*state })
}

/// await keypress for Vx
/// A key already held resolves immediately, lowest index first per the
/// keypad scan order. Otherwise the machine enters the AwaitingKey
/// sub-state and no further instruction executes until the keypad reports
/// a new key, which lands in Vx.
pub fn keyd(state: &State, keypad: &Keypad, x: u8) -> Result<State, Chip8Error> {
    match keypad.first_pressed() {
        Some(key) => {
            let mut v = state.v;
            v[x as usize] = key;
            Ok(State { v, ..*state })
        }
        None => Ok(State {
            mode: Mode::AwaitingKey { register: x },
            ..*state
        }),
    }
}

/// DT = Vx
pub fn loads(state: &State, x: u8) -> Result<State, Chip8Error> {
    Ok(State {
        delay_timer: state.v[x as usize],
        ..*state
    })
}

/// ST = Vx
pub fn ld(state: &State, x: u8) -> Result<State, Chip8Error> {
    Ok(State {
        sound_timer: state.v[x as usize],
        ..*state
    })
}

/// I += Vx
/// No overflow flag is defined for this instruction.
pub fn addi(state: &State, x: u8) -> Result<State, Chip8Error> {
    Ok(State {
        i: state.i.wrapping_add(u16::from(state.v[x as usize])),
        ..*state
    })
}

/// I = Vx * 5
/// Point I at the built-in glyph for the hex digit in Vx. The sprite sheet
/// starts at address zero, so the glyph base needs no offset.
pub fn ldspr(state: &State, x: u8) -> Result<State, Chip8Error> {
    Ok(State {
        i: u16::from(state.v[x as usize]) * GLYPH_SIZE,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
/// Hundreds, tens, and ones digits at I, I+1, and I+2.
pub fn bcd(state: &State, x: u8) -> Result<State, Chip8Error> {
    let value = state.v[x as usize];
    let mut memory = state.memory;
    memory.write(state.i as usize, value / 100 % 10)?;
    memory.write(state.i as usize + 1, value / 10 % 10)?;
    memory.write(state.i as usize + 2, value % 10)?;
    Ok(State { memory, ..*state })
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &State, x: u8) -> Result<State, Chip8Error> {
    let mut memory = state.memory;
    for register in 0..=x as usize {
        memory.write(state.i as usize + register, state.v[register])?;
    }
    Ok(State { memory, ..*state })
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &State, x: u8) -> Result<State, Chip8Error> {
    let mut v = state.v;
    for register in 0..=x as usize {
        v[register] = state.memory.read(state.i as usize + register)?;
    }
    Ok(State { v, ..*state })
}
