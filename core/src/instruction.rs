use crate::error::Chip8Error;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations;
use crate::state::State;

/// A decoded instruction from the base 35-opcode set.
///
/// Decoding is total over valid opcodes and fails fast over everything else:
/// an unrecognized word is [`Chip8Error::UnknownOpcode`] and a `0NNN` machine
/// code routine call (anything in the `0` class other than CLS and RTS) is
/// [`Chip8Error::MachineCall`]. Both happen before any state is touched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0 clear the screen
    Clr,
    /// 00EE return from subroutine
    Rts,
    /// 1NNN jump
    Jump(u16),
    /// 2NNN call subroutine
    Call(u16),
    /// 3XKK skip if Vx == kk
    Ske(u8, u8),
    /// 4XKK skip if Vx != kk
    Skne(u8, u8),
    /// 5XY0 skip if Vx == Vy
    Skre(u8, u8),
    /// 6XKK Vx = kk
    Load(u8, u8),
    /// 7XKK Vx += kk
    Add(u8, u8),
    /// 8XY0 Vx = Vy
    Mv(u8, u8),
    /// 8XY1 Vx |= Vy
    Or(u8, u8),
    /// 8XY2 Vx &= Vy
    And(u8, u8),
    /// 8XY3 Vx ^= Vy
    Xor(u8, u8),
    /// 8XY4 Vx += Vy with carry
    Addr(u8, u8),
    /// 8XY5 Vx -= Vy with borrow
    Sub(u8, u8),
    /// 8XY6 Vx >>= 1
    Shr(u8),
    /// 8XY7 Vx = Vy - Vx with borrow
    Subn(u8, u8),
    /// 8XYE Vx <<= 1
    Shl(u8),
    /// 9XY0 skip if Vx != Vy
    Skrne(u8, u8),
    /// ANNN I = addr
    Loadi(u16),
    /// BNNN jump to V0 + addr
    Jumpi(u16),
    /// CXKK Vx = random & kk
    Rand(u8, u8),
    /// DXYN draw sprite
    Draw(u8, u8, u8),
    /// EX9E skip if key Vx pressed
    Skpr(u8),
    /// EXA1 skip if key Vx not pressed
    Skup(u8),
    /// FX07 Vx = delay timer
    Moved(u8),
    /// FX0A block until keypress
    Keyd(u8),
    /// FX15 delay timer = Vx
    Loads(u8),
    /// FX18 sound timer = Vx
    Ld(u8),
    /// FX1E I += Vx
    Addi(u8),
    /// FX29 I = glyph address for Vx
    Ldspr(u8),
    /// FX33 BCD of Vx at I..I+3
    Bcd(u8),
    /// FX55 store V0..=Vx at I
    Stor(u8),
    /// FX65 load V0..=Vx from I
    Read(u8),
}

impl Instruction {
    /// Decodes a raw opcode word.
    ///
    /// `pc` is the address the word was fetched from; it only appears in the
    /// error diagnostics.
    pub fn decode(op: u16, pc: u16) -> Result<Self, Chip8Error> {
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Clr,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Rts,
            (0x0, ..) => return Err(Chip8Error::MachineCall { opcode: op, pc }),
            (0x1, ..) => Instruction::Jump(op.addr()),
            (0x2, ..) => Instruction::Call(op.addr()),
            (0x3, ..) => Instruction::Ske(op.x(), op.kk()),
            (0x4, ..) => Instruction::Skne(op.x(), op.kk()),
            (0x5, .., 0x0) => Instruction::Skre(op.x(), op.y()),
            (0x6, ..) => Instruction::Load(op.x(), op.kk()),
            (0x7, ..) => Instruction::Add(op.x(), op.kk()),
            (0x8, .., 0x0) => Instruction::Mv(op.x(), op.y()),
            (0x8, .., 0x1) => Instruction::Or(op.x(), op.y()),
            (0x8, .., 0x2) => Instruction::And(op.x(), op.y()),
            (0x8, .., 0x3) => Instruction::Xor(op.x(), op.y()),
            (0x8, .., 0x4) => Instruction::Addr(op.x(), op.y()),
            (0x8, .., 0x5) => Instruction::Sub(op.x(), op.y()),
            (0x8, .., 0x6) => Instruction::Shr(op.x()),
            (0x8, .., 0x7) => Instruction::Subn(op.x(), op.y()),
            (0x8, .., 0xE) => Instruction::Shl(op.x()),
            (0x9, .., 0x0) => Instruction::Skrne(op.x(), op.y()),
            (0xA, ..) => Instruction::Loadi(op.addr()),
            (0xB, ..) => Instruction::Jumpi(op.addr()),
            (0xC, ..) => Instruction::Rand(op.x(), op.kk()),
            (0xD, ..) => Instruction::Draw(op.x(), op.y(), op.n()),
            (0xE, _, 0x9, 0xE) => Instruction::Skpr(op.x()),
            (0xE, _, 0xA, 0x1) => Instruction::Skup(op.x()),
            (0xF, _, 0x0, 0x7) => Instruction::Moved(op.x()),
            (0xF, _, 0x0, 0xA) => Instruction::Keyd(op.x()),
            (0xF, _, 0x1, 0x5) => Instruction::Loads(op.x()),
            (0xF, _, 0x1, 0x8) => Instruction::Ld(op.x()),
            (0xF, _, 0x1, 0xE) => Instruction::Addi(op.x()),
            (0xF, _, 0x2, 0x9) => Instruction::Ldspr(op.x()),
            (0xF, _, 0x3, 0x3) => Instruction::Bcd(op.x()),
            (0xF, _, 0x5, 0x5) => Instruction::Stor(op.x()),
            (0xF, _, 0x6, 0x5) => Instruction::Read(op.x()),
            _ => return Err(Chip8Error::UnknownOpcode { opcode: op, pc }),
        };
        Ok(instruction)
    }

    /// Applies the instruction to a state whose pc has already been advanced
    /// past the instruction word, yielding the next state.
    pub fn execute(self, state: &State, keypad: &Keypad) -> Result<State, Chip8Error> {
        match self {
            Instruction::Clr => operations::clr(state),
            Instruction::Rts => operations::rts(state),
            Instruction::Jump(addr) => operations::jump(state, addr),
            Instruction::Call(addr) => operations::call(state, addr),
            Instruction::Ske(x, kk) => operations::ske(state, x, kk),
            Instruction::Skne(x, kk) => operations::skne(state, x, kk),
            Instruction::Skre(x, y) => operations::skre(state, x, y),
            Instruction::Load(x, kk) => operations::load(state, x, kk),
            Instruction::Add(x, kk) => operations::add(state, x, kk),
            Instruction::Mv(x, y) => operations::mv(state, x, y),
            Instruction::Or(x, y) => operations::or(state, x, y),
            Instruction::And(x, y) => operations::and(state, x, y),
            Instruction::Xor(x, y) => operations::xor(state, x, y),
            Instruction::Addr(x, y) => operations::addr(state, x, y),
            Instruction::Sub(x, y) => operations::sub(state, x, y),
            Instruction::Shr(x) => operations::shr(state, x),
            Instruction::Subn(x, y) => operations::subn(state, x, y),
            Instruction::Shl(x) => operations::shl(state, x),
            Instruction::Skrne(x, y) => operations::skrne(state, x, y),
            Instruction::Loadi(addr) => operations::loadi(state, addr),
            Instruction::Jumpi(addr) => operations::jumpi(state, addr),
            Instruction::Rand(x, kk) => operations::rand(state, x, kk),
            Instruction::Draw(x, y, n) => operations::draw(state, x, y, n),
            Instruction::Skpr(x) => operations::skpr(state, keypad, x),
            Instruction::Skup(x) => operations::skup(state, keypad, x),
            Instruction::Moved(x) => operations::moved(state, x),
            Instruction::Keyd(x) => operations::keyd(state, keypad, x),
            Instruction::Loads(x) => operations::loads(state, x),
            Instruction::Ld(x) => operations::ld(state, x),
            Instruction::Addi(x) => operations::addi(state, x),
            Instruction::Ldspr(x) => operations::ldspr(state, x),
            Instruction::Bcd(x) => operations::bcd(state, x),
            Instruction::Stor(x) => operations::stor(state, x),
            Instruction::Read(x) => operations::read(state, x),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
    use crate::state::Mode;

    /// Decodes and executes `op` against `state` as the step cycle would:
    /// the pc handed to the operation is already advanced by 2.
    fn run(op: u16, state: &State, keypad: &Keypad) -> Result<State, Chip8Error> {
        let instruction = Instruction::decode(op, state.pc)?;
        let mut fetched = *state;
        fetched.pc += 0x2;
        instruction.execute(&fetched, keypad)
    }

    fn exec(op: u16, state: &State) -> State {
        run(op, state, &Keypad::new()).unwrap()
    }

    #[test]
    fn test_decode_unknown_opcode() {
        assert_eq!(
            Instruction::decode(0xF0FF, 0x0204),
            Err(Chip8Error::UnknownOpcode {
                opcode: 0xF0FF,
                pc: 0x0204
            })
        );
    }

    #[test]
    fn test_decode_machine_call() {
        assert_eq!(
            Instruction::decode(0x0123, 0x0200),
            Err(Chip8Error::MachineCall {
                opcode: 0x0123,
                pc: 0x0200
            })
        );
    }

    #[test]
    fn test_decode_5xy0_with_nonzero_low_nibble_is_unknown() {
        assert!(matches!(
            Instruction::decode(0x5121, 0x0200),
            Err(Chip8Error::UnknownOpcode { .. })
        ));
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        state.frame_buffer.xor_row(0, 0, 0xFF);
        state.frame_buffer.clear_dirty();
        let state = exec(0x00E0, &state);
        assert!(state
            .frame_buffer
            .pixels()
            .iter()
            .all(|row| row.iter().all(|p| *p == 0)));
        assert!(state.frame_buffer.is_dirty());
    }

    #[test]
    fn test_2nnn_00ee_call_ret_round_trip() {
        let state = State::new();
        let state = exec(0x2300, &state);
        assert_eq!(state.pc, 0x0300);
        assert_eq!(state.sp, 0x1);
        // The pushed return address points past the call
        assert_eq!(state.stack[0x0], 0x0202);
        let state = exec(0x00EE, &state);
        assert_eq!(state.pc, 0x0202);
        assert_eq!(state.sp, 0x0);
    }

    #[test]
    fn test_00ee_underflows_on_empty_stack() {
        let state = State::new();
        assert!(matches!(
            run(0x00EE, &state, &Keypad::new()),
            Err(Chip8Error::StackUnderflow)
        ));
    }

    #[test]
    fn test_2nnn_overflows_past_16_frames() {
        let mut state = State::new();
        state.sp = 16;
        assert!(matches!(
            run(0x2300, &state, &Keypad::new()),
            Err(Chip8Error::StackOverflow)
        ));
    }

    #[test]
    fn test_1nnn_jp() {
        let state = exec(0x1ABC, &State::new());
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_3xkk_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = exec(0x3111, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_3xkk_se_doesnt_skip() {
        let state = exec(0x3111, &State::new());
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_4xkk_sne_skips() {
        let state = exec(0x4111, &State::new());
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_4xkk_sne_doesnt_skip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = exec(0x4111, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = exec(0x5120, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = exec(0x9120, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesnt_skip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = exec(0x9120, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_6xkk_ld() {
        let state = exec(0x6122, &State::new());
        assert_eq!(state.v[0x1], 0x22);
    }

    #[test]
    fn test_7xkk_add_wraps_without_flag() {
        let mut state = State::new();
        state.v[0x1] = 250;
        state.v[0xF] = 0x7;
        let state = exec(0x710A, &state);
        assert_eq!(state.v[0x1], 4);
        // No flag side effect on the immediate add
        assert_eq!(state.v[0xF], 0x7);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        let state = exec(0x8120, &state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = exec(0x8121, &state);
        assert_eq!(state.v[0x1], 0x7);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = exec(0x8122, &state);
        assert_eq!(state.v[0x1], 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = exec(0x8123, &state);
        assert_eq!(state.v[0x1], 0x5);
    }

    #[test]
    fn test_8xy4_add_no_carry() {
        let mut state = State::new();
        state.v[0x1] = 0xEE;
        state.v[0x2] = 0x11;
        let state = exec(0x8124, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x11;
        let state = exec(0x8124, &state);
        assert_eq!(state.v[0x1], 0x10);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_no_borrow() {
        let mut state = State::new();
        state.v[0x1] = 5;
        state.v[0x2] = 3;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 2);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 3;
        state.v[0x2] = 5;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 254);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_lsb() {
        let mut state = State::new();
        state.v[0x1] = 0x5;
        let state = exec(0x8106, &state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_no_lsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = exec(0x8106, &state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy7_subn_no_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x33;
        let state = exec(0x8127, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x12;
        state.v[0x2] = 0x11;
        let state = exec(0x8127, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        let state = exec(0x810E, &state);
        assert_eq!(state.v[0x1], 0xFE);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_no_msb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = exec(0x810E, &state);
        assert_eq!(state.v[0x1], 0x8);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_annn_ld() {
        let state = exec(0xAABC, &State::new());
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = State::new();
        state.v[0x0] = 0x2;
        let state = exec(0xBABC, &state);
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_cxkk_rand_masks() {
        // The random byte is unpredictable; kk = 0 pins the result
        let mut state = State::new();
        state.v[0x1] = 0xAA;
        let state = exec(0xC100, &state);
        assert_eq!(state.v[0x1], 0x00);
    }

    #[test]
    fn test_dxyn_drw_draws_glyph() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        // Draw the 0x0 glyph with a 1x 1y offset
        let state = exec(0xD005, &state);
        let mut expected = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        expected[1][1..5].copy_from_slice(&[1, 1, 1, 1]);
        expected[2][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[3][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[4][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[5][1..5].copy_from_slice(&[1, 1, 1, 1]);
        assert!(state
            .frame_buffer
            .pixels()
            .iter()
            .zip(expected.iter())
            .all(|(a, b)| a[..] == b[..]));
        assert!(state.frame_buffer.is_dirty());
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_dxyn_drw_twice_cancels_and_collides() {
        let state = State::new();
        let first = exec(0xD005, &state);
        assert_eq!(first.v[0xF], 0x0);
        let second = exec(0xD005, &first);
        assert_eq!(second.v[0xF], 0x1);
        assert!(second
            .frame_buffer
            .pixels()
            .iter()
            .all(|row| row.iter().all(|p| *p == 0)));
    }

    #[test]
    fn test_dxyn_drw_wraps_origin_but_clips_overhang() {
        let mut state = State::new();
        state.v[0x0] = 62;
        state.v[0x1] = (DISPLAY_HEIGHT + 1) as u8;
        // Origin wraps to (62, 1); the glyph's right half falls off the edge
        let state = exec(0xD015, &state);
        assert_eq!(state.frame_buffer.pixels()[1][62..64], [1, 1]);
        assert_eq!(state.frame_buffer.pixels()[1][0..2], [0, 0]);
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = State::new();
        let mut keypad = Keypad::new();
        keypad.press(0xE);
        state.v[0x1] = 0xE;
        let state = run(0xE19E, &state, &keypad).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesnt_skip() {
        let mut state = State::new();
        state.v[0x1] = 0xE;
        let state = exec(0xE19E, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_ex9e_skp_tolerates_out_of_range_key() {
        let mut state = State::new();
        let mut keypad = Keypad::new();
        keypad.press(0xF);
        state.v[0x1] = 0xFF;
        let state = run(0xE19E, &state, &keypad).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips_when_released() {
        let mut state = State::new();
        state.v[0x1] = 0xE;
        let state = exec(0xE1A1, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesnt_skip_when_pressed() {
        let mut state = State::new();
        let mut keypad = Keypad::new();
        keypad.press(0xE);
        state.v[0x1] = 0xE;
        let state = run(0xE1A1, &state, &keypad).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx07_loads_delay_timer() {
        let mut state = State::new();
        state.delay_timer = 0x42;
        let state = exec(0xF107, &state);
        assert_eq!(state.v[0x1], 0x42);
    }

    #[test]
    fn test_fx0a_enters_awaiting_key() {
        let state = exec(0xF10A, &State::new());
        assert_eq!(state.mode, Mode::AwaitingKey { register: 0x1 });
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx0a_resolves_immediately_with_lowest_held_key() {
        let mut keypad = Keypad::new();
        keypad.press(0xB);
        keypad.press(0x3);
        let state = run(0xF10A, &State::new(), &keypad).unwrap();
        assert_eq!(state.mode, Mode::Running);
        assert_eq!(state.v[0x1], 0x3);
    }

    #[test]
    fn test_fx15_sets_delay_timer() {
        let mut state = State::new();
        state.v[0x1] = 0x42;
        let state = exec(0xF115, &state);
        assert_eq!(state.delay_timer, 0x42);
    }

    #[test]
    fn test_fx18_sets_sound_timer() {
        let mut state = State::new();
        state.v[0x1] = 0x42;
        let state = exec(0xF118, &state);
        assert_eq!(state.sound_timer, 0x42);
    }

    #[test]
    fn test_fx1e_adds_to_i() {
        let mut state = State::new();
        state.i = 0x100;
        state.v[0x1] = 0x10;
        let state = exec(0xF11E, &state);
        assert_eq!(state.i, 0x110);
    }

    #[test]
    fn test_fx29_points_at_glyph() {
        let mut state = State::new();
        state.v[0x1] = 0xA;
        let state = exec(0xF129, &state);
        assert_eq!(state.i, 50);
    }

    #[test]
    fn test_fx33_bcd() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x1] = 157;
        let state = exec(0xF133, &state);
        assert_eq!(state.memory.read(0x300).unwrap(), 1);
        assert_eq!(state.memory.read(0x301).unwrap(), 5);
        assert_eq!(state.memory.read(0x302).unwrap(), 7);
    }

    #[test]
    fn test_fx55_fx65_round_trip() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let stored = exec(0xF355, &state);
        let mut wiped = stored;
        wiped.v = [0; 16];
        let loaded = exec(0xF365, &wiped);
        assert_eq!(loaded.v[0x0..4], [0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(loaded.v[0x4..], [0; 12][..]);
    }

    #[test]
    fn test_fx55_faults_past_end_of_memory() {
        let mut state = State::new();
        state.i = 0xFFF;
        assert!(matches!(
            run(0xF155, &state, &Keypad::new()),
            Err(Chip8Error::MemoryOutOfBounds { .. })
        ));
    }
}
