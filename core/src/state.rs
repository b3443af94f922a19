use crate::constants::{MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, STACK_DEPTH};
use crate::frame::FrameBuffer;

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
///
/// Pointer
/// - (sp) the number of return addresses currently on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per cycle
///
/// ## Memory
/// - a 16-entry stack of return addresses pushed by CALL
/// - 4096 bytes of addressable memory
///     - 0x000..0x200 is reserved; the sprite sheet lives at 0x000
///     - programs are loaded at 0x200 and nothing else writes below it
/// - a frame buffer holding the contents of the next frame to be drawn
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    pub fn new(width: usize, height: usize) -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[0..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: FrameBuffer::new(width, height),
            draw_flag: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

    #[test]
    fn test_sprite_sheet_is_preloaded() {
        let state = State::new(DISPLAY_WIDTH, DISPLAY_HEIGHT);
        assert_eq!(state.memory[0..5], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert!(state.memory[SPRITE_SHEET.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pc_starts_at_program_start() {
        let state = State::new(DISPLAY_WIDTH, DISPLAY_HEIGHT);
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.sp, 0);
    }
}
