use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Fault, LoadError};
use crate::frame::FrameBuffer;
use crate::instruction::Instruction;
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - the current `state` (memory, registers, stack, timers, frame buffer)
///  - the latest `keypad` snapshot plus the most recent rising-edge key
///  - the one-shot beep signal latched when the sound timer runs out
///
/// Supplies interfaces for:
/// - loading programs
/// - advancing the CPU one fetch-decode-execute cycle at a time
/// - refreshing the keypad snapshot once per external frame
/// - inspecting its frame buffer for rendering by some display
///
/// `step` never blocks, not even for the key-wait instruction; the caller
/// owns the clock and calls `step` again on the next tick.
pub struct Chip8 {
    pub(crate) state: State,
    pub(crate) keypad: [bool; 16],
    pub(crate) last_pressed: Option<u8>,
    pub(crate) rng: Box<dyn RngCore>,
    pub(crate) strict: bool,
    pending_beep: bool,
}

impl Chip8 {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_rng(width, height, Box::new(StdRng::from_entropy()))
    }

    /// Builds a core with a caller-supplied random-byte source so `CXNN`
    /// can be made deterministic.
    pub fn with_rng(width: usize, height: usize, rng: Box<dyn RngCore>) -> Self {
        Chip8 {
            state: State::new(width, height),
            keypad: [false; 16],
            last_pressed: None,
            rng,
            strict: false,
            pending_beep: false,
        }
    }

    /// When strict, unknown opcodes halt with `Fault::IllegalOpcode` instead
    /// of being logged and skipped.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Copies a program image into memory starting at 0x200.
    ///
    /// Rejects programs that would not fit instead of truncating; memory is
    /// untouched on failure.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        let capacity = MEMORY_SIZE - PROGRAM_START as usize;
        if program.len() > capacity {
            return Err(LoadError::ProgramTooLarge {
                size: program.len(),
                capacity,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + program.len()].copy_from_slice(program);
        log::info!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Advances the CPU by a single cycle:
    /// - fetches and decodes the opcode at the PC
    /// - executes it
    /// - decrements the timers, latching the beep signal on sound 1 -> 0
    pub fn step(&mut self) -> Result<(), Fault> {
        let op = self.fetch();
        let instruction = Instruction::decode(op);
        log::trace!(
            "{:04X} {:?} v{:02X?} i{:04X} pc{:04X}",
            op,
            instruction,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        self.execute(instruction)?;
        self.tick_timers();
        Ok(())
    }

    /// Replaces the keypad snapshot; called once per external frame.
    ///
    /// Keys that changed from released to pressed are remembered as the most
    /// recent press for the key-wait instruction to consume.
    pub fn set_keypad(&mut self, keypad: [bool; 16]) {
        for key in 0..16 {
            if keypad[key] && !self.keypad[key] {
                self.last_pressed = Some(key as u8);
            }
        }
        self.keypad = keypad;
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// The pixel at (x, y), wrapped modulo the display dimensions.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.state.frame_buffer.pixel(x, y)
    }

    /// Returns whether a redraw was requested and clears the request.
    pub fn take_redraw_flag(&mut self) -> bool {
        std::mem::replace(&mut self.state.draw_flag, false)
    }

    /// Returns whether the sound timer ran out since the last call and
    /// clears the signal.
    pub fn pending_beep(&mut self) -> bool {
        std::mem::replace(&mut self.pending_beep, false)
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two
    /// subsequent bytes big-endian.
    fn fetch(&self) -> u16 {
        let left = u16::from(self.state.memory[self.state.pc as usize % MEMORY_SIZE]);
        let right = u16::from(self.state.memory[(self.state.pc as usize + 1) % MEMORY_SIZE]);
        left << 8 | right
    }

    /// Handles the delay and sound timers after each executed cycle.
    fn tick_timers(&mut self) {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }
        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
            if self.state.sound_timer == 0 {
                self.pending_beep = true;
                log::debug!("beep");
            }
        }
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_combines_bytes_big_endian() {
        let mut chip8 = Chip8::default();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(chip8.fetch(), 0xAABB);
    }

    #[test]
    fn test_load_program_copies_to_program_start() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[0x12, 0x34]).unwrap();
        assert_eq!(chip8.state.memory[0x200..0x202], [0x12, 0x34]);
    }

    #[test]
    fn test_load_program_rejects_oversized_images() {
        let mut chip8 = Chip8::default();
        let program = vec![0xFF; MEMORY_SIZE - 0x200 + 1];
        assert_eq!(
            chip8.load_program(&program),
            Err(LoadError::ProgramTooLarge {
                size: MEMORY_SIZE - 0x200 + 1,
                capacity: MEMORY_SIZE - 0x200,
            })
        );
        // memory is untouched on failure
        assert!(chip8.state.memory[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_program_accepts_maximum_size() {
        let mut chip8 = Chip8::default();
        let program = vec![0xFF; MEMORY_SIZE - 0x200];
        assert!(chip8.load_program(&program).is_ok());
        assert_eq!(chip8.state.memory[MEMORY_SIZE - 1], 0xFF);
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[0x00, 0xE0]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
    }

    // Load V0=5, V1=3, then V0 += V1
    #[test]
    fn test_step_sequence_adds_registers() {
        let mut chip8 = Chip8::default();
        chip8
            .load_program(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14])
            .unwrap();
        for _ in 0..3 {
            chip8.step().unwrap();
        }
        assert_eq!(chip8.state.v[0x0], 8);
        assert_eq!(chip8.state.v[0xF], 0);
        assert_eq!(chip8.state.pc, 0x206);
    }

    #[test]
    fn test_set_keypad_records_rising_edges() {
        let mut chip8 = Chip8::default();
        let mut keypad = [false; 16];
        keypad[0xE] = true;
        chip8.set_keypad(keypad);
        assert_eq!(chip8.last_pressed, Some(0xE));

        // a held key is not a new press
        chip8.last_pressed = None;
        chip8.set_keypad(keypad);
        assert_eq!(chip8.last_pressed, None);
    }

    #[test]
    fn test_wait_key_repolls_until_a_key_arrives() {
        let mut chip8 = Chip8::default();
        // FX0A on V1
        chip8.load_program(&[0xF1, 0x0A]).unwrap();

        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x200);

        let mut keypad = [false; 16];
        keypad[0xE] = true;
        chip8.set_keypad(keypad);
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0x1], 0xE);
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_timers_decrement_once_per_step() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[0x00, 0xE0, 0x00, 0xE0]).unwrap();
        chip8.state.delay_timer = 2;
        chip8.step().unwrap();
        assert_eq!(chip8.state.delay_timer, 1);
        chip8.step().unwrap();
        assert_eq!(chip8.state.delay_timer, 0);
    }

    #[test]
    fn test_beep_latches_when_sound_timer_runs_out() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[0x00, 0xE0, 0x00, 0xE0]).unwrap();
        chip8.state.sound_timer = 2;

        chip8.step().unwrap();
        assert!(!chip8.pending_beep());

        chip8.step().unwrap();
        assert!(chip8.pending_beep());
        // one-shot: reading the signal clears it
        assert!(!chip8.pending_beep());
    }

    #[test]
    fn test_take_redraw_flag_clears_it() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[0x00, 0xE0]).unwrap();
        chip8.step().unwrap();
        assert!(chip8.take_redraw_flag());
        assert!(!chip8.take_redraw_flag());
    }

    #[test]
    fn test_permissive_mode_skips_unknown_opcodes() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[0x01, 0x23]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_strict_mode_faults_on_unknown_opcodes() {
        let mut chip8 = Chip8::default();
        chip8.set_strict(true);
        chip8.load_program(&[0x01, 0x23]).unwrap();
        assert_eq!(chip8.step(), Err(Fault::IllegalOpcode(0x0123)));
        // pc stays on the faulting instruction
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut results = Vec::new();
        for _ in 0..2 {
            let mut chip8 =
                Chip8::with_rng(DISPLAY_WIDTH, DISPLAY_HEIGHT, Box::new(StdRng::seed_from_u64(7)));
            chip8.load_program(&[0xC0, 0xFF]).unwrap();
            chip8.step().unwrap();
            results.push(chip8.state.v[0x0]);
        }
        assert_eq!(results[0], results[1]);
    }
}
