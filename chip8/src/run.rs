use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::Chip8;
use chip8_display::Display;

use crate::keymap::keymap;

/// Rendered frames per second; the core runs N cycles per frame.
const FRAME_RATE: u32 = 60;

pub fn run(rom: &Path, scale: usize, cycles_per_frame: u32, strict: bool) -> anyhow::Result<()> {
    let mut chip8 = Chip8::new(DISPLAY_WIDTH, DISPLAY_HEIGHT);
    chip8.set_strict(strict);

    let program =
        fs::read(rom).with_context(|| format!("unable to read ROM {}", rom.display()))?;
    chip8
        .load_program(&program)
        .with_context(|| format!("unable to load ROM {}", rom.display()))?;

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, DISPLAY_WIDTH, DISPLAY_HEIGHT, scale)
        .map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let frame_time = Duration::from_secs(1) / FRAME_RATE;
    let mut keypad = [false; 16];

    'frame: loop {
        let frame_start = Instant::now();

        // Refresh the keypad snapshot once per frame
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'frame,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keypad[kc as usize] = true;
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keypad[kc as usize] = false;
                    }
                }
                _ => {}
            }
        }
        chip8.set_keypad(keypad);

        // Run this frame's share of CPU cycles
        for _ in 0..cycles_per_frame {
            chip8.step().context("emulation fault")?;
        }

        // Sound synthesis is out of scope; surface the one-shot signal
        if chip8.pending_beep() {
            log::info!("beep");
        }

        // If a redraw was requested, consume the flag and render
        if chip8.take_redraw_flag() {
            display.render(chip8.framebuffer()).map_err(|e| anyhow!(e))?;
        }

        let elapsed = frame_start.elapsed();
        if frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(())
}
