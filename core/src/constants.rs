/// Total addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Address where program bytes are loaded and where the PC starts.
pub const PROGRAM_START: u16 = 0x200;

/// Maximum number of nested subroutine calls.
pub const STACK_DEPTH: usize = 16;

/// Canonical display width in logical pixels.
pub const DISPLAY_WIDTH: usize = 64;

/// Canonical display height in logical pixels.
pub const DISPLAY_HEIGHT: usize = 32;

/// Bytes per glyph in the built-in sprite sheet.
pub const GLYPH_SIZE: u16 = 5;

/// # Sprite Sheet
/// The built-in hexadecimal font, preloaded at address 0x000.
///
/// Each glyph is 5 bytes tall and 8 bits (4 used) wide. `FX29` resolves the
/// glyph for a digit by multiplying it by `GLYPH_SIZE`.
///
/// e.g. the glyph for 0x0:
/// ```text
/// 0xF0 -> ####
/// 0x90 -> #  #
/// 0x90 -> #  #
/// 0x90 -> #  #
/// 0xF0 -> ####
/// ```
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
