pub use chip8::Chip8;
pub use error::{Fault, LoadError};
pub use frame::FrameBuffer;
pub use instruction::Instruction;

mod chip8;
pub mod constants;
mod error;
mod frame;
mod instruction;
mod opcode;
mod operations;
mod state;
