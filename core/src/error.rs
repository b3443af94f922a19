use thiserror::Error;

/// Reasons a program image can be rejected at load time.
///
/// The core is left in its pre-load state when loading fails.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("program is {size} bytes but only {capacity} bytes fit above 0x200")]
    ProgramTooLarge { size: usize, capacity: usize },
}

/// Unrecoverable faults raised while executing a cycle.
///
/// A fault is fatal to the running program; the caller decides whether to
/// keep stepping the core afterwards.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Fault {
    #[error("call stack overflow: more than 16 nested calls")]
    StackOverflow,
    #[error("return with an empty call stack")]
    StackUnderflow,
    /// Only raised in strict mode; the permissive default logs and skips.
    #[error("illegal opcode {0:#06X}")]
    IllegalOpcode(u16),
}
