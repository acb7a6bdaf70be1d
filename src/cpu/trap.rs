use crate::cpu::decode::DecodeError;
use crate::mem::MemError;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trap {
    #[error("invalid opcode {opcode} at pc={pc}")]
    IllegalInstruction { pc: i32, opcode: u32 },

    #[error("memory error at pc={pc}: {err}")]
    Mem { pc: i32, err: MemError },
}

/// Trait for adding PC context to errors that can become Traps
pub trait WithPc<T> {
    fn with_pc(self, pc: i32) -> Result<T, Trap>;
}

impl<T> WithPc<T> for Result<T, MemError> {
    fn with_pc(self, pc: i32) -> Result<T, Trap> {
        self.map_err(|err| Trap::Mem { pc, err })
    }
}

impl<T> WithPc<T> for Result<T, DecodeError> {
    fn with_pc(self, pc: i32) -> Result<T, Trap> {
        self.map_err(|err| match err {
            DecodeError::InvalidOpcode { opcode } => Trap::IllegalInstruction { pc, opcode },
        })
    }
}
