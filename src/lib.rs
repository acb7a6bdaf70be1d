//! Instruction-level simulator for the LC3100, an 8-register,
//! word-addressed machine with 32-bit instructions.

pub mod cpu;
pub mod debug;
pub mod image;
pub mod mem;
