use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid opcode: {opcode}")]
    InvalidOpcode { opcode: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Add = 0,
    Nand = 1,
    Lw = 2,
    Sw = 3,
    Beq = 4,
    Jalr = 5,
    Halt = 6,
    Noop = 7,
}

impl TryFrom<u32> for Opcode {
    type Error = DecodeError;

    fn try_from(opcode: u32) -> Result<Self, Self::Error> {
        match opcode {
            0 => Ok(Opcode::Add),
            1 => Ok(Opcode::Nand),
            2 => Ok(Opcode::Lw),
            3 => Ok(Opcode::Sw),
            4 => Ok(Opcode::Beq),
            5 => Ok(Opcode::Jalr),
            6 => Ok(Opcode::Halt),
            7 => Ok(Opcode::Noop),
            _ => Err(DecodeError::InvalidOpcode { opcode }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instr {
    // R-type
    Add { reg_a: u8, reg_b: u8, dest: u8 },
    Nand { reg_a: u8, reg_b: u8, dest: u8 },
    // I-type
    Lw { reg_a: u8, reg_b: u8, off: i32 },
    Sw { reg_a: u8, reg_b: u8, off: i32 },
    Beq { reg_a: u8, reg_b: u8, off: i32 },
    // J-type
    Jalr { reg_a: u8, reg_b: u8 },
    // O-type
    Halt,
    Noop,
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instr::Add { reg_a, reg_b, dest } => write!(f, "add {reg_a} {reg_b} {dest}"),
            Instr::Nand { reg_a, reg_b, dest } => write!(f, "nand {reg_a} {reg_b} {dest}"),
            Instr::Lw { reg_a, reg_b, off } => write!(f, "lw {reg_a} {reg_b} {off}"),
            Instr::Sw { reg_a, reg_b, off } => write!(f, "sw {reg_a} {reg_b} {off}"),
            Instr::Beq { reg_a, reg_b, off } => write!(f, "beq {reg_a} {reg_b} {off}"),
            Instr::Jalr { reg_a, reg_b } => write!(f, "jalr {reg_a} {reg_b}"),
            Instr::Halt => f.write_str("halt"),
            Instr::Noop => f.write_str("noop"),
        }
    }
}

/// Interprets a 16-bit field as a two's-complement value.
pub fn sign_extend(field: u16) -> i32 {
    if field & 0x8000 != 0 {
        field as i32 - 0x1_0000
    } else {
        field as i32
    }
}

pub fn decode(inst: i32) -> Result<Instr, DecodeError> {
    let inst = inst as u32;
    let opcode = Opcode::try_from((inst >> 22) & 0x7)?;
    let reg_a = ((inst >> 19) & 0x7) as u8;
    let reg_b = ((inst >> 16) & 0x7) as u8;
    let dest = (inst & 0x7) as u8;
    let off = sign_extend((inst & 0xffff) as u16);

    Ok(match opcode {
        Opcode::Add => Instr::Add { reg_a, reg_b, dest },
        Opcode::Nand => Instr::Nand { reg_a, reg_b, dest },
        Opcode::Lw => Instr::Lw { reg_a, reg_b, off },
        Opcode::Sw => Instr::Sw { reg_a, reg_b, off },
        Opcode::Beq => Instr::Beq { reg_a, reg_b, off },
        Opcode::Jalr => Instr::Jalr { reg_a, reg_b },
        Opcode::Halt => Instr::Halt,
        Opcode::Noop => Instr::Noop,
    })
}
