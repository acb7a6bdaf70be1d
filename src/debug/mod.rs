use std::fmt;
use std::io::{self, Write};

use crate::cpu::{Cpu, HaltReason, Machine, RunSummary};
use crate::mem::Memory;

/// Full machine state in the `@@@ ... end state` trace format.
pub struct StateDump<'a> {
    cpu: &'a Cpu,
    mem: &'a Memory,
}

impl<'a> StateDump<'a> {
    pub fn new(cpu: &'a Cpu, mem: &'a Memory) -> Self {
        Self { cpu, mem }
    }
}

impl fmt::Display for StateDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n@@@\nstate:\n")?;
        writeln!(f, "\tpc {}", self.cpu.pc)?;
        writeln!(f, "\tmemory:")?;
        for (i, word) in self.mem.loaded_words().iter().enumerate() {
            writeln!(f, "\t\tmem[ {i} ] {word}")?;
        }
        writeln!(f, "\tregisters:")?;
        for (i, reg) in self.cpu.regs.iter().enumerate() {
            writeln!(f, "\t\treg[ {i} ] {reg}")?;
        }
        writeln!(f, "end state")
    }
}

pub fn write_load_echo<W: Write>(out: &mut W, mem: &Memory) -> io::Result<()> {
    for (i, word) in mem.loaded_words().iter().enumerate() {
        writeln!(out, "memory[{i}]={word}")?;
    }
    Ok(())
}

pub fn write_summary<W: Write>(
    out: &mut W,
    machine: &Machine,
    summary: &RunSummary,
) -> io::Result<()> {
    match summary.reason {
        HaltReason::InstructionLimit(_) => writeln!(out, "{}", summary.reason)?,
        HaltReason::Halt | HaltReason::EndOfProgram => writeln!(out, "machine halted")?,
    }
    writeln!(out, "total of {} instructions executed", summary.executed)?;
    writeln!(out, "final state of machine:")?;
    write!(out, "{}", machine.dump())
}
