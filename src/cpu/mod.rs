pub mod decode;
pub mod exec;
pub mod trap;

use std::fmt;
use std::io::Write;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::debug::StateDump;
use crate::mem::Memory;
use trap::{Trap, WithPc};

/// Number of general-purpose registers.
pub const NUM_REGS: usize = 8;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    pub regs: [i32; NUM_REGS],
    pub pc: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// A `halt` instruction executed.
    Halt,
    /// The pc moved past the last loaded word.
    EndOfProgram,
    /// `max_insns` instructions executed.
    InstructionLimit(u64),
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Halt => f.write_str("halt instruction"),
            HaltReason::EndOfProgram => f.write_str("pc ran past the loaded program"),
            HaltReason::InstructionLimit(n) => write!(f, "instruction limit of {n} reached"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuStepResult {
    #[error("halted: {0}")]
    Halt(HaltReason),
    #[error(transparent)]
    Trapped(#[from] Trap),
}

pub(crate) trait IntoCpuResult<T> {
    fn into_cpu_result(self) -> Result<T, CpuStepResult>;
}

impl<T> IntoCpuResult<T> for Result<T, Trap> {
    fn into_cpu_result(self) -> Result<T, CpuStepResult> {
        self.map_err(CpuStepResult::Trapped)
    }
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Trap(#[from] Trap),
    #[error("failed to write trace output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: u64,
    pub reason: HaltReason,
}

pub struct Machine {
    pub cpu: Cpu,
    pub mem: Memory,
    /// Instructions executed so far, including a final `halt`.
    pub executed: u64,
    /// Stop after this many instructions (0 = no limit).
    pub max_insns: u64,
    /// Dump the state after every step.
    pub trace: bool,
    halted: bool,
}

impl Machine {
    pub fn new(mem: Memory) -> Self {
        Self {
            cpu: Cpu::default(),
            mem,
            executed: 0,
            max_insns: 0,
            trace: true,
            halted: false,
        }
    }

    pub fn fetch(&self) -> Result<i32, Trap> {
        self.mem.read(self.cpu.pc as i64).with_pc(self.cpu.pc)
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn dump(&self) -> StateDump<'_> {
        StateDump::new(&self.cpu, &self.mem)
    }

    pub fn step(&mut self) -> Result<(), CpuStepResult> {
        let pc = self.cpu.pc;

        // Fetch
        let inst = self.fetch().into_cpu_result()?;
        self.executed += 1;

        // Decode
        let decoded = decode::decode(inst).with_pc(pc).into_cpu_result()?;
        debug!(pc, inst, "{decoded}");

        // Execute
        let res = exec::execute(&mut self.cpu, &mut self.mem, decoded);
        if let Err(CpuStepResult::Halt(_)) = res {
            self.halted = true;
        }
        res
    }

    /// Steps until a halt, writing a state dump to `out` after each step
    /// when `trace` is set.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<RunSummary, RunError> {
        let reason = loop {
            if self.cpu.pc >= self.mem.loaded() as i32 {
                warn!(pc = self.cpu.pc, "pc ran past the loaded program without a halt");
                break HaltReason::EndOfProgram;
            }
            if self.max_insns != 0 && self.executed >= self.max_insns {
                warn!(limit = self.max_insns, "instruction limit reached");
                break HaltReason::InstructionLimit(self.max_insns);
            }

            let res = self.step();
            if let Err(CpuStepResult::Trapped(trap)) = res {
                return Err(trap.into());
            }
            if self.trace {
                write!(out, "{}", self.dump())?;
            }
            if let Err(CpuStepResult::Halt(reason)) = res {
                break reason;
            }
        };

        info!(executed = self.executed, %reason, "run finished");
        Ok(RunSummary {
            executed: self.executed,
            reason,
        })
    }
}
