use super::IntoCpuResult;
use super::decode::Instr;
use super::trap::WithPc;
use crate::cpu::{Cpu, CpuStepResult, HaltReason};
use crate::mem::Memory;

pub fn execute(cpu: &mut Cpu, mem: &mut Memory, instr: Instr) -> Result<(), CpuStepResult> {
    let pc = cpu.pc;

    let r = |cpu: &Cpu, idx: u8| -> i32 { cpu.regs[idx as usize] };
    // No hardwired zero register.
    let w = |cpu: &mut Cpu, idx: u8, val: i32| cpu.regs[idx as usize] = val;
    let ea = |cpu: &Cpu, base: u8, off: i32| -> i64 { r(cpu, base) as i64 + off as i64 };

    match instr {
        Instr::Add { reg_a, reg_b, dest } => {
            let sum = r(cpu, reg_a).wrapping_add(r(cpu, reg_b));
            w(cpu, dest, sum);
            cpu.pc = pc.wrapping_add(1);
        }
        Instr::Nand { reg_a, reg_b, dest } => {
            let v = !(r(cpu, reg_a) & r(cpu, reg_b));
            w(cpu, dest, v);
            cpu.pc = pc.wrapping_add(1);
        }
        Instr::Lw { reg_a, reg_b, off } => {
            let word = mem.read(ea(cpu, reg_a, off)).with_pc(pc).into_cpu_result()?;
            w(cpu, reg_b, word);
            cpu.pc = pc.wrapping_add(1);
        }
        Instr::Sw { reg_a, reg_b, off } => {
            mem.write(ea(cpu, reg_a, off), r(cpu, reg_b))
                .with_pc(pc)
                .into_cpu_result()?;
            cpu.pc = pc.wrapping_add(1);
        }
        Instr::Beq { reg_a, reg_b, off } => {
            cpu.pc = if r(cpu, reg_a) == r(cpu, reg_b) {
                pc.wrapping_add(off).wrapping_add(1)
            } else {
                pc.wrapping_add(1)
            };
        }
        Instr::Jalr { reg_a, reg_b } => {
            // reg_a is read after the link write, so jalr r r lands on pc + 1
            w(cpu, reg_b, pc.wrapping_add(1));
            cpu.pc = r(cpu, reg_a);
        }
        Instr::Halt => {
            cpu.pc = pc.wrapping_add(1);
            return Err(CpuStepResult::Halt(HaltReason::Halt));
        }
        Instr::Noop => {
            cpu.pc = pc.wrapping_add(1);
        }
    }

    Ok(())
}
