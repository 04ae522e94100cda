//! Write-back: commits MEM/WB's value to the register file, arms the
//! WB-stage bypass register for next cycle, and retires per-instruction
//! statistics.

use crate::core::pipeline::signals::InstCategory;
use crate::core::Cpu;

pub fn tick(cpu: &mut Cpu) {
    let wb = cpu.mem_wb;
    if !wb.valid {
        return;
    }

    if cpu.trace {
        tracing::debug!(pc = wb.pc, rd = wb.rd, value = wb.writeback_value, "retire");
    }

    if wb.reg_write {
        cpu.regs.write(wb.rd, wb.writeback_value);
        cpu.commit_wb_bypass(wb.rd, wb.writeback_value);
    }

    cpu.stats.instructions_retired += 1;
    match wb.category {
        InstCategory::Alu => cpu.stats.inst_alu += 1,
        InstCategory::Load => cpu.stats.inst_load += 1,
        InstCategory::Store => cpu.stats.inst_store += 1,
        InstCategory::Branch => cpu.stats.inst_branch += 1,
        InstCategory::System => cpu.stats.inst_system += 1,
        InstCategory::Mul => cpu.stats.inst_mul += 1,
        InstCategory::Div => cpu.stats.inst_div += 1,
    }

    if wb.halt {
        cpu.halted = true;
    }
}
