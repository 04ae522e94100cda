//! Execute: the ALU, branch resolution against the prediction made in IF,
//! and dispatch into the multiply/divide units.
//!
//! Reports back to decode/fetch whether EX can accept a new instruction
//! this cycle (`ExOutcome::hold_id_ex`) and whether a misprediction demands
//! a redirect.

use crate::core::pipeline::hazards::{resolve_forwarding, ForwardSel};
use crate::core::pipeline::latches::{ExMemLatch, IdExLatch};
use crate::core::pipeline::signals::{BranchType, OpASrc, OpBSrc};
use crate::core::units::{Alu, Multiplier};
use crate::core::{Cpu, ExOutcome};

pub fn tick(cpu: &mut Cpu) -> ExOutcome {
    // Conservative over-stall: while a sub-word store's read-modify-write is
    // still draining, EX touches nothing at all this cycle, regardless of
    // what's latched in ID/EX.
    if cpu.memory.store_in_flight() {
        cpu.stats.stalls_mem += 1;
        return ExOutcome {
            hold_id_ex: true,
            redirect: None,
        };
    }

    let id_ex = cpu.id_ex;
    if !id_ex.valid {
        cpu.ex_mem = ExMemLatch::bubble();
        return ExOutcome::default();
    }

    if id_ex.ctrl.alu.is_multiply() {
        return tick_multiply(cpu, id_ex);
    }
    if id_ex.ctrl.alu.is_divide() {
        return tick_divide(cpu, id_ex);
    }

    let (rs1_val, rs2_val) = forward_operands(cpu, &id_ex);

    let op_a = match id_ex.ctrl.a_src {
        OpASrc::Reg1 => rs1_val,
        OpASrc::Pc => id_ex.pc,
    };
    let op_b = match id_ex.ctrl.b_src {
        OpBSrc::Imm => id_ex.imm,
        OpBSrc::Reg2 => rs2_val,
        OpBSrc::Four => 4,
    };
    let alu_result = Alu::execute(id_ex.ctrl.alu, op_a, op_b);

    let redirect = resolve_branch(cpu, &id_ex, rs1_val, rs2_val);
    if redirect.is_some() {
        cpu.stats.stalls_control += 2;
    }

    cpu.ex_mem = ExMemLatch {
        pc: id_ex.pc,
        rd: id_ex.rd,
        alu_result,
        store_data: rs2_val,
        ctrl: id_ex.ctrl,
        valid: true,
    };

    ExOutcome {
        hold_id_ex: false,
        redirect,
    }
}

fn forward_operands(cpu: &Cpu, id_ex: &IdExLatch) -> (u32, u32) {
    let fwd = resolve_forwarding(
        id_ex,
        &cpu.ex_mem,
        &cpu.mem_wb,
        cpu.wb_bypass.map(|b| b.0),
        ex_result_available(&cpu.ex_mem),
    );
    (pick(fwd.rs1, id_ex.rv1, cpu), pick(fwd.rs2, id_ex.rv2, cpu))
}

fn pick(sel: ForwardSel, reg_val: u32, cpu: &Cpu) -> u32 {
    match sel {
        ForwardSel::Reg => reg_val,
        ForwardSel::ExByp => cpu.ex_mem.alu_result,
        ForwardSel::MemByp => cpu.mem_wb.writeback_value,
        ForwardSel::WbByp => cpu.wb_bypass.map(|b| b.1).unwrap_or(reg_val),
    }
}

/// EX/MEM's own result is forwardable unless it's a load: a load's
/// `alu_result` is the computed address, not the data MEM will fetch.
fn ex_result_available(ex_mem: &ExMemLatch) -> bool {
    ex_mem.valid && !ex_mem.ctrl.mem_read
}

/// Resolves a branch/jump against the IF-stage prediction, updates the
/// predictor's tables, and returns the PC to redirect to on a misprediction.
fn resolve_branch(cpu: &mut Cpu, id_ex: &IdExLatch, rs1_val: u32, rs2_val: u32) -> Option<u32> {
    let bt = id_ex.ctrl.branch_type;
    if bt == BranchType::None {
        return None;
    }

    let taken = match bt {
        BranchType::Jal | BranchType::Jalr => true,
        BranchType::Beq => rs1_val == rs2_val,
        BranchType::Bne => rs1_val != rs2_val,
        BranchType::Blt => (rs1_val as i32) < (rs2_val as i32),
        BranchType::Bge => (rs1_val as i32) >= (rs2_val as i32),
        BranchType::Bltu => rs1_val < rs2_val,
        BranchType::Bgeu => rs1_val >= rs2_val,
        BranchType::None => unreachable!(),
    };
    let target = match bt {
        BranchType::Jalr => rs1_val.wrapping_add(id_ex.imm) & !1u32,
        _ => id_ex.pc.wrapping_add(id_ex.imm),
    };

    let mispredicted = id_ex.pred_taken != taken || (taken && id_ex.pred_target != target);
    if bt.is_conditional() {
        cpu.stats.branch_predictions += 1;
        if mispredicted {
            cpu.stats.branch_mispredictions += 1;
        }
    }
    cpu.predictor.resolve(id_ex.pc, taken, target);

    if mispredicted {
        Some(if taken { target } else { id_ex.pc.wrapping_add(4) })
    } else {
        None
    }
}

fn tick_multiply(cpu: &mut Cpu, id_ex: IdExLatch) -> ExOutcome {
    cpu.stats.stalls_mul += 1;

    if !id_ex.mul_div_dispatched {
        let (rs1_val, rs2_val) = forward_operands(cpu, &id_ex);
        let product = Multiplier::compute(id_ex.ctrl.alu, rs1_val, rs2_val);
        cpu.multiplier.tick(Some((id_ex, product)));
        cpu.id_ex.mul_div_dispatched = true;
        cpu.ex_mem = ExMemLatch::bubble();
        return ExOutcome {
            hold_id_ex: true,
            redirect: None,
        };
    }

    match cpu.multiplier.tick(None) {
        Some(result) => {
            cpu.ex_mem = ExMemLatch {
                pc: result.source.pc,
                rd: result.source.rd,
                alu_result: result.value,
                store_data: 0,
                ctrl: result.source.ctrl,
                valid: true,
            };
            ExOutcome::default()
        }
        None => {
            cpu.ex_mem = ExMemLatch::bubble();
            ExOutcome {
                hold_id_ex: true,
                redirect: None,
            }
        }
    }
}

fn tick_divide(cpu: &mut Cpu, id_ex: IdExLatch) -> ExOutcome {
    cpu.stats.stalls_div += 1;

    if !id_ex.mul_div_dispatched {
        let (rs1_val, rs2_val) = forward_operands(cpu, &id_ex);
        cpu.divider.dispatch(id_ex, id_ex.ctrl.alu, rs1_val, rs2_val);
        cpu.id_ex.mul_div_dispatched = true;
        cpu.ex_mem = ExMemLatch::bubble();
        return ExOutcome {
            hold_id_ex: true,
            redirect: None,
        };
    }

    match cpu.divider.tick() {
        Some(result) => {
            cpu.ex_mem = ExMemLatch {
                pc: result.source.pc,
                rd: result.source.rd,
                alu_result: result.value,
                store_data: 0,
                ctrl: result.source.ctrl,
                valid: true,
            };
            ExOutcome::default()
        }
        None => {
            cpu.ex_mem = ExMemLatch::bubble();
            ExOutcome {
                hold_id_ex: true,
                redirect: None,
            }
        }
    }
}
