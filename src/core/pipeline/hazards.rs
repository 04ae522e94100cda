//! Data-hazard detection and forwarding selection.
//!
//! Combinational: given the current ID/EX, EX/MEM, and MEM/WB latches, pick
//! each operand's source and decide whether IF/ID must stall.

use crate::core::pipeline::latches::{ExMemLatch, IdExLatch, MemWbLatch};

/// True when a load currently heading into MEM (`producer_*`, this cycle's
/// freshly produced EX/MEM latch) will write a register the instruction now
/// in ID needs as a source this cycle. The loaded value is not ready for
/// forwarding until MEM completes next cycle, so ID must stall one cycle.
pub fn need_stall_load_use(
    producer_valid: bool,
    producer_is_load: bool,
    producer_rd: usize,
    next_rs1: usize,
    next_rs2: usize,
    next_uses: (bool, bool),
) -> bool {
    if !producer_valid || !producer_is_load || producer_rd == 0 {
        return false;
    }
    (next_uses.0 && producer_rd == next_rs1) || (next_uses.1 && producer_rd == next_rs2)
}

/// Selected operand source for the EX-stage bypass mux.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardSel {
    /// Use the value read from the register file in ID.
    Reg,
    /// Bypass from the EX/MEM latch (the instruction one cycle ahead).
    ExByp,
    /// Bypass from the MEM/WB latch (two cycles ahead).
    MemByp,
    /// Bypass from the already-retired WB-stage value (three cycles ahead).
    WbByp,
}

/// Forwarding decisions for both ALU operands.
#[derive(Clone, Copy, Debug)]
pub struct ForwardDecision {
    pub rs1: ForwardSel,
    pub rs2: ForwardSel,
}

/// Picks each operand's freshest available producer.
///
/// Priority (freshest first): EX/MEM's result if it is available this
/// cycle (i.e. not itself a pending load or a busy multiply/divide),
/// then MEM/WB, then the WB-stage bypass register, else the register file.
pub fn resolve_forwarding(
    id_ex: &IdExLatch,
    ex_mem: &ExMemLatch,
    mem_wb: &MemWbLatch,
    wb_byp_rd: Option<usize>,
    ex_result_available: bool,
) -> ForwardDecision {
    let pick = |idx: usize, used: bool| -> ForwardSel {
        if !used || idx == 0 {
            return ForwardSel::Reg;
        }
        if ex_result_available && ex_mem.valid && ex_mem.rd == idx && ex_mem.ctrl.reg_write {
            return ForwardSel::ExByp;
        }
        if mem_wb.valid && mem_wb.rd == idx && mem_wb.reg_write {
            return ForwardSel::MemByp;
        }
        if wb_byp_rd == Some(idx) {
            return ForwardSel::WbByp;
        }
        ForwardSel::Reg
    };

    ForwardDecision {
        rs1: pick(id_ex.rs1, id_ex.rs1_used),
        rs2: pick(id_ex.rs2, id_ex.rs2_used),
    }
}
