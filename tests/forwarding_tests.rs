//! Tests for data-hazard detection and forwarding selection.

use rv32im_pipeline_sim::core::pipeline::hazards::{
    need_stall_load_use, resolve_forwarding, ForwardSel,
};
use rv32im_pipeline_sim::core::pipeline::latches::{ExMemLatch, IdExLatch, MemWbLatch};
use rv32im_pipeline_sim::core::pipeline::signals::ControlSignals;

fn id_ex_using(rs1: usize, rs2: usize, rs1_used: bool, rs2_used: bool) -> IdExLatch {
    IdExLatch {
        rs1,
        rs2,
        rs1_used,
        rs2_used,
        valid: true,
        ..Default::default()
    }
}

fn ex_mem_writing(rd: usize, alu_result: u32, mem_read: bool) -> ExMemLatch {
    ExMemLatch {
        rd,
        alu_result,
        ctrl: ControlSignals {
            reg_write: true,
            mem_read,
            ..Default::default()
        },
        valid: true,
    }
}

fn mem_wb_writing(rd: usize, value: u32) -> MemWbLatch {
    MemWbLatch {
        rd,
        writeback_value: value,
        reg_write: true,
        valid: true,
        ..Default::default()
    }
}

#[test]
fn test_forward_from_ex_mem() {
    let id_ex = id_ex_using(1, 0, true, false);
    let ex_mem = ex_mem_writing(1, 0xDEAD_BEEF, false);
    let mem_wb = MemWbLatch::default();

    let fwd = resolve_forwarding(&id_ex, &ex_mem, &mem_wb, None, true);
    assert_eq!(fwd.rs1, ForwardSel::ExByp);
}

#[test]
fn test_forward_from_mem_wb() {
    let id_ex = id_ex_using(1, 0, true, false);
    let ex_mem = ExMemLatch::default();
    let mem_wb = mem_wb_writing(1, 0xCAFE_BABE);

    let fwd = resolve_forwarding(&id_ex, &ex_mem, &mem_wb, None, false);
    assert_eq!(fwd.rs1, ForwardSel::MemByp);
}

#[test]
fn test_forward_from_wb_bypass() {
    let id_ex = id_ex_using(1, 0, true, false);
    let ex_mem = ExMemLatch::default();
    let mem_wb = MemWbLatch::default();

    let fwd = resolve_forwarding(&id_ex, &ex_mem, &mem_wb, Some(1), false);
    assert_eq!(fwd.rs1, ForwardSel::WbByp);
}

#[test]
fn test_ex_mem_priority_over_mem_wb() {
    let id_ex = id_ex_using(1, 0, true, false);
    let ex_mem = ex_mem_writing(1, 0x1000, false);
    let mem_wb = mem_wb_writing(1, 0x2000);

    let fwd = resolve_forwarding(&id_ex, &ex_mem, &mem_wb, None, true);
    assert_eq!(fwd.rs1, ForwardSel::ExByp);
}

#[test]
fn test_no_forward_from_load_in_ex_mem() {
    // EX/MEM's own alu_result is the load's address, not its data, so it is
    // never forwardable regardless of `ex_result_available`.
    let id_ex = id_ex_using(1, 0, true, false);
    let ex_mem = ex_mem_writing(1, 0xDEAD_BEEF, true);
    let mem_wb = MemWbLatch::default();

    let fwd = resolve_forwarding(&id_ex, &ex_mem, &mem_wb, None, false);
    assert_eq!(fwd.rs1, ForwardSel::Reg);
}

#[test]
fn test_no_forward_to_x0() {
    let id_ex = id_ex_using(0, 0, true, false);
    let ex_mem = ex_mem_writing(0, 0xDEAD_BEEF, false);
    let mem_wb = MemWbLatch::default();

    let fwd = resolve_forwarding(&id_ex, &ex_mem, &mem_wb, None, true);
    assert_eq!(fwd.rs1, ForwardSel::Reg);
}

#[test]
fn test_no_forward_when_source_not_used() {
    let id_ex = id_ex_using(1, 0, false, false);
    let ex_mem = ex_mem_writing(1, 0xDEAD_BEEF, false);
    let mem_wb = MemWbLatch::default();

    let fwd = resolve_forwarding(&id_ex, &ex_mem, &mem_wb, None, true);
    assert_eq!(fwd.rs1, ForwardSel::Reg);
}

#[test]
fn test_load_use_hazard_detected() {
    // `lw x1, 0(x2)` now heading into MEM, `add x3, x1, x4` right behind it.
    assert!(need_stall_load_use(true, true, 1, 1, 4, (true, true)));
}

#[test]
fn test_load_use_no_hazard_different_register() {
    assert!(!need_stall_load_use(true, true, 1, 2, 4, (true, true)));
}

#[test]
fn test_load_use_no_hazard_not_a_load() {
    assert!(!need_stall_load_use(true, false, 1, 1, 4, (true, true)));
}

#[test]
fn test_load_use_no_hazard_rd_zero() {
    assert!(!need_stall_load_use(true, true, 0, 0, 4, (true, true)));
}

#[test]
fn test_load_use_no_hazard_producer_invalid() {
    assert!(!need_stall_load_use(false, true, 1, 1, 4, (true, true)));
}
