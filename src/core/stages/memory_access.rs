//! Memory access: presents the unified arbiter with this cycle's fetch
//! address plus whatever load or store EX/MEM carries, and builds the
//! MEM/WB latch from whatever the arbiter served.
//!
//! A sub-word store spans two calls to this stage: the first starts the
//! read-modify-write (arbiter reports `store_busy`) and this stage holds
//! the instruction out of WB; the second observes `store_busy == false` and
//! retires it normally. EX keeps the same instruction latched in ID/EX
//! across both cycles by conservatively stalling on `store_in_flight`.

use crate::core::pipeline::latches::MemWbLatch;
use crate::core::pipeline::signals::{HaltKind, MemWidth};
use crate::core::Cpu;
use crate::memory::{extend_load, AccessWidth, LoadRequest, StoreRequest};

pub fn tick(cpu: &mut Cpu) {
    let ex_mem = cpu.ex_mem;

    if !ex_mem.valid {
        cpu.pending_fetch = cpu.memory.cycle(Some(cpu.pc), None, None);
        cpu.mem_wb = MemWbLatch::bubble();
        return;
    }

    let load = ex_mem.ctrl.mem_read.then_some(LoadRequest {
        byte_addr: ex_mem.alu_result,
    });
    let store = ex_mem
        .ctrl
        .mem_write
        .then(|| access_width(ex_mem.ctrl.width))
        .flatten()
        .map(|width| StoreRequest {
            byte_addr: ex_mem.alu_result,
            value: ex_mem.store_data,
            width,
        });

    let result = cpu.memory.cycle(Some(cpu.pc), load, store);
    cpu.pending_fetch = result;

    if let Some((addr, value)) = result.mmio_write {
        tracing::info!(addr, value, "mmio write");
    }

    if ex_mem.ctrl.mem_write && result.store_busy {
        cpu.mem_wb = MemWbLatch::bubble();
        return;
    }

    let writeback_value = if ex_mem.ctrl.is_link {
        ex_mem.alu_result
    } else if ex_mem.ctrl.mem_read {
        extend_load(
            result.load_data.expect("load request must be served the same cycle"),
            ex_mem.alu_result,
            access_width(ex_mem.ctrl.width).unwrap_or(AccessWidth::Word),
            ex_mem.ctrl.unsigned_load,
        )
    } else {
        ex_mem.alu_result
    };

    cpu.mem_wb = MemWbLatch {
        pc: ex_mem.pc,
        rd: ex_mem.rd,
        writeback_value,
        reg_write: ex_mem.ctrl.reg_write,
        halt: ex_mem.ctrl.halt != HaltKind::None,
        category: ex_mem.ctrl.category,
        valid: true,
    };
}

fn access_width(w: MemWidth) -> Option<AccessWidth> {
    match w {
        MemWidth::Byte => Some(AccessWidth::Byte),
        MemWidth::Half => Some(AccessWidth::Half),
        MemWidth::Word => Some(AccessWidth::Word),
        MemWidth::Nop => None,
    }
}
