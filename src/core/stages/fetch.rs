//! Instruction fetch: presents the PC to the memory arbiter (done for this
//! cycle back in the memory-access stage, since both share the one port)
//! and consults the branch predictor for where to fetch next.
//!
//! Priority this cycle: a redirect from EX overrides everything else; a
//! stall (either EX's own `hold_id_ex` or decode's load-use freeze) holds
//! the PC and IF/ID exactly where they are; otherwise the arbiter's
//! decision from memory-access settles it: denied means retry the same PC
//! with a bubble downstream, served means advance normally.

use crate::core::pipeline::latches::IfIdLatch;
use crate::core::{Cpu, ExOutcome};

pub fn tick(cpu: &mut Cpu, ex: &ExOutcome, freeze: bool) {
    if let Some(target) = ex.redirect {
        cpu.pc = target;
        cpu.if_id = IfIdLatch::bubble();
        return;
    }

    if freeze {
        return;
    }

    let fetch = cpu.pending_fetch;
    let Some(inst) = fetch.fetch_data else {
        // Arbiter gave priority to a load/store this cycle; decode already
        // consumed the old IF/ID, so this cycle feeds it a bubble and
        // retries the same PC next cycle.
        cpu.if_id = IfIdLatch::bubble();
        return;
    };

    let pred = cpu.predictor.predict(cpu.pc);
    cpu.if_id = IfIdLatch {
        pc: cpu.pc,
        inst,
        pred_taken: pred.taken,
        pred_target: pred.target.unwrap_or(cpu.pc.wrapping_add(4)),
        valid: true,
    };
    cpu.pc = if pred.taken {
        pred.target.unwrap_or(cpu.pc.wrapping_add(4))
    } else {
        cpu.pc.wrapping_add(4)
    };
}
