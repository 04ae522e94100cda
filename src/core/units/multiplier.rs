//! Pure Wallace-tree multiplier, modeled as a 3-stage shift-register
//! pipeline (M1/M2/M3) with one dispatch slot.
//!
//! The bit-level carry-save reduction a real Wallace tree performs has no
//! direct analog in a software model; what must stay cycle-accurate is the
//! *staging* this module names in its doc comment on [`Multiplier`] — one
//! dispatch per idle unit, 3-cycle latency, high/low half selection — so the
//! 64-bit product is computed up front at dispatch and simply rides the
//! shift register to its announced latency.

use crate::core::pipeline::latches::IdExLatch;
use crate::core::pipeline::signals::AluOp;

#[derive(Clone, Copy, Debug)]
struct InFlight {
    source: IdExLatch,
    result: u32,
}

/// Result handed back to EX the cycle it leaves the M3 stage: the
/// originating instruction plus its computed product.
#[derive(Clone, Copy, Debug)]
pub struct MulResult {
    pub source: IdExLatch,
    pub value: u32,
}

/// Three-slot shift-register pipeline: M1 (freshly dispatched), M2, M3
/// (about to retire).
#[derive(Default)]
pub struct Multiplier {
    m1: Option<InFlight>,
    m2: Option<InFlight>,
    m3: Option<InFlight>,
}

impl Multiplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any of the three stages holds an in-flight multiply; the
    /// hazard unit stalls dispatch of a new multiply while this holds.
    pub fn busy(&self) -> bool {
        self.m1.is_some() || self.m2.is_some() || self.m3.is_some()
    }

    /// Computes the requested product and returns the value to dispatch
    /// into M1 on the next [`Multiplier::tick`]. Panics if `op` is not a
    /// multiply variant — callers gate on `AluOp::is_multiply`.
    pub fn compute(op: AluOp, a: u32, b: u32) -> u32 {
        match op {
            AluOp::Mul => a.wrapping_mul(b),
            AluOp::Mulh => (((a as i32 as i64) * (b as i32 as i64)) >> 32) as u32,
            AluOp::Mulhsu => (((a as i32 as i64) * (b as u64 as i64)) >> 32) as u32,
            AluOp::Mulhu => (((a as u64) * (b as u64)) >> 32) as u32,
            _ => panic!("Multiplier::compute called with non-multiply op"),
        }
    }

    /// Advances the shift register by one cycle. `dispatch` is `Some` only
    /// when the caller observed `!busy()` before calling this; it carries
    /// the originating instruction and its already-computed product.
    /// Returns the result retiring out of M3 this cycle, if any.
    pub fn tick(&mut self, dispatch: Option<(IdExLatch, u32)>) -> Option<MulResult> {
        let retiring = self.m3.take();
        self.m3 = self.m2.take();
        self.m2 = self.m1.take();
        self.m1 = dispatch.map(|(source, result)| InFlight { source, result });
        retiring.map(|r| MulResult {
            source: r.source,
            value: r.result,
        })
    }
}
