//! Single-slot inter-stage pipeline latches.
//!
//! Unlike a superscalar bundle, each latch here holds at most one
//! in-flight instruction: a plain value struct re-written every cycle.
//! Flushing (on redirect) replaces the latch with its `Default`, which
//! carries `ControlSignals::default()` and therefore behaves as a NOP.

use crate::core::pipeline::signals::{ControlSignals, InstCategory};
use crate::core::pipeline::traits::PipelineLatch;

/// IF/ID latch: what fetch handed to decode.
#[derive(Clone, Copy, Debug, Default)]
pub struct IfIdLatch {
    pub pc: u32,
    pub inst: u32,
    pub pred_taken: bool,
    pub pred_target: u32,
    pub valid: bool,
}

/// ID/EX latch: a fully decoded instruction ready for execution.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdExLatch {
    pub pc: u32,
    pub rs1: usize,
    pub rs2: usize,
    pub rd: usize,
    pub rs1_used: bool,
    pub rs2_used: bool,
    pub rv1: u32,
    pub rv2: u32,
    pub imm: u32,
    pub ctrl: ControlSignals,
    pub pred_taken: bool,
    pub pred_target: u32,
    pub valid: bool,
    /// Set by EX once it has dispatched this instruction's multiply or
    /// divide into its unit, so a stalled re-presentation of the same
    /// latch does not dispatch a second time.
    pub mul_div_dispatched: bool,
}

/// EX/MEM latch: the ALU/branch result, ready for memory access.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExMemLatch {
    pub pc: u32,
    pub rd: usize,
    pub alu_result: u32,
    pub store_data: u32,
    pub ctrl: ControlSignals,
    pub valid: bool,
}

/// MEM/WB latch: the value that will be committed to the register file.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemWbLatch {
    pub pc: u32,
    pub rd: usize,
    pub writeback_value: u32,
    pub reg_write: bool,
    pub halt: bool,
    pub category: InstCategory,
    pub valid: bool,
}

impl IfIdLatch {
    pub fn bubble() -> Self {
        Self::default()
    }
}

impl IdExLatch {
    pub fn bubble() -> Self {
        Self::default()
    }
}

impl ExMemLatch {
    pub fn bubble() -> Self {
        Self::default()
    }
}

impl MemWbLatch {
    pub fn bubble() -> Self {
        Self::default()
    }
}

impl PipelineLatch for IfIdLatch {
    fn flush(&mut self) {
        *self = Self::bubble();
    }
    fn is_empty(&self) -> bool {
        !self.valid
    }
}

impl PipelineLatch for IdExLatch {
    fn flush(&mut self) {
        *self = Self::bubble();
    }
    fn is_empty(&self) -> bool {
        !self.valid
    }
}

impl PipelineLatch for ExMemLatch {
    fn flush(&mut self) {
        *self = Self::bubble();
    }
    fn is_empty(&self) -> bool {
        !self.valid
    }
}

impl PipelineLatch for MemWbLatch {
    fn flush(&mut self) {
        *self = Self::bubble();
    }
    fn is_empty(&self) -> bool {
        !self.valid
    }
}
