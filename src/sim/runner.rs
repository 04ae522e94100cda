//! The top-level simulation loop: tick the CPU until it halts or hits its
//! configured cycle limit.

use crate::common::SimResult;
use crate::core::Cpu;

/// Runs `cpu` to completion. Returns `Ok(())` on a halt instruction, or the
/// `SimError::CycleLimitReached` from `Cpu::tick` on a timeout.
pub fn run(cpu: &mut Cpu) -> SimResult<()> {
    while !cpu.halted() {
        cpu.tick()?;
    }
    Ok(())
}
