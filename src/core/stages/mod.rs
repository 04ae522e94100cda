//! The five pipeline stages. Each module exposes a `tick` function invoked
//! once per cycle by [`crate::core::Cpu::tick`], in WB/MEM/EX/ID/IF order.

pub mod decode;
pub mod execute;
pub mod fetch;
pub mod memory_access;
pub mod write_back;
