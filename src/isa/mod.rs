//! Instruction Set Architecture definitions: opcode constants, bit-field
//! extraction, immediate generation, and the decode table.

pub mod decoder;
pub mod opcodes;

pub use decoder::{decode, Decoded};
