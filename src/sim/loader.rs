//! Hex memory image loading.
//!
//! Images are plain text, one eight-hex-digit little-endian word per line,
//! loaded into the unified SRAM starting at word address 0.

use crate::common::SimResult;
use crate::core::Cpu;

/// Loads a hex memory image into `cpu`'s unified SRAM.
pub fn load_image(cpu: &mut Cpu, path: &str) -> SimResult<()> {
    tracing::info!(path, "loading memory image");
    cpu.load_image(path)
}
