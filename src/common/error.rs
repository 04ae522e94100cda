//! Error types surfaced by the simulator harness.
//!
//! These are failures of the *simulator*, not architectural conditions.
//! Divide-by-zero, signed-division overflow, and unaligned accesses are
//! normal RV32IM outcomes handled inside the pipeline and never appear here.

use thiserror::Error;

/// Errors that can abort a simulation run before or during execution.
#[derive(Debug, Error)]
pub enum SimError {
    /// A line in a hex memory image was not exactly 8 lowercase hex digits.
    #[error("malformed image line in {path} at line {line_no}: {text:?}")]
    MalformedImageLine {
        path: String,
        line_no: usize,
        text: String,
    },

    /// The supplied image has more words than the configured SRAM can hold.
    #[error("image has {words} words but memory capacity is {capacity} words")]
    ImageTooLarge { words: usize, capacity: usize },

    /// Failure reading an image or configuration file from disk.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure parsing a TOML configuration file.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The simulation reached its configured cycle limit without halting.
    #[error("cycle limit of {cycles} reached without a halt instruction")]
    CycleLimitReached { cycles: u64 },
}

/// Convenience alias used across the crate's fallible setup paths.
pub type SimResult<T> = Result<T, SimError>;
