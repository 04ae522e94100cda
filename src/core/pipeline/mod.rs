//! Pipeline plumbing: control-signal vocabulary, single-slot inter-stage
//! latches, and the hazard/forwarding unit. The stage implementations
//! themselves live in `crate::core::stages`.

/// Data-hazard detection and forwarding selection.
pub mod hazards;

/// Single-slot inter-stage latches (IF/ID, ID/EX, EX/MEM, MEM/WB).
pub mod latches;

/// Control-signal vocabulary produced by decode.
pub mod signals;

/// `PipelineStage`/`PipelineLatch` traits.
pub mod traits;
