//! Multi-cycle and combinational execution units used by the EX stage.

pub mod alu;
pub mod branch_predictor;
pub mod divider;
pub mod multiplier;

pub use alu::Alu;
pub use branch_predictor::BranchPredictor;
pub use divider::Divider;
pub use multiplier::Multiplier;
