//! Target-agnostic compilation passes.
//!
//! These passes operate purely on the DAG structure without consulting
//! target properties such as the coupling map. They are safe to run on any
//! circuit.

pub mod commutation;
pub mod optimization;

pub use commutation::{
    CommutationRewrite, CommutationRewriter, CommutationTable, DiagnosticKind,
    OperationDescriptor, RewriteReport, RuleEntry, SwapDiagnostic, SwapOutcome,
};
pub use optimization::{CommutativeCancellation, Optimize1qGates, RemoveResetInZeroState};
