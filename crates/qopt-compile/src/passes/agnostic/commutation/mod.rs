//! Commutation-based DAG rewriting.
//!
//! A [`CommutationTable`] says which ordered gate-name pairs commute; the
//! [`CommutationRewriter`] walks the DAG once and exchanges directly
//! connected pairs the table allows.

mod rewriter;
mod rules;


pub use rewriter::{
    CommutationRewrite, CommutationRewriter, DiagnosticKind, RewriteReport, SwapDiagnostic,
    SwapOutcome,
};
pub use rules::{CommutationTable, OperationDescriptor, RuleEntry};
