//! Built-in compilation passes.
//!
//! Passes are organized into two categories:
//! - [`agnostic`]: passes that operate purely on DAG structure
//! - [`target`]: passes that require hardware properties

pub mod agnostic;
pub mod target;

pub use agnostic::{
    CommutationRewrite, CommutationRewriter, CommutationTable, CommutativeCancellation,
    Optimize1qGates, RemoveResetInZeroState, RewriteReport, SwapOutcome,
};
pub use target::{BasicRouting, TrivialLayout};
