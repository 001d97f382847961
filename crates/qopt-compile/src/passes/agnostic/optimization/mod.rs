//! Gate-count reduction passes.

mod cancel;
mod optimize_1q;
mod reset;


use qopt_ir::{CircuitDag, NodeIndex};

use crate::error::CompileResult;

pub use cancel::CommutativeCancellation;
pub use optimize_1q::Optimize1qGates;
pub use reset::RemoveResetInZeroState;

/// Tolerance for angle comparisons.
pub(super) const EPSILON: f64 = 1e-10;

/// Remove a batch of operation nodes.
///
/// Highest index first, so petgraph's swap-remove never moves a node that
/// is still waiting to be removed.
fn remove_ops(dag: &mut CircuitDag, mut nodes: Vec<NodeIndex>) -> CompileResult<()> {
    nodes.sort_unstable_by(|a, b| b.index().cmp(&a.index()));
    nodes.dedup();
    for node in nodes {
        dag.remove_op(node)?;
    }
    Ok(())
}
