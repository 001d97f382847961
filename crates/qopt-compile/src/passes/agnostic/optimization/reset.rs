//! Removal of resets that act on a freshly initialized qubit.

use petgraph::Direction;
use petgraph::visit::EdgeRef;
use tracing::debug;

use qopt_ir::{CircuitDag, DagNode, NodeIndex};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

use super::remove_ops;

/// Removes every `reset` whose only predecessor is its qubit's `In` node.
///
/// Qubits start in |0⟩, so such a reset does nothing. Removing one can
/// expose another reset on the same wire; those go too.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveResetInZeroState;

impl RemoveResetInZeroState {
    /// Create the pass.
    pub fn new() -> Self {
        Self
    }

    fn leading_resets(dag: &CircuitDag) -> Vec<NodeIndex> {
        let graph = dag.graph();
        dag.qubits()
            .into_iter()
            .filter_map(|q| dag.qubit_input_node(q))
            .flat_map(move |input| graph.edges_directed(input, Direction::Outgoing))
            .map(|e| e.target())
            .filter(|&n| matches!(&graph[n], DagNode::Op(inst) if inst.is_reset()))
            .collect()
    }
}

impl Pass for RemoveResetInZeroState {
    fn name(&self) -> &'static str {
        "RemoveResetInZeroState"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        loop {
            let resets = Self::leading_resets(dag);
            if resets.is_empty() {
                return Ok(());
            }
            debug!("removing {} resets in the zero state", resets.len());
            remove_ops(dag, resets)?;
        }
    }
}
