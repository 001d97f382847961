//! Cancellation of adjacent inverse pairs and merging of rotations.

use petgraph::Direction;
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashSet;
use tracing::debug;

use qopt_ir::{CircuitDag, Instruction, NodeIndex, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::unitary::Unitary2x2;

use super::{EPSILON, remove_ops};

/// What to do with a matched pair.
#[derive(Debug)]
enum Rewrite {
    /// Remove both nodes.
    Cancel(NodeIndex, NodeIndex),
    /// Replace the first node's gate and remove the second.
    Merge(NodeIndex, NodeIndex, StandardGate),
}

/// Commutative cancellation pass.
///
/// Repeats until nothing changes (at most [`Self::MAX_ITERATIONS`] rounds):
///
/// - two directly adjacent copies of a self-inverse gate (`h`, `x`, `y`,
///   `z`, `cx`, `cz`, `swap`, ...) on the same qubit list are removed;
/// - two directly adjacent rotations about the same axis (`rx`, `ry`, `rz`,
///   `p`) on one qubit become a single rotation, or vanish if the angles
///   sum to zero modulo 2π.
///
/// "Directly adjacent" means every wire leaving the first node goes straight
/// into the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommutativeCancellation;

impl CommutativeCancellation {
    /// Upper bound on rewrite rounds.
    pub const MAX_ITERATIONS: usize = 100;

    /// Create a new commutative cancellation pass.
    pub fn new() -> Self {
        Self
    }

    /// Sum two same-axis rotations; `Some(None)` means they cancel.
    fn merge_rotations(
        first: &StandardGate,
        second: &StandardGate,
    ) -> Option<Option<StandardGate>> {
        let (make, a, b): (fn(f64) -> StandardGate, f64, f64) = match (first, second) {
            (StandardGate::Rx(a), StandardGate::Rx(b)) => (StandardGate::Rx, *a, *b),
            (StandardGate::Ry(a), StandardGate::Ry(b)) => (StandardGate::Ry, *a, *b),
            (StandardGate::Rz(a), StandardGate::Rz(b)) => (StandardGate::Rz, *a, *b),
            (StandardGate::P(a), StandardGate::P(b)) => (StandardGate::P, *a, *b),
            _ => return None,
        };
        let sum = Unitary2x2::normalize_angle(a + b);
        if sum.abs() < EPSILON {
            Some(None)
        } else {
            Some(Some(make(sum)))
        }
    }

    /// The single operation every outgoing wire of `node` enters, if any.
    fn sole_successor(dag: &CircuitDag, node: NodeIndex) -> Option<NodeIndex> {
        let mut targets = dag
            .graph()
            .edges_directed(node, Direction::Outgoing)
            .map(|e| e.target());
        let first = targets.next()?;
        if targets.all(|t| t == first) && dag.get_instruction(first).is_some() {
            Some(first)
        } else {
            None
        }
    }

    fn classify(first: &Instruction, second: &Instruction) -> Option<Option<StandardGate>> {
        if first.qubits != second.qubits {
            return None;
        }
        let (a, b) = (first.as_standard_gate()?, second.as_standard_gate()?);
        if a.is_self_inverse() && a == b {
            return Some(None);
        }
        if first.qubits.len() == 1 {
            return Self::merge_rotations(a, b);
        }
        None
    }

    fn find_rewrites(dag: &CircuitDag) -> Vec<Rewrite> {
        let mut rewrites = Vec::new();
        let mut claimed: FxHashSet<NodeIndex> = FxHashSet::default();

        for (node, inst) in dag.topological_ops() {
            if claimed.contains(&node) {
                continue;
            }
            let Some(succ) = Self::sole_successor(dag, node) else {
                continue;
            };
            if claimed.contains(&succ) {
                continue;
            }
            let Some(next) = dag.get_instruction(succ) else {
                continue;
            };
            let rewrite = match Self::classify(inst, next) {
                Some(None) => Rewrite::Cancel(node, succ),
                Some(Some(gate)) => Rewrite::Merge(node, succ, gate),
                None => continue,
            };
            claimed.insert(node);
            claimed.insert(succ);
            rewrites.push(rewrite);
        }

        rewrites
    }
}

impl Pass for CommutativeCancellation {
    fn name(&self) -> &'static str {
        "CommutativeCancellation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        for round in 0..Self::MAX_ITERATIONS {
            let rewrites = Self::find_rewrites(dag);
            if rewrites.is_empty() {
                break;
            }
            debug!("cancellation round {round}: {} rewrites", rewrites.len());

            // Merges only touch instruction payloads, so every index is
            // still valid until the removals below.
            let mut doomed = Vec::with_capacity(rewrites.len() * 2);
            for rewrite in rewrites {
                match rewrite {
                    Rewrite::Cancel(a, b) => doomed.extend([a, b]),
                    Rewrite::Merge(a, b, gate) => {
                        if let Some(inst) = dag.get_instruction_mut(a) {
                            *inst = Instruction::single_qubit_gate(gate, inst.qubits[0]);
                        }
                        doomed.push(b);
                    }
                }
            }
            remove_ops(dag, doomed)?;
        }

        Ok(())
    }

    fn should_run(&self, dag: &CircuitDag, _properties: &PropertySet) -> bool {
        dag.num_ops() > 1
    }
}
