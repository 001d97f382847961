//! Single-qubit gate resynthesis.

use tracing::debug;

use qopt_ir::{CircuitDag, Instruction, NodeIndex, QubitId, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::unitary::Unitary2x2;

use super::{EPSILON, remove_ops};

/// Single-qubit gate optimization pass.
///
/// Finds maximal runs of consecutive single-qubit gates on each qubit,
/// multiplies them into one 2x2 unitary and re-expresses it as at most
/// `Rz(γ) Ry(β) Rz(α)` via ZYZ decomposition. A run is only replaced when
/// the new sequence is strictly shorter, so every rewrite removes at least
/// one node and the pass terminates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optimize1qGates;

impl Optimize1qGates {
    /// Create a new single-qubit optimizer.
    pub fn new() -> Self {
        Self
    }

    /// Matrix of an instruction that can join a run.
    fn unitary_of(inst: &Instruction) -> Option<Unitary2x2> {
        if inst.qubits.len() != 1 {
            return None;
        }
        Unitary2x2::from_gate(inst.as_standard_gate()?)
    }

    /// Resynthesize a unitary as `Rz`, `Ry`, `Rz` in circuit order, dropping
    /// zero rotations.
    fn decompose(unitary: &Unitary2x2) -> Vec<StandardGate> {
        if unitary.is_identity() {
            return vec![];
        }
        let (alpha, beta, gamma, _phase) = unitary.zyz_decomposition();
        let alpha = Unitary2x2::normalize_angle(alpha);
        let beta = Unitary2x2::normalize_angle(beta);
        let gamma = Unitary2x2::normalize_angle(gamma);

        [
            StandardGate::Rz(gamma),
            StandardGate::Ry(beta),
            StandardGate::Rz(alpha),
        ]
        .into_iter()
        .filter(|g| g.parameters().iter().any(|p| p.abs() > EPSILON))
        .collect()
    }

    /// Maximal runs (length two or more) of single-qubit gates per qubit,
    /// each in wire order.
    fn find_runs(dag: &CircuitDag) -> Vec<(QubitId, Vec<NodeIndex>)> {
        let mut runs = Vec::new();
        for qubit in dag.qubits() {
            let mut current: Vec<NodeIndex> = Vec::new();
            for node in dag.ops_on_qubit(qubit) {
                let joins = dag
                    .get_instruction(node)
                    .and_then(Self::unitary_of)
                    .is_some();
                if joins {
                    current.push(node);
                    continue;
                }
                if current.len() > 1 {
                    runs.push((qubit, std::mem::take(&mut current)));
                } else {
                    current.clear();
                }
            }
            if current.len() > 1 {
                runs.push((qubit, current));
            }
        }
        runs
    }

    /// The first run whose resynthesis is shorter, with its replacement.
    fn next_rewrite(dag: &CircuitDag) -> Option<(QubitId, Vec<NodeIndex>, Vec<StandardGate>)> {
        Self::find_runs(dag).into_iter().find_map(|(qubit, nodes)| {
            // Circuit order g1, g2, ... is the matrix product ... g2 · g1.
            let combined = nodes
                .iter()
                .filter_map(|&n| dag.get_instruction(n).and_then(Self::unitary_of))
                .fold(Unitary2x2::identity(), |acc, u| u * acc);
            let gates = Self::decompose(&combined);
            (gates.len() < nodes.len()).then_some((qubit, nodes, gates))
        })
    }
}

impl Pass for Optimize1qGates {
    fn name(&self) -> &'static str {
        "Optimize1qGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        // Removal invalidates indices, so runs are rediscovered after each
        // rewrite. Each rewrite shrinks the DAG, which bounds the loop.
        while let Some((qubit, nodes, gates)) = Self::next_rewrite(dag) {
            debug!(
                "resynthesizing {} gates on {qubit} as {}",
                nodes.len(),
                gates.len()
            );
            let (keep, drop) = nodes.split_at(gates.len());
            for (&node, gate) in keep.iter().zip(gates) {
                if let Some(inst) = dag.get_instruction_mut(node) {
                    *inst = Instruction::single_qubit_gate(gate, qubit);
                }
            }
            remove_ops(dag, drop.to_vec())?;
        }
        Ok(())
    }

    fn should_run(&self, dag: &CircuitDag, _properties: &PropertySet) -> bool {
        dag.num_ops() > 1
    }
}
