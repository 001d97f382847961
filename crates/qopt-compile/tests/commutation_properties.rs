//! Property-based tests for the commutation rewriter.
//!
//! Random circuits are rewritten under a table that lets every gate pass
//! every other gate, which exercises the most swaps and the most refusals.

use std::collections::BTreeMap;

use proptest::prelude::*;
use qopt_compile::{CommutationRewriter, CommutationTable, DiagnosticKind, SwapOutcome};
use qopt_ir::{Circuit, CircuitDag, Instruction, QubitId, StandardGate};

const GATES: [&str; 5] = ["h", "x", "z", "cx", "cz"];

fn permissive_table() -> CommutationTable {
    let mut table = CommutationTable::empty();
    for a in GATES {
        for b in GATES {
            table.insert(a, b, true);
        }
    }
    table
}

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    Z(u32),
    CX(u32, u32),
    CZ(u32, u32),
}

impl GateOp {
    fn instruction(self) -> Instruction {
        let one = |g, q| Instruction::single_qubit_gate(g, QubitId(q));
        let two = |g, a, b| Instruction::two_qubit_gate(g, QubitId(a), QubitId(b));
        match self {
            GateOp::H(q) => one(StandardGate::H, q),
            GateOp::X(q) => one(StandardGate::X, q),
            GateOp::Z(q) => one(StandardGate::Z, q),
            GateOp::CX(a, b) => two(StandardGate::CX, a, b),
            GateOp::CZ(a, b) => two(StandardGate::CZ, a, b),
        }
    }
}

fn arb_pair(num_qubits: u32) -> impl Strategy<Value = (u32, u32)> {
    (0..num_qubits, 0..num_qubits).prop_filter("operands must differ", |(a, b)| a != b)
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::X),
        (0..num_qubits).prop_map(GateOp::Z),
        arb_pair(num_qubits).prop_map(|(a, b)| GateOp::CX(a, b)),
        arb_pair(num_qubits).prop_map(|(a, b)| GateOp::CZ(a, b)),
    ]
}

/// Random DAGs over 2-4 qubits with 1-24 gates.
fn arb_dag() -> impl Strategy<Value = CircuitDag> {
    (2_u32..=4).prop_flat_map(|n| {
        prop::collection::vec(arb_gate_op(n), 1..=24).prop_map(move |ops| {
            Circuit::from_ops("prop", n, ops.into_iter().map(GateOp::instruction))
                .expect("generated ops are valid")
                .into_dag()
        })
    })
}

/// Instruction payload of every operation node, keyed by node index.
fn payloads(dag: &CircuitDag) -> BTreeMap<usize, Instruction> {
    dag.topological_ops()
        .map(|(n, inst)| (n.index(), inst.clone()))
        .collect()
}

fn wire_orders(dag: &CircuitDag) -> Vec<Vec<usize>> {
    dag.qubits()
        .into_iter()
        .map(|q| dag.ops_on_qubit(q).iter().map(|n| n.index()).collect())
        .collect()
}

proptest! {
    /// Nodes, their payloads and the edge count survive; the DAG stays valid.
    #[test]
    fn test_rewrite_conserves_structure(dag in arb_dag()) {
        let before = payloads(&dag);
        let edges = dag.num_edges();
        let mut sorted_before = wire_orders(&dag);
        for w in &mut sorted_before {
            w.sort_unstable();
        }

        let (after, report) = CommutationRewriter::new(permissive_table()).optimize(dag);

        prop_assert!(after.verify_integrity().is_ok());
        prop_assert_eq!(after.num_edges(), edges);
        prop_assert_eq!(payloads(&after), before);

        // Each wire carries the same operations, possibly reordered.
        let mut sorted_after = wire_orders(&after);
        for w in &mut sorted_after {
            w.sort_unstable();
        }
        prop_assert_eq!(sorted_after, sorted_before);

        prop_assert_eq!(report.attempts, report.swaps + report.diagnostics.len());
    }

    /// Every swap joined a pair with a direct `p → n` edge at that moment.
    ///
    /// The permissive table attempts every planned pair, so the pairs that
    /// swapped are the planned pairs without a diagnostic. Replaying the plan
    /// on a copy checks each swapped pair was adjacent and each
    /// not-directly-connected pair was not, and reproduces the result.
    #[test]
    fn test_swaps_are_local(dag in arb_dag()) {
        let plan = CommutationRewriter::plan(&dag);
        for (node, preds) in &plan {
            for pred in preds {
                prop_assert!(dag.has_edge(*pred, *node));
            }
        }

        let mut replay = dag.clone();
        let (after, report) = CommutationRewriter::new(permissive_table()).optimize(dag);
        let diagnosed: BTreeMap<(usize, usize), DiagnosticKind> = report
            .diagnostics
            .iter()
            .map(|d| ((d.node, d.predecessor), d.kind.clone()))
            .collect();

        let mut swaps = 0;
        for (node, preds) in plan {
            for pred in preds {
                match diagnosed.get(&(node.index(), pred.index())) {
                    None => {
                        prop_assert!(replay.has_edge(pred, node));
                        prop_assert_eq!(
                            CommutationRewriter::try_swap(&mut replay, pred, node),
                            SwapOutcome::Swapped
                        );
                        swaps += 1;
                    }
                    Some(DiagnosticKind::NotDirectlyConnected) => {
                        prop_assert!(!replay.has_edge(pred, node));
                    }
                    Some(DiagnosticKind::InvalidSwap { .. }) => {
                        prop_assert!(replay.has_edge(pred, node));
                    }
                }
            }
        }

        prop_assert_eq!(swaps, report.swaps);
        prop_assert_eq!(wire_orders(&replay), wire_orders(&after));
    }

    /// With no rules nothing is attempted and nothing moves.
    #[test]
    fn test_empty_table_is_identity(dag in arb_dag()) {
        let before = wire_orders(&dag);

        let (after, report) = CommutationRewriter::new(CommutationTable::empty()).optimize(dag);

        prop_assert_eq!(report.attempts, 0);
        prop_assert_eq!(wire_orders(&after), before);
    }

    /// Two runs from the same input agree, and so do two runs over that output.
    #[test]
    fn test_rewrite_is_deterministic(dag in arb_dag()) {
        let rewriter = CommutationRewriter::new(permissive_table());

        let (a, report_a) = rewriter.optimize(dag.clone());
        let (b, report_b) = rewriter.optimize(dag);
        prop_assert_eq!(&report_a, &report_b);
        prop_assert_eq!(wire_orders(&a), wire_orders(&b));

        let (a2, report_a2) = rewriter.optimize(a);
        let (b2, report_b2) = rewriter.optimize(b);
        prop_assert_eq!(report_a2, report_b2);
        prop_assert_eq!(wire_orders(&a2), wire_orders(&b2));
    }
}
