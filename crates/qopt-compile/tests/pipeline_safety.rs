//! Integration tests for the preset pipelines.
//!
//! Optimization must never merge or cancel gates across a reset or a
//! barrier, and routing must leave every two-qubit gate on a coupled pair.

use qopt_compile::{
    CommutationTable, CouplingMap, PassManagerBuilder, PropertySet, RewriteReport,
};
use qopt_ir::{Circuit, CircuitDag, CircuitLevel, QubitId};

/// Helper: operation names on one qubit, in wire order.
fn ops_on_qubit(dag: &CircuitDag, qubit: QubitId) -> Vec<String> {
    dag.ops_on_qubit(qubit)
        .into_iter()
        .map(|n| dag.get_instruction(n).unwrap().name().to_string())
        .collect()
}

fn run_advanced(circuit: Circuit) -> CircuitDag {
    let (pm, mut props) = PassManagerBuilder::new().advanced().build();
    let mut dag = circuit.into_dag();
    pm.run(&mut dag, &mut props).unwrap();
    dag.verify_integrity().unwrap();
    dag
}

// ============================================================================
// Resets and barriers are optimization boundaries
// ============================================================================

#[test]
fn test_h_reset_h_not_cancelled() {
    let mut circuit = Circuit::with_qubits("test", 1);
    let q = QubitId(0);
    circuit.h(q).unwrap().reset(q).unwrap().h(q).unwrap();

    let dag = run_advanced(circuit);

    assert_eq!(ops_on_qubit(&dag, q), ["h", "reset", "h"]);
}

#[test]
fn test_cx_barrier_cx_not_cancelled() {
    let mut circuit = Circuit::with_qubits("test", 2);
    let (a, b) = (QubitId(0), QubitId(1));
    circuit.cx(a, b).unwrap();
    circuit.barrier([a, b]).unwrap();
    circuit.cx(a, b).unwrap();

    let dag = run_advanced(circuit);

    assert_eq!(ops_on_qubit(&dag, a), ["cx", "barrier", "cx"]);
}

#[test]
fn test_rotations_across_barrier_not_merged() {
    let mut circuit = Circuit::with_qubits("test", 1);
    let q = QubitId(0);
    circuit.rz(0.1, q).unwrap();
    circuit.barrier([q]).unwrap();
    circuit.rz(0.2, q).unwrap();

    let dag = run_advanced(circuit);

    assert_eq!(ops_on_qubit(&dag, q), ["rz", "barrier", "rz"]);
}

#[test]
fn test_leading_reset_removed_but_inner_kept() {
    let mut circuit = Circuit::with_qubits("test", 1);
    let q = QubitId(0);
    circuit.reset(q).unwrap().x(q).unwrap().reset(q).unwrap();

    let dag = run_advanced(circuit);

    assert_eq!(ops_on_qubit(&dag, q), ["x", "reset"]);
}

// ============================================================================
// Full pipelines on the example circuits
// ============================================================================

#[test]
fn test_basic_pipeline_on_shor_is_identity() {
    let (pm, mut props) = PassManagerBuilder::new()
        .basic(CommutationTable::default())
        .build();
    let original = Circuit::shor().unwrap().into_dag();
    let mut dag = original.clone();

    pm.run(&mut dag, &mut props).unwrap();

    let report = props.get::<RewriteReport>().unwrap();
    assert_eq!(report.attempts, 0);
    assert!(report.diagnostics.is_empty());
    for q in original.qubits() {
        assert_eq!(ops_on_qubit(&dag, q), ops_on_qubit(&original, q));
    }
}

#[test]
fn test_advanced_pipeline_reduces_grover() {
    let dag = run_advanced(Circuit::grover().unwrap());
    assert!(dag.num_ops() < 12);
    // The entangling gates are untouched.
    assert_eq!(
        ops_on_qubit(&dag, QubitId(0))
            .iter()
            .filter(|n| *n == "cz")
            .count(),
        2
    );
}

#[test]
fn test_hardware_pipeline_respects_coupling() {
    let map = CouplingMap::linear(5);
    let (pm, mut props) = PassManagerBuilder::new().hardware(map.clone()).build();
    let mut dag = Circuit::shor().unwrap().into_dag();

    pm.run(&mut dag, &mut props).unwrap();

    dag.verify_integrity().unwrap();
    assert_eq!(dag.level(), CircuitLevel::Physical);
    for (_, inst) in dag.topological_ops() {
        if let [a, b] = inst.qubits[..] {
            assert!(map.is_connected(a.0, b.0), "{} on {a},{b}", inst.name());
        }
    }
    assert!(props.layout.is_some());
}

#[test]
fn test_pipelines_compose() {
    let (pm, mut props) = PassManagerBuilder::new()
        .with_properties(PropertySet::new())
        .basic(CommutationTable::default())
        .advanced()
        .hardware(CouplingMap::linear(5))
        .build();
    let mut dag = Circuit::grover().unwrap().into_dag();

    pm.run(&mut dag, &mut props).unwrap();

    dag.verify_integrity().unwrap();
    assert_eq!(props.get::<RewriteReport>().unwrap().swaps, 2);
}
