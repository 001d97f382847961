//! Routing passes for inserting SWAP gates.

use tracing::{debug, warn};

use qopt_ir::{CircuitDag, CircuitLevel, Instruction, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{CouplingMap, Layout, PropertySet};

/// Basic routing pass.
///
/// Rebuilds the DAG in topological order on physical qubits. Before each
/// two-qubit gate whose operands are not coupled, the first operand is
/// walked along the shortest coupling-map path with SWAPs until it sits
/// next to the second. Greedy and not optimal, but always correct.
///
/// Gates on three or more qubits are mapped but not routed.
///
/// On success the layout in the property set is the final placement and
/// the DAG is marked [`CircuitLevel::Physical`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRouting;

impl BasicRouting {
    fn physical(layout: &Layout, qubit: QubitId) -> CompileResult<u32> {
        layout
            .get_physical(qubit)
            .ok_or(CompileError::MissingLayout)
    }

    /// Move the logical qubit on `from` next to `to`, emitting the SWAPs.
    fn bring_together(
        routed: &mut CircuitDag,
        coupling_map: &CouplingMap,
        layout: &mut Layout,
        from: u32,
        to: u32,
    ) -> CompileResult<usize> {
        let path = coupling_map
            .shortest_path(from, to)
            .ok_or(CompileError::RoutingFailed {
                qubit1: from,
                qubit2: to,
            })?;

        // Every hop but the last; the gate itself uses the final edge.
        let hops = path.len().saturating_sub(2);
        for pair in path.windows(2).take(hops) {
            let (a, b) = (QubitId(pair[0]), QubitId(pair[1]));
            routed.add_qubit(a);
            routed.add_qubit(b);
            routed.apply(Instruction::two_qubit_gate(StandardGate::Swap, a, b))?;
            layout.swap(pair[0], pair[1]);
        }
        Ok(hops)
    }
}

impl Pass for BasicRouting {
    fn name(&self) -> &'static str {
        "BasicRouting"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        let layout = properties
            .layout
            .as_mut()
            .ok_or(CompileError::MissingLayout)?;

        let mut routed = CircuitDag::new();
        let mut initial = dag
            .qubits()
            .into_iter()
            .map(|q| Self::physical(layout, q))
            .collect::<CompileResult<Vec<_>>>()?;
        initial.sort_unstable();
        for p in initial {
            routed.add_qubit(QubitId(p));
        }

        let mut swaps = 0;
        for (_, inst) in dag.topological_ops() {
            if let [q0, q1] = inst.qubits[..] {
                let p0 = Self::physical(layout, q0)?;
                let p1 = Self::physical(layout, q1)?;
                if !coupling_map.is_connected(p0, p1) {
                    swaps += Self::bring_together(&mut routed, coupling_map, layout, p0, p1)?;
                }
            } else if inst.qubits.len() > 2 {
                warn!("{} on {} qubits is not routed", inst.name(), inst.qubits.len());
            }

            let mut mapped = inst.clone();
            for q in &mut mapped.qubits {
                let p = QubitId(Self::physical(layout, *q)?);
                routed.add_qubit(p);
                *q = p;
            }
            routed.apply(mapped)?;
        }

        debug!("routing inserted {swaps} swaps");
        routed.set_global_phase(dag.global_phase());
        routed.set_level(CircuitLevel::Physical);
        *dag = routed;
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.coupling_map.is_some() && properties.layout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::TrivialLayout;
    use qopt_ir::Circuit;

    fn route(circuit: Circuit, map: CouplingMap) -> (CircuitDag, PropertySet) {
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new().with_coupling_map(map);
        TrivialLayout.run(&mut dag, &mut props).unwrap();
        BasicRouting.run(&mut dag, &mut props).unwrap();
        dag.verify_integrity().unwrap();
        (dag, props)
    }

    fn all_two_qubit_gates_coupled(dag: &CircuitDag, map: &CouplingMap) -> bool {
        dag.topological_ops().all(|(_, inst)| match inst.qubits[..] {
            [a, b] => map.is_connected(a.0, b.0),
            _ => true,
        })
    }

    #[test]
    fn test_basic_routing_connected() {
        let mut circuit = Circuit::with_qubits("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let (dag, _) = route(circuit, CouplingMap::linear(5));

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.level(), CircuitLevel::Physical);
    }

    #[test]
    fn test_basic_routing_needs_swap() {
        let mut circuit = Circuit::with_qubits("test", 3);
        circuit.cx(QubitId(0), QubitId(2)).unwrap();
        let map = CouplingMap::linear(5);

        let (dag, props) = route(circuit, map.clone());

        let names: Vec<_> = dag.topological_ops().map(|(_, i)| i.name()).collect();
        assert_eq!(names, ["swap", "cx"]);
        assert!(all_two_qubit_gates_coupled(&dag, &map));
        let layout = props.layout.unwrap();
        assert_eq!(layout.get_physical(QubitId(0)), Some(1));
        assert_eq!(layout.get_physical(QubitId(1)), Some(0));
    }

    #[test]
    fn test_routes_shor_on_linear_map() {
        let map = CouplingMap::linear(5);
        let (dag, _) = route(Circuit::shor().unwrap(), map.clone());

        assert!(dag.num_ops() > 9);
        assert!(all_two_qubit_gates_coupled(&dag, &map));
        assert_eq!(dag.num_qubits(), 3);
    }

    #[test]
    fn test_routing_failed_on_disconnected_map() {
        let mut circuit = Circuit::with_qubits("test", 4);
        circuit.cz(QubitId(0), QubitId(3)).unwrap();
        let mut dag = circuit.into_dag();
        let mut props =
            PropertySet::new().with_coupling_map(CouplingMap::from_edges([(0, 1), (2, 3)]));
        TrivialLayout.run(&mut dag, &mut props).unwrap();

        let result = BasicRouting.run(&mut dag, &mut props);
        assert!(matches!(
            result,
            Err(CompileError::RoutingFailed {
                qubit1: 0,
                qubit2: 3
            })
        ));
    }

    #[test]
    fn test_routing_needs_layout() {
        let mut dag = Circuit::with_qubits("test", 2).into_dag();
        let mut props = PropertySet::new().with_coupling_map(CouplingMap::linear(2));
        let result = BasicRouting.run(&mut dag, &mut props);
        assert!(matches!(result, Err(CompileError::MissingLayout)));
    }
}
