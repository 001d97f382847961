//! DAG-based circuit representation.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::QubitId;

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a qubit wire.
    In(QubitId),
    /// Output node for a qubit wire.
    Out(QubitId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an input or output node.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        matches!(self, DagNode::In(_) | DagNode::Out(_))
    }

    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }

    #[inline]
    fn instruction_mut(&mut self) -> Option<&mut Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// A data dependency on one qubit wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The qubit this edge carries.
    pub qubit: QubitId,
}

/// The abstraction level of a circuit in the compilation pipeline.
///
/// Circuits start `Logical`; routing lowers them to `Physical`, where qubit
/// ids are device positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircuitLevel {
    /// Qubits are abstract.
    #[default]
    Logical,
    /// Qubits are physical device positions.
    Physical,
}

/// DAG-based circuit representation.
///
/// - Every qubit has one `In` and one `Out` node.
/// - The edges labelled with a qubit form a single path from its `In` node
///   to its `Out` node; the order of operations along that path is the
///   qubit's program order.
/// - An operation's direct predecessors are the most recent prior operation
///   (or `In` node) on each qubit it touches.
///
/// `wire_front` maps each qubit to the node just before its `Out` node so
/// `apply()` runs in O(qubits of the instruction).
#[derive(Debug, Clone)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    qubit_inputs: FxHashMap<QubitId, NodeIndex>,
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
    wire_front: FxHashMap<QubitId, NodeIndex>,
    global_phase: f64,
    level: CircuitLevel,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::default(),
            qubit_inputs: FxHashMap::default(),
            qubit_outputs: FxHashMap::default(),
            wire_front: FxHashMap::default(),
            global_phase: 0.0,
            level: CircuitLevel::Logical,
        }
    }

    /// Add a qubit wire. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_inputs.contains_key(&qubit) {
            return;
        }
        let in_node = self.graph.add_node(DagNode::In(qubit));
        let out_node = self.graph.add_node(DagNode::Out(qubit));
        self.graph.add_edge(in_node, out_node, DagEdge { qubit });
        self.qubit_inputs.insert(qubit, in_node);
        self.qubit_outputs.insert(qubit, out_node);
        self.wire_front.insert(qubit, in_node);
    }

    /// Append an instruction after everything currently on its qubits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            _ => None,
        };

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits() as usize;
            let got = instruction.qubits.len();
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: expected as u32,
                    got: got as u32,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.qubit_inputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let qubits = instruction.qubits.clone();
        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for qubit in qubits {
            let out_node = self.qubit_outputs[&qubit];
            let prev_node = self.wire_front[&qubit];
            self.remove_wire_edge(prev_node, out_node, qubit)?;
            self.graph.add_edge(prev_node, op_node, DagEdge { qubit });
            self.graph.add_edge(op_node, out_node, DagEdge { qubit });
            self.wire_front.insert(qubit, op_node);
        }

        Ok(op_node)
    }

    /// All nodes in a deterministic topological order.
    ///
    /// Kahn's algorithm with a min-heap on node index, so among ready nodes
    /// the one inserted first is emitted first. Nodes on a cycle are omitted.
    pub fn topological_order(&self) -> Vec<NodeIndex> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.edges_directed(n, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
            .graph
            .node_indices()
            .filter(|n| in_degree[n.index()] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                let target = edge.target();
                in_degree[target.index()] -= 1;
                if in_degree[target.index()] == 0 {
                    ready.push(Reverse(target));
                }
            }
        }
        order
    }

    /// Iterate over operations in deterministic topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.topological_order()
            .into_iter()
            .filter_map(move |idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Direct operation predecessors of `node`, deduplicated, in the order of
    /// the node's qubits. Boundary nodes are skipped.
    pub fn op_predecessors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.op_neighbors(node, Direction::Incoming)
    }

    /// Direct operation successors of `node`, deduplicated, in the order of
    /// the node's qubits.
    pub fn op_successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.op_neighbors(node, Direction::Outgoing)
    }

    fn op_neighbors(&self, node: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let Some(inst) = self.get_instruction(node) else {
            return vec![];
        };
        let mut out = Vec::with_capacity(inst.qubits.len());
        for &qubit in &inst.qubits {
            let neighbor = self
                .graph
                .edges_directed(node, dir)
                .find(|e| e.weight().qubit == qubit)
                .map(|e| match dir {
                    Direction::Incoming => e.source(),
                    Direction::Outgoing => e.target(),
                });
            if let Some(n) = neighbor {
                if self.graph[n].is_op() && !out.contains(&n) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// Whether there is a direct edge `from → to`.
    #[inline]
    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.find_edge(from, to).is_some()
    }

    /// Exchange two directly connected operations.
    ///
    /// For every qubit wire joining `pred → node`, the segment
    /// `parent → pred → node → child` becomes `parent → node → pred → child`.
    /// Wires touched by only one of the two nodes are left alone, so the
    /// edge count is unchanged.
    ///
    /// Fails without modifying the DAG when either index is not an operation,
    /// when the nodes share no edge, or when another dependency path from
    /// `pred` to `node` exists (the exchange would close a cycle).
    pub fn swap_adjacent(&mut self, pred: NodeIndex, node: NodeIndex) -> IrResult<()> {
        for idx in [pred, node] {
            match self.graph.node_weight(idx) {
                Some(DagNode::Op(_)) => {}
                _ => return Err(IrError::InvalidNode(idx)),
            }
        }

        let shared: Vec<QubitId> = self
            .graph
            .edges_connecting(pred, node)
            .map(|e| e.weight().qubit)
            .collect();
        if shared.is_empty() {
            return Err(IrError::NotDirectlyConnected {
                from: pred,
                to: node,
            });
        }

        for edge in self.graph.edges_directed(pred, Direction::Outgoing) {
            let via = edge.target();
            if via != node && petgraph::algo::has_path_connecting(&self.graph, via, node, None) {
                return Err(IrError::WouldCreateCycle {
                    from: pred,
                    to: node,
                    via,
                });
            }
        }

        // Resolve every endpoint before touching the graph.
        let mut rewires = Vec::with_capacity(shared.len());
        for &qubit in &shared {
            let parent = self.wire_neighbor(pred, qubit, Direction::Incoming)?;
            let child = self.wire_neighbor(node, qubit, Direction::Outgoing)?;
            rewires.push((qubit, parent, child));
        }

        for (qubit, parent, child) in rewires {
            self.remove_wire_edge(parent, pred, qubit)?;
            self.remove_wire_edge(pred, node, qubit)?;
            self.remove_wire_edge(node, child, qubit)?;
            self.graph.add_edge(parent, node, DagEdge { qubit });
            self.graph.add_edge(node, pred, DagEdge { qubit });
            self.graph.add_edge(pred, child, DagEdge { qubit });
            if self.wire_front.get(&qubit) == Some(&node) {
                self.wire_front.insert(qubit, pred);
            }
        }

        Ok(())
    }

    fn wire_neighbor(&self, node: NodeIndex, qubit: QubitId, dir: Direction) -> IrResult<NodeIndex> {
        self.graph
            .edges_directed(node, dir)
            .find(|e| e.weight().qubit == qubit)
            .map(|e| match dir {
                Direction::Incoming => e.source(),
                Direction::Outgoing => e.target(),
            })
            .ok_or_else(|| {
                IrError::InvalidDag(format!(
                    "Node {node:?} has no {dir:?} edge on qubit wire {qubit}"
                ))
            })
    }

    fn remove_wire_edge(&mut self, from: NodeIndex, to: NodeIndex, qubit: QubitId) -> IrResult<()> {
        let eid = self
            .graph
            .edges_connecting(from, to)
            .find(|e| e.weight().qubit == qubit)
            .map(|e| e.id())
            .ok_or_else(|| {
                IrError::InvalidDag(format!(
                    "Missing edge {from:?} -> {to:?} on qubit wire {qubit}"
                ))
            })?;
        self.graph.remove_edge(eid);
        Ok(())
    }

    /// Get a node by index.
    #[inline]
    pub fn node(&self, node: NodeIndex) -> Option<&DagNode> {
        self.graph.node_weight(node)
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Get a mutable instruction by node index.
    #[inline]
    pub fn get_instruction_mut(&mut self, node: NodeIndex) -> Option<&mut Instruction> {
        self.graph
            .node_weight_mut(node)
            .and_then(DagNode::instruction_mut)
    }

    /// Remove an operation node, joining its predecessor and successor on
    /// every wire it touched.
    ///
    /// petgraph's `remove_node` moves the last node into the freed slot, so
    /// any `NodeIndex` equal to the old last index is stale afterwards.
    /// Callers removing several nodes should remove the highest index first.
    pub fn remove_op(&mut self, node: NodeIndex) -> IrResult<Instruction> {
        match self.graph.node_weight(node) {
            Some(DagNode::Op(_)) => {}
            Some(_) => {
                return Err(IrError::InvalidDag(
                    "Cannot remove non-operation node".into(),
                ));
            }
            None => return Err(IrError::InvalidNode(node)),
        }

        let incoming: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| (e.source(), e.weight().qubit))
            .collect();
        let outgoing: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.target(), e.weight().qubit))
            .collect();

        for &(pred, qubit) in &incoming {
            if self.wire_front.get(&qubit) == Some(&node) {
                self.wire_front.insert(qubit, pred);
            }
        }

        let last_idx = NodeIndex::new(self.graph.node_count() - 1);
        let removed = self
            .graph
            .remove_node(node)
            .ok_or(IrError::InvalidNode(node))?;

        let fix = |idx: NodeIndex| if idx == last_idx { node } else { idx };

        if last_idx != node {
            for v in self
                .qubit_inputs
                .values_mut()
                .chain(self.qubit_outputs.values_mut())
                .chain(self.wire_front.values_mut())
            {
                *v = fix(*v);
            }
        }

        for &(pred, qubit) in &incoming {
            for &(succ, succ_qubit) in &outgoing {
                if qubit == succ_qubit {
                    self.graph.add_edge(fix(pred), fix(succ), DagEdge { qubit });
                }
            }
        }

        match removed {
            DagNode::Op(inst) => Ok(inst),
            _ => Err(IrError::InvalidNode(node)),
        }
    }

    /// Operations on a qubit, in wire order from `In` to `Out`.
    pub fn ops_on_qubit(&self, qubit: QubitId) -> Vec<NodeIndex> {
        let Some(&in_node) = self.qubit_inputs.get(&qubit) else {
            return vec![];
        };
        let mut ops = vec![];
        let mut current = in_node;
        // Bounded walk so a corrupted wire cannot loop forever.
        for _ in 0..self.graph.node_count() {
            let next = self
                .graph
                .edges_directed(current, Direction::Outgoing)
                .find(|e| e.weight().qubit == qubit)
                .map(|e| e.target());
            match next {
                Some(n) if self.graph[n].is_op() => {
                    ops.push(n);
                    current = n;
                }
                _ => break,
            }
        }
        ops
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubit_inputs.len()
    }

    /// Get the number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph
            .node_count()
            .saturating_sub(2 * self.qubit_inputs.len())
    }

    /// Get the number of wire edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Longest path through the DAG, counted in operation nodes.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.graph.node_count()];
        let mut max_depth = 0;

        for node in self.topological_order() {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths[e.source().index()])
                .max()
                .unwrap_or(0);

            let node_depth = if self.graph[node].is_op() {
                max_pred_depth + 1
            } else {
                max_pred_depth
            };
            depths[node.index()] = node_depth;
            max_depth = max_depth.max(node_depth);
        }

        max_depth
    }

    /// Qubits in ascending order.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<_> = self.qubit_inputs.keys().copied().collect();
        qubits.sort_unstable();
        qubits
    }

    /// Get the input node for a qubit.
    #[inline]
    pub fn qubit_input_node(&self, qubit: QubitId) -> Option<NodeIndex> {
        self.qubit_inputs.get(&qubit).copied()
    }

    /// Get the global phase.
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Set the global phase.
    pub fn set_global_phase(&mut self, phase: f64) {
        self.global_phase = phase;
    }

    /// Get the abstraction level of this circuit.
    pub fn level(&self) -> CircuitLevel {
        self.level
    }

    /// Set the abstraction level of this circuit.
    pub fn set_level(&mut self, level: CircuitLevel) {
        self.level = level;
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that the graph is acyclic, that every qubit has matching
    /// `In`/`Out` nodes, and that each qubit's edges form one unbroken path
    /// from `In` to `Out`.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        if self.qubit_inputs.len() != self.qubit_outputs.len() {
            return Err(IrError::InvalidDag(
                "Mismatched number of In and Out nodes".into(),
            ));
        }

        for (&qubit, &in_node) in &self.qubit_inputs {
            let Some(&out_node) = self.qubit_outputs.get(&qubit) else {
                return Err(IrError::InvalidDag(format!(
                    "Qubit {qubit} has an In node but no Out node"
                )));
            };

            let mut current = in_node;
            let mut steps = 0;
            while current != out_node {
                let mut next = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .filter(|e| e.weight().qubit == qubit)
                    .map(|e| e.target());
                current = match (next.next(), next.next()) {
                    (Some(n), None) => n,
                    (None, _) => {
                        return Err(IrError::InvalidDag(format!(
                            "Wire for qubit {qubit} is broken at node {current:?}"
                        )));
                    }
                    (Some(_), Some(_)) => {
                        return Err(IrError::InvalidDag(format!(
                            "Wire for qubit {qubit} forks at node {current:?}"
                        )));
                    }
                };
                steps += 1;
                if steps > self.graph.node_count() {
                    return Err(IrError::InvalidDag(format!(
                        "Wire for qubit {qubit} does not reach its Out node"
                    )));
                }
            }
        }

        for node in self.graph.node_indices() {
            if let DagNode::Op(inst) = &self.graph[node] {
                let incoming = self.graph.edges_directed(node, Direction::Incoming).count();
                let outgoing = self.graph.edges_directed(node, Direction::Outgoing).count();
                if incoming != inst.qubits.len() || outgoing != inst.qubits.len() {
                    return Err(IrError::InvalidDag(format!(
                        "Operation {node:?} ({}) has {incoming} in / {outgoing} out edges for {} qubits",
                        inst.name(),
                        inst.qubits.len()
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    fn dag_with_qubits(n: u32) -> CircuitDag {
        let mut dag = CircuitDag::new();
        for q in 0..n {
            dag.add_qubit(QubitId(q));
        }
        dag
    }

    fn h(q: u32) -> Instruction {
        Instruction::single_qubit_gate(StandardGate::H, QubitId(q))
    }

    fn x(q: u32) -> Instruction {
        Instruction::single_qubit_gate(StandardGate::X, QubitId(q))
    }

    fn cz(a: u32, b: u32) -> Instruction {
        Instruction::two_qubit_gate(StandardGate::CZ, QubitId(a), QubitId(b))
    }

    fn names(dag: &CircuitDag, nodes: &[NodeIndex]) -> Vec<String> {
        nodes
            .iter()
            .map(|&n| dag.get_instruction(n).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.num_edges(), 0);
        assert_eq!(dag.depth(), 0);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_add_qubit_idempotent() {
        let mut dag = dag_with_qubits(2);
        dag.add_qubit(QubitId(1));
        assert_eq!(dag.num_qubits(), 2);
        assert_eq!(dag.num_edges(), 2);
        assert_eq!(dag.qubits(), vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_bell_state_depth() {
        let mut dag = dag_with_qubits(2);
        dag.apply(h(0)).unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 2);
        // In0->h, h->cx, cx->Out0, In1->cx, cx->Out1
        assert_eq!(dag.num_edges(), 5);
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut dag = dag_with_qubits(2);
        dag.apply(h(0)).unwrap();
        dag.apply(h(1)).unwrap();
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = dag_with_qubits(2);
        let result = dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0)]));
        match result {
            Err(IrError::QubitCountMismatch {
                gate_name,
                expected,
                got,
            }) => {
                assert_eq!(gate_name, "cx");
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("Expected QubitCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_qubit_not_found_with_context() {
        let mut dag = dag_with_qubits(1);
        let result = dag.apply(cz(0, 99));
        match result {
            Err(IrError::QubitNotFound { qubit, gate_name }) => {
                assert_eq!(qubit, QubitId(99));
                assert_eq!(gate_name.as_deref(), Some("cz"));
            }
            other => panic!("Expected QubitNotFound, got {other:?}"),
        }
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut dag = dag_with_qubits(1);
        let result = dag.apply(cz(0, 0));
        assert!(matches!(result, Err(IrError::DuplicateQubit { .. })));
    }

    #[test]
    fn test_predecessors_follow_qubit_order() {
        let mut dag = dag_with_qubits(2);
        let x1 = dag.apply(x(1)).unwrap();
        let x0 = dag.apply(x(0)).unwrap();
        let g = dag.apply(cz(0, 1)).unwrap();

        assert_eq!(dag.op_predecessors(g), vec![x0, x1]);
        assert_eq!(dag.op_successors(x0), vec![g]);
        assert!(dag.op_predecessors(x0).is_empty());
        assert!(dag.has_edge(x0, g));
        assert!(!dag.has_edge(g, x0));
    }

    #[test]
    fn test_predecessors_deduplicated() {
        let mut dag = dag_with_qubits(2);
        let a = dag.apply(cz(0, 1)).unwrap();
        let b = dag.apply(cz(0, 1)).unwrap();
        assert_eq!(dag.op_predecessors(b), vec![a]);
    }

    #[test]
    fn test_topological_order_is_insertion_order_for_independent_ops() {
        let mut dag = dag_with_qubits(3);
        let a = dag.apply(h(2)).unwrap();
        let b = dag.apply(h(0)).unwrap();
        let c = dag.apply(h(1)).unwrap();
        let order: Vec<_> = dag.topological_ops().map(|(n, _)| n).collect();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn test_swap_adjacent_single_wire() {
        let mut dag = dag_with_qubits(2);
        let xn = dag.apply(x(0)).unwrap();
        let g = dag.apply(cz(0, 1)).unwrap();
        let edges = dag.num_edges();

        dag.swap_adjacent(xn, g).unwrap();

        assert_eq!(dag.num_edges(), edges);
        assert_eq!(dag.ops_on_qubit(QubitId(0)), vec![g, xn]);
        assert_eq!(dag.ops_on_qubit(QubitId(1)), vec![g]);
        assert!(dag.has_edge(g, xn));
        assert!(!dag.has_edge(xn, g));
        dag.verify_integrity().unwrap();

        // Appending after the exchange attaches to the new wire front.
        let tail = dag.apply(h(0)).unwrap();
        assert_eq!(dag.op_predecessors(tail), vec![xn]);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_swap_adjacent_both_wires() {
        let mut dag = dag_with_qubits(2);
        let before = dag.apply(h(0)).unwrap();
        let a = dag.apply(cz(0, 1)).unwrap();
        let b = dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();
        let edges = dag.num_edges();

        dag.swap_adjacent(a, b).unwrap();

        assert_eq!(dag.num_edges(), edges);
        assert_eq!(dag.ops_on_qubit(QubitId(0)), vec![before, b, a]);
        assert_eq!(dag.ops_on_qubit(QubitId(1)), vec![b, a]);
        assert_eq!(names(&dag, &dag.ops_on_qubit(QubitId(0))), ["h", "cx", "cz"]);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_swap_not_directly_connected() {
        let mut dag = dag_with_qubits(2);
        let a = dag.apply(x(0)).unwrap();
        let _mid = dag.apply(h(0)).unwrap();
        let b = dag.apply(cz(0, 1)).unwrap();
        let snapshot = dag.ops_on_qubit(QubitId(0));

        let result = dag.swap_adjacent(a, b);
        assert!(matches!(
            result,
            Err(IrError::NotDirectlyConnected { from, to }) if from == a && to == b
        ));
        assert_eq!(dag.ops_on_qubit(QubitId(0)), snapshot);
    }

    #[test]
    fn test_swap_would_create_cycle() {
        let mut dag = dag_with_qubits(2);
        let p = dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();
        let m = dag.apply(h(1)).unwrap();
        let n = dag.apply(cz(0, 1)).unwrap();
        let edges = dag.num_edges();

        let result = dag.swap_adjacent(p, n);
        assert!(matches!(
            result,
            Err(IrError::WouldCreateCycle { via, .. }) if via == m
        ));
        assert_eq!(dag.num_edges(), edges);
        assert_eq!(dag.ops_on_qubit(QubitId(1)), vec![p, m, n]);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_swap_rejects_boundary_and_stale_nodes() {
        let mut dag = dag_with_qubits(1);
        let op = dag.apply(x(0)).unwrap();
        let input = dag.qubit_input_node(QubitId(0)).unwrap();

        assert!(matches!(
            dag.swap_adjacent(input, op),
            Err(IrError::InvalidNode(n)) if n == input
        ));
        let stale = NodeIndex::new(1000);
        assert!(matches!(
            dag.swap_adjacent(op, stale),
            Err(IrError::InvalidNode(n)) if n == stale
        ));
    }

    #[test]
    fn test_remove_op_reconnects_wire() {
        let mut dag = dag_with_qubits(2);
        let first = dag.apply(h(0)).unwrap();
        let middle = dag.apply(x(0)).unwrap();
        dag.apply(cz(0, 1)).unwrap();

        let removed = dag.remove_op(middle).unwrap();
        assert_eq!(removed.name(), "x");
        assert_eq!(dag.num_ops(), 2);
        assert_eq!(names(&dag, &dag.ops_on_qubit(QubitId(0))), ["h", "cz"]);
        assert_eq!(dag.ops_on_qubit(QubitId(0))[0], first);
        dag.verify_integrity().unwrap();

        // Removing the wire front still allows appending.
        let last = dag.ops_on_qubit(QubitId(1))[0];
        dag.remove_op(last).unwrap();
        dag.apply(h(1)).unwrap();
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_remove_boundary_node_fails() {
        let mut dag = dag_with_qubits(1);
        let input = dag.qubit_input_node(QubitId(0)).unwrap();
        assert!(dag.remove_op(input).is_err());
        assert!(matches!(
            dag.remove_op(NodeIndex::new(77)),
            Err(IrError::InvalidNode(_))
        ));
    }

    #[test]
    fn test_verify_integrity_with_reset_and_barrier() {
        let mut dag = dag_with_qubits(3);
        dag.apply(Instruction::reset(QubitId(0))).unwrap();
        dag.apply(h(0)).unwrap();
        dag.apply(Instruction::barrier([QubitId(0), QubitId(1), QubitId(2)]))
            .unwrap();
        dag.apply(cz(1, 2)).unwrap();
        dag.verify_integrity().unwrap();
        assert_eq!(dag.depth(), 4);
    }

    #[test]
    fn test_node_serde_roundtrip() {
        let mut dag = dag_with_qubits(2);
        let node = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CRz(0.25),
                QubitId(0),
                QubitId(1),
            ))
            .unwrap();

        let op = dag.node(node).unwrap().clone();
        let json = serde_json::to_string(&op).unwrap();
        let back: DagNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
        assert_eq!(back.instruction().unwrap().parameters(), vec![0.25]);

        for boundary in [DagNode::In(QubitId(1)), DagNode::Out(QubitId(0))] {
            let json = serde_json::to_string(&boundary).unwrap();
            assert_eq!(serde_json::from_str::<DagNode>(&json).unwrap(), boundary);
        }

        let edge = DagEdge { qubit: QubitId(1) };
        let json = serde_json::to_string(&edge).unwrap();
        assert_eq!(serde_json::from_str::<DagEdge>(&json).unwrap(), edge);
    }
}
