//! qopt circuit intermediate representation
//!
//! Gate-level circuits stored as a dependency DAG: one `In` and one `Out`
//! node per qubit, one node per operation, and one edge per qubit wire
//! segment. Compilation passes in `qopt-compile` rewrite this graph in place.
//!
//! # Core Components
//!
//! - [`QubitId`] addresses a qubit wire
//! - [`StandardGate`] and [`CustomGate`] describe gates; [`Instruction`] binds a
//!   gate (or reset/barrier) to its qubits
//! - [`CircuitDag`] is the graph; [`Circuit`] is a fluent builder over it
//!
//! # Example
//!
//! ```rust
//! use qopt_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_qubits("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_ops(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, CircuitLevel, DagEdge, DagNode, NodeIndex};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::QubitId;
