//! Error types for the IR crate.

use crate::dag::NodeIndex;
use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Invalid DAG structure.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),

    /// Node index does not refer to an operation in this DAG.
    #[error("Invalid node index {0:?}")]
    InvalidNode(NodeIndex),

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Two operations were expected to share a direct edge but do not.
    #[error("Nodes {from:?} and {to:?} are not directly connected")]
    NotDirectlyConnected {
        /// Expected producer.
        from: NodeIndex,
        /// Expected consumer.
        to: NodeIndex,
    },

    /// Reordering two operations would introduce a dependency cycle.
    #[error("Exchanging {from:?} and {to:?} would create a cycle through {via:?}")]
    WouldCreateCycle {
        /// Producer of the direct edge.
        from: NodeIndex,
        /// Consumer of the direct edge.
        to: NodeIndex,
        /// First node of the indirect path from `from` to `to`.
        via: NodeIndex,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
