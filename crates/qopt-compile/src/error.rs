//! Error types for the compile crate.

use qopt_ir::IrError;
use thiserror::Error;

/// Errors raised by passes and pass configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// An IR operation failed inside a pass.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// A target pass ran without a coupling map.
    #[error("No coupling map in property set")]
    MissingCouplingMap,

    /// Routing ran before a layout was chosen.
    #[error("No layout in property set")]
    MissingLayout,

    /// The circuit needs more qubits than the target has.
    #[error("Circuit requires {required} qubits but target has {available}")]
    CircuitTooLarge {
        /// Qubits used by the circuit.
        required: usize,
        /// Physical qubits on the target.
        available: u32,
    },

    /// No coupling-map path joins two physical qubits.
    #[error("Cannot route between physical qubits {qubit1} and {qubit2}")]
    RoutingFailed {
        /// First physical qubit.
        qubit1: u32,
        /// Second physical qubit.
        qubit2: u32,
    },

    /// A commutation rule table could not be parsed.
    #[error("Invalid commutation rule table: {0}")]
    InvalidRules(#[from] serde_json::Error),

    /// A commutation rule table could not be read.
    #[error("Cannot read commutation rule table: {0}")]
    RulesIo(#[from] std::io::Error),
}

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
