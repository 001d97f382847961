//! Error types for the simulator.

use thiserror::Error;

/// Errors raised while simulating a circuit.
#[derive(Debug, Error)]
pub enum SimError {
    /// The statevector would not fit in memory.
    #[error("Circuit has {qubits} qubits; the simulator supports at most {max}")]
    TooManyQubits {
        /// Qubits in the circuit.
        qubits: usize,
        /// Simulator limit.
        max: usize,
    },

    /// Sampling was asked for zero shots.
    #[error("Number of shots must be at least 1")]
    ZeroShots,
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
