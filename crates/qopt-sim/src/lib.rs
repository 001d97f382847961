//! qopt statevector simulator.
//!
//! Exact simulation of the circuit's pure state followed by shot sampling of
//! every qubit, used to compare circuits before and after optimization.
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//!
//! Beyond [`MAX_QUBITS`] the simulator refuses the circuit.
//!
//! # Example
//!
//! ```rust
//! use qopt_ir::Circuit;
//! use qopt_sim::Simulator;
//!
//! let circuit = Circuit::grover().unwrap();
//! let dist = Simulator::new().with_seed(7).run(circuit.dag()).unwrap();
//!
//! // One Grover iteration on two qubits finds the marked state.
//! assert!((dist.probability("11") - 1.0).abs() < 1e-9);
//! ```

mod error;
mod simulator;
mod statevector;

pub use error::{SimError, SimResult};
pub use simulator::{DEFAULT_SHOTS, Distribution, MAX_QUBITS, Simulator};
pub use statevector::Statevector;
