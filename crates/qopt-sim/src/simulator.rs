//! Shot-based sampling over a statevector.

use std::collections::BTreeMap;
use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use qopt_ir::CircuitDag;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Shots taken when none are configured.
pub const DEFAULT_SHOTS: u32 = 1025;

/// Largest circuit the simulator accepts (16 MiB of amplitudes).
pub const MAX_QUBITS: usize = 20;

/// Observed probability per measured bitstring.
///
/// Bitstrings have one character per qubit with qubit 0 rightmost. Only
/// outcomes that occurred are present; iteration is in bitstring order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(BTreeMap<String, f64>);

impl Distribution {
    /// Probability of one bitstring; zero if it was never observed.
    pub fn probability(&self, bitstring: &str) -> f64 {
        self.0.get(bitstring).copied().unwrap_or(0.0)
    }

    /// Outcomes in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying map.
    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.0
    }
}

impl fmt::Display for Distribution {
    /// `{'00': 0.25, '11': 0.75}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (bits, p)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{bits}': {p:?}")?;
        }
        f.write_str("}")
    }
}

/// Statevector simulator with shot sampling.
///
/// ```
/// use qopt_ir::{Circuit, QubitId};
/// use qopt_sim::Simulator;
///
/// let mut circuit = Circuit::with_qubits("flip", 2);
/// circuit.x(QubitId(0)).unwrap();
///
/// let dist = Simulator::new().with_seed(1).run(circuit.dag()).unwrap();
/// assert_eq!(dist.probability("01"), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    shots: u32,
    seed: Option<u64>,
}

impl Simulator {
    /// Create a simulator taking [`DEFAULT_SHOTS`] shots from OS entropy.
    pub fn new() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            seed: None,
        }
    }

    /// Set the number of shots.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Seed the sampler for reproducible output.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configured number of shots.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Evolve |0...0⟩ through every operation of `dag`.
    ///
    /// The DAG's qubits, in ascending order, become statevector positions
    /// `0, 1, 2, ...`.
    pub fn statevector(&self, dag: &CircuitDag) -> SimResult<Statevector> {
        let qubits = dag.qubits();
        if qubits.len() > MAX_QUBITS {
            return Err(SimError::TooManyQubits {
                qubits: qubits.len(),
                max: MAX_QUBITS,
            });
        }

        let mut sv = Statevector::new(qubits.len());
        let mut positions = Vec::new();
        for (_, inst) in dag.topological_ops() {
            positions.clear();
            // Every operand is a DAG qubit, so the search always succeeds.
            positions.extend(
                inst.qubits
                    .iter()
                    .filter_map(|q| qubits.binary_search(q).ok()),
            );
            sv.apply(inst, &positions);
        }
        Ok(sv)
    }

    /// Simulate `dag` and sample every qubit [`shots`](Self::shots) times.
    #[instrument(skip(self, dag), fields(shots = self.shots))]
    pub fn run(&self, dag: &CircuitDag) -> SimResult<Distribution> {
        if self.shots == 0 {
            return Err(SimError::ZeroShots);
        }
        let sv = self.statevector(dag)?;
        debug!(
            "Sampling {} qubits, {} ops",
            sv.num_qubits(),
            dag.num_ops()
        );

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for _ in 0..self.shots {
            *counts.entry(sv.sample(&mut rng)).or_default() += 1;
        }

        let shots = f64::from(self.shots);
        Ok(Distribution(
            counts
                .into_iter()
                .map(|(outcome, n)| (sv.bitstring(outcome), f64::from(n) / shots))
                .collect(),
        ))
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
