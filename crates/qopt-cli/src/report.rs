//! Before/after comparison output.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use qopt_compile::SwapDiagnostic;
use qopt_ir::CircuitDag;
use qopt_sim::Distribution;

/// How the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Simulation maps and depth/gate lines
    Text,
    /// One pretty-printed JSON report
    Json,
}

/// Size metrics of one circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Longest path in operations.
    pub depth: usize,
    /// Number of operations.
    pub gates: usize,
}

impl Metrics {
    /// Measure `dag`.
    pub fn of(dag: &CircuitDag) -> Self {
        Self {
            depth: dag.depth(),
            gates: dag.num_ops(),
        }
    }
}

/// Measurement distributions of both circuits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub original: Distribution,
    pub optimized: Distribution,
}

/// Everything one run prints.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub algorithm: String,
    pub optimization: String,
    pub original: Metrics,
    pub optimized: Metrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<Simulation>,
    /// Commutation attempts that did not swap.
    pub diagnostics: Vec<SwapDiagnostic>,
}

impl Report {
    /// Render in `format`, newline-terminated.
    pub fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => serde_json::to_string_pretty(self).map(|s| s + "\n"),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sim) = &self.simulation {
            writeln!(f, "Original Circuit Simulation Results:")?;
            writeln!(f, "{}", sim.original)?;
            writeln!(f, "Optimized Circuit Simulation Results:")?;
            writeln!(f, "{}", sim.optimized)?;
        }
        writeln!(
            f,
            "Original - Depth: {}, Gates: {}",
            self.original.depth, self.original.gates
        )?;
        writeln!(
            f,
            "Optimized - Depth: {}, Gates: {}",
            self.optimized.depth, self.optimized.gates
        )
    }
}
