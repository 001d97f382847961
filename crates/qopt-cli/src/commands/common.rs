//! Shared helpers for CLI commands.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use thiserror::Error;

use qopt_compile::{CommutationTable, CouplingMap, PassManagerBuilder};
use qopt_ir::Circuit;

/// Physical qubits of the device targeted by the hardware pipeline.
pub const HARDWARE_QUBITS: u32 = 5;

/// A command-line value outside the accepted set. Exits with status 2.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Invalid algorithm choice '{0}' (valid: grover, shor)")]
    UnknownAlgorithm(String),

    #[error("Invalid optimization level '{0}' (valid: basic, advanced, hardware)")]
    UnknownOptimization(String),
}

/// Bundled example circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Grover,
    Shor,
}

impl Algorithm {
    /// Build the example circuit.
    pub fn circuit(self) -> Result<Circuit> {
        let circuit = match self {
            Algorithm::Grover => Circuit::grover(),
            Algorithm::Shor => Circuit::shor(),
        };
        circuit.with_context(|| format!("Failed to build {self} circuit"))
    }
}

impl FromStr for Algorithm {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grover" => Ok(Algorithm::Grover),
            "shor" => Ok(Algorithm::Shor),
            _ => Err(UsageError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Grover => "grover",
            Algorithm::Shor => "shor",
        })
    }
}

/// Optimization pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optimization {
    /// Commutation rewrite over a rule table.
    Basic,
    /// Reset removal, single-qubit resynthesis and cancellation.
    Advanced,
    /// Layout and routing onto a linear device.
    Hardware,
}

impl Optimization {
    /// The pass pipeline for this level. Only `Basic` uses `table`.
    pub fn pipeline(self, table: CommutationTable) -> PassManagerBuilder {
        let builder = PassManagerBuilder::new();
        match self {
            Optimization::Basic => builder.basic(table),
            Optimization::Advanced => builder.advanced(),
            Optimization::Hardware => builder.hardware(CouplingMap::linear(HARDWARE_QUBITS)),
        }
    }
}

impl FromStr for Optimization {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Optimization::Basic),
            "advanced" => Ok(Optimization::Advanced),
            "hardware" => Ok(Optimization::Hardware),
            _ => Err(UsageError::UnknownOptimization(s.to_string())),
        }
    }
}

impl fmt::Display for Optimization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Optimization::Basic => "basic",
            Optimization::Advanced => "advanced",
            Optimization::Hardware => "hardware",
        })
    }
}

/// Load the rule table from `path`, or the built-in default when absent.
pub fn load_rules(path: Option<&Path>) -> Result<CommutationTable> {
    match path {
        None => Ok(CommutationTable::default()),
        Some(path) => CommutationTable::from_path(path)
            .with_context(|| format!("Failed to load rule table: {}", path.display())),
    }
}
