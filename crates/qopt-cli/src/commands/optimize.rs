//! Optimize command implementation.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use qopt_compile::{CommutationTable, RewriteReport};
use qopt_sim::Simulator;

use super::common::{Algorithm, Optimization, load_rules};
use crate::Cli;
use crate::report::{Metrics, Report, Simulation};

/// Build, optimize, optionally simulate, and print the comparison.
pub fn execute(cli: &Cli) -> Result<()> {
    let algorithm: Algorithm = cli.algorithm.parse()?;
    let optimization: Optimization = cli.optimization.parse()?;

    let table = if optimization == Optimization::Basic {
        load_rules(cli.rules.as_deref())?
    } else {
        if cli.rules.is_some() {
            warn!("Rule table is only used by the basic pipeline, ignoring --rules");
        }
        CommutationTable::default()
    };

    let original = algorithm.circuit()?.into_dag();
    info!(
        "Built {algorithm} circuit: {} qubits, {} ops",
        original.num_qubits(),
        original.num_ops()
    );

    let (pm, mut props) = optimization.pipeline(table).build();
    let mut optimized = original.clone();
    pm.run(&mut optimized, &mut props)
        .with_context(|| format!("{optimization} optimization failed"))?;

    let diagnostics = props
        .get::<RewriteReport>()
        .map(|r| r.diagnostics.clone())
        .unwrap_or_default();

    let simulation = if cli.simulate {
        let mut sim = Simulator::new().with_shots(cli.shots);
        if let Some(seed) = cli.seed {
            sim = sim.with_seed(seed);
        }
        Some(Simulation {
            original: sim.run(&original).context("Simulation failed")?,
            optimized: sim.run(&optimized).context("Simulation failed")?,
        })
    } else {
        None
    };

    let report = Report {
        algorithm: algorithm.to_string(),
        optimization: optimization.to_string(),
        original: Metrics::of(&original),
        optimized: Metrics::of(&optimized),
        simulation,
        diagnostics,
    };

    let out = report.render(cli.format)?;
    std::io::stdout()
        .lock()
        .write_all(out.as_bytes())
        .context("Failed to write report")?;
    Ok(())
}
