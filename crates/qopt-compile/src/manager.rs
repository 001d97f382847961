//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use qopt_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    BasicRouting, CommutationRewrite, CommutationTable, CommutativeCancellation, Optimize1qGates,
    RemoveResetInZeroState, TrivialLayout,
};
use crate::property::{CouplingMap, PropertySet};

/// Manages and executes a sequence of compilation passes.
#[derive(Default)]
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG.
    #[instrument(skip(self, dag, properties))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            dag.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(dag, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(dag, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), dag.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            dag.depth(),
            dag.num_ops()
        );

        Ok(())
    }

    /// Names of the passes, in run order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl std::fmt::Debug for PassManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassManager")
            .field("passes", &self.pass_names())
            .finish()
    }
}

/// Builder for pass managers with preset pipelines.
///
/// Presets append to whatever is already queued, so they compose:
///
/// ```
/// use qopt_compile::{CommutationTable, CouplingMap, PassManagerBuilder};
///
/// let (pm, props) = PassManagerBuilder::new()
///     .basic(CommutationTable::default())
///     .hardware(CouplingMap::linear(5))
///     .build();
///
/// assert_eq!(
///     pm.pass_names(),
///     ["CommutationRewrite", "TrivialLayout", "BasicRouting"]
/// );
/// assert!(props.coupling_map.is_some());
/// ```
#[derive(Default)]
pub struct PassManagerBuilder {
    manager: PassManager,
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a builder with no passes and empty properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing property set.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Append an arbitrary pass.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.manager.add_pass(pass);
        self
    }

    /// The commutation rewrite over `table`.
    #[must_use]
    pub fn basic(self, table: CommutationTable) -> Self {
        self.with_pass(CommutationRewrite::new(table))
    }

    /// Reset removal, single-qubit resynthesis and cancellation.
    #[must_use]
    pub fn advanced(self) -> Self {
        self.with_pass(RemoveResetInZeroState::new())
            .with_pass(Optimize1qGates::new())
            .with_pass(CommutativeCancellation::new())
    }

    /// Layout and routing onto `coupling_map`.
    #[must_use]
    pub fn hardware(mut self, coupling_map: CouplingMap) -> Self {
        self.properties.coupling_map = Some(coupling_map);
        self.with_pass(TrivialLayout).with_pass(BasicRouting)
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        (self.manager, self.properties)
    }
}
