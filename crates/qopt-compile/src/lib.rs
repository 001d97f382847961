//! qopt compilation passes.
//!
//! This crate rewrites [`CircuitDag`](qopt_ir::CircuitDag)s through a
//! pass-based pipeline. Its core is the commutation rewriter: given a rule
//! table saying which gate may move in front of which, it reorders directly
//! adjacent operation pairs in a single deterministic pass and reports what
//! it did.
//!
//! # Architecture
//!
//! ```text
//! Input DAG
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (coupling map, layout, reports)
//! └─────────────┘
//!       │
//!       ├── basic:    CommutationRewrite
//!       ├── advanced: RemoveResetInZeroState, Optimize1qGates, CommutativeCancellation
//!       └── hardware: TrivialLayout, BasicRouting
//!       │
//!       ▼
//! Output DAG
//! ```
//!
//! # Example
//!
//! ```rust
//! use qopt_compile::{CommutationTable, PassManagerBuilder, RewriteReport};
//! use qopt_ir::Circuit;
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .basic(CommutationTable::default())
//!     .build();
//!
//! let mut dag = Circuit::grover().unwrap().into_dag();
//! pm.run(&mut dag, &mut props).unwrap();
//!
//! let report = props.get::<RewriteReport>().unwrap();
//! assert_eq!(report.swaps, 2);
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to create custom compilation passes:
//!
//! ```rust
//! use qopt_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use qopt_ir::CircuitDag;
//!
//! struct CountOps;
//!
//! impl Pass for CountOps {
//!     fn name(&self) -> &str { "count_ops" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, dag: &mut CircuitDag, props: &mut PropertySet) -> CompileResult<()> {
//!         props.insert(dag.num_ops());
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::agnostic::{
    CommutationRewrite, CommutationRewriter, CommutationTable, DiagnosticKind,
    OperationDescriptor, RewriteReport, SwapDiagnostic, SwapOutcome,
};
pub use property::{CouplingMap, Layout, PropertySet};
