//! Commutation-driven reordering of adjacent operations.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use qopt_ir::{CircuitDag, IrError, NodeIndex};

use super::rules::{CommutationTable, OperationDescriptor};
use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of one attempt to move a node before a predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The two nodes were exchanged.
    Swapped,
    /// No direct edge joined the pair when the attempt was made.
    NotDirectlyConnected,
    /// The exchange was refused; the DAG is unchanged.
    InvalidSwap {
        /// Why the exchange was refused.
        reason: String,
    },
}

/// Why a planned exchange did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// See [`SwapOutcome::NotDirectlyConnected`].
    NotDirectlyConnected,
    /// See [`SwapOutcome::InvalidSwap`].
    InvalidSwap {
        /// Why the exchange was refused.
        reason: String,
    },
}

/// A skipped exchange, kept for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapDiagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Index of the later node.
    pub node: usize,
    /// Index of the predecessor it should have moved before.
    pub predecessor: usize,
    /// Gate name of the later node.
    pub node_name: String,
    /// Gate name of the predecessor.
    pub predecessor_name: String,
}

/// Summary of one rewrite pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteReport {
    /// Pairs the rule table said commute.
    pub attempts: usize,
    /// Pairs actually exchanged.
    pub swaps: usize,
    /// One entry per attempt that did not swap.
    pub diagnostics: Vec<SwapDiagnostic>,
}

/// Reorders adjacent operation pairs that a [`CommutationTable`] says commute.
///
/// One pass, planned up front:
///
/// 1. Walk the DAG in its deterministic topological order (ties broken by
///    insertion order) and record every operation's direct operation
///    predecessors. This list is fixed for the rest of the pass.
/// 2. Visit each node once in plan order. For each recorded predecessor
///    `p` of node `n`, if the table says `n` commutes with `p`, try to
///    exchange them with [`CircuitDag::swap_adjacent`].
///
/// Earlier exchanges can move a recorded predecessor away from `n`; such
/// attempts report [`SwapOutcome::NotDirectlyConnected`] and change nothing.
/// No attempt ever fails the pass.
#[derive(Debug, Clone, Default)]
pub struct CommutationRewriter {
    table: CommutationTable,
}

impl CommutationRewriter {
    /// Create a rewriter over a rule table.
    pub fn new(table: CommutationTable) -> Self {
        Self { table }
    }

    /// The rule table in use.
    pub fn table(&self) -> &CommutationTable {
        &self.table
    }

    /// Visit order and the predecessor snapshot for each visited node.
    pub fn plan(dag: &CircuitDag) -> Vec<(NodeIndex, Vec<NodeIndex>)> {
        dag.topological_ops()
            .map(|(node, _)| (node, dag.op_predecessors(node)))
            .collect()
    }

    /// Rewrite a DAG the caller no longer needs, returning the result.
    pub fn optimize(&self, mut dag: CircuitDag) -> (CircuitDag, RewriteReport) {
        let report = self.rewrite(&mut dag);
        (dag, report)
    }

    /// Rewrite `dag` in place.
    pub fn rewrite(&self, dag: &mut CircuitDag) -> RewriteReport {
        let mut report = RewriteReport::default();

        for (node, preds) in Self::plan(dag) {
            for pred in preds {
                let (Some(n), Some(p)) = (dag.get_instruction(node), dag.get_instruction(pred))
                else {
                    continue;
                };
                let commutes = self
                    .table
                    .commutes(&OperationDescriptor::from(n), &OperationDescriptor::from(p));
                if !commutes {
                    continue;
                }
                let node_name = n.name().to_string();
                let pred_name = p.name().to_string();

                report.attempts += 1;
                let outcome = Self::try_swap(dag, pred, node);
                debug!(
                    "commute {node_name}[{}] before {pred_name}[{}]: {outcome:?}",
                    node.index(),
                    pred.index()
                );

                let kind = match outcome {
                    SwapOutcome::Swapped => {
                        report.swaps += 1;
                        continue;
                    }
                    SwapOutcome::NotDirectlyConnected => DiagnosticKind::NotDirectlyConnected,
                    SwapOutcome::InvalidSwap { reason } => {
                        warn!("skipping swap of {node_name} and {pred_name}: {reason}");
                        DiagnosticKind::InvalidSwap { reason }
                    }
                };
                report.diagnostics.push(SwapDiagnostic {
                    kind,
                    node: node.index(),
                    predecessor: pred.index(),
                    node_name,
                    predecessor_name: pred_name,
                });
            }
        }

        debug!(
            "commutation rewrite: {} attempts, {} swaps",
            report.attempts, report.swaps
        );
        report
    }

    /// Try to move `node` in front of `pred`.
    ///
    /// Requires a direct `pred → node` edge at the time of the call.
    pub fn try_swap(dag: &mut CircuitDag, pred: NodeIndex, node: NodeIndex) -> SwapOutcome {
        if !dag.has_edge(pred, node) {
            return SwapOutcome::NotDirectlyConnected;
        }
        match dag.swap_adjacent(pred, node) {
            Ok(()) => SwapOutcome::Swapped,
            Err(IrError::NotDirectlyConnected { .. }) => SwapOutcome::NotDirectlyConnected,
            Err(e) => SwapOutcome::InvalidSwap {
                reason: e.to_string(),
            },
        }
    }
}

/// [`CommutationRewriter`] as a pipeline pass.
///
/// Leaves its [`RewriteReport`] in the property set.
#[derive(Debug, Clone, Default)]
pub struct CommutationRewrite {
    rewriter: CommutationRewriter,
}

impl CommutationRewrite {
    /// Create the pass over a rule table.
    pub fn new(table: CommutationTable) -> Self {
        Self {
            rewriter: CommutationRewriter::new(table),
        }
    }
}

impl Pass for CommutationRewrite {
    fn name(&self) -> &'static str {
        "CommutationRewrite"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let report = self.rewriter.rewrite(dag);
        properties.insert(report);
        Ok(())
    }
}
