//! Layout passes for mapping logical qubits to physical qubits.

use tracing::debug;

use qopt_ir::CircuitDag;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{Layout, PropertySet};

/// Trivial layout pass.
///
/// Maps the circuit's qubits, in ascending order, onto physical qubits
/// `0, 1, 2, ...`. For circuits whose qubits are numbered from zero this is
/// the identity mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;

        let qubits = dag.qubits();
        let available = coupling_map.num_qubits();
        if qubits.len() > available as usize {
            return Err(CompileError::CircuitTooLarge {
                required: qubits.len(),
                available,
            });
        }

        let mut layout = Layout::new();
        for (physical, logical) in (0..available).zip(qubits) {
            layout.add(logical, physical);
        }
        debug!("trivial layout over {} qubits", layout.len());
        properties.layout = Some(layout);

        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.layout.is_none()
    }
}
