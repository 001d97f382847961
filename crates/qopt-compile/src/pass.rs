//! Pass trait and types for compilation passes.

use qopt_ir::CircuitDag;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Reads the DAG and writes to the `PropertySet`.
    Analysis,
    /// Rewrites the DAG.
    Transformation,
}

/// A compilation pass that operates on a circuit DAG.
///
/// Passes hold the DAG exclusively for the duration of [`Pass::run`] and
/// communicate with each other through the [`PropertySet`].
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given DAG.
    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPass;

    impl Pass for TestPass {
        fn name(&self) -> &'static str {
            "test"
        }

        fn kind(&self) -> PassKind {
            PassKind::Analysis
        }

        fn run(&self, _dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
            properties.insert(7u32);
            Ok(())
        }
    }

    #[test]
    fn test_pass_defaults() {
        let pass = TestPass;
        let dag = CircuitDag::new();
        let props = PropertySet::new();
        assert_eq!(pass.kind(), PassKind::Analysis);
        assert_eq!(pass.name(), "test");
        assert!(pass.should_run(&dag, &props));
    }

    #[test]
    fn test_pass_writes_property() {
        let mut dag = CircuitDag::new();
        let mut props = PropertySet::new();
        TestPass.run(&mut dag, &mut props).unwrap();
        assert_eq!(props.get::<u32>(), Some(&7));
    }
}
