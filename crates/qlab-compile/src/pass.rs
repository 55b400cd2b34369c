//! The unit of work in a transpilation pipeline.

use qlab_ir::CircuitDag;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// What a pass is allowed to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Inspects the DAG and records findings in the [`PropertySet`].
    Analysis,
    /// Rewrites the DAG.
    Transformation,
}

/// One transpilation step.
///
/// Passes hold no state of their own. Anything a later pass needs to know
/// travels through the [`PropertySet`].
pub trait Pass: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> PassKind;

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()>;

    /// Returning `false` skips the pass for this run only.
    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        true
    }
}

/// What happened to one scheduled pass during [`PassManager::run`].
///
/// [`PassManager::run`]: crate::PassManager::run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassRecord {
    pub pass: &'static str,
    pub skipped: bool,
    pub ops_before: usize,
    pub ops_after: usize,
}

impl PassRecord {
    pub(crate) fn skipped(pass: &'static str, ops: usize) -> Self {
        Self {
            pass,
            skipped: true,
            ops_before: ops,
            ops_after: ops,
        }
    }

    pub fn changed_op_count(&self) -> bool {
        self.ops_before != self.ops_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Layout;

    /// Records a one-qubit layout once, then asks to be skipped.
    struct LayoutOnce;

    impl Pass for LayoutOnce {
        fn name(&self) -> &'static str {
            "LayoutOnce"
        }

        fn kind(&self) -> PassKind {
            PassKind::Analysis
        }

        fn run(&self, _dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
            properties.layout = Some(Layout::trivial(1));
            Ok(())
        }

        fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
            properties.layout.is_none()
        }
    }

    #[test]
    fn test_should_run_sees_previous_results() {
        let mut dag = CircuitDag::new();
        let mut props = PropertySet::new();

        assert!(LayoutOnce.should_run(&dag, &props));
        LayoutOnce.run(&mut dag, &mut props).unwrap();
        assert!(!LayoutOnce.should_run(&dag, &props));
        assert_eq!(LayoutOnce.kind(), PassKind::Analysis);
    }

    #[test]
    fn test_skipped_record_keeps_count() {
        let record = PassRecord::skipped("LayoutOnce", 7);
        assert!(record.skipped);
        assert!(!record.changed_op_count());
    }
}
