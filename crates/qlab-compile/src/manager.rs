//! Ordered pass execution and the level presets.

use tracing::{debug, info, instrument};

use qlab_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::{Pass, PassRecord};
use crate::passes::{BasisTranslation, CancelCX, CheckConnectivity, Optimize1qGates, TrivialLayout};
use crate::property::{BasisGates, CouplingMap, PropertySet};

/// Highest supported optimization level.
pub const MAX_OPTIMIZATION_LEVEL: u8 = 3;

/// Runs passes in the order they were added.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run every pass over `dag`, stopping at the first error.
    ///
    /// Returns one record per scheduled pass, skipped ones included.
    #[instrument(skip_all, fields(passes = self.passes.len(), qubits = dag.num_qubits()))]
    pub fn run(
        &self,
        dag: &mut CircuitDag,
        properties: &mut PropertySet,
    ) -> CompileResult<Vec<PassRecord>> {
        let mut records = Vec::with_capacity(self.passes.len());

        for pass in &self.passes {
            let ops_before = dag.num_ops();
            if !pass.should_run(dag, properties) {
                debug!(pass = pass.name(), "skipped");
                records.push(PassRecord::skipped(pass.name(), ops_before));
                continue;
            }

            pass.run(dag, properties)?;
            let ops_after = dag.num_ops();
            debug!(pass = pass.name(), ops_before, ops_after, "pass finished");
            records.push(PassRecord {
                pass: pass.name(),
                skipped: false,
                ops_before,
                ops_after,
            });
        }

        info!(depth = dag.depth(), ops = dag.num_ops(), "transpilation finished");
        Ok(records)
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Assembles a [`PassManager`] for a target and optimization level.
///
/// Layout and connectivity checking need a coupling map; translation
/// needs basis gates. Either is left out when its target half is missing.
///
/// | Level | Optimization passes |
/// |-------|---------------------|
/// | 0 | none |
/// | 1 | `Optimize1qGates` |
/// | 2 | + `CancelCX` |
/// | 3 | + `Optimize1qGates` again |
pub struct PassManagerBuilder {
    optimization_level: u8,
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Starts at level 1 with no target.
    pub fn new() -> Self {
        Self {
            optimization_level: 1,
            properties: PropertySet::new(),
        }
    }

    /// Levels above [`MAX_OPTIMIZATION_LEVEL`] are clamped.
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(MAX_OPTIMIZATION_LEVEL);
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn with_target(mut self, coupling_map: CouplingMap, basis_gates: BasisGates) -> Self {
        self.properties = self.properties.with_target(coupling_map, basis_gates);
        self
    }

    /// The pass manager plus the property set it should run with.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();
        let level = self.optimization_level;

        if self.properties.coupling_map.is_some() {
            pm.add_pass(TrivialLayout);
            pm.add_pass(CheckConnectivity);
        }
        if self.properties.basis_gates.is_some() {
            pm.add_pass(BasisTranslation);
        }

        // Second 1q sweep cleans up rotations exposed by CX cancellation.
        match level {
            0 => {}
            1 => pm.add_pass(Optimize1qGates),
            2 => {
                pm.add_pass(Optimize1qGates);
                pm.add_pass(CancelCX);
            }
            _ => {
                pm.add_pass(Optimize1qGates);
                pm.add_pass(CancelCX);
                pm.add_pass(Optimize1qGates);
            }
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
