//! Classical and quantum correlation estimators.
//!
//! The classical side is Pearson's r with a two-sided p-value. The quantum
//! side encodes each (x, y) pair as RY rotations on two qubits, optionally
//! entangles them with a CX, and reads the exact ⟨Z⊗Z⟩ expectation.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::{debug, instrument};

use qlab_adapter_sim::Estimator;
use qlab_ir::{Circuit, IrResult, QubitId};

use crate::dataset::Dataset;
use crate::encoding::{EncodingScale, angle_encode};
use crate::error::{PrimitivesError, PrimitivesResult};

/// Pearson correlation of two samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pearson {
    /// Correlation coefficient in [-1, 1].
    pub r: f64,
    /// Two-sided p-value for the null hypothesis r = 0.
    pub p_value: f64,
    pub n: usize,
}

/// Pearson's r over a dataset's (x, y) pairs.
pub fn classical_corr(dataset: &Dataset) -> PrimitivesResult<Pearson> {
    pearson(&dataset.xs(), &dataset.ys())
}

/// Pearson's r and its p-value from Student's t with n − 2 degrees of freedom.
pub fn pearson(xs: &[f64], ys: &[f64]) -> PrimitivesResult<Pearson> {
    if xs.len() != ys.len() {
        return Err(PrimitivesError::InvalidInput(format!(
            "samples differ in length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    let n = xs.len();
    if n < 3 {
        return Err(PrimitivesError::InvalidInput(format!(
            "Pearson correlation needs at least 3 points, got {n}"
        )));
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return Err(PrimitivesError::InvalidInput(
            "Pearson correlation is undefined for a constant sample".into(),
        ));
    }

    let r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);
    let df = (n - 2) as f64;
    let p_value = if r.abs() >= 1.0 {
        0.0
    } else {
        let t = r * (df / (1.0 - r * r)).sqrt();
        let dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| PrimitivesError::InvalidInput(e.to_string()))?;
        (2.0 * dist.sf(t.abs())).min(1.0)
    };

    Ok(Pearson { r, p_value, n })
}

/// RY(θx) on qubit 0, RY(θy) on qubit 1, then CX(0→1) if `entangle`.
pub fn feature_map(theta_x: f64, theta_y: f64, entangle: bool) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("feature_map", 2, 0);
    circuit.ry(theta_x, QubitId(0))?.ry(theta_y, QubitId(1))?;
    if entangle {
        circuit.cx(QubitId(0), QubitId(1))?;
    }
    Ok(circuit)
}

/// Exact ⟨Z⊗Z⟩ for every point of `dataset`, in input order.
///
/// Each coordinate is angle-encoded over the dataset's own range, into
/// `[0, 2π]` when `health_mode` is set and `[0, π]` otherwise.
#[instrument(skip(dataset), fields(dataset = %dataset.name, points = dataset.len()))]
pub fn quantum_zz(dataset: &Dataset, entangle: bool, health_mode: bool) -> PrimitivesResult<Vec<f64>> {
    let (Some((x_min, x_max)), Some((y_min, y_max))) = (dataset.x_range(), dataset.y_range())
    else {
        return Ok(Vec::new());
    };
    let scale = EncodingScale::for_health_mode(health_mode).factor();
    let estimator = Estimator::new();

    let values = dataset
        .points
        .iter()
        .map(|p| -> PrimitivesResult<f64> {
            let circuit = feature_map(
                angle_encode(p.x, x_min, x_max, scale),
                angle_encode(p.y, y_min, y_max, scale),
                entangle,
            )?;
            Ok(estimator.expectation_zz(&circuit, QubitId(0), QubitId(1))?)
        })
        .collect::<PrimitivesResult<Vec<f64>>>()?;

    debug!(count = values.len(), "computed ZZ expectations");
    Ok(values)
}

/// Classical and quantum statistics for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub dataset: String,
    pub pearson: Pearson,
    /// ⟨Z⊗Z⟩ per point, product-state feature map.
    pub zz_product: Vec<f64>,
    /// ⟨Z⊗Z⟩ per point, entangled feature map.
    pub zz_entangled: Vec<f64>,
    pub mean_zz_product: f64,
    pub mean_zz_entangled: f64,
}

impl CorrelationReport {
    /// Run both estimators. The health dataset uses the 2π scale.
    pub fn compute(dataset: &Dataset) -> PrimitivesResult<Self> {
        let pearson = classical_corr(dataset)?;
        let health_mode = dataset.is_health();
        let zz_product = quantum_zz(dataset, false, health_mode)?;
        let zz_entangled = quantum_zz(dataset, true, health_mode)?;

        Ok(Self {
            dataset: dataset.name.clone(),
            pearson,
            mean_zz_product: mean(&zz_product),
            mean_zz_entangled: mean(&zz_entangled),
            zz_product,
            zz_entangled,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
