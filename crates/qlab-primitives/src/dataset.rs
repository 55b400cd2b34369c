//! The four height/weight demo datasets.
//!
//! All datasets are drawn from one injected generator, in a fixed order, so a
//! seed fully determines the catalog:
//!
//! 1. `x = linspace(150, 199, 100)`
//! 2. Positive: `y = 0.5x - 25 + N(0, 2)`
//! 3. Negative: `y = -0.5x + 150 + N(0, 2)`
//! 4. Uncorrelated: `y ~ U(40, 100)`
//! 5. XOR health: 100 points from four height/weight clusters

use std::fmt;

use rand::Rng;
use rand::SeedableRng;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use tracing::debug;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Points per dataset.
pub const DATASET_SIZE: usize = 100;

const NOISE_STD: f64 = 2.0;

/// One (height, weight) sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

/// Which demo dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKind {
    Positive,
    Negative,
    Uncorrelated,
    XorHealth,
}

impl DatasetKind {
    /// All kinds, in catalog order.
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Positive,
        DatasetKind::Negative,
        DatasetKind::Uncorrelated,
        DatasetKind::XorHealth,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::Positive => "Positive Correlation",
            DatasetKind::Negative => "Negative Correlation",
            DatasetKind::Uncorrelated => "Uncorrelated",
            DatasetKind::XorHealth => "X-or health data",
        }
    }

    /// URL slug.
    pub fn slug(self) -> &'static str {
        match self {
            DatasetKind::Positive => "positive",
            DatasetKind::Negative => "negative",
            DatasetKind::Uncorrelated => "uncorrelated",
            DatasetKind::XorHealth => "xor-health",
        }
    }

    /// Look up by display name or slug, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.slug().eq_ignore_ascii_case(name) || k.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable named sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub kind: DatasetKind,
    pub name: String,
    pub points: Vec<DataPoint>,
    /// Cluster labels (1 = outlier). Only the health dataset has them; nothing
    /// downstream reads them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<u8>>,
}

impl Dataset {
    /// Build a dataset from points.
    pub fn new(kind: DatasetKind, points: Vec<DataPoint>) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            points,
            labels: None,
        }
    }

    fn with_labels(mut self, labels: Vec<u8>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(min, max)` of x. `None` for an empty dataset.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        range(self.points.iter().map(|p| p.x))
    }

    /// `(min, max)` of y. `None` for an empty dataset.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        range(self.points.iter().map(|p| p.y))
    }

    /// Whether angles for this dataset use the 2π health scale.
    pub fn is_health(&self) -> bool {
        self.kind == DatasetKind::XorHealth
    }
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// The four datasets, generated once and shared read-only.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    datasets: Vec<Dataset>,
}

impl DatasetCatalog {
    /// Generate every dataset from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let xs = linspace(150.0, 199.0, DATASET_SIZE);
        let noise = Normal::standard();

        let positive = xs
            .iter()
            .map(|&x| DataPoint {
                x,
                y: 0.5 * x - 25.0 + NOISE_STD * noise.sample(&mut *rng),
            })
            .collect();
        let negative = xs
            .iter()
            .map(|&x| DataPoint {
                x,
                y: -0.5 * x + 150.0 + NOISE_STD * noise.sample(&mut *rng),
            })
            .collect();
        let uncorrelated = xs
            .iter()
            .map(|&x| DataPoint {
                x,
                y: rng.gen_range(40.0..100.0),
            })
            .collect();

        let mut health = Vec::with_capacity(DATASET_SIZE);
        let mut labels = Vec::with_capacity(DATASET_SIZE);
        for _ in 0..DATASET_SIZE {
            let (point, label) = health_point(&mut *rng);
            health.push(point);
            labels.push(label);
        }

        debug!(points = DATASET_SIZE, "generated dataset catalog");
        Self {
            datasets: vec![
                Dataset::new(DatasetKind::Positive, positive),
                Dataset::new(DatasetKind::Negative, negative),
                Dataset::new(DatasetKind::Uncorrelated, uncorrelated),
                Dataset::new(DatasetKind::XorHealth, health).with_labels(labels),
            ],
        }
    }

    /// Generate with `StdRng::seed_from_u64(seed)`.
    pub fn with_seed(seed: u64) -> Self {
        Self::generate(&mut StdRng::seed_from_u64(seed))
    }

    pub fn get(&self, kind: DatasetKind) -> &Dataset {
        // One dataset per kind, stored in declaration order.
        &self.datasets[kind as usize]
    }

    /// Look up by display name or slug.
    pub fn by_name(&self, name: &str) -> Option<&Dataset> {
        DatasetKind::parse(name).map(|kind| self.get(kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

/// Tall/Light and Short/Heavy are outliers (label 1).
fn health_point<R: Rng + ?Sized>(rng: &mut R) -> (DataPoint, u8) {
    const TALL: (f64, f64) = (185.0, 200.0);
    const SHORT: (f64, f64) = (150.0, 165.0);
    const LIGHT: (f64, f64) = (50.0, 65.0);
    const HEAVY: (f64, f64) = (95.0, 110.0);

    let (height, weight, label) = match rng.gen_range(0..4) {
        0 => (TALL, LIGHT, 1),
        1 => (SHORT, HEAVY, 1),
        2 => (SHORT, LIGHT, 0),
        _ => (TALL, HEAVY, 0),
    };
    let x = rng.gen_range(height.0..height.1);
    let y = rng.gen_range(weight.0..weight.1);
    (DataPoint { x, y }, label)
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let catalog = DatasetCatalog::default();
        let kinds: Vec<_> = catalog.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, DatasetKind::ALL);
        for dataset in catalog.iter() {
            assert_eq!(dataset.len(), DATASET_SIZE);
        }
    }

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(150.0, 199.0, 100);
        assert_eq!(xs[0], 150.0);
        assert!((xs[99] - 199.0).abs() < 1e-9);
        assert!((xs[1] - xs[0] - 49.0 / 99.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_catalog() {
        let a = DatasetCatalog::with_seed(7);
        let b = DatasetCatalog::with_seed(7);
        let c = DatasetCatalog::with_seed(8);
        assert_eq!(a.get(DatasetKind::Positive), b.get(DatasetKind::Positive));
        assert_ne!(a.get(DatasetKind::Positive), c.get(DatasetKind::Positive));
    }

    #[test]
    fn test_uncorrelated_range() {
        let catalog = DatasetCatalog::default();
        let (lo, hi) = catalog.get(DatasetKind::Uncorrelated).y_range().unwrap();
        assert!(lo >= 40.0 && hi < 100.0);
    }

    #[test]
    fn test_health_clusters_and_labels() {
        let catalog = DatasetCatalog::default();
        let health = catalog.get(DatasetKind::XorHealth);
        assert!(health.is_health());
        let labels = health.labels.as_ref().unwrap();
        assert_eq!(labels.len(), DATASET_SIZE);

        for (p, &label) in health.points.iter().zip(labels) {
            let tall = (185.0..200.0).contains(&p.x);
            let short = (150.0..165.0).contains(&p.x);
            let light = (50.0..65.0).contains(&p.y);
            let heavy = (95.0..110.0).contains(&p.y);
            assert!(tall ^ short);
            assert!(light ^ heavy);
            let outlier = (tall && light) || (short && heavy);
            assert_eq!(label, u8::from(outlier));
        }
    }

    #[test]
    fn test_lookup_by_name_or_slug() {
        let catalog = DatasetCatalog::default();
        assert_eq!(
            catalog.by_name("Positive Correlation").unwrap().kind,
            DatasetKind::Positive
        );
        assert_eq!(
            catalog.by_name("xor-health").unwrap().kind,
            DatasetKind::XorHealth
        );
        assert_eq!(
            catalog.by_name("x-or HEALTH data").unwrap().kind,
            DatasetKind::XorHealth
        );
        assert!(catalog.by_name("nope").is_none());
    }
}
