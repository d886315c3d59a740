//! K-Means fitting, elbow sweep, and cluster statistics

use linfa::prelude::*;
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::PipelineError;

/// Cluster count of the final partition. Fixed regardless of the elbow curve.
pub const FINAL_CLUSTER_COUNT: usize = 3;

/// Largest cluster count probed by the elbow sweep (k = 1..=5).
pub const ELBOW_MAX_K: usize = 5;

/// Independent centroid re-initializations per fit; best inertia wins.
const N_RUNS: usize = 10;

/// One point of the elbow curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ElbowPoint {
    pub k: usize,
    pub inertia: f64,
}

/// Fitted K-Means partition over a standardized feature matrix.
#[derive(Debug)]
pub struct KMeansModel {
    pub model: KMeans<f64, L2Dist>,
    pub n_clusters: usize,
    /// Cluster label per input row, in input row order.
    pub labels: Array1<usize>,
    /// Centroids in standardized feature space.
    pub centroids: Array2<f64>,
    /// Within-cluster sum of squared distances.
    pub inertia: f64,
}

impl KMeansModel {
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters];
        for &label in self.labels.iter() {
            if label < self.n_clusters {
                sizes[label] += 1;
            }
        }
        sizes
    }
}

/// Fit K-Means over a standardized `(n, 2)` matrix.
///
/// The seed pins centroid initialization, so identical input produces
/// identical labels across runs.
pub fn fit_kmeans(
    features: &Array2<f64>,
    n_clusters: usize,
    max_iters: u64,
    tolerance: f64,
    seed: u64,
) -> crate::Result<KMeansModel> {
    if n_clusters == 0 {
        anyhow::bail!("cluster count must be at least 1");
    }
    if features.nrows() < n_clusters {
        return Err(PipelineError::insufficient(format!(
            "{} rows cannot support {} clusters",
            features.nrows(),
            n_clusters
        ))
        .into());
    }

    let dataset = DatasetBase::from(features.clone());
    let rng = StdRng::seed_from_u64(seed);

    let model = KMeans::params_with(n_clusters, rng, L2Dist)
        .n_runs(N_RUNS)
        .max_n_iterations(max_iters)
        .tolerance(tolerance)
        .fit(&dataset)?;

    let labels = model.predict(features);
    let centroids = model.centroids().clone();
    let inertia = compute_inertia(features, &labels, &centroids);

    Ok(KMeansModel {
        model,
        n_clusters,
        labels,
        centroids,
        inertia,
    })
}

/// Fit k = 1..=5 over the same matrix and record the inertia of each fit.
///
/// The resulting sequence is non-increasing in inertia for a correct fit;
/// no "optimal k" is chosen here, the curve is advisory.
pub fn elbow_sweep(
    features: &Array2<f64>,
    max_iters: u64,
    tolerance: f64,
    seed: u64,
) -> crate::Result<Vec<ElbowPoint>> {
    let mut curve = Vec::with_capacity(ELBOW_MAX_K);
    for k in 1..=ELBOW_MAX_K {
        let model = fit_kmeans(features, k, max_iters, tolerance, seed)?;
        curve.push(ElbowPoint {
            k,
            inertia: model.inertia,
        });
    }
    Ok(curve)
}

/// Within-cluster sum of squared distances to assigned centroids.
fn compute_inertia(features: &Array2<f64>, labels: &Array1<usize>, centroids: &Array2<f64>) -> f64 {
    let mut inertia = 0.0;
    for (i, &cluster) in labels.iter().enumerate() {
        if cluster < centroids.nrows() {
            let point = features.row(i);
            let centroid = centroids.row(cluster);
            inertia += point
                .iter()
                .zip(centroid.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>();
        }
    }
    inertia
}
