//! K-means cluster assignment

use crate::artifact::InvalidArtifact;
use crate::predictor::{ensure_n_features, Predictor};
use modelserve_core::Result;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Fitted k-means model; predicts the index of the nearest centroid
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Shape: (n_clusters, n_features)
    centers: Array2<f64>,
}

impl KMeans {
    /// Create a model from its cluster centers
    pub fn new(cluster_centers: Vec<Vec<f64>>) -> std::result::Result<Self, InvalidArtifact> {
        let n_clusters = cluster_centers.len();
        let n_features = cluster_centers.first().map(Vec::len).unwrap_or(0);

        if n_clusters == 0 || n_features == 0 {
            return Err(InvalidArtifact::new("k-means has no cluster centers"));
        }
        if cluster_centers.iter().any(|c| c.len() != n_features) {
            return Err(InvalidArtifact::new(
                "k-means cluster centers differ in dimension",
            ));
        }

        let flat: Vec<f64> = cluster_centers.into_iter().flatten().collect();
        if flat.iter().any(|v| !v.is_finite()) {
            return Err(InvalidArtifact::new("k-means cluster centers must be finite"));
        }

        let centers = Array2::from_shape_vec((n_clusters, n_features), flat)
            .map_err(|e| InvalidArtifact::new(e.to_string()))?;

        Ok(Self { centers })
    }

    /// Number of clusters
    pub fn n_clusters(&self) -> usize {
        self.centers.nrows()
    }

    fn nearest(&self, row: ArrayView1<'_, f64>) -> usize {
        let mut best = (0, f64::INFINITY);
        for (index, center) in self.centers.axis_iter(Axis(0)).enumerate() {
            let distance: f64 = center
                .iter()
                .zip(row.iter())
                .map(|(c, x)| (c - x) * (c - x))
                .sum();
            if distance < best.1 {
                best = (index, distance);
            }
        }
        best.0
    }
}

impl Predictor for KMeans {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        ensure_n_features(self.algorithm(), self.n_features(), &features)?;

        Ok(features
            .axis_iter(Axis(0))
            .map(|row| self.nearest(row) as f64)
            .collect())
    }

    fn algorithm(&self) -> &str {
        "KMeans"
    }

    fn n_features(&self) -> usize {
        self.centers.ncols()
    }
}
