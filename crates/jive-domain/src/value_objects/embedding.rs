//! Embedding value object.

use serde::{Deserialize, Serialize};

/// A fixed-dimension vector produced by an embedding provider.
///
/// Vectors are unit-L2-normalised at the provider boundary, so cosine
/// similarity reduces to the inner product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// The vector components
    pub vector: Vec<f32>,
    /// Identifier of the model that produced the vector
    pub model: String,
    /// Dimension of the vector
    pub dimensions: usize,
}

impl Embedding {
    /// Build an embedding, recording the producing model.
    #[must_use]
    pub fn new(vector: Vec<f32>, model: impl Into<String>) -> Self {
        let dimensions = vector.len();
        Self {
            vector,
            model: model.into(),
            dimensions,
        }
    }

    /// Scale the vector to unit L2 norm in place. Zero vectors are left as-is.
    pub fn l2_normalize(&mut self) {
        let norm = self.vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut self.vector {
                *v /= norm;
            }
        }
    }

    /// L2 norm of the vector.
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.vector.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Cosine similarity against another vector of the same dimension.
    ///
    /// Returns 0.0 when dimensions differ or either vector is zero.
    #[must_use]
    pub fn cosine(&self, other: &[f32]) -> f32 {
        cosine_similarity(&self.vector, other)
    }
}

/// Cosine similarity between two raw vectors.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_yields_unit_norm() {
        let mut e = Embedding::new(vec![3.0, 4.0], "test");
        e.l2_normalize();
        assert!((e.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_identical_unit_vectors_is_one() {
        let mut e = Embedding::new(vec![1.0, 2.0, 3.0], "test");
        e.l2_normalize();
        let v = e.vector.clone();
        assert!((e.cosine(&v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_handles_mismatched_and_zero_vectors() {
        let e = Embedding::new(vec![1.0, 0.0], "test");
        assert_eq!(e.cosine(&[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(e.cosine(&[0.0, 0.0]), 0.0);
    }
}
