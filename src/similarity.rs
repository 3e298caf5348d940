//! Cosine similarity over dense feature rows.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Cosine similarity between two vectors. Zero if either has zero norm.
pub fn cosine(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Rows rescaled to unit norm; zero rows stay zero.
fn normalize_rows(features: ArrayView2<'_, f32>) -> Array2<f32> {
    let mut normalized = features.to_owned();
    for mut row in normalized.axis_iter_mut(Axis(0)) {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
    normalized
}

/// All-pairs cosine similarity matrix. O(N^2 * D) dense computation,
/// intended for small-to-medium catalogs.
pub fn similarity_matrix(features: ArrayView2<'_, f32>) -> Array2<f32> {
    let normalized = normalize_rows(features);
    normalized.dot(&normalized.t())
}

/// Cosine similarity of one vector against every feature row.
pub fn scores_against_rows(vector: ArrayView1<'_, f32>, features: ArrayView2<'_, f32>) -> Array1<f32> {
    let n = features.nrows();
    let mut scores = Array1::<f32>::zeros(n);
    for (i, row) in features.axis_iter(Axis(0)).enumerate() {
        scores[i] = cosine(vector, row);
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cosine_identical_vectors() {
        let a = array![1.0, 2.0, 3.0];
        assert!((cosine(a.view(), a.view()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = array![1.0, 0.0];
        let b = array![0.0, 1.0];
        assert!(cosine(a.view(), b.view()).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = array![1.0, 0.0];
        let b = array![-1.0, 0.0];
        assert!((cosine(a.view(), b.view()) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = array![0.0, 0.0];
        let b = array![1.0, 1.0];
        assert_eq!(cosine(a.view(), b.view()), 0.0);
    }

    #[test]
    fn test_similarity_matrix_diagonal_and_symmetry() {
        let features = array![[1.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0]];
        let sim = similarity_matrix(features.view());

        assert_eq!(sim.shape(), &[3, 3]);
        for i in 0..3 {
            assert!((sim[[i, i]] - 1.0).abs() < 1e-5);
            for j in 0..3 {
                assert!((sim[[i, j]] - sim[[j, i]]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_similarity_matrix_zero_row() {
        let features = array![[1.0, 0.0], [0.0, 0.0]];
        let sim = similarity_matrix(features.view());

        assert_eq!(sim[[0, 1]], 0.0);
        assert_eq!(sim[[1, 1]], 0.0);
    }

    #[test]
    fn test_scores_against_rows() {
        let features = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let vector = array![1.0, 0.0];
        let scores = scores_against_rows(vector.view(), features.view());

        assert!((scores[0] - 1.0).abs() < 1e-6);
        assert!(scores[1].abs() < 1e-6);
        assert!((scores[2] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }
}
