//! Cosine similarity over matrix rows.
//!
//! Both recommenders reduce to the same computation: a square, symmetric
//! row × row cosine similarity matrix over their training input.

use data_processor::Matrix;
use rayon::prelude::*;

/// Cosine similarity of two equal-length vectors.
///
/// A zero vector is given norm 1, so its similarity to anything (itself
/// included) is 0; for any non-zero vector the self-similarity is 1.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (safe_norm(a) * safe_norm(b))
}

/// Row × row cosine similarity matrix.
///
/// The result is square with dimension = input row count, entries in
/// [-1, 1]. Rows are computed in parallel.
pub fn cosine_similarity_matrix(input: &Matrix) -> Matrix {
    let n = input.rows();
    let norms: Vec<f64> = (0..n).map(|i| safe_norm(input.row(i))).collect();

    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let row_i = input.row(i);
            (0..n)
                .map(|j| {
                    let dot: f64 = row_i.iter().zip(input.row(j)).map(|(a, b)| a * b).sum();
                    dot / (norms[i] * norms[j])
                })
                .collect()
        })
        .collect();

    let mut similarity = Matrix::zeros(n, n);
    for (i, row) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            similarity.set(i, j, value);
        }
    }
    similarity
}

fn safe_norm(v: &[f64]) -> f64 {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 { 1.0 } else { norm }
}
