// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector math for embedding comparison.

/// Cosine similarity between two vectors.
///
/// Returns 0.0 if the lengths differ or either vector has zero norm;
/// otherwise a value in [-1.0, 1.0]. Accumulates in f64.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    (dot / denom).clamp(-1.0, 1.0)
}
