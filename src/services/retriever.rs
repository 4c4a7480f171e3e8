//! Brute-force similarity ranking over the stored embeddings.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::models::{Embedding, SearchResult};

/// Cosine similarity between two vectors.
///
/// Vectors of different length, or with a zero norm, score exactly 0.0 so a
/// stale or malformed vector never fails a query.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a * norm_b);
    if score.is_finite() { score } else { 0.0 }
}

/// Candidate in the top-k heap. Greater means a better match: a higher score,
/// or an equal score seen earlier in the store.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f32,
    position: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Rank `embeddings` against `query` and return the best `top_k`, best first.
///
/// Equal scores keep store order. `top_k` larger than the store returns every
/// entry; an empty store returns an empty list.
pub fn rank(query: &[f32], embeddings: &[Embedding], top_k: usize) -> Vec<SearchResult> {
    if top_k == 0 || embeddings.is_empty() {
        return Vec::new();
    }

    // Min-heap of the best `top_k` seen so far.
    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(top_k + 1);
    for (position, embedding) in embeddings.iter().enumerate() {
        heap.push(Reverse(Candidate {
            score: cosine_similarity(query, &embedding.vector),
            position,
        }));
        if heap.len() > top_k {
            heap.pop();
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(candidate)| SearchResult {
            document: embeddings[candidate.position].document.clone(),
            score: candidate.score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;

    fn embedding(name: &str, vector: Vec<f32>) -> Embedding {
        Embedding::new(Document::new(name, 0, name).unwrap(), vector)
    }

    fn paths(results: &[SearchResult]) -> Vec<&str> {
        results
            .iter()
            .map(|r| r.document.source_path.as_str())
            .collect()
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let score = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_is_normalized_by_magnitudes() {
        // Normalizing by squared norms would give 4 / 16 = 0.25 here.
        let score = cosine_similarity(&[2.0, 0.0], &[2.0, 0.0]);
        assert!((score - 1.0).abs() < 1e-6);

        let score = cosine_similarity(&[3.0, 4.0], &[4.0, 3.0]);
        assert!((score - 24.0 / 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_and_opposite() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_mismatched_length_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_score() {
        let store = vec![
            embedding("/far", vec![0.0, 1.0]),
            embedding("/near", vec![1.0, 0.1]),
            embedding("/middle", vec![1.0, 1.0]),
        ];
        let results = rank(&[1.0, 0.0], &store, 3);

        assert_eq!(paths(&results), vec!["/near", "/middle", "/far"]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_rank_magnitude_does_not_dominate() {
        // A long vector pointing the wrong way must not beat a short one
        // pointing the right way.
        let store = vec![
            embedding("/long", vec![10.0, 10.0]),
            embedding("/short", vec![0.1, 0.0]),
        ];
        let results = rank(&[1.0, 0.0], &store, 1);
        assert_eq!(paths(&results), vec!["/short"]);
    }

    #[test]
    fn test_rank_truncates_to_top_k() {
        let store: Vec<_> = (0..10)
            .map(|i| embedding(&format!("/doc{i}"), vec![1.0, i as f32]))
            .collect();
        let results = rank(&[1.0, 0.0], &store, 3);
        assert_eq!(paths(&results), vec!["/doc0", "/doc1", "/doc2"]);
    }

    #[test]
    fn test_rank_top_k_larger_than_store() {
        let store = vec![
            embedding("/a", vec![1.0, 0.0]),
            embedding("/b", vec![0.0, 1.0]),
        ];
        assert_eq!(rank(&[1.0, 0.0], &store, 50).len(), 2);
    }

    #[test]
    fn test_rank_ties_keep_store_order() {
        let store = vec![
            embedding("/first", vec![1.0, 0.0]),
            embedding("/other", vec![0.0, 1.0]),
            embedding("/second", vec![2.0, 0.0]),
            embedding("/third", vec![3.0, 0.0]),
        ];
        let results = rank(&[1.0, 0.0], &store, 2);
        assert_eq!(paths(&results), vec!["/first", "/second"]);

        let results = rank(&[1.0, 0.0], &store, 4);
        assert_eq!(paths(&results), vec!["/first", "/second", "/third", "/other"]);
    }

    #[test]
    fn test_rank_mixed_dimensions_degrade() {
        let store = vec![
            embedding("/stale", vec![1.0, 0.0, 0.0]),
            embedding("/fresh", vec![1.0, 0.0]),
        ];
        let results = rank(&[1.0, 0.0], &store, 2);
        assert_eq!(paths(&results), vec!["/fresh", "/stale"]);
        assert_eq!(results[1].score, 0.0);
    }

    #[test]
    fn test_rank_empty_inputs() {
        assert!(rank(&[1.0], &[], 5).is_empty());
        assert!(rank(&[1.0], &[embedding("/a", vec![1.0])], 0).is_empty());
    }
}
