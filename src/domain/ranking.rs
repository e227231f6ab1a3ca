// ============================================================
// Layer 3 — Ranking Metrics
// ============================================================
// Retrieval-style metrics over per-example candidate rankings.
//
// The evaluator ranks every example's candidate comments by model
// loss (lowest loss first). Each candidate carries a human
// relevance category in 1..=5 where 1 marks the ground truth.
// The hit rank is the 1-based position at which the ground-truth
// candidate appears in the model's ranking; the corpus metrics
// are plain aggregates of hit ranks.
//
// Reference: Rust Book §13 (Iterators)

use std::collections::BTreeMap;

/// 1-based position of the first ranked candidate whose relevance
/// category is 1. `None` means the candidate set had no ground
/// truth, which is a data error the caller must surface.
pub fn calc_hit_rank(ranking: &[String], relevance: &BTreeMap<String, u8>) -> Option<usize> {
    ranking
        .iter()
        .position(|comment| relevance.get(comment) == Some(&1))
        .map(|i| i + 1)
}

/// Percentage of examples whose hit rank is within `k`.
pub fn recall_at(hit_ranks: &[usize], k: usize) -> f64 {
    if hit_ranks.is_empty() {
        return 0.0;
    }
    let hits = hit_ranks.iter().filter(|&&r| r <= k).count();
    hits as f64 * 100.0 / hit_ranks.len() as f64
}

/// Arithmetic mean of the hit ranks.
pub fn mean_rank(hit_ranks: &[usize]) -> f64 {
    if hit_ranks.is_empty() {
        return 0.0;
    }
    hit_ranks.iter().sum::<usize>() as f64 / hit_ranks.len() as f64
}

/// Arithmetic mean of the reciprocal hit ranks.
pub fn mean_reciprocal_rank(hit_ranks: &[usize]) -> f64 {
    if hit_ranks.is_empty() {
        return 0.0;
    }
    let sum: f64 = hit_ranks.iter().map(|&r| 1.0 / r as f64).sum();
    sum / hit_ranks.len() as f64
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn relevance(pairs: &[(&str, u8)]) -> BTreeMap<String, u8> {
        pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect()
    }

    fn ranking(comments: &[&str]) -> Vec<String> {
        comments.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn hit_rank_is_one_based() {
        let rel = relevance(&[("a", 3), ("b", 1), ("c", 5)]);
        assert_eq!(calc_hit_rank(&ranking(&["a", "b", "c"]), &rel), Some(2));
        assert_eq!(calc_hit_rank(&ranking(&["b", "a", "c"]), &rel), Some(1));
    }

    #[test]
    fn hit_rank_missing_ground_truth() {
        let rel = relevance(&[("a", 2), ("b", 4)]);
        assert_eq!(calc_hit_rank(&ranking(&["a", "b"]), &rel), None);
    }

    #[test]
    fn recall_thresholds() {
        // Every example has hit rank exactly 3
        let ranks = vec![3, 3, 3, 3];
        assert_eq!(recall_at(&ranks, 5), 100.0);
        assert_eq!(recall_at(&ranks, 2), 0.0);
        assert_eq!(recall_at(&ranks, 3), 100.0);
    }

    #[test]
    fn recall_partial() {
        let ranks = vec![1, 4, 2, 10];
        assert_eq!(recall_at(&ranks, 2), 50.0);
    }

    #[test]
    fn mean_rank_is_arithmetic_mean() {
        assert_eq!(mean_rank(&[1, 2, 4]), 7.0 / 3.0);
    }

    #[test]
    fn mrr_matches_hand_computation() {
        let mrr = mean_reciprocal_rank(&[1, 2, 4]);
        let expected = (1.0 + 0.5 + 0.25) / 3.0;
        assert!((mrr - expected).abs() < 1e-12);
        assert!((mrr - 0.5833).abs() < 1e-4);
    }

    #[test]
    fn empty_corpus_yields_zeroes() {
        assert_eq!(recall_at(&[], 5), 0.0);
        assert_eq!(mean_rank(&[]), 0.0);
        assert_eq!(mean_reciprocal_rank(&[]), 0.0);
    }
}
