//! Top-N selection over classification scores.
//!
//! Given per-class confidence scores, picks the highest-scoring classes that
//! clear a minimum threshold. Scores may be floating-point or quantized
//! `u8`; quantized scores are dequantized before comparison.

use crate::processors::quantize::QuantParams;

/// A single (score, class id) pair produced by top-N selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredClass {
    /// Confidence score, dequantized if the source was quantized.
    pub score: f32,
    /// Index of the class in the model's output ordering.
    pub class_id: usize,
}

/// Selects the top-N classes above a score threshold.
///
/// This is a pure, total operation: any input slice produces a valid
/// (possibly empty) result.
#[derive(Debug, Clone)]
pub struct TopN {
    n: usize,
    threshold: f32,
}

impl TopN {
    /// Creates a selector returning at most `n` results with scores strictly
    /// greater than `threshold`.
    pub fn new(n: usize, threshold: f32) -> Self {
        Self { n, threshold }
    }

    /// Selects the top-N classes from floating-point scores.
    ///
    /// The result is ordered by descending score, ties broken by original
    /// index order, and contains at most `n` entries. Scores must strictly
    /// exceed the threshold to be considered; if none do (or `n` is 0) the
    /// result is empty.
    pub fn select(&self, scores: &[f32]) -> Vec<ScoredClass> {
        self.select_inner(scores.iter().copied())
    }

    /// Selects the top-N classes from quantized scores, dequantizing each
    /// score with `quant` before comparison.
    pub fn select_quantized(&self, scores: &[u8], quant: &QuantParams) -> Vec<ScoredClass> {
        self.select_inner(scores.iter().map(|&q| quant.dequantize(q)))
    }

    fn select_inner(&self, scores: impl Iterator<Item = f32>) -> Vec<ScoredClass> {
        if self.n == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<ScoredClass> = scores
            .enumerate()
            .filter(|&(_, score)| score > self.threshold)
            .map(|(class_id, score)| ScoredClass { score, class_id })
            .collect();

        // Stable sort keeps the original index order for equal scores.
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        candidates.truncate(self.n);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_orders_descending() {
        let top = TopN::new(2, 0.001);
        let result = top.select(&[0.9, 0.05, 0.8, 0.01]);
        assert_eq!(
            result,
            vec![
                ScoredClass {
                    score: 0.9,
                    class_id: 0
                },
                ScoredClass {
                    score: 0.8,
                    class_id: 2
                },
            ]
        );
    }

    #[test]
    fn test_select_fewer_than_n_above_threshold() {
        let top = TopN::new(5, 0.5);
        let result = top.select(&[0.9, 0.05, 0.8, 0.01]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].class_id, 0);
        assert_eq!(result[1].class_id, 2);
    }

    #[test]
    fn test_select_none_above_threshold() {
        let top = TopN::new(3, 0.95);
        assert!(top.select(&[0.9, 0.05, 0.8]).is_empty());
    }

    #[test]
    fn test_select_n_zero_is_empty() {
        let top = TopN::new(0, 0.0);
        assert!(top.select(&[0.9, 0.8, 0.7]).is_empty());
    }

    #[test]
    fn test_select_empty_scores() {
        let top = TopN::new(3, 0.0);
        assert!(top.select(&[]).is_empty());
    }

    #[test]
    fn test_select_threshold_is_strict() {
        let top = TopN::new(3, 0.5);
        let result = top.select(&[0.5, 0.6]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].class_id, 1);
    }

    #[test]
    fn test_select_ties_keep_index_order() {
        let top = TopN::new(4, 0.0);
        let result = top.select(&[0.5, 0.7, 0.5, 0.7]);
        let ids: Vec<usize> = result.iter().map(|r| r.class_id).collect();
        assert_eq!(ids, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_select_length_bounded_by_candidates() {
        let top = TopN::new(10, 0.1);
        let scores = [0.2, 0.05, 0.3, 0.01, 0.15];
        let result = top.select(&scores);
        let above = scores.iter().filter(|&&s| s > 0.1).count();
        assert_eq!(result.len(), above.min(10));
        for pair in result.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_select_quantized_unit_scale() {
        let top = TopN::new(2, 0.001);
        let quant = QuantParams::uint8_unit();
        // 230/255 ~ 0.902, 204/255 = 0.8
        let result = top.select_quantized(&[230, 12, 204, 3], &quant);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].class_id, 0);
        assert_eq!(result[1].class_id, 2);
        assert!((result[1].score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_select_quantized_zero_point() {
        let top = TopN::new(10, 0.0);
        // scale 0.5, zero point 10: q=10 -> 0.0, filtered by strict threshold
        let quant = QuantParams::new(0.5, 10);
        let result = top.select_quantized(&[10, 12, 11], &quant);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].class_id, 1);
        assert!((result[0].score - 1.0).abs() < 1e-6);
    }
}
