//! Threshold interpolation and weighted aggregation

use serde::{Deserialize, Serialize};

use crate::metrics::PerformanceMetrics;
use crate::thresholds::{MetricThresholds, ScoreThresholds, DEFAULT_THRESHOLDS};
use crate::weights::{MetricWeights, DEFAULT_WEIGHTS};

/// Rating band derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// 90 and above
    Excellent,
    /// 75 to 89
    Good,
    /// 50 to 74
    NeedsImprovement,
    /// Below 50
    Poor,
}

impl Category {
    /// Kebab-case label, as serialized.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Excellent => "excellent",
            Category::Good => "good",
            Category::NeedsImprovement => "needs-improvement",
            Category::Poor => "poor",
        }
    }

    /// Label with its first letter capitalized.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Excellent => "Excellent",
            Category::Good => "Good",
            Category::NeedsImprovement => "Needs-improvement",
            Category::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-metric sub-scores, each 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub ttff: u32,
    pub tti: u32,
    pub fid: u32,
}

/// Score derived from a [`PerformanceMetrics`] record.
///
/// Always regenerated from the metrics, never updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceScore {
    /// Weighted overall score; 0..=100 when the weights sum to 1
    pub overall: u32,
    /// Sub-scores per metric
    pub breakdown: ScoreBreakdown,
    /// Band of `overall`
    pub category: Category,
}

impl std::fmt::Display for PerformanceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) - TTFF: {}, TTI: {}, FID: {}",
            self.overall,
            self.category.display_name(),
            self.breakdown.ttff,
            self.breakdown.tti,
            self.breakdown.fid
        )
    }
}

/// Round half up, matching the reference scoring tables.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Score a single metric value against its thresholds.
///
/// Returns 100 at or below `good`, 0 at or above `poor`, and a linear
/// interpolation in between. A pair with `good == poor` acts as a step at
/// that value. NaN scores 0.
pub fn score_metric(value: f64, thresholds: &MetricThresholds) -> u32 {
    if value <= thresholds.good {
        return 100;
    }
    if value >= thresholds.poor {
        return 0;
    }

    let span = thresholds.span();
    if span <= 0.0 {
        // Unreachable for ordered pairs, but keeps the division guarded.
        return 0;
    }

    let fraction = (value - thresholds.good) / span;
    round_half_up(100.0 - fraction * 100.0).clamp(0.0, 100.0) as u32
}

/// Map an overall score to its category. Lower bounds are inclusive.
pub fn categorize(score: u32) -> Category {
    if score >= 90 {
        Category::Excellent
    } else if score >= 75 {
        Category::Good
    } else if score >= 50 {
        Category::NeedsImprovement
    } else {
        Category::Poor
    }
}

/// Score metrics with the default thresholds and weights.
pub fn score_performance(metrics: &PerformanceMetrics) -> PerformanceScore {
    score_performance_with(metrics, &DEFAULT_THRESHOLDS, &DEFAULT_WEIGHTS)
}

/// Score metrics with custom thresholds and weights.
///
/// Missing TTI is scored as TTFF and missing FID as 0. Weights are applied
/// as given; see [`MetricWeights`].
pub fn score_performance_with(
    metrics: &PerformanceMetrics,
    thresholds: &ScoreThresholds,
    weights: &MetricWeights,
) -> PerformanceScore {
    let breakdown = ScoreBreakdown {
        ttff: score_metric(metrics.time_to_first_frame_ms, &thresholds.ttff),
        tti: score_metric(metrics.tti_or_ttff_ms(), &thresholds.tti),
        fid: score_metric(metrics.fid_ms(), &thresholds.fid),
    };

    let weighted = breakdown.ttff as f64 * weights.ttff
        + breakdown.tti as f64 * weights.tti
        + breakdown.fid as f64 * weights.fid;
    // Negative or NaN totals saturate to 0 in the cast.
    let overall = round_half_up(weighted) as u32;

    PerformanceScore {
        overall,
        breakdown,
        category: categorize(overall),
    }
}

/// One-line summary, e.g. `"92 (Excellent) - TTFF: 100, TTI: 90, FID: 85"`.
pub fn format_score(score: &PerformanceScore) -> String {
    score.to_string()
}

/// Hex color code for a category.
pub fn color_for_category(category: Category) -> &'static str {
    match category {
        Category::Excellent => "#22C55E",
        Category::Good => "#84CC16",
        Category::NeedsImprovement => "#F59E0B",
        Category::Poor => "#EF4444",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{FirstInputMetrics, InputKind};
    use proptest::prelude::*;

    fn metrics(ttff: f64, tti: Option<f64>, fid: Option<f64>) -> PerformanceMetrics {
        let mut m = PerformanceMetrics::new(0.0, ttff);
        if let Some(tti) = tti {
            m = m.with_interactive_at(tti);
        }
        if let Some(fid) = fid {
            m = m.with_first_input(FirstInputMetrics::new(InputKind::Touch, 1000.0, 1000.0 + fid));
        }
        m
    }

    #[test]
    fn test_score_metric_bounds() {
        let t = MetricThresholds::new(300.0, 800.0);
        assert_eq!(score_metric(0.0, &t), 100);
        assert_eq!(score_metric(300.0, &t), 100);
        assert_eq!(score_metric(800.0, &t), 0);
        assert_eq!(score_metric(5000.0, &t), 0);
    }

    #[test]
    fn test_score_metric_interpolation() {
        let t = MetricThresholds::new(300.0, 800.0);
        assert_eq!(score_metric(550.0, &t), 50);
        assert_eq!(score_metric(400.0, &t), 80);
        assert_eq!(score_metric(700.0, &t), 20);

        let fid = MetricThresholds::new(50.0, 150.0);
        assert_eq!(score_metric(100.0, &fid), 50);
        assert_eq!(score_metric(65.0, &fid), 85);
    }

    #[test]
    fn test_score_metric_rounds_half_up() {
        // 100 - 12.5 = 87.5
        let t = MetricThresholds::new(0.0, 8.0);
        assert_eq!(score_metric(1.0, &t), 88);
    }

    #[test]
    fn test_score_metric_equal_bounds_is_step() {
        let t = MetricThresholds::new(100.0, 100.0);
        assert_eq!(score_metric(99.0, &t), 100);
        assert_eq!(score_metric(100.0, &t), 100);
        assert_eq!(score_metric(100.5, &t), 0);
    }

    #[test]
    fn test_score_metric_inverted_bounds() {
        let t = MetricThresholds::new(500.0, 200.0);
        assert_eq!(score_metric(300.0, &t), 100);
        assert_eq!(score_metric(600.0, &t), 0);
    }

    #[test]
    fn test_score_metric_negative_and_nan() {
        let t = DEFAULT_THRESHOLDS.ttff;
        assert_eq!(score_metric(-50.0, &t), 100);
        assert_eq!(score_metric(f64::NAN, &t), 0);
    }

    #[test]
    fn test_categorize_boundaries() {
        assert_eq!(categorize(100), Category::Excellent);
        assert_eq!(categorize(90), Category::Excellent);
        assert_eq!(categorize(89), Category::Good);
        assert_eq!(categorize(75), Category::Good);
        assert_eq!(categorize(74), Category::NeedsImprovement);
        assert_eq!(categorize(50), Category::NeedsImprovement);
        assert_eq!(categorize(49), Category::Poor);
        assert_eq!(categorize(0), Category::Poor);
    }

    #[test]
    fn test_missing_tti_uses_ttff() {
        let score = score_performance(&metrics(200.0, None, None));
        assert_eq!(score.breakdown.tti, score_metric(200.0, &DEFAULT_THRESHOLDS.tti));
        assert_eq!(score.breakdown.tti, 100);

        // A slow first frame also drags TTI down when TTI was never marked.
        let score = score_performance(&metrics(1000.0, None, None));
        assert_eq!(score.breakdown.tti, 50);
    }

    #[test]
    fn test_missing_fid_scores_100() {
        let score = score_performance(&metrics(2000.0, Some(5000.0), None));
        assert_eq!(score.breakdown.fid, 100);
    }

    #[test]
    fn test_all_good() {
        let score = score_performance(&metrics(100.0, Some(200.0), Some(10.0)));
        assert_eq!(score.breakdown, ScoreBreakdown { ttff: 100, tti: 100, fid: 100 });
        assert_eq!(score.overall, 100);
        assert_eq!(score.category, Category::Excellent);
    }

    #[test]
    fn test_all_poor() {
        let score = score_performance(&metrics(1000.0, Some(2000.0), Some(200.0)));
        assert_eq!(score.breakdown, ScoreBreakdown { ttff: 0, tti: 0, fid: 0 });
        assert_eq!(score.overall, 0);
        assert_eq!(score.category, Category::Poor);
    }

    #[test]
    fn test_weighted_overall() {
        // ttff 100, tti 50, fid 0 -> 25 + 22.5 + 0 = 47.5 -> 48
        let score = score_performance(&metrics(100.0, Some(1000.0), Some(150.0)));
        assert_eq!(score.breakdown, ScoreBreakdown { ttff: 100, tti: 50, fid: 0 });
        assert_eq!(score.overall, 48);
        assert_eq!(score.category, Category::Poor);
    }

    #[test]
    fn test_custom_weights_are_not_normalized() {
        let weights = MetricWeights::new(1.0, 1.0, 1.0);
        let score = score_performance_with(&metrics(100.0, None, None), &DEFAULT_THRESHOLDS, &weights);
        assert_eq!(score.overall, 300);
        assert_eq!(score.category, Category::Excellent);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = ScoreThresholds::strict();
        let score = score_performance_with(&metrics(350.0, Some(350.0), None), &thresholds, &DEFAULT_WEIGHTS);
        assert_eq!(score.breakdown.ttff, 50);
        assert!(score.breakdown.tti < 100);
    }

    #[test]
    fn test_format_score() {
        let score = PerformanceScore {
            overall: 92,
            breakdown: ScoreBreakdown { ttff: 100, tti: 90, fid: 85 },
            category: Category::Excellent,
        };
        assert_eq!(format_score(&score), "92 (Excellent) - TTFF: 100, TTI: 90, FID: 85");

        let score = PerformanceScore {
            overall: 60,
            breakdown: ScoreBreakdown { ttff: 60, tti: 60, fid: 60 },
            category: Category::NeedsImprovement,
        };
        assert_eq!(format_score(&score), "60 (Needs-improvement) - TTFF: 60, TTI: 60, FID: 60");
    }

    #[test]
    fn test_color_for_category() {
        let colors: Vec<_> = [
            Category::Excellent,
            Category::Good,
            Category::NeedsImprovement,
            Category::Poor,
        ]
        .into_iter()
        .map(color_for_category)
        .collect();

        for color in &colors {
            assert!(color.starts_with('#') && color.len() == 7);
        }
        let mut unique = colors.clone();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&Category::NeedsImprovement).unwrap();
        assert_eq!(json, "\"needs-improvement\"");
        assert_eq!(Category::NeedsImprovement.to_string(), "needs-improvement");
    }

    proptest! {
        #[test]
        fn prop_at_or_below_good_is_100(good in 0.0f64..10_000.0, gap in 1.0f64..10_000.0, below in 0.0f64..10_000.0) {
            let t = MetricThresholds::new(good, good + gap);
            prop_assert_eq!(score_metric(good - below, &t), 100);
        }

        #[test]
        fn prop_at_or_above_poor_is_0(good in 0.0f64..10_000.0, gap in 1.0f64..10_000.0, above in 0.0f64..10_000.0) {
            let t = MetricThresholds::new(good, good + gap);
            prop_assert_eq!(score_metric(good + gap + above, &t), 0);
        }

        #[test]
        fn prop_monotonic_non_increasing(good in 0.0f64..1_000.0, gap in 1.0f64..1_000.0, a in 0.0f64..1.0, b in 0.0f64..1.0) {
            let t = MetricThresholds::new(good, good + gap);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(score_metric(good + lo * gap, &t) >= score_metric(good + hi * gap, &t));
        }

        #[test]
        fn prop_midpoint_is_about_50(good in 0.0f64..1_000.0, gap in 1.0f64..1_000.0) {
            let t = MetricThresholds::new(good, good + gap);
            let score = score_metric(good + 0.5 * gap, &t);
            prop_assert!((49..=51).contains(&score));
        }

        #[test]
        fn prop_overall_within_bounds(ttff in 0.0f64..3_000.0, tti in 0.0f64..3_000.0, fid in 0.0f64..500.0) {
            let score = score_performance(&metrics(ttff, Some(tti), Some(fid)));
            prop_assert!(score.overall <= 100);
            prop_assert_eq!(score.category, categorize(score.overall));
        }
    }
}
