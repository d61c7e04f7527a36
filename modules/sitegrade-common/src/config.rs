use std::collections::BTreeMap;
use std::time::Duration;

use typed_builder::TypedBuilder;

use crate::error::SiteGradeError;
use crate::issue::Category;

/// Everything the assessment side needs to know about scoring and
/// aggregation. The blend ratio and the agreement variance thresholds are
/// tuned constants without a documented derivation upstream, so they live
/// here as configuration rather than hard-coded truths.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    /// Per-category weights for the weighted score. Must sum to 1 across
    /// the six categories. `None` means equal weighting.
    pub domain_weights: Option<BTreeMap<Category, f32>>,
    /// Share of the final weighted score taken from the perception total.
    /// Category scores dominate; perception is a modifier.
    pub perception_blend: f32,
    /// Mean inter-evaluator variance below this is High agreement.
    pub agreement_variance_high: f32,
    /// Below this (and above the High bound) is Medium agreement.
    pub agreement_variance_medium: f32,
    /// Standard deviations from the consensus score before an evaluator is
    /// flagged as an outlier.
    pub outlier_stddev: f32,
    /// Jaro-Winkler similarity above which two same-category issue
    /// descriptions are considered the same defect.
    pub dedup_similarity: f64,
    /// Per-category minimum score for the Excellent tier.
    pub category_minimums: BTreeMap<Category, f32>,
    /// Hard ceiling on any single evaluator task.
    pub evaluator_timeout: Duration,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            domain_weights: None,
            perception_blend: 0.25,
            agreement_variance_high: 0.5,
            agreement_variance_medium: 2.0,
            outlier_stddev: 2.0,
            dedup_similarity: 0.90,
            category_minimums: Category::ALL.iter().map(|c| (*c, 7.0)).collect(),
            evaluator_timeout: Duration::from_secs(10),
        }
    }
}

impl AssessmentConfig {
    /// Reject bad configuration before any evaluator runs. This is the only
    /// hard failure the engine surfaces to callers.
    pub fn validate(&self) -> Result<(), SiteGradeError> {
        if let Some(weights) = &self.domain_weights {
            for category in Category::ALL {
                if !weights.contains_key(&category) {
                    return Err(SiteGradeError::Config(format!(
                        "domain_weights missing category '{category}'"
                    )));
                }
            }
            let sum: f32 = weights.values().sum();
            if (sum - 1.0).abs() > 0.001 {
                return Err(SiteGradeError::Config(format!(
                    "domain_weights must sum to 1.0, got {sum:.3}"
                )));
            }
            if weights.values().any(|w| *w < 0.0) {
                return Err(SiteGradeError::Config(
                    "domain_weights must be non-negative".to_string(),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.perception_blend) {
            return Err(SiteGradeError::Config(format!(
                "perception_blend must be in 0..=1, got {}",
                self.perception_blend
            )));
        }
        if self.agreement_variance_high >= self.agreement_variance_medium {
            return Err(SiteGradeError::Config(
                "agreement_variance_high must be below agreement_variance_medium".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.dedup_similarity) {
            return Err(SiteGradeError::Config(format!(
                "dedup_similarity must be in 0..=1, got {}",
                self.dedup_similarity
            )));
        }
        Ok(())
    }

    /// Effective weight for a category: supplied domain weight or 1/6.
    pub fn weight(&self, category: Category) -> f32 {
        match &self.domain_weights {
            Some(w) => w.get(&category).copied().unwrap_or(0.0),
            None => 1.0 / Category::ALL.len() as f32,
        }
    }

    /// Per-category minimum for the Excellent gate (default 7.0).
    pub fn category_minimum(&self, category: Category) -> f32 {
        self.category_minimums.get(&category).copied().unwrap_or(7.0)
    }
}

/// Configuration for one improvement session.
#[derive(Debug, Clone, TypedBuilder)]
pub struct SessionConfig {
    /// Weighted score at which the session halts with `TargetReached`.
    #[builder(default = 75.0)]
    pub target_score: f32,
    /// Every consensus category must also clear this bar for `TargetReached`.
    #[builder(default = 7.0)]
    pub min_category_score: f32,
    #[builder(default = 10)]
    pub max_iterations: u32,
    /// Number of trailing iterations inspected for stagnation.
    #[builder(default = 3)]
    pub stagnation_window: u32,
    /// Combined |score delta| across the stagnation window below which the
    /// session halts with `Stagnation`.
    #[builder(default = 0.5)]
    pub stagnation_epsilon: f32,
    /// A fix measuring worse than this is treated as a regression and
    /// reverted.
    #[builder(default = 0.75)]
    pub noise_tolerance: f32,
    /// Overall wall-clock budget. `None` means unbounded.
    #[builder(default)]
    pub wall_clock_budget: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), SiteGradeError> {
        if !(0.0..=100.0).contains(&self.target_score) {
            return Err(SiteGradeError::Config(format!(
                "target_score must be in 0..=100, got {}",
                self.target_score
            )));
        }
        if !(0.0..=10.0).contains(&self.min_category_score) {
            return Err(SiteGradeError::Config(format!(
                "min_category_score must be in 0..=10, got {}",
                self.min_category_score
            )));
        }
        if self.max_iterations == 0 {
            return Err(SiteGradeError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.stagnation_window == 0 {
            return Err(SiteGradeError::Config(
                "stagnation_window must be at least 1".to_string(),
            ));
        }
        if self.noise_tolerance < 0.0 {
            return Err(SiteGradeError::Config(
                "noise_tolerance must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
