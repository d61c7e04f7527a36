use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::issue::{Category, EvaluatorId, Issue};

// --- Rubric evaluation ---

/// Output of one rubric evaluator for one artifact snapshot.
///
/// `scores` maps each covered category to 0..10; a category absent from the
/// map is an abstention, not a zero. `confidence` weights this evaluator's
/// contribution to consensus; 0.0 means the evaluator failed and abstains
/// from every category.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RubricEvaluation {
    pub evaluator: EvaluatorId,
    pub scores: BTreeMap<Category, f32>,
    pub issues: Vec<Issue>,
    pub confidence: f32,
}

impl RubricEvaluation {
    /// The failure form: an evaluator that could not render or score the
    /// snapshot abstains everywhere rather than guessing.
    pub fn abstained(evaluator: EvaluatorId) -> Self {
        Self {
            evaluator,
            scores: BTreeMap::new(),
            issues: Vec::new(),
            confidence: 0.0,
        }
    }

    pub fn is_abstained(&self) -> bool {
        self.confidence <= f32::EPSILON
    }
}

// --- Agreement ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for AgreementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// An evaluator whose score for a category sits far from the consensus.
/// Informational only: flagged scores still count toward the combined mean
/// so humans can audit disagreement instead of having it silently discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OutlierFlag {
    pub evaluator: EvaluatorId,
    pub category: Category,
    pub score: f32,
    pub consensus: f32,
}

/// Reconciled cross-rubric scores. Derived, recomputed every iteration,
/// never persisted across sessions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConsensusResult {
    /// Confidence-weighted mean per category. A category every evaluator
    /// abstained from is absent here and fails any per-category verdict gate.
    pub category_scores: BTreeMap<Category, f32>,
    pub agreement: AgreementLevel,
    pub outliers: Vec<OutlierFlag>,
}

// --- Perception ---

/// Holistic, rubric-independent impression score. Four sub-dimensions, each
/// 0..25, summing to a 0..100 total. Never feeds consensus; only the final
/// verdict blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerceptionScore {
    pub first_impression: f32,
    pub emotional_resonance: f32,
    pub cohesion: f32,
    pub identity_recognition: f32,
}

impl PerceptionScore {
    pub fn total(&self) -> f32 {
        self.first_impression + self.emotional_resonance + self.cohesion + self.identity_recognition
    }
}

// --- Verdict ---

/// Discrete quality tier. Ordered ascending so `Ord` ranks WorldClass
/// highest; the tier thresholds are strictly nested.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Poor,
    Good,
    Excellent,
    WorldClass,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poor => write!(f, "poor"),
            Self::Good => write!(f, "good"),
            Self::Excellent => write!(f, "excellent"),
            Self::WorldClass => write!(f, "world_class"),
        }
    }
}

// --- Final assessment ---

/// One complete assessment of one artifact snapshot. The sequence of these
/// across an improvement session is the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FinalAssessment {
    /// Blended 0..100 score: consensus category block plus perception
    /// modifier.
    pub weighted_score: f32,
    pub category_scores: BTreeMap<Category, f32>,
    pub perception: PerceptionScore,
    pub agreement: AgreementLevel,
    pub verdict: Verdict,
    /// Deduplicated, priority-ordered issues still open at this snapshot.
    pub issues: Vec<Issue>,
    pub outliers: Vec<OutlierFlag>,
    /// Evaluators that failed or timed out and abstained. Recorded, never
    /// hidden.
    pub evaluator_failures: Vec<EvaluatorId>,
}

impl FinalAssessment {
    /// Lowest consensus category score, if any category was scored.
    pub fn weakest_category(&self) -> Option<(Category, f32)> {
        self.category_scores
            .iter()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(c, s)| (*c, *s))
    }
}
