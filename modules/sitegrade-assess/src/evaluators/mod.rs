//! The five specialist rubric evaluators.
//!
//! Each evaluator is a pure function of an artifact snapshot: it scores the
//! categories it covers (0..10) and explains every lost point with an
//! `Issue`. Evaluators never share state and never see the mutable artifact.

pub mod discoverability;
pub mod distinctiveness;
pub mod persuasion;
pub mod structure;
pub mod visual;

use std::collections::BTreeMap;
use std::sync::Arc;

use sitegrade_common::{
    ArtifactSnapshot, Category, EvaluatorId, Issue, IssueKind, RubricEvaluation, Severity,
};

pub use discoverability::DiscoverabilityEvaluator;
pub use distinctiveness::DistinctivenessEvaluator;
pub use persuasion::PersuasionEvaluator;
pub use structure::StructureEvaluator;
pub use visual::VisualEvaluator;

/// One specialist's scoring contract. `evaluate` must be deterministic for a
/// given snapshot; all heuristics are pure reads.
pub trait RubricEvaluator: Send + Sync {
    fn id(&self) -> EvaluatorId;

    /// Categories this evaluator scores. Everything else is an abstention.
    fn covers(&self) -> &'static [Category];

    fn evaluate(&self, snapshot: &ArtifactSnapshot) -> RubricEvaluation;
}

/// The production evaluator set.
pub fn default_evaluators() -> Vec<Arc<dyn RubricEvaluator>> {
    vec![
        Arc::new(StructureEvaluator),
        Arc::new(VisualEvaluator),
        Arc::new(PersuasionEvaluator),
        Arc::new(DiscoverabilityEvaluator),
        Arc::new(DistinctivenessEvaluator),
    ]
}

/// Running score sheet for one evaluation. Every deduction records both the
/// score loss and the issue explaining it, so a below-maximum score can
/// never ship without something for the fixer pipeline to act on.
pub(crate) struct ScoreCard {
    evaluator: EvaluatorId,
    scores: BTreeMap<Category, f32>,
    issues: Vec<Issue>,
}

impl ScoreCard {
    pub(crate) fn new(evaluator: EvaluatorId, covers: &[Category]) -> Self {
        Self {
            evaluator,
            scores: covers.iter().map(|c| (*c, 10.0)).collect(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn deduct(
        &mut self,
        category: Category,
        amount: f32,
        kind: IssueKind,
        severity: Severity,
        description: impl Into<String>,
        location_hint: Option<String>,
    ) {
        let score = self
            .scores
            .entry(category)
            .or_insert(10.0);
        *score = (*score - amount).max(0.0);
        self.issues.push(Issue::new(
            kind,
            category,
            severity,
            description,
            location_hint,
            self.evaluator,
        ));
    }

    pub(crate) fn into_evaluation(self, confidence: f32) -> RubricEvaluation {
        RubricEvaluation {
            evaluator: self.evaluator,
            scores: self.scores,
            issues: self.issues,
            confidence,
        }
    }
}
