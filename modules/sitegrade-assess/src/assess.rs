//! The assessment engine: renders one frozen snapshot, fans the five rubric
//! evaluators and the perception scorer out concurrently, then reconciles
//! everything into a `FinalAssessment`.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use sitegrade_common::{
    ArtifactSnapshot, AssessmentConfig, FinalAssessment, PerceptionScore, Renderer,
    RubricEvaluation, SiteGradeError, WebsiteArtifact,
};

use crate::consensus;
use crate::evaluators::{default_evaluators, RubricEvaluator};
use crate::perception;
use crate::prioritize;
use crate::verdict;

pub struct AssessmentEngine {
    renderer: Arc<dyn Renderer>,
    evaluators: Vec<Arc<dyn RubricEvaluator>>,
    config: AssessmentConfig,
}

impl AssessmentEngine {
    /// Build an engine with the production evaluator set. Rejects invalid
    /// configuration up front — the only hard failure in the subsystem.
    pub fn new(
        renderer: Arc<dyn Renderer>,
        config: AssessmentConfig,
    ) -> Result<Self, SiteGradeError> {
        config.validate()?;
        Ok(Self {
            renderer,
            evaluators: default_evaluators(),
            config,
        })
    }

    /// Replace the evaluator set (used by tests and custom deployments).
    pub fn with_evaluators(mut self, evaluators: Vec<Arc<dyn RubricEvaluator>>) -> Self {
        self.evaluators = evaluators;
        self
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Assess one artifact: render a frozen snapshot, run all scorers
    /// concurrently, combine, classify, and order the issue queue.
    ///
    /// An evaluator that times out, panics, or cannot parse the snapshot
    /// abstains (recorded in `evaluator_failures`); it never sinks the
    /// whole assessment.
    pub async fn assess(
        &self,
        artifact: &WebsiteArtifact,
    ) -> Result<FinalAssessment, SiteGradeError> {
        let snapshot = Arc::new(self.renderer.render(artifact)?);

        // All six scorers are read-only over the frozen snapshot and run at
        // the same time; the engine waits for every one of them (or its
        // abstention) before combining.
        let (evaluations, perception) = tokio::join!(
            self.run_evaluators(&snapshot),
            self.run_perception(&snapshot)
        );

        let evaluator_failures: Vec<_> = evaluations
            .iter()
            .filter(|e| e.is_abstained())
            .map(|e| e.evaluator)
            .collect();

        let consensus = consensus::combine(&evaluations, &self.config);
        let (weighted_score, verdict) = verdict::classify(&consensus, &perception, &self.config);

        let all_issues: Vec<_> = evaluations
            .into_iter()
            .flat_map(|e| e.issues)
            .collect();
        let deduped = prioritize::dedupe(all_issues, &self.config);
        let issues = prioritize::prioritize(deduped, &consensus.category_scores, &self.config);

        info!(
            artifact_id = %snapshot.artifact_id,
            revision = snapshot.revision,
            score = format!("{weighted_score:.1}").as_str(),
            verdict = %verdict,
            agreement = %consensus.agreement,
            open_issues = issues.len(),
            failed_evaluators = evaluator_failures.len(),
            "Assessment complete"
        );

        Ok(FinalAssessment {
            weighted_score,
            category_scores: consensus.category_scores,
            perception,
            agreement: consensus.agreement,
            verdict,
            issues,
            outliers: consensus.outliers,
            evaluator_failures,
        })
    }

    /// Spawn every evaluator on its own blocking task with a hard timeout.
    /// Timeouts and panics degrade to abstentions — identical to an
    /// evaluator reporting `confidence = 0`.
    async fn run_evaluators(&self, snapshot: &Arc<ArtifactSnapshot>) -> Vec<RubricEvaluation> {
        let timeout = self.config.evaluator_timeout;
        let tasks = self.evaluators.iter().map(|evaluator| {
            let evaluator = Arc::clone(evaluator);
            let snapshot = Arc::clone(snapshot);
            let id = evaluator.id();
            async move {
                let handle =
                    tokio::task::spawn_blocking(move || evaluator.evaluate(&snapshot));
                match tokio::time::timeout(timeout, handle).await {
                    Ok(Ok(evaluation)) => evaluation,
                    Ok(Err(join_error)) => {
                        warn!(evaluator = %id, error = %join_error, "Evaluator panicked, abstaining");
                        RubricEvaluation::abstained(id)
                    }
                    Err(_) => {
                        warn!(evaluator = %id, timeout_ms = timeout.as_millis() as u64, "Evaluator timed out, abstaining");
                        RubricEvaluation::abstained(id)
                    }
                }
            }
        });
        join_all(tasks).await
    }

    /// The perception scorer runs alongside the evaluators under the same
    /// timeout rules; on failure it degrades to an all-zero perception
    /// rather than sinking the assessment.
    async fn run_perception(&self, snapshot: &Arc<ArtifactSnapshot>) -> PerceptionScore {
        let snapshot = Arc::clone(snapshot);
        let handle = tokio::task::spawn_blocking(move || perception::perceive(&snapshot));
        match tokio::time::timeout(self.config.evaluator_timeout, handle).await {
            Ok(Ok(score)) => score,
            Ok(Err(join_error)) => {
                warn!(error = %join_error, "Perception scorer panicked, scoring zero");
                zero_perception()
            }
            Err(_) => {
                warn!("Perception scorer timed out, scoring zero");
                zero_perception()
            }
        }
    }
}

fn zero_perception() -> PerceptionScore {
    PerceptionScore {
        first_impression: 0.0,
        emotional_resonance: 0.0,
        cohesion: 0.0,
        identity_recognition: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegrade_common::testing::{polished_site, template_fresh_site};
    use sitegrade_common::{Category, EvaluatorId, StaticRenderer, Verdict};

    fn engine() -> AssessmentEngine {
        AssessmentEngine::new(Arc::new(StaticRenderer), AssessmentConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn polished_site_clears_excellent() {
        let assessment = engine().assess(&polished_site()).await.unwrap();
        assert!(assessment.verdict >= Verdict::Excellent, "{assessment:?}");
        assert!(assessment.weighted_score >= 75.0);
        assert!(assessment.evaluator_failures.is_empty());
    }

    #[tokio::test]
    async fn template_site_stays_well_below_excellent_with_a_full_queue() {
        let assessment = engine().assess(&template_fresh_site()).await.unwrap();
        assert!(assessment.verdict <= Verdict::Good, "{assessment:?}");
        assert!(assessment.weighted_score < 65.0);
        assert!(assessment.issues.len() > 8);
    }

    #[tokio::test]
    async fn assess_is_deterministic_across_repeated_calls() {
        let engine = engine();
        let artifact = template_fresh_site();
        let a = engine.assess(&artifact).await.unwrap();
        let b = engine.assess(&artifact).await.unwrap();
        assert_eq!(a.category_scores, b.category_scores);
        assert_eq!(a.weighted_score, b.weighted_score);
        assert_eq!(a.verdict, b.verdict);
        assert_eq!(a.issues.len(), b.issues.len());
    }

    /// A panicking evaluator abstains; its categories fall back to whatever
    /// the surviving evaluators say, and the failure is recorded.
    #[tokio::test]
    async fn panicking_evaluator_abstains_and_is_recorded() {
        struct PanickingEvaluator;
        impl RubricEvaluator for PanickingEvaluator {
            fn id(&self) -> EvaluatorId {
                EvaluatorId::Visual
            }
            fn covers(&self) -> &'static [Category] {
                &[Category::Visual]
            }
            fn evaluate(&self, _snapshot: &sitegrade_common::ArtifactSnapshot) -> RubricEvaluation {
                panic!("rendering backend exploded");
            }
        }

        let engine = engine().with_evaluators(vec![
            Arc::new(PanickingEvaluator),
            Arc::new(crate::evaluators::StructureEvaluator),
        ]);
        let assessment = engine.assess(&polished_site()).await.unwrap();
        assert_eq!(assessment.evaluator_failures, vec![EvaluatorId::Visual]);
        // Visual had no surviving contributor, so it is absent, and the
        // verdict gates treat that as failing.
        assert!(!assessment.category_scores.contains_key(&Category::Visual));
        assert!(assessment.verdict < Verdict::Excellent);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_anything_runs() {
        let mut config = AssessmentConfig::default();
        config.perception_blend = 1.5;
        let result = AssessmentEngine::new(Arc::new(StaticRenderer), config);
        assert!(matches!(result, Err(SiteGradeError::Config(_))));
    }
}
