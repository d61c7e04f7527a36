//! The improvement control loop: assess → prioritize → apply one fix →
//! reassess → decide.
//!
//! Exactly one fix is applied per iteration so every score delta is
//! attributable to one change. The artifact is cloned before each fix
//! (copy-on-write versioning), which makes the regression guard a cheap
//! rollback instead of an inverse operation.

use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sitegrade_assess::AssessmentEngine;
use sitegrade_common::{
    Category, FinalAssessment, Issue, IssueKind, SessionConfig, SiteGradeError, WebsiteArtifact,
};

use crate::fixers::{FixOutcome, FixerRegistry};
use crate::session::{ImprovementSession, IterationRecord, TerminationReason};

pub struct ImprovementEngine {
    assessor: AssessmentEngine,
    fixers: FixerRegistry,
}

impl ImprovementEngine {
    pub fn new(assessor: AssessmentEngine, fixers: FixerRegistry) -> Self {
        Self { assessor, fixers }
    }

    /// Assess without improving — the standalone entry point.
    pub async fn assess(
        &self,
        artifact: &WebsiteArtifact,
    ) -> Result<FinalAssessment, SiteGradeError> {
        self.assessor.assess(artifact).await
    }

    /// Run a full improvement session. The artifact is mutated in place;
    /// the returned session is the append-only iteration log.
    ///
    /// Always halts: the iteration cap bounds the loop no matter what the
    /// fixers or evaluators do, and every other exit is an earlier break.
    pub async fn improve(
        &self,
        artifact: &mut WebsiteArtifact,
        config: &SessionConfig,
    ) -> Result<ImprovementSession, SiteGradeError> {
        config.validate()?;

        let session_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();

        let initial = self.assessor.assess(artifact).await?;
        info!(
            session_id = %session_id,
            score = format!("{:.1}", initial.weighted_score).as_str(),
            open_issues = initial.issues.len(),
            "Improvement session starting"
        );

        let mut current = initial.clone();
        let mut iterations: Vec<IterationRecord> = Vec::new();
        // Kinds whose fix measured as a regression; never retried this session.
        let mut skip_kinds: HashSet<IssueKind> = HashSet::new();

        let termination = loop {
            if target_met(&current, config) {
                break TerminationReason::TargetReached;
            }
            if iterations.len() as u32 >= config.max_iterations {
                break TerminationReason::MaxIterationsReached;
            }
            if stagnated(&iterations, config) {
                break TerminationReason::Stagnation;
            }
            if let Some(budget) = config.wall_clock_budget {
                if clock.elapsed() >= budget {
                    break TerminationReason::BudgetExceeded;
                }
            }

            // Walk the queue top-down until one fixer actually applies.
            // Unfixable kinds and declined fixes fall through to the next
            // issue; an empty or fully-declined queue ends the session.
            let before_fix = artifact.clone();
            let Some((issue, outcome)) = self.apply_first_fixable(artifact, &current, &skip_kinds)
            else {
                break TerminationReason::FixerExhausted;
            };
            artifact.revision += 1;

            let reassessment = self.assessor.assess(artifact).await?;
            let delta = reassessment.weighted_score - current.weighted_score;
            let index = iterations.len() as u32 + 1;

            if delta < -config.noise_tolerance {
                warn!(
                    iteration = index,
                    kind = %issue.kind,
                    delta = format!("{delta:.2}").as_str(),
                    "Fix measured as a regression, reverting"
                );
                *artifact = before_fix;
                skip_kinds.insert(issue.kind);
                iterations.push(IterationRecord {
                    index,
                    assessment: current.clone(),
                    fix_applied: Some(issue),
                    fixer_note: outcome.note,
                    score_delta: delta,
                    reverted: true,
                });
            } else {
                info!(
                    iteration = index,
                    kind = %issue.kind,
                    score = format!("{:.1}", reassessment.weighted_score).as_str(),
                    delta = format!("{delta:+.2}").as_str(),
                    "Fix applied"
                );
                iterations.push(IterationRecord {
                    index,
                    assessment: reassessment.clone(),
                    fix_applied: Some(issue),
                    fixer_note: outcome.note,
                    score_delta: delta,
                    reverted: false,
                });
                current = reassessment;
            }
        };

        let session = ImprovementSession {
            session_id,
            artifact_id: artifact.id,
            target_score: config.target_score,
            min_category_score: config.min_category_score,
            max_iterations: config.max_iterations,
            initial_assessment: initial,
            iterations,
            termination,
            started_at,
            finished_at: Utc::now(),
        };
        info!(session_id = %session_id, "Improvement session complete. {}", session.stats());
        Ok(session)
    }

    /// Try issues in priority order; return the first fix that applied.
    fn apply_first_fixable(
        &self,
        artifact: &mut WebsiteArtifact,
        assessment: &FinalAssessment,
        skip_kinds: &HashSet<IssueKind>,
    ) -> Option<(Issue, FixOutcome)> {
        for issue in &assessment.issues {
            if skip_kinds.contains(&issue.kind) {
                debug!(kind = %issue.kind, "Kind regressed earlier this session, skipping");
                continue;
            }
            let Some(fixer) = self.fixers.get(issue.kind) else {
                debug!(kind = %issue.kind, "No registered fixer");
                continue;
            };
            let outcome = fixer.apply(artifact, issue);
            if outcome.applied {
                return Some((issue.clone(), outcome));
            }
            debug!(kind = %issue.kind, note = outcome.note.as_str(), "Fixer declined, trying next issue");
        }
        None
    }
}

fn target_met(assessment: &FinalAssessment, config: &SessionConfig) -> bool {
    assessment.weighted_score >= config.target_score
        && Category::ALL.iter().all(|category| {
            assessment
                .category_scores
                .get(category)
                .is_some_and(|score| *score >= config.min_category_score)
        })
}

/// True when the trailing window's net score movement (reverted iterations
/// count as zero) stayed under epsilon.
fn stagnated(iterations: &[IterationRecord], config: &SessionConfig) -> bool {
    let window = config.stagnation_window as usize;
    if iterations.len() < window {
        return false;
    }
    let net: f32 = iterations[iterations.len() - window..]
        .iter()
        .map(|i| if i.reverted { 0.0 } else { i.score_delta })
        .sum();
    net.abs() < config.stagnation_epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegrade_common::{AgreementLevel, PerceptionScore, Verdict};
    use std::collections::BTreeMap;

    fn assessment_with(scores: &[(Category, f32)], weighted: f32) -> FinalAssessment {
        FinalAssessment {
            weighted_score: weighted,
            category_scores: scores.iter().copied().collect(),
            perception: PerceptionScore {
                first_impression: 0.0,
                emotional_resonance: 0.0,
                cohesion: 0.0,
                identity_recognition: 0.0,
            },
            agreement: AgreementLevel::Low,
            verdict: Verdict::Good,
            issues: vec![],
            outliers: vec![],
            evaluator_failures: vec![],
        }
    }

    fn full_scores(score: f32) -> Vec<(Category, f32)> {
        Category::ALL.iter().map(|c| (*c, score)).collect()
    }

    #[test]
    fn target_needs_both_weighted_score_and_category_floors() {
        let config = SessionConfig::default();
        assert!(target_met(
            &assessment_with(&full_scores(8.0), 80.0),
            &config
        ));
        // High average, one weak category.
        let mut scores = full_scores(9.0);
        scores[3].1 = 5.0;
        assert!(!target_met(&assessment_with(&scores, 85.0), &config));
        // Categories fine, weighted score short.
        assert!(!target_met(
            &assessment_with(&full_scores(8.0), 60.0),
            &config
        ));
    }

    #[test]
    fn missing_category_blocks_the_target() {
        let config = SessionConfig::default();
        let mut scores = full_scores(9.0);
        scores.remove(0);
        assert!(!target_met(&assessment_with(&scores, 90.0), &config));
    }

    fn record(delta: f32, reverted: bool) -> IterationRecord {
        IterationRecord {
            index: 0,
            assessment: assessment_with(&full_scores(5.0), 50.0),
            fix_applied: None,
            fixer_note: String::new(),
            score_delta: delta,
            reverted,
        }
    }

    #[test]
    fn stagnation_needs_a_full_window() {
        let config = SessionConfig::default();
        assert!(!stagnated(&[record(0.0, false), record(0.0, false)], &config));
    }

    #[test]
    fn flat_window_stagnates() {
        let config = SessionConfig::default();
        let iterations = vec![record(0.1, false), record(0.0, false), record(0.1, false)];
        assert!(stagnated(&iterations, &config));
    }

    #[test]
    fn real_movement_in_the_window_does_not_stagnate() {
        let config = SessionConfig::default();
        let iterations = vec![record(0.1, false), record(3.0, false), record(0.1, false)];
        assert!(!stagnated(&iterations, &config));
    }

    #[test]
    fn reverted_movement_counts_as_zero() {
        let config = SessionConfig::default();
        // The reverted iteration recorded a big negative delta, but the
        // artifact was rolled back, so nothing actually moved.
        let iterations = vec![record(0.1, false), record(-5.0, true), record(0.1, false)];
        assert!(stagnated(&iterations, &config));
    }
}
