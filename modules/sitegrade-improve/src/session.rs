use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use sitegrade_common::{FinalAssessment, Issue, Verdict};

/// Why an improvement session halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Weighted score and every category cleared the configured bars.
    TargetReached,
    /// Iteration cap hit. Not an error; the best-known result is returned.
    MaxIterationsReached,
    /// The trailing window of iterations moved the score by less than
    /// epsilon combined.
    Stagnation,
    /// Open issues remain but none of them has a registered fixer that can
    /// act.
    FixerExhausted,
    /// Wall-clock budget ran out mid-session. Not an error; the last fully
    /// completed assessment is returned.
    BudgetExceeded,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetReached => write!(f, "target_reached"),
            Self::MaxIterationsReached => write!(f, "max_iterations_reached"),
            Self::Stagnation => write!(f, "stagnation"),
            Self::FixerExhausted => write!(f, "fixer_exhausted"),
            Self::BudgetExceeded => write!(f, "budget_exceeded"),
        }
    }
}

/// One assess → fix → reassess round.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IterationRecord {
    pub index: u32,
    /// The assessment in effect after this iteration (the pre-fix one if the
    /// fix was reverted).
    pub assessment: FinalAssessment,
    pub fix_applied: Option<Issue>,
    pub fixer_note: String,
    /// Weighted-score movement measured for the applied fix, including the
    /// movement that was undone by a revert.
    pub score_delta: f32,
    /// True when the fix measured as a regression and was rolled back; its
    /// kind is skipped for the remainder of the session.
    pub reverted: bool,
}

/// The append-only audit trail of one improvement run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImprovementSession {
    pub session_id: Uuid,
    pub artifact_id: Uuid,
    pub target_score: f32,
    pub min_category_score: f32,
    pub max_iterations: u32,
    pub initial_assessment: FinalAssessment,
    pub iterations: Vec<IterationRecord>,
    pub termination: TerminationReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImprovementSession {
    /// The assessment in effect when the session halted.
    pub fn final_assessment(&self) -> &FinalAssessment {
        self.iterations
            .last()
            .map(|i| &i.assessment)
            .unwrap_or(&self.initial_assessment)
    }

    pub fn final_score(&self) -> f32 {
        self.final_assessment().weighted_score
    }

    pub fn final_verdict(&self) -> Verdict {
        self.final_assessment().verdict
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            iterations: self.iterations.len() as u32,
            fixes_applied: self
                .iterations
                .iter()
                .filter(|i| i.fix_applied.is_some() && !i.reverted)
                .count() as u32,
            fixes_reverted: self.iterations.iter().filter(|i| i.reverted).count() as u32,
            score_before: self.initial_assessment.weighted_score,
            score_after: self.final_score(),
            verdict: self.final_verdict(),
            termination: self.termination,
        }
    }
}

/// Summary counters for one session, logged at completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct SessionStats {
    pub iterations: u32,
    pub fixes_applied: u32,
    pub fixes_reverted: u32,
    pub score_before: f32,
    pub score_after: f32,
    pub verdict: Verdict,
    pub termination: TerminationReason,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iterations={} fixes_applied={} fixes_reverted={} score={:.1}->{:.1} verdict={} termination={}",
            self.iterations,
            self.fixes_applied,
            self.fixes_reverted,
            self.score_before,
            self.score_after,
            self.verdict,
            self.termination,
        )
    }
}
