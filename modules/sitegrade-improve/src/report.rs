//! Reporting surface: JSON dumps plus a Markdown rendering.
//!
//! Field names and enum wire values in these types are the stable contract
//! dashboards and CI gates consume.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use sitegrade_common::{Category, FinalAssessment};

use crate::session::{ImprovementSession, SessionStats};

/// Root data directory, controlled by `DATA_DIR` env var (default: `"data"`).
fn data_dir() -> PathBuf {
    PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AssessmentReport {
    pub artifact_id: Uuid,
    pub run_date: String,
    pub assessment: FinalAssessment,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SessionReport {
    pub artifact_id: Uuid,
    pub run_date: String,
    pub stats: SessionStats,
    pub session: ImprovementSession,
}

/// Save a standalone assessment as JSON. Returns the file path.
pub fn save_assessment_report(assessment: &FinalAssessment, artifact_id: Uuid) -> Result<PathBuf> {
    let date = Utc::now().format("%Y-%m-%d").to_string();
    let dir = data_dir().join("reports").join(artifact_id.to_string());
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{date}-assessment.json"));

    let report = AssessmentReport {
        artifact_id,
        run_date: date,
        assessment: assessment.clone(),
    };
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    info!(path = %path.display(), "Assessment report saved");
    Ok(path)
}

/// Save a full session log as JSON. Returns the file path.
pub fn save_session_report(session: &ImprovementSession) -> Result<PathBuf> {
    let date = Utc::now().format("%Y-%m-%d").to_string();
    let dir = data_dir()
        .join("reports")
        .join(session.artifact_id.to_string());
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{date}-{}.json", session.session_id));

    let report = SessionReport {
        artifact_id: session.artifact_id,
        run_date: date,
        stats: session.stats(),
        session: session.clone(),
    };
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    info!(path = %path.display(), "Session report saved");
    Ok(path)
}

/// Human-readable rendering of one assessment.
pub fn render_assessment_markdown(assessment: &FinalAssessment) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "## Assessment — {} ({:.1}/100)\n\n",
        assessment.verdict, assessment.weighted_score
    ));
    out.push_str(&format!("- **Agreement:** {}\n", assessment.agreement));
    out.push_str(&format!(
        "- **Perception:** {:.0}/100 (first impression {:.0}, resonance {:.0}, cohesion {:.0}, identity {:.0})\n\n",
        assessment.perception.total(),
        assessment.perception.first_impression,
        assessment.perception.emotional_resonance,
        assessment.perception.cohesion,
        assessment.perception.identity_recognition,
    ));

    out.push_str("| Category | Score |\n|----------|-------|\n");
    for category in Category::ALL {
        match assessment.category_scores.get(&category) {
            Some(score) => out.push_str(&format!("| {category} | {score:.1} |\n")),
            None => out.push_str(&format!("| {category} | — |\n")),
        }
    }

    if !assessment.evaluator_failures.is_empty() {
        let failed: Vec<String> = assessment
            .evaluator_failures
            .iter()
            .map(|e| e.to_string())
            .collect();
        out.push_str(&format!("\nFailed evaluators: {}\n", failed.join(", ")));
    }

    if assessment.issues.is_empty() {
        out.push_str("\nNo open issues.\n");
    } else {
        out.push_str(&format!(
            "\n### Open issues ({})\n| Severity | Category | Issue |\n|----------|----------|-------|\n",
            assessment.issues.len()
        ));
        for issue in &assessment.issues {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                issue.severity,
                issue.category,
                truncate(&issue.description, 70),
            ));
        }
    }
    out
}

/// Human-readable rendering of one improvement session, including the
/// per-iteration score table.
pub fn render_session_markdown(session: &ImprovementSession) -> String {
    let stats = session.stats();
    let mut out = format!(
        "# Improvement Session — {}\n\n{}\n\n",
        session.session_id, stats
    );

    out.push_str(
        "| # | Issue fixed | Score before | Score after | Δ |\n|---|-------------|--------------|-------------|---|\n",
    );
    let mut before = session.initial_assessment.weighted_score;
    for iteration in &session.iterations {
        let fixed = iteration
            .fix_applied
            .as_ref()
            .map(|i| i.kind.to_string())
            .unwrap_or_else(|| "—".to_string());
        let label = if iteration.reverted {
            format!("{fixed} (reverted)")
        } else {
            fixed
        };
        let after = iteration.assessment.weighted_score;
        out.push_str(&format!(
            "| {} | {label} | {before:.1} | {after:.1} | {:+.2} |\n",
            iteration.index, iteration.score_delta,
        ));
        before = after;
    }

    out.push_str(&format!(
        "\nTermination: **{}**\n\n",
        session.termination
    ));
    out.push_str(&render_assessment_markdown(session.final_assessment()));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{IterationRecord, TerminationReason};
    use sitegrade_common::{AgreementLevel, PerceptionScore, Verdict};
    use std::collections::BTreeMap;

    fn assessment(score: f32) -> FinalAssessment {
        FinalAssessment {
            weighted_score: score,
            category_scores: Category::ALL.iter().map(|c| (*c, score / 10.0)).collect::<BTreeMap<_, _>>(),
            perception: PerceptionScore {
                first_impression: 20.0,
                emotional_resonance: 20.0,
                cohesion: 20.0,
                identity_recognition: 20.0,
            },
            agreement: AgreementLevel::High,
            verdict: Verdict::Good,
            issues: vec![],
            outliers: vec![],
            evaluator_failures: vec![],
        }
    }

    fn session() -> ImprovementSession {
        ImprovementSession {
            session_id: Uuid::nil(),
            artifact_id: Uuid::nil(),
            target_score: 75.0,
            min_category_score: 7.0,
            max_iterations: 10,
            initial_assessment: assessment(60.0),
            iterations: vec![IterationRecord {
                index: 1,
                assessment: assessment(68.0),
                fix_applied: Some(sitegrade_common::Issue::new(
                    sitegrade_common::IssueKind::MissingContactInfo,
                    Category::Persuasion,
                    sitegrade_common::Severity::Critical,
                    "no contact info",
                    None,
                    sitegrade_common::EvaluatorId::Persuasion,
                )),
                fixer_note: "added contact block".to_string(),
                score_delta: 8.0,
                reverted: false,
            }],
            termination: TerminationReason::Stagnation,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn session_markdown_has_the_iteration_table() {
        let md = render_session_markdown(&session());
        assert!(md.contains("| 1 | missing_contact_info | 60.0 | 68.0 | +8.00 |"));
        assert!(md.contains("Termination: **stagnation**"));
    }

    #[test]
    fn assessment_markdown_lists_every_category() {
        let md = render_assessment_markdown(&assessment(70.0));
        for category in Category::ALL {
            assert!(md.contains(&format!("| {category} |")));
        }
    }

    #[test]
    fn reports_save_under_the_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        std::env::set_var("DATA_DIR", tmp.path());
        let path = save_session_report(&session()).unwrap();
        assert!(path.exists());
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"termination\": \"stagnation\""));
        std::env::remove_var("DATA_DIR");
    }
}
