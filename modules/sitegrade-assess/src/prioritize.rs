//! Issue deduplication and priority ordering.
//!
//! Pure functions for collapsing equivalent findings from different
//! evaluators and producing the deterministic repair queue the orchestrator
//! walks.

use std::collections::BTreeMap;

use strsim::jaro_winkler;

use sitegrade_common::{AssessmentConfig, Category, Issue};

/// Normalize a description for similarity comparison: lowercase and trim.
fn normalize(description: &str) -> String {
    description.trim().to_lowercase()
}

/// Collapse issues describing the same defect.
///
/// Two issues merge when their categories match and their normalized
/// descriptions are near-identical (Jaro-Winkler above the configured
/// threshold). The surviving issue is the first seen; it keeps the higher of
/// the two severities.
pub fn dedupe(issues: Vec<Issue>, config: &AssessmentConfig) -> Vec<Issue> {
    let mut merged: Vec<Issue> = Vec::new();
    for issue in issues {
        match merged.iter_mut().find(|kept| {
            kept.category == issue.category
                && jaro_winkler(&normalize(&kept.description), &normalize(&issue.description))
                    >= config.dedup_similarity
        }) {
            Some(kept) => {
                if issue.severity > kept.severity {
                    kept.severity = issue.severity;
                }
            }
            None => merged.push(issue),
        }
    }
    merged
}

/// Order issues into the repair queue: severity first, then how far the
/// issue's category sits below its minimum threshold (bigger deficit first).
/// The sort is stable, so equal entries keep first-seen order.
pub fn prioritize(
    mut issues: Vec<Issue>,
    category_scores: &BTreeMap<Category, f32>,
    config: &AssessmentConfig,
) -> Vec<Issue> {
    let deficit = |category: Category| -> f32 {
        let minimum = config.category_minimum(category);
        // A category nobody scored counts as fully deficient.
        let score = category_scores.get(&category).copied().unwrap_or(0.0);
        (minimum - score).max(0.0)
    };

    issues.sort_by(|a, b| {
        b.severity.cmp(&a.severity).then(
            deficit(b.category)
                .partial_cmp(&deficit(a.category))
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegrade_common::{EvaluatorId, IssueKind, Severity};

    fn issue(
        kind: IssueKind,
        category: Category,
        severity: Severity,
        description: &str,
        evaluator: EvaluatorId,
    ) -> Issue {
        Issue::new(kind, category, severity, description, None, evaluator)
    }

    #[test]
    fn near_identical_same_category_issues_collapse_to_one() {
        let issues = vec![
            issue(
                IssueKind::StockImagery,
                Category::Distinctiveness,
                Severity::Medium,
                "Most imagery is stock template art rather than generated for the business",
                EvaluatorId::Visual,
            ),
            issue(
                IssueKind::StockImagery,
                Category::Distinctiveness,
                Severity::High,
                "Most imagery is stock template art rather than generated for this business",
                EvaluatorId::Distinctiveness,
            ),
        ];
        let deduped = dedupe(issues, &AssessmentConfig::default());
        assert_eq!(deduped.len(), 1);
        // Merged issue keeps the higher severity and the first-seen source.
        assert_eq!(deduped[0].severity, Severity::High);
        assert_eq!(deduped[0].source_evaluator, EvaluatorId::Visual);
    }

    #[test]
    fn same_description_different_category_does_not_merge() {
        let issues = vec![
            issue(
                IssueKind::MissingAltText,
                Category::Structure,
                Severity::Medium,
                "Images are missing alt text",
                EvaluatorId::Structure,
            ),
            issue(
                IssueKind::MissingAltText,
                Category::Discoverability,
                Severity::Medium,
                "Images are missing alt text",
                EvaluatorId::Discoverability,
            ),
        ];
        let deduped = dedupe(issues, &AssessmentConfig::default());
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn unrelated_descriptions_do_not_merge() {
        let issues = vec![
            issue(
                IssueKind::MissingCallToAction,
                Category::Persuasion,
                Severity::Critical,
                "The home page offers visitors no call to action",
                EvaluatorId::Persuasion,
            ),
            issue(
                IssueKind::MissingSocialProof,
                Category::Persuasion,
                Severity::Medium,
                "No testimonials, reviews, or other social proof anywhere on the site",
                EvaluatorId::Persuasion,
            ),
        ];
        let deduped = dedupe(issues, &AssessmentConfig::default());
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn severity_dominates_the_queue_order() {
        let scores: BTreeMap<Category, f32> =
            Category::ALL.iter().map(|c| (*c, 8.0)).collect();
        let issues = vec![
            issue(
                IssueKind::MissingMetaDescription,
                Category::Discoverability,
                Severity::Medium,
                "no meta description",
                EvaluatorId::Discoverability,
            ),
            issue(
                IssueKind::MissingContactInfo,
                Category::Persuasion,
                Severity::Critical,
                "no contact info",
                EvaluatorId::Persuasion,
            ),
        ];
        let queue = prioritize(issues, &scores, &AssessmentConfig::default());
        assert_eq!(queue[0].kind, IssueKind::MissingContactInfo);
    }

    #[test]
    fn within_equal_severity_bigger_category_deficit_goes_first() {
        let mut scores: BTreeMap<Category, f32> =
            Category::ALL.iter().map(|c| (*c, 8.0)).collect();
        scores.insert(Category::Persuasion, 4.0); // deficit 3.0
        scores.insert(Category::Visual, 6.5); // deficit 0.5
        let issues = vec![
            issue(
                IssueKind::PaletteSprawl,
                Category::Visual,
                Severity::Medium,
                "palette sprawl",
                EvaluatorId::Visual,
            ),
            issue(
                IssueKind::MissingSocialProof,
                Category::Persuasion,
                Severity::Medium,
                "no social proof",
                EvaluatorId::Persuasion,
            ),
        ];
        let queue = prioritize(issues, &scores, &AssessmentConfig::default());
        assert_eq!(queue[0].kind, IssueKind::MissingSocialProof);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let scores: BTreeMap<Category, f32> =
            Category::ALL.iter().map(|c| (*c, 8.0)).collect();
        let issues = vec![
            issue(
                IssueKind::FontSprawl,
                Category::Visual,
                Severity::Medium,
                "font sprawl",
                EvaluatorId::Visual,
            ),
            issue(
                IssueKind::PaletteSprawl,
                Category::Visual,
                Severity::Medium,
                "palette sprawl",
                EvaluatorId::Visual,
            ),
        ];
        let queue = prioritize(issues, &scores, &AssessmentConfig::default());
        assert_eq!(queue[0].kind, IssueKind::FontSprawl);
        assert_eq!(queue[1].kind, IssueKind::PaletteSprawl);
    }

    #[test]
    fn unscored_category_counts_as_fully_deficient() {
        let scores: BTreeMap<Category, f32> = [(Category::Visual, 8.0)].into_iter().collect();
        let issues = vec![
            issue(
                IssueKind::PaletteSprawl,
                Category::Visual,
                Severity::Medium,
                "palette sprawl",
                EvaluatorId::Visual,
            ),
            issue(
                IssueKind::MissingSocialProof,
                Category::Persuasion,
                Severity::Medium,
                "no social proof",
                EvaluatorId::Persuasion,
            ),
        ];
        let queue = prioritize(issues, &scores, &AssessmentConfig::default());
        assert_eq!(queue[0].kind, IssueKind::MissingSocialProof);
    }
}
