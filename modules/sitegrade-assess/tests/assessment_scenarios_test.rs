//! Scenario-driven assessment tests.
//!
//! Full engine runs over the fixture artifacts, no mutation involved.
//! Validates the fan-out, consensus, verdict, and queue ordering against
//! realistic generated-site shapes.
//!
//! Run with: cargo test -p sitegrade-assess --test assessment_scenarios_test

use std::sync::Arc;

use sitegrade_assess::AssessmentEngine;
use sitegrade_common::testing::{nearly_excellent_site, polished_site, template_fresh_site};
use sitegrade_common::{
    AssessmentConfig, Category, IssueKind, Severity, StaticRenderer, Verdict,
};

fn engine() -> AssessmentEngine {
    AssessmentEngine::new(Arc::new(StaticRenderer), AssessmentConfig::default()).unwrap()
}

// ===========================================================================
// Scenario: a polished site sails through
// ===========================================================================

#[tokio::test]
async fn polished_site_reaches_excellent_with_no_critical_issues() {
    let assessment = engine().assess(&polished_site()).await.unwrap();

    assert!(assessment.verdict >= Verdict::Excellent, "{assessment:?}");
    for category in Category::ALL {
        let score = assessment.category_scores.get(&category);
        assert!(
            score.is_some_and(|s| *s >= 7.0),
            "{category} below Excellent minimum: {score:?}"
        );
    }
    assert!(!assessment
        .issues
        .iter()
        .any(|i| i.severity == Severity::Critical));
}

// ===========================================================================
// Scenario: missing contact info + missing meta description
// ===========================================================================

/// The canonical repair-queue ordering case: a Persuasion/Critical issue
/// must outrank a Discoverability/Medium issue.
#[tokio::test]
async fn contact_gap_outranks_meta_description_gap() {
    let assessment = engine().assess(&nearly_excellent_site()).await.unwrap();

    let contact_pos = assessment
        .issues
        .iter()
        .position(|i| i.kind == IssueKind::MissingContactInfo)
        .expect("missing contact info should be detected");
    let meta_pos = assessment
        .issues
        .iter()
        .position(|i| i.kind == IssueKind::MissingMetaDescription)
        .expect("missing meta description should be detected");

    let contact = &assessment.issues[contact_pos];
    assert_eq!(contact.category, Category::Persuasion);
    assert_eq!(contact.severity, Severity::Critical);

    let meta = &assessment.issues[meta_pos];
    assert_eq!(meta.category, Category::Discoverability);
    assert_eq!(meta.severity, Severity::Medium);

    assert!(
        contact_pos < meta_pos,
        "critical persuasion gap must be queued before the meta description"
    );

    // The contact gap alone should hold the site below Excellent.
    assert!(assessment.verdict < Verdict::Excellent, "{assessment:?}");
    assert!(assessment.category_scores[&Category::Persuasion] < 7.0);
}

// ===========================================================================
// Scenario: cross-evaluator duplicate findings collapse
// ===========================================================================

/// The visual and distinctiveness evaluators both flag template-stock
/// imagery in the Distinctiveness category with near-identical wording; the
/// queue must carry exactly one such issue, at the higher severity.
#[tokio::test]
async fn stock_imagery_is_reported_once_at_the_higher_severity() {
    let assessment = engine().assess(&template_fresh_site()).await.unwrap();

    let stock_issues: Vec<_> = assessment
        .issues
        .iter()
        .filter(|i| i.kind == IssueKind::StockImagery)
        .collect();
    assert_eq!(
        stock_issues.len(),
        1,
        "duplicate stock-imagery findings should merge: {stock_issues:?}"
    );
    assert_eq!(stock_issues[0].severity, Severity::High);
}

// ===========================================================================
// Determinism across the whole engine
// ===========================================================================

#[tokio::test]
async fn repeated_assessment_is_bit_identical_on_scores() {
    let engine = engine();
    for artifact in [polished_site(), template_fresh_site(), nearly_excellent_site()] {
        let a = engine.assess(&artifact).await.unwrap();
        let b = engine.assess(&artifact).await.unwrap();
        assert_eq!(a.category_scores, b.category_scores);
        assert_eq!(a.weighted_score.to_bits(), b.weighted_score.to_bits());
        assert_eq!(a.perception, b.perception);
        assert_eq!(a.verdict, b.verdict);
    }
}

// ===========================================================================
// Domain weighting
// ===========================================================================

/// Weighting persuasion heavily should drag the weighted score down harder
/// on a site whose persuasion is its weak spot.
#[tokio::test]
async fn persuasion_heavy_weights_punish_the_contact_gap() {
    let balanced = engine()
        .assess(&nearly_excellent_site())
        .await
        .unwrap()
        .weighted_score;

    let mut config = AssessmentConfig::default();
    let mut weights: std::collections::BTreeMap<Category, f32> =
        Category::ALL.iter().map(|c| (*c, 0.1)).collect();
    weights.insert(Category::Persuasion, 0.5);
    config.domain_weights = Some(weights);

    let weighted = AssessmentEngine::new(Arc::new(StaticRenderer), config)
        .unwrap()
        .assess(&nearly_excellent_site())
        .await
        .unwrap()
        .weighted_score;

    assert!(
        weighted < balanced,
        "persuasion-heavy weighting should lower the score ({weighted} vs {balanced})"
    );
}
