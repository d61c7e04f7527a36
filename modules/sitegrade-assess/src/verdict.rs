//! Verdict classification.
//!
//! A single weak category or low agreement must never be masked by a high
//! average — every tier above Good requires all of its conditions to hold,
//! and the tiers are evaluated strictly in order, first match wins.

use sitegrade_common::{
    AgreementLevel, AssessmentConfig, Category, ConsensusResult, PerceptionScore, Verdict,
};

/// Compute the blended 0..100 score and the verdict tier.
///
/// Tier rules, checked in this order:
/// 1. WorldClass — weighted ≥ 90, every category ≥ 9.0, perception ≥ 90,
///    agreement High
/// 2. Excellent — weighted ≥ 75, every category ≥ its configured minimum,
///    perception ≥ 70, agreement High or Medium
/// 3. Good — weighted ≥ 50
/// 4. Poor — otherwise
///
/// A category nobody scored fails every "every category ≥ X" gate.
pub fn classify(
    consensus: &ConsensusResult,
    perception: &PerceptionScore,
    config: &AssessmentConfig,
) -> (f32, Verdict) {
    let weighted = weighted_score(consensus, perception, config);
    let perception_total = perception.total();

    let verdict = if weighted >= 90.0
        && every_category_at_least(consensus, |_| 9.0)
        && perception_total >= 90.0
        && consensus.agreement == AgreementLevel::High
    {
        Verdict::WorldClass
    } else if weighted >= 75.0
        && every_category_at_least(consensus, |c| config.category_minimum(c))
        && perception_total >= 70.0
        && consensus.agreement >= AgreementLevel::Medium
    {
        Verdict::Excellent
    } else if weighted >= 50.0 {
        Verdict::Good
    } else {
        Verdict::Poor
    };

    (weighted, verdict)
}

/// Category block scaled to 0..100 (weights renormalized over the categories
/// that were actually scored), blended with the perception total. Category
/// scores dominate; perception is a modifier.
fn weighted_score(
    consensus: &ConsensusResult,
    perception: &PerceptionScore,
    config: &AssessmentConfig,
) -> f32 {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (category, score) in &consensus.category_scores {
        let weight = config.weight(*category);
        weighted_sum += weight * score * 10.0;
        weight_total += weight;
    }
    let category_block = if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    };

    category_block * (1.0 - config.perception_blend) + perception.total() * config.perception_blend
}

fn every_category_at_least(
    consensus: &ConsensusResult,
    minimum: impl Fn(Category) -> f32,
) -> bool {
    Category::ALL.iter().all(|category| {
        consensus
            .category_scores
            .get(category)
            .is_some_and(|score| *score >= minimum(*category))
    })
}
