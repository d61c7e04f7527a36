//! Reconciles the five rubric evaluations into one score per category, with
//! an explicit agreement signal and outlier flags instead of a black-box
//! average.

use std::collections::BTreeMap;

use tracing::debug;

use sitegrade_common::{
    AgreementLevel, AssessmentConfig, Category, ConsensusResult, OutlierFlag, RubricEvaluation,
};

/// Combine evaluations into consensus scores.
///
/// Per category: the confidence-weighted mean of every non-abstaining
/// evaluator. Abstentions (missing category, or whole-evaluator
/// `confidence = 0`) are excluded, never treated as zero. Agreement is the
/// mean inter-evaluator variance across categories with at least two
/// contributors, discretized against the configured thresholds. Evaluators
/// far from the consensus are flagged but still counted — disagreement is
/// for humans to audit, not for the engine to hide.
pub fn combine(evaluations: &[RubricEvaluation], config: &AssessmentConfig) -> ConsensusResult {
    let mut category_scores = BTreeMap::new();
    let mut outliers = Vec::new();
    let mut variances = Vec::new();

    for category in Category::ALL {
        let contributions: Vec<_> = evaluations
            .iter()
            .filter(|e| !e.is_abstained())
            .filter_map(|e| e.scores.get(&category).map(|s| (e.evaluator, *s, e.confidence)))
            .collect();
        if contributions.is_empty() {
            debug!(category = %category, "No evaluator scored this category");
            continue;
        }

        let weight_sum: f32 = contributions.iter().map(|(_, _, c)| c).sum();
        let mean =
            contributions.iter().map(|(_, s, c)| s * c).sum::<f32>() / weight_sum;
        category_scores.insert(category, mean);

        if contributions.len() >= 2 {
            let variance = contributions
                .iter()
                .map(|(_, s, _)| (s - mean).powi(2))
                .sum::<f32>()
                / contributions.len() as f32;
            variances.push(variance);

            let stddev = variance.sqrt();
            if stddev > f32::EPSILON {
                for (evaluator, score, _) in &contributions {
                    if (score - mean).abs() > config.outlier_stddev * stddev {
                        outliers.push(OutlierFlag {
                            evaluator: *evaluator,
                            category,
                            score: *score,
                            consensus: mean,
                        });
                    }
                }
            }
        }
    }

    // Agreement cannot be demonstrated from single opinions: no category
    // with two or more contributors means Low, not High.
    let agreement = if variances.is_empty() {
        AgreementLevel::Low
    } else {
        let mean_variance = variances.iter().sum::<f32>() / variances.len() as f32;
        if mean_variance < config.agreement_variance_high {
            AgreementLevel::High
        } else if mean_variance < config.agreement_variance_medium {
            AgreementLevel::Medium
        } else {
            AgreementLevel::Low
        }
    };

    ConsensusResult {
        category_scores,
        agreement,
        outliers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegrade_common::EvaluatorId;

    fn eval(id: EvaluatorId, scores: &[(Category, f32)], confidence: f32) -> RubricEvaluation {
        RubricEvaluation {
            evaluator: id,
            scores: scores.iter().copied().collect(),
            issues: vec![],
            confidence,
        }
    }

    #[test]
    fn equal_confidence_mean_is_plain_mean() {
        let evals = vec![
            eval(EvaluatorId::Structure, &[(Category::Structure, 8.0)], 1.0),
            eval(EvaluatorId::Discoverability, &[(Category::Structure, 6.0)], 1.0),
        ];
        let result = combine(&evals, &AssessmentConfig::default());
        assert!((result.category_scores[&Category::Structure] - 7.0).abs() < 1e-6);
    }

    #[test]
    fn higher_confidence_pulls_the_mean() {
        let evals = vec![
            eval(EvaluatorId::Structure, &[(Category::Structure, 10.0)], 0.9),
            eval(EvaluatorId::Discoverability, &[(Category::Structure, 5.0)], 0.1),
        ];
        let result = combine(&evals, &AssessmentConfig::default());
        assert!(result.category_scores[&Category::Structure] > 9.0);
    }

    #[test]
    fn zero_confidence_evaluator_abstains_from_every_category() {
        let evals = vec![
            eval(EvaluatorId::Structure, &[(Category::Structure, 9.0)], 1.0),
            eval(EvaluatorId::Discoverability, &[(Category::Structure, 0.0)], 0.0),
        ];
        let result = combine(&evals, &AssessmentConfig::default());
        assert!((result.category_scores[&Category::Structure] - 9.0).abs() < 1e-6);
    }

    #[test]
    fn missing_category_is_an_abstention_not_a_zero() {
        let evals = vec![
            eval(EvaluatorId::Structure, &[(Category::Structure, 9.0)], 1.0),
            eval(EvaluatorId::Visual, &[(Category::Visual, 7.0)], 1.0),
        ];
        let result = combine(&evals, &AssessmentConfig::default());
        assert!((result.category_scores[&Category::Structure] - 9.0).abs() < 1e-6);
        assert!(!result.category_scores.contains_key(&Category::Persuasion));
    }

    #[test]
    fn tight_scores_mean_high_agreement() {
        let evals = vec![
            eval(EvaluatorId::Structure, &[(Category::Structure, 8.0)], 1.0),
            eval(EvaluatorId::Discoverability, &[(Category::Structure, 8.2)], 1.0),
        ];
        let result = combine(&evals, &AssessmentConfig::default());
        assert_eq!(result.agreement, AgreementLevel::High);
    }

    #[test]
    fn scattered_scores_mean_low_agreement() {
        let evals = vec![
            eval(EvaluatorId::Structure, &[(Category::Structure, 10.0)], 1.0),
            eval(EvaluatorId::Discoverability, &[(Category::Structure, 4.0)], 1.0),
        ];
        let result = combine(&evals, &AssessmentConfig::default());
        assert_eq!(result.agreement, AgreementLevel::Low);
    }

    #[test]
    fn single_contributor_categories_cannot_show_agreement() {
        let evals = vec![eval(EvaluatorId::Structure, &[(Category::Structure, 10.0)], 1.0)];
        let result = combine(&evals, &AssessmentConfig::default());
        assert_eq!(result.agreement, AgreementLevel::Low);
    }

    #[test]
    fn outliers_are_flagged_but_still_counted() {
        let evals = vec![
            eval(EvaluatorId::Structure, &[(Category::Structure, 8.0)], 1.0),
            eval(EvaluatorId::Discoverability, &[(Category::Structure, 8.0)], 1.0),
            eval(EvaluatorId::Visual, &[(Category::Structure, 8.1)], 1.0),
            eval(EvaluatorId::Persuasion, &[(Category::Structure, 2.0)], 1.0),
        ];
        let mut config = AssessmentConfig::default();
        config.outlier_stddev = 1.5;
        let result = combine(&evals, &config);
        assert_eq!(result.outliers.len(), 1);
        assert_eq!(result.outliers[0].evaluator, EvaluatorId::Persuasion);
        // The outlier still dragged the mean below the cluster.
        assert!(result.category_scores[&Category::Structure] < 8.0);
    }

    #[test]
    fn all_evaluators_abstained_yields_empty_consensus() {
        let evals = vec![
            RubricEvaluation::abstained(EvaluatorId::Structure),
            RubricEvaluation::abstained(EvaluatorId::Visual),
        ];
        let result = combine(&evals, &AssessmentConfig::default());
        assert!(result.category_scores.is_empty());
        assert_eq!(result.agreement, AgreementLevel::Low);
    }
}
