use regex::Regex;

use sitegrade_common::{
    ArtifactSnapshot, Category, EvaluatorId, IssueKind, RubricEvaluation, Severity,
};

use super::{RubricEvaluator, ScoreCard};

const COVERS: [Category; 2] = [Category::Persuasion, Category::Content];

const CTA_PATTERN: &str = "(?i)(get started|book now|order now|contact us|sign up|subscribe|\
                           request a quote|buy now|schedule|call us|join us|learn more)";
const SOCIAL_PROOF_PATTERN: &str =
    "(?i)(testimonial|review|trusted by|rated|stars|happy customers|loved by|neighbors say)";
const EMAIL_PATTERN: &str = r"[\w.+-]+@[\w-]+\.[\w.-]+";
const PHONE_PATTERN: &str = r"\(?\d{3}\)?[-. ]\d{3}[-. ]\d{4}";

/// Scores conversion readiness: a visitor must be able to tell what to do
/// next (call to action), how to reach the business (contact details), and
/// why to trust it (social proof).
pub struct PersuasionEvaluator;

impl RubricEvaluator for PersuasionEvaluator {
    fn id(&self) -> EvaluatorId {
        EvaluatorId::Persuasion
    }

    fn covers(&self) -> &'static [Category] {
        &COVERS
    }

    fn evaluate(&self, snapshot: &ArtifactSnapshot) -> RubricEvaluation {
        let mut card = ScoreCard::new(self.id(), self.covers());
        let cta_re = Regex::new(CTA_PATTERN).expect("valid regex");
        let proof_re = Regex::new(SOCIAL_PROOF_PATTERN).expect("valid regex");
        let email_re = Regex::new(EMAIL_PATTERN).expect("valid regex");
        let phone_re = Regex::new(PHONE_PATTERN).expect("valid regex");

        let all_text: String = snapshot
            .pages
            .iter()
            .flat_map(|p| [p.text.as_str(), p.markup.as_str()])
            .collect::<Vec<_>>()
            .join("\n");

        match snapshot.home_page() {
            Some(home) => {
                let home_content = format!("{}\n{}", home.text, home.markup);
                if !cta_re.is_match(&home_content) && !home.markup.contains("class=\"cta\"") {
                    card.deduct(
                        Category::Persuasion,
                        3.0,
                        IssueKind::MissingCallToAction,
                        Severity::Critical,
                        "The home page offers visitors no call to action",
                        Some(home.slug.clone()),
                    );
                }

                // The first screen of the home page should say who this is
                // for. Brand name or tagline near the top is the cheap proxy.
                let lead: String = home.text.chars().take(400).collect();
                let lead_lower = lead.to_lowercase();
                let mentions_brand = lead_lower.contains(&snapshot.business_name.to_lowercase());
                let mentions_tagline = snapshot
                    .tagline
                    .as_deref()
                    .map(|t| lead_lower.contains(&t.to_lowercase()))
                    .unwrap_or(false);
                if !mentions_brand && !mentions_tagline {
                    card.deduct(
                        Category::Content,
                        1.5,
                        IssueKind::WeakValueProposition,
                        Severity::Medium,
                        "The home page opening never says who the business is or what it promises",
                        Some(home.slug.clone()),
                    );
                }
            }
            None => {
                card.deduct(
                    Category::Persuasion,
                    3.0,
                    IssueKind::MissingCallToAction,
                    Severity::Critical,
                    "The site has no home page to carry a call to action",
                    None,
                );
            }
        }

        if !email_re.is_match(&all_text) && !phone_re.is_match(&all_text) {
            card.deduct(
                Category::Persuasion,
                3.5,
                IssueKind::MissingContactInfo,
                Severity::Critical,
                "No email address or phone number appears anywhere on the site",
                None,
            );
        }

        if !proof_re.is_match(&all_text) {
            card.deduct(
                Category::Persuasion,
                1.5,
                IssueKind::MissingSocialProof,
                Severity::Medium,
                "No testimonials, reviews, or other social proof anywhere on the site",
                None,
            );
        }

        card.into_evaluation(0.9)
    }
}
