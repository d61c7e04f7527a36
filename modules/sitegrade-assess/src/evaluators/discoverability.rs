use std::collections::BTreeMap;

use regex::Regex;

use sitegrade_common::{
    ArtifactSnapshot, Category, EvaluatorId, IssueKind, RubricEvaluation, Severity,
};

use super::{RubricEvaluator, ScoreCard};

const COVERS: [Category; 2] = [Category::Discoverability, Category::Structure];

const META_DESCRIPTION_MIN: usize = 50;
const META_DESCRIPTION_MAX: usize = 160;

/// Scores how findable the site is: per-page meta descriptions in the
/// search-snippet window, unique titles, industry keywords in headings, and
/// clean slugs.
pub struct DiscoverabilityEvaluator;

impl RubricEvaluator for DiscoverabilityEvaluator {
    fn id(&self) -> EvaluatorId {
        EvaluatorId::Discoverability
    }

    fn covers(&self) -> &'static [Category] {
        &COVERS
    }

    fn evaluate(&self, snapshot: &ArtifactSnapshot) -> RubricEvaluation {
        let mut card = ScoreCard::new(self.id(), self.covers());
        let heading_text_re = Regex::new(r"(?i)<h[1-3][^>]*>([^<]*)</h").expect("valid regex");
        let slug_re = Regex::new(r"^[a-z0-9-]+$").expect("valid regex");

        for page in &snapshot.pages {
            let hint = Some(page.slug.clone());
            match &page.meta_description {
                None => card.deduct(
                    Category::Discoverability,
                    1.5,
                    IssueKind::MissingMetaDescription,
                    Severity::Medium,
                    format!("Page '{}' has no meta description", page.slug),
                    hint.clone(),
                ),
                Some(desc) => {
                    let len = desc.chars().count();
                    if !(META_DESCRIPTION_MIN..=META_DESCRIPTION_MAX).contains(&len) {
                        card.deduct(
                            Category::Discoverability,
                            0.5,
                            IssueKind::MetaDescriptionLength,
                            Severity::Low,
                            format!(
                                "Page '{}' meta description is {len} chars; search engines \
                                 show {META_DESCRIPTION_MIN}-{META_DESCRIPTION_MAX}",
                                page.slug
                            ),
                            hint.clone(),
                        );
                    }
                }
            }

            if !slug_re.is_match(&page.slug) {
                card.deduct(
                    Category::Structure,
                    0.5,
                    IssueKind::MessySlug,
                    Severity::Low,
                    format!(
                        "Slug '{}' is not lowercase-hyphenated; URLs will look machine-made",
                        page.slug
                    ),
                    hint,
                );
            }
        }

        // Duplicate titles split click-through between identical results.
        // BTreeMap keeps the emitted issue order deterministic.
        let mut title_counts: BTreeMap<String, usize> = BTreeMap::new();
        for page in &snapshot.pages {
            *title_counts
                .entry(page.title.trim().to_lowercase())
                .or_default() += 1;
        }
        for (title, count) in title_counts.iter().filter(|(t, c)| **c > 1 && !t.is_empty()) {
            card.deduct(
                Category::Discoverability,
                1.5,
                IssueKind::DuplicateTitles,
                Severity::Medium,
                format!("{count} pages share the title '{title}'"),
                None,
            );
        }

        // At least one heading site-wide should name the industry.
        let industry = snapshot.industry.to_lowercase();
        if !industry.is_empty() {
            let in_headings = snapshot.pages.iter().any(|p| {
                heading_text_re
                    .captures_iter(&p.markup)
                    .any(|c| c[1].to_lowercase().contains(&industry))
            });
            if !in_headings {
                card.deduct(
                    Category::Discoverability,
                    1.0,
                    IssueKind::LowKeywordPresence,
                    Severity::Low,
                    format!("No heading on any page mentions '{industry}'"),
                    None,
                );
            }
        }

        card.into_evaluation(0.95)
    }
}
