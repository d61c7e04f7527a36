use regex::Regex;

use sitegrade_common::{
    ArtifactSnapshot, AssetKind, Category, EvaluatorId, IssueKind, RubricEvaluation, Severity,
};

use super::{RubricEvaluator, ScoreCard};

const COVERS: [Category; 2] = [Category::Structure, Category::Content];

/// Word-count floor below which a page reads as unfinished.
const THIN_CONTENT_WORDS: usize = 80;

/// Scores markup structure and accessibility: heading hierarchy, navigation,
/// image alt text, page reachability, and basic content completeness.
pub struct StructureEvaluator;

impl RubricEvaluator for StructureEvaluator {
    fn id(&self) -> EvaluatorId {
        EvaluatorId::Structure
    }

    fn covers(&self) -> &'static [Category] {
        &COVERS
    }

    fn evaluate(&self, snapshot: &ArtifactSnapshot) -> RubricEvaluation {
        let mut card = ScoreCard::new(self.id(), self.covers());
        let heading_re = Regex::new(r"(?i)<h([1-6])[^>]*>").expect("valid regex");
        let href_re = Regex::new(r#"href\s*=\s*["']([^"']+)["']"#).expect("valid regex");

        for page in &snapshot.pages {
            let hint = Some(page.slug.clone());

            // Exactly one top-level heading per page.
            let levels: Vec<u32> = heading_re
                .captures_iter(&page.markup)
                .filter_map(|c| c[1].parse().ok())
                .collect();
            let h1_count = levels.iter().filter(|l| **l == 1).count();
            match h1_count {
                0 => card.deduct(
                    Category::Structure,
                    2.0,
                    IssueKind::MissingHeadingHierarchy,
                    Severity::High,
                    format!("Page '{}' has no top-level heading", page.slug),
                    hint.clone(),
                ),
                1 => {}
                n => card.deduct(
                    Category::Structure,
                    1.0,
                    IssueKind::MissingHeadingHierarchy,
                    Severity::Medium,
                    format!("Page '{}' has {n} top-level headings", page.slug),
                    hint.clone(),
                ),
            }

            // Heading levels must not skip (h1 → h3 with no h2 between).
            if levels.windows(2).any(|w| w[1] > w[0] + 1) {
                card.deduct(
                    Category::Structure,
                    1.0,
                    IssueKind::MissingHeadingHierarchy,
                    Severity::Medium,
                    format!("Page '{}' skips heading levels", page.slug),
                    hint.clone(),
                );
            }

            if !page.markup.to_lowercase().contains("<nav") {
                card.deduct(
                    Category::Structure,
                    1.5,
                    IssueKind::BrokenNavigation,
                    Severity::High,
                    format!("Page '{}' has no navigation element", page.slug),
                    hint.clone(),
                );
            }

            let images_without_alt = page
                .assets
                .iter()
                .filter(|a| a.kind == AssetKind::Image && a.alt_text.is_none())
                .count();
            if images_without_alt > 0 {
                card.deduct(
                    Category::Structure,
                    1.0,
                    IssueKind::MissingAltText,
                    Severity::Medium,
                    format!(
                        "Page '{}' has {images_without_alt} image(s) without alt text",
                        page.slug
                    ),
                    hint.clone(),
                );
            }

            // Content completeness.
            if page.title.trim().is_empty() {
                card.deduct(
                    Category::Content,
                    2.0,
                    IssueKind::MissingPageTitle,
                    Severity::High,
                    format!("Page '{}' has an empty title", page.slug),
                    hint.clone(),
                );
            }
            let words = page.word_count();
            if words < THIN_CONTENT_WORDS {
                card.deduct(
                    Category::Content,
                    1.5,
                    IssueKind::ThinContent,
                    Severity::Medium,
                    format!(
                        "Page '{}' has only {words} words of copy (minimum {THIN_CONTENT_WORDS})",
                        page.slug
                    ),
                    hint.clone(),
                );
            }
        }

        // Every non-home page must be linked from somewhere else.
        for page in &snapshot.pages {
            if page.is_home() {
                continue;
            }
            let reachable = snapshot.pages.iter().any(|other| {
                other.slug != page.slug
                    && href_re
                        .captures_iter(&other.markup)
                        .any(|c| c[1].trim_matches('/').contains(page.slug.as_str()))
            });
            if !reachable {
                card.deduct(
                    Category::Structure,
                    1.0,
                    IssueKind::OrphanPage,
                    Severity::Medium,
                    format!("Page '{}' is not linked from any other page", page.slug),
                    Some(page.slug.clone()),
                );
            }
        }

        card.into_evaluation(0.95)
    }
}
