use std::collections::BTreeMap;

use regex::Regex;

use sitegrade_common::{
    ArtifactSnapshot, AssetKind, AssetOrigin, Category, EvaluatorId, IssueKind, RubricEvaluation,
    Severity,
};

use crate::style::extract_font_families;

use super::{RubricEvaluator, ScoreCard};

const COVERS: [Category; 2] = [Category::Distinctiveness, Category::Visual];

const FILLER_PATTERN: &str = "(?i)(lorem ipsum|welcome to our website|your company|\
                              insert [a-z ]+here|placeholder|coming soon)";
/// System font stacks that ship with the template.
const GENERIC_FONTS: [&str; 5] = ["arial", "helvetica", "times new roman", "verdana", "tahoma"];
/// Stock-asset share above which the imagery reads as template-default.
const STOCK_SHARE_LIMIT: f32 = 0.6;
/// Paragraphs shorter than this are boilerplate-adjacent; only longer runs
/// count as duplicated copy.
const DUP_PARAGRAPH_MIN_CHARS: usize = 60;

/// Scores whether the site could belong to anyone: filler phrasing, brand
/// presence, stock imagery share, copied paragraphs, and default typography.
pub struct DistinctivenessEvaluator;

impl RubricEvaluator for DistinctivenessEvaluator {
    fn id(&self) -> EvaluatorId {
        EvaluatorId::Distinctiveness
    }

    fn covers(&self) -> &'static [Category] {
        &COVERS
    }

    fn evaluate(&self, snapshot: &ArtifactSnapshot) -> RubricEvaluation {
        let mut card = ScoreCard::new(self.id(), self.covers());
        let filler_re = Regex::new(FILLER_PATTERN).expect("valid regex");

        for page in &snapshot.pages {
            if let Some(m) = filler_re.find(&page.text) {
                card.deduct(
                    Category::Distinctiveness,
                    2.5,
                    IssueKind::GenericCopy,
                    Severity::High,
                    format!(
                        "Page '{}' still contains template filler ('{}')",
                        page.slug,
                        m.as_str()
                    ),
                    Some(page.slug.clone()),
                );
            }
        }

        // Brand presence: the business name should appear on most pages.
        if !snapshot.pages.is_empty() {
            let name = snapshot.business_name.to_lowercase();
            let mentioning = snapshot
                .pages
                .iter()
                .filter(|p| p.text.to_lowercase().contains(&name))
                .count();
            if (mentioning as f32) < snapshot.pages.len() as f32 / 2.0 {
                card.deduct(
                    Category::Distinctiveness,
                    1.5,
                    IssueKind::WeakBrandPresence,
                    Severity::Medium,
                    format!(
                        "'{}' is named on only {mentioning} of {} pages",
                        snapshot.business_name,
                        snapshot.pages.len()
                    ),
                    None,
                );
            }
        }

        let images: Vec<_> = snapshot
            .pages
            .iter()
            .flat_map(|p| &p.assets)
            .filter(|a| a.kind == AssetKind::Image)
            .collect();
        if !images.is_empty() {
            let stock = images
                .iter()
                .filter(|a| a.origin == AssetOrigin::StockTemplate)
                .count();
            if stock as f32 / images.len() as f32 > STOCK_SHARE_LIMIT {
                card.deduct(
                    Category::Distinctiveness,
                    2.0,
                    IssueKind::StockImagery,
                    Severity::High,
                    "Most imagery is stock template art rather than generated for this business",
                    None,
                );
            }
        }

        // The same paragraph on two pages means the generator recycled copy.
        let mut paragraph_pages: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for page in &snapshot.pages {
            for paragraph in page.text.split("\n\n") {
                let trimmed = paragraph.trim();
                if trimmed.chars().count() >= DUP_PARAGRAPH_MIN_CHARS {
                    let slugs = paragraph_pages.entry(trimmed).or_default();
                    if !slugs.contains(&page.slug.as_str()) {
                        slugs.push(&page.slug);
                    }
                }
            }
        }
        for (paragraph, slugs) in paragraph_pages.iter().filter(|(_, s)| s.len() > 1) {
            let preview: String = paragraph.chars().take(40).collect();
            card.deduct(
                Category::Distinctiveness,
                1.5,
                IssueKind::DuplicatedCopy,
                Severity::Medium,
                format!("Pages {} repeat the same paragraph ('{preview}…')", slugs.join(", ")),
                None,
            );
        }

        // Typography that never left the template defaults.
        let fonts: Vec<String> = snapshot
            .pages
            .iter()
            .flat_map(|p| extract_font_families(&p.stylesheet))
            .collect();
        if !fonts.is_empty() && fonts.iter().all(|f| GENERIC_FONTS.contains(&f.as_str())) {
            card.deduct(
                Category::Visual,
                1.0,
                IssueKind::DefaultTypography,
                Severity::Low,
                "Every declared font is a system default; the template typography was never customized",
                None,
            );
        }

        card.into_evaluation(0.85)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegrade_common::testing::{polished_site, template_fresh_site};
    use sitegrade_common::{Renderer, StaticRenderer};

    #[test]
    fn polished_site_reads_as_its_own_brand() {
        let snapshot = StaticRenderer.render(&polished_site()).unwrap();
        let eval = DistinctivenessEvaluator.evaluate(&snapshot);
        assert_eq!(eval.scores.get(&Category::Distinctiveness), Some(&10.0));
        assert!(eval.issues.is_empty());
    }

    #[test]
    fn template_site_is_generic_in_every_way() {
        let snapshot = StaticRenderer.render(&template_fresh_site()).unwrap();
        let eval = DistinctivenessEvaluator.evaluate(&snapshot);
        let kinds: Vec<_> = eval.issues.iter().map(|i| i.kind).collect();
        assert!(kinds.contains(&IssueKind::GenericCopy));
        assert!(kinds.contains(&IssueKind::WeakBrandPresence));
        assert!(kinds.contains(&IssueKind::StockImagery));
        assert!(kinds.contains(&IssueKind::DefaultTypography));
        assert!(eval.scores[&Category::Distinctiveness] < 5.0);
    }

    #[test]
    fn recycled_paragraphs_are_flagged() {
        let snapshot = StaticRenderer.render(&template_fresh_site()).unwrap();
        let eval = DistinctivenessEvaluator.evaluate(&snapshot);
        assert!(eval.issues.iter().any(|i| i.kind == IssueKind::DuplicatedCopy));
    }
}
