use std::collections::BTreeSet;

use sitegrade_common::{
    ArtifactSnapshot, AssetKind, AssetOrigin, Category, EvaluatorId, IssueKind, RubricEvaluation,
    Severity,
};

use crate::style::{extract_colors, extract_font_families, luminance};

use super::{RubricEvaluator, ScoreCard};

const COVERS: [Category; 2] = [Category::Visual, Category::Distinctiveness];

/// More distinct colors than this reads as an unedited template palette.
const MAX_PALETTE_SIZE: usize = 8;
const MAX_FONT_FAMILIES: usize = 3;
/// Minimum luminance spread between the darkest and lightest declared color.
const MIN_CONTRAST_RANGE: f32 = 0.35;
/// Stock-asset share above which imagery stops feeling bespoke.
const STOCK_SHARE_LIMIT: f32 = 0.5;

/// Scores visual craft from the stylesheets and asset manifest: palette
/// discipline, typography restraint, contrast, and how much of the imagery
/// was actually generated for the client.
pub struct VisualEvaluator;

impl RubricEvaluator for VisualEvaluator {
    fn id(&self) -> EvaluatorId {
        EvaluatorId::Visual
    }

    fn covers(&self) -> &'static [Category] {
        &COVERS
    }

    fn evaluate(&self, snapshot: &ArtifactSnapshot) -> RubricEvaluation {
        let mut card = ScoreCard::new(self.id(), self.covers());

        let mut colors: BTreeSet<String> = BTreeSet::new();
        let mut fonts: BTreeSet<String> = BTreeSet::new();
        for page in &snapshot.pages {
            colors.extend(extract_colors(&page.stylesheet));
            fonts.extend(extract_font_families(&page.stylesheet));
        }

        if colors.len() > MAX_PALETTE_SIZE {
            card.deduct(
                Category::Visual,
                2.0,
                IssueKind::PaletteSprawl,
                Severity::Medium,
                format!(
                    "Stylesheets declare {} distinct colors (limit {MAX_PALETTE_SIZE})",
                    colors.len()
                ),
                None,
            );
        }

        if fonts.len() > MAX_FONT_FAMILIES {
            card.deduct(
                Category::Visual,
                1.5,
                IssueKind::FontSprawl,
                Severity::Medium,
                format!(
                    "Stylesheets declare {} font families (limit {MAX_FONT_FAMILIES})",
                    fonts.len()
                ),
                None,
            );
        }

        // Coarse contrast check: the darkest and lightest declared colors
        // must be far enough apart to plausibly pair as text on background.
        if colors.len() >= 2 {
            let lums: Vec<f32> = colors.iter().map(|c| luminance(c)).collect();
            let min = lums.iter().cloned().fold(f32::MAX, f32::min);
            let max = lums.iter().cloned().fold(f32::MIN, f32::max);
            if max - min < MIN_CONTRAST_RANGE {
                card.deduct(
                    Category::Visual,
                    2.5,
                    IssueKind::LowContrast,
                    Severity::High,
                    format!(
                        "Declared colors span a luminance range of {:.2}; text will not \
                         stand out from its background",
                        max - min
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
            let share = stock as f32 / images.len() as f32;
            if share > STOCK_SHARE_LIMIT {
                card.deduct(
                    Category::Distinctiveness,
                    2.0,
                    IssueKind::StockImagery,
                    Severity::Medium,
                    "Most imagery is stock template art rather than generated for the business",
                    None,
                );
            }
        }

        card.into_evaluation(0.8)
    }
}
