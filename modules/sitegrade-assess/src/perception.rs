//! Holistic "gut impression" scoring, independent of the category rubrics.
//!
//! The overlap with the rubric evaluators is intentional: a site can pass
//! every per-category check and still feel like nobody's in particular.
//! Four sub-dimensions, each 0..25, distinct heuristics per dimension.

use std::collections::BTreeSet;

use regex::Regex;

use sitegrade_common::{ArtifactSnapshot, AssetKind, AssetOrigin, PerceptionScore};

use crate::style::{extract_colors, extract_font_families, jaccard};

const EMOTIVE_WORDS: [&str; 16] = [
    "love", "enjoy", "warm", "fresh", "care", "passion", "delight", "welcome", "trust",
    "imagine", "proud", "promise", "honest", "favorite", "home", "together",
];

/// Score one snapshot. Pure and deterministic; never shares state with the
/// rubric evaluators.
pub fn perceive(snapshot: &ArtifactSnapshot) -> PerceptionScore {
    PerceptionScore {
        first_impression: first_impression(snapshot),
        emotional_resonance: emotional_resonance(snapshot),
        cohesion: cohesion(snapshot),
        identity_recognition: identity_recognition(snapshot),
    }
}

/// What the first screen of the home page delivers: a headline, an image,
/// enough words to say something, a real title, a tagline.
fn first_impression(snapshot: &ArtifactSnapshot) -> f32 {
    let Some(home) = snapshot.home_page() else {
        return 0.0;
    };

    let mut score = 25.0_f32;
    if !home.markup.to_lowercase().contains("<h1") {
        score -= 8.0;
    }
    if !home.assets.iter().any(|a| a.kind == AssetKind::Image) {
        score -= 5.0;
    }
    if home.word_count() < 40 {
        score -= 6.0;
    }
    let title = home.title.trim().to_lowercase();
    if title.is_empty() || title == "home" || title == "index" {
        score -= 3.0;
    }
    if snapshot.tagline.is_none() {
        score -= 3.0;
    }
    score.max(0.0)
}

/// Density of emotive, second-person copy. Marketing that never says "you"
/// is a brochure, not a pitch.
fn emotional_resonance(snapshot: &ArtifactSnapshot) -> f32 {
    let you_re = Regex::new(r"(?i)\b(you|your|yours)\b").expect("valid regex");

    let mut words = 0usize;
    let mut hits = 0usize;
    for page in &snapshot.pages {
        let lower = page.text.to_lowercase();
        words += page.word_count();
        hits += you_re.find_iter(&lower).count();
        for token in lower.split(|c: char| !c.is_alphabetic()) {
            if EMOTIVE_WORDS.contains(&token) {
                hits += 1;
            }
        }
    }
    if words == 0 {
        return 0.0;
    }

    // ~4 emotive hits per 100 words reads as fully warm; scale linearly.
    let per_hundred = hits as f32 * 100.0 / words as f32;
    (per_hundred / 4.0 * 25.0).min(25.0)
}

/// Whether the pages look like one site: shared palette, shared typography,
/// navigation everywhere.
fn cohesion(snapshot: &ArtifactSnapshot) -> f32 {
    if snapshot.pages.is_empty() {
        return 0.0;
    }
    if snapshot.pages.len() == 1 {
        // A single page cannot disagree with itself; only nav presence counts.
        let nav = snapshot.pages[0].markup.to_lowercase().contains("<nav");
        return if nav { 25.0 } else { 17.5 };
    }

    let palettes: Vec<BTreeSet<String>> = snapshot
        .pages
        .iter()
        .map(|p| extract_colors(&p.stylesheet))
        .collect();
    let fonts: Vec<BTreeSet<String>> = snapshot
        .pages
        .iter()
        .map(|p| extract_font_families(&p.stylesheet))
        .collect();

    let palette_sim = pairwise_mean(&palettes);
    let font_sim = pairwise_mean(&fonts);
    let nav_share = snapshot
        .pages
        .iter()
        .filter(|p| p.markup.to_lowercase().contains("<nav"))
        .count() as f32
        / snapshot.pages.len() as f32;

    25.0 * (0.4 * palette_sim + 0.3 * font_sim + 0.3 * nav_share)
}

/// Mean Jaccard similarity over all page pairs.
fn pairwise_mean(sets: &[BTreeSet<String>]) -> f32 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..sets.len() {
        for j in (i + 1)..sets.len() {
            total += jaccard(&sets[i], &sets[j]);
            pairs += 1;
        }
    }
    if pairs == 0 {
        1.0
    } else {
        total / pairs as f32
    }
}

/// Whether this site could only belong to this business: the brand is named
/// throughout, the imagery was generated for it, and no filler survived.
fn identity_recognition(snapshot: &ArtifactSnapshot) -> f32 {
    if snapshot.pages.is_empty() {
        return 0.0;
    }
    let filler_re = Regex::new(
        "(?i)(lorem ipsum|welcome to our website|your company|placeholder|coming soon)",
    )
    .expect("valid regex");

    let name = snapshot.business_name.to_lowercase();
    let brand_share = snapshot
        .pages
        .iter()
        .filter(|p| p.text.to_lowercase().contains(&name))
        .count() as f32
        / snapshot.pages.len() as f32;

    let images: Vec<_> = snapshot
        .pages
        .iter()
        .flat_map(|p| &p.assets)
        .filter(|a| a.kind == AssetKind::Image)
        .collect();
    let generated_share = if images.is_empty() {
        // No imagery at all is neither bespoke nor stock.
        0.5
    } else {
        images
            .iter()
            .filter(|a| a.origin == AssetOrigin::Generated)
            .count() as f32
            / images.len() as f32
    };

    let filler_free = if snapshot.pages.iter().any(|p| filler_re.is_match(&p.text)) {
        0.0
    } else {
        1.0
    };

    25.0 * (0.4 * brand_share + 0.4 * generated_share + 0.2 * filler_free)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegrade_common::testing::{polished_site, template_fresh_site};
    use sitegrade_common::{Renderer, StaticRenderer};

    #[test]
    fn polished_site_perceives_well() {
        let snapshot = StaticRenderer.render(&polished_site()).unwrap();
        let p = perceive(&snapshot);
        assert!((24.0..=25.0).contains(&p.first_impression), "{p:?}");
        assert!(p.cohesion > 20.0, "{p:?}");
        assert!(p.identity_recognition > 20.0, "{p:?}");
        assert!(p.total() > 70.0, "{p:?}");
    }

    #[test]
    fn template_site_perceives_poorly() {
        let snapshot = StaticRenderer.render(&template_fresh_site()).unwrap();
        let p = perceive(&snapshot);
        assert!(p.first_impression < 15.0, "{p:?}");
        assert!(p.identity_recognition < 10.0, "{p:?}");
        assert!(p.total() < 50.0, "{p:?}");
    }

    #[test]
    fn perception_is_deterministic() {
        let snapshot = StaticRenderer.render(&polished_site()).unwrap();
        let a = perceive(&snapshot);
        let b = perceive(&snapshot);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_snapshot_scores_zero_everywhere_but_never_panics() {
        let snapshot = ArtifactSnapshot {
            artifact_id: uuid::Uuid::nil(),
            revision: 0,
            business_name: "Nobody".to_string(),
            industry: "nothing".to_string(),
            tagline: None,
            pages: vec![],
        };
        let p = perceive(&snapshot);
        assert_eq!(p.first_impression, 0.0);
        assert_eq!(p.emotional_resonance, 0.0);
        assert_eq!(p.cohesion, 0.0);
        assert_eq!(p.identity_recognition, 0.0);
    }
}
