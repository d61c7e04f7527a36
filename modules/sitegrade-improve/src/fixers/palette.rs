//! Palette consolidation: collapses a sprawling color set down to the most
//! used colors so the stylesheets read as one design decision.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::info;

use sitegrade_common::{Issue, IssueKind, WebsiteArtifact};

use super::{FixOutcome, Fixer};

/// Colors kept after consolidation. Matches the rubric's sprawl limit.
const PALETTE_KEEP: usize = 8;

/// Rewrites every color outside the `PALETTE_KEEP` most used ones to the
/// nearest kept color by luminance. Deterministic: occurrence count first,
/// lexicographic order as the tiebreak.
pub struct PaletteFixer;

impl Fixer for PaletteFixer {
    fn handles(&self) -> IssueKind {
        IssueKind::PaletteSprawl
    }

    fn apply(&self, artifact: &mut WebsiteArtifact, _issue: &Issue) -> FixOutcome {
        let hex_re = Regex::new(r"#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b").expect("valid regex");

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for page in &artifact.pages {
            for caps in hex_re.captures_iter(&page.stylesheet) {
                *counts.entry(expand_hex(&caps[1])).or_default() += 1;
            }
        }
        if counts.len() <= PALETTE_KEEP {
            return FixOutcome::skipped("palette is already within the limit");
        }

        // Most used first; BTreeMap iteration makes the tiebreak lexicographic.
        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let (kept, dropped) = ranked.split_at(PALETTE_KEEP);

        let mut replacements: BTreeMap<String, String> = BTreeMap::new();
        for (color, _) in dropped {
            let lum = luminance(color);
            let nearest = kept
                .iter()
                .min_by(|(a, _), (b, _)| {
                    (luminance(a) - lum)
                        .abs()
                        .partial_cmp(&(luminance(b) - lum).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(c, _)| c.clone())
                .unwrap_or_else(|| color.clone());
            replacements.insert(color.clone(), nearest);
        }

        let remapped = replacements.len();
        for page in &mut artifact.pages {
            let stylesheet = page.stylesheet.clone();
            page.stylesheet = hex_re
                .replace_all(&stylesheet, |caps: &regex::Captures| {
                    let color = expand_hex(&caps[1]);
                    match replacements.get(&color) {
                        Some(kept_color) => format!("#{kept_color}"),
                        None => caps[0].to_string(),
                    }
                })
                .into_owned();
        }

        info!(remapped, kept = PALETTE_KEEP, "Consolidated stylesheet palette");
        FixOutcome::applied(format!("remapped {remapped} stray color(s) into the core palette"))
    }
}

fn expand_hex(hex: &str) -> String {
    let hex = hex.to_lowercase();
    if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex
    }
}

fn luminance(hex: &str) -> f32 {
    let channel =
        |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0) as f32 / 255.0;
    0.2126 * channel(0) + 0.7152 * channel(2) + 0.0722 * channel(4)
}
