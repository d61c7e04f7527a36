//! Shared stylesheet heuristics used by the visual rubric and the
//! perception scorer. Simple regex-based extraction — avoids pulling in a
//! full CSS parser for what are coarse signals.

use std::collections::BTreeSet;

use regex::Regex;

/// Distinct hex colors declared in a stylesheet, lowercased, 3-digit forms
/// expanded so `#fff` and `#ffffff` count once.
pub(crate) fn extract_colors(css: &str) -> BTreeSet<String> {
    let re = Regex::new(r"#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b").expect("valid regex");
    re.captures_iter(css)
        .map(|c| expand_hex(&c[1]))
        .collect()
}

/// Distinct first font families named in `font-family:` declarations.
pub(crate) fn extract_font_families(css: &str) -> BTreeSet<String> {
    let re = Regex::new(r"(?i)font-family\s*:\s*([^;}]+)").expect("valid regex");
    re.captures_iter(css)
        .filter_map(|c| {
            c[1].split(',')
                .next()
                .map(|f| f.trim().trim_matches(|c| c == '\'' || c == '"').to_lowercase())
        })
        .filter(|f| !f.is_empty())
        .collect()
}

/// Relative luminance of a hex color, 0.0 (black) to 1.0 (white).
pub(crate) fn luminance(hex: &str) -> f32 {
    let hex = expand_hex(hex.trim_start_matches('#'));
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0) as f32 / 255.0
    };
    0.2126 * channel(0) + 0.7152 * channel(2) + 0.0722 * channel(4)
}

fn expand_hex(hex: &str) -> String {
    let hex = hex.to_lowercase();
    if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex
    }
}

/// Jaccard similarity of two sets; 1.0 when both are empty (nothing to
/// disagree about).
pub(crate) fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count() as f32;
    let union = a.union(b).count() as f32;
    intersection / union
}
