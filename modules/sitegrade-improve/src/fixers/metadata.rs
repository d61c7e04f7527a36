//! Fixers for page metadata: meta descriptions, duplicate titles, and image
//! alt text.

use regex::Regex;
use tracing::info;

use sitegrade_common::{AssetKind, Issue, IssueKind, WebsiteArtifact};

use super::{FixOutcome, Fixer};

const META_DESCRIPTION_MIN: usize = 50;
const META_DESCRIPTION_MAX: usize = 160;

/// Writes a meta description for every page that has none, composed from the
/// business profile.
pub struct MetaDescriptionFixer;

impl MetaDescriptionFixer {
    fn compose(artifact: &WebsiteArtifact, page_title: &str) -> String {
        let business = &artifact.business;
        let mut description = match &business.tagline {
            Some(tagline) => format!("{} — {tagline}.", business.name),
            None => format!("{}, your local {}.", business.name, business.industry),
        };
        description.push_str(&format!(" {page_title}."));
        if description.chars().count() < META_DESCRIPTION_MIN {
            description.push_str(" Get in touch today and see what we can do for you.");
        }
        if description.chars().count() > META_DESCRIPTION_MAX {
            description = description
                .chars()
                .take(META_DESCRIPTION_MAX - 1)
                .collect::<String>()
                .trim_end()
                .to_string()
                + "…";
        }
        description
    }
}

impl Fixer for MetaDescriptionFixer {
    fn handles(&self) -> IssueKind {
        IssueKind::MissingMetaDescription
    }

    fn apply(&self, artifact: &mut WebsiteArtifact, _issue: &Issue) -> FixOutcome {
        let missing: Vec<(String, String)> = artifact
            .pages
            .iter()
            .filter(|p| p.meta_description.is_none())
            .map(|p| (p.slug.clone(), Self::compose(artifact, &p.title)))
            .collect();
        if missing.is_empty() {
            return FixOutcome::skipped("every page already has a meta description");
        }

        let patched = missing.len();
        for (slug, description) in missing {
            if let Some(page) = artifact.page_mut(&slug) {
                page.meta_description = Some(description);
            }
        }
        info!(patched, "Wrote meta descriptions");
        FixOutcome::applied(format!("wrote meta descriptions for {patched} page(s)"))
    }
}

/// Disambiguates duplicate page titles by appending the page slug.
pub struct DuplicateTitlesFixer;

impl Fixer for DuplicateTitlesFixer {
    fn handles(&self) -> IssueKind {
        IssueKind::DuplicateTitles
    }

    fn apply(&self, artifact: &mut WebsiteArtifact, _issue: &Issue) -> FixOutcome {
        let mut patched = 0usize;
        // First occurrence keeps the title; later duplicates get the slug.
        let mut seen: Vec<String> = Vec::new();
        for page in &mut artifact.pages {
            let key = page.title.trim().to_lowercase();
            if seen.contains(&key) {
                page.title = format!("{} — {}", page.title.trim(), page.slug);
                patched += 1;
            } else {
                seen.push(key);
            }
        }

        if patched == 0 {
            FixOutcome::skipped("page titles are already unique")
        } else {
            info!(patched, "Disambiguated duplicate titles");
            FixOutcome::applied(format!("retitled {patched} page(s)"))
        }
    }
}

/// Fills missing image alt text from the business name and the asset's file
/// stem, in both the asset manifest and the page markup.
pub struct AltTextFixer;

impl AltTextFixer {
    fn alt_for(business_name: &str, url: &str) -> String {
        let stem = url
            .rsplit('/')
            .next()
            .unwrap_or(url)
            .split('.')
            .next()
            .unwrap_or(url)
            .replace(['-', '_'], " ");
        format!("{business_name} — {stem}")
    }
}

impl Fixer for AltTextFixer {
    fn handles(&self) -> IssueKind {
        IssueKind::MissingAltText
    }

    fn apply(&self, artifact: &mut WebsiteArtifact, _issue: &Issue) -> FixOutcome {
        let img_re = Regex::new(r#"<img\s+([^>]*?)/?>"#).expect("valid regex");
        let business_name = artifact.business.name.clone();

        let mut patched = 0usize;
        for page in &mut artifact.pages {
            for asset in &mut page.assets {
                if asset.kind == AssetKind::Image && asset.alt_text.is_none() {
                    asset.alt_text = Some(Self::alt_for(&business_name, &asset.url));
                    patched += 1;
                }
            }

            // Mirror the alt text into markup so the rendered page matches
            // the manifest.
            let markup = page.markup.clone();
            let rewritten = img_re
                .replace_all(&markup, |caps: &regex::Captures| {
                    let attrs = &caps[1];
                    if attrs.contains("alt=") {
                        caps[0].to_string()
                    } else {
                        let src = Regex::new(r#"src\s*=\s*["']([^"']+)["']"#)
                            .expect("valid regex")
                            .captures(attrs)
                            .map(|c| c[1].to_string())
                            .unwrap_or_default();
                        format!(
                            r#"<img {attrs} alt="{}">"#,
                            Self::alt_for(&business_name, &src)
                        )
                    }
                })
                .into_owned();
            if rewritten != page.markup {
                page.markup = rewritten;
                patched += 1;
            }
        }

        if patched == 0 {
            FixOutcome::skipped("every image already has alt text")
        } else {
            info!(patched, "Filled image alt text");
            FixOutcome::applied(format!("filled alt text on {patched} image(s)"))
        }
    }
}
