//! Fixers that repair page markup in place: navigation, heading hierarchy,
//! and the call-to-action block.

use regex::Regex;
use tracing::info;

use sitegrade_common::{Issue, IssueKind, WebsiteArtifact};

use super::{FixOutcome, Fixer};

/// Prepends a site-wide navigation element to every page that lacks one.
pub struct NavigationFixer;

impl Fixer for NavigationFixer {
    fn handles(&self) -> IssueKind {
        IssueKind::BrokenNavigation
    }

    fn apply(&self, artifact: &mut WebsiteArtifact, _issue: &Issue) -> FixOutcome {
        let links: Vec<String> = artifact
            .pages
            .iter()
            .map(|p| {
                let href = if p.is_home() {
                    "/".to_string()
                } else {
                    format!("/{}", p.slug)
                };
                format!("<a href=\"{href}\">{}</a>", p.title)
            })
            .collect();
        let nav = format!("<nav>{}</nav>\n", links.join(" "));

        let mut patched = 0usize;
        for page in &mut artifact.pages {
            if !page.markup.to_lowercase().contains("<nav") {
                page.markup = format!("{nav}{}", page.markup);
                patched += 1;
            }
        }

        if patched == 0 {
            FixOutcome::skipped("every page already has navigation")
        } else {
            info!(patched, "Added navigation to pages");
            FixOutcome::applied(format!("added navigation to {patched} page(s)"))
        }
    }
}

/// Ensures each page has exactly one top-level heading: inserts an `<h1>`
/// from the page title when none exists, demotes extras to `<h2>`. A page
/// whose outline merely skips levels needs editorial restructuring, which is
/// beyond a mechanical fix.
pub struct HeadingFixer;

impl Fixer for HeadingFixer {
    fn handles(&self) -> IssueKind {
        IssueKind::MissingHeadingHierarchy
    }

    fn apply(&self, artifact: &mut WebsiteArtifact, issue: &Issue) -> FixOutcome {
        let h1_open_re = Regex::new(r"(?i)<h1[^>]*>").expect("valid regex");
        let h1_close_re = Regex::new(r"(?i)</h1>").expect("valid regex");

        let mut patched = 0usize;
        for page in &mut artifact.pages {
            let h1_count = h1_open_re.find_iter(&page.markup).count();
            match h1_count {
                0 => {
                    page.markup = format!("<h1>{}</h1>\n{}", page.title, page.markup);
                    patched += 1;
                }
                1 => {}
                _ => {
                    // Keep the first h1, demote the rest.
                    let mut seen = 0usize;
                    page.markup = h1_open_re
                        .replace_all(&page.markup, |_: &regex::Captures| {
                            seen += 1;
                            if seen == 1 { "<h1>" } else { "<h2>" }
                        })
                        .into_owned();
                    let mut closed = 0usize;
                    page.markup = h1_close_re
                        .replace_all(&page.markup, |_: &regex::Captures| {
                            closed += 1;
                            if closed == 1 { "</h1>" } else { "</h2>" }
                        })
                        .into_owned();
                    patched += 1;
                }
            }
        }

        if patched == 0 {
            FixOutcome::skipped(format!(
                "heading counts are already correct; '{}' needs editorial restructuring",
                issue.description
            ))
        } else {
            info!(patched, "Repaired top-level headings");
            FixOutcome::applied(format!("repaired top-level headings on {patched} page(s)"))
        }
    }
}

/// Appends a call-to-action block to the home page.
pub struct CallToActionFixer;

impl Fixer for CallToActionFixer {
    fn handles(&self) -> IssueKind {
        IssueKind::MissingCallToAction
    }

    fn apply(&self, artifact: &mut WebsiteArtifact, _issue: &Issue) -> FixOutcome {
        let cta_re = Regex::new(
            "(?i)(get started|book now|order now|contact us|sign up|request a quote)",
        )
        .expect("valid regex");

        let has_contact_page = artifact.pages.iter().any(|p| p.slug == "contact");
        let Some(home) = artifact.pages.iter_mut().find(|p| p.is_home()) else {
            return FixOutcome::skipped("no home page to carry a call to action");
        };
        if cta_re.is_match(&home.markup) || home.markup.contains("class=\"cta\"") {
            return FixOutcome::skipped("home page already has a call to action");
        }

        let href = if has_contact_page { "/contact" } else { "/" };
        home.markup.push_str(&format!(
            "\n<p><a class=\"cta\" href=\"{href}\">Contact us to get started</a></p>"
        ));
        info!(page = home.slug.as_str(), "Added call to action");
        FixOutcome::applied("added a call to action to the home page")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegrade_common::testing::template_fresh_site;
    use sitegrade_common::{Category, EvaluatorId, Severity};

    fn issue(kind: IssueKind) -> Issue {
        Issue::new(
            kind,
            Category::Structure,
            Severity::High,
            "test",
            None,
            EvaluatorId::Structure,
        )
    }

    #[test]
    fn navigation_fixer_patches_every_bare_page() {
        let mut artifact = template_fresh_site();
        let outcome = NavigationFixer.apply(&mut artifact, &issue(IssueKind::BrokenNavigation));
        assert!(outcome.applied);
        assert!(artifact.pages.iter().all(|p| p.markup.contains("<nav>")));
    }

    #[test]
    fn navigation_fixer_is_idempotent() {
        let mut artifact = template_fresh_site();
        assert!(NavigationFixer
            .apply(&mut artifact, &issue(IssueKind::BrokenNavigation))
            .applied);
        let after_first = artifact.clone();
        assert!(!NavigationFixer
            .apply(&mut artifact, &issue(IssueKind::BrokenNavigation))
            .applied);
        assert_eq!(artifact, after_first);
    }

    #[test]
    fn heading_fixer_inserts_h1_from_the_page_title() {
        let mut artifact = template_fresh_site();
        let outcome =
            HeadingFixer.apply(&mut artifact, &issue(IssueKind::MissingHeadingHierarchy));
        assert!(outcome.applied);
        for page in &artifact.pages {
            assert!(page.markup.contains("<h1>"), "page '{}'", page.slug);
        }
    }

    #[test]
    fn heading_fixer_demotes_extra_h1s() {
        let mut artifact = template_fresh_site();
        artifact.pages[0].markup =
            "<h1>First</h1><h1>Second</h1><p>body</p>".to_string();
        let outcome =
            HeadingFixer.apply(&mut artifact, &issue(IssueKind::MissingHeadingHierarchy));
        assert!(outcome.applied);
        let markup = &artifact.pages[0].markup;
        assert_eq!(markup.matches("<h1>").count(), 1);
        assert!(markup.contains("<h2>Second</h2>"));
    }

    #[test]
    fn heading_fixer_declines_outline_restructuring() {
        let mut artifact = template_fresh_site();
        for page in &mut artifact.pages {
            // One h1, but the outline skips to h4 — not mechanically fixable.
            page.markup = "<h1>Title</h1><h4>Deep</h4>".to_string();
        }
        let before = artifact.clone();
        let outcome =
            HeadingFixer.apply(&mut artifact, &issue(IssueKind::MissingHeadingHierarchy));
        assert!(!outcome.applied);
        assert_eq!(artifact, before);
    }

    #[test]
    fn cta_fixer_points_at_the_contact_page_when_one_exists() {
        let mut artifact = template_fresh_site();
        let outcome = CallToActionFixer.apply(&mut artifact, &issue(IssueKind::MissingCallToAction));
        assert!(outcome.applied);
        let home = artifact.home_page().unwrap();
        assert!(home.markup.contains("class=\"cta\""));
    }

    #[test]
    fn cta_fixer_is_idempotent() {
        let mut artifact = template_fresh_site();
        assert!(CallToActionFixer
            .apply(&mut artifact, &issue(IssueKind::MissingCallToAction))
            .applied);
        let after_first = artifact.clone();
        assert!(!CallToActionFixer
            .apply(&mut artifact, &issue(IssueKind::MissingCallToAction))
            .applied);
        assert_eq!(artifact, after_first);
    }
}
