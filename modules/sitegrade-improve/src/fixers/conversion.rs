//! Fixers that inject conversion content from the business profile: the
//! contact block and the testimonial section. Both depend on upstream data
//! the profile may not have, so both have a real `applied = false` path.

use regex::Regex;
use tracing::info;

use sitegrade_common::{Issue, IssueKind, WebsiteArtifact};

use super::{FixOutcome, Fixer};

const EMAIL_PATTERN: &str = r"[\w.+-]+@[\w-]+\.[\w.-]+";
const PHONE_PATTERN: &str = r"\(?\d{3}\)?[-. ]\d{3}[-. ]\d{4}";

fn site_text(artifact: &WebsiteArtifact) -> String {
    artifact
        .pages
        .iter()
        .map(|p| p.markup.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Adds a contact section to the home page from the profile's phone, email,
/// and address.
pub struct ContactBlockFixer;

impl Fixer for ContactBlockFixer {
    fn handles(&self) -> IssueKind {
        IssueKind::MissingContactInfo
    }

    fn apply(&self, artifact: &mut WebsiteArtifact, _issue: &Issue) -> FixOutcome {
        let email_re = Regex::new(EMAIL_PATTERN).expect("valid regex");
        let phone_re = Regex::new(PHONE_PATTERN).expect("valid regex");
        let text = site_text(artifact);
        if email_re.is_match(&text) || phone_re.is_match(&text) {
            return FixOutcome::skipped("contact details already present");
        }

        if !artifact.business.has_contact_info() {
            return FixOutcome::skipped("business profile has no contact channels to publish");
        }

        let mut lines = Vec::new();
        if let Some(phone) = &artifact.business.phone {
            lines.push(format!("<p>Call us at {phone}</p>"));
        }
        if let Some(email) = &artifact.business.email {
            lines.push(format!("<p>Email {email}</p>"));
        }
        if let Some(address) = &artifact.business.address {
            lines.push(format!("<p>Visit us at {address}</p>"));
        }
        let block = format!(
            "\n<section class=\"contact-block\">\n<h2>Get in touch</h2>\n{}\n</section>",
            lines.join("\n")
        );

        let Some(home) = artifact.pages.iter_mut().find(|p| p.is_home()) else {
            return FixOutcome::skipped("no home page to carry a contact block");
        };
        home.markup.push_str(&block);
        info!(page = home.slug.as_str(), "Added contact block");
        FixOutcome::applied("added contact block to the home page")
    }
}

/// Adds a testimonial section to the home page from the profile's collected
/// testimonials.
pub struct SocialProofFixer;

impl Fixer for SocialProofFixer {
    fn handles(&self) -> IssueKind {
        IssueKind::MissingSocialProof
    }

    fn apply(&self, artifact: &mut WebsiteArtifact, _issue: &Issue) -> FixOutcome {
        let proof_re =
            Regex::new("(?i)(testimonial|review|trusted by|rated|what clients say)")
                .expect("valid regex");
        if proof_re.is_match(&site_text(artifact)) {
            return FixOutcome::skipped("social proof already present");
        }

        if artifact.business.testimonials.is_empty() {
            return FixOutcome::skipped("no testimonials collected for this business");
        }

        let quotes: String = artifact
            .business
            .testimonials
            .iter()
            .map(|t| format!("<blockquote>\"{t}\"</blockquote>\n"))
            .collect();
        let block = format!(
            "\n<section class=\"testimonials\">\n<h2>What clients say</h2>\n{quotes}</section>"
        );

        let Some(home) = artifact.pages.iter_mut().find(|p| p.is_home()) else {
            return FixOutcome::skipped("no home page to carry testimonials");
        };
        home.markup.push_str(&block);
        info!(page = home.slug.as_str(), "Added testimonial section");
        FixOutcome::applied("added testimonial section to the home page")
    }
}
