use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artifact::{AssetRef, WebsiteArtifact};
use crate::error::SiteGradeError;

/// Immutable rendered view of one page. What evaluators actually read.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageSnapshot {
    pub slug: String,
    pub title: String,
    pub markup: String,
    pub stylesheet: String,
    pub meta_description: Option<String>,
    pub assets: Vec<AssetRef>,
    /// Markup reduced to plain text for copy heuristics.
    pub text: String,
}

impl PageSnapshot {
    pub fn is_home(&self) -> bool {
        self.slug == "index" || self.slug == "home"
    }

    /// Whitespace-separated word count of the rendered text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Immutable snapshot of a whole artifact, taken between iterations so
/// evaluators always see a consistent frozen view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactSnapshot {
    pub artifact_id: Uuid,
    pub revision: u32,
    pub business_name: String,
    pub industry: String,
    pub tagline: Option<String>,
    pub pages: Vec<PageSnapshot>,
}

impl ArtifactSnapshot {
    pub fn home_page(&self) -> Option<&PageSnapshot> {
        self.pages.iter().find(|p| p.is_home())
    }
}

/// Outbound seam to the rendering layer: turn the mutable artifact into the
/// frozen view evaluators score. The engine does not know how markup, CSS,
/// or assets are structured beyond what this produces.
pub trait Renderer: Send + Sync {
    fn render(&self, artifact: &WebsiteArtifact) -> Result<ArtifactSnapshot, SiteGradeError>;
}

/// In-repo renderer: clones page fields and reduces markup to plain text.
pub struct StaticRenderer;

impl Renderer for StaticRenderer {
    fn render(&self, artifact: &WebsiteArtifact) -> Result<ArtifactSnapshot, SiteGradeError> {
        let pages = artifact
            .pages
            .iter()
            .map(|p| PageSnapshot {
                slug: p.slug.clone(),
                title: p.title.clone(),
                markup: p.markup.clone(),
                stylesheet: p.stylesheet.clone(),
                meta_description: p.meta_description.clone(),
                assets: p.assets.clone(),
                text: html_to_plain_text(&p.markup),
            })
            .collect();

        Ok(ArtifactSnapshot {
            artifact_id: artifact.id,
            revision: artifact.revision,
            business_name: artifact.business.name.clone(),
            industry: artifact.business.industry.clone(),
            tagline: artifact.business.tagline.clone(),
            pages,
        })
    }
}

pub fn html_to_plain_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 80).unwrap_or_default()
}
