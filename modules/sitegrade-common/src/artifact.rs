use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Asset Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Image,
    Font,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetOrigin {
    /// Produced for this client by the generation pipeline.
    Generated,
    /// Shipped with the page template (stock photography, placeholder art).
    StockTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetRef {
    pub url: String,
    pub kind: AssetKind,
    pub alt_text: Option<String>,
    pub origin: AssetOrigin,
}

// --- Business input ---

/// The structured business input the generator worked from. Carried on the
/// artifact because fixers need it as upstream data: a fixer whose field is
/// absent here reports `applied = false` rather than inventing content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BusinessProfile {
    pub name: String,
    pub industry: String,
    pub tagline: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub testimonials: Vec<String>,
}

impl BusinessProfile {
    /// True when at least one contact channel is known.
    pub fn has_contact_info(&self) -> bool {
        self.phone.is_some() || self.email.is_some() || self.address.is_some()
    }
}

// --- Pages ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Page {
    pub slug: String,
    pub title: String,
    /// Body markup (HTML fragment, no <html>/<head> wrapper).
    pub markup: String,
    pub stylesheet: String,
    pub meta_description: Option<String>,
    pub assets: Vec<AssetRef>,
}

impl Page {
    /// The home page is the entry point for first-impression heuristics.
    pub fn is_home(&self) -> bool {
        self.slug == "index" || self.slug == "home"
    }
}

// --- Artifact ---

/// The mutable subject under test: the generated website for one client.
///
/// Owned exclusively by the improvement orchestrator for the duration of a
/// session. Mutated only through fixers; evaluators see an immutable
/// `ArtifactSnapshot` rendered from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WebsiteArtifact {
    pub id: Uuid,
    pub business: BusinessProfile,
    pub pages: Vec<Page>,
    pub generated_at: DateTime<Utc>,
    /// Bumped by every applied fix so log lines and reports can tell
    /// snapshots apart.
    pub revision: u32,
}

impl WebsiteArtifact {
    pub fn new(business: BusinessProfile, pages: Vec<Page>) -> Self {
        Self {
            id: Uuid::new_v4(),
            business,
            pages,
            generated_at: Utc::now(),
            revision: 0,
        }
    }

    pub fn home_page(&self) -> Option<&Page> {
        self.pages.iter().find(|p| p.is_home())
    }

    pub fn page_mut(&mut self, slug: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.slug == slug)
    }
}
