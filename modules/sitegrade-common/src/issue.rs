use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// --- Categories ---

/// The six quality categories every assessment is scored against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Visual,
    Structure,
    Content,
    Persuasion,
    Discoverability,
    Distinctiveness,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Visual,
        Category::Structure,
        Category::Content,
        Category::Persuasion,
        Category::Discoverability,
        Category::Distinctiveness,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visual => write!(f, "visual"),
            Self::Structure => write!(f, "structure"),
            Self::Content => write!(f, "content"),
            Self::Persuasion => write!(f, "persuasion"),
            Self::Discoverability => write!(f, "discoverability"),
            Self::Distinctiveness => write!(f, "distinctiveness"),
        }
    }
}

// --- Severity ---

/// Ordered ascending so `Ord` ranks Critical highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

// --- Evaluators ---

/// Identity of a rubric evaluator. Closed set: consensus weighting and the
/// reporting surface both enumerate over it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorId {
    Structure,
    Visual,
    Persuasion,
    Discoverability,
    Distinctiveness,
}

impl fmt::Display for EvaluatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(f, "structure"),
            Self::Visual => write!(f, "visual"),
            Self::Persuasion => write!(f, "persuasion"),
            Self::Discoverability => write!(f, "discoverability"),
            Self::Distinctiveness => write!(f, "distinctiveness"),
        }
    }
}

// --- Issue kinds ---

/// Concrete defect kinds. The fixer registry keys on this enum; a kind with
/// no registered fixer is how a session reaches `FixerExhausted`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    // Structure
    MissingHeadingHierarchy,
    BrokenNavigation,
    MissingAltText,
    OrphanPage,
    MessySlug,
    // Content
    ThinContent,
    MissingPageTitle,
    WeakValueProposition,
    // Persuasion
    MissingCallToAction,
    MissingContactInfo,
    MissingSocialProof,
    // Discoverability
    MissingMetaDescription,
    MetaDescriptionLength,
    DuplicateTitles,
    LowKeywordPresence,
    // Visual
    PaletteSprawl,
    FontSprawl,
    LowContrast,
    DefaultTypography,
    // Distinctiveness
    GenericCopy,
    WeakBrandPresence,
    StockImagery,
    DuplicatedCopy,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The serde wire form is the canonical name.
        let s = serde_json::to_string(self).unwrap_or_default();
        write!(f, "{}", s.trim_matches('"'))
    }
}

// --- Issues ---

/// A quality defect found by one rubric evaluator.
///
/// Immutable once produced, except for dedup which merges equivalent issues
/// from different evaluators (category must match, descriptions must be
/// near-identical) keeping the higher severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
    pub id: Uuid,
    pub kind: IssueKind,
    pub category: Category,
    pub severity: Severity,
    pub description: String,
    /// Page slug or element hint the fixer should look at.
    pub location_hint: Option<String>,
    pub source_evaluator: EvaluatorId,
}

impl Issue {
    pub fn new(
        kind: IssueKind,
        category: Category,
        severity: Severity,
        description: impl Into<String>,
        location_hint: Option<String>,
        source_evaluator: EvaluatorId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            category,
            severity,
            description: description.into(),
            location_hint,
            source_evaluator,
        }
    }
}
