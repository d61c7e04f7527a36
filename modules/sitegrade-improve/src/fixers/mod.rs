//! Repair actions keyed by issue kind.
//!
//! Every fixer is idempotent: applying it to an already-fixed artifact is a
//! no-op reported as `applied = false`. A fixer that lacks the upstream data
//! it needs (no testimonials, no contact channels) likewise returns the
//! artifact unchanged — it never errors for a merely unfixable case.

pub mod conversion;
pub mod markup;
pub mod metadata;
pub mod palette;

use std::collections::BTreeMap;

use sitegrade_common::{Issue, IssueKind, WebsiteArtifact};

pub use conversion::{ContactBlockFixer, SocialProofFixer};
pub use markup::{CallToActionFixer, HeadingFixer, NavigationFixer};
pub use metadata::{AltTextFixer, DuplicateTitlesFixer, MetaDescriptionFixer};
pub use palette::PaletteFixer;

/// Result of one fix attempt.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub applied: bool,
    pub note: String,
}

impl FixOutcome {
    pub fn applied(note: impl Into<String>) -> Self {
        Self {
            applied: true,
            note: note.into(),
        }
    }

    pub fn skipped(note: impl Into<String>) -> Self {
        Self {
            applied: false,
            note: note.into(),
        }
    }
}

/// One repair action for exactly one issue kind.
pub trait Fixer: Send + Sync {
    fn handles(&self) -> IssueKind;

    /// Mutate the artifact to resolve the issue. Must be idempotent, and
    /// must only panic for programming errors, never for unfixable input.
    fn apply(&self, artifact: &mut WebsiteArtifact, issue: &Issue) -> FixOutcome;
}

/// Maps issue kinds to their repair actions. Kinds with no entry (generic
/// copy, stock imagery, and everything else that needs the out-of-scope
/// rewrite services) are how a session reaches `FixerExhausted`.
pub struct FixerRegistry {
    fixers: BTreeMap<IssueKind, Box<dyn Fixer>>,
}

impl FixerRegistry {
    pub fn empty() -> Self {
        Self {
            fixers: BTreeMap::new(),
        }
    }

    /// The production fixer set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(ContactBlockFixer));
        registry.register(Box::new(SocialProofFixer));
        registry.register(Box::new(CallToActionFixer));
        registry.register(Box::new(NavigationFixer));
        registry.register(Box::new(HeadingFixer));
        registry.register(Box::new(MetaDescriptionFixer));
        registry.register(Box::new(DuplicateTitlesFixer));
        registry.register(Box::new(AltTextFixer));
        registry.register(Box::new(PaletteFixer));
        registry
    }

    /// Register a fixer under the kind it handles. Later registrations for
    /// the same kind replace earlier ones.
    pub fn register(&mut self, fixer: Box<dyn Fixer>) {
        self.fixers.insert(fixer.handles(), fixer);
    }

    pub fn get(&self, kind: IssueKind) -> Option<&dyn Fixer> {
        self.fixers.get(&kind).map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.fixers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixers.is_empty()
    }
}
