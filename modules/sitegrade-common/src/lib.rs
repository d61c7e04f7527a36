pub mod artifact;
pub mod config;
pub mod error;
pub mod issue;
pub mod scores;
pub mod snapshot;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use artifact::*;
pub use config::{AssessmentConfig, SessionConfig};
pub use error::SiteGradeError;
pub use issue::*;
pub use scores::*;
pub use snapshot::{ArtifactSnapshot, PageSnapshot, Renderer, StaticRenderer};
