pub mod assess;
pub mod consensus;
pub mod evaluators;
pub mod perception;
pub mod prioritize;
mod style;
pub mod verdict;

pub use assess::AssessmentEngine;
pub use evaluators::{default_evaluators, RubricEvaluator};
