//! Error types for studytrack-core.
//!
//! The engines never fail; these only come from explicit validation.

use thiserror::Error;

/// Problems found by [`crate::GradingScheme::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemeError {
    /// Scheme has no categories at all
    #[error("grading scheme has no categories")]
    Empty,

    /// Category name is blank
    #[error("category #{0} has an empty name")]
    EmptyName(usize),

    /// Two categories share a name (case-insensitive)
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),

    /// Weight below zero
    #[error("category {name} has negative weight {weight}")]
    NegativeWeight { name: String, weight: f64 },

    /// Drop-lowest exceeds the expected number of items
    #[error("category {name} drops {drop_lowest} of {count} expected items")]
    DropExceedsCount {
        name: String,
        drop_lowest: u32,
        count: u32,
    },

    /// Percentage-mode weights must add up to 100
    #[error("percentage weights sum to {0}, expected 100")]
    WeightSum(f64),
}
