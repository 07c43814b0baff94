//! Grading scheme: how a class's final percentage is composed.

use serde::{Deserialize, Serialize};

use crate::error::SchemeError;

/// How category weights are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingMode {
    /// Weights are percentage shares that should sum to 100.
    #[default]
    Percentage,
    /// Weights are point allocations.
    Points,
}

impl GradingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradingMode::Percentage => "percentage",
            GradingMode::Points => "points",
        }
    }
}

/// One weighted category (Homework, Quiz, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingCategory {
    pub name: String,
    /// Percentage share (or points, in points mode).
    pub weight: f64,
    /// Items expected over the term.
    pub count: u32,
    /// Lowest-scoring items excluded from the category average.
    #[serde(default)]
    pub drop_lowest: u32,
}

impl GradingCategory {
    pub fn new(name: impl Into<String>, weight: f64, count: u32, drop_lowest: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            count,
            drop_lowest,
        }
    }
}

/// Ordered set of categories plus the weighting mode.
///
/// Order matters: category lookups return the first containment match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradingScheme {
    #[serde(default)]
    pub mode: GradingMode,
    pub categories: Vec<GradingCategory>,
}

impl GradingScheme {
    pub fn new(mode: GradingMode, categories: Vec<GradingCategory>) -> Self {
        Self { mode, categories }
    }

    pub fn percentage(categories: Vec<GradingCategory>) -> Self {
        Self::new(GradingMode::Percentage, categories)
    }

    pub fn points(categories: Vec<GradingCategory>) -> Self {
        Self::new(GradingMode::Points, categories)
    }

    /// Starter scheme for new classes.
    pub fn suggested() -> Self {
        Self::percentage(crate::categorize::suggested_grading_categories())
    }

    /// Category with exactly this name.
    pub fn category(&self, name: &str) -> Option<&GradingCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.categories.iter().map(|c| c.weight).sum()
    }

    /// Advisory checks; the calculator accepts any scheme.
    pub fn validate(&self) -> Result<(), SchemeError> {
        if self.categories.is_empty() {
            return Err(SchemeError::Empty);
        }

        let mut seen: Vec<String> = Vec::new();
        for (i, c) in self.categories.iter().enumerate() {
            let name = c.name.trim();
            if name.is_empty() {
                return Err(SchemeError::EmptyName(i));
            }

            let key = name.to_lowercase();
            if seen.contains(&key) {
                return Err(SchemeError::DuplicateCategory(name.to_string()));
            }
            seen.push(key);

            if c.weight < 0.0 {
                return Err(SchemeError::NegativeWeight {
                    name: name.to_string(),
                    weight: c.weight,
                });
            }
            if c.drop_lowest > c.count {
                return Err(SchemeError::DropExceedsCount {
                    name: name.to_string(),
                    drop_lowest: c.drop_lowest,
                    count: c.count,
                });
            }
        }

        if self.mode == GradingMode::Percentage {
            let sum = self.total_weight();
            if (sum - 100.0).abs() > 0.01 {
                return Err(SchemeError::WeightSum(sum));
            }
        }

        Ok(())
    }
}
