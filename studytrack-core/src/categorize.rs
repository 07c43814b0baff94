//! Deterministic assignment-type canonicalization.
//!
//! Free-text labels ("hw 3", "Final Exam", "pop quiz") map onto a small set of
//! canonical types by keyword containment. When several rows match, the row with the
//! highest priority wins; equal priorities go to the earlier row.

use tracing::trace;

use crate::scheme::GradingCategory;

/// One canonical type and the labels that map onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMapping {
    pub standard_name: &'static str,
    /// Lowercase. Each row includes its own standard name so canonical labels are
    /// fixed points. No variation may contain another row's keyword ("final project"
    /// would pull a bare "project" into Final).
    pub variations: &'static [&'static str],
    pub priority: u8,
}

pub const CATEGORY_MAPPINGS: &[CategoryMapping] = &[
    CategoryMapping {
        standard_name: "Final",
        variations: &["final", "finals", "cumulative"],
        priority: 6,
    },
    CategoryMapping {
        standard_name: "Midterm",
        variations: &["midterm", "mid-term", "mid term"],
        priority: 5,
    },
    CategoryMapping {
        standard_name: "Test",
        variations: &["test", "exam", "examination", "assessment"],
        priority: 4,
    },
    CategoryMapping {
        standard_name: "Project",
        variations: &["project", "capstone", "presentation"],
        priority: 4,
    },
    CategoryMapping {
        standard_name: "Lab",
        variations: &["lab", "laboratory", "practical"],
        priority: 3,
    },
    CategoryMapping {
        standard_name: "Quiz",
        variations: &["quiz", "quizzes"],
        priority: 3,
    },
    CategoryMapping {
        standard_name: "Essay",
        variations: &["essay", "paper", "report", "composition"],
        priority: 3,
    },
    CategoryMapping {
        standard_name: "Homework",
        variations: &[
            "homework",
            "hw",
            "home work",
            "assignment",
            "problem set",
            "pset",
            "exercise",
        ],
        priority: 2,
    },
    CategoryMapping {
        standard_name: "Discussion",
        variations: &["discussion", "forum", "participation", "reflection"],
        priority: 2,
    },
    CategoryMapping {
        standard_name: "Worksheet",
        variations: &["worksheet", "handout", "classwork", "activity"],
        priority: 1,
    },
];

fn overlaps(a: &str, b: &str) -> bool {
    a == b || a.contains(b) || b.contains(a)
}

impl CategoryMapping {
    /// `normalized` must already be lowercased and trimmed.
    fn matches(&self, normalized: &str) -> bool {
        self.variations.iter().any(|v| overlaps(normalized, v))
    }
}

/// Highest-priority mapping row for `input`, if any.
pub fn best_mapping(input: &str) -> Option<&'static CategoryMapping> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let mut best: Option<&'static CategoryMapping> = None;
    for m in CATEGORY_MAPPINGS {
        if !m.matches(&normalized) {
            continue;
        }
        match best {
            Some(b) if b.priority >= m.priority => {}
            _ => best = Some(m),
        }
    }
    best
}

/// Canonical type for a free-text label, or the label unchanged when nothing matches.
pub fn categorize_assignment_type(input: &str) -> String {
    match best_mapping(input) {
        Some(m) => {
            trace!(input, canonical = m.standard_name, "categorized");
            m.standard_name.to_string()
        }
        None => input.to_string(),
    }
}

/// Grading category name an assignment type should be filed under.
///
/// Tries, in order: exact (case-insensitive) match on the canonical type, containment
/// with the canonical type, containment with the original label. Falls back to the
/// original label, which callers treat as uncategorized.
pub fn find_matching_grading_category<S: AsRef<str>>(
    assignment_type: &str,
    grading_categories: &[S],
) -> String {
    let canonical = categorize_assignment_type(assignment_type).to_lowercase();
    let original = assignment_type.trim().to_lowercase();
    let names: Vec<(&str, String)> = grading_categories
        .iter()
        .map(|c| (c.as_ref(), c.as_ref().trim().to_lowercase()))
        .collect();

    if let Some((name, _)) = names.iter().find(|(_, lower)| *lower == canonical) {
        return name.to_string();
    }
    let containing = |needle: &str| {
        names
            .iter()
            .find(|(_, lower)| !lower.is_empty() && overlaps(lower, needle))
            .map(|(name, _)| name.to_string())
    };
    if let Some(name) = containing(&canonical) {
        return name;
    }
    if !original.is_empty() {
        if let Some(name) = containing(&original) {
            return name;
        }
    }

    assignment_type.to_string()
}

/// Starter categories for a new class (sums to 100%).
pub fn suggested_grading_categories() -> Vec<GradingCategory> {
    vec![
        GradingCategory::new("Homework", 30.0, 10, 1),
        GradingCategory::new("Quiz", 20.0, 6, 1),
        GradingCategory::new("Test", 25.0, 3, 0),
        GradingCategory::new("Final", 25.0, 1, 0),
    ]
}
