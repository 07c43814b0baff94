//! studytrack-core: grade calculation, assignment categorization and prioritization.
//!
//! Pure, synchronous functions over snapshots supplied by the backing store.

pub mod assignment;
pub mod categorize;
pub mod error;
pub mod grade;
pub mod priority;
pub mod reminders;
pub mod scheme;
pub mod settings;
pub mod time;

pub use assignment::Assignment;
pub use categorize::{
    CATEGORY_MAPPINGS, CategoryMapping, best_mapping, categorize_assignment_type,
    find_matching_grading_category, suggested_grading_categories,
};
pub use error::SchemeError;
pub use grade::{
    CategoryResult, ClassReport, LetterGrade, calculate_class_grade, calculate_gpa,
    category_breakdown, class_report, gpa_points, graded_assignments, letter_grade,
    predict_final_grade,
};
pub use priority::{
    PriorityFactors, PriorityLabel, PriorityScore, prioritize_assignments, prioritize_refs,
    priority_color, priority_label, priority_scores, score_assignment,
};
pub use reminders::{
    ReminderIntent, ReminderPolicy, project_assignment_reminders, project_reminders,
};
pub use scheme::{GradingCategory, GradingMode, GradingScheme};
pub use settings::Settings;
pub use time::{hours_until, parse_due_local};

/// Canonicalize each assignment's type against a scheme's category names so the
/// calculator's exact-name grouping lines up.
pub fn align_to_scheme(assignments: &[Assignment], scheme: &GradingScheme) -> Vec<Assignment> {
    let names = scheme.category_names();
    assignments
        .iter()
        .map(|a| {
            let mut a = a.clone();
            a.kind = find_matching_grading_category(&a.kind, &names);
            a
        })
        .collect()
}
