//! Assignment model consumed by the grade and priority engines.
//!
//! Records come from the backing store as snapshots; nothing here mutates them.

use serde::{Deserialize, Serialize};

/// A single gradeable item in a class.
///
/// Field names follow the store's camelCase JSON so snapshots deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,

    /// Free-text or canonical type label ("Homework", "hw", "Quiz 2").
    #[serde(rename = "type")]
    pub kind: String,

    /// Earned points. `None` means ungraded.
    #[serde(default)]
    pub grade: Option<f64>,

    /// Points possible. When absent, `grade` is already a percentage.
    #[serde(default)]
    pub max_points: Option<f64>,

    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub due_date: String,

    /// `HH:MM`, 24h.
    #[serde(default)]
    pub due_time: String,

    #[serde(default)]
    pub completed: bool,

    /// Importance override, separate from the grading scheme weight.
    #[serde(default)]
    pub weight: Option<f64>,
}

impl Assignment {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            class_id: None,
            kind: kind.into(),
            grade: None,
            max_points: None,
            due_date: String::new(),
            due_time: String::new(),
            completed: false,
            weight: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_grade(mut self, grade: f64, max_points: f64) -> Self {
        self.grade = Some(grade);
        self.max_points = Some(max_points);
        self
    }

    /// Grade recorded directly as a percentage (no points possible).
    pub fn with_percentage(mut self, pct: f64) -> Self {
        self.grade = Some(pct);
        self.max_points = None;
        self
    }

    pub fn with_due(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.due_date = date.into();
        self.due_time = time.into();
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Score as a percentage of points possible, if graded.
    ///
    /// `max_points == 0` yields inf/NaN; callers treat non-finite values as "no grade yet".
    pub fn percentage(&self) -> Option<f64> {
        let grade = self.grade?;
        Some(match self.max_points {
            Some(max) => grade / max * 100.0,
            None => grade,
        })
    }

    /// Only completed, graded work counts toward a class grade.
    pub fn counts_toward_grade(&self) -> bool {
        self.completed && self.grade.is_some()
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_from_points() {
        let a = Assignment::new("a1", "Homework").with_grade(45.0, 50.0);
        assert_eq!(a.percentage(), Some(90.0));
    }

    #[test]
    fn test_percentage_without_max_points() {
        let a = Assignment::new("a1", "Quiz").with_percentage(82.5);
        assert_eq!(a.percentage(), Some(82.5));
        assert_eq!(Assignment::new("a2", "Quiz").percentage(), None);
    }

    #[test]
    fn test_counts_toward_grade_requires_both() {
        let graded_open = Assignment::new("a1", "Homework").with_grade(9.0, 10.0);
        assert!(!graded_open.counts_toward_grade());

        let done_ungraded = Assignment::new("a2", "Homework").completed();
        assert!(!done_ungraded.counts_toward_grade());

        let done_graded = Assignment::new("a3", "Homework").with_grade(9.0, 10.0).completed();
        assert!(done_graded.counts_toward_grade());
    }

    #[test]
    fn test_deserialize_store_snapshot() {
        let json = r#"{
            "id": "k17",
            "type": "hw",
            "grade": 18,
            "maxPoints": 20,
            "dueDate": "2026-03-02",
            "dueTime": "23:59",
            "completed": true
        }"#;
        let a: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(a.kind, "hw");
        assert_eq!(a.max_points, Some(20.0));
        assert_eq!(a.weight, None);
        assert!(a.counts_toward_grade());
    }
}
