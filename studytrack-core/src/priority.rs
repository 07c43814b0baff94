//! Assignment prioritization: a composite 0-100 score from urgency, importance,
//! impact and completion.
//!
//! Overdue work scores zero urgency and sinks below anything still due. That ordering is
//! deliberate and kept as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assignment::Assignment;
use crate::categorize::best_mapping;
use crate::settings::Settings;
use crate::time::{hours_until, parse_due_local};

pub const URGENCY_WEIGHT: f64 = 0.4;
pub const IMPORTANCE_WEIGHT: f64 = 0.3;
pub const IMPACT_WEIGHT: f64 = 0.2;
pub const COMPLETION_WEIGHT: f64 = 0.1;

/// Individual factors, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityFactors {
    pub urgency: f64,
    pub importance: f64,
    pub impact: f64,
    pub completion: f64,
}

impl PriorityFactors {
    pub fn composite(&self) -> f64 {
        URGENCY_WEIGHT * self.urgency
            + IMPORTANCE_WEIGHT * self.importance
            + IMPACT_WEIGHT * self.impact
            + COMPLETION_WEIGHT * self.completion
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScore {
    pub assignment_id: String,
    pub score: f64,
    pub factors: PriorityFactors,
}

/// Urgency tier from hours left. Unknown or past due is the lowest tier.
pub fn urgency_for_hours(hours: Option<f64>) -> f64 {
    match hours {
        Some(h) if h < 0.0 => 0.0,
        Some(h) if h < 24.0 => 100.0,
        Some(h) if h < 72.0 => 80.0,
        Some(h) if h < 168.0 => 60.0,
        Some(h) if h < 336.0 => 40.0,
        Some(h) if h.is_finite() => 20.0,
        _ => 0.0,
    }
}

fn urgency(a: &Assignment, tz: &str, now: DateTime<Utc>) -> f64 {
    let hours = parse_due_local(&a.due_date, &a.due_time, tz).map(|due| hours_until(due, now));
    urgency_for_hours(hours)
}

/// Base importance by canonical type; unknown types sit in the middle.
pub fn base_importance(kind: &str) -> f64 {
    match best_mapping(kind).map(|m| m.standard_name) {
        Some("Final") => 100.0,
        Some("Midterm") => 90.0,
        Some("Test") => 85.0,
        Some("Project") => 75.0,
        Some("Essay") => 70.0,
        Some("Quiz") => 60.0,
        Some("Homework") => 50.0,
        Some("Lab") => 45.0,
        Some("Discussion") => 30.0,
        Some("Worksheet") => 25.0,
        _ => 50.0,
    }
}

fn importance(a: &Assignment) -> f64 {
    let base = base_importance(&a.kind);
    match a.weight {
        Some(w) => (base * (1.0 + w / 100.0)).min(100.0),
        None => base,
    }
}

/// More room to improve means more impact; ungraded work is assumed moderate.
fn impact(a: &Assignment) -> f64 {
    if a.completed {
        return 0.0;
    }
    let Some(pct) = a.percentage() else {
        return 60.0;
    };
    if pct < 60.0 {
        90.0
    } else if pct < 70.0 {
        75.0
    } else if pct < 80.0 {
        60.0
    } else if pct < 90.0 {
        45.0
    } else {
        30.0
    }
}

fn completion(a: &Assignment) -> f64 {
    if a.completed { 0.0 } else { 100.0 }
}

pub fn priority_factors(
    a: &Assignment,
    settings: &Settings,
    now: DateTime<Utc>,
) -> PriorityFactors {
    PriorityFactors {
        urgency: urgency(a, &settings.timezone, now),
        importance: importance(a),
        impact: impact(a),
        completion: completion(a),
    }
}

pub fn score_assignment(a: &Assignment, settings: &Settings, now: DateTime<Utc>) -> PriorityScore {
    let factors = priority_factors(a, settings, now);
    PriorityScore {
        assignment_id: a.id.clone(),
        score: factors.composite(),
        factors,
    }
}

/// Scores in input order, regardless of the smart-prioritization setting.
pub fn priority_scores(
    assignments: &[Assignment],
    settings: &Settings,
    now: DateTime<Utc>,
) -> Vec<PriorityScore> {
    assignments.iter().map(|a| score_assignment(a, settings, now)).collect()
}

/// Highest score first; equal scores keep their relative order.
///
/// With smart prioritization off the list comes back exactly as given.
pub fn prioritize_assignments(
    assignments: Vec<Assignment>,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Vec<Assignment> {
    if !settings.smart_prioritization {
        return assignments;
    }

    let mut scored: Vec<(f64, Assignment)> = assignments
        .into_iter()
        .map(|a| (score_assignment(&a, settings, now).score, a))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    debug!(count = scored.len(), "prioritized assignments");

    scored.into_iter().map(|(_, a)| a).collect()
}

/// Borrowing variant of [`prioritize_assignments`].
pub fn prioritize_refs<'a>(
    assignments: &'a [Assignment],
    settings: &Settings,
    now: DateTime<Utc>,
) -> Vec<&'a Assignment> {
    let mut refs: Vec<&Assignment> = assignments.iter().collect();
    if !settings.smart_prioritization {
        return refs;
    }

    let scores: Vec<f64> = refs.iter().map(|a| score_assignment(a, settings, now).score).collect();
    let mut order: Vec<usize> = (0..refs.len()).collect();
    order.sort_by(|&i, &j| scores[j].total_cmp(&scores[i]));
    refs = order.into_iter().map(|i| &assignments[i]).collect();
    refs
}

/// Display bucket for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityLabel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl PriorityLabel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => PriorityLabel::VeryHigh,
            s if s >= 60.0 => PriorityLabel::High,
            s if s >= 40.0 => PriorityLabel::Medium,
            s if s >= 20.0 => PriorityLabel::Low,
            _ => PriorityLabel::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLabel::VeryHigh => "Very High",
            PriorityLabel::High => "High",
            PriorityLabel::Medium => "Medium",
            PriorityLabel::Low => "Low",
            PriorityLabel::VeryLow => "Very Low",
        }
    }

    /// Color token the UI styles badges with.
    pub fn color(&self) -> &'static str {
        match self {
            PriorityLabel::VeryHigh => "red",
            PriorityLabel::High => "orange",
            PriorityLabel::Medium => "yellow",
            PriorityLabel::Low => "blue",
            PriorityLabel::VeryLow => "gray",
        }
    }
}

impl std::fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn priority_label(score: f64) -> &'static str {
    PriorityLabel::from_score(score).as_str()
}

pub fn priority_color(score: f64) -> &'static str {
    PriorityLabel::from_score(score).color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc_settings() -> Settings {
        Settings::default().with_timezone("UTC")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_urgency_tiers() {
        assert_eq!(urgency_for_hours(None), 0.0);
        assert_eq!(urgency_for_hours(Some(-1.0)), 0.0);
        assert_eq!(urgency_for_hours(Some(0.0)), 100.0);
        assert_eq!(urgency_for_hours(Some(23.9)), 100.0);
        assert_eq!(urgency_for_hours(Some(24.0)), 80.0);
        assert_eq!(urgency_for_hours(Some(100.0)), 60.0);
        assert_eq!(urgency_for_hours(Some(200.0)), 40.0);
        assert_eq!(urgency_for_hours(Some(336.0)), 20.0);
        assert_eq!(urgency_for_hours(Some(f64::NAN)), 0.0);
    }

    #[test]
    fn test_urgency_from_due_fields() {
        let s = utc_settings();
        let soon = Assignment::new("a", "Homework").with_due("2026-03-02", "20:00");
        assert_eq!(priority_factors(&soon, &s, now()).urgency, 100.0);

        let overdue = Assignment::new("b", "Homework").with_due("2026-03-01", "09:00");
        assert_eq!(priority_factors(&overdue, &s, now()).urgency, 0.0);

        let garbage = Assignment::new("c", "Homework").with_due("someday", "");
        assert_eq!(priority_factors(&garbage, &s, now()).urgency, 0.0);
    }

    #[test]
    fn test_due_time_read_in_settings_zone() {
        // 10:00 in Chicago is 16:00 UTC: 4h away, not 2h in the past.
        let a = Assignment::new("a", "Quiz").with_due("2026-03-02", "10:00");
        let chicago = Settings::default();
        assert_eq!(priority_factors(&a, &chicago, now()).urgency, 100.0);
        assert_eq!(priority_factors(&a, &utc_settings(), now()).urgency, 0.0);
    }

    #[test]
    fn test_importance_by_type_and_weight() {
        assert_eq!(base_importance("Final Exam"), 100.0);
        assert_eq!(base_importance("exam 2"), 85.0);
        assert_eq!(base_importance("HW"), 50.0);
        assert_eq!(base_importance("Bake Sale"), 50.0);

        let weighted = Assignment::new("a", "Quiz").with_weight(50.0);
        assert_eq!(importance(&weighted), 90.0);
        let capped = Assignment::new("b", "Midterm").with_weight(20.0);
        assert_eq!(importance(&capped), 100.0);
    }

    #[test]
    fn test_impact_and_completion() {
        assert_eq!(impact(&Assignment::new("a", "Quiz")), 60.0);
        assert_eq!(impact(&Assignment::new("a", "Quiz").with_grade(5.0, 10.0)), 90.0);
        assert_eq!(impact(&Assignment::new("a", "Quiz").with_grade(65.0, 100.0)), 75.0);
        assert_eq!(impact(&Assignment::new("a", "Quiz").with_grade(75.0, 100.0)), 60.0);
        assert_eq!(impact(&Assignment::new("a", "Quiz").with_grade(85.0, 100.0)), 45.0);
        assert_eq!(impact(&Assignment::new("a", "Quiz").with_grade(95.0, 100.0)), 30.0);
        let done = Assignment::new("a", "Quiz").with_grade(5.0, 10.0).completed();
        assert_eq!(impact(&done), 0.0);
        assert_eq!(completion(&done), 0.0);
        assert_eq!(completion(&Assignment::new("b", "Quiz")), 100.0);
    }

    #[test]
    fn test_composite_score() {
        let a = Assignment::new("a", "Homework").with_due("2026-03-02", "20:00");
        let score = score_assignment(&a, &utc_settings(), now());
        // 0.4*100 + 0.3*50 + 0.2*60 + 0.1*100
        assert!((score.score - 77.0).abs() < 1e-9);
        assert_eq!(score.assignment_id, "a");
    }

    #[test]
    fn test_low_grade_ranks_above_high_grade() {
        let strong = Assignment::new("strong", "Homework")
            .with_grade(95.0, 100.0)
            .with_due("2026-03-05", "12:00");
        let weak = Assignment::new("weak", "Homework")
            .with_grade(50.0, 100.0)
            .with_due("2026-03-05", "12:00");

        let ordered = prioritize_assignments(vec![strong, weak], &utc_settings(), now());
        assert_eq!(ordered[0].id, "weak");
        assert_eq!(ordered[1].id, "strong");
    }

    #[test]
    fn test_disabled_returns_input_order() {
        let list = vec![
            Assignment::new("later", "Worksheet").with_due("2026-06-01", "09:00"),
            Assignment::new("now", "Final").with_due("2026-03-02", "18:00"),
        ];
        let settings = utc_settings().with_smart_prioritization(false);
        let out = prioritize_assignments(list.clone(), &settings, now());
        assert_eq!(out, list);

        let refs = prioritize_refs(&list, &settings, now());
        assert!(std::ptr::eq(refs[0], &list[0]));
        assert!(std::ptr::eq(refs[1], &list[1]));
    }

    #[test]
    fn test_enabled_sorts_and_refs_agree() {
        let list = vec![
            Assignment::new("later", "Worksheet").with_due("2026-06-01", "09:00"),
            Assignment::new("now", "Final").with_due("2026-03-02", "18:00"),
            Assignment::new("done", "Final").with_due("2026-03-02", "18:00").completed(),
        ];
        let s = utc_settings();
        let ids: Vec<String> = prioritize_assignments(list.clone(), &s, now())
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["now", "done", "later"]);

        let ref_ids: Vec<&str> = prioritize_refs(&list, &s, now())
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ref_ids, vec!["now", "done", "later"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let list = vec![
            Assignment::new("first", "Homework").with_due("2026-03-10", "09:00"),
            Assignment::new("second", "hw").with_due("2026-03-10", "09:00"),
        ];
        let out = prioritize_assignments(list, &utc_settings(), now());
        assert_eq!(out[0].id, "first");
        assert_eq!(out[1].id, "second");
    }

    #[test]
    fn test_scores_keep_input_order_even_when_disabled() {
        let list = vec![Assignment::new("x", "Quiz"), Assignment::new("y", "Final")];
        let off = utc_settings().with_smart_prioritization(false);
        let scores = priority_scores(&list, &off, now());
        assert_eq!(scores[0].assignment_id, "x");
        assert_eq!(scores[1].factors.importance, 100.0);
    }

    #[test]
    fn test_labels_and_colors() {
        assert_eq!(priority_label(80.0), "Very High");
        assert_eq!(priority_label(79.9), "High");
        assert_eq!(priority_label(40.0), "Medium");
        assert_eq!(priority_label(20.0), "Low");
        assert_eq!(priority_label(19.99), "Very Low");
        assert_eq!(priority_color(95.0), "red");
        assert_eq!(priority_color(65.0), "orange");
        assert_eq!(priority_color(45.0), "yellow");
        assert_eq!(priority_color(25.0), "blue");
        assert_eq!(priority_color(5.0), "gray");
        assert_eq!(PriorityLabel::from_score(f64::NAN), PriorityLabel::VeryLow);
    }
}
