//! Due-soon reminder projection. Delivery (email, SMS, push) happens elsewhere; this
//! only decides what should be sent and when.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::priority::base_importance;
use crate::time::parse_due_local;

/// Importance at or above this gets an extra early heads-up (tests, midterms, finals).
const EXAM_IMPORTANCE: f64 = 85.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderIntent {
    pub intent_id: String,
    pub assignment_id: String,
    pub title: String,
    pub body: String,
    pub send_at_utc: DateTime<Utc>,
    pub dedupe_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReminderPolicy {
    pub max_per_assignment: usize,
    pub lead_hours: i64,
    pub final_lead_minutes: i64,
    pub exam_lead_days: i64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            max_per_assignment: 3,
            lead_hours: 24,
            final_lead_minutes: 60,
            exam_lead_days: 3,
        }
    }
}

/// Project one assignment into reminder intents, earliest first.
///
/// Completed assignments and ones without a parseable due instant produce nothing.
/// Slots at or before `now` are skipped before `max_per_assignment` is applied.
pub fn project_assignment_reminders(
    assignment: &Assignment,
    tz: &str,
    now: DateTime<Utc>,
    policy: ReminderPolicy,
) -> Vec<ReminderIntent> {
    if assignment.completed {
        return vec![];
    }
    let Some(due) = parse_due_local(&assignment.due_date, &assignment.due_time, tz) else {
        return vec![];
    };

    let exam_lead = (base_importance(&assignment.kind) >= EXAM_IMPORTANCE)
        .then(|| TimeDelta::try_days(policy.exam_lead_days))
        .flatten();
    let leads = [
        exam_lead,
        TimeDelta::try_hours(policy.lead_hours),
        TimeDelta::try_minutes(policy.final_lead_minutes),
    ];

    // Out-of-range or non-positive leads yield no slot.
    let slots: Vec<DateTime<Utc>> = leads
        .into_iter()
        .flatten()
        .filter(|lead| *lead > TimeDelta::zero())
        .filter_map(|lead| due.checked_sub_signed(lead))
        .filter(|send_at| *send_at > now)
        .take(policy.max_per_assignment)
        .collect();

    let title = format!("Due soon: {}", assignment.display_title());
    let body = format!(
        "{} ({}) is due {} {}.",
        assignment.display_title(),
        assignment.kind,
        assignment.due_date,
        assignment.due_time
    );

    let mut out = Vec::new();
    for (i, send_at) in slots.into_iter().enumerate() {
        // One key per concrete slot so a rescheduled due date re-arms reminders.
        let dedupe_key = format!("{}:{}:{}", assignment.id, send_at.timestamp(), i);
        out.push(ReminderIntent {
            intent_id: format!("ri-{}-{}", assignment.id, i),
            assignment_id: assignment.id.clone(),
            title: title.clone(),
            body: body.clone(),
            send_at_utc: send_at,
            dedupe_key,
        });
    }

    out
}

/// Reminders for a whole list, ordered by send time.
pub fn project_reminders(
    assignments: &[Assignment],
    tz: &str,
    now: DateTime<Utc>,
    policy: ReminderPolicy,
) -> Vec<ReminderIntent> {
    let mut out: Vec<ReminderIntent> = assignments
        .iter()
        .flat_map(|a| project_assignment_reminders(a, tz, now, policy))
        .collect();
    out.sort_by_key(|r| r.send_at_utc);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn completed_assignment_emits_none() {
        let a = Assignment::new("a1", "Homework").with_due("2026-03-04", "12:00").completed();
        let out = project_assignment_reminders(&a, "UTC", now(), ReminderPolicy::default());
        assert!(out.is_empty());
    }

    #[test]
    fn unparseable_due_emits_none() {
        let a = Assignment::new("a1", "Homework").with_due("tbd", "");
        let out = project_assignment_reminders(&a, "UTC", now(), ReminderPolicy::default());
        assert!(out.is_empty());
    }

    #[test]
    fn homework_gets_day_and_hour_before() {
        let a = Assignment::new("a1", "hw").with_due("2026-03-04", "12:00");
        let out = project_assignment_reminders(&a, "UTC", now(), ReminderPolicy::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].send_at_utc, Utc.with_ymd_and_hms(2026, 3, 3, 12, 0, 0).unwrap());
        assert_eq!(out[1].send_at_utc, Utc.with_ymd_and_hms(2026, 3, 4, 11, 0, 0).unwrap());
        assert_ne!(out[0].dedupe_key, out[1].dedupe_key);
    }

    #[test]
    fn exam_gets_early_slot_and_past_slots_skip() {
        let far = Assignment::new("f1", "Final Exam").with_due("2026-03-10", "09:00");
        let out = project_assignment_reminders(&far, "UTC", now(), ReminderPolicy::default());
        assert_eq!(out.len(), 3);

        // Three days out has already passed; only the later two remain.
        let near = Assignment::new("f2", "Final Exam").with_due("2026-03-04", "09:00");
        let out = project_assignment_reminders(&near, "UTC", now(), ReminderPolicy::default());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn policy_caps_slots() {
        let a = Assignment::new("m1", "Midterm").with_due("2026-03-10", "09:00");
        let policy = ReminderPolicy {
            max_per_assignment: 1,
            ..ReminderPolicy::default()
        };
        let out = project_assignment_reminders(&a, "UTC", now(), policy);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].send_at_utc, Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap());
    }

    #[test]
    fn list_is_sorted_by_send_time() {
        let list = vec![
            Assignment::new("late", "Homework").with_due("2026-03-09", "12:00"),
            Assignment::new("soon", "Homework").with_due("2026-03-03", "18:00"),
        ];
        let out = project_reminders(&list, "UTC", now(), ReminderPolicy::default());
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].assignment_id, "soon");
        assert!(out.windows(2).all(|w| w[0].send_at_utc <= w[1].send_at_utc));
    }

    #[test]
    fn past_exam_slot_does_not_use_up_cap() {
        // Due in 48h: the three-day heads-up is already past.
        let a = Assignment::new("f1", "Final Exam").with_due("2026-03-04", "12:00");
        let policy = ReminderPolicy {
            max_per_assignment: 2,
            ..ReminderPolicy::default()
        };
        let out = project_assignment_reminders(&a, "UTC", now(), policy);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].send_at_utc, Utc.with_ymd_and_hms(2026, 3, 3, 12, 0, 0).unwrap());
        assert_eq!(out[1].send_at_utc, Utc.with_ymd_and_hms(2026, 3, 4, 11, 0, 0).unwrap());
    }

    #[test]
    fn out_of_range_leads_are_skipped() {
        let a = Assignment::new("m1", "Midterm").with_due("2026-03-10", "09:00");
        let policy = ReminderPolicy {
            lead_hours: i64::MAX,
            exam_lead_days: i64::MIN,
            final_lead_minutes: -30,
            ..ReminderPolicy::default()
        };
        assert!(project_assignment_reminders(&a, "UTC", now(), policy).is_empty());

        let policy = ReminderPolicy {
            lead_hours: i64::MAX,
            ..ReminderPolicy::default()
        };
        let out = project_assignment_reminders(&a, "UTC", now(), policy);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].send_at_utc, Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap());
    }
}
