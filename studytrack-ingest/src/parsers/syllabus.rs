//! Syllabus text parsers (deterministic; no extraction service needed).
//!
//! Grading breakdown lines:
//!   Homework (10 assignments, drop lowest 1) ........ 30%
//!   Quizzes - 20%
//!   Final Exam: 25 %
//!
//! Schedule lines:
//!   Mar 3      Quiz 2
//!   03/10 - Midterm Exam

use anyhow::{Result, bail};
use chrono::NaiveDate;
use regex::Regex;

use studytrack_core::{
    Assignment, GradingCategory, GradingScheme, best_mapping, categorize_assignment_type,
};

/// Lines naming these are policy, not categories.
const IGNORED_NAMES: &[&str] = &[
    "total",
    "late",
    "penalty",
    "extra credit",
    "bonus",
    "attendance policy",
];

fn is_ignored(name: &str) -> bool {
    let lower = name.to_lowercase();
    IGNORED_NAMES.iter().any(|w| lower.contains(w))
}

/// Extract a percentage-mode scheme from a syllabus grading section.
///
/// Names are canonicalized; lines that canonicalize to the same type are merged.
/// Item count defaults to 1 when the line gives none.
pub fn parse_syllabus_breakdown(text: &str) -> Result<GradingScheme> {
    let line_re = Regex::new(concat!(
        r"^\s*(?:[-*\u{2022}]\s*)?",
        r"(?P<name>[A-Za-z][A-Za-z &/'\-]{2,}?)\s*",
        r"(?:\((?P<detail>[^)]*)\))?",
        r"[\s:.\-\u{2013}\u{2014}_]*",
        r"(?P<pct>\d{1,3}(?:\.\d+)?)\s*%"
    ))?;
    let count_re = Regex::new(concat!(
        r"(?i)\b(?P<n>\d+)\s+",
        r"(?:items?|assignments?|quizzes|quiz|labs?|tests?|exams?|essays?|papers?|posts?|sets?",
        r"|worksheets?|projects?)\b"
    ))?;
    let drop_re = Regex::new(concat!(
        r"(?i)(?:drop(?:s|ped|ping)?\s+(?:the\s+)?lowest\s+(?P<a>\d+)",
        r"|lowest\s+(?P<b>\d+)\s+(?:\w+\s+)?dropped)"
    ))?;

    let mut categories: Vec<GradingCategory> = Vec::new();

    for line in text.lines() {
        let Some(caps) = line_re.captures(line) else {
            continue;
        };

        let raw_name = caps["name"].trim();
        if is_ignored(raw_name) || line.to_lowercase().contains("per day") {
            continue;
        }
        let weight: f64 = match caps["pct"].parse() {
            Ok(w) => w,
            Err(_) => continue,
        };

        let count = count_re
            .captures(line)
            .and_then(|c| c["n"].parse::<u32>().ok())
            .unwrap_or(1);
        let drop_lowest = drop_re
            .captures(line)
            .and_then(|c| c.name("a").or_else(|| c.name("b")))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0);

        let name = categorize_assignment_type(raw_name);
        match categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => {
                existing.weight += weight;
                existing.count += count;
                existing.drop_lowest += drop_lowest;
            }
            None => categories.push(GradingCategory::new(name, weight, count, drop_lowest)),
        }
    }

    if categories.is_empty() {
        bail!("no grading breakdown found");
    }

    tracing::debug!(categories = categories.len(), "parsed syllabus breakdown");
    Ok(GradingScheme::percentage(categories))
}

fn parse_month_day(s: &str, year: i32) -> Option<NaiveDate> {
    let s = s.trim();

    // "03/10"
    if let Some((m, d)) = s.split_once('/') {
        return NaiveDate::from_ymd_opt(year, m.trim().parse().ok()?, d.trim().parse().ok()?);
    }

    // "Mar 3"
    let mut parts = s.split_whitespace();
    let month = match parts.next()?.get(..3)?.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    let day: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Extract dated, gradeable items from a syllabus schedule.
///
/// `term_year` is required because rows are month/day only. Rows whose text does not
/// map to a known assignment type (lectures, holidays) are skipped.
pub fn parse_syllabus_schedule(text: &str, term_year: i32) -> Result<Vec<Assignment>> {
    let row_re = Regex::new(concat!(
        r"^\s*(?P<date>[A-Za-z]{3,9}\.?\s+\d{1,2}|\d{1,2}/\d{1,2})",
        r"\s*[:\-\u{2013}\u{2014}]?\s+",
        r"(?P<desc>\S.*?)\s*$"
    ))?;

    let mut out = Vec::new();
    for line in text.lines() {
        let Some(caps) = row_re.captures(line) else {
            continue;
        };
        let date_raw = caps["date"].replace('.', "");
        let Some(date) = parse_month_day(&date_raw, term_year) else {
            continue;
        };

        let desc = caps["desc"].trim();
        let Some(mapping) = best_mapping(desc) else {
            continue;
        };

        let id = format!("syllabus-{}", out.len() + 1);
        out.push(
            Assignment::new(id, mapping.standard_name)
                .with_title(desc)
                .with_due(date.format("%Y-%m-%d").to_string(), ""),
        );
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYLLABUS: &str = "
GRADING
  Homework (10 assignments, drop lowest 1) ........ 30%
  Quizzes (6 quizzes, lowest 1 dropped) - 20%
  Midterm Exam: 20 %
  Final Exam ..... 30%
  Total 100%
  Late work: 10% per day
";

    #[test]
    fn test_parse_breakdown() {
        let s = parse_syllabus_breakdown(SYLLABUS).unwrap();
        assert_eq!(s.category_names(), vec!["Homework", "Quiz", "Midterm", "Final"]);
        assert_eq!(s.categories[0], GradingCategory::new("Homework", 30.0, 10, 1));
        assert_eq!(s.categories[1], GradingCategory::new("Quiz", 20.0, 6, 1));
        assert_eq!(s.categories[2].count, 1);
        assert_eq!(s.total_weight(), 100.0);
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_types_merge() {
        let text = "Lab 1 report: 5%\nLab practical - 15%\n";
        // "Lab 1 report" has a digit; the name stops before it and the line is skipped.
        let s = parse_syllabus_breakdown(text).unwrap();
        assert_eq!(s.categories.len(), 1);
        assert_eq!(s.categories[0].name, "Lab");
        assert_eq!(s.categories[0].weight, 15.0);

        let merged = parse_syllabus_breakdown("Lab reports 10%\n- Lab practical 15%\n").unwrap();
        assert_eq!(merged.categories[0].weight, 25.0);
        assert_eq!(merged.categories[0].count, 2);
    }

    #[test]
    fn test_letter_scale_lines_are_not_categories() {
        assert!(parse_syllabus_breakdown("A 93%\nB+ 87%\n").is_err());
    }

    #[test]
    fn test_parse_schedule() {
        let text = "
Week 1
Mar 3      Quiz 2
Mar. 5     Lecture: recursion
03/10 - Midterm Exam
Apr 31     Essay draft
Apr 14     Lab report 4 due
";
        let list = parse_syllabus_schedule(text, 2026).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].kind, "Quiz");
        assert_eq!(list[0].due_date, "2026-03-03");
        assert_eq!(list[1].kind, "Midterm");
        assert_eq!(list[1].due_date, "2026-03-10");
        assert_eq!(list[2].kind, "Lab");
        assert_eq!(list[2].title.as_deref(), Some("Lab report 4 due"));
        assert_eq!(list[2].id, "syllabus-3");
    }
}
