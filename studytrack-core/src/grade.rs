//! Grade calculation: weighted class percentage, GPA, letter grades and
//! target prediction.
//!
//! Everything here is pure. Bad numeric input (a zero `max_points`, an empty GPA list)
//! degrades to NaN instead of failing; callers render non-finite values as "N/A".

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::assignment::Assignment;
use crate::scheme::{GradingMode, GradingScheme};

/// Letter grade on the usual plus/minus scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    F,
    D,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "C-")]
    CMinus,
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    A,
    #[serde(rename = "A+")]
    APlus,
}

/// (minimum percentage, letter, GPA points), highest first.
const GRADE_TABLE: [(f64, LetterGrade, f64); 11] = [
    (97.0, LetterGrade::APlus, 4.0),
    (93.0, LetterGrade::A, 4.0),
    (90.0, LetterGrade::AMinus, 3.7),
    (87.0, LetterGrade::BPlus, 3.3),
    (83.0, LetterGrade::B, 3.0),
    (80.0, LetterGrade::BMinus, 2.7),
    (77.0, LetterGrade::CPlus, 2.3),
    (73.0, LetterGrade::C, 2.0),
    (70.0, LetterGrade::CMinus, 1.7),
    (67.0, LetterGrade::DPlus, 1.3),
    (65.0, LetterGrade::D, 1.0),
];

impl LetterGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    /// 0 for F up to 11 for A+.
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a percentage to a letter. Total: NaN and anything below 65 is an F.
pub fn letter_grade(percentage: f64) -> LetterGrade {
    GRADE_TABLE
        .iter()
        .find(|(min, _, _)| percentage >= *min)
        .map(|(_, letter, _)| *letter)
        .unwrap_or(LetterGrade::F)
}

/// 4.0-scale points for one class percentage.
pub fn gpa_points(percentage: f64) -> f64 {
    GRADE_TABLE
        .iter()
        .find(|(min, _, _)| percentage >= *min)
        .map(|(_, _, points)| *points)
        .unwrap_or(0.0)
}

/// Mean GPA points over class percentages. Empty input is NaN.
pub fn calculate_gpa(percentages: &[f64]) -> f64 {
    let total: f64 = percentages.iter().map(|p| gpa_points(*p)).sum();
    total / percentages.len() as f64
}

/// Assignments that count toward a grade: completed with a grade recorded.
pub fn graded_assignments(assignments: &[Assignment]) -> Vec<&Assignment> {
    assignments.iter().filter(|a| a.counts_toward_grade()).collect()
}

/// Per-category outcome, for display alongside the class grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    pub name: String,
    pub weight: f64,
    pub graded_count: usize,
    pub expected_count: u32,
    /// Average percentage after drops; `None` when nothing is graded yet.
    pub average: Option<f64>,
    /// How many scores were excluded by drop-lowest.
    pub dropped: usize,
}

/// Average of `scores` after excluding the lowest `drop_lowest`.
///
/// When there are no more scores than drops, only the single best one is kept.
fn trimmed_average(mut scores: Vec<f64>, drop_lowest: u32) -> (Option<f64>, usize) {
    if scores.is_empty() {
        return (None, 0);
    }

    let original = scores.len();
    let drop = drop_lowest as usize;
    if drop > 0 {
        scores.sort_by(|a, b| b.total_cmp(a));
        let keep = if original > drop { original - drop } else { 1 };
        scores.truncate(keep);
    }

    let avg = scores.iter().sum::<f64>() / scores.len() as f64;
    (Some(avg), original - scores.len())
}

fn group_percentages<'a, I>(assignments: I) -> HashMap<&'a str, Vec<f64>>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut by_type: HashMap<&str, Vec<f64>> = HashMap::new();
    for a in assignments {
        if let Some(pct) = a.percentage() {
            by_type.entry(a.kind.as_str()).or_default().push(pct);
        }
    }
    by_type
}

/// Per-category averages in scheme order. Assignment types must already match the
/// scheme's category names exactly.
pub fn category_breakdown(
    assignments: &[Assignment],
    scheme: &GradingScheme,
) -> Vec<CategoryResult> {
    let mut by_type = group_percentages(assignments);

    scheme
        .categories
        .iter()
        .map(|cat| {
            let scores = by_type.remove(cat.name.as_str()).unwrap_or_default();
            let graded_count = scores.len();
            let (average, dropped) = trimmed_average(scores, cat.drop_lowest);
            CategoryResult {
                name: cat.name.clone(),
                weight: cat.weight,
                graded_count,
                expected_count: cat.count,
                average,
                dropped,
            }
        })
        .collect()
}

/// Weighted class percentage.
///
/// Categories with nothing graded are left out and the remaining weights are
/// renormalized. No graded categories at all gives 0.
pub fn calculate_class_grade(assignments: &[Assignment], scheme: &GradingScheme) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for result in category_breakdown(assignments, scheme) {
        let Some(avg) = result.average else {
            continue;
        };
        match scheme.mode {
            GradingMode::Percentage => weighted += avg * (result.weight / 100.0),
            GradingMode::Points => weighted += (avg / 100.0) * result.weight,
        }
        total_weight += result.weight;
    }

    if total_weight == 0.0 {
        return 0.0;
    }

    let grade = match scheme.mode {
        GradingMode::Percentage => weighted / (total_weight / 100.0),
        GradingMode::Points => (weighted / total_weight) * 100.0,
    };
    trace!(mode = scheme.mode.as_str(), total_weight, grade, "class grade");
    grade
}

/// Average needed on remaining work to reach `target`, keyed by each category that
/// still expects graded items. Every such category reports the same value.
///
/// Empty when the graded work already locks in 100% of the weight.
pub fn predict_final_grade(
    assignments: &[Assignment],
    scheme: &GradingScheme,
    target: f64,
) -> BTreeMap<String, f64> {
    let current_grade = calculate_class_grade(assignments, scheme);
    let breakdown = category_breakdown(assignments, scheme);

    let current_weight: f64 = breakdown
        .iter()
        .map(|r| {
            let filled = if r.expected_count == 0 {
                if r.graded_count > 0 { 1.0 } else { 0.0 }
            } else {
                (r.graded_count as f64 / r.expected_count as f64).min(1.0)
            };
            r.weight * filled
        })
        .sum();

    let remaining_weight = 100.0 - current_weight;
    if remaining_weight <= 0.0 {
        debug!(current_weight, "scheme fully weighted; nothing to predict");
        return BTreeMap::new();
    }

    let needed =
        ((target * 100.0 - current_grade * current_weight) / remaining_weight).clamp(0.0, 100.0);
    debug!(current_grade, current_weight, target, needed, "predicted needed average");

    breakdown
        .into_iter()
        .filter(|r| r.graded_count < r.expected_count as usize)
        .map(|r| (r.name, needed))
        .collect()
}

/// Everything a class card shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    /// `None` until something finite can be shown.
    pub percentage: Option<f64>,
    pub letter: Option<LetterGrade>,
    pub gpa_points: Option<f64>,
    pub breakdown: Vec<CategoryResult>,
}

/// Grade, letter, GPA points and breakdown in one pass over completed, graded work.
pub fn class_report(assignments: &[Assignment], scheme: &GradingScheme) -> ClassReport {
    let graded: Vec<Assignment> = graded_assignments(assignments).into_iter().cloned().collect();
    let breakdown = category_breakdown(&graded, scheme);
    let any_graded = breakdown.iter().any(|r| r.average.is_some());

    let pct = calculate_class_grade(&graded, scheme);
    let percentage = (any_graded && pct.is_finite()).then_some(pct);

    ClassReport {
        percentage,
        letter: percentage.map(letter_grade),
        gpa_points: percentage.map(gpa_points),
        breakdown,
    }
}
