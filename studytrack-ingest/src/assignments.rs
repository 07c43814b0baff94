//! Load assignment snapshots exported from the backing store (CSV or JSON).
//!
//! CSV header (column order free, snake_case or camelCase):
//!   id,type,grade,max_points,due_date,due_time,completed,weight,title

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use studytrack_core::Assignment;

fn header_key(h: &str) -> String {
    h.trim().to_lowercase().replace(['_', ' '], "")
}

fn parse_opt_f64(raw: Option<&str>, column: &str, row: usize) -> Result<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .with_context(|| format!("row {row}: invalid {column} '{s}'")),
    }
}

fn parse_completed(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_lowercase()).as_deref(),
        Some("true" | "yes" | "y" | "1" | "x" | "done")
    )
}

/// Parse assignments from any CSV reader. Rows without an id are skipped.
pub fn parse_assignments_csv<R: Read>(reader: R) -> Result<Vec<Assignment>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: HashMap<String, usize> = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .enumerate()
        .map(|(i, h)| (header_key(h), i))
        .collect();

    let Some(&id_col) = columns.get("id") else {
        bail!("CSV header has no 'id' column");
    };
    let Some(&type_col) = columns.get("type") else {
        bail!("CSV header has no 'type' column");
    };

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1.
        let row = i + 2;
        let field = |name: &str| columns.get(name).and_then(|&c| record.get(c));

        let id = record.get(id_col).unwrap_or("");
        if id.is_empty() {
            continue;
        }

        let mut a = Assignment::new(id, record.get(type_col).unwrap_or(""));
        a.grade = parse_opt_f64(field("grade"), "grade", row)?;
        a.max_points = parse_opt_f64(field("maxpoints"), "max_points", row)?;
        a.weight = parse_opt_f64(field("weight"), "weight", row)?;
        a.due_date = field("duedate").unwrap_or("").to_string();
        a.due_time = field("duetime").unwrap_or("").to_string();
        a.completed = parse_completed(field("completed"));
        a.title = field("title").filter(|t| !t.is_empty()).map(str::to_string);
        a.class_id = field("classid").filter(|t| !t.is_empty()).map(str::to_string);
        out.push(a);
    }

    tracing::debug!(count = out.len(), "parsed assignments from CSV");
    Ok(out)
}

pub fn load_assignments_csv(path: impl AsRef<Path>) -> Result<Vec<Assignment>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_assignments_csv(file).with_context(|| format!("parsing {}", path.display()))
}

/// JSON array of assignment objects, as the store serializes them.
pub fn parse_assignments_json(s: &str) -> Result<Vec<Assignment>> {
    serde_json::from_str(s).context("parse assignments JSON")
}

pub fn load_assignments_json(path: impl AsRef<Path>) -> Result<Vec<Assignment>> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_assignments_json(&s).with_context(|| format!("parsing {}", path.display()))
}

/// Pick the loader by extension: `.json` is JSON, anything else CSV.
pub fn load_assignments(path: impl AsRef<Path>) -> Result<Vec<Assignment>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        load_assignments_json(path)
    } else {
        load_assignments_csv(path)
    }
}
