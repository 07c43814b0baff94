//! Grading scheme JSON.
//!
//! Two shapes are accepted:
//! - structured: `{"mode": "percentage", "categories": [{"name": ..., "weight": ...}]}`
//! - legacy flat: `{"mode": "points", "Homework": {"weight": 30, "count": 10, "dropLowest": 1}}`,
//!   where every key except `mode` is a category name.

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use studytrack_core::{GradingCategory, GradingMode, GradingScheme};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatCategory {
    weight: f64,
    #[serde(default)]
    count: u32,
    #[serde(default)]
    drop_lowest: Option<u32>,
}

fn parse_mode(v: Option<&Value>) -> Result<GradingMode> {
    match v {
        None | Some(Value::Null) => Ok(GradingMode::default()),
        Some(v) => serde_json::from_value(v.clone()).with_context(|| format!("invalid mode {v}")),
    }
}

fn from_flat(obj: &serde_json::Map<String, Value>) -> Result<GradingScheme> {
    let mode = parse_mode(obj.get("mode"))?;

    let mut categories = Vec::new();
    for (name, value) in obj {
        if name == "mode" {
            continue;
        }
        let c: FlatCategory =
            serde_json::from_value(value.clone()).with_context(|| format!("category {name}"))?;
        let drop_lowest = c.drop_lowest.unwrap_or(0);
        categories.push(GradingCategory::new(name.clone(), c.weight, c.count, drop_lowest));
    }

    Ok(GradingScheme::new(mode, categories))
}

pub fn parse_scheme_json(s: &str) -> Result<GradingScheme> {
    let value: Value = serde_json::from_str(s).context("parse scheme JSON")?;
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("grading scheme must be a JSON object"))?;

    let scheme = if obj.get("categories").is_some_and(Value::is_array) {
        serde_json::from_value(value.clone()).context("structured grading scheme")?
    } else {
        from_flat(obj)?
    };

    if scheme.categories.is_empty() {
        bail!("grading scheme has no categories");
    }
    Ok(scheme)
}

pub fn load_scheme(path: impl AsRef<Path>) -> Result<GradingScheme> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_scheme_json(&s).with_context(|| format!("parsing {}", path.display()))
}
