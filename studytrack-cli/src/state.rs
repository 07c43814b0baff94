use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$STUDYTRACK_HOME`, else `~/.studytrack`.
pub fn studytrack_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("STUDYTRACK_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".studytrack"))
}

pub fn ensure_studytrack_home() -> Result<PathBuf> {
    let dir = studytrack_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
