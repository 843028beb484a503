use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$TALLY_HOME`, or `~/.tally` when unset.
pub fn tally_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Bundled sample used when no `--csv` is given.
pub fn default_sample_csv() -> PathBuf {
    PathBuf::from("sample_transactions.csv")
}
