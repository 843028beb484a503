use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::SummarizerConfig;

use crate::state::{ensure_tally_home, tally_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub summarizer: SummarizerConfig,
    pub advisor: AdvisorSection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvisorSection {
    /// Chat-completions API root; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
}

impl Default for AdvisorSection {
    fn default() -> Self {
        Self {
            base_url: "https://api.perplexity.ai".to_string(),
            model: "sonar".to_string(),
            temperature: 0.4,
            max_tokens: 500,
            api_key_env: "PERPLEXITY_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySection {
    pub page_size: usize,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Missing file means defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = ensure_tally_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::UnrecognizedLabels;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.advisor.model, "sonar");
        assert_eq!(cfg.display.page_size, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[summarizer]
clamp_savings_at_zero = true
unrecognized_labels = "by-sign"
inflow_labels = ["inflow", "credit", "deposit"]

[advisor]
model = "sonar-pro"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert!(cfg.summarizer.clamp_savings_at_zero);
        assert_eq!(cfg.summarizer.unrecognized_labels, UnrecognizedLabels::BySign);
        assert!(cfg.summarizer.is_inflow_label("Deposit"));
        assert_eq!(cfg.advisor.model, "sonar-pro");
        assert_eq!(cfg.advisor.api_key_env, "PERPLEXITY_API_KEY");
        assert_eq!(cfg.display.page_size, 10);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.display.page_size = 25;
        cfg.summarizer.uncategorized_bucket_name = "Other".to_string();
        save_config_to(&path, &cfg).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display\npage_size = ").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
