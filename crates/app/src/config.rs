//! Runtime configuration.
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `BREWUP_DATA_PATH` | JSON store file | `brewup-drinks.json` |
//! | `BREWUP_IMAGE_QUALITY` | JPEG quality for attached images, 0.0..=1.0 | `0.8` |
//! | `BREWUP_LOG_FORMAT` | `json` or `pretty` | `pretty` |
//! | `BREWUP_SEED_DEFAULTS` | insert starter drinks on open | `true` |

use std::path::PathBuf;

use anyhow::{Context, bail};

use brewup_catalog::DEFAULT_IMAGE_QUALITY;
use brewup_observability::LogFormat;

pub const DEFAULT_DATA_PATH: &str = "brewup-drinks.json";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub image_quality: f32,
    pub log_format: LogFormat,
    pub seed_defaults: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            image_quality: DEFAULT_IMAGE_QUALITY,
            log_format: LogFormat::default(),
            seed_defaults: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("BREWUP_DATA_PATH").filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("BREWUP_IMAGE_QUALITY") {
            let quality: f32 = raw
                .trim()
                .parse()
                .with_context(|| format!("BREWUP_IMAGE_QUALITY is not a number: {raw:?}"))?;
            if !(0.0..=1.0).contains(&quality) {
                bail!("BREWUP_IMAGE_QUALITY must be between 0.0 and 1.0, got {quality}");
            }
            config.image_quality = quality;
        }

        if let Some(raw) = lookup("BREWUP_LOG_FORMAT") {
            config.log_format = raw
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("invalid BREWUP_LOG_FORMAT")?;
        }

        if let Some(raw) = lookup("BREWUP_SEED_DEFAULTS") {
            config.seed_defaults = parse_bool(&raw)
                .with_context(|| format!("BREWUP_SEED_DEFAULTS is not a boolean: {raw:?}"))?;
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
