// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::style::StyleConfig;

/// Source file used when neither the CLI nor the config names one.
pub const DEFAULT_DATASET: &str = "netflix_titles.csv";

/// Application config, read from YAML. Every field is optional.
///
/// ```yaml
/// dataset: data/netflix_titles.csv
/// style:
///   theme: dark
///   palette: tetrad
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub dataset: Option<PathBuf>,
    pub style: StyleConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// CLI value first, then config, then `DEFAULT_DATASET`.
    pub fn dataset_path(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.dataset.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET))
    }
}
