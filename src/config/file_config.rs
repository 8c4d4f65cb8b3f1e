use crate::dataset::ColumnMapping;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub dataset_path: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub content_cache_age_sec: Option<usize>,
    pub frontend_dir_path: Option<String>,

    /// Dataset column names, unspecified ones keep their default.
    pub columns: Option<ColumnMapping>,
    pub views: Option<ViewsConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ViewsConfig {
    pub score_bins: Option<usize>,
    pub top_studios: Option<usize>,
    pub hidden_gems_limit: Option<usize>,
    pub hidden_gems_min_members: Option<u64>,
    pub top_genres: Option<usize>,
    pub top_kinds: Option<usize>,
    pub search_limit: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
