mod file_config;

pub use file_config::{FileConfig, ViewsConfig};

use crate::dataset::ColumnMapping;
use crate::server::RequestsLoggingLevel;
use crate::views::{
    HiddenGemsSettings, OverviewSettings, SearchSettings, TrendsSettings, ViewSettings,
};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub dataset_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,

    pub columns: ColumnMapping,
    pub views: ViewSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let dataset_path = file
            .dataset_path
            .map(PathBuf::from)
            .or_else(|| cli.dataset_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("dataset_path must be specified as argument or in config file")
            })?;

        if !dataset_path.exists() {
            bail!("Dataset file does not exist: {:?}", dataset_path);
        }
        if dataset_path.is_dir() {
            bail!("dataset_path is a directory: {:?}", dataset_path);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let columns = file.columns.unwrap_or_default();
        let views = resolve_views(file.views.unwrap_or_default())?;

        Ok(Self {
            dataset_path,
            port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            columns,
            views,
        })
    }
}

fn resolve_views(file: ViewsConfig) -> Result<ViewSettings> {
    let defaults = ViewSettings::default();
    let views = ViewSettings {
        overview: OverviewSettings {
            score_bins: file.score_bins.unwrap_or(defaults.overview.score_bins),
            top_studios: file.top_studios.unwrap_or(defaults.overview.top_studios),
        },
        hidden_gems: HiddenGemsSettings {
            limit: file
                .hidden_gems_limit
                .unwrap_or(defaults.hidden_gems.limit),
            min_members: file
                .hidden_gems_min_members
                .unwrap_or(defaults.hidden_gems.min_members),
        },
        trends: TrendsSettings {
            top_genres: file.top_genres.unwrap_or(defaults.trends.top_genres),
            top_kinds: file.top_kinds.unwrap_or(defaults.trends.top_kinds),
        },
        search: SearchSettings {
            limit: file.search_limit.unwrap_or(defaults.search.limit),
        },
    };

    if views.overview.score_bins == 0 {
        bail!("views.score_bins must be greater than 0");
    }
    if views.search.limit == 0 {
        bail!("views.search_limit must be greater than 0");
    }
    Ok(views)
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
pub fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
