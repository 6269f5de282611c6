//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Project config file, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".cabprice.yaml";

/// cabprice configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file or directory
    pub catalog: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from(Self::global_config_path().as_deref(), &cwd)
    }

    /// Load with explicit global config path and working directory
    pub fn load_from(global_path: Option<&Path>, cwd: &Path) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/cabprice/config.yaml)
        if let Some(global) = global_path.and_then(Self::read_file) {
            config.merge(global);
        }

        // 3. Project config (.cabprice.yaml); relative catalog paths resolve
        //    against the directory holding the file
        if let Some(mut project) = Self::read_file(&cwd.join(PROJECT_CONFIG_FILE)) {
            if let Some(catalog) = project.catalog.take() {
                project.catalog = Some(if catalog.is_relative() {
                    cwd.join(catalog)
                } else {
                    catalog
                });
            }
            config.merge(project);
        }

        // 4. Environment variables
        if let Ok(catalog) = std::env::var("CABPRICE_CATALOG") {
            if !catalog.is_empty() {
                config.catalog = Some(PathBuf::from(catalog));
            }
        }
        if let Ok(format) = std::env::var("CABPRICE_FORMAT") {
            if !format.is_empty() {
                config.default_format = Some(format);
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cabprice")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Catalog path, with a command-line override taking precedence
    pub fn catalog_path(&self, cli_override: Option<&Path>) -> Option<PathBuf> {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.catalog.clone())
    }
}
