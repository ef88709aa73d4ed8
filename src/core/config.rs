use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builders::validator::{ConfigValidator, StandardValidator};

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "file-crud.toml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoreSettings {
    /// `fsync` created files and update scratch files before returning.
    pub sync_on_write: bool,
    pub verbose: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            sync_on_write: true,
            verbose: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FileCrudConfig {
    pub version: String,
    pub target_path: PathBuf,
    #[serde(default)]
    pub settings: StoreSettings,
}

impl Default for FileCrudConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            target_path: PathBuf::from("./output/file.txt"),
            settings: StoreSettings::default(),
        }
    }
}

/// Export formats accepted by [`ConfigManager::export_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Toml,
    Json,
    Yaml,
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses `file-crud.toml` in the current directory.
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to resolve current directory")?;
        Ok(Self::new_at(current_dir.join(DEFAULT_CONFIG_FILE)))
    }

    pub fn new_at(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Writes the default configuration unless one already exists.
    ///
    /// Returns `true` when a new file was written.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }

        self.save_config(&FileCrudConfig::default())?;
        Ok(true)
    }

    pub fn validate_config(&self) -> Result<Vec<String>> {
        let config = self.load_config()?;
        StandardValidator::new().validate_config(&config)
    }

    pub fn set_target_path(&mut self, target_path: PathBuf) -> Result<()> {
        let mut config = self.load_config()?;
        config.target_path = target_path;
        self.save_config(&config)
    }

    pub fn export_config(&self, file_path: &Path, format: ExportFormat) -> Result<()> {
        let config = self.load_config()?;

        let content = match format {
            ExportFormat::Json => {
                serde_json::to_string_pretty(&config).context("Failed to serialize to JSON")?
            }
            ExportFormat::Yaml => {
                serde_yaml::to_string(&config).context("Failed to serialize to YAML")?
            }
            ExportFormat::Toml => {
                toml::to_string_pretty(&config).context("Failed to serialize to TOML")?
            }
        };

        fs::write(file_path, content).context("Failed to write export file")?;
        Ok(())
    }
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<FileCrudConfig>;
    fn save_config(&self, config: &FileCrudConfig) -> Result<()>;
    fn get_config_path(&self) -> &Path;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<FileCrudConfig> {
        if !self.config_path.exists() {
            return Ok(FileCrudConfig::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    fn save_config(&self, config: &FileCrudConfig) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
