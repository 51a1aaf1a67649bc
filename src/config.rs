use crate::error::AppError;
use photo_compress::CompressOptions;
use property_proximity::{PositionOptions, RefresherConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// App configuration, read from a TOML file. Every field has a default, so
/// an empty document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Property registry document (JSON)
    pub properties_path: PathBuf,
    pub database_path: PathBuf,
    pub refresh_interval_secs: u64,
    /// 0 disables throttling of triggered refreshes
    pub refresh_throttle_secs: u64,
    pub refresh_on_focus: bool,
    pub position_timeout_secs: u64,
    pub photos: PhotoSettings,
    pub report: ReportSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            properties_path: PathBuf::from("data/property_locations.json"),
            database_path: PathBuf::from("./data/crisis_checklist.db"),
            refresh_interval_secs: 120,
            refresh_throttle_secs: 15,
            refresh_on_focus: true,
            position_timeout_secs: 15,
            photos: PhotoSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

/// Byte budget for photo attachments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSettings {
    pub max_kb: usize,
    pub max_dimension: u32,
    pub min_dimension: u32,
    pub initial_quality: f32,
    pub min_quality: f32,
    pub quality_step: f32,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            max_kb: 100,
            max_dimension: 1600,
            min_dimension: 640,
            initial_quality: 0.82,
            min_quality: 0.45,
            quality_step: 0.06,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leadership_webhook_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            leadership_webhook_url: None,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Parses and validates a TOML document
    pub fn from_toml(s: &str) -> Result<Self, AppError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Loads the config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.refresh_interval_secs == 0 {
            return Err(AppError::Config(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }
        if self.position_timeout_secs == 0 {
            return Err(AppError::Config(
                "position_timeout_secs must be positive".to_string(),
            ));
        }
        if self.photos.max_kb.checked_mul(1024).is_none() {
            return Err(AppError::Config(format!(
                "photos.max_kb is too large: {}",
                self.photos.max_kb
            )));
        }
        self.photo_options()
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if let Some(url) = &self.report.leadership_webhook_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Config(format!(
                    "leadership_webhook_url must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }
        Ok(())
    }

    pub fn refresher_config(&self) -> RefresherConfig {
        RefresherConfig {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            throttle: match self.refresh_throttle_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            refresh_on_focus: self.refresh_on_focus,
        }
    }

    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            timeout: Duration::from_secs(self.position_timeout_secs),
            ..PositionOptions::default()
        }
    }

    pub fn photo_options(&self) -> CompressOptions {
        let p = &self.photos;
        CompressOptions {
            max_bytes: p.max_kb.saturating_mul(1024),
            max_dimension: p.max_dimension,
            min_dimension: p.min_dimension,
            initial_quality: p.initial_quality,
            min_quality: p.min_quality,
            quality_step: p.quality_step,
        }
    }
}
