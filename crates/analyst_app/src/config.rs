//! Host configuration, read from a RON file.
//!
//! Every remote endpoint and the synthesizer's data source live here rather
//! than in the conversation code. The data-source password is never stored in
//! the file; the file names an environment variable that holds it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use analyst_core::PanelVariant;
use analyst_engine::{BackendSettings, DataSource, Endpoints, SamplingProfile};
use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "./analyst.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("endpoint `{name}` is not a valid url ({value:?}): {message}")]
    InvalidEndpoint {
        name: &'static str,
        value: String,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum VariantSetting {
    /// Suggest metrics, then chart the approved ones.
    #[default]
    Metrics,
    /// Answer questions about one selected chart.
    Analysis,
}

impl From<VariantSetting> for PanelVariant {
    fn from(setting: VariantSetting) -> Self {
        match setting {
            VariantSetting::Metrics => PanelVariant::MetricDiscovery,
            VariantSetting::Analysis => PanelVariant::ScopedAnalysis,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum LogSetting {
    Terminal,
    #[default]
    File,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    pub host: String,
    pub port: String,
    pub name: String,
    pub user: String,
    /// Environment variable holding the password.
    pub password_env: Option<String>,
}

impl DataSourceConfig {
    fn resolve(&self) -> DataSource {
        let password = self.password_env.as_deref().and_then(|var| {
            let value = std::env::var(var).ok();
            if value.is_none() {
                engine_warn!("data source password variable {} is not set", var);
            }
            value
        });
        DataSource {
            host: self.host.clone(),
            port: self.port.clone(),
            name: self.name.clone(),
            user: self.user.clone(),
            password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub variant: VariantSetting,
    pub log: LogSetting,
    pub download_dir: PathBuf,
    pub endpoints: Endpoints,
    pub sampling: SamplingProfile,
    pub data_source: DataSourceConfig,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub report_max_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        Self {
            variant: VariantSetting::default(),
            log: LogSetting::default(),
            download_dir: PathBuf::from("./downloads"),
            endpoints: backend.endpoints,
            sampling: backend.sampling,
            data_source: DataSourceConfig::default(),
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            request_timeout_secs: backend.request_timeout.as_secs(),
            report_max_bytes: backend.report_max_bytes,
        }
    }
}

impl AppConfig {
    /// Loads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                engine_info!("no config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::parse(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn parse(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.endpoints.all() {
            url::Url::parse(value).map_err(|err| ConfigError::InvalidEndpoint {
                name,
                value: value.to_string(),
                message: err.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            endpoints: self.endpoints.clone(),
            sampling: self.sampling.clone(),
            data_source: self.data_source.resolve(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            report_max_bytes: self.report_max_bytes,
        }
    }
}
