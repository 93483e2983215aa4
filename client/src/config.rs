use serde::Deserialize;
use shared::Modality;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

pub const API_URL_VAR: &str = "DETECTOR_API_URL";
pub const TIMEOUT_VAR: &str = "DETECTOR_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8081/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: Url::parse(DEFAULT_API_URL)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new()?;

        if let Some(api_url) = lookup(API_URL_VAR) {
            config = config.with_api_url(&api_url)?;
        }
        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            let secs = timeout
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(timeout.clone()))?;
            config = config.with_timeout_secs(secs)?;
        }

        Ok(config)
    }

    pub fn with_file(self, path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_yaml::from_str(&contents)?;
        log::debug!("Loaded detector config from {}", path.display());
        self.with_overrides(file)
    }

    pub fn with_overrides(mut self, file: ConfigFile) -> Result<Self, ConfigError> {
        if let Some(api_url) = file.api_url {
            self = self.with_api_url(&api_url)?;
        }
        if let Some(secs) = file.timeout_secs {
            self = self.with_timeout_secs(secs)?;
        }
        Ok(self)
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(api_url.trim())?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
        self.api_url = url;
        Ok(self)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::InvalidTimeout(secs.to_string()));
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    pub fn endpoint(&self, modality: Modality) -> String {
        format!(
            "{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            modality.endpoint()
        )
    }
}
