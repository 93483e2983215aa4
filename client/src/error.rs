use shared::Modality;
use thiserror::Error;

/// Every way an analysis can fail. `Display` is the message a session stores
/// in `Failed`, so transport and decode details never reach the user; they are
/// kept in the variants for logging.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", .modality.fallback_message())]
    Transport { modality: Modality, detail: String },
    #[error("{0}")]
    Server(String),
    #[error("{}", .modality.fallback_message())]
    Rejected { modality: Modality, status: u16 },
    #[error("{}", .modality.fallback_message())]
    Malformed { modality: Modality, detail: String },
}

impl AnalysisError {
    pub fn transport(modality: Modality, err: reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        AnalysisError::Transport { modality, detail }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("YAML parsing failed: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("URL parsing failed: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Unsupported API URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
    #[error("HTTP client construction failed: {0}")]
    HttpError(#[from] reqwest::Error),
}
