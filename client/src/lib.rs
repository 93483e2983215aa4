pub mod analyzer;
pub mod capture;
pub mod config;
pub mod detection;
pub mod error;
pub mod preview;
pub mod session;

#[cfg(test)]
mod mock;

pub use analyzer::{Analyzer, ImageAnalyzer, TextAnalyzer};
pub use capture::{word_count, AnalysisInput, ImageCapture, ImageFile, InputCapture, TextCapture};
pub use config::ClientConfig;
pub use detection::{DetectionClient, HttpDetectionClient};
pub use error::{AnalysisError, ConfigError};
pub use preview::Preview;
pub use session::{AnalysisSession, ImageSession, SessionState, Submission, TextSession};
pub use shared::{AnalysisResult, AnalysisStats, DetectionMethod, Modality};
