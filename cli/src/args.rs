use clap::{Parser, Subcommand};
use client::{ClientConfig, ConfigError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "detect", version, about = "Check whether text or an image is AI-generated")]
pub struct Cli {
    /// YAML file with `api_url` and `timeout_secs`
    #[arg(long, global = true, env = "DETECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the detection API, e.g. http://localhost:8081/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Print the final session state as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze text given as an argument, read from a file, or piped on stdin
    Text {
        text: Option<String>,
        #[arg(long, short, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Analyze an image file
    Image {
        path: PathBuf,
        /// Open a preview of the image while it is analyzed
        #[arg(long)]
        preview: bool,
    },
    /// Line-oriented session holding both a text and an image analyzer
    Interactive {
        #[arg(long)]
        preview: bool,
    },
}

impl Cli {
    /// Defaults, then `DETECTOR_*` environment, then the config file, then flags.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::from_env()?;
        if let Some(path) = &self.config {
            config = config.with_file(path)?;
        }
        if let Some(api_url) = &self.api_url {
            config = config.with_api_url(api_url)?;
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout_secs(secs)?;
        }
        Ok(config)
    }
}
