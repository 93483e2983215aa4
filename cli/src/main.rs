mod args;
mod interactive;
mod render;

use anyhow::{Context, Result};
use args::{Cli, Command};
use clap::Parser;
use client::{
    HttpDetectionClient, ImageAnalyzer, ImageCapture, ImageFile, SessionState, TextAnalyzer,
    TextCapture,
};
use indicatif::ProgressBar;
use shared::Modality;
use std::future::Future;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.client_config().context("invalid detector configuration")?;
    log::info!("Using detection API at {}", config.api_url);
    let client = Arc::new(HttpDetectionClient::new(&config)?);

    match cli.command {
        Command::Text { text, file } => {
            let content = read_text(text, file)?;
            let analyzer = TextAnalyzer::with_client(client, TextCapture::new());
            let words = analyzer.update_input(|capture| {
                capture.set_text(content);
                capture.word_count()
            });

            let message = format!("Analyzing text ({} words)...", words);
            let state = with_spinner(&message, analyzer.submit()).await;
            exit_with(&state, Modality::Text, cli.json)
        }
        Command::Image { path, preview } => {
            let file = ImageFile::open(&path)
                .with_context(|| format!("cannot read image {}", path.display()))?;
            let analyzer = ImageAnalyzer::with_client(client, ImageCapture::new());
            let preview = if preview { interactive::open_preview(&file) } else { None };
            analyzer.update_input(|capture| match preview {
                Some(preview) => capture.select_with_preview(file, preview),
                None => capture.select(file),
            });

            let state = with_spinner("Analyzing image...", analyzer.submit()).await;
            exit_with(&state, Modality::Image, cli.json)
        }
        Command::Interactive { preview } => interactive::run(client, preview, cli.json).await,
    }
}

fn read_text(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()));
    }
    if let Some(text) = text {
        return Ok(text);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("cannot read text from stdin")?;
    Ok(buffer)
}

fn exit_with(state: &SessionState, modality: Modality, json: bool) -> Result<ExitCode> {
    print_state(state, modality, json)?;
    Ok(match state {
        SessionState::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

pub(crate) fn print_state(state: &SessionState, modality: Modality, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
    } else {
        println!("{}", render::render_state(state, modality));
    }
    Ok(())
}

pub(crate) async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    spinner.finish_and_clear();
    output
}
