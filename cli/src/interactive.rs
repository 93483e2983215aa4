use anyhow::Result;
use client::{
    DetectionClient, ImageAnalyzer, ImageCapture, ImageFile, Preview, TextAnalyzer, TextCapture,
};
use shared::Modality;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{print_state, with_spinner};

const HELP: &str = "\
Type or paste text; every line is appended to the text being analyzed.
  :analyze         analyze the text
  :clear           clear the text and its result
  :image <path>    select an image
  :analyze-image   analyze the selected image
  :clear-image     clear the image and its result
  :status          show both sessions
  :help            show this help
  :quit            leave";

#[derive(Debug, PartialEq)]
enum Line<'a> {
    Append(&'a str),
    Analyze,
    Clear,
    SelectImage(&'a str),
    AnalyzeImage,
    ClearImage,
    Status,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Line<'_> {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Line::Append(line);
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));

    match name {
        "analyze" => Line::Analyze,
        "clear" => Line::Clear,
        "image" if !rest.is_empty() => Line::SelectImage(rest),
        "analyze-image" => Line::AnalyzeImage,
        "clear-image" => Line::ClearImage,
        "status" => Line::Status,
        "help" => Line::Help,
        "quit" | "q" => Line::Quit,
        _ => Line::Unknown(command),
    }
}

pub async fn run<C: DetectionClient>(client: Arc<C>, preview: bool, json: bool) -> Result<ExitCode> {
    let text = TextAnalyzer::with_client(Arc::clone(&client), TextCapture::new());
    let image = ImageAnalyzer::with_client(client, ImageCapture::new());

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Line::Append(content) => {
                let words = text.update_input(|capture| {
                    capture.push_line(content);
                    capture.word_count()
                });
                println!("({} words)", words);
            }
            Line::Analyze => {
                let state = with_spinner("Analyzing text...", text.submit()).await;
                print_state(&state, Modality::Text, json)?;
            }
            Line::Clear => {
                text.reset();
                println!("Text cleared.");
            }
            Line::SelectImage(path) => select_image(&image, Path::new(path), preview),
            Line::AnalyzeImage => {
                let state = with_spinner("Analyzing image...", image.submit()).await;
                print_state(&state, Modality::Image, json)?;
            }
            Line::ClearImage => {
                image.reset();
                println!("Image cleared.");
            }
            Line::Status => {
                println!("-- text --");
                print_state(&text.state(), Modality::Text, json)?;
                println!("-- image --");
                print_state(&image.state(), Modality::Image, json)?;
            }
            Line::Help => println!("{}", HELP),
            Line::Quit => break,
            Line::Unknown(command) => eprintln!("Unknown command :{} (try :help)", command),
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn select_image<C: DetectionClient>(image: &ImageAnalyzer<C>, path: &Path, preview: bool) {
    let file = match ImageFile::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot read {}: {}", path.display(), e);
            return;
        }
    };
    println!("Selected {} ({} bytes, {})", file.name(), file.bytes().len(), file.mime_hint());

    let preview = if preview { open_preview(&file) } else { None };
    image.update_input(|capture| match preview {
        Some(preview) => capture.select_with_preview(file, preview),
        None => capture.select(file),
    });
}

pub fn open_preview(file: &ImageFile) -> Option<Preview> {
    match Preview::create(file) {
        Ok(preview) => {
            if let Err(e) = preview.show() {
                log::warn!("Could not open preview {}: {}", preview.path().display(), e);
            }
            Some(preview)
        }
        Err(e) => {
            log::warn!("Could not create preview for {}: {}", file.name(), e);
            None
        }
    }
}
