//! Input capture: what the user has typed or selected, and the presence
//! checks that run before anything is sent.

use shared::Modality;
use std::fmt;
use std::io;
use std::path::Path;

use crate::error::AnalysisError;
use crate::preview::Preview;

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn missing_input_message(modality: Modality) -> &'static str {
    match modality {
        Modality::Text => "Please enter some text to analyze",
        Modality::Image => "Please select an image first",
    }
}

#[derive(Clone, PartialEq)]
pub struct ImageFile {
    name: String,
    mime_hint: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_hint: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_hint: mime_hint.into(),
            bytes,
        }
    }

    pub fn open(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mime_hint = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        Ok(Self::new(name, mime_hint, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_hint(&self) -> &str {
        &self.mime_hint
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime_hint", &self.mime_hint)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisInput {
    Text { content: String },
    Image { file: ImageFile },
}

impl AnalysisInput {
    pub fn text(content: impl Into<String>) -> Self {
        AnalysisInput::Text {
            content: content.into(),
        }
    }

    pub fn image(file: ImageFile) -> Self {
        AnalysisInput::Image { file }
    }

    pub fn modality(&self) -> Modality {
        match self {
            AnalysisInput::Text { .. } => Modality::Text,
            AnalysisInput::Image { .. } => Modality::Image,
        }
    }

    /// Presence validation. Text must contain something besides whitespace;
    /// any image is accepted.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match self {
            AnalysisInput::Text { content } if content.trim().is_empty() => Err(
                AnalysisError::Validation(missing_input_message(Modality::Text).to_string()),
            ),
            _ => Ok(()),
        }
    }
}

pub trait InputCapture: Send {
    const MODALITY: Modality;

    fn to_input(&self) -> Option<AnalysisInput>;

    fn clear(&mut self);
}

#[derive(Debug, Default, Clone)]
pub struct TextCapture {
    text: String,
}

impl TextCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }
}

impl InputCapture for TextCapture {
    const MODALITY: Modality = Modality::Text;

    fn to_input(&self) -> Option<AnalysisInput> {
        if self.text.trim().is_empty() {
            None
        } else {
            Some(AnalysisInput::text(self.text.clone()))
        }
    }

    fn clear(&mut self) {
        self.text.clear();
    }
}

#[derive(Debug)]
struct ImageSelection {
    file: ImageFile,
    preview: Option<Preview>,
}

#[derive(Debug, Default)]
pub struct ImageCapture {
    selection: Option<ImageSelection>,
}

impl ImageCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, file: ImageFile) {
        self.replace(ImageSelection { file, preview: None });
    }

    pub fn select_with_preview(&mut self, file: ImageFile, preview: Preview) {
        self.replace(ImageSelection {
            file,
            preview: Some(preview),
        });
    }

    fn replace(&mut self, selection: ImageSelection) {
        if let Some(previous) = self.selection.replace(selection) {
            log::debug!("Replacing selected image {}", previous.file.name());
        }
    }

    pub fn selected(&self) -> Option<&ImageFile> {
        self.selection.as_ref().map(|selection| &selection.file)
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.selection
            .as_ref()
            .and_then(|selection| selection.preview.as_ref())
    }
}

impl InputCapture for ImageCapture {
    const MODALITY: Modality = Modality::Image;

    fn to_input(&self) -> Option<AnalysisInput> {
        self.selected().cloned().map(AnalysisInput::image)
    }

    fn clear(&mut self) {
        self.selection = None;
    }
}
