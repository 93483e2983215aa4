use std::io::{self, Write};
use std::path::Path;
use tempfile::TempPath;

use crate::capture::ImageFile;

/// Local preview of a selected image: a temporary copy that can be handed to
/// the system image viewer. The copy is deleted when the preview is dropped.
#[derive(Debug)]
pub struct Preview {
    path: TempPath,
}

impl Preview {
    pub fn create(file: &ImageFile) -> io::Result<Self> {
        Self::create_in(&std::env::temp_dir(), file)
    }

    pub fn create_in(dir: &Path, file: &ImageFile) -> io::Result<Self> {
        let suffix = Path::new(file.name())
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut tmp = tempfile::Builder::new()
            .prefix("detect-preview-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        tmp.write_all(file.bytes())?;
        tmp.flush()?;

        let path = tmp.into_temp_path();
        log::debug!("Created preview {} for {}", path.display(), file.name());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn show(&self) -> io::Result<()> {
        open::that(self.path())
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        log::debug!("Releasing preview {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_copy_lives_as_long_as_the_handle() {
        let dir = tempfile::tempdir().unwrap();
        let file = ImageFile::new("cat.png", "image/png", vec![0x89, b'P', b'N', b'G']);

        let preview = Preview::create_in(dir.path(), &file).unwrap();
        let path = preview.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(std::fs::read(&path).unwrap(), file.bytes());

        drop(preview);
        assert!(!path.exists());
    }
}
