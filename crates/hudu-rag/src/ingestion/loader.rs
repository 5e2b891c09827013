//! Document loader: file or directory path to document units

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::parser::FileParser;
use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use crate::types::{DocumentUnit, FileType, SUPPORTED_EXTENSIONS};

/// Instruction sent with images to the vision model
pub const IMAGE_TRANSCRIBE_INSTRUCTION: &str =
    "Transcribe all visible text in this image exactly as written. \
     If there is no text, describe the image content briefly.";

/// Loads files into document units
///
/// Text formats are parsed on the blocking pool; images go through the
/// vision-capable chat model.
pub struct DocumentLoader {
    llm: Arc<dyn LlmProvider>,
}

impl DocumentLoader {
    /// Create a loader that uses `llm` for image transcription
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Load a file, or every supported file directly inside a directory
    pub async fn load(&self, path: &Path) -> Result<Vec<DocumentUnit>> {
        let metadata = tokio::fs::metadata(path).await?;

        let units = if metadata.is_dir() {
            self.load_directory(path).await?
        } else {
            self.load_file(path).await?
        };

        let units: Vec<DocumentUnit> = units.into_iter().filter(|u| !u.is_blank()).collect();
        if units.is_empty() {
            return Err(Error::EmptyCorpus(format!(
                "no text could be extracted from {}",
                path.display()
            )));
        }

        tracing::info!("Loaded {} document units from {}", units.len(), path.display());
        Ok(units)
    }

    /// Load a single file
    pub async fn load_file(&self, path: &Path) -> Result<Vec<DocumentUnit>> {
        let file_type = FileType::from_path(path);
        if !file_type.is_supported() {
            return Err(Error::UnsupportedFormat(format!(
                "{} (supported: {})",
                path.display(),
                SUPPORTED_EXTENSIONS.join(", ")
            )));
        }

        let data = tokio::fs::read(path).await?;

        if file_type == FileType::Image {
            return self.load_image(path, &data).await;
        }

        let source = path.to_path_buf();
        tokio::task::spawn_blocking(move || FileParser::parse(&source, &data))
            .await
            .map_err(|e| Error::internal(format!("Parser task failed: {}", e)))?
    }

    async fn load_image(&self, path: &Path, data: &[u8]) -> Result<Vec<DocumentUnit>> {
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let completion = self
            .llm
            .transcribe_image(data, mime.essence_str(), IMAGE_TRANSCRIBE_INSTRUCTION)
            .await?;

        if !completion.is_text() {
            tracing::warn!(
                "{} returned no text for image {}",
                self.llm.name(),
                path.display()
            );
            return Ok(Vec::new());
        }

        Ok(vec![DocumentUnit::new(
            completion.into_text(),
            path,
            FileType::Image,
        )])
    }

    async fn load_directory(&self, dir: &Path) -> Result<Vec<DocumentUnit>> {
        let files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| FileType::from_path(path).is_supported())
            .collect();

        tracing::info!("Found {} supported files in {}", files.len(), dir.display());

        let mut units = Vec::new();
        for file in files {
            match self.load_file(&file).await {
                Ok(loaded) => units.extend(loaded),
                Err(e) => tracing::warn!("Skipping {}: {}", file.display(), e),
            }
        }

        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::EchoLlm;

    fn loader() -> DocumentLoader {
        DocumentLoader::new(Arc::new(EchoLlm))
    }

    #[tokio::test]
    async fn test_load_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offices.csv");
        std::fs::write(&path, "office,county\nHuduma Centre GPO,Nairobi\n").unwrap();

        let units = loader().load(&path).await.unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "office: Huduma Centre GPO\ncounty: Nairobi");
        assert_eq!(units[0].meta("source"), Some(path.to_string_lossy().as_ref()));
    }

    #[tokio::test]
    async fn test_image_goes_through_vision_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Notice.PNG");
        std::fs::write(&path, [0u8; 16]).unwrap();

        let units = loader().load(&path).await.unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "16 bytes of image/png");
        assert_eq!(units[0].meta("type"), Some("image"));
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.exe");
        std::fs::write(&path, b"MZ").unwrap();

        let err = loader().load(&path).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_blank_file_is_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.csv");
        std::fs::write(&path, "office,county\n").unwrap();

        let err = loader().load(&path).await.unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus(_)));
    }

    #[tokio::test]
    async fn test_directory_skips_failures_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "name\nSecond\n").unwrap();
        std::fs::write(dir.path().join("a.csv"), "name\nFirst\n").unwrap();
        std::fs::write(dir.path().join("c.pdf"), b"not a pdf").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("d.csv"), "name\nNested\n").unwrap();

        let units = loader().load(dir.path()).await.unwrap();
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["name: First", "name: Second"]);
    }

    #[tokio::test]
    async fn test_directory_where_everything_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"not a pdf").unwrap();

        let err = loader().load(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus(_)));
    }
}
