//! Document unit and chunk types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Extensions the loader understands, lowercase and without the dot
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "pdf", "csv", "doc", "docx", "jpg", "jpeg", "png", "gif", "bmp", "webp",
];

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Comma-separated values
    Csv,
    /// Legacy Word document (.doc)
    Doc,
    /// Word document (.docx)
    Docx,
    /// Image, transcribed by a vision model
    Image,
    /// Anything else
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "csv" => Self::Csv,
            "doc" => Self::Doc,
            "docx" => Self::Docx,
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a path or filename
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Tag stored in document metadata under `type`
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Image => "image",
            Self::Unknown => "unknown",
        }
    }
}

/// Lowercase extension of a filename, without the dot
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// A piece of loaded text with its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentUnit {
    /// Extracted text
    pub text: String,
    /// Metadata such as `source`, `type`, `page`, `row`
    pub metadata: BTreeMap<String, String>,
}

impl DocumentUnit {
    /// Create a unit tagged with its source path and type
    pub fn new(text: impl Into<String>, source: &Path, file_type: FileType) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), source.display().to_string());
        metadata.insert("type".to_string(), file_type.tag().to_string());
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Add a metadata entry
    pub fn with_meta(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Metadata lookup
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Whether the unit has any non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A bounded slice of a document unit, ready for embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the overall chunk sequence
    pub index: u32,
    /// Index of the source unit
    pub unit_index: usize,
    /// Chunk text
    pub text: String,
    /// Byte offset of the chunk start within the unit text
    pub byte_start: usize,
    /// Byte offset one past the chunk end within the unit text
    pub byte_end: usize,
    /// Metadata inherited from the unit
    pub metadata: BTreeMap<String, String>,
}
