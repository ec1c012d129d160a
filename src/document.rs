// SPDX-License-Identifier: MIT
//! In-memory document and `.cub` file persistence
//!
//! A thin controller around [`DocumentCodec`]: it owns one text buffer, its
//! metadata and the path it was last saved to. No codec logic lives here.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::DocumentCodec;
use crate::metadata::DocumentMetadata;
use crate::reader::DecodeError;
use crate::writer::EncodeError;

const WINDOW_TITLE: &str = "CUBITs Document";

/// Errors from saving or loading documents
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Document has no file path; use save_to")]
    NoPath,
}

/// Encode and write a document as the whole content of `path`
pub fn save_document(
    path: impl AsRef<Path>,
    text: &str,
    metadata: Option<&DocumentMetadata>,
) -> Result<(), DocumentError> {
    save_with(&DocumentCodec::new(), path.as_ref(), text, metadata)
}

/// Read and decode the document stored at `path`
pub fn load_document(path: impl AsRef<Path>) -> Result<(String, DocumentMetadata), DocumentError> {
    load_with(&DocumentCodec::new(), path.as_ref())
}

fn save_with(
    codec: &DocumentCodec,
    path: &Path,
    text: &str,
    metadata: Option<&DocumentMetadata>,
) -> Result<(), DocumentError> {
    let encoded = codec.encode(text, metadata)?;
    fs::write(path, &encoded)?;
    debug!("Wrote {} bytes to {:?}", encoded.len(), path);
    Ok(())
}

fn load_with(
    codec: &DocumentCodec,
    path: &Path,
) -> Result<(String, DocumentMetadata), DocumentError> {
    let raw = fs::read_to_string(path)?;
    // Editors tend to append a trailing newline
    let decoded = codec.decode(raw.trim_end())?;
    debug!("Read {} bytes from {:?}", raw.len(), path);
    Ok(decoded)
}

/// Summary figures for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
    /// UTF-8 size of the text
    pub text_bytes: usize,
    /// Serialized metadata size
    pub metadata_bytes: usize,
}

/// One open document
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    metadata: DocumentMetadata,
    path: Option<PathBuf>,
    codec: DocumentCodec,
}

impl Document {
    /// Empty, untitled, unsaved document
    pub fn new() -> Self {
        Self::with_codec(DocumentCodec::new())
    }

    pub fn with_codec(codec: DocumentCodec) -> Self {
        Self {
            text: String::new(),
            metadata: DocumentMetadata::untitled(),
            path: None,
            codec,
        }
    }

    /// Open a `.cub` file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        Self::open_with(DocumentCodec::new(), path)
    }

    pub fn open_with(codec: DocumentCodec, path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let (text, metadata) = load_with(&codec, path)?;
        info!("Document loaded: {}", path.display());
        Ok(Self {
            text,
            metadata,
            path: Some(path.to_path_buf()),
            codec,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DocumentMetadata {
        &mut self.metadata
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save to the current path
    pub fn save(&mut self) -> Result<(), DocumentError> {
        let path = self.path.clone().ok_or(DocumentError::NoPath)?;
        self.save_to(path)
    }

    /// Save to `path` and make it the current path
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        self.metadata.touch();
        save_with(&self.codec, path, &self.text, Some(&self.metadata))?;
        self.path = Some(path.to_path_buf());
        info!("Document saved: {}", path.display());
        Ok(())
    }

    /// Character, word and line counts
    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            characters: self.text.chars().count(),
            words: self.text.split_whitespace().count(),
            lines: self.text.matches('\n').count(),
            text_bytes: self.text.len(),
            metadata_bytes: self.metadata.to_bytes().map(|b| b.len()).unwrap_or(0),
        }
    }

    /// Window-style title including the file name when saved
    pub fn title_line(&self) -> String {
        match self.path.as_deref().and_then(Path::file_name) {
            Some(name) => format!("{} - {}", WINDOW_TITLE, name.to_string_lossy()),
            None => WINDOW_TITLE.to_string(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
