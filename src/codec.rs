// SPDX-License-Identifier: MIT
//! Document codec facade
//!
//! Stateless: every call receives its whole input and returns its whole output,
//! so one codec can be shared freely.

use flate2::Compression;

use crate::config::Config;
use crate::metadata::DocumentMetadata;
use crate::reader::{DecodeError, DocumentReader};
use crate::writer::{DocumentWriter, EncodeError};

/// Encodes and decodes `.cub` document strings
#[derive(Debug, Clone, Copy)]
pub struct DocumentCodec {
    writer: DocumentWriter,
    reader: DocumentReader,
}

impl DocumentCodec {
    /// Codec with zlib's default compression level
    pub fn new() -> Self {
        Self::with_level(Compression::default().level())
    }

    /// Codec with an explicit zlib level (clamped to 9)
    pub fn with_level(level: u32) -> Self {
        Self {
            writer: DocumentWriter::new(Compression::new(level.min(9))),
            reader: DocumentReader::new(),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        Self::with_level(config.compression_level)
    }

    /// Encode text (code points U+0000..U+00FF) and optional metadata
    ///
    /// Without metadata, a fresh [`DocumentMetadata::generated`] record is used.
    pub fn encode(
        &self,
        text: &str,
        metadata: Option<&DocumentMetadata>,
    ) -> Result<String, EncodeError> {
        self.writer.encode(text, metadata)
    }

    /// Decode a document string back into text and metadata
    pub fn decode(&self, doc: &str) -> Result<(String, DocumentMetadata), DecodeError> {
        self.reader.decode(doc)
    }
}

impl Default for DocumentCodec {
    fn default() -> Self {
        Self::new()
    }
}
