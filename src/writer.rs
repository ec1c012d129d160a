// SPDX-License-Identifier: MIT
//! Encode side of the document codec
//!
//! Builds the envelope `len(meta) BE u32 || meta JSON || content`, deflates it
//! with zlib and wraps the result in standard base64.

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::debug;

use crate::format::{LENGTH_PREFIX_SIZE, MAX_CODE_POINT};
use crate::matrix::RunTable;
use crate::metadata::DocumentMetadata;

/// Errors that can occur during encoding
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Unsupported character {ch:?} at position {position}: only U+0000..U+00FF can be encoded")]
    UnsupportedCharacter { ch: char, position: usize },

    #[error("Metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Metadata too large: {0} bytes")]
    MetadataTooLarge(usize),

    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),
}

/// Transform text into the concatenated CUBITs content runs
///
/// Characters above U+00FF are rejected rather than truncated.
pub fn encode_content(text: &str) -> Result<Vec<u8>, EncodeError> {
    let table = RunTable::new();
    let mut content = Vec::with_capacity(text.len().saturating_mul(12));

    for (position, ch) in text.chars().enumerate() {
        let code = ch as u32;
        if code > MAX_CODE_POINT {
            return Err(EncodeError::UnsupportedCharacter { ch, position });
        }
        content.extend_from_slice(table.run(code as u8));
    }

    Ok(content)
}

/// Build the uncompressed envelope from metadata bytes and content
pub fn build_envelope(metadata: &[u8], content: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let meta_len =
        u32::try_from(metadata.len()).map_err(|_| EncodeError::MetadataTooLarge(metadata.len()))?;

    let mut payload = Vec::with_capacity(LENGTH_PREFIX_SIZE + metadata.len() + content.len());
    payload.extend_from_slice(&meta_len.to_be_bytes());
    payload.extend_from_slice(metadata);
    payload.extend_from_slice(content);
    Ok(payload)
}

/// Compress data using zlib at the given level
pub fn compress(data: &[u8], level: Compression) -> Result<Vec<u8>, EncodeError> {
    // Text envelopes usually deflate to well under half their size
    let estimated_size = (data.len() / 2).max(256);
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(estimated_size), level);
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Encoder for `.cub` documents
#[derive(Debug, Clone, Copy)]
pub struct DocumentWriter {
    level: Compression,
}

impl DocumentWriter {
    pub fn new(level: Compression) -> Self {
        Self { level }
    }

    /// Encode text and metadata into a base64 document string
    ///
    /// `None` metadata is replaced by [`DocumentMetadata::generated`].
    pub fn encode(
        &self,
        text: &str,
        metadata: Option<&DocumentMetadata>,
    ) -> Result<String, EncodeError> {
        let meta_bytes = match metadata {
            Some(meta) => meta.to_bytes()?,
            None => DocumentMetadata::generated().to_bytes()?,
        };

        let content = encode_content(text)?;
        let payload = build_envelope(&meta_bytes, &content)?;
        let compressed = compress(&payload, self.level)?;

        debug!(
            metadata_bytes = meta_bytes.len(),
            content_bytes = content.len(),
            payload_bytes = payload.len(),
            compressed_bytes = compressed.len(),
            "Encoded CUBITs document"
        );

        Ok(STANDARD.encode(compressed))
    }
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new(Compression::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_content_concatenates_runs() {
        let content = encode_content("Aa").unwrap();
        assert_eq!(content, b"A\\x82\\x05\\x0a\\x14(a\\xc2\\x85\\x0b\\x16,".to_vec());
    }

    #[test]
    fn test_encode_content_empty() {
        assert!(encode_content("").unwrap().is_empty());
    }

    #[test]
    fn test_encode_content_accepts_latin1() {
        assert!(encode_content("caf\u{e9} \u{ff}").is_ok());
    }

    #[test]
    fn test_encode_content_rejects_wide_chars() {
        let err = encode_content("ab\u{20ac}").unwrap_err();
        match err {
            EncodeError::UnsupportedCharacter { ch, position } => {
                assert_eq!(ch, '\u{20ac}');
                assert_eq!(position, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_envelope_layout() {
        let payload = build_envelope(b"{}", b"xyz").unwrap();
        assert_eq!(payload, b"\x00\x00\x00\x02{}xyz".to_vec());
    }

    #[test]
    fn test_encode_output_is_base64() {
        let writer = DocumentWriter::default();
        let doc = writer.encode("Hello", None).unwrap();
        assert!(!doc.is_empty());
        assert!(doc
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='));
        assert!(!doc.contains('\n'));
    }

    #[test]
    fn test_compression_levels_differ_only_in_size() {
        let text = "the quick brown fox ".repeat(50);
        let meta = DocumentMetadata::new().with_title("t");
        let fast = DocumentWriter::new(Compression::fast())
            .encode(&text, Some(&meta))
            .unwrap();
        let none = DocumentWriter::new(Compression::none())
            .encode(&text, Some(&meta))
            .unwrap();
        assert!(fast.len() < none.len());
    }
}
