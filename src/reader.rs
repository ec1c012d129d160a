// SPDX-License-Identifier: MIT
//! Decode side of the document codec

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::{Decompress, FlushDecompress, Status};
use tracing::{debug, warn};

use crate::escape::{parse_escape, read_token};
use crate::format::LENGTH_PREFIX_SIZE;
use crate::matrix::RunTable;
use crate::metadata::DocumentMetadata;

/// Errors that can occur during decoding
///
/// Every variant is final for the given document: decoding is deterministic.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("bad encoding: {0}")]
    BadBase64(#[from] base64::DecodeError),

    #[error("bad compression: {0}")]
    BadCompression(String),

    #[error("bad metadata: {0}")]
    BadMetadata(String),
}

impl DecodeError {
    /// Short, stable failure reason
    pub fn reason(&self) -> &'static str {
        match self {
            DecodeError::BadBase64(_) => "bad encoding",
            DecodeError::BadCompression(_) => "bad compression",
            DecodeError::BadMetadata(_) => "bad metadata",
        }
    }
}

/// Decompress a complete zlib stream
///
/// A stream that ends before its final block is rejected rather than returned
/// as a prefix.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut inflater = Decompress::new(true);
    // zlib typically achieves 2-4x on text envelopes
    let mut out = Vec::with_capacity(data.len().saturating_mul(3).max(1024));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity().max(1024));
        }

        let before = (inflater.total_in(), inflater.total_out());
        let consumed = before.0 as usize;
        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
            .map_err(|e| DecodeError::BadCompression(e.to_string()))?;

        if status == Status::StreamEnd {
            return Ok(out);
        }

        let progressed = (inflater.total_in(), inflater.total_out()) != before;
        if !progressed && out.len() < out.capacity() {
            return Err(DecodeError::BadCompression(format!(
                "stream truncated after {} of {} bytes",
                inflater.total_in(),
                data.len()
            )));
        }
    }
}

/// Split an envelope into metadata bytes and content bytes
pub fn split_envelope(payload: &[u8]) -> Result<(&[u8], &[u8]), DecodeError> {
    if payload.len() < LENGTH_PREFIX_SIZE {
        return Err(DecodeError::BadMetadata(format!(
            "envelope is {} bytes, shorter than the length prefix",
            payload.len()
        )));
    }

    let (prefix, rest) = payload.split_at(LENGTH_PREFIX_SIZE);
    let meta_len = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    if meta_len > rest.len() {
        return Err(DecodeError::BadMetadata(format!(
            "metadata length {} exceeds remaining {} bytes",
            meta_len,
            rest.len()
        )));
    }

    Ok(rest.split_at(meta_len))
}

/// Recover text from concatenated CUBITs content runs
///
/// Each run begins with the value of the byte that produced it, so the run is
/// regenerated for that value and matched in full. Bytes that match no run are
/// consumed one token at a time (malformed escapes become U+0000).
pub fn decode_content(content: &[u8]) -> String {
    let table = RunTable::new();
    let mut text = String::with_capacity(content.len() / 6);
    let mut pos = 0;
    let mut resyncs = 0usize;

    while pos < content.len() {
        let rest = &content[pos..];

        let escaped = parse_escape(rest);
        let matched = escaped
            .into_iter()
            .chain(std::iter::once(rest[0]))
            .find(|&candidate| rest.starts_with(table.run(candidate)));

        if let Some(byte_val) = matched {
            text.push(char::from(byte_val));
            pos += table.run(byte_val).len();
            continue;
        }

        // Damaged or foreign run: fall back to token-at-a-time
        let Some(token) = read_token(rest) else {
            break;
        };
        resyncs += 1;
        text.push(char::from(token.value()));
        pos += token.width();
    }

    if resyncs > 0 {
        warn!(
            resyncs,
            "Content contained bytes outside any CUBITs run; decoded token by token"
        );
    }

    text
}

/// Decoder for `.cub` documents
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentReader;

impl DocumentReader {
    pub fn new() -> Self {
        Self
    }

    /// Decode a base64 document string into text and metadata
    ///
    /// Either everything is recovered or an error is returned; there are no
    /// partial results.
    pub fn decode(&self, doc: &str) -> Result<(String, DocumentMetadata), DecodeError> {
        let compressed = STANDARD.decode(doc)?;
        let payload = decompress(&compressed)?;
        let (meta_bytes, content) = split_envelope(&payload)?;

        let metadata = DocumentMetadata::from_bytes(meta_bytes)
            .map_err(|e| DecodeError::BadMetadata(e.to_string()))?;
        let text = decode_content(content);

        debug!(
            compressed_bytes = compressed.len(),
            payload_bytes = payload.len(),
            characters = text.chars().count(),
            "Decoded CUBITs document"
        );

        Ok((text, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{build_envelope, compress, encode_content};
    use base64::Engine as _;
    use flate2::Compression;

    fn wrap(payload: &[u8]) -> String {
        STANDARD.encode(compress(payload, Compression::default()).unwrap())
    }

    #[test]
    fn test_decode_content_inverts_encode() {
        let text: String = (0u8..=255).map(char::from).collect();
        let content = encode_content(&text).unwrap();
        assert_eq!(decode_content(&content), text);
    }

    #[test]
    fn test_decode_content_backslash_heavy_text() {
        let text = "\\x41\\\\xff\\";
        let content = encode_content(text).unwrap();
        assert_eq!(decode_content(&content), text);
    }

    #[test]
    fn test_decode_content_empty() {
        assert_eq!(decode_content(b""), "");
    }

    #[test]
    fn test_malformed_escape_resyncs() {
        let mut content = encode_content("Hi").unwrap();
        let tail = encode_content("yo").unwrap();
        content.extend_from_slice(b"\\xZZ");
        content.extend_from_slice(&tail);

        assert_eq!(decode_content(&content), "Hi\u{0}yo");
    }

    #[test]
    fn test_split_envelope() {
        let payload = build_envelope(b"{\"a\":\"b\"}", b"rest").unwrap();
        let (meta, content) = split_envelope(&payload).unwrap();
        assert_eq!(meta, b"{\"a\":\"b\"}");
        assert_eq!(content, b"rest");
    }

    #[test]
    fn test_split_envelope_short() {
        let err = split_envelope(b"\x00\x00").unwrap_err();
        assert_eq!(err.reason(), "bad metadata");
    }

    #[test]
    fn test_split_envelope_length_past_end() {
        let err = split_envelope(b"\x00\x00\x00\x09{}").unwrap_err();
        assert_eq!(err.reason(), "bad metadata");
    }

    #[test]
    fn test_decode_bad_base64() {
        let err = DocumentReader::new().decode("not base64!").unwrap_err();
        assert!(matches!(err, DecodeError::BadBase64(_)));
        assert_eq!(err.reason(), "bad encoding");
    }

    #[test]
    fn test_decode_bad_compression() {
        let doc = STANDARD.encode(b"plain bytes, not zlib");
        let err = DocumentReader::new().decode(&doc).unwrap_err();
        assert!(matches!(err, DecodeError::BadCompression(_)));
        assert_eq!(err.reason(), "bad compression");
    }

    #[test]
    fn test_decompress_truncated_stream() {
        let compressed = compress(&[7u8; 4096], Compression::default()).unwrap();
        let err = decompress(&compressed[..compressed.len() - 3]).unwrap_err();
        assert!(matches!(err, DecodeError::BadCompression(_)));
        assert!(decompress(&[]).is_err());
    }

    #[test]
    fn test_decompress_round_trip() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let compressed = compress(&data, Compression::best()).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_decode_bad_metadata_json() {
        let doc = wrap(&build_envelope(b"{oops", b"").unwrap());
        let err = DocumentReader::new().decode(&doc).unwrap_err();
        assert!(matches!(err, DecodeError::BadMetadata(_)));
    }

    #[test]
    fn test_decode_manual_envelope() {
        let content = encode_content("ok").unwrap();
        let doc = wrap(&build_envelope(br#"{"title":"x","tags":[]}"#, &content).unwrap());
        let (text, meta) = DocumentReader::new().decode(&doc).unwrap();
        assert_eq!(text, "ok");
        assert_eq!(meta.title.as_deref(), Some("x"));
        assert_eq!(meta.tags, Some(vec![]));
    }
}
