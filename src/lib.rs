// SPDX-License-Identifier: MIT
//! # CUBITs Document Codec
//!
//! Text documents stored as `.cub` files: every character is expanded into a
//! 6x8 bit-rotation matrix, flattened back into printable bytes, wrapped with a
//! JSON metadata block, deflated and base64-encoded.
//!
//! ## Format Specification
//!
//! ```text
//! CUBITs document (.cub)
//! ======================
//!
//! File: one line of standard base64 (no wrapping) of
//!   zlib(
//!     Metadata length: u32, big-endian (4 bytes)
//!     Metadata: compact JSON object, string values, optional "tags" array
//!     Content: concatenated per-character runs
//!   )
//!
//! Per-character run (characters U+0000..U+00FF):
//!   row i = byte rotated left by i bits, i = 0..5
//!   printable rows (0x20..=0x7e) are written as-is
//!   other rows pass through an 8-bit accumulator and are written as `\xHH`
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cubits::{DocumentCodec, DocumentMetadata};
//!
//! let codec = DocumentCodec::new();
//! let meta = DocumentMetadata::new().with_title("Notes").with_tags(["draft"]);
//!
//! let doc = codec.encode("Hello, CUBITs!", Some(&meta)).unwrap();
//! let (text, decoded_meta) = codec.decode(&doc).unwrap();
//!
//! assert_eq!(text, "Hello, CUBITs!");
//! assert_eq!(decoded_meta, meta);
//! ```
//!
//! Decoding either recovers the full text and metadata or fails with a
//! [`DecodeError`]; failures are never reported through the text itself.

pub mod codec;
pub mod config;
pub mod document;
pub mod escape;
pub mod format;
pub mod matrix;
pub mod metadata;
pub mod reader;
pub mod writer;

// Re-export main types
pub use codec::DocumentCodec;
pub use config::Config;
pub use document::{load_document, save_document, Document, DocumentError, DocumentStats};
pub use escape::deserialize_run;
pub use format::{DEFAULT_ENCODING, DOCUMENT_EXTENSION};
pub use matrix::{build_matrix, encode_byte, serialize_matrix, BitMatrix};
pub use metadata::DocumentMetadata;
pub use reader::{DecodeError, DocumentReader};
pub use writer::{DocumentWriter, EncodeError};
