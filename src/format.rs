// SPDX-License-Identifier: MIT
//! CUBITs document format constants
//!
//! Defines the fixed parameters of the matrix transform and the `.cub` envelope.

/// Number of rows in a CUBITs matrix (rotations 0..=5)
pub const MATRIX_ROWS: usize = 6;

/// Number of bit columns per row
pub const MATRIX_COLS: usize = 8;

/// Lowest byte value emitted verbatim (space)
pub const PRINTABLE_MIN: u8 = 32;

/// Highest byte value emitted verbatim (tilde)
pub const PRINTABLE_MAX: u8 = 126;

/// Escape token prefix: backslash followed by `x`
pub const ESCAPE_PREFIX: &[u8; 2] = b"\\x";

/// Escape token length in bytes (`\xHH`)
pub const ESCAPE_LEN: usize = 4;

/// Width of the big-endian metadata length prefix
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Encoding tag written into generated metadata
pub const DEFAULT_ENCODING: &str = "UTF-8-CUBITs";

/// Document format version written into generated metadata
pub const DEFAULT_VERSION: &str = "1.0";

/// Title given to freshly created documents
pub const UNTITLED_TITLE: &str = "Untitled document";

/// File extension for CUBITs documents (without the dot)
pub const DOCUMENT_EXTENSION: &str = "cub";

/// Largest code point the codec accepts
pub const MAX_CODE_POINT: u32 = 0xFF;

/// Check whether a value is emitted as-is rather than escaped
#[inline]
pub fn is_printable(value: u8) -> bool {
    (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&value)
}
