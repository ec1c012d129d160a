// SPDX-License-Identifier: MIT
//! CUBITs bit-matrix transform
//!
//! Each input byte is expanded into a 6x8 bit matrix whose row `i` is the byte
//! rotated left by `i` bits. The matrix is then flattened back into bytes:
//! printable rows are emitted directly, the rest are pooled in a bit
//! accumulator, re-chunked to 8 bits and escaped when still non-printable.
//!
//! ```text
//! 0x41 = 01000001
//!   row 0  01000001  'A'    -> A
//!   row 1  10000010  0x82   -> \x82
//!   row 2  00000101  0x05   -> \x05
//!   row 3  00001010  0x0a   -> \x0a
//!   row 4  00010100  0x14   -> \x14
//!   row 5  00101000  '('    -> (
//! ```

use crate::escape::write_escape;
use crate::format::{is_printable, MATRIX_COLS, MATRIX_ROWS};

/// 6x8 bit matrix derived from one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitMatrix {
    rows: [u8; MATRIX_ROWS],
}

impl BitMatrix {
    /// Wrap raw rows (each row is 8 bits, MSB first)
    pub fn from_rows(rows: [u8; MATRIX_ROWS]) -> Self {
        Self { rows }
    }

    /// Rows as 8-bit values
    #[inline]
    pub fn rows(&self) -> &[u8; MATRIX_ROWS] {
        &self.rows
    }

    /// Single cell, column 0 being the most significant bit
    #[inline]
    pub fn bit(&self, row: usize, col: usize) -> bool {
        debug_assert!(row < MATRIX_ROWS && col < MATRIX_COLS);
        (self.rows[row] >> (MATRIX_COLS - 1 - col)) & 1 == 1
    }
}

/// Expand a byte into its rotation matrix
pub fn build_matrix(byte_val: u8) -> BitMatrix {
    let mut rows = [0u8; MATRIX_ROWS];
    for (i, row) in rows.iter_mut().enumerate() {
        *row = byte_val.rotate_left(i as u32);
    }
    BitMatrix { rows }
}

/// FIFO of bits waiting to be re-chunked into bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct BitAccumulator {
    bits: u32,
    len: u32,
}

impl BitAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending bits
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append the low `count` bits of `value`, most significant first
    pub fn push_bits(&mut self, value: u8, count: u32) {
        debug_assert!(count <= 8 && self.len + count <= 32);
        let mask = (1u32 << count) - 1;
        self.bits = (self.bits << count) | (value as u32 & mask);
        self.len += count;
    }

    /// Remove the oldest 8 bits when at least 8 are pending
    pub fn pop_byte(&mut self) -> Option<u8> {
        if self.len < 8 {
            return None;
        }
        self.len -= 8;
        let byte = (self.bits >> self.len) as u8;
        self.bits &= (1u32 << self.len) - 1;
        Some(byte)
    }

    /// Drain a trailing partial chunk, right-padded with zero bits
    pub fn flush_padded(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        let byte = (self.bits << (8 - self.len)) as u8;
        self.bits = 0;
        self.len = 0;
        Some(byte)
    }
}

#[inline]
fn emit(value: u8, out: &mut Vec<u8>) {
    if is_printable(value) {
        out.push(value);
    } else {
        write_escape(value, out);
    }
}

/// Flatten a matrix into printable bytes, appending to `out`
pub fn serialize_matrix_into(matrix: &BitMatrix, out: &mut Vec<u8>) {
    let mut acc = BitAccumulator::new();

    for &row in matrix.rows() {
        if is_printable(row) {
            out.push(row);
            continue;
        }
        acc.push_bits(row, MATRIX_COLS as u32);
        while let Some(chunk) = acc.pop_byte() {
            emit(chunk, out);
        }
    }

    if let Some(tail) = acc.flush_padded() {
        emit(tail, out);
    }
}

/// Flatten a matrix into printable bytes
pub fn serialize_matrix(matrix: &BitMatrix) -> Vec<u8> {
    let mut out = Vec::with_capacity(MATRIX_ROWS * 4);
    serialize_matrix_into(matrix, &mut out);
    out
}

/// Encoded run for a single byte (build + serialize)
#[inline]
pub fn encode_byte(byte_val: u8) -> Vec<u8> {
    serialize_matrix(&build_matrix(byte_val))
}

/// Precomputed encoded runs for all 256 byte values
///
/// Built once per encode/decode call; never shared between calls.
pub struct RunTable {
    runs: Vec<Vec<u8>>,
}

impl RunTable {
    pub fn new() -> Self {
        Self {
            runs: (0..=u8::MAX).map(encode_byte).collect(),
        }
    }

    /// Encoded run for a byte
    #[inline]
    pub fn run(&self, byte_val: u8) -> &[u8] {
        &self.runs[byte_val as usize]
    }
}

impl Default for RunTable {
    fn default() -> Self {
        Self::new()
    }
}
