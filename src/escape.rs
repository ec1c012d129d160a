// SPDX-License-Identifier: MIT
//! Escape tokens for non-printable values
//!
//! A value outside the printable range is written as the four printable bytes
//! `\xHH` (lowercase hex). The scanner here splits a byte run back into values.

use crate::format::{ESCAPE_LEN, ESCAPE_PREFIX};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Build the escape token for a value
#[inline]
pub fn escape_token(value: u8) -> [u8; ESCAPE_LEN] {
    [
        ESCAPE_PREFIX[0],
        ESCAPE_PREFIX[1],
        HEX_DIGITS[(value >> 4) as usize],
        HEX_DIGITS[(value & 0x0f) as usize],
    ]
}

/// Append the escape token for a value to a buffer
#[inline]
pub fn write_escape(value: u8, out: &mut Vec<u8>) {
    out.extend_from_slice(&escape_token(value));
}

/// One token read from an encoded run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A single byte taken as-is
    Literal(u8),
    /// A well-formed `\xHH` escape
    Escape(u8),
    /// A `\x` prefix whose digits are not hex; decodes to zero
    Malformed,
}

impl Token {
    /// Value this token stands for
    pub fn value(self) -> u8 {
        match self {
            Token::Literal(v) | Token::Escape(v) => v,
            Token::Malformed => 0,
        }
    }

    /// Number of input bytes the token occupies
    pub fn width(self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Escape(_) | Token::Malformed => ESCAPE_LEN,
        }
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Parse a complete `\xHH` token at the start of `bytes`
///
/// Returns `None` when the bytes do not start with a well-formed escape.
pub fn parse_escape(bytes: &[u8]) -> Option<u8> {
    if bytes.len() < ESCAPE_LEN || !bytes.starts_with(ESCAPE_PREFIX) {
        return None;
    }
    let hi = hex_value(bytes[2])?;
    let lo = hex_value(bytes[3])?;
    Some((hi << 4) | lo)
}

/// Read the next token from the start of `bytes`
pub fn read_token(bytes: &[u8]) -> Option<Token> {
    let first = *bytes.first()?;
    if bytes.len() >= ESCAPE_LEN && bytes.starts_with(ESCAPE_PREFIX) {
        return Some(match parse_escape(bytes) {
            Some(v) => Token::Escape(v),
            None => Token::Malformed,
        });
    }
    Some(Token::Literal(first))
}

/// Split an encoded run into the values it carries
///
/// Each `\xHH` becomes one value, a malformed `\x..` becomes zero, and every
/// other byte stands for itself. Never fails.
pub fn deserialize_run(bytes: &[u8]) -> Vec<u8> {
    let mut values = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while let Some(token) = read_token(&bytes[pos..]) {
        values.push(token.value());
        pos += token.width();
    }
    values
}
