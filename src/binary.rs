//! Binary reading utilities for parsing replay files.
//!
//! [`ByteReader`] is a forward-only cursor over a fully buffered byte slice.
//! It reads little-endian integers, fixed-size raw regions and the two kinds
//! of null-terminated strings found in replay headers. Every read is bounds
//! checked; nothing above this module performs raw byte arithmetic.
//!
//! # Example
//!
//! ```
//! use genrep_parser::binary::ByteReader;
//!
//! let data = [0x34, 0x12, b'H', b'i', 0x00, b'O', 0x00, b'k', 0x00, 0x00, 0x00];
//! let mut reader = ByteReader::new(&data);
//!
//! assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
//! assert_eq!(reader.read_cstring().unwrap(), "Hi");
//! assert_eq!(reader.read_cstring_utf16().unwrap(), "Ok");
//! assert!(reader.is_empty());
//! ```

use crate::error::{ParserError, Result};

/// A forward-only little-endian reader over a byte slice.
///
/// The reader owns only its position; each decode creates its own reader,
/// so no state is shared between decodes.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, offset: 0 }
    }

    /// Current position, in bytes from the start of the buffer.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Returns whether every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns up to `len` upcoming bytes without consuming them.
    #[must_use]
    pub fn peek(&self, len: usize) -> &'a [u8] {
        let end = std::cmp::min(self.offset + len, self.data.len());
        &self.data[self.offset..end]
    }

    /// Consumes exactly `len` bytes and returns them verbatim.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedInput` if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.offset + len;
        if end > self.data.len() {
            return Err(ParserError::truncated(end, self.data.len()));
        }

        let slice = &self.data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    /// Consumes exactly `N` bytes into a fixed-size array.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedInput` if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads a little-endian u16.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedInput` if fewer than 2 bytes remain.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian u32.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedInput` if fewer than 4 bytes remain.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads a null-terminated single-byte string.
    ///
    /// Bytes are consumed up to and including the first zero byte. Reaching
    /// the end of input before a terminator ends the string without error.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidEncoding` if the bytes are not valid text.
    pub fn read_cstring(&mut self) -> Result<String> {
        let start = self.offset;
        let rest = &self.data[start..];
        let len = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());

        let bytes = &rest[..len];
        // Skip the terminator too, if there is one.
        self.offset = std::cmp::min(start + len + 1, self.data.len());

        String::from_utf8(bytes.to_vec()).map_err(|e| ParserError::InvalidEncoding {
            offset: start,
            reason: e.to_string(),
        })
    }

    /// Reads a null-terminated UTF-16LE string.
    ///
    /// Two-byte units are consumed up to and including the first zero unit.
    /// Reaching the end of input on a unit boundary ends the string without
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidEncoding` if an odd trailing byte is left
    /// over or the units are not valid UTF-16.
    pub fn read_cstring_utf16(&mut self) -> Result<String> {
        let start = self.offset;
        let mut units = Vec::new();

        loop {
            match self.remaining() {
                0 => break,
                1 => {
                    self.offset += 1;
                    return Err(ParserError::InvalidEncoding {
                        offset: start,
                        reason: "odd trailing byte in UTF-16 string".to_string(),
                    });
                }
                _ => {}
            }

            let unit = self.read_u16_le()?;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }

        String::from_utf16(&units).map_err(|e| ParserError::InvalidEncoding {
            offset: start,
            reason: e.to_string(),
        })
    }

    /// Like [`read_cstring`](Self::read_cstring), but a missing terminator
    /// is a truncation.
    ///
    /// # Errors
    ///
    /// - `ParserError::TruncatedInput` if no zero byte remains
    /// - `ParserError::InvalidEncoding` as for `read_cstring`
    pub fn read_terminated_cstring(&mut self) -> Result<String> {
        if !self.data[self.offset..].contains(&0) {
            return Err(ParserError::truncated(self.data.len() + 1, self.data.len()));
        }
        self.read_cstring()
    }

    /// Like [`read_cstring_utf16`](Self::read_cstring_utf16), but a missing
    /// terminator unit is a truncation.
    ///
    /// # Errors
    ///
    /// - `ParserError::TruncatedInput` if no zero unit remains
    /// - `ParserError::InvalidEncoding` as for `read_cstring_utf16`
    pub fn read_terminated_cstring_utf16(&mut self) -> Result<String> {
        let rest = &self.data[self.offset..];
        let terminated = rest
            .chunks_exact(2)
            .any(|unit| unit[0] == 0 && unit[1] == 0);

        if !terminated {
            let expected = self.offset + (rest.len() / 2 + 1) * 2;
            return Err(ParserError::truncated(expected, self.data.len()));
        }
        self.read_cstring_utf16()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    // ========================
    // integer tests
    // ========================

    #[test]
    fn test_read_u16_le_sequence() {
        let data = [0x34, 0x12, 0xFF, 0xFF];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u16_le().unwrap(), 0xFFFF);
        assert_eq!(reader.offset(), 4);
    }

    #[test]
    fn test_read_u32_le_basic() {
        let data = [0x78, 0x56, 0x34, 0x12];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u32_le().unwrap(), 0x1234_5678);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_u16_le_truncated() {
        let data = [0x00, 0x00, 0x34];
        let mut reader = ByteReader::new(&data);
        reader.read_u16_le().unwrap();
        assert!(matches!(
            reader.read_u16_le(),
            Err(ParserError::TruncatedInput {
                expected: 4,
                available: 3
            })
        ));
    }

    #[test]
    fn test_read_u32_le_empty() {
        let mut reader = ByteReader::new(&[]);
        assert!(matches!(
            reader.read_u32_le(),
            Err(ParserError::TruncatedInput { .. })
        ));
    }

    // ========================
    // raw region tests
    // ========================

    #[test]
    fn test_read_bytes_and_array() {
        let data = b"GENREP\x01\x02\x03\x04";
        let mut reader = ByteReader::new(data);
        assert_eq!(reader.read_bytes(6).unwrap(), b"GENREP");
        assert_eq!(reader.read_array::<4>().unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_read_bytes_overflow_does_not_advance() {
        let data = b"GENREP";
        let mut reader = ByteReader::new(data);
        assert!(matches!(
            reader.read_bytes(8),
            Err(ParserError::TruncatedInput {
                expected: 8,
                available: 6
            })
        ));
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn test_peek_is_clamped() {
        let reader = ByteReader::new(b"GEN");
        assert_eq!(reader.peek(8), b"GEN");
        assert_eq!(reader.offset(), 0);
    }

    // ========================
    // single-byte string tests
    // ========================

    #[test]
    fn test_read_cstring_basic() {
        let mut reader = ByteReader::new(b"Hello\x00World\x00");
        assert_eq!(reader.read_cstring().unwrap(), "Hello");
        assert_eq!(reader.read_cstring().unwrap(), "World");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_cstring_unterminated() {
        let mut reader = ByteReader::new(b"NoNull");
        assert_eq!(reader.read_cstring().unwrap(), "NoNull");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_cstring_empty() {
        let mut reader = ByteReader::new(b"\x00rest");
        assert_eq!(reader.read_cstring().unwrap(), "");
        assert_eq!(reader.offset(), 1);
    }

    #[test]
    fn test_read_cstring_invalid() {
        let mut reader = ByteReader::new(&[b'o', 0xFF, 0xFE, 0x00]);
        assert!(matches!(
            reader.read_cstring(),
            Err(ParserError::InvalidEncoding { offset: 0, .. })
        ));
    }

    // ========================
    // UTF-16 string tests
    // ========================

    #[test]
    fn test_read_cstring_utf16_basic() {
        let mut data = utf16("Last Replay");
        data.extend_from_slice(&[0, 0, 0xAA]);
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_cstring_utf16().unwrap(), "Last Replay");
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_read_cstring_utf16_non_ascii() {
        let mut data = utf16("Gefecht über Dächern");
        data.extend_from_slice(&[0, 0]);
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_cstring_utf16().unwrap(), "Gefecht über Dächern");
    }

    #[test]
    fn test_read_cstring_utf16_unterminated() {
        let data = utf16("1.04");
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_cstring_utf16().unwrap(), "1.04");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_cstring_utf16_odd_trailing_byte() {
        let mut data = utf16("ab");
        data.push(b'c');
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            reader.read_cstring_utf16(),
            Err(ParserError::InvalidEncoding { offset: 0, .. })
        ));
    }

    #[test]
    fn test_read_terminated_cstring() {
        let mut reader = ByteReader::new(b"US=1\x00");
        assert_eq!(reader.read_terminated_cstring().unwrap(), "US=1");

        let mut reader = ByteReader::new(b"US=1");
        assert!(matches!(
            reader.read_terminated_cstring(),
            Err(ParserError::TruncatedInput {
                expected: 5,
                available: 4
            })
        ));
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn test_read_terminated_cstring_utf16() {
        let mut data = utf16("1.04");
        data.extend_from_slice(&[0, 0]);
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_terminated_cstring_utf16().unwrap(), "1.04");

        // A terminator split across a unit boundary does not count.
        let data = [b'a', 0x00, 0x00, b'b'];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            reader.read_terminated_cstring_utf16(),
            Err(ParserError::TruncatedInput {
                expected: 6,
                available: 4
            })
        ));

        let data = [b'a', 0x00, b'b'];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            reader.read_terminated_cstring_utf16(),
            Err(ParserError::TruncatedInput {
                expected: 4,
                available: 3
            })
        ));
    }

    #[test]
    fn test_read_cstring_utf16_lone_surrogate() {
        let data = [0x00, 0xD8, 0x00, 0x00];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            reader.read_cstring_utf16(),
            Err(ParserError::InvalidEncoding { .. })
        ));
    }
}
