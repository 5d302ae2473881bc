//! Variant detection for replay files.
//!
//! Replays from the SAGE engine family start with a plain-text marker naming
//! the game they were recorded with:
//!
//! - **Generals / Zero Hour**: `GENREP` (6 bytes)
//! - **Battle for Middle-earth**: `BFMEREPL` (8 bytes)
//! - **Battle for Middle-earth II**: `BFME2RPL` (8 bytes)
//!
//! Only the Generals body layout is decoded. The other two markers are
//! recognised so that callers get `UnsupportedVariant` instead of a generic
//! format error.
//!
//! # Example
//!
//! ```
//! use genrep_parser::binary::ByteReader;
//! use genrep_parser::format::{detect_game_type, GameType};
//!
//! let mut reader = ByteReader::new(b"GENREP\x00\x00");
//! assert_eq!(detect_game_type(&mut reader).unwrap(), GameType::Generals);
//! assert_eq!(reader.offset(), 6);
//! ```

use std::fmt;

use serde::Serialize;

use crate::binary::ByteReader;
use crate::error::{ParserError, Result};

/// The marker for Generals and Zero Hour replays.
pub const GENERALS_MAGIC: &[u8; 6] = b"GENREP";

/// The marker for Battle for Middle-earth replays.
pub const BFME_MAGIC: &[u8; 8] = b"BFMEREPL";

/// The marker for Battle for Middle-earth II replays.
pub const BFME2_MAGIC: &[u8; 8] = b"BFME2RPL";

/// The game family a replay was recorded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameType {
    /// Command & Conquer: Generals and Zero Hour. Fully decodable.
    Generals,
    /// The Lord of the Rings: The Battle for Middle-earth.
    Bfme,
    /// The Lord of the Rings: The Battle for Middle-earth II.
    Bfme2,
}

impl GameType {
    /// Returns the file marker for this game type.
    #[must_use]
    pub const fn magic(&self) -> &'static [u8] {
        match self {
            GameType::Generals => GENERALS_MAGIC,
            GameType::Bfme => BFME_MAGIC,
            GameType::Bfme2 => BFME2_MAGIC,
        }
    }

    /// Returns whether the body layout of this game type can be decoded.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        matches!(self, GameType::Generals)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameType::Generals => "GENERALS",
            GameType::Bfme => "BFME",
            GameType::Bfme2 => "BFME2",
        };
        f.write_str(name)
    }
}

/// Reads the variant tag and consumes exactly the matching marker.
///
/// All three markers are compared against the bytes at the start of the
/// file. On failure nothing is consumed.
///
/// # Errors
///
/// - `ParserError::TruncatedInput` if the input ends before a marker can be
///   told apart (fewer than 6 bytes, or a partial 8-byte marker)
/// - `ParserError::UnrecognizedFormat` if no marker matches
pub fn detect_game_type(reader: &mut ByteReader<'_>) -> Result<GameType> {
    let head = reader.peek(BFME_MAGIC.len());

    if head.len() < GENERALS_MAGIC.len() {
        return Err(ParserError::truncated(
            reader.offset() + GENERALS_MAGIC.len(),
            reader.offset() + head.len(),
        ));
    }

    let game_type = if head.starts_with(GENERALS_MAGIC) {
        GameType::Generals
    } else if head == BFME_MAGIC {
        GameType::Bfme
    } else if head == BFME2_MAGIC {
        GameType::Bfme2
    } else if head.len() < BFME_MAGIC.len()
        && (BFME_MAGIC.starts_with(head) || BFME2_MAGIC.starts_with(head))
    {
        return Err(ParserError::truncated(
            reader.offset() + BFME_MAGIC.len(),
            reader.offset() + head.len(),
        ));
    } else {
        return Err(ParserError::unrecognized_format(head));
    };

    reader.read_bytes(game_type.magic().len())?;
    Ok(game_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(data: &[u8]) -> Result<GameType> {
        detect_game_type(&mut ByteReader::new(data))
    }

    #[test]
    fn test_detect_generals() {
        let mut reader = ByteReader::new(b"GENREP\x10\x20\x30\x40");
        assert_eq!(detect_game_type(&mut reader).unwrap(), GameType::Generals);
        assert_eq!(reader.offset(), 6);
    }

    #[test]
    fn test_detect_generals_exact_length() {
        assert_eq!(detect(b"GENREP").unwrap(), GameType::Generals);
    }

    #[test]
    fn test_detect_bfme_variants() {
        let mut reader = ByteReader::new(b"BFMEREPL\x00\x00");
        assert_eq!(detect_game_type(&mut reader).unwrap(), GameType::Bfme);
        assert_eq!(reader.offset(), 8);

        assert_eq!(detect(b"BFME2RPL").unwrap(), GameType::Bfme2);
    }

    #[test]
    fn test_detect_unrecognized() {
        let mut reader = ByteReader::new(b"NOTAREPLAY");
        assert!(matches!(
            detect_game_type(&mut reader),
            Err(ParserError::UnrecognizedFormat { .. })
        ));
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn test_detect_unrecognized_six_bytes() {
        assert!(matches!(
            detect(b"GENREQ"),
            Err(ParserError::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            detect(b"GENR"),
            Err(ParserError::TruncatedInput {
                expected: 6,
                available: 4
            })
        ));
        assert!(matches!(
            detect(b""),
            Err(ParserError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_detect_partial_bfme_marker() {
        assert!(matches!(
            detect(b"BFME2R"),
            Err(ParserError::TruncatedInput {
                expected: 8,
                available: 6
            })
        ));
    }

    #[test]
    fn test_game_type_display() {
        assert_eq!(GameType::Generals.to_string(), "GENERALS");
        assert_eq!(GameType::Bfme.to_string(), "BFME");
        assert_eq!(GameType::Bfme2.to_string(), "BFME2");
    }

    #[test]
    fn test_game_type_support() {
        assert!(GameType::Generals.is_supported());
        assert!(!GameType::Bfme.is_supported());
        assert!(!GameType::Bfme2.is_supported());
    }

    #[test]
    fn test_magic_constants() {
        assert_eq!(GameType::Generals.magic(), b"GENREP");
        assert_eq!(GameType::Bfme.magic(), b"BFMEREPL");
        assert_eq!(GameType::Bfme2.magic(), b"BFME2RPL");
    }
}
