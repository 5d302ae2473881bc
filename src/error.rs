//! Error types for the replay parser.
//!
//! Every failure is a hard failure of the current file's decode. Nothing in
//! this crate retries, recovers or substitutes a default value; the caller
//! decides what to do with a file that does not decode.

use thiserror::Error;

use crate::format::GameType;

/// The main error type for replay parsing operations.
///
/// # Example
///
/// ```
/// use genrep_parser::error::{ParserError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(ParserError::UnrecognizedMetadataKey("ZZ".to_string()))
/// }
/// assert!(example_operation().is_err());
/// ```
#[derive(Error, Debug)]
pub enum ParserError {
    /// An I/O error occurred while buffering the replay source.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Fewer bytes are available than a field requires.
    #[error("Truncated input: expected {expected} bytes, but only {available} available")]
    TruncatedInput {
        /// The number of bytes that were needed (absolute end offset).
        expected: usize,
        /// The actual number of bytes available.
        available: usize,
    },

    /// A byte or code unit sequence is not valid text in its declared encoding.
    #[error("Invalid encoding at offset {offset}: {reason}")]
    InvalidEncoding {
        /// Offset of the first byte of the string.
        offset: usize,
        /// A description of the decoding failure.
        reason: String,
    },

    /// The variant tag matches none of the known markers.
    #[error("Unrecognized replay format: found {found}")]
    UnrecognizedFormat {
        /// The bytes found at the start of the file (as hex string).
        found: String,
    },

    /// The variant tag is known but its body layout is not implemented.
    #[error("Parsing for game type {0} is not implemented")]
    UnsupportedVariant(GameType),

    /// A slot token starts with an unknown marker character.
    #[error("Invalid replay slot type: {0:?}")]
    InvalidSlotType(char),

    /// A computer slot carries an unknown difficulty character.
    #[error("Invalid replay slot difficulty: {0:?}")]
    InvalidSlotDifficulty(char),

    /// A slot field is missing or not a number.
    #[error("Malformed field {index} in slot {token:?}")]
    MalformedSlotField {
        /// The full slot token.
        token: String,
        /// Index of the offending comma-separated field.
        index: usize,
    },

    /// A metadata value that must be numeric failed to parse.
    #[error("Malformed metadata value for key {key:?}: {value:?}")]
    MalformedMetadataValue {
        /// The metadata key.
        key: String,
        /// The raw value.
        value: String,
    },

    /// A key outside the known set appeared in the metadata block.
    #[error("Unexpected replay metadata key: {0:?}")]
    UnrecognizedMetadataKey(String),
}

impl ParserError {
    /// Creates an `UnrecognizedFormat` error, rendering the found bytes as hex.
    ///
    /// ```
    /// use genrep_parser::error::ParserError;
    ///
    /// let err = ParserError::unrecognized_format(b"ABCDEF");
    /// assert!(err.to_string().contains("41 42 43 44 45 46"));
    /// ```
    #[must_use]
    pub fn unrecognized_format(found: &[u8]) -> Self {
        ParserError::UnrecognizedFormat {
            found: bytes_to_hex(found),
        }
    }

    /// Creates a `TruncatedInput` error with the given sizes.
    #[must_use]
    pub fn truncated(expected: usize, available: usize) -> Self {
        ParserError::TruncatedInput {
            expected,
            available,
        }
    }

    pub(crate) fn malformed_slot_field(token: &str, index: usize) -> Self {
        ParserError::MalformedSlotField {
            token: token.to_string(),
            index,
        }
    }

    pub(crate) fn malformed_metadata_value(key: &str, value: &str) -> Self {
        ParserError::MalformedMetadataValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Converts a byte slice to a hexadecimal string representation.
///
/// If the slice is 8 bytes or less, formats as space-separated hex values.
/// If longer, shows the first 8 bytes followed by "...".
fn bytes_to_hex(bytes: &[u8]) -> String {
    if bytes.len() <= 8 {
        bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        let prefix: String = bytes[..8]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{prefix}... ({} bytes total)", bytes.len())
    }
}

/// A specialized Result type for replay parsing operations.
pub type Result<T> = std::result::Result<T, ParserError>;
