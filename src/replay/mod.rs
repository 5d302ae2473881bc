//! Replay header decoding.
//!
//! A Generals replay starts with a header that is read in a single forward
//! pass. The command stream that follows it is not decoded.
//!
//! # Header Layout
//!
//! All integers are little-endian.
//!
//! | Order | Field | Encoding |
//! |-------|-------|----------|
//! | 1 | variant tag | `GENREP` (6 bytes) |
//! | 2 | start time | u32 epoch seconds |
//! | 3 | end time | u32 epoch seconds |
//! | 4 | timecode count | u16 |
//! | 5 | reserved | 12 bytes |
//! | 6 | embedded filename | UTF-16, null-terminated |
//! | 7 | structural timestamp | 8 x u16 |
//! | 8 | version string | UTF-16, null-terminated |
//! | 9 | build date string | UTF-16, null-terminated |
//! | 10 | version minor, version major | u16, u16 |
//! | 11 | unknown hash | 8 bytes |
//! | 12 | metadata block | single-byte text, null-terminated |
//! | 13 | trailer | u16, u32, u32, u32, u32 (game speed) |
//!
//! # Example
//!
//! ```no_run
//! use genrep_parser::replay::Replay;
//!
//! let data = std::fs::read("last_replay.rep").unwrap();
//! let replay = Replay::parse(&data)?;
//! println!("{} on {}", replay.version, replay.metadata.map_file);
//! # Ok::<(), genrep_parser::error::ParserError>(())
//! ```

pub mod timestamp;

pub use timestamp::ReplayTimestamp;

use std::io::Read;
use std::time::{Duration as StdDuration, UNIX_EPOCH};

use chrono::{DateTime, Duration, Local};
use serde::Serialize;

use crate::binary::ByteReader;
use crate::error::{ParserError, Result};
use crate::format::{detect_game_type, GameType};
use crate::metadata::Metadata;
use crate::options::DecodeOptions;

/// Size of the reserved region after the timecode count.
pub const RESERVED_SIZE: usize = 12;

/// Size of the opaque hash before the metadata block.
pub const HASH_SIZE: usize = 8;

/// One decoded replay header.
///
/// Built atomically by [`Replay::parse`]; a failed decode never yields a
/// partially filled record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replay {
    /// Game family of the file.
    pub game_type: GameType,
    /// Match start, in local time.
    pub start_time: DateTime<Local>,
    /// Match end, in local time.
    pub end_time: DateTime<Local>,
    /// Number of recorded timecodes.
    pub timecode_count: u16,
    /// Filename stored inside the replay (not the on-disk name).
    pub filename: String,
    /// Structural calendar stamp.
    pub timestamp: ReplayTimestamp,
    /// Client version string.
    pub version: String,
    /// Client build date string.
    pub build_date: String,
    /// Version minor number.
    pub version_minor: u16,
    /// Version major number.
    pub version_major: u16,
    /// Opaque 8-byte hash.
    pub unknown_hash: [u8; HASH_SIZE],
    /// Map and seat configuration.
    pub metadata: Metadata,
    /// Unknown trailer field.
    pub unknown1: u16,
    /// Unknown trailer field.
    pub unknown2: u32,
    /// Unknown trailer field.
    pub unknown3: u32,
    /// Unknown trailer field.
    pub unknown4: u32,
    /// Game speed (frames per second).
    pub game_speed: u32,
}

impl Replay {
    /// Decodes a replay header with default options.
    ///
    /// Bytes after the header (the command stream) are ignored.
    ///
    /// # Errors
    ///
    /// - `ParserError::TruncatedInput` if the data ends inside a field
    /// - `ParserError::UnrecognizedFormat` if the variant tag is unknown
    /// - `ParserError::UnsupportedVariant` for Battle for Middle-earth files
    /// - `ParserError::InvalidEncoding` for undecodable strings
    /// - any metadata or slot error
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &DecodeOptions::default())
    }

    /// Decodes a replay header with the given options.
    ///
    /// # Errors
    ///
    /// See [`Replay::parse`].
    pub fn parse_with(data: &[u8], options: &DecodeOptions) -> Result<Self> {
        let mut reader = ByteReader::new(data);

        let game_type = detect_game_type(&mut reader)?;
        if !game_type.is_supported() {
            return Err(ParserError::UnsupportedVariant(game_type));
        }

        let start_time = read_epoch(&mut reader)?;
        let end_time = read_epoch(&mut reader)?;
        let timecode_count = reader.read_u16_le()?;
        reader.read_bytes(RESERVED_SIZE)?;

        let filename = reader.read_terminated_cstring_utf16()?;
        let timestamp = ReplayTimestamp::parse(&mut reader)?;
        let version = reader.read_terminated_cstring_utf16()?;
        let build_date = reader.read_terminated_cstring_utf16()?;

        // Minor precedes major in the file.
        let version_minor = reader.read_u16_le()?;
        let version_major = reader.read_u16_le()?;
        let unknown_hash = reader.read_array::<HASH_SIZE>()?;

        let metadata = Metadata::parse_with(&reader.read_terminated_cstring()?, options)?;

        let unknown1 = reader.read_u16_le()?;
        let unknown2 = reader.read_u32_le()?;
        let unknown3 = reader.read_u32_le()?;
        let unknown4 = reader.read_u32_le()?;
        let game_speed = reader.read_u32_le()?;

        Ok(Replay {
            game_type,
            start_time,
            end_time,
            timecode_count,
            filename,
            timestamp,
            version,
            build_date,
            version_minor,
            version_major,
            unknown_hash,
            metadata,
            unknown1,
            unknown2,
            unknown3,
            unknown4,
            game_speed,
        })
    }

    /// Match length as recorded by the start and end times.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end_time.signed_duration_since(self.start_time)
    }

    /// Returns the match length formatted as "HH:MM:SS".
    ///
    /// Negative lengths (end before start) are shown as "00:00:00".
    #[must_use]
    pub fn duration_string(&self) -> String {
        let total = self.duration().num_seconds().max(0);
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }

    /// Returns the numeric version as "major.minor".
    #[must_use]
    pub fn version_string(&self) -> String {
        format!("{}.{}", self.version_major, self.version_minor)
    }
}

/// Reads u32 epoch seconds. Every u32 value is a valid instant, so the only
/// failure is truncation.
fn read_epoch(reader: &mut ByteReader<'_>) -> Result<DateTime<Local>> {
    let seconds = reader.read_u32_le()?;
    Ok(DateTime::from(
        UNIX_EPOCH + StdDuration::from_secs(u64::from(seconds)),
    ))
}

/// A decoded replay paired with the name of the file it came from.
///
/// This is the unit handed to a [`ReplaySink`](crate::sink::ReplaySink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayFile {
    /// On-disk filename, as given by the caller.
    pub file_name: String,
    /// Decoded header.
    pub replay: Replay,
}

impl ReplayFile {
    /// Buffers `source` fully and decodes it.
    ///
    /// The caller keeps ownership of the underlying resource; this only
    /// reads from it.
    ///
    /// # Errors
    ///
    /// - `ParserError::IoError` if reading the source fails
    /// - any error from [`Replay::parse_with`]
    pub fn read<R: Read>(
        mut source: R,
        file_name: impl Into<String>,
        options: &DecodeOptions,
    ) -> Result<Self> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;

        Ok(ReplayFile {
            file_name: file_name.into(),
            replay: Replay::parse_with(&data, options)?,
        })
    }
}
