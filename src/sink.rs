//! Persistence interface for decoded replays.
//!
//! The decoder knows nothing about storage. A batch driver hands every
//! successfully decoded [`ReplayFile`] to a [`ReplaySink`], one at a time,
//! and decides itself how to treat failures and commit boundaries.
//!
//! [`JsonLinesSink`] is the bundled implementation: one JSON object per
//! replay, holding the fields a match-history store keeps.

use std::io::{self, Write};

use serde::Serialize;

use crate::metadata::Slot;
use crate::replay::ReplayFile;

/// Accepts decoded replays, one at a time.
pub trait ReplaySink {
    /// The error type returned when a record cannot be stored.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stores one decoded replay.
    ///
    /// # Errors
    ///
    /// Implementation-defined storage failures.
    fn store(&mut self, file: &ReplayFile) -> Result<(), Self::Error>;

    /// Flushes any buffered records.
    ///
    /// # Errors
    ///
    /// Implementation-defined storage failures.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// The persisted view of one replay.
#[derive(Debug, Serialize)]
pub struct MatchRecord<'a> {
    /// Match start, epoch seconds.
    pub start_date: i64,
    /// Match end, epoch seconds.
    pub end_date: i64,
    /// On-disk filename.
    pub filename: &'a str,
    /// Client version string.
    pub version: &'a str,
    /// Client build date string.
    pub build_date: &'a str,
    /// Version major number.
    pub version_major: u16,
    /// Version minor number.
    pub version_minor: u16,
    /// Game speed.
    pub game_speed: u32,
    /// Map path.
    pub mapfile: &'a str,
    /// Starting credits.
    pub starting_credits: i64,
    /// Occupied seats only.
    pub slots: Vec<SeatRecord<'a>>,
}

/// One occupied seat in a [`MatchRecord`].
#[derive(Debug, Serialize)]
pub struct SeatRecord<'a> {
    /// Seat index within the match.
    pub seat: usize,
    /// The seat itself.
    pub slot: &'a Slot,
}

impl<'a> MatchRecord<'a> {
    /// Builds the persisted view of a decoded replay.
    #[must_use]
    pub fn new(file: &'a ReplayFile) -> Self {
        let replay = &file.replay;
        MatchRecord {
            start_date: replay.start_time.timestamp(),
            end_date: replay.end_time.timestamp(),
            filename: &file.file_name,
            version: &replay.version,
            build_date: &replay.build_date,
            version_major: replay.version_major,
            version_minor: replay.version_minor,
            game_speed: replay.game_speed,
            mapfile: &replay.metadata.map_file,
            starting_credits: replay.metadata.starting_credits,
            slots: replay
                .metadata
                .occupied_slots()
                .map(|(seat, slot)| SeatRecord { seat, slot })
                .collect(),
        }
    }
}

/// Writes one JSON object per stored replay.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    stored: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        JsonLinesSink { writer, stored: 0 }
    }

    /// Number of records stored so far.
    #[must_use]
    pub fn stored(&self) -> usize {
        self.stored
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReplaySink for JsonLinesSink<W> {
    type Error = io::Error;

    fn store(&mut self, file: &ReplayFile) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, &MatchRecord::new(file))?;
        self.writer.write_all(b"\n")?;
        self.stored += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
