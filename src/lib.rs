//! # Genrep Parser
//!
//! A parser for Command & Conquer: Generals and Zero Hour replay (.rep)
//! headers.
//!
//! The library decodes the fixed binary header and the embedded metadata
//! block of a replay into a [`Replay`] record: match times, client version,
//! map and per-seat player configuration. The command stream that follows
//! the header is not decoded.
//!
//! ## Quick Start
//!
//! ```no_run
//! use genrep_parser::error::Result;
//! use genrep_parser::Replay;
//!
//! fn show_replay(data: &[u8]) -> Result<()> {
//!     let replay = Replay::parse(data)?;
//!
//!     println!("Version: {}", replay.version);
//!     println!("Map: {}", replay.metadata.map_file);
//!     println!("Duration: {}", replay.duration_string());
//!
//!     for human in replay.metadata.humans() {
//!         println!("  {} (team {})", human.name, human.team);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias for parser operations
//! - [`binary`] - Forward-only little-endian byte reader
//! - [`format`] - Game variant detection
//! - [`replay`] - Replay header decoding
//! - [`metadata`] - Key-value metadata block and player slot grammar
//! - [`options`] - Decode options
//! - [`sink`] - Persistence interface for decoded replays
//!
//! ## Variants
//!
//! Battle for Middle-earth and Battle for Middle-earth II replays are
//! recognised by their markers but rejected with
//! [`ParserError::UnsupportedVariant`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod binary;
pub mod error;
pub mod format;
pub mod metadata;
pub mod options;
pub mod replay;
pub mod sink;

// Re-export commonly used types at the crate root
pub use error::{ParserError, Result};
pub use format::{detect_game_type, GameType};
pub use metadata::{ComputerSlot, HumanSlot, Metadata, Slot, SlotDifficulty, SlotType};
pub use options::{DecodeOptions, DifficultyMapping};
pub use replay::{Replay, ReplayFile, ReplayTimestamp};
pub use sink::{JsonLinesSink, MatchRecord, ReplaySink};
