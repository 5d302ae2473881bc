//! Match metadata parsing.
//!
//! The replay header embeds a single-byte, null-terminated text block of
//! `;`-separated `key=value` entries describing the map and the seats:
//!
//! ```text
//! US=1;M=07maps/tournament desert;MC=2A4B1F0C;MS=215964;SD=12345;C=100;SR=0;SC=10000;O=N;S=HAlice,...:CE,...:X:X:X:X:X:X:;
//! ```
//!
//! | Key | Meaning | Stored as |
//! |-----|---------|-----------|
//! | `US` | unknown | ignored |
//! | `M` | map file, prefixed by a number | `map_file_prefix`, `map_file` |
//! | `MC` | map CRC (hex) | `map_crc` |
//! | `MS` | map size | `map_size` |
//! | `SD`, `C`, `SR` | opaque settings | `sd`, `c`, `sr` |
//! | `SC` | starting credits | `starting_credits` |
//! | `O` | opaque settings | `o` (verbatim) |
//! | `S` | `:`-separated seats | `slots` |
//!
//! Keys outside this set make the whole block invalid.
//!
//! # Example
//!
//! ```
//! use genrep_parser::metadata::Metadata;
//!
//! let metadata = Metadata::parse("US=1;M=42mymap.map;SC=5000;S=X:X:").unwrap();
//! assert_eq!(metadata.map_file_prefix, 42);
//! assert_eq!(metadata.map_file, "mymap.map");
//! assert_eq!(metadata.starting_credits, 5000);
//! assert_eq!(metadata.slots.len(), 2);
//! ```

pub mod slot;

pub use slot::{ComputerSlot, HumanSlot, Slot, SlotDifficulty, SlotType};

use serde::Serialize;

use crate::error::{ParserError, Result};
use crate::options::DecodeOptions;

/// Parsed key-value metadata block.
///
/// Numeric fields whose key does not appear in the block are zero, and
/// string fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Number preceding the map path in the `M` value.
    pub map_file_prefix: u64,
    /// Map path following the numeric prefix.
    pub map_file: String,
    /// Map CRC.
    pub map_crc: u32,
    /// Map file size.
    pub map_size: u64,
    /// `SD` setting.
    pub sd: i64,
    /// `C` setting.
    pub c: i64,
    /// `SR` setting.
    pub sr: i64,
    /// Starting credits.
    pub starting_credits: i64,
    /// `O` setting, unparsed.
    pub o: String,
    /// Seats in order of appearance; the index is the seat number.
    pub slots: Vec<Slot>,
}

impl Metadata {
    /// Parses a metadata block with default options.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnrecognizedMetadataKey` for an unknown key
    /// - `ParserError::MalformedMetadataValue` for a bad numeric value or an
    ///   entry without `=`
    /// - any slot error from [`Slot::parse_with`]
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, &DecodeOptions::default())
    }

    /// Parses a metadata block with the given options.
    ///
    /// # Errors
    ///
    /// See [`Metadata::parse`].
    pub fn parse_with(text: &str, options: &DecodeOptions) -> Result<Self> {
        let mut metadata = Metadata::default();

        for entry in text.split(';').filter(|e| !e.is_empty()) {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| ParserError::malformed_metadata_value(entry, ""))?;

            match key {
                "US" => {}
                "M" => {
                    let digits = value.bytes().take_while(u8::is_ascii_digit).count();
                    let (prefix, path) = value.split_at(digits);
                    metadata.map_file_prefix = if prefix.is_empty() {
                        0
                    } else {
                        decimal(key, prefix)?
                    };
                    metadata.map_file = path.to_string();
                }
                "MC" => {
                    metadata.map_crc = slot::parse_hex(value)
                        .and_then(|crc| u32::try_from(crc).ok())
                        .ok_or_else(|| ParserError::malformed_metadata_value(key, value))?;
                }
                "MS" => metadata.map_size = decimal(key, value)?,
                "SD" => metadata.sd = decimal(key, value)?,
                "C" => metadata.c = decimal(key, value)?,
                "SR" => metadata.sr = decimal(key, value)?,
                "SC" => metadata.starting_credits = decimal(key, value)?,
                "O" => metadata.o = value.to_string(),
                "S" => {
                    for token in value.split(':').filter(|t| !t.is_empty()) {
                        metadata
                            .slots
                            .push(Slot::parse_with(token, options.difficulty)?);
                    }
                }
                other => return Err(ParserError::UnrecognizedMetadataKey(other.to_string())),
            }
        }

        Ok(metadata)
    }

    /// Iterates over occupied seats together with their seat index.
    pub fn occupied_slots(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.is_occupied())
    }

    /// Iterates over the human players.
    pub fn humans(&self) -> impl Iterator<Item = &HumanSlot> {
        self.slots.iter().filter_map(|s| match s {
            Slot::Human(h) => Some(h),
            _ => None,
        })
    }
}

fn decimal<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ParserError::malformed_metadata_value(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_block() {
        let text = "US=1;M=07maps/tournament desert;MC=2A4B1F0C;MS=215964;SD=-8831;C=100;\
                    SR=0;SC=10000;O=N;S=HAlice,C0A80102,8088,TT,2,-1,0,0,1,0:CE,3,1,1,-1:X:O:";
        let metadata = Metadata::parse(text).unwrap();

        assert_eq!(metadata.map_file_prefix, 7);
        assert_eq!(metadata.map_file, "maps/tournament desert");
        assert_eq!(metadata.map_crc, 0x2A4B_1F0C);
        assert_eq!(metadata.map_size, 215_964);
        assert_eq!(metadata.sd, -8831);
        assert_eq!(metadata.c, 100);
        assert_eq!(metadata.sr, 0);
        assert_eq!(metadata.starting_credits, 10_000);
        assert_eq!(metadata.o, "N");
        assert_eq!(metadata.slots.len(), 4);
        assert_eq!(metadata.slots[0].slot_type(), SlotType::Human);
        assert_eq!(metadata.slots[1].slot_type(), SlotType::Computer);
        assert_eq!(metadata.slots[2], Slot::Empty);
        assert_eq!(metadata.slots[3], Slot::Empty);
    }

    #[test]
    fn test_parse_short_block() {
        let metadata = Metadata::parse("US=1;MC=ff;MS=100;SC=5000;S=H0xAB,1,1,1,0,1,0,0:X:").unwrap();

        assert_eq!(metadata.map_crc, 255);
        assert_eq!(metadata.map_size, 100);
        assert_eq!(metadata.starting_credits, 5000);
        assert_eq!(metadata.slots.len(), 2);
        assert_eq!(
            metadata.slots[0],
            Slot::Human(HumanSlot {
                name: "0xAB".to_string(),
                user_id: 1,
                color: 0,
                faction: 1,
                start_position: 0,
                team: 0,
            })
        );
        assert_eq!(metadata.slots[1], Slot::Empty);
    }

    #[test]
    fn test_map_file_without_prefix() {
        let metadata = Metadata::parse("M=maps/alpine assault").unwrap();
        assert_eq!(metadata.map_file_prefix, 0);
        assert_eq!(metadata.map_file, "maps/alpine assault");
    }

    #[test]
    fn test_map_file_keeps_digits_after_path() {
        let metadata = Metadata::parse("M=42mymap2.map").unwrap();
        assert_eq!(metadata.map_file_prefix, 42);
        assert_eq!(metadata.map_file, "mymap2.map");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let metadata = Metadata::parse("O=a=b").unwrap();
        assert_eq!(metadata.o, "a=b");
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(Metadata::parse("").unwrap(), Metadata::default());
        assert_eq!(Metadata::parse(";;").unwrap(), Metadata::default());
    }

    #[test]
    fn test_unrecognized_key() {
        match Metadata::parse("ZZ=1;") {
            Err(ParserError::UnrecognizedMetadataKey(key)) => assert_eq!(key, "ZZ"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_malformed_numeric_value() {
        match Metadata::parse("MS=big") {
            Err(ParserError::MalformedMetadataValue { key, value }) => {
                assert_eq!(key, "MS");
                assert_eq!(value, "big");
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(matches!(
            Metadata::parse("MC=nothex"),
            Err(ParserError::MalformedMetadataValue { .. })
        ));
        assert!(matches!(
            Metadata::parse("MC=1FFFFFFFF"),
            Err(ParserError::MalformedMetadataValue { .. })
        ));
    }

    #[test]
    fn test_values_beyond_32_bits() {
        let metadata = Metadata::parse(
            "M=99999999999maps/x;MS=5000000000;SD=3000000000;C=-3000000000;SR=2147483648;SC=4294967296",
        )
        .unwrap();

        assert_eq!(metadata.map_file_prefix, 99_999_999_999);
        assert_eq!(metadata.map_file, "maps/x");
        assert_eq!(metadata.map_size, 5_000_000_000);
        assert_eq!(metadata.sd, 3_000_000_000);
        assert_eq!(metadata.c, -3_000_000_000);
        assert_eq!(metadata.sr, 2_147_483_648);
        assert_eq!(metadata.starting_credits, 4_294_967_296);
    }

    #[test]
    fn test_malformed_value_for_every_integer_key() {
        for (entry, key, value) in [
            ("SD=seed", "SD", "seed"),
            ("C=1.5", "C", "1.5"),
            ("SR=", "SR", ""),
            ("SC=10k", "SC", "10k"),
            ("MS=-1", "MS", "-1"),
            (
                "M=99999999999999999999999maps/x",
                "M",
                "99999999999999999999999",
            ),
        ] {
            match Metadata::parse(entry) {
                Err(ParserError::MalformedMetadataValue { key: k, value: v }) => {
                    assert_eq!(k, key, "{entry}");
                    assert_eq!(v, value, "{entry}");
                }
                other => panic!("{entry}: unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn test_entry_without_separator() {
        assert!(matches!(
            Metadata::parse("US=1;SC"),
            Err(ParserError::MalformedMetadataValue { .. })
        ));
    }

    #[test]
    fn test_slot_errors_propagate() {
        assert!(matches!(
            Metadata::parse("S=X:Q:"),
            Err(ParserError::InvalidSlotType('Q'))
        ));
    }

    #[test]
    fn test_slots_follow_legacy_mapping() {
        let metadata = Metadata::parse_with("S=CH,1,1,1,1:", &DecodeOptions::legacy()).unwrap();
        match &metadata.slots[0] {
            Slot::Computer(c) => assert_eq!(c.difficulty, SlotDifficulty::Easy),
            other => panic!("expected computer slot, got {other:?}"),
        }
    }

    #[test]
    fn test_occupied_slots_keep_seat_index() {
        let metadata = Metadata::parse("S=X:HBob,1,0,TT,1,1,1,1:X:CE,2,2,2,2:").unwrap();
        let seats: Vec<usize> = metadata.occupied_slots().map(|(i, _)| i).collect();
        assert_eq!(seats, vec![1, 3]);

        let names: Vec<&str> = metadata.humans().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Bob"]);
    }
}
