//! Player slot parsing for the `S` metadata key.
//!
//! Each seat of the match is described by one token of comma-separated,
//! positional fields. The first character of the token selects the kind of
//! seat:
//!
//! | Marker | Kind | Layout |
//! |--------|------|--------|
//! | `H` | human | `H<name>,<user id hex>,<reserved>,<reserved>,<color>,<faction>,<start>,<team>,...` |
//! | `C` | computer | `C<difficulty>,<color>,<faction>,<start>,<team>` |
//! | `X`, `O` | empty | no fields |
//!
//! Numbers are signed because the game writes `-1` for "random" colors,
//! factions and start positions, and for "no team".
//!
//! # Example
//!
//! ```
//! use genrep_parser::metadata::slot::{Slot, SlotDifficulty};
//!
//! let slot = Slot::parse("CH,2,3,4,0").unwrap();
//! match slot {
//!     Slot::Computer(c) => {
//!         assert_eq!(c.difficulty, SlotDifficulty::Hard);
//!         assert_eq!(c.start_position, 4);
//!     }
//!     _ => panic!("expected a computer slot"),
//! }
//! ```

use serde::Serialize;

use crate::error::{ParserError, Result};
use crate::options::DifficultyMapping;

/// The kind of a player seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    /// An unused seat.
    Empty,
    /// A human player.
    Human,
    /// A computer player.
    Computer,
}

/// Computer player difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotDifficulty {
    /// Easy army.
    Easy,
    /// Medium army.
    Medium,
    /// Hard army.
    Hard,
}

/// A seat taken by a human player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumanSlot {
    /// Display name.
    pub name: String,
    /// User identifier, hex-encoded in the token.
    pub user_id: u64,
    /// Color index (`-1` for random).
    pub color: i64,
    /// Faction index (`-1` for random).
    pub faction: i64,
    /// Start position (`-1` for random).
    pub start_position: i64,
    /// Team number (`-1` for none).
    pub team: i64,
}

/// A seat taken by a computer player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputerSlot {
    /// Difficulty.
    pub difficulty: SlotDifficulty,
    /// Color index (`-1` for random).
    pub color: i64,
    /// Faction index (`-1` for random).
    pub faction: i64,
    /// Start position (`-1` for random).
    pub start_position: i64,
    /// Team number (`-1` for none).
    pub team: i64,
}

/// One player seat.
///
/// Fields only exist on the variants they apply to; an empty seat carries
/// no color, team or difficulty at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Slot {
    /// An unused seat.
    Empty,
    /// A human player.
    Human(HumanSlot),
    /// A computer player.
    Computer(ComputerSlot),
}

impl Slot {
    /// Parses a slot token using the default difficulty mapping.
    ///
    /// # Errors
    ///
    /// - `ParserError::InvalidSlotType` for an unknown marker character
    /// - `ParserError::InvalidSlotDifficulty` for an unknown difficulty
    /// - `ParserError::MalformedSlotField` for a missing or non-numeric field
    pub fn parse(token: &str) -> Result<Self> {
        Self::parse_with(token, DifficultyMapping::default())
    }

    /// Parses a slot token with an explicit difficulty mapping.
    ///
    /// # Errors
    ///
    /// See [`Slot::parse`].
    pub fn parse_with(token: &str, mapping: DifficultyMapping) -> Result<Self> {
        let mut chars = token.chars();
        let marker = chars
            .next()
            .ok_or_else(|| ParserError::malformed_slot_field(token, 0))?;
        let fields = SlotFields::split(token);

        match marker {
            'H' => Ok(Slot::Human(HumanSlot {
                name: fields.name()?,
                user_id: fields.hex(1)?,
                color: fields.decimal(4)?,
                faction: fields.decimal(5)?,
                start_position: fields.decimal(6)?,
                team: fields.decimal(7)?,
            })),
            'C' => {
                let marker = chars
                    .next()
                    .ok_or_else(|| ParserError::malformed_slot_field(token, 0))?;
                let difficulty = mapping
                    .map(marker)
                    .ok_or(ParserError::InvalidSlotDifficulty(marker))?;

                Ok(Slot::Computer(ComputerSlot {
                    difficulty,
                    color: fields.decimal(1)?,
                    faction: fields.decimal(2)?,
                    start_position: fields.decimal(3)?,
                    team: fields.decimal(4)?,
                }))
            }
            'X' | 'O' => Ok(Slot::Empty),
            other => Err(ParserError::InvalidSlotType(other)),
        }
    }

    /// Returns the kind of this seat.
    #[must_use]
    pub fn slot_type(&self) -> SlotType {
        match self {
            Slot::Empty => SlotType::Empty,
            Slot::Human(_) => SlotType::Human,
            Slot::Computer(_) => SlotType::Computer,
        }
    }

    /// Returns whether a human or computer player takes this seat.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        !matches!(self, Slot::Empty)
    }

    /// Display name of a human player.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Slot::Human(h) => Some(&h.name),
            _ => None,
        }
    }

    /// Color index of an occupied seat.
    #[must_use]
    pub fn color(&self) -> Option<i64> {
        match self {
            Slot::Human(h) => Some(h.color),
            Slot::Computer(c) => Some(c.color),
            Slot::Empty => None,
        }
    }

    /// Faction index of an occupied seat.
    #[must_use]
    pub fn faction(&self) -> Option<i64> {
        match self {
            Slot::Human(h) => Some(h.faction),
            Slot::Computer(c) => Some(c.faction),
            Slot::Empty => None,
        }
    }

    /// Team number of an occupied seat.
    #[must_use]
    pub fn team(&self) -> Option<i64> {
        match self {
            Slot::Human(h) => Some(h.team),
            Slot::Computer(c) => Some(c.team),
            Slot::Empty => None,
        }
    }
}

/// The non-empty comma-separated fields of one token.
struct SlotFields<'a> {
    token: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> SlotFields<'a> {
    fn split(token: &'a str) -> Self {
        SlotFields {
            token,
            fields: token.split(',').filter(|f| !f.is_empty()).collect(),
        }
    }

    fn get(&self, index: usize) -> Result<&'a str> {
        self.fields
            .get(index)
            .copied()
            .ok_or_else(|| ParserError::malformed_slot_field(self.token, index))
    }

    /// The human name shares field 0 with the `H` marker.
    fn name(&self) -> Result<String> {
        let first = self.get(0)?;
        Ok(first.strip_prefix('H').unwrap_or(first).to_string())
    }

    fn decimal(&self, index: usize) -> Result<i64> {
        self.get(index)?
            .parse()
            .map_err(|_| ParserError::malformed_slot_field(self.token, index))
    }

    fn hex(&self, index: usize) -> Result<u64> {
        parse_hex(self.get(index)?).ok_or_else(|| ParserError::malformed_slot_field(self.token, index))
    }
}

/// Parses a base-16 integer, accepting an optional `0x` prefix.
pub(crate) fn parse_hex(value: &str) -> Option<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).ok()
}
