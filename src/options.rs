//! Decode options.
//!
//! The only knob today is how computer difficulty markers are mapped. Older
//! tooling recorded every computer player as easy, and a database built by
//! that tooling can only be matched by collapsing the mapping the same way.

use serde::Serialize;

use crate::metadata::slot::SlotDifficulty;

/// How the difficulty character of a computer slot is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DifficultyMapping {
    /// `E`, `M` and `H` map to easy, medium and hard.
    #[default]
    Distinct,
    /// `E`, `M` and `H` all map to easy, matching legacy databases.
    CollapsedToEasy,
}

impl DifficultyMapping {
    /// Maps a recognised marker character to a difficulty.
    ///
    /// Returns `None` for characters other than `E`, `M` and `H`.
    #[must_use]
    pub fn map(self, marker: char) -> Option<SlotDifficulty> {
        let difficulty = match marker {
            'E' => SlotDifficulty::Easy,
            'M' => SlotDifficulty::Medium,
            'H' => SlotDifficulty::Hard,
            _ => return None,
        };

        match self {
            DifficultyMapping::Distinct => Some(difficulty),
            DifficultyMapping::CollapsedToEasy => Some(SlotDifficulty::Easy),
        }
    }
}

/// Options controlling a single decode.
///
/// ```
/// use genrep_parser::options::{DecodeOptions, DifficultyMapping};
///
/// let options = DecodeOptions::default();
/// assert_eq!(options.difficulty, DifficultyMapping::Distinct);
///
/// let legacy = DecodeOptions::legacy();
/// assert_eq!(legacy.difficulty, DifficultyMapping::CollapsedToEasy);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeOptions {
    /// Mapping applied to computer slot difficulty markers.
    pub difficulty: DifficultyMapping,
}

impl DecodeOptions {
    /// Options reproducing the legacy decoder's output exactly.
    #[must_use]
    pub const fn legacy() -> Self {
        DecodeOptions {
            difficulty: DifficultyMapping::CollapsedToEasy,
        }
    }
}
