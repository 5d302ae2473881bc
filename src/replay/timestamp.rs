//! The structural calendar stamp embedded in the replay header.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::binary::ByteReader;
use crate::error::Result;

/// Eight u16 calendar fields, stored exactly as written.
///
/// The values are not validated; use [`ReplayTimestamp::to_naive`] to get a
/// calendar datetime when they happen to form one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ReplayTimestamp {
    /// Year.
    pub year: u16,
    /// Month (1-12).
    pub month: u16,
    /// Day of week (0 = Sunday).
    pub day_of_week: u16,
    /// Day of month.
    pub day: u16,
    /// Hour.
    pub hour: u16,
    /// Minute.
    pub minute: u16,
    /// Second.
    pub second: u16,
    /// Millisecond.
    pub millisecond: u16,
}

impl ReplayTimestamp {
    /// Size of the stamp in bytes.
    pub const SIZE: usize = 16;

    /// Reads the eight fields in file order.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedInput` if fewer than 16 bytes remain.
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(ReplayTimestamp {
            year: reader.read_u16_le()?,
            month: reader.read_u16_le()?,
            day_of_week: reader.read_u16_le()?,
            day: reader.read_u16_le()?,
            hour: reader.read_u16_le()?,
            minute: reader.read_u16_le()?,
            second: reader.read_u16_le()?,
            millisecond: reader.read_u16_le()?,
        })
    }

    /// Converts to a calendar datetime, ignoring the day of week.
    ///
    /// Returns `None` if the fields do not form a valid date and time.
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?
        .and_hms_milli_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
            u32::from(self.millisecond),
        )
    }
}
