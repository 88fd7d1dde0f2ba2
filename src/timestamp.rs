//! Wire format for timestamps: `YYYY-MM-DD HH:MM:SS`, always UTC.

use time::{format_description::FormatItem, macros::format_description, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const WIRE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(value.trim(), WIRE_FORMAT).map(PrimitiveDateTime::assume_utc)
}

pub fn format(value: OffsetDateTime) -> String {
    value
        .to_offset(UtcOffset::UTC)
        .format(WIRE_FORMAT)
        .unwrap_or_default()
}
