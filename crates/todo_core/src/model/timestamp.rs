//! Wall-clock stamps stored on tasks, `YYYY-MM-DD HH:MM:SS` in local time.

use crate::error::AppError;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn now() -> Result<String, AppError> {
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    format(OffsetDateTime::now_utc().to_offset(local_offset))
}

pub fn format(moment: OffsetDateTime) -> Result<String, AppError> {
    moment
        .format(TIMESTAMP_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

#[cfg(test)]
pub(crate) fn parse(value: &str) -> Result<time::PrimitiveDateTime, AppError> {
    time::PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT)
        .map_err(|_| AppError::invalid_data("timestamp must be YYYY-MM-DD HH:MM:SS"))
}

#[cfg(test)]
mod tests {
    use super::{format, now, parse};
    use time::macros::datetime;

    #[test]
    fn format_uses_space_separated_seconds_precision() {
        let formatted = format(datetime!(2025-12-20 09:05:03 UTC)).unwrap();
        assert_eq!(formatted, "2025-12-20 09:05:03");
    }

    #[test]
    fn now_is_parseable() {
        let stamp = now().unwrap();
        assert_eq!(stamp.len(), 19);
        parse(&stamp).unwrap();
    }

    #[test]
    fn parse_rejects_rfc3339() {
        let err = parse("2025-12-20T00:00:00Z").unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }
}
