use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

use crate::omexml::OmeXmlError;

/// Format Bio-Formats writes `AcquisitionDate` in, implicitly UTC
const ACQUISITION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The UTC offset, the default acquisition timezone
pub fn utc() -> FixedOffset {
    Utc.fix()
}

/// A fixed offset of whole hours east of UTC.
///
/// Fails with `InvalidTimezone` unless `-24 < hours < 24`.
pub fn timezone_from_hours(hours: i32) -> Result<FixedOffset, OmeXmlError> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or(OmeXmlError::InvalidTimezone(hours))
}

/// Parse an `AcquisitionDate` and express it in `timezone`.
///
/// Dates without an offset are read as UTC; an explicit `Z` or `+hh:mm`
/// suffix is honoured.
pub fn parse_acquisition_date(
    raw: &str,
    timezone: &FixedOffset,
) -> Result<DateTime<FixedOffset>, OmeXmlError> {
    let raw = raw.trim();
    let utc = match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.with_timezone(&Utc),
        Err(_) => {
            let naive = NaiveDateTime::parse_from_str(raw, ACQUISITION_DATE_FORMAT)
                .map_err(|_| OmeXmlError::invalid_value("AcquisitionDate", raw))?;
            Utc.from_utc_datetime(&naive)
        }
    };
    Ok(utc.with_timezone(timezone))
}

/// `start + seconds`, rounded to the microsecond.
///
/// `None` when `seconds` is not finite or the result is out of range.
pub(crate) fn offset_by_seconds(
    start: &DateTime<FixedOffset>,
    seconds: f64,
) -> Option<DateTime<FixedOffset>> {
    let micros = (seconds * 1e6).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    start.checked_add_signed(Duration::microseconds(micros as i64))
}
