//! Parsers for the individual text fields of an occupancy row.
//!
//! Each parser works on a single cell and reports a [`FieldIssue`] without
//! knowing which row it came from; the normalizer attaches the row index when
//! it turns the issue into an [`AnalyticsError`].

use thiserror::Error;

use crate::core::domain::Weekday;
use crate::error::AnalyticsError;

/// Problem found in a single field of a raw row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIssue {
    #[error("malformed time slot '{0}'")]
    MalformedTimeSlot(String),
    #[error("unknown day '{0}'")]
    UnknownDay(String),
    #[error("malformed occupancy indicator '{0}'")]
    MalformedOccupancy(String),
    #[error("missing room identifier")]
    MissingRoom,
}

impl FieldIssue {
    /// Attach the row index of the offending record.
    pub fn at_row(self, row: usize) -> AnalyticsError {
        match self {
            FieldIssue::MalformedTimeSlot(value) => AnalyticsError::MalformedTimeSlot { row, value },
            FieldIssue::UnknownDay(value) => AnalyticsError::UnknownDay { row, value },
            FieldIssue::MalformedOccupancy(value) => {
                AnalyticsError::MalformedOccupancy { row, value }
            }
            FieldIssue::MissingRoom => AnalyticsError::MissingRoom { row },
        }
    }
}

/// Extract the 24h starting hour from a slot label such as `"9 AM"` or
/// `"2 PM - 3 PM"`.
///
/// The leading token is the hour. AM hours are taken literally, so `"12 AM"`
/// stays 12 rather than becoming midnight; downstream peak-hour flags and
/// forecast alignment depend on that. PM hours add 12 except for `"12 PM"`.
///
/// # Examples
///
/// ```
/// use classroom_analytics::parsing::fields::parse_time_slot_hour;
///
/// assert_eq!(parse_time_slot_hour("9 AM"), Ok(9));
/// assert_eq!(parse_time_slot_hour("3 PM"), Ok(15));
/// assert_eq!(parse_time_slot_hour("12 PM"), Ok(12));
/// assert_eq!(parse_time_slot_hour("12 AM"), Ok(12));
/// assert!(parse_time_slot_hour("09:00").is_err());
/// ```
pub fn parse_time_slot_hour(value: &str) -> Result<u8, FieldIssue> {
    let malformed = || FieldIssue::MalformedTimeSlot(value.to_string());

    let leading = value.split_whitespace().next().ok_or_else(malformed)?;
    let hour: u8 = leading.parse().map_err(|_| malformed())?;

    let hour = if value.contains("AM") {
        hour
    } else if value.contains("PM") {
        if hour == 12 {
            12
        } else {
            hour.checked_add(12).ok_or_else(malformed)?
        }
    } else {
        return Err(malformed());
    };

    if hour > 23 {
        return Err(malformed());
    }
    Ok(hour)
}

/// Map a day name to its [`Weekday`].
pub fn parse_weekday(value: &str) -> Result<Weekday, FieldIssue> {
    Weekday::from_name(value).ok_or_else(|| FieldIssue::UnknownDay(value.to_string()))
}

/// Interpret a raw occupancy indicator.
///
/// Accepts the binary column (`1`/`0`), the yes/no column of the raw sheet,
/// and boolean spellings. A blank cell or the sheet's `-` placeholder carries
/// no observation and is rejected rather than counted as a free slot.
pub fn parse_occupancy(value: &str) -> Result<bool, FieldIssue> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "yes" | "y" | "true" | "occupied" => Ok(true),
        "0" | "0.0" | "no" | "n" | "false" => Ok(false),
        _ => Err(FieldIssue::MalformedOccupancy(value.to_string())),
    }
}

/// Treat the sheet's `-` placeholder and blank cells as unset.
pub fn optional_label(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "-")
        .map(str::to_string)
}
