use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write};

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%y %H:%M";
pub const DEFAULT_LOCAL_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("not a date: {0:?}")]
pub struct DateParseError(pub String);

/// Display patterns for dates, in strftime syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormats {
    pub date_time: String,
    pub local_date: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        DateFormats {
            date_time: DEFAULT_DATE_FORMAT.to_owned(),
            local_date: DEFAULT_LOCAL_DATE_FORMAT.to_owned(),
        }
    }
}

/// `None` when the pattern is malformed or asks for fields the value does not have.
fn try_format<D: fmt::Display>(value: D) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", value).ok()?;
    Some(out)
}

/// Returns false for patterns chrono cannot apply to a point in time.
pub fn is_valid_date_time_format(pattern: &str) -> bool {
    try_format(DateTime::<Utc>::UNIX_EPOCH.fixed_offset().format(pattern)).is_some()
}

/// Returns false for patterns chrono cannot apply to a calendar date, e.g. ones with time fields.
pub fn is_valid_local_date_format(pattern: &str) -> bool {
    try_format(DateTime::<Utc>::UNIX_EPOCH.date_naive().format(pattern)).is_some()
}

/// A date value as the backend sends it: either a point in time or a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDate {
    Instant(DateTime<FixedOffset>),
    Local(NaiveDate),
}

impl AppDate {
    /// Accepts RFC 3339 instants, `datetime-local` form values (read as UTC) and plain dates.
    pub fn parse(raw: &str) -> Result<Self, DateParseError> {
        let raw = raw.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(AppDate::Instant(instant));
        }
        for pattern in &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
                return Ok(AppDate::Instant(naive.and_utc().fixed_offset()));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(AppDate::Local)
            .map_err(|_| DateParseError(raw.to_owned()))
    }

    /// Falls back to the ISO form when a pattern does not fit the value.
    pub fn format(&self, formats: &DateFormats) -> String {
        let formatted = match self {
            AppDate::Instant(instant) => try_format(instant.format(&formats.date_time)),
            AppDate::Local(date) => try_format(date.format(&formats.local_date)),
        };
        formatted.unwrap_or_else(|| self.to_string())
    }

    /// Calendar dates become midnight UTC.
    pub fn to_instant(self) -> Self {
        match self {
            AppDate::Local(date) => AppDate::Instant(date.and_time(NaiveTime::MIN).and_utc().fixed_offset()),
            instant => instant,
        }
    }

    /// Value for an html datetime-local input, in UTC.
    pub fn input_value(&self) -> String {
        match self.to_instant() {
            AppDate::Instant(instant) => instant.naive_utc().format("%Y-%m-%dT%H:%M").to_string(),
            AppDate::Local(date) => date.format("%Y-%m-%dT00:00").to_string(),
        }
    }
}

impl fmt::Display for AppDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppDate::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
            AppDate::Local(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for AppDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AppDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AppDate::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format() {
        let formats = DateFormats::default();
        let local = AppDate::parse("2020-01-01").unwrap();
        assert_eq!(local, AppDate::Local(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()));
        assert_eq!(local.format(&formats), "01/01/2020");

        let instant = AppDate::parse("2021-05-05T13:45:00Z").unwrap();
        assert_eq!(instant.format(&formats), "05/05/21 13:45");
        assert_eq!(instant.input_value(), "2021-05-05T13:45");

        let form_value = AppDate::parse("2021-05-05T13:45").unwrap();
        assert_eq!(form_value, instant);

        assert_eq!(
            AppDate::parse("yesterday"),
            Err(DateParseError("yesterday".to_owned()))
        );
    }

    #[test]
    fn json() {
        let date: AppDate = serde_json::from_str("\"1999-12-31\"").unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"1999-12-31\"");
        assert!(serde_json::from_str::<AppDate>("\"31/12/1999\"").is_err());
    }

    #[test]
    fn calendar_dates_edit_as_midnight() {
        let local = AppDate::parse("1970-03-04").unwrap();
        assert_eq!(local.input_value(), "1970-03-04T00:00");
        assert_eq!(local.to_instant(), AppDate::parse("1970-03-04T00:00:00Z").unwrap());
        assert_eq!(AppDate::parse(&local.input_value()).unwrap(), local.to_instant());
    }

    #[test]
    fn format_validation() {
        assert!(is_valid_date_time_format(DEFAULT_DATE_FORMAT));
        assert!(is_valid_local_date_format(DEFAULT_LOCAL_DATE_FORMAT));
        assert!(!is_valid_date_time_format("%d/%m/%"));
        assert!(!is_valid_local_date_format("%d/%m/%"));
        assert!(!is_valid_local_date_format("%d/%m/%Y %H:%M"));
        assert!(is_valid_date_time_format("%d/%m/%Y %H:%M"));
    }

    #[test]
    fn unfit_pattern_falls_back_to_iso() {
        let formats = DateFormats {
            date_time: DEFAULT_DATE_FORMAT.to_owned(),
            local_date: "%d/%m/%Y %H:%M".to_owned(),
        };
        assert_eq!(AppDate::parse("2020-01-01").unwrap().format(&formats), "2020-01-01");
    }
}
