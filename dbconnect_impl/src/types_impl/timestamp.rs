use crate::{DecodeError, TypeId};
use time::{
    format_description::FormatItem, macros::format_description, Date, Month, OffsetDateTime,
    PrimitiveDateTime, Time, UtcOffset,
};

const CANONICAL: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const WITH_SUBSECONDS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");
const WITHOUT_SECONDS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const DATE_ONLY: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A point in time without time zone, with second precision.
///
/// The canonical text form, used for parsing, display, and SQL literals,
/// is `YYYY-MM-DD HH:MM:SS`.
///
/// ```rust
/// use dbconnect::types::Timestamp;
/// let ts = Timestamp::parse("1412-03-08 12:00:22").unwrap();
/// assert_eq!(1412, ts.year());
/// assert_eq!("1412-03-08 12:00:22", ts.to_string());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp(PrimitiveDateTime);

impl Timestamp {
    /// Constructs a `Timestamp` from its calendar fields.
    ///
    /// # Errors
    ///
    /// `DecodeError` if the fields do not denote a valid point in time.
    pub fn from_calendar(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, DecodeError> {
        let month = Month::try_from(month).map_err(invalid)?;
        let date = Date::from_calendar_date(year, month, day).map_err(invalid)?;
        let time = Time::from_hms(hour, minute, second).map_err(invalid)?;
        Ok(Self(PrimitiveDateTime::new(date, time)))
    }

    /// Parses the canonical form `YYYY-MM-DD HH:MM:SS`.
    ///
    /// Also accepted are a `T` instead of the blank, missing seconds, fractional seconds
    /// (which are truncated), and a plain date (which denotes midnight).
    ///
    /// # Errors
    ///
    /// `DecodeError` if the string has none of these forms or denotes no valid date.
    pub fn parse(s: &str) -> Result<Self, DecodeError> {
        let s = s.trim().replacen('T', " ", 1);
        if let Ok(pdt) = PrimitiveDateTime::parse(&s, CANONICAL) {
            return Ok(Self::from(pdt));
        }
        if let Ok(pdt) = PrimitiveDateTime::parse(&s, WITH_SUBSECONDS) {
            return Ok(Self::from(pdt));
        }
        if let Ok(pdt) = PrimitiveDateTime::parse(&s, WITHOUT_SECONDS) {
            return Ok(Self::from(pdt));
        }
        Date::parse(&s, DATE_ONLY)
            .map(Self::from)
            .map_err(|e| DecodeError::new(TypeId::TIMESTAMP, format!("'{s}': {e}")))
    }

    /// Converts seconds since the unix epoch (UTC) into a `Timestamp`.
    ///
    /// # Errors
    ///
    /// `DecodeError` if the value is out of the supported range.
    pub fn from_unix_timestamp(seconds: i64) -> Result<Self, DecodeError> {
        let odt = OffsetDateTime::from_unix_timestamp(seconds).map_err(invalid)?;
        Ok(Self::from(odt))
    }

    /// The year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }
    /// The month, 1 to 12.
    pub fn month(&self) -> u8 {
        self.0.month().into()
    }
    /// The day of the month, starting with 1.
    pub fn day(&self) -> u8 {
        self.0.day()
    }
    /// The hour, 0 to 23.
    pub fn hour(&self) -> u8 {
        self.0.hour()
    }
    /// The minute, 0 to 59.
    pub fn minute(&self) -> u8 {
        self.0.minute()
    }
    /// The second, 0 to 59.
    pub fn second(&self) -> u8 {
        self.0.second()
    }

    /// Returns the value as `time::PrimitiveDateTime`.
    pub fn to_primitive_date_time(&self) -> PrimitiveDateTime {
        self.0
    }
}

fn invalid(e: impl std::fmt::Display) -> DecodeError {
    DecodeError::new(TypeId::TIMESTAMP, e.to_string())
}

impl From<PrimitiveDateTime> for Timestamp {
    fn from(pdt: PrimitiveDateTime) -> Self {
        Self(pdt.replace_nanosecond(0).unwrap_or(pdt))
    }
}

impl From<Date> for Timestamp {
    fn from(date: Date) -> Self {
        Self(date.midnight())
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(odt: OffsetDateTime) -> Self {
        let utc = odt.to_offset(UtcOffset::UTC);
        Self::from(PrimitiveDateTime::new(utc.date(), utc.time()))
    }
}

impl std::str::FromStr for Timestamp {
    type Err = DecodeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            fmt,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

#[cfg(test)]
mod test {
    use super::Timestamp;

    #[test]
    fn test_parse_and_display() {
        for s in [
            "1412-03-08 12:00:22",
            "1424-06-01 03:05:11",
            "0001-01-01 00:00:00",
            "9999-12-31 23:59:59",
        ] {
            assert_eq!(s, Timestamp::parse(s).unwrap().to_string());
        }
    }

    #[test]
    fn test_lenient_forms() {
        let expected = Timestamp::from_calendar(2024, 2, 29, 13, 14, 15).unwrap();
        assert_eq!(expected, Timestamp::parse("2024-02-29T13:14:15").unwrap());
        assert_eq!(expected, Timestamp::parse("2024-02-29 13:14:15.987654").unwrap());
        assert_eq!(
            "2024-02-29 13:14:00",
            Timestamp::parse("2024-02-29 13:14").unwrap().to_string()
        );
        assert_eq!(
            "2024-02-29 00:00:00",
            Timestamp::parse("2024-02-29").unwrap().to_string()
        );
    }

    #[test]
    fn test_invalid() {
        assert!(Timestamp::parse("2023-02-29 00:00:00").is_err());
        assert!(Timestamp::parse("2023-13-01 00:00:00").is_err());
        assert!(Timestamp::parse("yesterday").is_err());
        assert!(Timestamp::parse("").is_err());
        assert!(Timestamp::from_calendar(2023, 1, 1, 24, 0, 0).is_err());
    }

    #[test]
    fn test_unix() {
        let ts = Timestamp::from_unix_timestamp(0).unwrap();
        assert_eq!("1970-01-01 00:00:00", ts.to_string());
        let ts = Timestamp::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!("2023-11-14 22:13:20", ts.to_string());
    }
}
