use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock time of day, stored as minutes since midnight.
///
/// Serialized as a zero-padded `HH:MM` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Builds a time from literal parts, wrapping out-of-range values.
    pub const fn at(hours: u16, minutes: u16) -> Self {
        Self((hours % 24) * 60 + minutes % 60)
    }

    /// Truncates a timestamp to the minute.
    pub fn of(now: NaiveDateTime) -> Self {
        Self((now.hour() * 60 + now.minute()) as u16)
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// The instant this time falls on at `date`, seconds zeroed.
    pub fn on(self, date: NaiveDate) -> Option<NaiveDateTime> {
        NaiveTime::from_hms_opt(self.hour() as u32, self.minute() as u32, 0).map(|t| date.and_time(t))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&minutes_to_time_string(self.0 as u32))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time_to_minutes(s)
            .map(|m| Self(m as u16))
            .ok_or_else(|| format!("invalid time of day {:?}, expected HH:MM", s))
    }
}

/// Parses a time string (HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 || parts[1].len() != 2 {
        return None;
    }
    let hours: u32 = parts[0].parse().ok()?;
    let minutes: u32 = parts[1].parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes since midnight to time string (HH:MM)
pub fn minutes_to_time_string(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    format!("{:02}:{:02}", hours % 24, mins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_to_minutes() {
        assert_eq!(parse_time_to_minutes("00:00"), Some(0));
        assert_eq!(parse_time_to_minutes("13:30"), Some(810));
        assert_eq!(parse_time_to_minutes("9:05"), Some(545));
        assert_eq!(parse_time_to_minutes("24:00"), None);
        assert_eq!(parse_time_to_minutes("12:60"), None);
        assert_eq!(parse_time_to_minutes("12:5"), None);
        assert_eq!(parse_time_to_minutes("noon"), None);
    }

    #[test]
    fn test_unpadded_hours_compare_numerically() {
        let early: TimeOfDay = "9:05".parse().unwrap();
        let late: TimeOfDay = "13:30".parse().unwrap();
        assert!(early < late);
        assert_eq!(early.to_string(), "09:05");
    }

    #[test]
    fn test_json_form_is_hh_mm() {
        let t = TimeOfDay::at(14, 5);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"14:05\"");
        let back: TimeOfDay = serde_json::from_str("\"14:05\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }

    #[test]
    fn test_on_zeroes_seconds() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let at = TimeOfDay::at(13, 30).on(date).unwrap();
        assert_eq!(at, date.and_hms_opt(13, 30, 0).unwrap());
    }
}
