use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::ValidationError;

/// Prefix that marks an itinerary event as a new day.
pub const DAY_MARKER: &str = "DAY";

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: u64,
    pub name: String,
    pub start_date: TripDate,
    pub end_date: TripDate,
    pub events: Vec<String>,
}

impl Trip {
    pub fn duration_days(&self) -> i64 {
        trip_duration(&self.start_date, &self.end_date)
    }

    pub fn day_count(&self) -> usize {
        count_day_markers(&self.events)
    }
}

/// A date as supplied by the client. Serialized back exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TripDate {
    raw: String,
    instant: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not an ISO-8601 date")]
pub struct DateParseError;

impl TripDate {
    /// Parses `raw`, naming `field` in the validation error on failure.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, ValidationError> {
        raw.parse().map_err(|_| ValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }
}

impl FromStr for TripDate {
    type Err = DateParseError;

    // Date-only values are UTC midnight.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let instant = if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            let midnight = date.and_hms_opt(0, 0, 0).ok_or(DateParseError)?;
            Utc.from_utc_datetime(&midnight)
        } else if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            dt.with_timezone(&Utc)
        } else if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            Utc.from_utc_datetime(&naive)
        } else {
            return Err(DateParseError);
        };

        Ok(Self {
            raw: raw.to_string(),
            instant,
        })
    }
}

impl TryFrom<String> for TripDate {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TripDate> for String {
    fn from(value: TripDate) -> Self {
        value.raw
    }
}

impl fmt::Display for TripDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Day count between two dates: elapsed time in days, rounded up, never below 1.
///
/// The floor also applies to reversed ranges, so a negative result is never
/// returned. Callers that care about ordering must compare the dates themselves.
pub fn trip_duration(start: &TripDate, end: &TripDate) -> i64 {
    let millis = (end.instant() - start.instant()).num_milliseconds();
    let days = -(-millis).div_euclid(MILLIS_PER_DAY);
    days.max(1)
}

pub fn count_day_markers<S: AsRef<str>>(events: &[S]) -> usize {
    events
        .iter()
        .filter(|event| event.as_ref().starts_with(DAY_MARKER))
        .count()
}

/// Body of a create request. Fields are optional so that absence surfaces as
/// a validation error rather than a decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Body of a partial update.
///
/// Each field is `None` when its key is absent. A key sent as `null` is
/// `Some(None)` (or `Some(Value::Null)` for `events`) and counts as supplied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripChanges {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub end_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub events: Option<Value>,
}

impl TripChanges {
    pub fn touches_dates(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Interprets a supplied `events` value as an ordered list of strings.
pub fn events_from_value(value: Value) -> Result<Vec<String>, ValidationError> {
    let Value::Array(items) = value else {
        return Err(ValidationError::EventsNotArray);
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(event) => Ok(event),
            _ => Err(ValidationError::EventsNotArray),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(raw: &str) -> TripDate {
        raw.parse().expect("valid date")
    }

    #[test]
    fn same_day_trip_lasts_one_day() {
        assert_eq!(trip_duration(&date("2024-01-01"), &date("2024-01-01")), 1);
    }

    #[test]
    fn date_only_ranges_count_whole_days() {
        assert_eq!(trip_duration(&date("2024-01-01"), &date("2024-01-03")), 2);
        assert_eq!(trip_duration(&date("2024-06-01"), &date("2024-06-05")), 4);
        assert_eq!(trip_duration(&date("2024-02-28"), &date("2024-03-01")), 2);
    }

    #[test]
    fn partial_days_round_up() {
        let start = date("2024-01-01T00:00:00Z");
        let end = date("2024-01-02T01:00:00Z");
        assert_eq!(trip_duration(&start, &end), 2);
    }

    #[test]
    fn reversed_range_is_floored_to_one() {
        assert_eq!(trip_duration(&date("2024-01-05"), &date("2024-01-01")), 1);
    }

    #[test]
    fn only_uppercase_prefix_counts_as_day_marker() {
        let events = ["DAY1: arrive", "day2: hike", "Lunch", " DAY3", "DAY", "DAYTRIP"];
        assert_eq!(count_day_markers(&events), 3);
        assert_eq!(count_day_markers::<&str>(&[]), 0);
    }

    #[test]
    fn accepts_iso_variants_and_keeps_raw_text() {
        let parsed = date("2024-06-01T10:30:00+02:00");
        assert_eq!(parsed.as_str(), "2024-06-01T10:30:00+02:00");
        assert_eq!(parsed.instant(), date("2024-06-01T08:30:00Z").instant());
        assert!("2024-06-01T10:30:00".parse::<TripDate>().is_ok());
        assert!("2024-06-01T10:30:00.250".parse::<TripDate>().is_ok());
    }

    #[test]
    fn malformed_dates_are_rejected_with_field_name() {
        let err = TripDate::parse("startDate", "next tuesday").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                field: "startDate",
                value: "next tuesday".into(),
            }
        );
        assert!("2024-02-30".parse::<TripDate>().is_err());
    }

    #[test]
    fn trip_serializes_with_camel_case_and_raw_dates() {
        let trip = Trip {
            id: 1,
            name: "Trip A".into(),
            start_date: date("2024-06-01"),
            end_date: date("2024-06-05"),
            events: vec!["DAY1: arrive".into()],
        };
        let value = serde_json::to_value(&trip).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Trip A",
                "startDate": "2024-06-01",
                "endDate": "2024-06-05",
                "events": ["DAY1: arrive"],
            })
        );
        let back: Trip = serde_json::from_value(value).unwrap();
        assert_eq!(back, trip);
    }

    #[test]
    fn changes_distinguish_missing_and_null_events() {
        let absent: TripChanges = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert!(absent.events.is_none());
        assert!(!absent.touches_dates());

        let null: TripChanges = serde_json::from_value(json!({"events": null})).unwrap();
        assert_eq!(null.events, Some(Value::Null));

        let null_fields: TripChanges =
            serde_json::from_value(json!({"name": null, "startDate": null, "endDate": "2024-06-02"}))
                .unwrap();
        assert_eq!(null_fields.name, Some(None));
        assert_eq!(null_fields.start_date, Some(None));
        assert_eq!(null_fields.end_date, Some(Some("2024-06-02".to_string())));
        assert!(null_fields.touches_dates());
    }

    #[test]
    fn events_must_be_an_array_of_strings() {
        assert_eq!(
            events_from_value(json!(["DAY1", "museum"])).unwrap(),
            vec!["DAY1".to_string(), "museum".to_string()]
        );
        assert_eq!(
            events_from_value(json!("DAY1")),
            Err(ValidationError::EventsNotArray)
        );
        assert_eq!(
            events_from_value(json!(["DAY1", 2])),
            Err(ValidationError::EventsNotArray)
        );
    }
}
