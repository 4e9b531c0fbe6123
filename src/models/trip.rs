use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ClientError;

pub const MIN_DESTINATION_CHARS: usize = 4;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Trip {
    pub id: String,
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_confirmed: bool,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a trip together with its participants.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
    pub emails_to_invite: Vec<String>,
}

/// Start must not lie before `now`, end must not lie before start. Checked in that order.
pub fn check_trip_dates(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ClientError> {
    if starts_at < now {
        return Err(ClientError::InvalidStartDate);
    }
    if ends_at < starts_at {
        return Err(ClientError::InvalidEndDate);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Destination(String);

impl Destination {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Destination {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.chars().count() < MIN_DESTINATION_CHARS {
            return Err(format!(
                "destination must contain at least {MIN_DESTINATION_CHARS} characters"
            ));
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A date accepted from clients in any of the usual shapes and normalised to UTC.
///
/// Accepted: RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (read as UTC),
/// plain `YYYY-MM-DD` (midnight UTC) and integer milliseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawDate")]
pub struct TripDate(DateTime<Utc>);

impl TripDate {
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Millis(i64),
    Text(String),
}

impl TryFrom<RawDate> for TripDate {
    type Error = String;

    fn try_from(raw: RawDate) -> Result<Self, Self::Error> {
        match raw {
            RawDate::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .map(Self)
                .ok_or_else(|| format!("timestamp {ms} is out of range")),
            RawDate::Text(text) => parse_date_text(text.trim())
                .map(Self)
                .ok_or_else(|| format!("{text:?} is not a valid date")),
        }
    }
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
