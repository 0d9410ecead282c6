//! Read-only listing of upcoming events from a linked external calendar.
//!
//! The caller supplies an opaque bearer token; obtaining it (the OAuth
//! redirect dance) happens elsewhere.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use log::{error, info};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const EVENTS_ENDPOINT: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";
pub const MAX_UPCOMING_EVENTS: usize = 10;
const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Calendar API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse calendar response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid event time: {0}")]
    InvalidTime(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    DateTime(DateTime<FixedOffset>),
    /// All-day event
    Date(NaiveDate),
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            EventTime::Date(d) => write!(f, "{} (all day)", d.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEvent {
    pub id: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    #[serde(default)]
    summary: Option<String>,
    start: RawEventTime,
    end: RawEventTime,
}

#[derive(Debug, Deserialize)]
struct RawEventTime {
    #[serde(rename = "dateTime", default)]
    date_time: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl RawEventTime {
    fn parse(&self) -> Result<EventTime, RemoteError> {
        if let Some(ref dt) = self.date_time {
            return DateTime::parse_from_rfc3339(dt)
                .map(EventTime::DateTime)
                .map_err(|e| RemoteError::InvalidTime(format!("{}: {}", dt, e)));
        }
        if let Some(ref d) = self.date {
            return NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map(EventTime::Date)
                .map_err(|e| RemoteError::InvalidTime(format!("{}: {}", d, e)));
        }
        Err(RemoteError::InvalidTime("missing dateTime and date".to_string()))
    }
}

/// Parse an events-list response body
pub fn parse_events_response(body: &str) -> Result<Vec<RemoteEvent>, RemoteError> {
    let response: EventsResponse = serde_json::from_str(body)?;
    response
        .items
        .into_iter()
        .take(MAX_UPCOMING_EVENTS)
        .map(|raw| {
            Ok(RemoteEvent {
                start: raw.start.parse()?,
                end: raw.end.parse()?,
                summary: raw.summary.unwrap_or_else(|| "(no title)".to_string()),
                id: raw.id,
            })
        })
        .collect()
}

/// Fetch up to ten upcoming events, ordered by start time, from the primary calendar
pub fn fetch_upcoming_events(token: &str, now: DateTime<Utc>) -> Result<Vec<RemoteEvent>, RemoteError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;

    let time_min = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let max_results = MAX_UPCOMING_EVENTS.to_string();
    let response = client
        .get(EVENTS_ENDPOINT)
        .bearer_auth(token)
        .query(&[
            ("timeMin", time_min.as_str()),
            ("maxResults", max_results.as_str()),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
        ])
        .send()?;

    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        error!("event=remote_events module=remote status=error http_status={}", status.as_u16());
        return Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let events = parse_events_response(&body)?;
    info!("event=remote_events module=remote status=ok count={}", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timed_and_all_day_events() {
        let body = r#"{
            "kind": "calendar#events",
            "items": [
                {
                    "id": "a1",
                    "summary": "Standup",
                    "start": {"dateTime": "2025-07-01T09:00:00+09:00"},
                    "end": {"dateTime": "2025-07-01T09:15:00+09:00"}
                },
                {
                    "id": "b2",
                    "start": {"date": "2025-07-04"},
                    "end": {"date": "2025-07-05"}
                }
            ]
        }"#;

        let events = parse_events_response(body).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].summary, "Standup");
        assert!(matches!(events[0].start, EventTime::DateTime(_)));
        assert_eq!(events[1].summary, "(no title)");
        assert_eq!(
            events[1].start,
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap())
        );
    }

    #[test]
    fn empty_response_has_no_events() {
        assert!(parse_events_response("{}").unwrap().is_empty());
    }

    #[test]
    fn event_without_any_time_is_rejected() {
        let body = r#"{"items": [{"id": "x", "start": {}, "end": {}}]}"#;
        assert!(matches!(
            parse_events_response(body),
            Err(RemoteError::InvalidTime(_))
        ));
    }
}
