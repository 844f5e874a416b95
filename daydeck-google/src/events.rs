//! Read-only listing of today's calendar events.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::session::{NeedsReauth, Session};

const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub start: EventWhen,
    #[serde(default)]
    pub end: EventWhen,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Google event times carry either a `dateTime` (timed event) or a bare
/// `date` (all-day event).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventWhen {
    #[serde(default, rename = "dateTime")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl EventWhen {
    pub fn is_all_day(&self) -> bool {
        self.date_time.is_none()
    }

    /// "09:00" for timed events, "all-day" otherwise.
    pub fn label(&self) -> String {
        match self.date_time {
            Some(when) => when.with_timezone(&Local).format("%H:%M").to_string(),
            None => "all-day".to_string(),
        }
    }
}

impl CalendarEvent {
    fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }
}

#[derive(Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

fn local_midnight(date: NaiveDate) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .context("Could not resolve local midnight")
}

/// List today's events on the account's primary calendar, earliest first.
pub async fn list_today(
    client: &reqwest::Client,
    account_email: &str,
) -> Result<Vec<CalendarEvent>> {
    let session = Session::load_valid(client, account_email).await?;

    let today = Local::now().date_naive();
    let tomorrow = today.succ_opt().context("Date out of range")?;

    let time_min = local_midnight(today)?.to_rfc3339();
    let time_max = local_midnight(tomorrow)?.to_rfc3339();

    let response = client
        .get(EVENTS_URL)
        .bearer_auth(session.access_token())
        .query(&[
            ("timeMin", time_min.as_str()),
            ("timeMax", time_max.as_str()),
            ("singleEvents", "true"),
            ("showDeleted", "false"),
            ("orderBy", "startTime"),
            ("maxResults", "50"),
        ])
        .send()
        .await
        .context("Failed to reach the Google Calendar API")?;

    // The token can be revoked between refresh and use.
    if response.status() == StatusCode::UNAUTHORIZED {
        return Err(anyhow::Error::new(NeedsReauth));
    }

    if !response.status().is_success() {
        anyhow::bail!("Event listing failed with HTTP {}", response.status());
    }

    let mut listing: EventsResponse = response
        .json()
        .await
        .context("Failed to parse event listing")?;

    listing.items.retain(|event| !event.is_cancelled());

    Ok(listing.items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_items(body: &str) -> Vec<CalendarEvent> {
        let mut listing: EventsResponse = serde_json::from_str(body).unwrap();
        listing.items.retain(|event| !event.is_cancelled());
        listing.items
    }

    // --- wire format ---

    #[test]
    fn parses_timed_and_all_day_events() {
        let body = r#"{
            "items": [
                {
                    "id": "evt1",
                    "summary": "Strategy sync",
                    "start": { "dateTime": "2026-08-25T09:00:00+09:00" },
                    "end": { "dateTime": "2026-08-25T10:00:00+09:00" },
                    "location": "Boardroom",
                    "description": "Quarterly numbers review"
                },
                {
                    "id": "evt2",
                    "summary": "Offsite",
                    "start": { "date": "2026-08-25" },
                    "end": { "date": "2026-08-26" }
                }
            ]
        }"#;

        let items = parse_items(body);
        assert_eq!(items.len(), 2);

        assert!(!items[0].start.is_all_day());
        let start = items[0].start.date_time.unwrap();
        assert_eq!(start.to_rfc3339(), "2026-08-25T09:00:00+09:00");
        assert_eq!(items[0].location.as_deref(), Some("Boardroom"));
        assert_eq!(
            items[0].description.as_deref(),
            Some("Quarterly numbers review")
        );

        assert!(items[1].start.is_all_day());
        assert_eq!(items[1].start.label(), "all-day");
    }

    #[test]
    fn cancelled_events_are_dropped() {
        let body = r#"{
            "items": [
                { "id": "a", "summary": "Kept", "start": { "date": "2026-08-25" } },
                { "id": "b", "summary": "Gone", "status": "cancelled", "start": { "date": "2026-08-25" } }
            ]
        }"#;

        let items = parse_items(body);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].summary, "Kept");
    }

    #[test]
    fn missing_items_key_parses_as_empty() {
        let items = parse_items("{}");
        assert!(items.is_empty());
    }
}
