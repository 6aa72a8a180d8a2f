//! Google Calendar v3 client for creating and listing events
//!
//! Credentials are explicit per-call arguments rather than
//! process-wide client state so concurrent chat requests never share a
//! mutable client. The base URL is a parameter so tests can point at a
//! local mock server.

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::schedule::EventDraft;

/// Event time from the Calendar API. All-day events carry `date`
/// instead of `date_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    fn from_timestamp(ts: DateTime<Utc>) -> Self {
        Self {
            date_time: Some(ts),
            date: None,
            time_zone: None,
        }
    }

    /// Human readable form for either a timed or all-day event
    pub fn display(&self) -> String {
        if let Some(ts) = self.date_time {
            ts.to_rfc3339()
        } else {
            self.date.clone().unwrap_or_else(|| "unknown".to_string())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAttendee {
    pub email: String,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "responseStatus", skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

/// Event resource from the Calendar API documentation. Used both as
/// the insert request body and the response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<EventAttendee>>,
    #[serde(rename = "htmlLink", skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListEventsResponse {
    items: Option<Vec<CalendarEvent>>,
}

fn events_url(api_base_url: &str, calendar_id: &str) -> Result<reqwest::Url> {
    let url = reqwest::Url::parse(&format!(
        "{}/calendar/v3/calendars/{}/events",
        api_base_url.trim_end_matches('/'),
        calendar_id
    ))?;
    Ok(url)
}

/// Create a single event from a draft. Returns the created event as
/// reported by the API, including its id and link.
pub async fn create_event(
    api_base_url: &str,
    access_token: &str,
    calendar_id: &str,
    draft: &EventDraft,
) -> Result<CalendarEvent> {
    let body = CalendarEvent {
        id: None,
        summary: Some(draft.summary.clone()),
        description: draft.description.clone(),
        start: EventDateTime::from_timestamp(draft.start),
        end: EventDateTime::from_timestamp(draft.end),
        attendees: draft.attendees.as_ref().map(|emails| {
            emails
                .iter()
                .map(|email| EventAttendee {
                    email: email.clone(),
                    display_name: None,
                    response_status: None,
                })
                .collect()
        }),
        html_link: None,
        status: None,
    };

    let url = events_url(api_base_url, calendar_id)?;
    let created = Client::new()
        .post(url)
        .bearer_auth(access_token)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(created)
}

/// Fetch events between `time_min` and `time_max` in start order with
/// recurring events expanded.
pub async fn list_events(
    api_base_url: &str,
    access_token: &str,
    calendar_id: &str,
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
) -> Result<Vec<CalendarEvent>> {
    let mut url = events_url(api_base_url, calendar_id)?;
    url.query_pairs_mut()
        .append_pair("timeMin", &time_min.to_rfc3339())
        .append_pair("timeMax", &time_max.to_rfc3339())
        .append_pair("singleEvents", "true")
        .append_pair("orderBy", "startTime");

    let resp: ListEventsResponse = Client::new()
        .get(url)
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(resp.items.unwrap_or_default())
}
