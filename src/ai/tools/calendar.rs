//! Tool for listing upcoming calendar events

use anyhow::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json;

use crate::google::gcal;
use crate::openai::{Function, Parameters, Property, ToolCall, ToolType};

#[derive(Serialize)]
pub struct UpcomingEventsProps {
    pub days_ahead: Property,
}

#[derive(Deserialize)]
pub struct UpcomingEventsArgs {
    pub days_ahead: Option<i64>,
}

#[derive(Serialize)]
pub struct UpcomingEventsTool {
    pub r#type: ToolType,
    pub function: Function<UpcomingEventsProps>,
    #[serde(skip)]
    api_base_url: String,
    #[serde(skip)]
    access_token: String,
    #[serde(skip)]
    calendar_id: String,
}

#[async_trait]
impl ToolCall for UpcomingEventsTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: UpcomingEventsArgs = serde_json::from_str(args)?;

        // Default to 7 days ahead if not specified
        let days_ahead = fn_args.days_ahead.unwrap_or(7);

        let now = chrono::Utc::now();
        let end_time = now + chrono::Duration::days(days_ahead);

        let events = gcal::list_events(
            &self.api_base_url,
            &self.access_token,
            &self.calendar_id,
            now,
            end_time,
        )
        .await?;

        if events.is_empty() {
            return Ok("No upcoming events found.".to_string());
        }

        let mut all_events = vec![];
        for event in events {
            let summary = event.summary.unwrap_or_else(|| "No title".to_string());

            let attendees_str = if let Some(attendees) = &event.attendees {
                let attendee_list: Vec<String> = attendees
                    .iter()
                    .map(|a| {
                        format!(
                            "{} <{}>",
                            a.display_name.clone().unwrap_or("No name".to_string()),
                            a.email
                        )
                    })
                    .collect();
                if attendee_list.is_empty() {
                    "No attendees".to_string()
                } else {
                    format!("Attendees: {}", attendee_list.join(", "))
                }
            } else {
                "No attendees".to_string()
            };

            all_events.push(format!(
                "## {}\nStart: {}\nEnd: {}\n{}\n",
                summary,
                event.start.display(),
                event.end.display(),
                attendees_str
            ))
        }

        Ok(all_events.join("\n\n"))
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }
}

impl UpcomingEventsTool {
    pub fn new(access_token: &str, calendar_id: &str, api_base_url: &str) -> Self {
        let function = Function {
            name: String::from("list_upcoming_events"),
            description: String::from(
                "List upcoming events from the user's Google Calendar.",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: UpcomingEventsProps {
                    days_ahead: Property {
                        r#type: String::from("integer"),
                        description: String::from(
                            "Number of days ahead to fetch events for (default is 7).",
                        ),
                        r#enum: None,
                        items: None,
                    },
                },
                required: vec![],
                additional_properties: false,
            },
            strict: true,
        };

        Self {
            r#type: ToolType::Function,
            function,
            api_base_url: api_base_url.to_string(),
            access_token: access_token.to_string(),
            calendar_id: calendar_id.to_string(),
        }
    }
}
