//! Tool for creating calendar events from a scheduling request
//!
//! The expander computes the whole draft sequence before any network
//! call, then each draft is created in chronological order. A failed
//! create does not abort the remaining drafts; every draft reports its
//! own outcome back to the model.

use anyhow::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json;

use crate::google::gcal;
use crate::openai::{Function, Items, Parameters, Property, ToolCall, ToolType};
use crate::schedule::{ScheduleRequest, expand_now};

#[derive(Serialize)]
pub struct ScheduleProps {
    pub summary: Property,
    pub description: Property,
    pub start_date_time: Property,
    pub end_date_time: Property,
    pub attendees: Property,
    pub event_pattern: Property,
    pub total_duration: Property,
    pub break_duration: Property,
    pub work_segment_duration: Property,
}

#[derive(Serialize)]
pub struct CreateCalendarEventTool {
    pub r#type: ToolType,
    pub function: Function<ScheduleProps>,
    #[serde(skip)]
    api_base_url: String,
    #[serde(skip)]
    access_token: String,
    #[serde(skip)]
    calendar_id: String,
}

#[async_trait]
impl ToolCall for CreateCalendarEventTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let request: ScheduleRequest = match serde_json::from_str(args) {
            Ok(request) => request,
            Err(err) => return Ok(format!("Invalid scheduling arguments: {}", err)),
        };

        // Validation failures are surfaced to the model as a message
        // naming the field so it can correct the request
        let drafts = match expand_now(&request) {
            Ok(drafts) => drafts,
            Err(err) => return Ok(format!("Cannot schedule this request: {}", err)),
        };

        if drafts.is_empty() {
            return Ok(format!(
                "The {} pattern is not implemented yet. No events were created.",
                request.event_pattern
            ));
        }

        let mut results = Vec::new();
        for draft in &drafts {
            match gcal::create_event(
                &self.api_base_url,
                &self.access_token,
                &self.calendar_id,
                draft,
            )
            .await
            {
                Ok(event) => {
                    let link = event
                        .html_link
                        .unwrap_or_else(|| "no link".to_string());
                    results.push(format!(
                        "Created \"{}\" from {} to {} ({})",
                        draft.summary,
                        draft.start.to_rfc3339(),
                        draft.end.to_rfc3339(),
                        link
                    ));
                }
                Err(err) => {
                    tracing::error!("Failed to create event \"{}\": {}", draft.summary, err);
                    results.push(format!(
                        "Failed to create \"{}\": {}",
                        draft.summary, err
                    ));
                }
            }
        }

        Ok(results.join("\n"))
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }
}

impl CreateCalendarEventTool {
    pub fn new(access_token: &str, calendar_id: &str, api_base_url: &str) -> Self {
        let function = Function {
            name: String::from("create_calendar_event"),
            description: String::from(
                "Create new events in Google Calendar - supports both single and multiple related events.",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: ScheduleProps {
                    summary: Property {
                        r#type: String::from("string"),
                        description: String::from("Title of the event."),
                        r#enum: None,
                        items: None,
                    },
                    description: Property {
                        r#type: String::from("string"),
                        description: String::from("Description of the event."),
                        r#enum: None,
                        items: None,
                    },
                    start_date_time: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "Start time in ISO format (defaults to current time).",
                        ),
                        r#enum: None,
                        items: None,
                    },
                    end_date_time: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "End time in ISO format (defaults to start time + 1 hour).",
                        ),
                        r#enum: None,
                        items: None,
                    },
                    attendees: Property {
                        r#type: String::from("array"),
                        description: String::from("List of attendee email addresses."),
                        r#enum: None,
                        items: Some(Items {
                            r#type: String::from("string"),
                        }),
                    },
                    event_pattern: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "Pattern for event creation: single event, work session with breaks, meeting series, or split session.",
                        ),
                        r#enum: Some(vec![
                            String::from("single"),
                            String::from("work-with-breaks"),
                            String::from("meeting-series"),
                            String::from("split-session"),
                        ]),
                        items: None,
                    },
                    total_duration: Property {
                        r#type: String::from("number"),
                        description: String::from(
                            "Total duration in hours (required for work-with-breaks and split-session patterns).",
                        ),
                        r#enum: None,
                        items: None,
                    },
                    break_duration: Property {
                        r#type: String::from("number"),
                        description: String::from(
                            "Break duration in hours (defaults to 15 minutes).",
                        ),
                        r#enum: None,
                        items: None,
                    },
                    work_segment_duration: Property {
                        r#type: String::from("number"),
                        description: String::from(
                            "Duration of each work segment in hours (defaults to 75 minutes).",
                        ),
                        r#enum: None,
                        items: None,
                    },
                },
                required: vec![String::from("summary")],
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
