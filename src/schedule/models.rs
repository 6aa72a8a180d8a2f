//! Types for scheduling requests and the event drafts they expand into
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The requested shape of a scheduling request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPattern {
    #[default]
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "work-with-breaks")]
    WorkWithBreaks,
    #[serde(rename = "meeting-series")]
    MeetingSeries,
    #[serde(rename = "split-session")]
    SplitSession,
}

impl fmt::Display for EventPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventPattern::Single => "single",
            EventPattern::WorkWithBreaks => "work-with-breaks",
            EventPattern::MeetingSeries => "meeting-series",
            EventPattern::SplitSession => "split-session",
        };
        write!(f, "{}", name)
    }
}

fn default_break_duration() -> f64 {
    // 15 minutes
    0.25
}

fn default_work_segment_duration() -> f64 {
    // 75 minutes
    1.25
}

/// A scheduling intent, deserialized from tool call arguments.
///
/// Durations are in hours. `total_duration` is required for the
/// `work-with-breaks` and `split-session` patterns and ignored
/// otherwise.
#[derive(Clone, Debug, Deserialize)]
pub struct ScheduleRequest {
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to the time sampled at the start of expansion
    #[serde(default)]
    pub start_date_time: Option<DateTime<Utc>>,
    /// Only meaningful for the `single` pattern
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attendees: Option<Vec<String>>,
    #[serde(default)]
    pub event_pattern: EventPattern,
    #[serde(default)]
    pub total_duration: Option<f64>,
    #[serde(default = "default_break_duration")]
    pub break_duration: f64,
    #[serde(default = "default_work_segment_duration")]
    pub work_segment_duration: f64,
}

/// A fully computed, not-yet-persisted calendar event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventDraft {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
}

impl EventDraft {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Intermediate representation used while expanding the segmented
/// patterns. Lengths are in hours; the layout pass turns these into
/// timed drafts.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    Work { summary: String, hours: f64 },
    Break { hours: f64 },
}

/// Why a `ScheduleRequest` was rejected before any expansion work.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationError {
    EmptySummary,
    StartInPast { start: DateTime<Utc> },
    EndNotAfterStart,
    MissingTotalDuration { pattern: EventPattern },
    NonPositiveTotalDuration,
    NegativeBreakDuration,
    NonPositiveWorkSegmentDuration,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptySummary => {
                write!(f, "summary must not be empty")
            }
            ValidationError::StartInPast { start } => {
                write!(
                    f,
                    "start_date_time must not be in the past (got {})",
                    start.to_rfc3339()
                )
            }
            ValidationError::EndNotAfterStart => {
                write!(f, "end_date_time must be after start_date_time")
            }
            ValidationError::MissingTotalDuration { pattern } => {
                write!(
                    f,
                    "total_duration is required for the {} pattern",
                    pattern
                )
            }
            ValidationError::NonPositiveTotalDuration => {
                write!(f, "total_duration must be greater than zero")
            }
            ValidationError::NegativeBreakDuration => {
                write!(f, "break_duration must be zero or greater")
            }
            ValidationError::NonPositiveWorkSegmentDuration => {
                write!(f, "work_segment_duration must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_pattern_wire_names() {
        assert_eq!(
            serde_json::to_string(&EventPattern::Single).unwrap(),
            r#""single""#
        );
        assert_eq!(
            serde_json::to_string(&EventPattern::WorkWithBreaks).unwrap(),
            r#""work-with-breaks""#
        );
        assert_eq!(
            serde_json::to_string(&EventPattern::MeetingSeries).unwrap(),
            r#""meeting-series""#
        );
        assert_eq!(
            serde_json::to_string(&EventPattern::SplitSession).unwrap(),
            r#""split-session""#
        );
    }

    #[test]
    fn test_event_pattern_deserialization() {
        let pattern: EventPattern = serde_json::from_str(r#""split-session""#).unwrap();
        assert_eq!(pattern, EventPattern::SplitSession);
    }

    #[test]
    fn test_schedule_request_defaults() {
        let req: ScheduleRequest = serde_json::from_str(r#"{"summary":"Deep work"}"#).unwrap();
        assert_eq!(req.summary, "Deep work");
        assert_eq!(req.event_pattern, EventPattern::Single);
        assert_eq!(req.break_duration, 0.25);
        assert_eq!(req.work_segment_duration, 1.25);
        assert!(req.start_date_time.is_none());
        assert!(req.end_date_time.is_none());
        assert!(req.total_duration.is_none());
        assert!(req.attendees.is_none());
    }

    #[test]
    fn test_schedule_request_full_deserialization() {
        let json = r#"{
            "summary": "Write report",
            "description": "Quarterly report",
            "start_date_time": "2030-01-01T09:00:00Z",
            "event_pattern": "work-with-breaks",
            "total_duration": 2.0,
            "break_duration": 0.5,
            "work_segment_duration": 1.0,
            "attendees": ["a@example.com", "b@example.com"]
        }"#;
        let req: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.event_pattern, EventPattern::WorkWithBreaks);
        assert_eq!(req.total_duration, Some(2.0));
        assert_eq!(req.break_duration, 0.5);
        assert_eq!(req.attendees.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_schedule_request_accepts_offset_timestamps() {
        let json = r#"{"summary":"Standup","start_date_time":"2030-01-01T09:00:00-05:00"}"#;
        let req: ScheduleRequest = serde_json::from_str(json).unwrap();
        let start = req.start_date_time.unwrap();
        assert_eq!(start.to_rfc3339(), "2030-01-01T14:00:00+00:00");
    }

    #[test]
    fn test_validation_error_messages_name_the_field() {
        let err = ValidationError::MissingTotalDuration {
            pattern: EventPattern::WorkWithBreaks,
        };
        assert_eq!(
            err.to_string(),
            "total_duration is required for the work-with-breaks pattern"
        );

        assert!(
            ValidationError::EmptySummary
                .to_string()
                .contains("summary")
        );
        assert!(
            ValidationError::NegativeBreakDuration
                .to_string()
                .contains("break_duration")
        );
        assert!(
            ValidationError::NonPositiveWorkSegmentDuration
                .to_string()
                .contains("work_segment_duration")
        );
    }
}
