//! Dry-run a scheduling request and print the expanded drafts

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;

use crate::schedule::{EventPattern, ScheduleRequest, expand_now};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PatternArg {
    Single,
    WorkWithBreaks,
    MeetingSeries,
    SplitSession,
}

impl From<PatternArg> for EventPattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::Single => EventPattern::Single,
            PatternArg::WorkWithBreaks => EventPattern::WorkWithBreaks,
            PatternArg::MeetingSeries => EventPattern::MeetingSeries,
            PatternArg::SplitSession => EventPattern::SplitSession,
        }
    }
}

fn parse_timestamp(value: &str, flag: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid RFC 3339 timestamp for --{}: {}", flag, value))?;
    Ok(parsed.with_timezone(&Utc))
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    summary: String,
    description: Option<String>,
    start: Option<String>,
    end: Option<String>,
    pattern: PatternArg,
    total_duration: Option<f64>,
    break_duration: f64,
    work_segment_duration: f64,
    attendee: Vec<String>,
) -> Result<()> {
    let start_date_time = start
        .as_deref()
        .map(|s| parse_timestamp(s, "start"))
        .transpose()?;
    let end_date_time = end
        .as_deref()
        .map(|s| parse_timestamp(s, "end"))
        .transpose()?;

    let request = ScheduleRequest {
        summary,
        description,
        start_date_time,
        end_date_time,
        attendees: if attendee.is_empty() {
            None
        } else {
            Some(attendee)
        },
        event_pattern: pattern.into(),
        total_duration,
        break_duration,
        work_segment_duration,
    };

    let drafts = expand_now(&request)?;

    if drafts.is_empty() {
        println!("No events to create for this pattern.");
        return Ok(());
    }

    println!("{} event(s):", drafts.len());
    for draft in &drafts {
        println!(
            "  {} -> {}  {}",
            draft.start.to_rfc3339(),
            draft.end.to_rfc3339(),
            draft.summary
        );
    }

    Ok(())
}
