//! The event-pattern expander: turns a single `ScheduleRequest` into a
//! chronological sequence of `EventDraft`s.
//!
//! Expansion is pure with respect to wall-clock-read-once semantics:
//! the current time is sampled once per invocation (or supplied by the
//! caller) so identical inputs always produce identical sequences.

use chrono::{DateTime, Duration, Utc};

use super::models::{EventDraft, EventPattern, ScheduleRequest, Segment, ValidationError};

/// Guards the work-with-breaks loop against float residue producing a
/// degenerate tail segment. Residues below this (a few milliseconds)
/// are treated as fully scheduled.
const EPSILON: f64 = 1e-6;

fn hours(h: f64) -> Duration {
    Duration::milliseconds((h * 3_600_000.0).round() as i64)
}

fn validate(request: &ScheduleRequest, start: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if request.summary.trim().is_empty() {
        return Err(ValidationError::EmptySummary);
    }

    // Starting exactly at the sampled time is accepted
    if start < now {
        return Err(ValidationError::StartInPast { start });
    }

    if request.break_duration < 0.0 {
        return Err(ValidationError::NegativeBreakDuration);
    }

    if request.work_segment_duration <= 0.0 {
        return Err(ValidationError::NonPositiveWorkSegmentDuration);
    }

    match request.event_pattern {
        EventPattern::WorkWithBreaks | EventPattern::SplitSession => {
            match request.total_duration {
                None => {
                    return Err(ValidationError::MissingTotalDuration {
                        pattern: request.event_pattern,
                    });
                }
                Some(total) if total <= 0.0 => {
                    return Err(ValidationError::NonPositiveTotalDuration);
                }
                Some(_) => {}
            }
        }
        EventPattern::Single => {
            if let Some(end) = request.end_date_time
                && end <= start
            {
                return Err(ValidationError::EndNotAfterStart);
            }
        }
        EventPattern::MeetingSeries => {}
    }

    Ok(())
}

/// Work segments of at most `work_segment_duration`, separated by
/// breaks, until the total work time adds up to `total_duration`
/// exactly. `remaining` strictly decreases so the loop terminates in
/// at most ceil(total / segment) iterations. A break is only emitted
/// when more work follows it.
fn work_with_breaks_segments(request: &ScheduleRequest, total: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut remaining = total;

    while remaining > EPSILON {
        let length = request.work_segment_duration.min(remaining);
        segments.push(Segment::Work {
            summary: request.summary.clone(),
            hours: length,
        });
        remaining -= length;

        if remaining > EPSILON {
            segments.push(Segment::Break {
                hours: request.break_duration,
            });
        }
    }

    segments
}

/// A fixed number of full-length parts with breaks between them. The
/// segment count is computed up front and every part gets the full
/// `work_segment_duration`, so the combined work time can overshoot
/// `total_duration` when it does not divide evenly.
fn split_session_segments(request: &ScheduleRequest, total: f64) -> Vec<Segment> {
    let segment_count = (total / request.work_segment_duration).ceil() as usize;
    let mut segments = Vec::new();

    for i in 0..segment_count {
        segments.push(Segment::Work {
            summary: format!("{} - Part {}", request.summary, i + 1),
            hours: request.work_segment_duration,
        });

        if i < segment_count - 1 {
            segments.push(Segment::Break {
                hours: request.break_duration,
            });
        }
    }

    segments
}

/// Lay segments out on a timeline starting at `start`. Breaks carry no
/// description or attendees. Zero-length breaks are skipped entirely so
/// every emitted draft satisfies `end > start`.
fn lay_out(request: &ScheduleRequest, start: DateTime<Utc>, segments: Vec<Segment>) -> Vec<EventDraft> {
    let mut drafts = Vec::new();
    let mut cursor = start;

    for segment in segments {
        match segment {
            Segment::Work { summary, hours: h } => {
                let end = cursor + hours(h);
                drafts.push(EventDraft {
                    summary,
                    description: request.description.clone(),
                    start: cursor,
                    end,
                    attendees: request.attendees.clone(),
                });
                cursor = end;
            }
            Segment::Break { hours: h } => {
                let end = cursor + hours(h);
                if h > 0.0 {
                    drafts.push(EventDraft {
                        summary: "Break".to_string(),
                        description: None,
                        start: cursor,
                        end,
                        attendees: None,
                    });
                }
                cursor = end;
            }
        }
    }

    drafts
}

/// Expand a scheduling request into a chronological sequence of event
/// drafts, using `now` both as the validation reference point and as
/// the default start time.
///
/// Validation happens before any expansion work; on failure no partial
/// sequence is returned. The `meeting-series` pattern is accepted but
/// has no expansion behavior yet and produces an empty sequence.
pub fn expand(
    request: &ScheduleRequest,
    now: DateTime<Utc>,
) -> Result<Vec<EventDraft>, ValidationError> {
    let start = request.start_date_time.unwrap_or(now);
    validate(request, start, now)?;

    let drafts = match request.event_pattern {
        EventPattern::Single => {
            let end = request.end_date_time.unwrap_or(start + hours(1.0));
            vec![EventDraft {
                summary: request.summary.clone(),
                description: request.description.clone(),
                start,
                end,
                attendees: request.attendees.clone(),
            }]
        }
        EventPattern::WorkWithBreaks => {
            // Validation guarantees the total is present and positive
            let total = request.total_duration.unwrap_or_default();
            lay_out(request, start, work_with_breaks_segments(request, total))
        }
        EventPattern::SplitSession => {
            let total = request.total_duration.unwrap_or_default();
            lay_out(request, start, split_session_segments(request, total))
        }
        EventPattern::MeetingSeries => {
            tracing::warn!("meeting-series pattern has no expansion behavior yet");
            Vec::new()
        }
    };

    Ok(drafts)
}

/// Expand with the current time sampled once at the start of the call.
pub fn expand_now(request: &ScheduleRequest) -> Result<Vec<EventDraft>, ValidationError> {
    expand(request, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap()
    }

    fn request(pattern: EventPattern) -> ScheduleRequest {
        ScheduleRequest {
            summary: "Deep work".to_string(),
            description: None,
            start_date_time: Some(fixed_now()),
            end_date_time: None,
            attendees: None,
            event_pattern: pattern,
            total_duration: None,
            break_duration: 0.25,
            work_segment_duration: 1.25,
        }
    }

    #[test]
    fn test_single_defaults_to_one_hour() {
        let req = request(EventPattern::Single);
        let drafts = expand(&req, fixed_now()).unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].summary, "Deep work");
        assert_eq!(drafts[0].start, fixed_now());
        assert_eq!(drafts[0].duration(), Duration::hours(1));
    }

    #[test]
    fn test_single_uses_explicit_end() {
        let mut req = request(EventPattern::Single);
        req.end_date_time = Some(fixed_now() + Duration::minutes(30));

        let drafts = expand(&req, fixed_now()).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].duration(), Duration::minutes(30));
    }

    #[test]
    fn test_single_rejects_end_before_start() {
        let mut req = request(EventPattern::Single);
        req.start_date_time = Some(fixed_now() + Duration::hours(2));
        req.end_date_time = Some(fixed_now() + Duration::hours(1));

        let err = expand(&req, fixed_now()).unwrap_err();
        assert_eq!(err, ValidationError::EndNotAfterStart);
    }

    #[test]
    fn test_single_defaults_start_to_now() {
        let mut req = request(EventPattern::Single);
        req.start_date_time = None;

        let drafts = expand(&req, fixed_now()).unwrap();
        assert_eq!(drafts[0].start, fixed_now());
    }

    #[test]
    fn test_work_with_breaks_reference_sequence() {
        let mut req = request(EventPattern::WorkWithBreaks);
        req.total_duration = Some(2.0);
        let t = fixed_now();

        let drafts = expand(&req, t).unwrap();

        // [work 1.25h, break 0.25h, work 0.75h]
        assert_eq!(drafts.len(), 3);

        assert_eq!(drafts[0].summary, "Deep work");
        assert_eq!(drafts[0].start, t);
        assert_eq!(drafts[0].duration(), Duration::minutes(75));

        assert_eq!(drafts[1].summary, "Break");
        assert_eq!(drafts[1].start, t + Duration::minutes(75));
        assert_eq!(drafts[1].duration(), Duration::minutes(15));

        assert_eq!(drafts[2].summary, "Deep work");
        assert_eq!(drafts[2].start, t + Duration::minutes(90));
        assert_eq!(drafts[2].duration(), Duration::minutes(45));

        // Total work time adds up to the requested duration exactly
        let work_time: Duration = drafts
            .iter()
            .filter(|d| d.summary != "Break")
            .map(|d| d.duration())
            .sum();
        assert_eq!(work_time, Duration::hours(2));
    }

    #[test]
    fn test_work_with_breaks_never_ends_on_a_break() {
        let mut req = request(EventPattern::WorkWithBreaks);
        req.total_duration = Some(3.75); // exactly 3 full segments

        let drafts = expand(&req, fixed_now()).unwrap();
        assert_eq!(drafts.last().unwrap().summary, "Deep work");
        let breaks = drafts.iter().filter(|d| d.summary == "Break").count();
        assert_eq!(breaks, 2);
    }

    #[test]
    fn test_work_with_breaks_short_total_has_no_breaks() {
        let mut req = request(EventPattern::WorkWithBreaks);
        req.total_duration = Some(0.5);

        let drafts = expand(&req, fixed_now()).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].duration(), Duration::minutes(30));
    }

    #[test]
    fn test_work_with_breaks_requires_total_duration() {
        let req = request(EventPattern::WorkWithBreaks);
        let err = expand(&req, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingTotalDuration {
                pattern: EventPattern::WorkWithBreaks
            }
        );
    }

    #[test]
    fn test_work_with_breaks_zero_break_duration_skips_breaks() {
        let mut req = request(EventPattern::WorkWithBreaks);
        req.total_duration = Some(2.5);
        req.break_duration = 0.0;

        let drafts = expand(&req, fixed_now()).unwrap();
        assert_eq!(drafts.len(), 2);
        // Segments are back to back with no gap
        assert_eq!(drafts[0].end, drafts[1].start);
    }

    #[test]
    fn test_break_drafts_carry_no_description_or_attendees() {
        let mut req = request(EventPattern::WorkWithBreaks);
        req.total_duration = Some(2.0);
        req.description = Some("Focus block".to_string());
        req.attendees = Some(vec!["me@example.com".to_string()]);

        let drafts = expand(&req, fixed_now()).unwrap();
        let brk = drafts.iter().find(|d| d.summary == "Break").unwrap();
        assert!(brk.description.is_none());
        assert!(brk.attendees.is_none());

        let work = &drafts[0];
        assert_eq!(work.description.as_deref(), Some("Focus block"));
        assert_eq!(work.attendees.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_split_session_reference_sequence() {
        let mut req = request(EventPattern::SplitSession);
        req.total_duration = Some(2.0);
        let t = fixed_now();

        let drafts = expand(&req, t).unwrap();

        // ceil(2 / 1.25) = 2 parts with one break between them
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].summary, "Deep work - Part 1");
        assert_eq!(drafts[1].summary, "Break");
        assert_eq!(drafts[2].summary, "Deep work - Part 2");

        // Every part gets the full segment length, overshooting the
        // total when it does not divide evenly
        assert_eq!(drafts[0].duration(), Duration::minutes(75));
        assert_eq!(drafts[2].duration(), Duration::minutes(75));
        assert_eq!(drafts[2].start, t + Duration::minutes(90));
    }

    #[test]
    fn test_split_session_requires_total_duration() {
        let req = request(EventPattern::SplitSession);
        let err = expand(&req, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingTotalDuration {
                pattern: EventPattern::SplitSession
            }
        );
    }

    #[test]
    fn test_split_session_single_part_has_no_breaks() {
        let mut req = request(EventPattern::SplitSession);
        req.total_duration = Some(1.0);

        let drafts = expand(&req, fixed_now()).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].summary, "Deep work - Part 1");
    }

    #[test]
    fn test_meeting_series_expands_to_nothing() {
        let req = request(EventPattern::MeetingSeries);
        let drafts = expand(&req, fixed_now()).unwrap();
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_rejects_past_start() {
        let mut req = request(EventPattern::Single);
        req.start_date_time = Some(fixed_now() - Duration::days(1));

        let err = expand(&req, fixed_now()).unwrap_err();
        assert!(matches!(err, ValidationError::StartInPast { .. }));
    }

    #[test]
    fn test_accepts_start_exactly_now() {
        let req = request(EventPattern::Single);
        assert!(expand(&req, fixed_now()).is_ok());
    }

    #[test]
    fn test_rejects_empty_summary() {
        let mut req = request(EventPattern::Single);
        req.summary = "  ".to_string();

        let err = expand(&req, fixed_now()).unwrap_err();
        assert_eq!(err, ValidationError::EmptySummary);
    }

    #[test]
    fn test_rejects_negative_break_duration() {
        let mut req = request(EventPattern::WorkWithBreaks);
        req.total_duration = Some(2.0);
        req.break_duration = -0.25;

        let err = expand(&req, fixed_now()).unwrap_err();
        assert_eq!(err, ValidationError::NegativeBreakDuration);
    }

    #[test]
    fn test_rejects_non_positive_work_segment_duration() {
        let mut req = request(EventPattern::WorkWithBreaks);
        req.total_duration = Some(2.0);
        req.work_segment_duration = 0.0;

        let err = expand(&req, fixed_now()).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveWorkSegmentDuration);
    }

    #[test]
    fn test_rejects_non_positive_total_duration() {
        let mut req = request(EventPattern::SplitSession);
        req.total_duration = Some(0.0);

        let err = expand(&req, fixed_now()).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveTotalDuration);
    }

    #[test]
    fn test_validation_fails_before_expansion() {
        // Past start reported even though the total is also missing;
        // either way no drafts come back
        let mut req = request(EventPattern::WorkWithBreaks);
        req.start_date_time = Some(fixed_now() - Duration::hours(1));

        assert!(expand(&req, fixed_now()).is_err());
    }

    #[test]
    fn test_expand_is_deterministic_for_a_fixed_now() {
        let mut req = request(EventPattern::WorkWithBreaks);
        req.total_duration = Some(2.0);

        let first = expand(&req, fixed_now()).unwrap();
        let second = expand(&req, fixed_now()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_expand_now_accepts_future_start() {
        let mut req = request(EventPattern::Single);
        req.start_date_time = Some(Utc::now() + Duration::days(7));

        let drafts = expand_now(&req).unwrap();
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn test_fractional_hours_are_exact() {
        let mut req = request(EventPattern::WorkWithBreaks);
        req.total_duration = Some(1.0);
        req.work_segment_duration = 0.4;
        req.break_duration = 0.1;

        let drafts = expand(&req, fixed_now()).unwrap();
        // work 0.4, break 0.1, work 0.4, break 0.1, work 0.2
        assert_eq!(drafts.len(), 5);
        assert_eq!(drafts[0].duration(), Duration::minutes(24));
        assert_eq!(drafts[1].duration(), Duration::minutes(6));
        assert_eq!(drafts[4].duration(), Duration::minutes(12));
    }
}
