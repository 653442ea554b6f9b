//! ICS file generation.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use indoc::formatdoc;

use crate::constants::REMINDER_MINUTES;
use crate::date::{format_for_ics, session_window_in};
use crate::error::{GymcalError, GymcalResult};
use crate::workout::{ActualRecord, Workout};

const PRODID: &str = "-//Gym Scheduler App//EN";
const UID_DOMAIN: &str = "gym-scheduler-app";
const MISSED_SENTENCE: &str = "Did not attend gym on this day.";

/// RFC 5545 content lines are limited to 75 octets, excluding the line break.
const MAX_LINE_OCTETS: usize = 75;

/// Generate .ics content for a workout.
///
/// `tz` is the zone the session times are declared in and `now` becomes the
/// DTSTAMP, so the output is fully determined by the arguments.
pub fn generate_ics(workout: &Workout, tz: Tz, now: DateTime<Utc>) -> GymcalResult<String> {
    if workout.body_parts.is_empty() {
        return Err(GymcalError::Encoding(format!(
            "Workout {} has no planned body parts",
            workout.id
        )));
    }

    let (start, end) = session_window_in(workout.date, tz)?;
    let tzid = tz.name();

    let dtstamp = format_for_ics(now.with_timezone(&tz).naive_local());
    let dtstart = format_for_ics(start.naive_local());
    let dtend = format_for_ics(end.naive_local());

    let summary = escape_text(&workout.title());
    let description = escape_text(&describe(workout));
    let trigger = format_trigger(REMINDER_MINUTES);

    let ics = formatdoc! {"
        BEGIN:VCALENDAR
        VERSION:2.0
        PRODID:{PRODID}
        CALSCALE:GREGORIAN
        METHOD:PUBLISH
        BEGIN:VTIMEZONE
        TZID:{tzid}
        END:VTIMEZONE
        BEGIN:VEVENT
        UID:{id}@{UID_DOMAIN}
        DTSTAMP:{dtstamp}
        DTSTART;TZID={tzid}:{dtstart}
        DTEND;TZID={tzid}:{dtend}
        SUMMARY:{summary}
        DESCRIPTION:{description}
        STATUS:CONFIRMED
        SEQUENCE:0
        BEGIN:VALARM
        TRIGGER:{trigger}
        ACTION:DISPLAY
        DESCRIPTION:Workout in 1 hour
        END:VALARM
        END:VEVENT
        END:VCALENDAR
        ",
        id = workout.id,
    };

    Ok(to_content_lines(&ics))
}

/// Plain-text event description: the plan, then the actual outcome if recorded.
fn describe(workout: &Workout) -> String {
    let mut description = String::from("PLANNED WORKOUT:\n\n");
    for bp in &workout.body_parts {
        description.push_str(&format!("{}:\n", bp.body_part));
        for exercise in &bp.exercises {
            description.push_str(&format!("- {}\n", exercise));
        }
        description.push('\n');
    }

    match &workout.actual {
        None => {}
        Some(ActualRecord::Missed) => {
            description.push_str("ACTUAL WORKOUT:\n\n");
            description.push_str(MISSED_SENTENCE);
        }
        Some(ActualRecord::Attended(data)) => {
            description.push_str("ACTUAL WORKOUT:\n\n");
            for bp in data {
                description.push_str(&format!("{}:\n", bp.body_part));
                for ex in &bp.exercises {
                    description.push_str(&format!("- {} ({})\n", ex.exercise, ex.weight));
                }
                description.push('\n');
            }
        }
    }

    description
}

/// Escape a TEXT value (RFC 5545 3.3.11). Line breaks become the two
/// characters `\n` so the value stays on one content line.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    for ch in normalized.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

/// Negative duration before the event start, e.g. `-PT1H` or `-PT15M`.
fn format_trigger(minutes: i64) -> String {
    if minutes % 60 == 0 {
        format!("-PT{}H", minutes / 60)
    } else {
        format!("-PT{}M", minutes)
    }
}

/// Terminate each line with CRLF, folding anything over 75 octets.
fn to_content_lines(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len() + ics.len() / 32);

    for line in ics.lines() {
        fold_line(line, &mut result);
        result.push_str("\r\n");
    }

    result
}

fn fold_line(line: &str, out: &mut String) {
    let mut width = 0;

    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
}
