//! ICS file generation.
//!
//! This module turns a workout into a single-event calendar document
//! according to RFC 5545.

mod generate;

pub use generate::generate_ics;

use crate::date::format_date;
use crate::workout::Workout;

/// Content type for generated documents.
pub const ICS_MIME_TYPE: &str = "text/calendar;charset=utf-8";

/// File name used when saving the document directly.
pub fn calendar_filename(workout: &Workout) -> String {
    format!("gym-workout-{}.ics", format_date(workout.date))
}

/// File name used when handing the document to a share target.
pub fn share_filename(workout: &Workout) -> String {
    format!("workout-{}.ics", format_date(workout.date))
}

/// Message shown alongside a shared document.
pub fn share_text(workout: &Workout) -> String {
    format!(
        "Add {} workout to your calendar",
        workout.body_part_names().join(" + ")
    )
}
