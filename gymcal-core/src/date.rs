//! Date and time derivation for workouts.
//!
//! Workout dates are plain calendar dates in the viewer's zone. Nothing here
//! normalizes through UTC: "2024-01-15" is January 15 wherever you are.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::constants::{SESSION_END_HOUR, SESSION_START_HOUR};
use crate::error::{GymcalError, GymcalResult};

/// Parse YYYY-MM-DD as a local calendar date.
pub fn parse_date(s: &str) -> GymcalResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        GymcalError::Validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's date in the given zone.
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// "Mon, Jan 15, 2024"
pub fn format_for_display(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

/// ("Monday", "Jan 15, 2024")
pub fn full_day_and_date(date: NaiveDate) -> (String, String) {
    (
        date.format("%A").to_string(),
        date.format("%b %-d, %Y").to_string(),
    )
}

/// The fixed session slot, e.g. "7:00 AM - 8:00 AM".
pub fn format_session_slot() -> String {
    let fmt = |hour| {
        NaiveTime::from_hms_opt(hour, 0, 0)
            .map(|t| t.format("%-I:%M %p").to_string())
            .unwrap_or_default()
    };
    format!("{} - {}", fmt(SESSION_START_HOUR), fmt(SESSION_END_HOUR))
}

fn at_hour(date: NaiveDate, hour: u32) -> GymcalResult<NaiveDateTime> {
    date.and_hms_opt(hour, 0, 0)
        .ok_or_else(|| GymcalError::Encoding(format!("Invalid session hour {}", hour)))
}

/// Wall-clock start of the session (07:00) on the workout date.
pub fn session_start(date: NaiveDate) -> GymcalResult<NaiveDateTime> {
    at_hour(date, SESSION_START_HOUR)
}

/// Wall-clock end of the session (08:00) on the workout date.
pub fn session_end(date: NaiveDate) -> GymcalResult<NaiveDateTime> {
    at_hour(date, SESSION_END_HOUR)
}

/// Resolve the session window to instants in `tz`.
///
/// Fails if either wall time falls in a DST gap in that zone. Ambiguous
/// times (DST fold) resolve to the earlier instant.
pub fn session_window_in(date: NaiveDate, tz: Tz) -> GymcalResult<(DateTime<Tz>, DateTime<Tz>)> {
    let resolve = |naive: NaiveDateTime| {
        tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
            GymcalError::Encoding(format!(
                "{} does not exist in time zone {}",
                naive.format("%Y-%m-%d %H:%M"),
                tz.name()
            ))
        })
    };

    Ok((resolve(session_start(date)?)?, resolve(session_end(date)?)?))
}

/// Render a wall-clock moment as `YYYYMMDDThhmmss` (no zone suffix).
pub fn format_for_ics(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

/// Pick the zone used for calendar output: explicit override, then the
/// system zone, then UTC.
pub fn resolve_local_timezone(override_tz: Option<&str>) -> GymcalResult<Tz> {
    if let Some(name) = override_tz {
        return name
            .parse::<Tz>()
            .map_err(|_| GymcalError::Config(format!("Unknown time zone '{}'", name)));
    }

    match iana_time_zone::get_timezone() {
        Ok(name) => match name.parse::<Tz>() {
            Ok(tz) => Ok(tz),
            Err(_) => {
                warn!("System time zone '{}' is not in the tz database, using UTC", name);
                Ok(Tz::UTC)
            }
        },
        Err(e) => {
            warn!("Could not determine system time zone ({}), using UTC", e);
            Ok(Tz::UTC)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn parse_and_format_round_trip() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(date, jan_15());
        assert_eq!(format_date(date), "2024-01-15");
    }

    #[test]
    fn parse_rejects_other_formats() {
        assert!(parse_date("").is_err());
        assert!(parse_date("2024/01/15").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn display_forms() {
        assert_eq!(format_for_display(jan_15()), "Mon, Jan 15, 2024");
        assert_eq!(
            format_for_display(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
            "Tue, Mar 5, 2024"
        );

        let (day, date) = full_day_and_date(jan_15());
        assert_eq!(day, "Monday");
        assert_eq!(date, "Jan 15, 2024");
    }

    #[test]
    fn session_slot_text() {
        assert_eq!(format_session_slot(), "7:00 AM - 8:00 AM");
    }

    #[test]
    fn session_window_is_seven_to_eight() {
        assert_eq!(format_for_ics(session_start(jan_15()).unwrap()), "20240115T070000");
        assert_eq!(format_for_ics(session_end(jan_15()).unwrap()), "20240115T080000");
    }

    #[test]
    fn session_window_keeps_wall_time_in_zone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let (start, end) = session_window_in(jan_15(), tz).unwrap();

        assert_eq!(format_for_ics(start.naive_local()), "20240115T070000");
        assert_eq!(format_for_ics(end.naive_local()), "20240115T080000");
        // 07:00 EST is 12:00 UTC
        assert_eq!(start.with_timezone(&Utc).format("%H").to_string(), "12");
    }

    #[test]
    fn format_for_ics_pads_components() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(7, 4, 9)
            .unwrap();
        assert_eq!(format_for_ics(dt), "20240305T070409");
    }

    #[test]
    fn timezone_override_is_parsed() {
        assert_eq!(resolve_local_timezone(Some("UTC")).unwrap(), Tz::UTC);
        assert_eq!(
            resolve_local_timezone(Some("Europe/Berlin")).unwrap(),
            chrono_tz::Europe::Berlin
        );
        assert!(resolve_local_timezone(Some("Mars/Olympus")).is_err());
    }
}
