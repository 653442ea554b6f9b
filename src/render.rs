//! Terminal rendering for workouts.
//!
//! Extension traits that add colored output to gymcal-core types using
//! owo_colors.

use gymcal_core::date::{format_for_display, format_session_slot, full_day_and_date};
use gymcal_core::store::StorageUsage;
use gymcal_core::workout::{ActualRecord, Workout};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for ActualRecord {
    fn render(&self) -> String {
        match self {
            ActualRecord::Missed => "✗ Missed".red().to_string(),
            ActualRecord::Attended(parts) => {
                let mut lines = vec!["✓ Attended".green().to_string()];
                for bp in parts {
                    lines.push(format!("      {}", bp.body_part.bold()));
                    for ex in &bp.exercises {
                        lines.push(format!("        {} {}", ex.exercise, ex.weight.dimmed()));
                    }
                }
                lines.join("\n")
            }
        }
    }
}

/// One-line summary used by `list`.
impl Render for Workout {
    fn render(&self) -> String {
        let status = match &self.actual {
            None => "planned".yellow().to_string(),
            Some(ActualRecord::Missed) => "missed".red().to_string(),
            Some(ActualRecord::Attended(_)) => "done".green().to_string(),
        };

        format!(
            "{}  {}  {}  {} {}",
            format_for_display(self.date).bold(),
            format_session_slot().dimmed(),
            self.body_part_names().join(" + "),
            format!("[{}]", self.id).dimmed(),
            status
        )
    }
}

/// Full card with the plan and any recorded outcome.
pub trait RenderDetail {
    fn render_detail(&self) -> String;
}

impl RenderDetail for Workout {
    fn render_detail(&self) -> String {
        let (day, date) = full_day_and_date(self.date);

        let mut lines = vec![
            format!("🏋 {}", self.title().bold()),
            format!("   {}, {}  {}", day, date, format_session_slot().dimmed()),
            format!("   {}", format!("id {}", self.id).dimmed()),
            "   Planned".dimmed().to_string(),
        ];

        for bp in &self.body_parts {
            lines.push(format!("      {}: {}", bp.body_part.bold(), bp.exercises.join(", ")));
        }

        if let Some(actual) = &self.actual {
            lines.push(format!("   {}", actual.render()));
        }

        lines.join("\n")
    }
}

impl Render for StorageUsage {
    fn render(&self) -> String {
        format!(
            "{} bytes ({} KB), {} {}",
            self.bytes,
            self.kilobytes(),
            self.item_count,
            if self.item_count == 1 { "workout" } else { "workouts" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gymcal_core::workout::{ActualBodyPart, ActualExercise, PlannedBodyPart, Weight};

    /// Drop ANSI escape sequences so assertions see plain text.
    fn plain(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    fn workout(actual: Option<ActualRecord>) -> Workout {
        Workout {
            id: 1705300000000,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            body_parts: vec![PlannedBodyPart {
                body_part: "Legs".into(),
                exercises: vec!["Squat".into(), "Lunge".into()],
            }],
            actual,
        }
    }

    #[test]
    fn summary_line_shows_date_parts_and_status() {
        assert_eq!(
            plain(&workout(None).render()),
            "Mon, Jan 15, 2024  7:00 AM - 8:00 AM  Legs  [1705300000000] planned"
        );
        assert!(plain(&workout(Some(ActualRecord::Missed)).render()).ends_with("missed"));
    }

    #[test]
    fn detail_lists_plan_and_weights() {
        let attended = ActualRecord::Attended(vec![ActualBodyPart {
            body_part: "Legs".into(),
            exercises: vec![ActualExercise {
                exercise: "Squat".into(),
                weight: Weight::Kg("100".into()),
            }],
        }]);

        let detail = plain(&workout(Some(attended)).render_detail());

        assert!(detail.contains("Legs Workout"));
        assert!(detail.contains("Monday, Jan 15, 2024  7:00 AM - 8:00 AM"));
        assert!(detail.contains("Legs: Squat, Lunge"));
        assert!(detail.contains("✓ Attended"));
        assert!(detail.contains("Squat 100 kg"));
    }

    #[test]
    fn usage_pluralizes() {
        let usage = StorageUsage {
            bytes: 2048,
            item_count: 1,
        };
        assert_eq!(plain(&usage.render()), "2048 bytes (2.00 KB), 1 workout");
    }
}
