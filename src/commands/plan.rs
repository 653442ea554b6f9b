use anyhow::{Result, bail};
use gymcal_core::date::{parse_date, today};
use gymcal_core::store::{FileBackend, WorkoutStore};
use gymcal_core::workout::{PlanDraft, PlanDraftPart};
use owo_colors::OwoColorize;

use crate::render::RenderDetail;

use super::Context;

pub fn run(
    store: &mut WorkoutStore<FileBackend>,
    ctx: &Context,
    date: String,
    parts: &[String],
) -> Result<()> {
    // Malformed dates are reported by plan validation
    if let Ok(day) = parse_date(&date) {
        if !ctx.config.allow_past_dates && day < today(ctx.tz) {
            bail!("Cannot plan a workout in the past ({})", date.trim());
        }
    }

    let draft = PlanDraft {
        date,
        body_parts: parts.iter().map(|p| parse_part(p)).collect::<Result<_>>()?,
    };

    let workout = store.add(&draft)?;

    println!("{}", "✓ Workout planned".green());
    println!("{}", workout.render_detail());

    Ok(())
}

/// Parse "Legs:Squat,Lunge" into a body part with its exercises.
fn parse_part(input: &str) -> Result<PlanDraftPart> {
    let Some((body_part, exercises)) = input.split_once(':') else {
        bail!(
            "Invalid part '{}'. Expected BODY_PART:EXERCISE[,EXERCISE...]",
            input
        );
    };

    Ok(PlanDraftPart {
        body_part: body_part.trim().to_string(),
        exercises: exercises.split(',').map(|e| e.trim().to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_part_with_exercises() {
        let part = parse_part(" Legs : Squat, Lunge ,").unwrap();
        assert_eq!(part.body_part, "Legs");
        assert_eq!(part.exercises, vec!["Squat", "Lunge", ""]);
    }

    #[test]
    fn part_without_colon_is_rejected() {
        let err = parse_part("Legs").unwrap_err();
        assert!(err.to_string().contains("Invalid part 'Legs'"));
    }

    #[test]
    fn blank_exercises_are_dropped_by_validation() {
        let draft = PlanDraft {
            date: "2030-01-15".into(),
            body_parts: vec![parse_part("Legs:Squat,,").unwrap(), parse_part("Back:").unwrap()],
        };

        let plan = draft.validate().unwrap();
        assert_eq!(plan.body_parts.len(), 1);
        assert_eq!(plan.body_parts[0].exercises, vec!["Squat"]);
    }
}
