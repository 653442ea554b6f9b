use anyhow::{Context as _, Result, bail};
use dialoguer::{Input, Select};
use gymcal_core::store::{FileBackend, WorkoutStore};
use gymcal_core::workout::{ActualDraft, ActualDraftExercise, ActualDraftPart, Weight, Workout};
use owo_colors::OwoColorize;

use crate::render::RenderDetail;

use super::Context;

pub async fn run(
    store: &mut WorkoutStore<FileBackend>,
    ctx: &Context,
    id: u64,
    missed: bool,
    sets: &[String],
    no_calendar: bool,
) -> Result<()> {
    let workout = store
        .get(id)
        .with_context(|| format!("No workout with id {}", id))?;

    let draft = if missed {
        ActualDraft::Missed
    } else if !sets.is_empty() {
        draft_from_sets(sets)?
    } else {
        prompt_draft(workout)?
    };

    let record = draft.into_record()?;
    let workout = store.attach_actual(id, record)?.clone();

    println!("{}", "✓ Actual workout data saved".green());
    println!("{}", workout.render_detail());

    if !no_calendar {
        super::deliver_calendar(&workout, ctx, true).await?;
    }

    Ok(())
}

/// Parse one "Part/Exercise=Weight" argument.
fn parse_set(input: &str) -> Result<(String, ActualDraftExercise)> {
    let Some((target, weight)) = input.split_once('=') else {
        bail!("Invalid set '{}'. Expected BODY_PART/EXERCISE=WEIGHT", input);
    };
    let Some((body_part, exercise)) = target.split_once('/') else {
        bail!("Invalid set '{}'. Expected BODY_PART/EXERCISE=WEIGHT", input);
    };

    let na = matches!(Weight::parse(weight), Ok(Weight::NotApplicable));

    Ok((
        body_part.trim().to_string(),
        ActualDraftExercise {
            exercise: exercise.trim().to_string(),
            weight: if na { String::new() } else { weight.trim().to_string() },
            na,
        },
    ))
}

/// Group `--set` arguments by body part, keeping first-seen order.
fn draft_from_sets(sets: &[String]) -> Result<ActualDraft> {
    let mut parts: Vec<ActualDraftPart> = Vec::new();

    for set in sets {
        let (body_part, exercise) = parse_set(set)?;
        match parts.iter_mut().find(|p| p.body_part == body_part) {
            Some(part) => part.exercises.push(exercise),
            None => parts.push(ActualDraftPart {
                body_part,
                exercises: vec![exercise],
            }),
        }
    }

    Ok(ActualDraft::Attended(parts))
}

/// Walk through the planned exercises asking for each weight.
fn prompt_draft(workout: &Workout) -> Result<ActualDraft> {
    println!("{}", workout.render_detail());
    println!();

    let went = Select::new()
        .with_prompt("  Did you go to the gym?")
        .items(&["Yes", "No"])
        .default(0)
        .interact()?;

    if went == 1 {
        return Ok(ActualDraft::Missed);
    }

    let mut parts = match ActualDraft::from_plan(workout) {
        ActualDraft::Attended(parts) => parts,
        missed => return Ok(missed),
    };

    println!(
        "{}",
        "  Enter the weight in kg, NA if it doesn't apply, or leave empty to skip".dimmed()
    );

    for part in parts.iter_mut() {
        println!("  {}", part.body_part.bold());
        for exercise in part.exercises.iter_mut() {
            let answer: String = Input::new()
                .with_prompt(format!("    {}", exercise.exercise))
                .allow_empty(true)
                .validate_with(|input: &String| -> Result<(), String> {
                    if input.trim().is_empty() {
                        return Ok(());
                    }
                    Weight::parse(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()?;

            match Weight::parse(&answer) {
                Ok(Weight::NotApplicable) => exercise.na = true,
                Ok(Weight::Kg(kg)) => exercise.weight = kg,
                Err(_) => {}
            }
        }
    }

    // Empty answer means the exercise was skipped
    for part in parts.iter_mut() {
        part.exercises.retain(|e| e.na || !e.weight.is_empty());
    }

    Ok(ActualDraft::Attended(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymcal_core::workout::ActualRecord;

    #[test]
    fn parses_weight_and_na_sets() {
        let (part, ex) = parse_set("Legs/Squat=100").unwrap();
        assert_eq!(part, "Legs");
        assert_eq!(ex.exercise, "Squat");
        assert_eq!(ex.weight, "100");
        assert!(!ex.na);

        let (_, ex) = parse_set("Legs/Plank = n/a").unwrap();
        assert!(ex.na);
        assert!(ex.weight.is_empty());
    }

    #[test]
    fn malformed_sets_are_rejected() {
        assert!(parse_set("Legs/Squat").is_err());
        assert!(parse_set("Squat=100").is_err());
    }

    #[test]
    fn sets_are_grouped_by_body_part() {
        let sets = vec![
            "Legs/Squat=100".to_string(),
            "Back/Row=60".to_string(),
            "Legs/Lunge=NA".to_string(),
        ];

        let ActualDraft::Attended(parts) = draft_from_sets(&sets).unwrap() else {
            panic!("expected an attended draft");
        };

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].body_part, "Legs");
        assert_eq!(parts[0].exercises.len(), 2);
        assert_eq!(parts[1].body_part, "Back");
    }

    #[test]
    fn sets_become_a_record() {
        let sets = vec!["Legs/Squat=82.5".to_string(), "Legs/Plank=NA".to_string()];

        let record = draft_from_sets(&sets).unwrap().into_record().unwrap();

        let ActualRecord::Attended(parts) = record else {
            panic!("expected attended");
        };
        assert_eq!(parts[0].exercises[0].weight, Weight::Kg("82.5".into()));
        assert_eq!(parts[0].exercises[1].weight, Weight::NotApplicable);
    }

    #[test]
    fn invalid_weight_fails_on_record() {
        let sets = vec!["Legs/Squat=-5".to_string()];
        assert!(draft_from_sets(&sets).unwrap().into_record().is_err());
    }
}
