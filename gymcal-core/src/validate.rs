//! Shape checks for workout collections that come from outside the store.
//!
//! Decoding answers "is this a list of workout-shaped objects?"; the checks on
//! top answer "does every workout satisfy the model invariants?". Both return
//! a message instead of panicking so callers can pick the error kind.

use std::collections::HashSet;

use serde_json::Value;

use crate::workout::{ActualRecord, Workout};

/// Decode a JSON array of workouts without checking invariants.
pub fn decode_collection(raw: &str) -> Result<Vec<Workout>, String> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| format!("not valid JSON ({})", e))?;

    let Value::Array(items) = value else {
        return Err("expected a list of workouts".to_string());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Workout>(item)
                .map_err(|e| format!("workout #{}: {}", i + 1, e))
        })
        .collect()
}

/// Decode and check every workout, rejecting the whole collection on the
/// first problem.
pub fn parse_collection(raw: &str) -> Result<Vec<Workout>, String> {
    let workouts = decode_collection(raw)?;

    let mut seen = HashSet::new();
    for (i, workout) in workouts.iter().enumerate() {
        check_workout(workout).map_err(|e| format!("workout #{}: {}", i + 1, e))?;
        if !seen.insert(workout.id) {
            return Err(format!("workout #{}: duplicate id {}", i + 1, workout.id));
        }
    }

    Ok(workouts)
}

pub fn check_workout(workout: &Workout) -> Result<(), String> {
    if workout.body_parts.is_empty() {
        return Err("no body parts planned".to_string());
    }

    for bp in &workout.body_parts {
        if bp.body_part.trim().is_empty() {
            return Err("body part without a name".to_string());
        }
        if bp.exercises.is_empty() {
            return Err(format!("body part '{}' has no exercises", bp.body_part));
        }
        if bp.exercises.iter().any(|e| e.trim().is_empty()) {
            return Err(format!("body part '{}' has a blank exercise", bp.body_part));
        }
    }

    match &workout.actual {
        Some(actual) => check_actual(actual),
        None => Ok(()),
    }
}

/// Weights are already valid once deserialized; this covers the structure.
pub fn check_actual(actual: &ActualRecord) -> Result<(), String> {
    let ActualRecord::Attended(data) = actual else {
        return Ok(());
    };

    if data.is_empty() {
        return Err("attended workout has no actual data".to_string());
    }

    for bp in data {
        if bp.body_part.trim().is_empty() {
            return Err("actual body part without a name".to_string());
        }
        if bp.exercises.is_empty() {
            return Err(format!("actual body part '{}' has no exercises", bp.body_part));
        }
        if bp.exercises.iter().any(|e| e.exercise.trim().is_empty()) {
            return Err(format!(
                "actual body part '{}' has an exercise without a name",
                bp.body_part
            ));
        }
    }

    Ok(())
}
