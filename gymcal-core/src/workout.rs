//! Workout types.
//!
//! A `Workout` is one planned gym session on a calendar date. The serialized
//! form uses camelCase keys (`bodyParts`, `bodyPart`) so that backups written
//! by earlier versions of the app import unchanged.

use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::NA_WEIGHT;
use crate::error::{GymcalError, GymcalResult};

/// A planned gym session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Millisecond creation timestamp, unique within a store
    pub id: u64,
    pub date: NaiveDate,
    pub body_parts: Vec<PlannedBodyPart>,
    /// What actually happened. `None` until the user records an outcome.
    #[serde(default)]
    pub actual: Option<ActualRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedBodyPart {
    pub body_part: String,
    pub exercises: Vec<String>,
}

/// Outcome of a planned session.
///
/// Serialized as `{ "went": bool, "data": [...] | null }`. Skipped sessions
/// never carry data, which the enum makes unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawActual", into = "RawActual")]
pub enum ActualRecord {
    Missed,
    Attended(Vec<ActualBodyPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualBodyPart {
    pub body_part: String,
    pub exercises: Vec<ActualExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualExercise {
    pub exercise: String,
    pub weight: Weight,
}

#[derive(Serialize, Deserialize)]
struct RawActual {
    went: bool,
    #[serde(default)]
    data: Option<Vec<ActualBodyPart>>,
}

impl TryFrom<RawActual> for ActualRecord {
    type Error = String;

    fn try_from(raw: RawActual) -> Result<Self, Self::Error> {
        match (raw.went, raw.data) {
            (false, None) => Ok(ActualRecord::Missed),
            (false, Some(_)) => Err("a missed workout cannot carry actual data".to_string()),
            (true, Some(data)) => Ok(ActualRecord::Attended(data)),
            (true, None) => Err("an attended workout needs actual data".to_string()),
        }
    }
}

impl From<ActualRecord> for RawActual {
    fn from(actual: ActualRecord) -> Self {
        match actual {
            ActualRecord::Missed => RawActual {
                went: false,
                data: None,
            },
            ActualRecord::Attended(data) => RawActual {
                went: true,
                data: Some(data),
            },
        }
    }
}

/// Weight lifted for one exercise.
///
/// `Kg` keeps the numeric text exactly as entered so that `82.50` survives a
/// save/load cycle byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Weight {
    Kg(String),
    NotApplicable,
}

impl Weight {
    /// Parse user input: a positive number of kilograms, or `NA` / `N/A`.
    pub fn parse(input: &str) -> GymcalResult<Weight> {
        let trimmed = input.trim();

        if trimmed.eq_ignore_ascii_case(NA_WEIGHT) || trimmed.eq_ignore_ascii_case("N/A") {
            return Ok(Weight::NotApplicable);
        }

        match trimmed.parse::<f64>() {
            Ok(kg) if kg.is_finite() && kg > 0.0 => Ok(Weight::Kg(trimmed.to_string())),
            _ => Err(GymcalError::Validation(format!(
                "Invalid weight '{}'. Expected a positive number of kg or NA",
                input
            ))),
        }
    }

    fn as_stored(&self) -> &str {
        match self {
            Weight::Kg(kg) => kg,
            Weight::NotApplicable => NA_WEIGHT,
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Weight::Kg(kg) => write!(f, "{} kg", kg),
            Weight::NotApplicable => write!(f, "N/A"),
        }
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_stored())
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WeightVisitor;

        impl<'de> Visitor<'de> for WeightVisitor {
            type Value = Weight;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a positive weight in kg or \"NA\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Weight, E> {
                Weight::parse(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Weight, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Weight, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Weight, E> {
                self.visit_str(&v.to_string())
            }
        }

        deserializer.deserialize_any(WeightVisitor)
    }
}

impl Workout {
    pub fn body_part_names(&self) -> Vec<&str> {
        self.body_parts.iter().map(|bp| bp.body_part.as_str()).collect()
    }

    /// Calendar title, e.g. "Legs + Back Workout".
    pub fn title(&self) -> String {
        format!("{} Workout", self.body_part_names().join(" + "))
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.title(), self.date.format("%Y-%m-%d"))
    }
}

// DRAFTS:

/// Raw plan input, as collected from the user before validation.
#[derive(Debug, Clone, Default)]
pub struct PlanDraft {
    pub date: String,
    pub body_parts: Vec<PlanDraftPart>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanDraftPart {
    pub body_part: String,
    pub exercises: Vec<String>,
}

/// A plan that passed validation and is ready to be given an id.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPlan {
    pub date: NaiveDate,
    pub body_parts: Vec<PlannedBodyPart>,
}

impl PlanDraft {
    /// Drop blank rows, then require a date and at least one body part with
    /// an exercise.
    pub fn validate(&self) -> GymcalResult<ValidPlan> {
        if self.date.trim().is_empty() {
            return Err(GymcalError::Validation("Please select a date".into()));
        }
        let date = crate::date::parse_date(&self.date)?;

        let body_parts: Vec<PlannedBodyPart> = self
            .body_parts
            .iter()
            .filter_map(|bp| {
                let name = bp.body_part.trim();
                let exercises: Vec<String> = bp
                    .exercises
                    .iter()
                    .map(|e| e.trim())
                    .filter(|e| !e.is_empty())
                    .map(String::from)
                    .collect();

                if name.is_empty() || exercises.is_empty() {
                    None
                } else {
                    Some(PlannedBodyPart {
                        body_part: name.to_string(),
                        exercises,
                    })
                }
            })
            .collect();

        if body_parts.is_empty() {
            return Err(GymcalError::Validation(
                "Please add at least one body part with exercises".into(),
            ));
        }

        Ok(ValidPlan { date, body_parts })
    }
}

/// Raw actuals input. Each exercise row carries the weight text and the
/// "N/A" checkbox separately.
#[derive(Debug, Clone)]
pub enum ActualDraft {
    Missed,
    Attended(Vec<ActualDraftPart>),
}

#[derive(Debug, Clone, Default)]
pub struct ActualDraftPart {
    pub body_part: String,
    pub exercises: Vec<ActualDraftExercise>,
}

#[derive(Debug, Clone, Default)]
pub struct ActualDraftExercise {
    pub exercise: String,
    pub weight: String,
    pub na: bool,
}

impl ActualDraftExercise {
    fn is_filled(&self) -> bool {
        !self.exercise.trim().is_empty() && (self.na || !self.weight.trim().is_empty())
    }
}

impl ActualDraft {
    /// Prefill an attended draft with the planned exercises, weights empty.
    pub fn from_plan(workout: &Workout) -> Self {
        let parts = workout
            .body_parts
            .iter()
            .map(|bp| ActualDraftPart {
                body_part: bp.body_part.clone(),
                exercises: bp
                    .exercises
                    .iter()
                    .map(|ex| ActualDraftExercise {
                        exercise: ex.clone(),
                        ..Default::default()
                    })
                    .collect(),
            })
            .collect();
        ActualDraft::Attended(parts)
    }

    pub fn into_record(self) -> GymcalResult<ActualRecord> {
        let parts = match self {
            ActualDraft::Missed => return Ok(ActualRecord::Missed),
            ActualDraft::Attended(parts) => parts,
        };

        let missing: Vec<&str> = parts
            .iter()
            .flat_map(|bp| bp.exercises.iter())
            .filter(|ex| !ex.exercise.trim().is_empty() && !ex.is_filled())
            .map(|ex| ex.exercise.trim())
            .collect();

        if !missing.is_empty() {
            return Err(GymcalError::Validation(format!(
                "Please enter weight (kg) or mark as N/A for all exercises. Missing weight/N/A for: {}",
                missing.join(", ")
            )));
        }

        let mut data = Vec::new();
        for bp in &parts {
            let name = bp.body_part.trim();
            if name.is_empty() {
                continue;
            }

            let mut exercises = Vec::new();
            for ex in bp.exercises.iter().filter(|ex| ex.is_filled()) {
                let weight = if ex.na {
                    Weight::NotApplicable
                } else {
                    Weight::parse(&ex.weight)?
                };
                exercises.push(ActualExercise {
                    exercise: ex.exercise.trim().to_string(),
                    weight,
                });
            }

            if !exercises.is_empty() {
                data.push(ActualBodyPart {
                    body_part: name.to_string(),
                    exercises,
                });
            }
        }

        if data.is_empty() {
            return Err(GymcalError::Validation(
                "Please add at least one exercise with weight or N/A".into(),
            ));
        }

        Ok(ActualRecord::Attended(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str, exercises: &[&str]) -> PlanDraftPart {
        PlanDraftPart {
            body_part: name.to_string(),
            exercises: exercises.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn entry(exercise: &str, weight: &str, na: bool) -> ActualDraftExercise {
        ActualDraftExercise {
            exercise: exercise.to_string(),
            weight: weight.to_string(),
            na,
        }
    }

    #[test]
    fn workout_json_uses_camel_case_field_names() {
        let json = r#"{
            "id": 1705300000000,
            "date": "2024-01-15",
            "bodyParts": [{ "bodyPart": "Legs", "exercises": ["Squat"] }],
            "actual": { "went": true, "data": [
                { "bodyPart": "Legs", "exercises": [{ "exercise": "Squat", "weight": "100" }] }
            ] }
        }"#;

        let workout: Workout = serde_json::from_str(json).unwrap();
        assert_eq!(workout.id, 1705300000000);
        assert_eq!(workout.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(workout.body_parts[0].body_part, "Legs");

        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(value["bodyParts"][0]["bodyPart"], "Legs");
        assert_eq!(value["actual"]["went"], true);
        assert_eq!(value["actual"]["data"][0]["exercises"][0]["weight"], "100");
    }

    #[test]
    fn missed_actual_serializes_with_null_data() {
        let value = serde_json::to_value(ActualRecord::Missed).unwrap();
        assert_eq!(value, serde_json::json!({ "went": false, "data": null }));
    }

    #[test]
    fn unrecorded_workout_serializes_actual_as_null() {
        let workout = Workout {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            body_parts: vec![PlannedBodyPart {
                body_part: "Legs".into(),
                exercises: vec!["Squat".into()],
            }],
            actual: None,
        };
        let value = serde_json::to_value(&workout).unwrap();
        assert!(value["actual"].is_null());
    }

    #[test]
    fn inconsistent_actual_is_rejected() {
        let missed_with_data = r#"{ "went": false, "data": [] }"#;
        assert!(serde_json::from_str::<ActualRecord>(missed_with_data).is_err());

        let attended_without_data = r#"{ "went": true, "data": null }"#;
        assert!(serde_json::from_str::<ActualRecord>(attended_without_data).is_err());
    }

    #[test]
    fn weight_accepts_numbers_and_sentinel() {
        assert_eq!(Weight::parse("82.5").unwrap(), Weight::Kg("82.5".into()));
        assert_eq!(Weight::parse(" NA ").unwrap(), Weight::NotApplicable);
        assert_eq!(Weight::parse("n/a").unwrap(), Weight::NotApplicable);
        assert!(Weight::parse("").is_err());
        assert!(Weight::parse("0").is_err());
        assert!(Weight::parse("-5").is_err());
        assert!(Weight::parse("heavy").is_err());

        let from_number: Weight = serde_json::from_str("60").unwrap();
        assert_eq!(from_number, Weight::Kg("60".into()));
        assert_eq!(serde_json::to_string(&Weight::NotApplicable).unwrap(), "\"NA\"");
    }

    #[test]
    fn weight_display() {
        assert_eq!(Weight::Kg("100".into()).to_string(), "100 kg");
        assert_eq!(Weight::NotApplicable.to_string(), "N/A");
    }

    #[test]
    fn plan_draft_drops_blank_rows() {
        let draft = PlanDraft {
            date: "2024-01-15".into(),
            body_parts: vec![
                part("Legs", &["Squat", "  ", "Lunge"]),
                part("", &["Row"]),
                part("Back", &[""]),
            ],
        };

        let plan = draft.validate().unwrap();
        assert_eq!(plan.body_parts.len(), 1);
        assert_eq!(plan.body_parts[0].exercises, vec!["Squat", "Lunge"]);
    }

    #[test]
    fn plan_draft_requires_date_and_exercises() {
        let no_date = PlanDraft {
            date: String::new(),
            body_parts: vec![part("Legs", &["Squat"])],
        };
        assert!(matches!(no_date.validate(), Err(GymcalError::Validation(_))));

        let empty = PlanDraft {
            date: "2024-01-15".into(),
            body_parts: vec![part("Legs", &[""])],
        };
        assert!(matches!(empty.validate(), Err(GymcalError::Validation(_))));

        let bad_date = PlanDraft {
            date: "15/01/2024".into(),
            body_parts: vec![part("Legs", &["Squat"])],
        };
        assert!(matches!(bad_date.validate(), Err(GymcalError::Validation(_))));
    }

    #[test]
    fn actual_draft_lists_exercises_missing_weight() {
        let draft = ActualDraft::Attended(vec![ActualDraftPart {
            body_part: "Legs".into(),
            exercises: vec![entry("Squat", "", false), entry("Lunge", "", false)],
        }]);

        let err = draft.into_record().unwrap_err().to_string();
        assert!(err.contains("Squat, Lunge"), "got: {}", err);
    }

    #[test]
    fn actual_draft_keeps_filled_rows() {
        let draft = ActualDraft::Attended(vec![
            ActualDraftPart {
                body_part: "Legs".into(),
                exercises: vec![entry("Squat", "100", false), entry("", "", false)],
            },
            ActualDraftPart {
                body_part: "Core".into(),
                exercises: vec![entry("Plank", "", true)],
            },
        ]);

        let record = draft.into_record().unwrap();
        let ActualRecord::Attended(data) = record else {
            panic!("expected attended record");
        };
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].exercises.len(), 1);
        assert_eq!(data[1].exercises[0].weight, Weight::NotApplicable);
    }

    #[test]
    fn actual_draft_with_nothing_filled_is_rejected() {
        let draft = ActualDraft::Attended(vec![ActualDraftPart {
            body_part: "Legs".into(),
            exercises: vec![entry("", "", false)],
        }]);
        assert!(matches!(draft.into_record(), Err(GymcalError::Validation(_))));
    }

    #[test]
    fn actual_draft_from_plan_copies_exercises() {
        let workout = Workout {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            body_parts: vec![PlannedBodyPart {
                body_part: "Legs".into(),
                exercises: vec!["Squat".into(), "Lunge".into()],
            }],
            actual: None,
        };

        let ActualDraft::Attended(parts) = ActualDraft::from_plan(&workout) else {
            panic!("expected attended draft");
        };
        assert_eq!(parts[0].body_part, "Legs");
        assert_eq!(parts[0].exercises[1].exercise, "Lunge");
        assert!(parts[0].exercises.iter().all(|e| e.weight.is_empty() && !e.na));
    }

    #[test]
    fn title_joins_body_parts() {
        let workout = Workout {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            body_parts: vec![
                PlannedBodyPart {
                    body_part: "Legs".into(),
                    exercises: vec!["Squat".into()],
                },
                PlannedBodyPart {
                    body_part: "Back".into(),
                    exercises: vec!["Row".into()],
                },
            ],
            actual: None,
        };
        assert_eq!(workout.title(), "Legs + Back Workout");
    }
}
