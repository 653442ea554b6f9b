//! Core types for gymcal.
//!
//! This crate provides everything the CLI builds on:
//! - `workout` for the workout model and user-input drafts
//! - `store` for the persisted, date-ordered workout collection
//! - `ics` for turning a workout into a calendar file
//! - `date` for the fixed session window and date formatting

pub mod constants;
pub mod date;
pub mod error;
pub mod gymcal_config;
pub mod ics;
pub mod store;
pub mod validate;
pub mod workout;

pub use error::{GymcalError, GymcalResult};
pub use workout::*;
