use anyhow::Result;
use gymcal_core::store::{FileBackend, WorkoutStore};
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(store: &WorkoutStore<FileBackend>) -> Result<()> {
    if store.is_empty() {
        println!("{}", "No workouts scheduled yet. Plan one with `gymcal plan`.".dimmed());
        return Ok(());
    }

    for workout in store.workouts() {
        println!("{}", workout.render());
    }

    Ok(())
}
