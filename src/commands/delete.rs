use anyhow::{Context as _, Result};
use gymcal_core::store::{FileBackend, WorkoutStore};
use owo_colors::OwoColorize;

use crate::render::RenderDetail;

pub fn run(store: &mut WorkoutStore<FileBackend>, id: u64, yes: bool) -> Result<()> {
    let workout = store
        .get(id)
        .with_context(|| format!("No workout with id {}", id))?;

    println!("{}", workout.render_detail());

    if !yes && !super::confirm("Are you sure you want to delete this workout?")? {
        println!("{}", "Nothing deleted".dimmed());
        return Ok(());
    }

    let removed = store.remove(id)?;
    println!("{}", format!("✓ Deleted {}", removed).green());

    Ok(())
}
