use std::path::Path;

use anyhow::{Context as _, Result};
use gymcal_core::store::{FileBackend, ImportBatch, WorkoutStore};
use owo_colors::OwoColorize;

pub async fn run(store: &mut WorkoutStore<FileBackend>, file: &Path, yes: bool) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Could not read {}", file.display()))?;

    let batch = ImportBatch::parse(&raw)?;

    let prompt = format!(
        "Import {} workouts? This will replace your current data.",
        batch.len()
    );
    if !yes && !super::confirm(&prompt)? {
        println!("{}", "Nothing imported".dimmed());
        return Ok(());
    }

    let imported = store.replace_all(batch)?;
    println!(
        "{}",
        format!("✓ Successfully imported {} workouts", imported.len()).green()
    );

    Ok(())
}
