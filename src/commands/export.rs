use std::path::PathBuf;

use anyhow::Result;
use gymcal_core::store::{FileBackend, WorkoutStore};
use owo_colors::OwoColorize;

use crate::delivery;

use super::Context;

pub async fn run(
    store: &WorkoutStore<FileBackend>,
    ctx: &Context,
    out: Option<PathBuf>,
) -> Result<()> {
    let export = store.export_all()?;
    let dir = out.unwrap_or_else(|| ctx.config.export_path());

    let path = delivery::save(&dir, &export.filename, &export.contents).await?;

    println!(
        "{}",
        format!("✓ Exported {} workouts to {}", store.len(), path.display()).green()
    );

    Ok(())
}
