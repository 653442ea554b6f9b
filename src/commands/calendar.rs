use anyhow::{Context as _, Result};
use gymcal_core::store::{FileBackend, WorkoutStore};

use super::Context;

pub async fn run(
    store: &WorkoutStore<FileBackend>,
    ctx: &Context,
    id: u64,
    save: bool,
) -> Result<()> {
    let workout = store
        .get(id)
        .with_context(|| format!("No workout with id {}", id))?;

    println!("📅 {}", workout);
    super::deliver_calendar(workout, ctx, !save).await
}
