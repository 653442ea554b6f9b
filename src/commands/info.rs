use anyhow::Result;
use gymcal_core::store::{Backend, FileBackend, WorkoutStore};
use owo_colors::OwoColorize;

use crate::render::Render;

use super::Context;

pub fn run(store: &mut WorkoutStore<FileBackend>, ctx: &Context) -> Result<()> {
    let available = store.backend_mut().is_available();
    let usage = store.usage();

    println!("{} {}", "Data:".bold(), store.backend().dir().display());
    println!("{} {}", "Exports:".bold(), ctx.config.export_path().display());
    println!("{} {}", "Timezone:".bold(), ctx.tz.name());
    println!("{} {}", "Storage:".bold(), usage.render());

    if available {
        println!("{} {}", "Status:".bold(), "writable".green());
    } else {
        println!("{} {}", "Status:".bold(), "not writable".red());
    }

    Ok(())
}
