pub mod calendar;
pub mod delete;
pub mod export;
pub mod import;
pub mod info;
pub mod list;
pub mod plan;
pub mod record;

use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use dialoguer::Confirm;
use gymcal_core::gymcal_config::GymcalConfig;
use gymcal_core::ics::{calendar_filename, generate_ics, share_filename, share_text};
use gymcal_core::workout::Workout;
use owo_colors::OwoColorize;

use crate::delivery::{self, CalendarFile, DeliveryOutcome, OsShare};

/// Settings every command may need, resolved once at startup.
pub struct Context {
    pub config: GymcalConfig,
    pub tz: Tz,
}

/// Ask a yes/no question, defaulting to no.
fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

/// Encode a workout and hand the file to the calendar app (or save it).
async fn deliver_calendar(workout: &Workout, ctx: &Context, allow_share: bool) -> Result<()> {
    let contents = generate_ics(workout, ctx.tz, Utc::now())?;

    let file = CalendarFile {
        filename: calendar_filename(workout),
        share_filename: share_filename(workout),
        text: share_text(workout),
        contents,
    };

    let share = (allow_share && ctx.config.share)
        .then(|| OsShare::new(ctx.config.data_path().join("share")));

    match delivery::deliver(&file, share.as_ref(), &ctx.config.export_path()).await? {
        DeliveryOutcome::Shared => {
            println!("{}", format!("  Opened {} in your calendar app", file.share_filename).green())
        }
        DeliveryOutcome::Saved(path) => {
            println!("{}", format!("  Saved {}", path.display()).green())
        }
        DeliveryOutcome::Cancelled => println!("{}", "  Cancelled".dimmed()),
    }

    Ok(())
}
