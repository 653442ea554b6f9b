mod commands;
mod delivery;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gymcal_core::date::resolve_local_timezone;
use gymcal_core::gymcal_config::GymcalConfig;
use gymcal_core::store::WorkoutStore;
use tracing_subscriber::EnvFilter;

use commands::Context;

#[derive(Parser)]
#[command(name = "gymcal")]
#[command(about = "Plan gym workouts, record what you lifted, and add them to your calendar")]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a new workout
    Plan {
        /// Workout date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Body part and its exercises, e.g. "Legs:Squat,Lunge". Repeatable.
        #[arg(short, long = "part", required = true)]
        parts: Vec<String>,
    },
    /// List scheduled workouts
    List,
    /// Record what actually happened for a workout
    Record {
        id: u64,

        /// You did not go to the gym
        #[arg(long, conflicts_with = "sets")]
        missed: bool,

        /// Weight for one exercise, e.g. "Legs/Squat=100" or "Legs/Squat=NA". Repeatable.
        #[arg(short, long = "set")]
        sets: Vec<String>,

        /// Don't produce a calendar file afterwards
        #[arg(long)]
        no_calendar: bool,
    },
    /// Create the calendar file for a workout
    Calendar {
        id: u64,

        /// Only save the file, don't open it in the calendar app
        #[arg(long)]
        save: bool,
    },
    /// Delete a workout
    Delete {
        id: u64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Write all workouts to a JSON backup file
    Export {
        /// Directory to write to (defaults to the configured export_dir)
        #[arg(short, long)]
        out: Option<std::path::PathBuf>,
    },
    /// Replace all workouts with the contents of a JSON backup file
    Import {
        file: std::path::PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show storage usage
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = GymcalConfig::load()?;
    let tz = resolve_local_timezone(config.timezone.as_deref())?;
    let mut store = WorkoutStore::open(config.backend());
    let ctx = Context { config, tz };

    match cli.command {
        Commands::Plan { date, parts } => commands::plan::run(&mut store, &ctx, date, &parts),
        Commands::List => commands::list::run(&store),
        Commands::Record {
            id,
            missed,
            sets,
            no_calendar,
        } => commands::record::run(&mut store, &ctx, id, missed, &sets, no_calendar).await,
        Commands::Calendar { id, save } => commands::calendar::run(&store, &ctx, id, save).await,
        Commands::Delete { id, yes } => commands::delete::run(&mut store, id, yes),
        Commands::Export { out } => commands::export::run(&store, &ctx, out).await,
        Commands::Import { file, yes } => commands::import::run(&mut store, &file, yes).await,
        Commands::Info => commands::info::run(&mut store, &ctx),
    }
}
