//! coursewatch CLI
//!
//! Runs a single check or the polling loop against the configured course.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coursewatch::{
    error::{AppError, Result},
    models::Config,
    pipeline::{CourseLayout, Watcher},
    services::{CanvasClient, ChannelSink, CourseSource, DiscordClient, LogSink},
    storage::{LocalWatermarkStore, WatermarkStore, snapshot},
    utils::http,
};

/// coursewatch - Canvas course announcer
#[derive(Parser, Debug)]
#[command(
    name = "coursewatch",
    version,
    about = "Announces new Canvas course content on Discord"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Canvas API token
    #[arg(long, env = "CANVAS_TOKEN", hide_env_values = true)]
    canvas_token: Option<String>,

    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    discord_token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one check cycle and exit
    Check {
        /// Log the announcement instead of posting it
        #[arg(long)]
        dry_run: bool,
    },

    /// Check on the configured interval until interrupted
    Watch {
        /// Log announcements instead of posting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Dump current assignments, files and folders as JSON
    Snapshot {
        /// Output directory
        #[arg(short, long, default_value = "storage/snapshots")]
        out: PathBuf,
    },

    /// Mark everything posted so far as already announced
    MarkSeen,

    /// Show the stored watermark
    Info,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn require(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("{name} is not set")))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli.config)?;
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    log::info!("Loaded configuration from {}", cli.config.display());

    let store = LocalWatermarkStore::new(&config.paths.last_check_file);

    match cli.command {
        Command::Validate => {
            log::info!(
                "✓ Config OK (course {}, {} tracked folders, homework folder {:?})",
                config.canvas.course_id,
                config.folders.tracked.len(),
                config.folders.homework_folder()
            );
        }

        Command::Info => {
            log::info!("Watermark file: {}", store.path().display());
            match store.load().await? {
                Some(instant) => log::info!("Last checked: {}", instant.to_rfc3339()),
                None => log::info!("No check recorded yet."),
            }
        }

        Command::MarkSeen => {
            let (this_check, last_check) = store.read_and_advance().await?;
            log::info!(
                "Marked content up to {} as seen (previous watermark {})",
                this_check.to_rfc3339(),
                last_check.to_rfc3339()
            );
        }

        Command::Snapshot { out } => {
            let client = http::create_client(&config.http)?;
            let canvas = CanvasClient::from_config(
                &config,
                client,
                require(cli.canvas_token, "CANVAS_TOKEN")?,
            );

            let (assignments, folders, files) =
                futures::try_join!(canvas.assignments(), canvas.folders(), canvas.files())?;
            let summary = snapshot::export_course(&out, &assignments, &files, &folders).await?;
            log::info!(
                "Snapshot saved to {}: {} assignments, {} files, {} folders",
                out.display(),
                summary.assignments,
                summary.files,
                summary.folders
            );
        }

        Command::Check { dry_run } | Command::Watch { dry_run } => {
            let watch = matches!(cli.command, Command::Watch { .. });
            let layout = CourseLayout::from_config(&config)?;
            let client = http::create_client(&config.http)?;

            let canvas = CanvasClient::from_config(
                &config,
                client.clone(),
                require(cli.canvas_token, "CANVAS_TOKEN")?,
            );
            let sink: Box<dyn ChannelSink> = if dry_run {
                Box::new(LogSink)
            } else {
                Box::new(DiscordClient::from_config(
                    &config,
                    client,
                    require(cli.discord_token, "DISCORD_TOKEN")?,
                ))
            };

            let watcher = Watcher::new(&layout, &canvas, sink.as_ref(), &store);
            if watch {
                watcher.run(config.schedule.interval()).await?;
            } else {
                let report = watcher.tick().await?;
                log::info!(
                    "New: {} files, {} assignments, {} folders; updated: {} files, {} assignments",
                    report.new_files,
                    report.new_assignments,
                    report.new_folders,
                    report.updated_files,
                    report.updated_assignments
                );
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
