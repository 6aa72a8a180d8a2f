use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod chat;
pub mod plan;

use plan::PatternArg;

#[derive(Subcommand)]
enum Command {
    /// Start a chat session with scheduling tools
    Chat {},
    /// Preview the events a scheduling request expands to without
    /// creating anything
    Plan {
        /// Title of the event
        #[arg(long)]
        summary: String,

        #[arg(long)]
        description: Option<String>,

        /// Start time in RFC 3339 format (defaults to now)
        #[arg(long)]
        start: Option<String>,

        /// End time in RFC 3339 format (single pattern only)
        #[arg(long)]
        end: Option<String>,

        #[arg(long, value_enum, default_value = "single")]
        pattern: PatternArg,

        /// Total duration in hours
        #[arg(long)]
        total_duration: Option<f64>,

        /// Break duration in hours
        #[arg(long, default_value = "0.25")]
        break_duration: f64,

        /// Work segment duration in hours
        #[arg(long, default_value = "1.25")]
        work_segment_duration: f64,

        /// Attendee email address (repeatable)
        #[arg(long)]
        attendee: Vec<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Chat {}) => {
            chat::run().await?;
        }
        Some(Command::Plan {
            summary,
            description,
            start,
            end,
            pattern,
            total_duration,
            break_duration,
            work_segment_duration,
            attendee,
        }) => {
            plan::run(
                summary,
                description,
                start,
                end,
                pattern,
                total_duration,
                break_duration,
                work_segment_duration,
                attendee,
            )?;
        }
        None => {}
    }

    Ok(())
}
