//! Cogniscript CLI: replay and inspect handwriting analysis sessions.
//!
//! Usage:
//!   cogniscript replay <OBSERVATIONS>   Run a recorded session through the analyzer
//!   cogniscript info <OBSERVATIONS>     Show recording statistics
//!   cogniscript config                  Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cogniscript",
    about = "Hand and pen handwriting analysis",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay recorded hand observations through the analyzer
    Replay {
        /// Hand observations (JSONL)
        observations: PathBuf,

        /// Recorded detector output (JSONL)
        #[arg(short, long)]
        detections: Option<PathBuf>,

        /// Source video width
        #[arg(long, default_value = "640")]
        source_width: u32,

        /// Source video height
        #[arg(long, default_value = "480")]
        source_height: u32,

        /// Drawing surface width
        #[arg(long, default_value = "1280")]
        surface_width: u32,

        /// Drawing surface height
        #[arg(long, default_value = "720")]
        surface_height: u32,

        /// Write the ink surface to this PNG
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the final overlay (with ink on top) to this PNG
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Write the session summary to this JSON file
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Show statistics for a recording
    Info {
        /// Hand observations (JSONL)
        observations: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the defaults to the standard location
        #[arg(long)]
        write_default: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = commands::load_config(cli.config.as_deref())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    cogniscript_common::logging::init_logging(&config.logging)?;

    match cli.command {
        Commands::Replay {
            observations,
            detections,
            source_width,
            source_height,
            surface_width,
            surface_height,
            output,
            overlay,
            summary,
        } => {
            commands::replay::run(
                config,
                commands::replay::ReplayArgs {
                    observations,
                    detections,
                    source: (source_width, source_height),
                    surface: (surface_width, surface_height),
                    output,
                    overlay,
                    summary,
                },
            )
            .await
        }
        Commands::Info { observations } => commands::info::run(observations),
        Commands::Config { write_default } => commands::config::run(config, write_default),
    }
}
