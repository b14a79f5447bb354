//! DocWarp CLI: preview warp effects and generate synthetic datasets.
//!
//! Usage:
//!   docwarp list                        List every effect by family
//!   docwarp apply <EFFECT> <IMAGE>      Render one effect onto an image
//!   docwarp generate <IMAGE>            Render every effect into a dataset
//!   docwarp export-preset <EFFECT> <DEST>  Copy an effect's scene preset
//!   docwarp check                       Check renderer and preset library

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "docwarp",
    about = "Synthetic warped-document dataset generator",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the .blend warp presets
    #[arg(long, global = true)]
    presets: Option<PathBuf>,

    /// Blender executable
    #[arg(long, global = true)]
    blender: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every effect grouped by family
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render a single effect onto a document image
    Apply {
        /// Effect identifier, e.g. "Fold TL"
        effect: String,

        /// Source document image (PNG or JPEG)
        image: PathBuf,

        /// Save the render here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render effects onto a document image into a dataset directory
    Generate {
        /// Source document image (PNG or JPEG)
        image: PathBuf,

        /// Dataset directory (defaults to the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render only this effect (repeatable)
        #[arg(long = "effect")]
        effects: Vec<String>,

        /// Render every effect of this family (repeatable)
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Write a JSON report of the run here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Copy the raw scene preset behind an effect
    ExportPreset {
        /// Effect identifier
        effect: String,

        /// Destination file
        dest: PathBuf,
    },

    /// Check renderer availability and the preset library
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.presets, cli.blender);

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    docwarp_common::logging::init_logging(&logging);
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::List { json } => commands::list::run(&config, json),
        Commands::Apply {
            effect,
            image,
            output,
        } => commands::apply::run(&config, effect, image, output),
        Commands::Generate {
            image,
            output,
            effects,
            groups,
            report,
        } => commands::generate::run(&config, image, output, effects, groups, report).await,
        Commands::ExportPreset { effect, dest } => {
            commands::export_preset::run(&config, effect, dest)
        }
        Commands::Check => commands::check::run(&config),
    }
}
