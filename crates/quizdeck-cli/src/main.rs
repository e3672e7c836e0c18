//! The quizdeck command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizdeck", version, about = "Terminal self-quiz over tagged question sets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive quiz
    Play {
        /// Profile to load (default: from config, usually "all")
        #[arg(long)]
        profile: Option<String>,

        /// Only ask questions carrying any of these tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,

        /// Seed for reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Read questions from this directory instead of the configured source
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate the manifest and every question file
    Validate {
        /// Read questions from this directory instead of the configured source
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the tags of a profile with question counts
    Tags {
        /// Profile to inspect
        #[arg(long)]
        profile: Option<String>,

        /// Read questions from this directory instead of the configured source
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Shuffle multiple-choice options in question files
    Shuffle {
        /// A single question file (default: every *-questions.json in --data-dir)
        file: Option<PathBuf>,

        /// Directory holding the question files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Create starter config and example question set
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizdeck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            profile,
            tags,
            seed,
            data_dir,
            config,
        } => commands::play::execute(profile, tags, seed, data_dir, config).await,
        Commands::Validate { data_dir, config } => {
            commands::validate::execute(data_dir, config).await
        }
        Commands::Tags {
            profile,
            data_dir,
            config,
        } => commands::tags::execute(profile, data_dir, config).await,
        Commands::Shuffle {
            file,
            data_dir,
            seed,
        } => commands::shuffle::execute(file, data_dir, seed),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
