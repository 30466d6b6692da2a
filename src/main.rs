//! # Flower Guide CLI (`flowers`)
//!
//! ## Usage
//!
//! ```bash
//! flowers --config ./config/flowers.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `flowers list` | Print every flower name, sorted |
//! | `flowers show <name>` | Print one flower with its image |
//! | `flowers search "<query>"` | Substring search across all fields |
//! | `flowers random` | Draw a random flower |
//! | `flowers quiz` | Interactive meaning quiz |
//! | `flowers image <name>` | Look up an image only |
//! | `flowers sources` | Show which data files were loaded |
//!
//! Set `RUST_LOG=debug` to see loader and cache activity.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use flower_guide::app::App;
use flower_guide::session::Session;
use flower_guide::{browse, config, quiz, random, search, sources};

/// Flower Guide: browse, search, and quiz yourself on flower meanings.
///
/// Reads CSV files from the configured data directory. If the config file
/// does not exist, built-in defaults are used (`./data/*.csv`, Wikipedia
/// images).
#[derive(Parser)]
#[command(
    name = "flowers",
    about = "Flower Guide: browse, search, and quiz yourself on flower meanings",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/flowers.toml")]
    config: PathBuf,

    /// Show why an image could not be found.
    #[arg(long, global = true)]
    debug: bool,

    /// Skip image lookups entirely.
    #[arg(long, global = true)]
    no_images: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every flower name in sorted order.
    List,

    /// Show everything about one flower.
    Show {
        /// Exact flower name.
        name: String,
    },

    /// Search all fields, case-insensitively.
    Search {
        /// Text to look for.
        query: String,
    },

    /// Draw a random flower.
    Random,

    /// Guess the flower from its meaning.
    Quiz,

    /// Look up an illustrative image by name.
    Image {
        name: String,
    },

    /// List discovered data files and how they loaded.
    Sources,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let cfg = config::load_or_default(&cli.config)?;
    let with_images = !cli.no_images && !matches!(cli.command, Commands::List | Commands::Sources);
    let app = App::open(&cfg, with_images, cli.debug)?;

    let mut rng = rand::thread_rng();
    let mut session = Session::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::List => browse::run_list(&app, &mut out)?,
        Commands::Show { name } => browse::run_show(&app, &name, &mut out)?,
        Commands::Search { query } => search::run_search(&app, &query, &mut out)?,
        Commands::Random => random::run_random(&app, &mut session, &mut rng, &mut out)?,
        Commands::Quiz => {
            let stdin = io::stdin();
            quiz::run_quiz(&app, &mut session, &mut rng, &mut stdin.lock(), &mut out)?;
        }
        Commands::Image { name } => browse::run_image(&app, &name, &mut out)?,
        Commands::Sources => sources::list_sources(&app, &mut out)?,
    }

    out.flush()?;
    Ok(())
}
