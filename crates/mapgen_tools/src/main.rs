//! Random map generator - command-line tools
//!
//! # Usage
//!
//! ```bash
//! # Generate a map and print a preview
//! cargo run -p mapgen_tools -- generate --width 64 --height 64 --players 4 --preview
//!
//! # Generate 100 maps in parallel and print a JSON summary
//! cargo run -p mapgen_tools -- batch --count 100 --seed 1
//!
//! # Check a settings file
//! cargo run -p mapgen_tools -- validate settings.ron
//!
//! # Check that a seed always produces the same map
//! cargo run -p mapgen_tools -- verify --seed 4919 --runs 8
//! ```
//!
//! Logs go to stderr; maps and summaries go to stdout or the output file.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mapgen_core::generator::RandomMapGenerator;
use mapgen_core::random::{MapStyle, RandomConfig};
use mapgen_core::terrain::{LandscapeType, WorldDescription};
use mapgen_tools::{
    batch::{run_batch, verify_determinism, BatchConfig},
    error::ToolResult,
    generate::{export_map, generate, write_map, OutputFormat},
    preview::{render_ascii, PreviewConfig},
    settings_file::{load_settings, load_world, resolve_settings, SettingsOverrides},
};

#[derive(Parser)]
#[command(name = "mapgen")]
#[command(about = "Random map generator tools")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Terrain catalog (RON) instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Water,
    Land,
    Mixed,
    Random,
}

impl From<StyleArg> for MapStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Water => Self::Water,
            StyleArg::Land => Self::Land,
            StyleArg::Mixed => Self::Mixed,
            StyleArg::Random => Self::Random,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LandscapeArg {
    Greenland,
    Wasteland,
    Winter,
}

impl From<LandscapeArg> for LandscapeType {
    fn from(arg: LandscapeArg) -> Self {
        match arg {
            LandscapeArg::Greenland => Self::Greenland,
            LandscapeArg::Wasteland => Self::Wasteland,
            LandscapeArg::Winter => Self::Winter,
        }
    }
}

#[derive(clap::Args)]
struct SettingsArgs {
    /// Settings file (RON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Map width
    #[arg(long)]
    width: Option<u16>,

    /// Map height
    #[arg(long)]
    height: Option<u16>,

    /// Number of players
    #[arg(short, long)]
    players: Option<u32>,

    /// Map style
    #[arg(long, value_enum)]
    style: Option<StyleArg>,

    /// Landscape
    #[arg(long, value_enum)]
    landscape: Option<LandscapeArg>,

    /// Map name
    #[arg(long)]
    name: Option<String>,
}

impl SettingsArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            width: self.width,
            height: self.height,
            players: self.players,
            style: self.style.map(Into::into),
            landscape: self.landscape.map(Into::into),
            name: self.name.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single map
    Generate {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Random seed
        #[arg(long, default_value = "4919")]
        seed: u64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (guessed from the output extension if omitted)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Print an ASCII preview to stderr
        #[arg(long)]
        preview: bool,

        /// Use colors in the preview
        #[arg(long)]
        color: bool,
    },

    /// Generate maps with consecutive seeds in parallel
    Batch {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Number of maps
        #[arg(short, long, default_value = "10")]
        count: u32,

        /// Seed of the first map
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Maximum parallel generations (0 = auto)
        #[arg(long, default_value = "0")]
        parallel: u32,

        /// Write the JSON results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a settings file and print the normalized settings
    Validate {
        /// Settings file (RON)
        path: PathBuf,
    },

    /// Generate one seed repeatedly and check the maps are identical
    Verify {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Random seed
        #[arg(long, default_value = "4919")]
        seed: u64,

        /// Number of runs
        #[arg(short, long, default_value = "4")]
        runs: u32,
    },
}

fn world(catalog: Option<&Path>) -> ToolResult<WorldDescription> {
    match catalog {
        Some(path) => load_world(path),
        None => Ok(WorldDescription::default_terrain()),
    }
}

fn run(cli: Cli) -> ToolResult<()> {
    let world = world(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Generate {
            settings,
            seed,
            output,
            format,
            preview,
            color,
        } => {
            let map_settings = resolve_settings(settings.settings.as_deref(), &settings.overrides())?;
            let generator = RandomMapGenerator::new(RandomConfig::new(map_settings.style, seed), world)?;
            let (map, _) = generate(&generator, &map_settings);

            if preview {
                let config = PreviewConfig {
                    use_color: color,
                    show_legend: true,
                };
                eprint!("{}", render_ascii(&map, generator.world(), &config));
            }

            match output {
                Some(path) => {
                    let format = format
                        .or_else(|| OutputFormat::from_path(&path))
                        .unwrap_or_default();
                    write_map(&map, &path, format)?;
                }
                None => println!("{}", export_map(&map, format.unwrap_or_default())?),
            }
        }

        Commands::Batch {
            settings,
            count,
            seed,
            parallel,
            output,
        } => {
            let map_settings = resolve_settings(settings.settings.as_deref(), &settings.overrides())?;
            let config = BatchConfig {
                count,
                seed_start: seed,
                parallel,
                settings: map_settings,
            };
            let results = run_batch(config, &world)?;
            match output {
                Some(path) => results.save(&path)?,
                None => println!("{}", serde_json::to_string_pretty(&results)?),
            }
        }

        Commands::Validate { path } => {
            let raw = load_settings(&path)?;
            let normalized = raw.validated();
            if normalized != raw {
                tracing::warn!("Settings were corrected during normalization");
            }
            println!("{}", ron::ser::to_string_pretty(&normalized, ron::ser::PrettyConfig::new())?);
            tracing::info!("Validation passed");
        }

        Commands::Verify {
            settings,
            seed,
            runs,
        } => {
            let map_settings = resolve_settings(settings.settings.as_deref(), &settings.overrides())?;
            verify_determinism(
                RandomConfig::new(map_settings.style, seed),
                &map_settings,
                &world,
                runs,
            )?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries maps and summaries.
    // RUST_LOG wins over --verbose.
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
