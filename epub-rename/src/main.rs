mod config;
mod error;
mod filename;
mod metadata;
mod rename;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use metadata::{ExtractorKind, get_extractor};
use rename::RenameOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "epub-rename",
    about = "Rename epub files to \"Title - Author\" from their metadata",
    long_about = "Walks a directory tree and renames every epub file to \"Title - Author.epub\" using the title and author stored inside the book"
)]
#[command(version)]
struct Args {
    /// Directory to search for epub files (defaults to current directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Drop stop words (the, a, at) from titles
    #[arg(long)]
    strip_stopwords: bool,

    /// Use the legacy extractor built on the epub crate
    #[arg(long)]
    legacy: bool,

    /// Show what would be renamed without renaming
    #[arg(long)]
    dry_run: bool,

    /// Enable debug mode for verbose output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Configuration subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Turn stop-word removal on or off by default
    SetStopwords {
        /// "on" or "off"
        value: String,
    },
    /// Set the default metadata extractor
    SetExtractor {
        /// direct or legacy
        extractor: String,
    },
}

/// Handle config subcommands
fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            let path = Config::config_path()?;
            println!("Config file: {}", path.display());
            println!();
            println!("{:#?}", config);
        }
        ConfigAction::SetStopwords { value } => {
            let enabled = match value.to_lowercase().as_str() {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                _ => anyhow::bail!("Expected \"on\" or \"off\", got \"{}\"", value),
            };
            let mut config = Config::load()?;
            config.strip_stopwords = enabled;
            config.save()?;
            println!(
                "Stop-word removal {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        ConfigAction::SetExtractor { extractor } => {
            let kind = ExtractorKind::from_str(extractor)?;
            let mut config = Config::load()?;
            config.extractor = kind;
            config.save()?;
            println!("Default extractor set to: {}", get_extractor(kind).name());
        }
    }
    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let config = Config::load().context("Failed to load configuration")?;

    // Determine target directory
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    let dir = dir
        .canonicalize()
        .context(format!("Invalid directory: {}", dir.display()))?;

    let kind = if args.legacy {
        ExtractorKind::Legacy
    } else {
        config.extractor
    };
    let extractor = get_extractor(kind);

    let options = RenameOptions {
        extension: config.extension.clone(),
        stopwords: (args.strip_stopwords || config.strip_stopwords)
            .then(|| config.stopwords.clone()),
        dry_run: args.dry_run,
    };

    let summary = rename::run(&dir, extractor.as_ref(), &options)?;

    if args.debug || args.dry_run {
        println!("---");
        println!(
            "Renamed: {}, Skipped: {}, Errors: {}",
            summary.renamed, summary.skipped, summary.errors
        );
    }

    Ok(())
}
