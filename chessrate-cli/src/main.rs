//! chessrate - compare Lichess and Chess.com speed ratings
//!
//! Takes two comma-separated handle lists, pairs them by position, looks up
//! bullet and blitz ratings on both services and prints one row per pair.
//!
//! Handle lists are remembered between runs unless disabled.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use chessrate_cli::input::{choose_input, clear_remembered};
use chessrate_cli::pipeline::{pair_identifiers, parse_identifiers};
use chessrate_cli::render::{render, OutputFormat};
use chessrate_common::config::{
    default_config_path, read_toml_config, resolve_config_path, Settings, SettingsOverrides,
    TomlConfig, DEFAULT_LOG_LEVEL,
};
use chessrate_common::InputStore;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for chessrate
#[derive(Parser, Debug)]
#[command(name = "chessrate")]
#[command(about = "Compare bullet and blitz ratings on Lichess and Chess.com")]
#[command(version)]
struct Args {
    /// Lichess handles, comma-separated
    #[arg(short, long, env = "CHESSRATE_LICHESS")]
    lichess: Option<String>,

    /// Chess.com handles, comma-separated, in the same order
    #[arg(short, long, env = "CHESSRATE_CHESSCOM")]
    chesscom: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Config file (default: $CHESSRATE_CONFIG, then <config dir>/chessrate/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "CHESSRATE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Maximum number of pairs looked up at the same time
    #[arg(long, env = "CHESSRATE_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Fail instead of skipping handles when the lists differ in length
    #[arg(long)]
    strict: bool,

    /// Do not save the handle lists for the next run
    #[arg(long)]
    no_remember: bool,

    /// Forget the remembered handle lists and exit
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing is up so its log level can apply
    let config_path = resolve_config_path(args.config.as_deref());
    let file_config = match &config_path {
        Some(path) => read_toml_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => None,
    };
    let config_missing = file_config.is_none();
    let file_config = file_config.unwrap_or_default();

    init_tracing(&file_config);

    info!("Starting chessrate v{}", env!("CARGO_PKG_VERSION"));
    if config_missing {
        match &config_path {
            Some(path) if config_path != default_config_path() => {
                warn!("Config file not found at {}, using defaults", path.display())
            }
            Some(path) => debug!("No config file at {}, using defaults", path.display()),
            None => debug!("No config directory available, using defaults"),
        }
    }

    let overrides = SettingsOverrides {
        timeout_secs: args.timeout_secs,
        max_concurrent_pairs: args.concurrency,
        strict_pairing: args.strict,
        no_remember: args.no_remember,
    };
    let settings = Settings::resolve(&file_config, &overrides).context("Invalid settings")?;
    debug!(?settings, "Resolved settings");

    let store = match InputStore::default_location() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Input memory unavailable: {}", e);
            None
        }
    };

    if args.clear {
        if clear_remembered(store.as_ref()).context("Failed to clear remembered handles")? {
            eprintln!("Remembered handles cleared.");
        } else {
            eprintln!("No input memory available; nothing to clear.");
        }
        return Ok(());
    }

    let remembered = store.as_ref().map(InputStore::load).unwrap_or_default();
    let input = choose_input(args.lichess, args.chesscom, remembered);

    if settings.strict_pairing {
        let pairing = pair_identifiers(
            parse_identifiers(&input.lichess),
            parse_identifiers(&input.chesscom),
        );
        if !pairing.is_balanced() {
            bail!(
                "Handle lists differ in length ({} Lichess, {} Chess.com)",
                pairing.pairs.len() + pairing.unpaired_lichess.len(),
                pairing.pairs.len() + pairing.unpaired_chesscom.len()
            );
        }
    }

    let pipeline =
        chessrate_cli::build_pipeline(&settings).context("Failed to build HTTP client")?;
    let report = pipeline.run_reported(&input.lichess, &input.chesscom).await;

    if report.has_unpaired() {
        let (lichess_name, chesscom_name) = pipeline.provider_names();
        let skipped = [
            (lichess_name, &report.unpaired_lichess),
            (chesscom_name, &report.unpaired_chesscom),
        ]
        .into_iter()
        .filter(|(_, handles)| !handles.is_empty())
        .map(|(name, handles)| {
            let handles: Vec<&str> = handles.iter().map(|h| h.as_str()).collect();
            format!("{}: {}", name, handles.join(", "))
        })
        .collect::<Vec<_>>();
        eprintln!(
            "Note: lists differ in length; skipped unpaired handles ({})",
            skipped.join("; ")
        );
    }

    let output = render(&report.rows, args.format).context("Failed to render output")?;
    print!("{}", output);
    if args.format == OutputFormat::Json {
        println!();
    }

    if settings.remember_input && !input.is_empty() {
        if let Some(store) = &store {
            if let Err(e) = store.save(&input) {
                warn!("Could not remember handles: {}", e);
            }
        }
    }

    Ok(())
}

/// RUST_LOG wins; otherwise the configured level; logs go to stderr
fn init_tracing(config: &TomlConfig) {
    let level = config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
