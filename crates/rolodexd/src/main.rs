//! Command line interface for the rolodex contact management system.
//!
//! This crate provides a CLI tool for managing author contact entries using
//! the `rolodex` library. It supports operations like:
//! - Store initialization and management
//! - Ingesting pasted or uploaded contact text through the reformat +
//!   dedup pipeline
//! - Full-text and key search across the corpus
//! - Journal and file management, export, and global duplicate cleanup
//! - Local triage of blocks missing an email or country
//!
//! # Usage
//!
//! ```bash
//! # Initialize a new store
//! rolodex init
//!
//! # Ingest a text file of contact blocks into a journal
//! rolodex ingest "Advances in Fuzzy Sets and Systems" --input contacts.txt
//!
//! # Search the corpus
//! rolodex search "fuzzy"
//!
//! # Preview and run a global duplicate sweep
//! rolodex dedup --dry-run
//! rolodex dedup
//! ```
//!
//! The CLI provides colored output and interactive confirmations for
//! destructive operations. It also supports various verbosity levels for
//! debugging through the `-v` flag.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use rolodex::store::Store;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "CLI for the rolodex contact management system")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the store database file. If not specified, uses the default
  /// platform-specific data directory.
  #[arg(long, short, global = true)]
  path: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// The store path to operate on.
  fn store_path(&self) -> PathBuf { self.path.clone().unwrap_or_else(Store::default_path) }
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used (0-3)
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

/// Opens the store, requiring that `init` has been run.
async fn open_store(path: &PathBuf) -> Result<Store> {
  if !path.exists() {
    return Err(RolodexdError::Uninitialized(path.display().to_string()));
  }
  debug!(path = %path.display(), "opening store");
  Ok(Store::open(path).await?)
}

/// Entry point for the rolodex CLI application
///
/// Handles command line argument parsing, sets up logging, and executes
/// the requested command. All commands provide colored output and
/// interactive confirmations for destructive operations.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let interaction = Console::new(cli.accept_defaults);
  let store_path = cli.store_path();

  match &cli.command {
    Commands::Init => init(&interaction, &store_path).await,
    Commands::Triage(options) => triage(&interaction, &store_path, options).await,
    Commands::Ingest(options) => {
      let mut store = open_store(&store_path).await?;
      ingest(&interaction, &mut store, options).await
    },
    Commands::Search(options) => {
      let mut store = open_store(&store_path).await?;
      search(&interaction, &mut store, options).await
    },
    Commands::Journal { cmd } => {
      let mut store = open_store(&store_path).await?;
      journal(&interaction, &mut store, cmd).await
    },
    Commands::File { cmd } => {
      let mut store = open_store(&store_path).await?;
      file(&interaction, &mut store, cmd).await
    },
    Commands::Export(options) => {
      let mut store = open_store(&store_path).await?;
      export(&interaction, &mut store, options).await
    },
    Commands::Edit(options) => {
      let mut store = open_store(&store_path).await?;
      edit(&interaction, &mut store, options).await
    },
    Commands::Remove(options) => {
      let mut store = open_store(&store_path).await?;
      remove(&interaction, &mut store, options).await
    },
    Commands::Dedup(options) => {
      let mut store = open_store(&store_path).await?;
      dedup(&interaction, &mut store, options).await
    },
  }
}
