//! Module for the paste-to-store ingest pipeline.

use clap::ValueEnum;
use rolodex::{
  entry::{parse_blocks, read_text_lossy},
  ingest::Ingest,
  reformat::{GeminiClient, Model, Reformatter},
};

use super::*;

/// Model selection on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModelArg {
  /// gemini-1.5-flash
  Gemini15Flash,
  /// gemini-2.0-flash
  Gemini20Flash,
}

impl From<ModelArg> for Model {
  fn from(arg: ModelArg) -> Self {
    match arg {
      ModelArg::Gemini15Flash => Model::Gemini15Flash,
      ModelArg::Gemini20Flash => Model::Gemini20Flash,
    }
  }
}

/// Options for ingesting contact text.
#[derive(Args)]
pub struct IngestOptions {
  /// Target journal; created on first use
  pub journal: String,

  /// Target file; defaults to the journal's initials plus today's date
  #[arg(long)]
  pub file: Option<String>,

  /// Read input from this file instead of stdin
  #[arg(long)]
  pub input: Option<PathBuf>,

  /// Skip the reformat service; input must already be canonical blocks
  #[arg(long)]
  pub raw: bool,

  /// Resolve and report without writing anything
  #[arg(long)]
  pub dry_run: bool,

  /// Reformat configuration file (defaults to the config directory's
  /// reformat.toml when present)
  #[arg(long)]
  pub config: Option<PathBuf>,

  /// Transform model to use
  #[arg(long, value_enum, default_value = "gemini20-flash")]
  pub model: ModelArg,
}

/// Derives the default file name: journal initials plus today's date.
///
/// Short connective words do not contribute an initial, so "Advances in
/// Fuzzy Sets and Systems" becomes `afss-2026-08-06`.
fn default_file_name(journal: &str) -> String {
  const SKIP: &[&str] = &["in", "of", "and", "the", "for", "on"];
  let initials: String = journal
    .split_whitespace()
    .filter(|word| !SKIP.contains(&word.to_lowercase().as_str()))
    .filter_map(|word| word.chars().next())
    .collect::<String>()
    .to_lowercase();
  format!("{initials}-{}", chrono::Local::now().format("%Y-%m-%d"))
}

/// Reads the raw input text, from a file or stdin.
fn read_input(input: &Option<PathBuf>) -> Result<String> {
  let bytes = match input {
    Some(path) => std::fs::read(path)?,
    None => {
      use std::io::Read;
      let mut buffer = Vec::new();
      std::io::stdin().read_to_end(&mut buffer)?;
      buffer
    },
  };
  Ok(read_text_lossy(&bytes))
}

/// Loads the reformatter from the explicit or default config location.
fn load_reformatter(config: &Option<PathBuf>) -> Result<Reformatter> {
  if let Some(path) = config {
    return Ok(Reformatter::with_config_file(path)?);
  }
  let default = dirs::config_dir().map(|dir| dir.join("rolodex").join("reformat.toml"));
  match default {
    Some(path) if path.exists() => Ok(Reformatter::with_config_file(path)?),
    _ => Ok(Reformatter::new()),
  }
}

/// Function for the [`Commands::Ingest`] in the CLI.
pub async fn ingest<I: UserInteraction>(
  interaction: &I,
  store: &mut Store,
  options: &IngestOptions,
) -> Result<()> {
  let raw = read_input(&options.input)?;
  if parse_blocks(&raw).is_empty() {
    return Err(RolodexdError::InvalidArguments("the input contained no blocks".to_string()));
  }

  let file = options.file.clone().unwrap_or_else(|| default_file_name(&options.journal));
  let mut pipeline = Ingest::into_file(&options.journal, &file);
  if options.dry_run {
    pipeline = pipeline.dry_run();
  }

  let report = if options.raw {
    pipeline.run_raw(store, &raw).await?
  } else {
    let reformatter = load_reformatter(&options.config)?;
    let client = build_client(options.model);

    pipeline
      .run(store, &reformatter, &client, &raw, |progress| {
        let eta = progress
          .remaining
          .map(|d| format!(", ~{}s left", d.as_secs()))
          .unwrap_or_default();
        let _ = interaction.reply(ResponseContent::Working(&format!(
          "reformatting chunk {}/{}{eta}",
          progress.completed, progress.total
        )));
      })
      .await?
  };

  interaction.reply(ResponseContent::Ingest(&report))?;

  if options.dry_run {
    interaction.reply(ResponseContent::Info("Dry run: nothing was written"))?;
  } else {
    let today = store.activity_on(chrono::Local::now().date_naive()).await?;
    interaction.reply(ResponseContent::Info(&format!("Entries ingested today: {today}")))?;
  }
  Ok(())
}

/// Builds the transform client from flags and environment.
///
/// The API key comes from `ROLODEX_API_KEY` and an alternative endpoint from
/// `ROLODEX_TRANSFORM_HOST`; neither is stored in the configuration file.
fn build_client(model: ModelArg) -> GeminiClient {
  let mut client = GeminiClient::new().with_model(model.into());
  if let Ok(host) = std::env::var("ROLODEX_TRANSFORM_HOST") {
    client = client.with_host(&host);
  }
  if let Ok(api_key) = std::env::var("ROLODEX_API_KEY") {
    client = client.with_api_key(api_key);
  }
  client
}
