//! Module for the local triage pass.

use rolodex::{
  entry::{join_blocks, parse_blocks, read_text_lossy},
  triage::{self, GreetingGap},
};

use super::*;

/// Options for triaging pasted blocks.
#[derive(Args)]
pub struct TriageOptions {
  /// Read input from this file instead of stdin
  #[arg(long)]
  pub input: Option<PathBuf>,

  /// Insert a `Dear Professor <surname>,` line after each email line
  #[arg(long)]
  pub greeting: bool,

  /// Put the greeting directly after the email, without a blank line
  #[arg(long)]
  pub no_gap: bool,

  /// Write the clean blocks to this path instead of stdout
  #[arg(long)]
  pub output: Option<PathBuf>,
}

/// Function for the [`Commands::Triage`] in the CLI.
///
/// Runs entirely locally: no reformat service and no store requirement. When
/// a store exists, the day's processed count is updated so staff keep their
/// running tally.
pub async fn triage<I: UserInteraction>(
  interaction: &I,
  store_path: &PathBuf,
  options: &TriageOptions,
) -> Result<()> {
  let bytes = match &options.input {
    Some(path) => std::fs::read(path)?,
    None => {
      use std::io::Read;
      let mut buffer = Vec::new();
      std::io::stdin().read_to_end(&mut buffer)?;
      buffer
    },
  };
  let blocks = parse_blocks(&read_text_lossy(&bytes));

  let triage_options = triage::TriageOptions {
    greeting: options.greeting,
    gap:      if options.no_gap { GreetingGap::None } else { GreetingGap::Blank },
  };
  let report = triage::triage(&blocks, &triage_options);
  interaction.reply(ResponseContent::Triage(&report))?;

  let clean: Vec<String> = report.clean().map(|b| b.text.clone()).collect();
  if !clean.is_empty() {
    let text = join_blocks(&clean);
    match &options.output {
      Some(path) => {
        std::fs::write(path, format!("{text}\n"))?;
        interaction.reply(ResponseContent::Success(&format!(
          "Wrote {} clean block(s) to {}",
          clean.len(),
          path.display()
        )))?;
      },
      None => println!("{text}"),
    }
  }

  // The daily tally lives in the store, but triage must keep working before
  // `init` has ever been run.
  if store_path.exists() {
    let store = Store::open(store_path).await?;
    let today = chrono::Local::now().date_naive();
    store.record_activity(today, report.blocks.len()).await?;
    let total = store.activity_on(today).await?;
    interaction.reply(ResponseContent::Info(&format!("Blocks processed today: {total}")))?;
  }

  Ok(())
}
