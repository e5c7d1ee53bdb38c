//! Module for correcting one stored entry.

use rolodex::{
  entry::{read_text_lossy, Entry},
  store::{Edit, Query, StoreInstruction},
};

use super::*;

/// Options for replacing one entry.
#[derive(Args)]
pub struct EditOptions {
  /// Journal holding the file
  pub journal: String,

  /// File holding the entry
  pub file: String,

  /// Zero-based position of the entry, as reported by `search`
  pub position: usize,

  /// The replacement block, lines separated by newlines
  #[arg(long)]
  pub entry: Option<String>,

  /// Read the replacement block from this file instead
  #[arg(long)]
  pub input: Option<PathBuf>,
}

/// Function for the [`Commands::Edit`] in the CLI.
pub async fn edit<I: UserInteraction>(
  interaction: &I,
  store: &mut Store,
  options: &EditOptions,
) -> Result<()> {
  let current: Vec<_> = Query::in_file(&options.journal, &options.file)
    .execute(store)
    .await?
    .into_iter()
    .filter(|stored| stored.position == options.position)
    .collect();
  if let Some(stored) = current.first() {
    interaction.reply(ResponseContent::Entry(stored))?;
  }

  let block = match (&options.entry, &options.input) {
    (Some(block), None) => block.clone(),
    (None, Some(path)) => read_text_lossy(&std::fs::read(path)?),
    (None, None) => interaction.prompt("Replacement block (lines separated by '\\n')")?,
    (Some(_), Some(_)) =>
      return Err(RolodexdError::InvalidArguments(
        "pass either --entry or --input, not both".to_string(),
      )),
  };
  // Prompted input arrives on one line; unescape the separators.
  let block = block.replace("\\n", "\n");

  let replacement = Entry::from_block(&block).map_err(RolodexdError::from)?;
  Edit::entry(&options.journal, &options.file, options.position, &replacement)
    .execute(store)
    .await?;

  interaction.reply(ResponseContent::Success(&format!(
    "Replaced entry {} of {}/{}",
    options.position, options.journal, options.file
  )))
}
