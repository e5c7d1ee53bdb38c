//! Module for removing one entry from a file.

use rolodex::store::{Remove, StoreInstruction};

use super::*;

/// Options for removing one entry.
#[derive(Args)]
pub struct RemoveOptions {
  /// Journal holding the file
  pub journal: String,

  /// File holding the entry
  pub file: String,

  /// Zero-based position of the entry, as reported by `search`
  pub position: usize,

  /// Skip the confirmation prompt
  #[arg(long)]
  pub force: bool,
}

/// Function for the [`Commands::Remove`] in the CLI.
pub async fn remove<I: UserInteraction>(
  interaction: &I,
  store: &mut Store,
  options: &RemoveOptions,
) -> Result<()> {
  let affected =
    Remove::entry(&options.journal, &options.file, options.position).dry_run().execute(store).await?;
  if let Some(stored) = affected.first() {
    interaction.reply(ResponseContent::Entry(stored))?;
  }

  if !options.force && !interaction.confirm("Remove this entry?")? {
    return interaction.reply(ResponseContent::Info("Aborted"));
  }

  Remove::entry(&options.journal, &options.file, options.position).execute(store).await?;
  interaction.reply(ResponseContent::Success(&format!(
    "Removed entry {} of {}/{}",
    options.position, options.journal, options.file
  )))
}
