//! Module for the global duplicate sweep.

use rolodex::store::{Dedup, StoreInstruction};

use super::*;

/// Options for the duplicate sweep.
#[derive(Args)]
pub struct DedupOptions {
  /// Report what would be removed without deleting anything
  #[arg(long)]
  pub dry_run: bool,

  /// Skip the confirmation prompt
  #[arg(long)]
  pub force: bool,
}

/// Function for the [`Commands::Dedup`] in the CLI.
///
/// Always previews first; the destructive pass only runs after confirmation.
/// Immediately re-running the sweep reports no duplicates.
pub async fn dedup<I: UserInteraction>(
  interaction: &I,
  store: &mut Store,
  options: &DedupOptions,
) -> Result<()> {
  let preview = Dedup::sweep().dry_run().execute(store).await?;
  interaction.reply(ResponseContent::Dedup(&preview))?;

  if options.dry_run || preview.is_clean() {
    return Ok(());
  }

  if !options.force
    && !interaction
      .confirm(&format!("Delete {} duplicate entr(ies)?", preview.removed_count()))?
  {
    return interaction.reply(ResponseContent::Info("Aborted"));
  }

  let report = Dedup::sweep().execute(store).await?;
  interaction.reply(ResponseContent::Success(&format!(
    "Removed {} duplicate entr(ies) across {} key(s)",
    report.removed_count(),
    report.groups.len()
  )))
}
