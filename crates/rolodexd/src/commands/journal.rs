//! Module for journal management.

use rolodex::store::{Add, ListJournals, Remove, StoreInstruction};

use super::*;

/// Journal operations.
#[derive(Subcommand)]
pub enum JournalCommands {
  /// Create a new, empty journal
  Create {
    /// Journal name, unique across the store
    name: String,
  },

  /// List all journals
  List,

  /// Delete a journal and every file and entry it holds
  Delete {
    /// Journal to delete
    name: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    force: bool,
  },
}

/// Function for the [`Commands::Journal`] subcommands in the CLI.
pub async fn journal<I: UserInteraction>(
  interaction: &I,
  store: &mut Store,
  cmd: &JournalCommands,
) -> Result<()> {
  match cmd {
    JournalCommands::Create { name } => {
      Add::journal(name).execute(store).await?;
      interaction.reply(ResponseContent::Success(&format!("Created journal \"{name}\"")))
    },

    JournalCommands::List => {
      let journals = ListJournals.execute(store).await?;
      interaction.reply(ResponseContent::Journals(&journals))
    },

    JournalCommands::Delete { name, force } => {
      let affected = Remove::journal(name).dry_run().execute(store).await?;
      if !force
        && !interaction.confirm(&format!(
          "Delete journal \"{name}\" and its {} entr(ies)?",
          affected.len()
        ))?
      {
        return interaction.reply(ResponseContent::Info("Aborted"));
      }

      let removed = Remove::journal(name).execute(store).await?;
      interaction.reply(ResponseContent::Success(&format!(
        "Deleted journal \"{name}\" ({} entries)",
        removed.len()
      )))
    },
  }
}
