//! Module for file management within journals.

use rolodex::store::{Edit, ListFiles, Remove, StoreInstruction};

use super::*;

/// File operations.
#[derive(Subcommand)]
pub enum FileCommands {
  /// List a journal's files
  List {
    /// Journal to list
    journal: String,
  },

  /// Rename a file within its journal
  Rename {
    /// Journal holding the file
    journal: String,
    /// Current file name
    from:    String,
    /// New file name
    to:      String,
  },

  /// Move a file to a different journal; entries carry over unchanged
  Move {
    /// File to move
    file:         String,
    /// Journal currently holding the file
    from_journal: String,
    /// Destination journal
    to_journal:   String,
  },

  /// Delete a file and its entries
  Delete {
    /// Journal holding the file
    journal: String,
    /// File to delete
    file:    String,

    /// Skip the confirmation prompt
    #[arg(long)]
    force: bool,
  },
}

/// Function for the [`Commands::File`] subcommands in the CLI.
pub async fn file<I: UserInteraction>(
  interaction: &I,
  store: &mut Store,
  cmd: &FileCommands,
) -> Result<()> {
  match cmd {
    FileCommands::List { journal } => {
      let files = ListFiles::new(journal).execute(store).await?;
      interaction.reply(ResponseContent::Files(&files))
    },

    FileCommands::Rename { journal, from, to } => {
      Edit::rename_file(journal, from, to).execute(store).await?;
      interaction
        .reply(ResponseContent::Success(&format!("Renamed \"{from}\" to \"{to}\" in {journal}")))
    },

    FileCommands::Move { file, from_journal, to_journal } => {
      Edit::move_file(file, from_journal, to_journal).execute(store).await?;
      interaction.reply(ResponseContent::Success(&format!(
        "Moved \"{file}\" from {from_journal} to {to_journal}"
      )))
    },

    FileCommands::Delete { journal, file, force } => {
      let affected = Remove::file(journal, file).dry_run().execute(store).await?;
      if !force
        && !interaction
          .confirm(&format!("Delete \"{file}\" and its {} entr(ies)?", affected.len()))?
      {
        return interaction.reply(ResponseContent::Info("Aborted"));
      }

      let removed = Remove::file(journal, file).execute(store).await?;
      interaction.reply(ResponseContent::Success(&format!(
        "Deleted \"{file}\" ({} entries)",
        removed.len()
      )))
    },
  }
}
