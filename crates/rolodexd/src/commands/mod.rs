use super::*;

pub mod dedup;
pub mod edit;
pub mod export;
pub mod file;
pub mod ingest;
pub mod init;
pub mod journal;
pub mod remove;
pub mod search;
pub mod triage;

pub use dedup::{dedup, DedupOptions};
pub use edit::{edit, EditOptions};
pub use export::{export, ExportOptions};
pub use file::{file, FileCommands};
pub use ingest::{ingest, IngestOptions};
pub use init::init;
pub use journal::{journal, JournalCommands};
pub use remove::{remove, RemoveOptions};
pub use search::{search, SearchOptions};
pub use triage::{triage, TriageOptions};

/// Available commands for the CLI
#[derive(Subcommand)]
pub enum Commands {
  /// Initialize a new rolodex store
  Init,

  /// Ingest contact text into a journal through the reformat + dedup pipeline
  Ingest(IngestOptions),

  /// Search entries in the store
  Search(SearchOptions),

  /// Manage journals
  Journal {
    /// The journal operation to perform
    #[command(subcommand)]
    cmd: JournalCommands,
  },

  /// Manage files within journals
  File {
    /// The file operation to perform
    #[command(subcommand)]
    cmd: FileCommands,
  },

  /// Export entries back to the flat blank-line text format
  Export(ExportOptions),

  /// Replace one stored entry with a corrected version
  Edit(EditOptions),

  /// Remove one entry from a file
  Remove(RemoveOptions),

  /// Find and delete duplicate entries across the whole store
  Dedup(DedupOptions),

  /// Triage pasted blocks locally: flag missing emails and countries
  Triage(TriageOptions),
}
