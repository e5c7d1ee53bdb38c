//! Remove instruction for deleting entries, files, and journals.
//!
//! This module provides functionality for safely removing contact data from
//! the store. It supports:
//!
//! - Removal of a single entry, a file, or a whole journal
//! - Dry run simulation
//! - Cascade deletion of contained data and key-index rows
//! - Atomic transactions
//!
//! Deleting a file removes its entries and their index rows; deleting a
//! journal removes its files and everything under them. Removing a single
//! entry refreshes the holding file's count and timestamp.
//!
//! # Examples
//!
//! ```no_run
//! use rolodex::{store::{Remove, Store}, prelude::*};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Store::open("rolodex.db").await?;
//!
//! // Preview what deleting a journal would remove
//! let entries = Remove::journal("Journal A").dry_run().execute(&mut store).await?;
//! println!("Would remove {} entries", entries.len());
//!
//! // Actually remove one entry
//! Remove::entry("Journal A", "a-2026-08-06", 3).execute(&mut store).await?;
//! # Ok(())
//! # }
//! ```

use super::*;

/// Configuration options for removal operations.
///
/// This struct allows customization of how the remove operation behaves,
/// particularly useful for validation and previews.
#[derive(Default)]
pub struct RemoveOptions {
  /// When true, simulates the removal without modifying the store.
  ///
  /// This is useful for:
  /// - Previewing which entries would be removed
  /// - Confirmation prompts before destructive operations
  pub dry_run: bool,
}

/// The removal targets [`Remove`] supports.
enum RemoveTarget<'a> {
  /// One entry by position
  Entry {
    /// Journal holding the file
    journal:  &'a str,
    /// File holding the entry
    file:     &'a str,
    /// Zero-based position of the entry
    position: usize,
  },
  /// One file and everything in it
  File {
    /// Journal holding the file
    journal: &'a str,
    /// File to remove
    file:    &'a str,
  },
  /// A journal, cascading to its files and entries
  Journal {
    /// Journal to remove
    name: &'a str,
  },
}

/// Instruction for removing data from the store.
pub struct Remove<'a> {
  /// What to remove
  target:  RemoveTarget<'a>,
  /// Configuration options for the removal
  options: RemoveOptions,
}

impl<'a> Remove<'a> {
  /// Creates a remove instruction for one entry.
  pub fn entry(journal: &'a str, file: &'a str, position: usize) -> Self {
    Self { target: RemoveTarget::Entry { journal, file, position }, options: RemoveOptions::default() }
  }

  /// Creates a remove instruction for a file and its entries.
  pub fn file(journal: &'a str, file: &'a str) -> Self {
    Self { target: RemoveTarget::File { journal, file }, options: RemoveOptions::default() }
  }

  /// Creates a remove instruction for a journal and everything it holds.
  pub fn journal(name: &'a str) -> Self {
    Self { target: RemoveTarget::Journal { name }, options: RemoveOptions::default() }
  }

  /// Enables dry run mode for the remove operation.
  ///
  /// In dry run mode, the operation queries the entries that would be
  /// removed, returns them, and does not modify the store.
  pub fn dry_run(mut self) -> Self {
    self.options.dry_run = true;
    self
  }
}

#[async_trait]
impl StoreInstruction for Remove<'_> {
  type Output = Vec<StoredEntry>;

  async fn execute(&self, store: &mut Store) -> Result<Self::Output> {
    match &self.target {
      RemoveTarget::Entry { journal, file, position } => {
        let (file_id, entry_id) = locate_entry(store, journal, file, *position).await?;

        let affected: Vec<StoredEntry> = Query::in_file(journal, file)
          .execute(store)
          .await?
          .into_iter()
          .filter(|stored| stored.position == *position)
          .collect();

        if !self.options.dry_run {
          let now = Utc::now();
          store
            .conn
            .call(move |conn| {
              let tx = conn.transaction()?;
              tx.execute("DELETE FROM entries WHERE id = ?1", [entry_id])?;
              refresh_file(&tx, file_id, now)?;
              tx.commit()?;
              Ok(())
            })
            .await?;
        }

        Ok(affected)
      },

      RemoveTarget::File { journal, file } => {
        let (_, file_id) = locate_file(store, journal, file).await?;
        let affected = Query::in_file(journal, file).execute(store).await?;

        if !self.options.dry_run {
          store
            .conn
            .call(move |conn| {
              conn.execute("DELETE FROM files WHERE id = ?1", [file_id])?;
              Ok(())
            })
            .await?;
        }

        Ok(affected)
      },

      RemoveTarget::Journal { name } => {
        let journal_id = journal_id_by_name(store, name)
          .await?
          .ok_or_else(|| RolodexError::JournalNotFound((*name).to_string()))?;

        let name_owned = (*name).to_string();
        let affected: Vec<StoredEntry> = Query::list_all()
          .execute(store)
          .await?
          .into_iter()
          .filter(|stored| stored.journal == name_owned)
          .collect();

        if !self.options.dry_run {
          store
            .conn
            .call(move |conn| {
              conn.execute("DELETE FROM journals WHERE id = ?1", [journal_id])?;
              Ok(())
            })
            .await?;
        }

        Ok(affected)
      },
    }
  }
}
