//! Edit instruction for operator corrections and file organization.
//!
//! Covers the three in-place mutations search results lead to:
//!
//! - replacing one entry with a corrected version (the file's timestamp
//!   refreshes, its count does not change, and the key index swaps the old
//!   key for the new one);
//! - renaming a file within its journal;
//! - moving a file to a different journal (entries carry over unchanged; key
//!   provenance follows automatically because lookups join through the file's
//!   current journal).
//!
//! # Examples
//!
//! ```no_run
//! use rolodex::{entry::Entry, store::{Edit, Store}, prelude::*};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Store::open("rolodex.db").await?;
//!
//! let fixed = Entry::from_block("Jane Doe\nExample University\nCanada\njane.doe@y.edu")?;
//! Edit::entry("Journal A", "a-2026-08-06", 3, &fixed).execute(&mut store).await?;
//!
//! Edit::move_file("a-2026-08-06", "Journal A", "Journal B").execute(&mut store).await?;
//! # Ok(())
//! # }
//! ```

use super::*;

/// The mutations [`Edit`] supports.
enum EditKind<'a> {
  /// Replace the entry at a position with a corrected one
  Entry {
    /// Journal holding the file
    journal:  &'a str,
    /// File holding the entry
    file:     &'a str,
    /// Zero-based position of the entry to replace
    position: usize,
    /// The corrected entry
    entry:    &'a Entry,
  },
  /// Rename a file within its journal
  RenameFile {
    /// Journal holding the file
    journal: &'a str,
    /// Current file name
    from:    &'a str,
    /// New file name
    to:      &'a str,
  },
  /// Move a file to a different journal
  MoveFile {
    /// File to move
    file:         &'a str,
    /// Journal currently holding the file
    from_journal: &'a str,
    /// Destination journal
    to_journal:   &'a str,
  },
}

/// Instruction for editing stored entries and reorganizing files.
pub struct Edit<'a> {
  /// Which mutation to perform
  kind: EditKind<'a>,
}

impl<'a> Edit<'a> {
  /// Replaces the entry at `position` of `journal`/`file` with `entry`.
  pub fn entry(journal: &'a str, file: &'a str, position: usize, entry: &'a Entry) -> Self {
    Self { kind: EditKind::Entry { journal, file, position, entry } }
  }

  /// Renames `from` to `to` within `journal`.
  pub fn rename_file(journal: &'a str, from: &'a str, to: &'a str) -> Self {
    Self { kind: EditKind::RenameFile { journal, from, to } }
  }

  /// Moves `file` from one journal to another.
  pub fn move_file(file: &'a str, from_journal: &'a str, to_journal: &'a str) -> Self {
    Self { kind: EditKind::MoveFile { file, from_journal, to_journal } }
  }
}

#[async_trait]
impl StoreInstruction for Edit<'_> {
  type Output = ();

  async fn execute(&self, store: &mut Store) -> Result<Self::Output> {
    match &self.kind {
      EditKind::Entry { journal, file, position, entry } => {
        let (file_id, entry_id) =
          locate_entry(store, journal, file, *position).await?;
        let entry = (*entry).clone();
        let now = Utc::now();

        store
          .conn
          .call(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
              "UPDATE entries
                 SET name = ?1, department = ?2, institution = ?3, country = ?4, email = ?5
                 WHERE id = ?6",
              params![
                entry.name,
                entry.department,
                entry.institution,
                entry.country,
                entry.email,
                entry_id
              ],
            )?;

            // Swap the index row: the old key may now be unclaimed, the new
            // key points here.
            tx.execute("DELETE FROM author_keys WHERE entry_id = ?1", [entry_id])?;
            if let Some(key) = entry.key() {
              tx.execute(
                "INSERT OR REPLACE INTO author_keys (key, entry_id) VALUES (?1, ?2)",
                params![key.as_str(), entry_id],
              )?;
            }

            tx.execute("UPDATE files SET updated_at = ?1 WHERE id = ?2", params![now, file_id])?;

            tx.commit()?;
            Ok(())
          })
          .await
          .map_err(RolodexError::from)
      },

      EditKind::RenameFile { journal, from, to } => {
        let (journal_id, file_id) = locate_file(store, journal, from).await?;
        if file_in_journal(store, journal_id, to).await?.is_some() {
          return Err(RolodexError::DuplicateFile((*journal).to_string(), (*to).to_string()));
        }

        let to = (*to).to_string();
        store
          .conn
          .call(move |conn| {
            conn.execute("UPDATE files SET name = ?1 WHERE id = ?2", params![to, file_id])?;
            Ok(())
          })
          .await
          .map_err(RolodexError::from)
      },

      EditKind::MoveFile { file, from_journal, to_journal } => {
        let (_, file_id) = locate_file(store, from_journal, file).await?;
        let target_id = journal_id_by_name(store, to_journal)
          .await?
          .ok_or_else(|| RolodexError::JournalNotFound((*to_journal).to_string()))?;
        if file_in_journal(store, target_id, file).await?.is_some() {
          return Err(RolodexError::DuplicateFile(
            (*to_journal).to_string(),
            (*file).to_string(),
          ));
        }

        store
          .conn
          .call(move |conn| {
            conn.execute("UPDATE files SET journal_id = ?1 WHERE id = ?2", params![
              target_id, file_id
            ])?;
            Ok(())
          })
          .await
          .map_err(RolodexError::from)
      },
    }
  }
}
