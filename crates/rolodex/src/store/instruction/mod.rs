//! Store instruction implementations for journal and entry management.
//!
//! This module provides a trait-based abstraction for store operations,
//! allowing for type-safe and composable mutations and queries. Each
//! instruction type implements a specific operation while maintaining the
//! store's invariants: file entry counts and timestamps track their entry
//! lists, and the author-key index tracks every write and deletion.

use super::*;

pub mod add;
pub mod dedup;
pub mod edit;
pub mod query;
pub mod remove;

pub use add::Add;
pub use dedup::{Dedup, DedupGroup, DedupReport};
pub use edit::Edit;
pub use query::{FileMeta, JournalMeta, ListFiles, ListJournals, Query, ScanCorpus, StoredEntry};
pub use remove::{Remove, RemoveOptions};

/// Trait for operations that execute against a [`Store`].
///
/// Implementors bundle an operation's parameters and produce a typed output,
/// so callers compose store work without touching SQL. Instructions borrow
/// the store mutably for the duration of the call; there is no cross-call
/// transaction.
#[async_trait]
pub trait StoreInstruction {
  /// The result type this instruction produces.
  type Output;

  // Take &mut reference to avoid taking ownership and allow multiple operations
  /// Runs the instruction against the store.
  async fn execute(&self, store: &mut Store) -> Result<Self::Output>;
}

/// Resolves a journal name to its id.
async fn journal_id_by_name(store: &Store, name: &str) -> Result<Option<i64>> {
  let name = name.to_string();
  store
    .conn
    .call(move |conn| {
      let result =
        conn.query_row("SELECT id FROM journals WHERE name = ?1", [&name], |row| row.get(0));
      match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
      }
    })
    .await
    .map_err(RolodexError::from)
}

/// Resolves a file name within a journal to its id.
async fn file_in_journal(store: &Store, journal_id: i64, name: &str) -> Result<Option<i64>> {
  let name = name.to_string();
  store
    .conn
    .call(move |conn| {
      let result = conn.query_row(
        "SELECT id FROM files WHERE journal_id = ?1 AND name = ?2",
        params![journal_id, name],
        |row| row.get(0),
      );
      match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
      }
    })
    .await
    .map_err(RolodexError::from)
}

/// Resolves `(journal_id, file_id)`, erroring when either is missing.
async fn locate_file(store: &Store, journal: &str, file: &str) -> Result<(i64, i64)> {
  let journal_id = journal_id_by_name(store, journal)
    .await?
    .ok_or_else(|| RolodexError::JournalNotFound(journal.to_string()))?;
  let file_id = file_in_journal(store, journal_id, file)
    .await?
    .ok_or_else(|| RolodexError::FileNotFound(journal.to_string(), file.to_string()))?;
  Ok((journal_id, file_id))
}

/// Resolves `(file_id, entry_id)` for the entry at a position.
async fn locate_entry(
  store: &Store,
  journal: &str,
  file: &str,
  position: usize,
) -> Result<(i64, i64)> {
  let (_, file_id) = locate_file(store, journal, file).await?;

  let position_i64 = position as i64;
  let entry_id = store
    .conn
    .call(move |conn| {
      let result = conn.query_row(
        "SELECT id FROM entries WHERE file_id = ?1 AND position = ?2",
        params![file_id, position_i64],
        |row| row.get::<_, i64>(0),
      );
      match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
      }
    })
    .await?
    .ok_or_else(|| {
      RolodexError::EntryNotFound(journal.to_string(), file.to_string(), position)
    })?;

  Ok((file_id, entry_id))
}

/// Recomputes a file's cached entry count and stamps its update time.
fn refresh_file(
  tx: &rusqlite::Transaction<'_>,
  file_id: i64,
  now: DateTime<Utc>,
) -> tokio_rusqlite::Result<()> {
  tx.execute(
    "UPDATE files
       SET entry_count = (SELECT COUNT(*) FROM entries WHERE file_id = ?1),
           updated_at = ?2
       WHERE id = ?1",
    params![file_id, now],
  )?;
  Ok(())
}
