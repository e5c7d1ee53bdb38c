//! Add instruction for creating journals and writing entries.
//!
//! Three write shapes share this instruction:
//!
//! - creating an empty journal;
//! - replacing a file's entry list wholesale (create-or-replace);
//! - appending entries to a file, creating the journal and file on demand —
//!   the shape the ingest pipeline uses.
//!
//! Every write recomputes the touched file's entry count and timestamp and
//! upserts the author-key index rows for the written entries, all inside one
//! transaction.
//!
//! # Examples
//!
//! ```no_run
//! use rolodex::{entry::Entry, store::{Add, Store}, prelude::*};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Store::open("rolodex.db").await?;
//! Add::journal("Advances in Fuzzy Sets and Systems").execute(&mut store).await?;
//!
//! let entries = vec![Entry::from_block("Jane Doe\nExample University\njd@y.edu")?];
//! let written = Add::file("Advances in Fuzzy Sets and Systems", "afss-2026-08-06", &entries)
//!   .execute(&mut store)
//!   .await?;
//! assert_eq!(written, 1);
//! # Ok(())
//! # }
//! ```

use super::*;

/// The write shapes [`Add`] supports.
enum AddKind<'a> {
  /// Create an empty journal; errors if the name is taken
  Journal { name: &'a str },
  /// Replace-or-create a file under an existing journal
  File { journal: &'a str, name: &'a str, entries: &'a [Entry] },
  /// Append to a file, creating journal and file as needed
  Entries { journal: &'a str, name: &'a str, entries: &'a [Entry] },
}

/// Instruction for adding journals, files, and entries to the store.
pub struct Add<'a> {
  /// Which write shape to perform
  kind: AddKind<'a>,
}

impl<'a> Add<'a> {
  /// Creates a new, empty journal.
  ///
  /// # Errors
  ///
  /// Execution fails with [`RolodexError::DuplicateJournal`] when a journal
  /// with this name already exists.
  pub fn journal(name: &'a str) -> Self { Self { kind: AddKind::Journal { name } } }

  /// Replaces a file's entries, creating the file if needed.
  ///
  /// The journal must already exist. Any previous entries of the file (and
  /// their key-index rows) are removed before the new list is written.
  pub fn file(journal: &'a str, name: &'a str, entries: &'a [Entry]) -> Self {
    Self { kind: AddKind::File { journal, name, entries } }
  }

  /// Appends entries to a file, creating the journal and file on demand.
  pub fn entries(journal: &'a str, name: &'a str, entries: &'a [Entry]) -> Self {
    Self { kind: AddKind::Entries { journal, name, entries } }
  }
}

#[async_trait]
impl StoreInstruction for Add<'_> {
  type Output = usize;

  async fn execute(&self, store: &mut Store) -> Result<Self::Output> {
    match &self.kind {
      AddKind::Journal { name } => {
        let name = (*name).to_string();
        let exists = journal_exists(store, name.clone()).await?;
        if exists {
          return Err(RolodexError::DuplicateJournal(name));
        }

        let created_at = Utc::now();
        store
          .conn
          .call(move |conn| {
            conn.execute("INSERT INTO journals (name, created_at) VALUES (?1, ?2)", params![
              name, created_at
            ])?;
            Ok(())
          })
          .await?;
        Ok(0)
      },

      AddKind::File { journal, name, entries } => {
        let journal = (*journal).to_string();
        if !journal_exists(store, journal.clone()).await? {
          return Err(RolodexError::JournalNotFound(journal));
        }

        let name = (*name).to_string();
        let entries = entries.to_vec();
        let now = Utc::now();

        store
          .conn
          .call(move |conn| {
            let tx = conn.transaction()?;

            let journal_id: i64 = tx.query_row(
              "SELECT id FROM journals WHERE name = ?1",
              [&journal],
              |row| row.get(0),
            )?;

            let file_id: i64 = tx.query_row(
              "INSERT INTO files (journal_id, name, entry_count, updated_at)
                 VALUES (?1, ?2, 0, ?3)
                 ON CONFLICT(journal_id, name) DO UPDATE SET updated_at = ?3
                 RETURNING id",
              params![journal_id, name, now],
              |row| row.get(0),
            )?;

            // Replace semantics: clear any previous entry list first. The
            // key-index rows cascade with the entries.
            tx.execute("DELETE FROM entries WHERE file_id = ?1", [file_id])?;

            let written = insert_entries(&tx, file_id, 0, &entries)?;
            refresh_file(&tx, file_id, now)?;

            tx.commit()?;
            Ok(written)
          })
          .await
          .map_err(RolodexError::from)
      },

      AddKind::Entries { journal, name, entries } => {
        let journal = (*journal).to_string();
        let name = (*name).to_string();
        let entries = entries.to_vec();
        let now = Utc::now();

        store
          .conn
          .call(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
              "INSERT OR IGNORE INTO journals (name, created_at) VALUES (?1, ?2)",
              params![journal, now],
            )?;
            let journal_id: i64 = tx.query_row(
              "SELECT id FROM journals WHERE name = ?1",
              [&journal],
              |row| row.get(0),
            )?;

            tx.execute(
              "INSERT OR IGNORE INTO files (journal_id, name, entry_count, updated_at)
                 VALUES (?1, ?2, 0, ?3)",
              params![journal_id, name, now],
            )?;
            let file_id: i64 = tx.query_row(
              "SELECT id FROM files WHERE journal_id = ?1 AND name = ?2",
              params![journal_id, name],
              |row| row.get(0),
            )?;

            let next_position: i64 = tx.query_row(
              "SELECT COALESCE(MAX(position) + 1, 0) FROM entries WHERE file_id = ?1",
              [file_id],
              |row| row.get(0),
            )?;

            let written = insert_entries(&tx, file_id, next_position, &entries)?;
            refresh_file(&tx, file_id, now)?;

            tx.commit()?;
            Ok(written)
          })
          .await
          .map_err(RolodexError::from)
      },
    }
  }
}

/// Whether a journal with this name exists.
async fn journal_exists(store: &Store, name: String) -> Result<bool> {
  Ok(journal_id_by_name(store, &name).await?.is_some())
}

/// Inserts entries at consecutive positions and upserts their index rows.
fn insert_entries(
  tx: &rusqlite::Transaction<'_>,
  file_id: i64,
  start_position: i64,
  entries: &[Entry],
) -> tokio_rusqlite::Result<usize> {
  let mut entry_stmt = tx.prepare_cached(
    "INSERT INTO entries (file_id, position, name, department, institution, country, email)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
       RETURNING id",
  )?;
  let mut key_stmt =
    tx.prepare_cached("INSERT OR REPLACE INTO author_keys (key, entry_id) VALUES (?1, ?2)")?;

  for (offset, entry) in entries.iter().enumerate() {
    let entry_id: i64 = entry_stmt.query_row(
      params![
        file_id,
        start_position + offset as i64,
        entry.name,
        entry.department,
        entry.institution,
        entry.country,
        entry.email,
      ],
      |row| row.get(0),
    )?;

    // Hand-constructed entries can lack a key; they are stored but invisible
    // to the index.
    if let Some(key) = entry.key() {
      key_stmt.execute(params![key.as_str(), entry_id])?;
    }
  }

  Ok(entries.len())
}
