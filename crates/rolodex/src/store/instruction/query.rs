//! Query instructions for browsing the store and snapshotting the corpus.
//!
//! Queries return [`StoredEntry`] values: the entry itself plus enough
//! provenance (journal, file, position, the file's update time) for an
//! operator to act on a search hit — edit it, delete it, or report it as the
//! conflicting side of a duplicate.
//!
//! [`ScanCorpus`] builds the key → occurrence snapshot the duplicate resolver
//! consumes, either by walking every stored entry ("fresh") or by reading the
//! flat author-key index ("indexed").

use std::collections::hash_map::Entry as MapEntry;

use super::*;
use crate::resolve::{Corpus, Provenance};

/// A stored entry with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
  /// Journal holding the entry
  pub journal:    String,
  /// File within the journal
  pub file:       String,
  /// Zero-based position within the file's ordered list
  pub position:   usize,
  /// The holding file's last-updated timestamp
  pub updated_at: DateTime<Utc>,
  /// The entry itself
  pub entry:      Entry,
}

/// Represents different ways to query entries in the store.
#[derive(Debug)]
pub enum QueryCriteria<'a> {
  /// All entries of one file, in list order
  InFile {
    /// Journal name
    journal: &'a str,
    /// File name
    file:    &'a str,
  },
  /// The entry the author-key index maps a key to
  Key(&'a AuthorKey),
  /// Full-text search across names, institutions, and emails
  Text(&'a str),
  /// Every entry in the store, in deterministic scan order
  All,
}

/// A query for retrieving entries from the store.
#[derive(Debug)]
pub struct Query<'a> {
  /// What to match
  criteria: QueryCriteria<'a>,
}

impl<'a> Query<'a> {
  /// Creates a new query with the given criteria.
  pub fn new(criteria: QueryCriteria<'a>) -> Self { Self { criteria } }

  /// Creates a query for one file's entries, in list order.
  pub fn in_file(journal: &'a str, file: &'a str) -> Self {
    Self::new(QueryCriteria::InFile { journal, file })
  }

  /// Creates a query resolving a key through the author-key index.
  pub fn by_key(key: &'a AuthorKey) -> Self { Self::new(QueryCriteria::Key(key)) }

  /// Creates a full-text search query.
  pub fn text(query: &'a str) -> Self { Self::new(QueryCriteria::Text(query)) }

  /// Creates a query that returns all entries.
  pub fn list_all() -> Self { Self::new(QueryCriteria::All) }

  /// Builds the SQL and parameters for the criteria.
  fn build_sql(&self) -> (String, Vec<String>) {
    let base = "SELECT j.name, f.name, e.position, f.updated_at,
                       e.name, e.department, e.institution, e.country, e.email
                FROM entries e
                JOIN files f ON e.file_id = f.id
                JOIN journals j ON f.journal_id = j.id";

    match &self.criteria {
      QueryCriteria::InFile { journal, file } => (
        format!("{base} WHERE j.name = ?1 AND f.name = ?2 ORDER BY e.position"),
        vec![(*journal).to_string(), (*file).to_string()],
      ),
      QueryCriteria::Key(key) => (
        format!(
          "{base} JOIN author_keys k ON k.entry_id = e.id
                  WHERE k.key = ?1"
        ),
        vec![key.as_str().to_string()],
      ),
      QueryCriteria::Text(query) => (
        format!(
          "{base} JOIN entries_fts ft ON ft.rowid = e.id
                  WHERE entries_fts MATCH ?1
                  ORDER BY rank"
        ),
        vec![query.to_lowercase()],
      ),
      QueryCriteria::All =>
        (format!("{base} ORDER BY j.name, f.name, e.position"), Vec::new()),
    }
  }
}

#[async_trait]
impl StoreInstruction for Query<'_> {
  type Output = Vec<StoredEntry>;

  async fn execute(&self, store: &mut Store) -> Result<Self::Output> {
    let (sql, params) = self.build_sql();

    store
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), row_to_stored_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
      })
      .await
      .map_err(RolodexError::from)
  }
}

/// Maps one joined row to a [`StoredEntry`].
///
/// Column order is fixed by the query builders in this module: journal, file,
/// position, updated_at, then the five entry fields.
fn row_to_stored_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredEntry> {
  Ok(StoredEntry {
    journal:    row.get(0)?,
    file:       row.get(1)?,
    position:   row.get::<_, i64>(2)? as usize,
    updated_at: row.get(3)?,
    entry:      Entry {
      name:        row.get(4)?,
      department:  row.get(5)?,
      institution: row.get(6)?,
      country:     row.get(7)?,
      email:       row.get(8)?,
    },
  })
}

/// Summary of one journal.
#[derive(Debug, Clone)]
pub struct JournalMeta {
  /// Journal name
  pub name:       String,
  /// Creation timestamp
  pub created_at: DateTime<Utc>,
  /// Number of files the journal holds
  pub file_count: usize,
}

/// Instruction listing every journal with its file count.
#[derive(Debug, Default)]
pub struct ListJournals;

#[async_trait]
impl StoreInstruction for ListJournals {
  type Output = Vec<JournalMeta>;

  async fn execute(&self, store: &mut Store) -> Result<Self::Output> {
    store
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT j.name, j.created_at, COUNT(f.id)
             FROM journals j
             LEFT JOIN files f ON f.journal_id = j.id
             GROUP BY j.id
             ORDER BY j.name",
        )?;
        let rows = stmt.query_map([], |row| {
          Ok(JournalMeta {
            name:       row.get(0)?,
            created_at: row.get(1)?,
            file_count: row.get::<_, i64>(2)? as usize,
          })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
      })
      .await
      .map_err(RolodexError::from)
  }
}

/// Summary of one file.
#[derive(Debug, Clone)]
pub struct FileMeta {
  /// File name
  pub name:        String,
  /// Cached entry count
  pub entry_count: usize,
  /// Last-updated timestamp
  pub updated_at:  DateTime<Utc>,
}

/// Instruction listing a journal's files.
#[derive(Debug)]
pub struct ListFiles<'a> {
  /// The journal to list
  journal: &'a str,
}

impl<'a> ListFiles<'a> {
  /// Creates a listing for one journal's files.
  pub fn new(journal: &'a str) -> Self { Self { journal } }
}

#[async_trait]
impl StoreInstruction for ListFiles<'_> {
  type Output = Vec<FileMeta>;

  async fn execute(&self, store: &mut Store) -> Result<Self::Output> {
    let journal = self.journal.to_string();

    let found = store
      .conn
      .call(move |conn| {
        let journal_id: Option<i64> = conn
          .query_row("SELECT id FROM journals WHERE name = ?1", [&journal], |row| row.get(0))
          .map(Some)
          .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            e => Err(e),
          })?;

        let Some(journal_id) = journal_id else { return Ok(None) };

        let mut stmt = conn.prepare_cached(
          "SELECT name, entry_count, updated_at FROM files
             WHERE journal_id = ?1
             ORDER BY name",
        )?;
        let rows = stmt.query_map([journal_id], |row| {
          Ok(FileMeta {
            name:        row.get(0)?,
            entry_count: row.get::<_, i64>(1)? as usize,
            updated_at:  row.get(2)?,
          })
        })?;
        Ok(Some(rows.collect::<rusqlite::Result<Vec<_>>>()?))
      })
      .await?;

    found.ok_or_else(|| RolodexError::JournalNotFound(self.journal.to_string()))
  }
}

/// How [`ScanCorpus`] gathers the snapshot.
#[derive(Debug, Clone, Copy)]
enum ScanMode {
  /// Walk every stored entry
  Fresh,
  /// Read the flat author-key index
  Indexed,
}

/// Instruction building the key → occurrence snapshot for the resolver.
///
/// The fresh scan walks every entry in deterministic order (journal name,
/// file name, position); when several entries collide on one key, the entry
/// from the most recently updated file wins, ties falling to scan order. The
/// indexed scan trusts the author-key index instead and is O(keys).
#[derive(Debug)]
pub struct ScanCorpus {
  /// Gathering strategy
  mode: ScanMode,
}

impl ScanCorpus {
  /// Scans every stored entry.
  pub fn fresh() -> Self { Self { mode: ScanMode::Fresh } }

  /// Reads the author-key index.
  pub fn indexed() -> Self { Self { mode: ScanMode::Indexed } }
}

#[async_trait]
impl StoreInstruction for ScanCorpus {
  type Output = Corpus;

  async fn execute(&self, store: &mut Store) -> Result<Self::Output> {
    let mode = self.mode;

    store
      .conn
      .call(move |conn| {
        let mut corpus = Corpus::new();

        match mode {
          ScanMode::Fresh => {
            let mut stmt = conn.prepare_cached(
              "SELECT j.name, f.name, f.updated_at, e.name, e.email
                 FROM entries e
                 JOIN files f ON e.file_id = f.id
                 JOIN journals j ON f.journal_id = j.id
                 ORDER BY j.name, f.name, e.position",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
              let journal: String = row.get(0)?;
              let file: String = row.get(1)?;
              let updated_at: DateTime<Utc> = row.get(2)?;
              let name: String = row.get(3)?;
              let email: String = row.get(4)?;

              let Some(key) = AuthorKey::from_parts(&name, &email) else { continue };
              match corpus.entry(key) {
                MapEntry::Vacant(slot) => {
                  slot.insert(Provenance::Stored { journal, file, updated_at });
                },
                MapEntry::Occupied(mut slot) => {
                  // Most recently updated file wins; a tie keeps the
                  // earlier row, which scan order makes deterministic.
                  if matches!(slot.get(),
                    Provenance::Stored { updated_at: existing, .. } if updated_at > *existing)
                  {
                    slot.insert(Provenance::Stored { journal, file, updated_at });
                  }
                },
              }
            }
          },

          ScanMode::Indexed => {
            let mut stmt = conn.prepare_cached(
              "SELECT k.key, j.name, f.name, f.updated_at
                 FROM author_keys k
                 JOIN entries e ON e.id = k.entry_id
                 JOIN files f ON e.file_id = f.id
                 JOIN journals j ON f.journal_id = j.id",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
              let key: String = row.get(0)?;
              let Ok(key) = key.parse::<AuthorKey>() else { continue };
              corpus.insert(key, Provenance::Stored {
                journal:    row.get(1)?,
                file:       row.get(2)?,
                updated_at: row.get(3)?,
              });
            }
          },
        }

        Ok(corpus)
      })
      .await
      .map_err(RolodexError::from)
  }
}
