//! Local SQLite store for journals, files, and contact entries.
//!
//! This module persists the corpus: named journals, each holding files, each
//! holding an ordered list of canonical entries. It maintains two invariants
//! on every mutation:
//!
//! - a file's cached `entry_count` and `updated_at` always reflect its entry
//!   list;
//! - the flat author-key index maps every key to its latest stored entry, so
//!   duplicate checks are a single lookup instead of a corpus scan.
//!
//! The schema is automatically initialized when opening a store, and includes
//! a full-text search index over entry names, institutions, and emails.
//!
//! Operations on the store are expressed as instructions — see
//! [`StoreInstruction`] and the types re-exported from
//! [`instruction`](crate::store::instruction).
//!
//! # Examples
//!
//! ```no_run
//! use rolodex::{entry::Entry, store::{Add, Query, Store}, prelude::*};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Store::open("rolodex.db").await?;
//!
//! Add::journal("Advances in Fuzzy Sets and Systems").execute(&mut store).await?;
//!
//! let entries = vec![Entry::from_block("Jane Doe\nExample University\nCanada\njd@y.edu")?];
//! Add::entries("Advances in Fuzzy Sets and Systems", "afss-2026-08-06", &entries)
//!   .execute(&mut store)
//!   .await?;
//!
//! let stored = Query::text("doe").execute(&mut store).await?;
//! println!("found {} entries", stored.len());
//! # Ok(())
//! # }
//! ```

use chrono::NaiveDate;
use rusqlite::params;
use tokio_rusqlite::Connection;

use super::*;

pub mod instruction;

pub use self::instruction::*;

/// Handle for interacting with the contact store.
///
/// This struct manages an async connection to a SQLite database and provides
/// the base operations instructions build on. The store is automatically
/// initialized with the required schema when opened; if the database file
/// doesn't exist, it will be created.
pub struct Store {
  /// Async SQLite connection handle
  conn: Connection,
}

impl Store {
  /// Opens an existing store or creates a new one at the specified path.
  ///
  /// This method will:
  /// 1. Create the database file if it doesn't exist
  /// 2. Initialize the schema using migrations
  /// 3. Set up the full-text search index and its sync triggers
  ///
  /// # Arguments
  ///
  /// * `path` - Path where the database file should be created or opened
  ///
  /// # Examples
  ///
  /// ```no_run
  /// # use rolodex::store::Store;
  /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
  /// // Open in a specific location
  /// let store = Store::open("rolodex.db").await?;
  ///
  /// // Or use the default location
  /// let store = Store::open(Store::default_path()).await?;
  /// # Ok(())
  /// # }
  /// ```
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(path.as_ref()).await?;

    // Initialize schema
    conn
      .call(|conn| {
        conn.execute_batch(include_str!(concat!(
          env!("CARGO_MANIFEST_DIR"),
          "/migrations/init.sql"
        )))?;
        Ok(())
      })
      .await?;

    Ok(Self { conn })
  }

  /// Returns the default path for the store file.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.local/share/rolodex/rolodex.db`
  /// - On macOS: `~/Library/Application Support/rolodex/rolodex.db`
  /// - On Windows: `%APPDATA%\rolodex\rolodex.db`
  /// - Fallback: `./rolodex.db` in the current directory
  pub fn default_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("rolodex").join("rolodex.db")
  }

  /// Checks the author-key index for an existing occurrence of a key.
  ///
  /// This is the O(1) accelerator used instead of a corpus scan when only
  /// membership matters. The index reflects the latest stored occurrence of
  /// each key.
  pub async fn is_duplicate(&self, key: &AuthorKey) -> Result<bool> {
    let key = key.as_str().to_string();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached("SELECT 1 FROM author_keys WHERE key = ?1")?;
        Ok(stmt.exists([key])?)
      })
      .await
      .map_err(RolodexError::from)
  }

  /// Adds to the day's processed-entry count.
  ///
  /// Office staff track how many entries they push through per day; this
  /// counter survives restarts, unlike the old per-browser tally.
  pub async fn record_activity(&self, day: NaiveDate, processed: usize) -> Result<()> {
    let day = day.format("%Y-%m-%d").to_string();
    let processed = processed as i64;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activity (day, processed) VALUES (?1, ?2)
             ON CONFLICT(day) DO UPDATE SET processed = processed + ?2",
          params![day, processed],
        )?;
        Ok(())
      })
      .await
      .map_err(RolodexError::from)
  }

  /// The processed-entry count recorded for a day.
  pub async fn activity_on(&self, day: NaiveDate) -> Result<u64> {
    let day = day.format("%Y-%m-%d").to_string();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached("SELECT processed FROM activity WHERE day = ?1")?;
        let result = stmt.query_row([day], |row| row.get::<_, i64>(0));
        match result {
          Ok(count) => Ok(count.max(0) as u64),
          Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(RolodexError::from)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Helper function to set up a test store
  async fn setup_test_store() -> (Store, PathBuf, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let store = Store::open(&path).await.unwrap();
    (store, path, dir)
  }

  #[traced_test]
  #[tokio::test]
  async fn test_store_creation() {
    let (_store, path, _dir) = setup_test_store().await;

    // Check that file exists
    assert!(path.exists());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_is_duplicate_on_empty_store() {
    let (store, _path, _dir) = setup_test_store().await;

    let key = AuthorKey::extract("Jane Doe\njd@y.edu").unwrap();
    assert!(!store.is_duplicate(&key).await.unwrap());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_activity_accumulates_per_day() {
    let (store, _path, _dir) = setup_test_store().await;
    let day = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

    assert_eq!(store.activity_on(day).await.unwrap(), 0);
    store.record_activity(day, 12).await.unwrap();
    store.record_activity(day, 3).await.unwrap();
    assert_eq!(store.activity_on(day).await.unwrap(), 15);

    let other = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    assert_eq!(store.activity_on(other).await.unwrap(), 0);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_activity_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let day = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

    {
      let store = Store::open(&db_path).await.unwrap();
      store.record_activity(day, 7).await.unwrap();
    }

    {
      let store = Store::open(&db_path).await.unwrap();
      assert_eq!(store.activity_on(day).await.unwrap(), 7);
    }
  }
}
