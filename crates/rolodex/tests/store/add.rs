use rolodex::{
  error::RolodexError,
  store::{Add, ListFiles, Query, StoreInstruction},
};

use crate::{setup_test_store, test_entry, traced_test, TestResult};

/// Basic journal and file creation tests
mod basic_operations {

  use super::*;

  #[traced_test]
  #[tokio::test]
  async fn test_create_journal() -> TestResult<()> {
    let (mut store, _dir) = setup_test_store().await;

    Add::journal("Journal A").execute(&mut store).await?;
    let files = ListFiles::new("Journal A").execute(&mut store).await?;
    assert!(files.is_empty());

    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_create_journal_twice() -> TestResult<()> {
    let (mut store, _dir) = setup_test_store().await;

    Add::journal("Journal A").execute(&mut store).await?;
    let err = Add::journal("Journal A").execute(&mut store).await.unwrap_err();

    assert!(matches!(err, RolodexError::DuplicateJournal(_)));

    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_append_creates_journal_and_file() -> TestResult<()> {
    let (mut store, _dir) = setup_test_store().await;
    let entries = vec![test_entry("Jane Doe", "jd@y.edu")];

    let written = Add::entries("Journal A", "a-2026-08-06", &entries).execute(&mut store).await?;
    assert_eq!(written, 1);

    let files = ListFiles::new("Journal A").execute(&mut store).await?;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].entry_count, 1);

    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_append_extends_in_order() -> TestResult<()> {
    let (mut store, _dir) = setup_test_store().await;

    let first = vec![test_entry("Jane Doe", "jd@y.edu")];
    let second = vec![test_entry("John Smith", "js@x.edu")];
    Add::entries("Journal A", "a-2026-08-06", &first).execute(&mut store).await?;
    Add::entries("Journal A", "a-2026-08-06", &second).execute(&mut store).await?;

    let stored = Query::in_file("Journal A", "a-2026-08-06").execute(&mut store).await?;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].entry.name, "Jane Doe");
    assert_eq!(stored[1].entry.name, "John Smith");
    assert!(stored[0].position < stored[1].position);

    Ok(())
  }
}

/// Invariant maintenance on writes
mod invariants {

  use super::*;

  #[traced_test]
  #[tokio::test]
  async fn test_replace_file_resets_entries_and_count() -> TestResult<()> {
    let (mut store, _dir) = setup_test_store().await;
    Add::journal("Journal A").execute(&mut store).await?;

    let old = vec![test_entry("Jane Doe", "jd@y.edu"), test_entry("John Smith", "js@x.edu")];
    Add::file("Journal A", "a-2026-08-06", &old).execute(&mut store).await?;

    let replacement = vec![test_entry("Ann Other", "ao@z.edu")];
    Add::file("Journal A", "a-2026-08-06", &replacement).execute(&mut store).await?;

    let stored = Query::in_file("Journal A", "a-2026-08-06").execute(&mut store).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].entry.name, "Ann Other");

    let files = ListFiles::new("Journal A").execute(&mut store).await?;
    assert_eq!(files[0].entry_count, 1);

    // The replaced entries no longer occupy the key index.
    let old_key = old[0].key().unwrap();
    assert!(!store.is_duplicate(&old_key).await?);

    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_replace_file_requires_journal() -> TestResult<()> {
    let (mut store, _dir) = setup_test_store().await;
    let entries = vec![test_entry("Jane Doe", "jd@y.edu")];

    let err =
      Add::file("Nonexistent", "a-2026-08-06", &entries).execute(&mut store).await.unwrap_err();
    assert!(matches!(err, RolodexError::JournalNotFound(_)));

    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_write_populates_key_index() -> TestResult<()> {
    let (mut store, _dir) = setup_test_store().await;
    let entries = vec![test_entry("Jane Doe", "jd@y.edu")];

    let key = entries[0].key().unwrap();
    assert!(!store.is_duplicate(&key).await?);

    Add::entries("Journal A", "a-2026-08-06", &entries).execute(&mut store).await?;
    assert!(store.is_duplicate(&key).await?);

    Ok(())
  }
}
