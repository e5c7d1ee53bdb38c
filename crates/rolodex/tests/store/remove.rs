use rolodex::{
  error::RolodexError,
  store::{Add, ListFiles, Query, Remove, StoreInstruction},
};

use crate::{setup_test_store, test_entry, traced_test, TestResult};

#[traced_test]
#[tokio::test]
async fn test_remove_entry_refreshes_count() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  Add::entries("Journal A", "a-1", &[
    test_entry("Jane Doe", "jd@y.edu"),
    test_entry("John Smith", "js@x.edu"),
  ])
  .execute(&mut store)
  .await?;

  let removed = Remove::entry("Journal A", "a-1", 0).execute(&mut store).await?;
  assert_eq!(removed.len(), 1);
  assert_eq!(removed[0].entry.name, "Jane Doe");

  let stored = Query::in_file("Journal A", "a-1").execute(&mut store).await?;
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].entry.name, "John Smith");

  let files = ListFiles::new("Journal A").execute(&mut store).await?;
  assert_eq!(files[0].entry_count, 1);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_dry_run_previews_without_writing() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  Add::entries("Journal A", "a-1", &[test_entry("Jane Doe", "jd@y.edu")])
    .execute(&mut store)
    .await?;

  let previewed = Remove::file("Journal A", "a-1").dry_run().execute(&mut store).await?;
  assert_eq!(previewed.len(), 1);

  // Nothing was deleted.
  let stored = Query::in_file("Journal A", "a-1").execute(&mut store).await?;
  assert_eq!(stored.len(), 1);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_remove_file_clears_key_index() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let entry = test_entry("Jane Doe", "jd@y.edu");
  Add::entries("Journal A", "a-1", &[entry.clone()]).execute(&mut store).await?;
  assert!(store.is_duplicate(&entry.key().unwrap()).await?);

  Remove::file("Journal A", "a-1").execute(&mut store).await?;

  assert!(!store.is_duplicate(&entry.key().unwrap()).await?);
  assert!(Query::in_file("Journal A", "a-1").execute(&mut store).await?.is_empty());

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_remove_journal_cascades() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let one = test_entry("Jane Doe", "jd@y.edu");
  let two = test_entry("John Smith", "js@x.edu");
  Add::entries("Journal A", "a-1", &[one.clone()]).execute(&mut store).await?;
  Add::entries("Journal A", "a-2", &[two.clone()]).execute(&mut store).await?;

  let removed = Remove::journal("Journal A").execute(&mut store).await?;
  assert_eq!(removed.len(), 2);

  assert!(!store.is_duplicate(&one.key().unwrap()).await?);
  assert!(!store.is_duplicate(&two.key().unwrap()).await?);
  assert!(Query::list_all().execute(&mut store).await?.is_empty());

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_remove_missing_targets_error() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;

  let err = Remove::journal("Nonexistent").execute(&mut store).await.unwrap_err();
  assert!(matches!(err, RolodexError::JournalNotFound(_)));

  Add::journal("Journal A").execute(&mut store).await?;
  let err = Remove::file("Journal A", "missing").execute(&mut store).await.unwrap_err();
  assert!(matches!(err, RolodexError::FileNotFound(_, _)));

  Ok(())
}
