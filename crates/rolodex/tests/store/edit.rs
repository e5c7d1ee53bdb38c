use rolodex::{
  error::RolodexError,
  resolve::Provenance,
  store::{Add, Edit, ListFiles, Query, ScanCorpus, StoreInstruction},
};

use crate::{setup_test_store, test_entry, traced_test, TestResult};

#[traced_test]
#[tokio::test]
async fn test_edit_entry_swaps_text_and_key() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let original = test_entry("Jane Doe", "jd@y.edu");
  Add::entries("Journal A", "a-1", &[original.clone()]).execute(&mut store).await?;

  let corrected = test_entry("Jane Doe", "jane.doe@y.edu");
  Edit::entry("Journal A", "a-1", 0, &corrected).execute(&mut store).await?;

  let stored = Query::in_file("Journal A", "a-1").execute(&mut store).await?;
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].entry.email, "jane.doe@y.edu");

  // The index follows the correction.
  assert!(!store.is_duplicate(&original.key().unwrap()).await?);
  assert!(store.is_duplicate(&corrected.key().unwrap()).await?);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_edit_entry_missing_position() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let entry = test_entry("Jane Doe", "jd@y.edu");
  Add::entries("Journal A", "a-1", &[entry.clone()]).execute(&mut store).await?;

  let err = Edit::entry("Journal A", "a-1", 7, &entry).execute(&mut store).await.unwrap_err();
  assert!(matches!(err, RolodexError::EntryNotFound(_, _, 7)));

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_rename_file() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  Add::entries("Journal A", "a-old", &[test_entry("Jane Doe", "jd@y.edu")])
    .execute(&mut store)
    .await?;

  Edit::rename_file("Journal A", "a-old", "a-new").execute(&mut store).await?;

  let files = ListFiles::new("Journal A").execute(&mut store).await?;
  assert_eq!(files.len(), 1);
  assert_eq!(files[0].name, "a-new");

  let stored = Query::in_file("Journal A", "a-new").execute(&mut store).await?;
  assert_eq!(stored.len(), 1);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_rename_collision_is_rejected() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  Add::entries("Journal A", "a-1", &[test_entry("Jane Doe", "jd@y.edu")])
    .execute(&mut store)
    .await?;
  Add::entries("Journal A", "a-2", &[test_entry("John Smith", "js@x.edu")])
    .execute(&mut store)
    .await?;

  let err = Edit::rename_file("Journal A", "a-1", "a-2").execute(&mut store).await.unwrap_err();
  assert!(matches!(err, RolodexError::DuplicateFile(_, _)));

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_move_file_updates_provenance() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let entry = test_entry("Jane Doe", "jd@y.edu");
  Add::entries("Journal A", "shared", &[entry.clone()]).execute(&mut store).await?;
  Add::journal("Journal B").execute(&mut store).await?;

  Edit::move_file("shared", "Journal A", "Journal B").execute(&mut store).await?;

  // Entries carried over unchanged.
  let stored = Query::in_file("Journal B", "shared").execute(&mut store).await?;
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].entry, entry);
  assert!(Query::in_file("Journal A", "shared").execute(&mut store).await?.is_empty());

  // Key provenance resolves through the new journal.
  let corpus = ScanCorpus::indexed().execute(&mut store).await?;
  let provenance = corpus.get(&entry.key().unwrap()).unwrap();
  assert!(matches!(provenance, Provenance::Stored { journal, .. } if journal == "Journal B"));

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_move_to_missing_journal() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  Add::entries("Journal A", "a-1", &[test_entry("Jane Doe", "jd@y.edu")])
    .execute(&mut store)
    .await?;

  let err =
    Edit::move_file("a-1", "Journal A", "Nonexistent").execute(&mut store).await.unwrap_err();
  assert!(matches!(err, RolodexError::JournalNotFound(_)));

  Ok(())
}
