use std::time::Duration;

use rolodex::{
  resolve::Provenance,
  store::{Add, ListFiles, ListJournals, Query, ScanCorpus, StoreInstruction},
};

use crate::{setup_test_store, test_entry, test_entry_full, traced_test, TestResult};

#[traced_test]
#[tokio::test]
async fn test_query_in_file_preserves_order() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let entries: Vec<_> =
    (0..5).map(|i| test_entry(&format!("Author {i}"), &format!("a{i}@x.edu"))).collect();
  Add::entries("Journal A", "a-2026-08-06", &entries).execute(&mut store).await?;

  let stored = Query::in_file("Journal A", "a-2026-08-06").execute(&mut store).await?;
  let names: Vec<_> = stored.iter().map(|s| s.entry.name.as_str()).collect();
  assert_eq!(names, vec!["Author 0", "Author 1", "Author 2", "Author 3", "Author 4"]);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_query_by_key_carries_provenance() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let entry = test_entry_full("Professor Jane Doe", "jd@y.edu");
  Add::entries("Journal A", "a-2026-08-06", &[entry.clone()]).execute(&mut store).await?;

  let stored = Query::by_key(&entry.key().unwrap()).execute(&mut store).await?;
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].journal, "Journal A");
  assert_eq!(stored[0].file, "a-2026-08-06");
  assert_eq!(stored[0].entry, entry);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_full_text_search() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  Add::entries("Journal A", "a-2026-08-06", &[
    test_entry("Jane Doe", "jd@y.edu"),
    test_entry("John Smith", "js@x.edu"),
  ])
  .execute(&mut store)
  .await?;

  let hits = Query::text("doe").execute(&mut store).await?;
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].entry.name, "Jane Doe");

  let none = Query::text("nonexistent").execute(&mut store).await?;
  assert!(none.is_empty());

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_list_journals_and_files() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  Add::entries("Journal B", "b-1", &[test_entry("Jane Doe", "jd@y.edu")])
    .execute(&mut store)
    .await?;
  Add::entries("Journal A", "a-1", &[test_entry("John Smith", "js@x.edu")])
    .execute(&mut store)
    .await?;
  Add::entries("Journal A", "a-2", &[test_entry("Ann Other", "ao@z.edu")])
    .execute(&mut store)
    .await?;

  let journals = ListJournals.execute(&mut store).await?;
  let names: Vec<_> = journals.iter().map(|j| j.name.as_str()).collect();
  assert_eq!(names, vec!["Journal A", "Journal B"]);
  assert_eq!(journals[0].file_count, 2);

  let files = ListFiles::new("Journal A").execute(&mut store).await?;
  assert_eq!(files.len(), 2);
  assert_eq!(files[0].entry_count, 1);

  Ok(())
}

/// Corpus snapshot construction
mod scan_corpus {

  use super::*;

  #[traced_test]
  #[tokio::test]
  async fn test_fresh_and_indexed_agree_on_clean_store() -> TestResult<()> {
    let (mut store, _dir) = setup_test_store().await;
    Add::entries("Journal A", "a-1", &[
      test_entry("Jane Doe", "jd@y.edu"),
      test_entry("John Smith", "js@x.edu"),
    ])
    .execute(&mut store)
    .await?;

    let fresh = ScanCorpus::fresh().execute(&mut store).await?;
    let indexed = ScanCorpus::indexed().execute(&mut store).await?;

    assert_eq!(fresh.len(), 2);
    assert_eq!(indexed.len(), 2);
    for (key, provenance) in &fresh {
      assert_eq!(indexed.get(key), Some(provenance));
    }

    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_fresh_scan_most_recent_file_wins() -> TestResult<()> {
    let (mut store, _dir) = setup_test_store().await;
    let entry = test_entry("Jane Doe", "jd@y.edu");

    // Same key in two files; the second write lands later.
    Add::entries("Journal A", "a-old", &[entry.clone()]).execute(&mut store).await?;
    tokio::time::sleep(Duration::from_millis(10)).await;
    Add::entries("Journal B", "b-new", &[entry.clone()]).execute(&mut store).await?;

    let corpus = ScanCorpus::fresh().execute(&mut store).await?;
    let provenance = corpus.get(&entry.key().unwrap()).unwrap();
    assert!(
      matches!(provenance, Provenance::Stored { journal, file, .. }
        if journal == "Journal B" && file == "b-new")
    );

    Ok(())
  }
}
