use std::time::Duration;

use rolodex::store::{Add, Dedup, Query, StoreInstruction};

use crate::{setup_test_store, test_entry, traced_test, TestResult};

#[traced_test]
#[tokio::test]
async fn test_sweep_keeps_most_recent_occurrence() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let entry = test_entry("Jane Doe", "jd@y.edu");

  // The resolver would normally reject this; write the duplicate directly to
  // simulate a corpus that accumulated them.
  Add::entries("Journal A", "a-old", &[entry.clone()]).execute(&mut store).await?;
  tokio::time::sleep(Duration::from_millis(10)).await;
  Add::entries("Journal B", "b-new", &[entry.clone()]).execute(&mut store).await?;

  let report = Dedup::sweep().execute(&mut store).await?;
  assert_eq!(report.groups.len(), 1);
  assert_eq!(report.removed_count(), 1);
  assert_eq!(report.groups[0].kept.file, "b-new");
  assert_eq!(report.groups[0].removed[0].file, "a-old");

  // The older occurrence is gone, the newer one survives.
  assert!(Query::in_file("Journal A", "a-old").execute(&mut store).await?.is_empty());
  assert_eq!(Query::in_file("Journal B", "b-new").execute(&mut store).await?.len(), 1);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_sweep_is_idempotent() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let entry = test_entry("Jane Doe", "jd@y.edu");
  Add::entries("Journal A", "a-1", &[entry.clone()]).execute(&mut store).await?;
  Add::entries("Journal A", "a-2", &[entry.clone()]).execute(&mut store).await?;

  let first = Dedup::sweep().execute(&mut store).await?;
  assert_eq!(first.removed_count(), 1);

  // A second run immediately after finds nothing to do.
  let second = Dedup::sweep().execute(&mut store).await?;
  assert!(second.is_clean());
  assert_eq!(second.removed_count(), 0);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_sweep_never_deletes_sole_occurrence() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  Add::entries("Journal A", "a-1", &[
    test_entry("Jane Doe", "jd@y.edu"),
    test_entry("John Smith", "js@x.edu"),
  ])
  .execute(&mut store)
  .await?;

  let report = Dedup::sweep().execute(&mut store).await?;
  assert!(report.is_clean());
  assert_eq!(Query::list_all().execute(&mut store).await?.len(), 2);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_dry_run_reports_but_keeps_everything() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let entry = test_entry("Jane Doe", "jd@y.edu");
  Add::entries("Journal A", "a-1", &[entry.clone()]).execute(&mut store).await?;
  Add::entries("Journal B", "b-1", &[entry.clone()]).execute(&mut store).await?;

  let preview = Dedup::sweep().dry_run().execute(&mut store).await?;
  assert_eq!(preview.removed_count(), 1);

  // Both occurrences still stored.
  assert_eq!(Query::list_all().execute(&mut store).await?.len(), 2);

  // The real sweep still finds the duplicate afterwards.
  let report = Dedup::sweep().execute(&mut store).await?;
  assert_eq!(report.removed_count(), 1);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_sweep_collapses_within_one_file() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let entry = test_entry("Jane Doe", "jd@y.edu");
  Add::entries("Journal A", "a-1", &[entry.clone(), entry.clone(), entry.clone()])
    .execute(&mut store)
    .await?;

  let report = Dedup::sweep().execute(&mut store).await?;
  assert_eq!(report.groups.len(), 1);
  assert_eq!(report.removed_count(), 2);

  let stored = Query::in_file("Journal A", "a-1").execute(&mut store).await?;
  assert_eq!(stored.len(), 1);

  Ok(())
}
