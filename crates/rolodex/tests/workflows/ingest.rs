use async_trait::async_trait;
use rolodex::{
  error::{Result as RolodexResult, RolodexError},
  ingest::Ingest,
  reformat::{ReformatConfig, Reformatter, TextTransform},
  store::{Query, StoreInstruction},
};

use crate::{setup_test_store, traced_test, TestResult};

/// Echoes the chunk body back, as if the service returned it already
/// canonical.
struct EchoTransform;

#[async_trait]
impl TextTransform for EchoTransform {
  async fn transform(&self, text: &str) -> RolodexResult<String> {
    let body = text.split_once("\n\n").map(|(_, rest)| rest).unwrap_or(text);
    Ok(body.to_string())
  }
}

/// Fails any chunk mentioning the marker, passing others through.
struct TripwireTransform;

#[async_trait]
impl TextTransform for TripwireTransform {
  async fn transform(&self, text: &str) -> RolodexResult<String> {
    if text.contains("BOOM") {
      return Err(RolodexError::TransformFailed("simulated outage".into()));
    }
    EchoTransform.transform(text).await
  }
}

#[traced_test]
#[tokio::test]
async fn test_raw_ingest_then_reingest_all_duplicates() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let raw = "Jane Doe\nExample University\nCanada\njd@y.edu\n\n\
             John Smith\nOther University\njs@x.edu";

  let first = Ingest::into_file("Journal A", "a-1").run_raw(&mut store, raw).await?;
  assert_eq!(first.received, 2);
  assert_eq!(first.stored, 2);
  assert_eq!(first.duplicate_count(), 0);
  assert_eq!(first.shortfall(), 0);

  // Idempotence: the corpus now contains the first run's uniques.
  let second = Ingest::into_file("Journal A", "a-2").run_raw(&mut store, raw).await?;
  assert_eq!(second.stored, 0);
  assert_eq!(second.duplicate_count(), 2);

  // The duplicates point back at the first run's file.
  for hits in second.duplicates.values() {
    let provenance = format!("{}", hits[0].existing);
    assert!(provenance.contains("Journal A/a-1"), "unexpected provenance: {provenance}");
  }

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_intra_batch_case_insensitive_duplicates_collapse() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let raw = "John Smith\nExample University\njs@x.edu\n\n\
             JOHN SMITH\nExample University\nJS@X.EDU";

  let report = Ingest::into_file("Journal A", "a-1").run_raw(&mut store, raw).await?;
  assert_eq!(report.stored, 1);
  assert_eq!(report.duplicate_count(), 1);

  let stored = Query::in_file("Journal A", "a-1").execute(&mut store).await?;
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].entry.name, "John Smith");

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_keyless_blocks_skipped_and_counted() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let raw = "Name1\nDept1\nUniv1\nCountry1\ne1@x.com\n\nName2 (no email)\n\n";

  let report = Ingest::into_file("Journal A", "a-1").run_raw(&mut store, raw).await?;
  assert_eq!(report.received, 2);
  assert_eq!(report.stored, 1);
  assert_eq!(report.skipped, 1);
  assert_eq!(report.duplicate_count(), 0);
  assert_eq!(report.shortfall(), 1);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_failed_chunk_under_delivers_but_ingest_succeeds() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let reformatter =
    Reformatter::with_config(ReformatConfig { chunk_size: 1, ..Default::default() });
  let raw = "Jane Doe\nExample University\njd@y.edu\n\n\
             BOOM Author\nExample University\nboom@x.edu\n\n\
             John Smith\nExample University\njs@x.edu";

  let report = Ingest::into_file("Journal A", "a-1")
    .run(&mut store, &reformatter, &TripwireTransform, raw, |_| {})
    .await?;

  assert_eq!(report.received, 3);
  assert_eq!(report.failed_chunks, 1);
  assert_eq!(report.stored, 2);
  assert_eq!(report.shortfall(), 1);

  let stored = Query::in_file("Journal A", "a-1").execute(&mut store).await?;
  let names: Vec<_> = stored.iter().map(|s| s.entry.name.as_str()).collect();
  assert_eq!(names, vec!["Jane Doe", "John Smith"]);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_email_post_pass_counts_dropped_blocks() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let raw = "Jane Doe\nExample University\njd@y.edu\n\nNo Email\nExample University\nnowhere";

  let report = Ingest::into_file("Journal A", "a-1")
    .run(&mut store, &Reformatter::new(), &EchoTransform, raw, |_| {})
    .await?;

  assert_eq!(report.dropped_no_email, 1);
  assert_eq!(report.stored, 1);
  assert_eq!(report.shortfall(), 1);

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_dry_run_writes_nothing() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  let raw = "Jane Doe\nExample University\njd@y.edu";

  let report =
    Ingest::into_file("Journal A", "a-1").dry_run().run_raw(&mut store, raw).await?;
  assert_eq!(report.stored, 1);

  assert!(Query::list_all().execute(&mut store).await?.is_empty());

  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_unparseable_unique_blocks_counted_invalid() -> TestResult<()> {
  let (mut store, _dir) = setup_test_store().await;
  // Two non-empty lines: enough for a key, too few for a canonical entry.
  let raw = "John Smith\njs@x.edu";

  let report = Ingest::into_file("Journal A", "a-1").run_raw(&mut store, raw).await?;
  assert_eq!(report.invalid, 1);
  assert_eq!(report.stored, 0);

  Ok(())
}
