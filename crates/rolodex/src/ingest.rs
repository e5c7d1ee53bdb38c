//! End-to-end pipeline from pasted text to stored entries.
//!
//! One user action — "add these contacts to this journal" — runs the whole
//! chain: split the raw text into blocks, optionally reformat them through
//! the external service, strict-parse the survivors, resolve them against the
//! existing corpus, and append the uniques to the target file. Every stage
//! can shrink the batch (failed chunks, missing emails, unparseable blocks,
//! duplicates), so the pipeline returns an [`IngestReport`] accounting for
//! every block it received; callers are expected to show the operator the
//! difference between what went in and what was stored.
//!
//! The pipeline takes its collaborators explicitly — store, reformatter,
//! transform service — and keeps no state of its own.
//!
//! # Examples
//!
//! ```no_run
//! use rolodex::{
//!   ingest::Ingest,
//!   reformat::{GeminiClient, Model, Reformatter},
//!   store::Store,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Store::open("rolodex.db").await?;
//! let client = GeminiClient::new().with_model(Model::Gemini20Flash).with_api_key("...");
//!
//! let report = Ingest::into_file("Journal A", "a-2026-08-06")
//!   .run(&mut store, &Reformatter::new(), &client, "jane doe example univ jd@y.edu", |_| {})
//!   .await?;
//! println!("{} stored, {} duplicates", report.stored, report.duplicate_count());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use chrono::Local;

use super::*;
use crate::{
  reformat::{Progress, Reformatter, TextTransform},
  resolve::{resolve, DuplicateHit},
  store::{Add, ScanCorpus, Store, StoreInstruction},
};

/// Accounting for one ingest run.
///
/// `received` counts the blocks parsed from the raw input; every one of them
/// ends up in exactly one of the other buckets (or vanished inside a failed
/// chunk). The operation "succeeds" even when it under-delivers — surfacing
/// `received` vs `stored` to the operator is the caller's job.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
  /// Journal the run targeted
  pub journal:          String,
  /// File the run targeted
  pub file:             String,
  /// Blocks parsed from the raw input
  pub received:         usize,
  /// Blocks that came back from the reformatter (equals `received` in raw
  /// mode)
  pub reformatted:      usize,
  /// Reformatter chunks that failed outright
  pub failed_chunks:    usize,
  /// Blocks the reformatter dropped for lacking an email line
  pub dropped_no_email: usize,
  /// Candidates dropped because no author key could be extracted
  pub skipped:          usize,
  /// Unique blocks that failed strict parsing and were not stored
  pub invalid:          usize,
  /// Entries written to the store
  pub stored:           usize,
  /// Rejected candidates grouped by key, with conflict provenance
  pub duplicates:       BTreeMap<AuthorKey, Vec<DuplicateHit>>,
}

impl IngestReport {
  /// Total rejected candidates across all keys.
  pub fn duplicate_count(&self) -> usize { self.duplicates.values().map(Vec::len).sum() }

  /// Blocks that went in but were neither stored nor reported as duplicates.
  pub fn shortfall(&self) -> usize {
    self.received.saturating_sub(self.stored + self.duplicate_count())
  }
}

/// The ingest pipeline, targeting one journal/file pair.
#[derive(Debug, Clone)]
pub struct Ingest<'a> {
  /// Target journal, created on demand
  journal: &'a str,
  /// Target file, created on demand
  file:    &'a str,
  /// Resolve and report without writing
  dry_run: bool,
}

impl<'a> Ingest<'a> {
  /// Creates a pipeline targeting `journal`/`file`.
  pub fn into_file(journal: &'a str, file: &'a str) -> Self {
    Self { journal, file, dry_run: false }
  }

  /// Resolve and report without persisting anything.
  pub fn dry_run(mut self) -> Self {
    self.dry_run = true;
    self
  }

  /// Runs the full pipeline: reformat, resolve, persist.
  ///
  /// `progress` receives the reformatter's per-chunk progress.
  pub async fn run(
    &self,
    store: &mut Store,
    reformatter: &Reformatter,
    service: &dyn TextTransform,
    raw: &str,
    progress: impl FnMut(Progress),
  ) -> Result<IngestReport> {
    let received = parse_blocks(raw).len();
    let outcome = reformatter.reformat(service, raw, progress).await;

    let mut report = IngestReport {
      journal: self.journal.to_string(),
      file: self.file.to_string(),
      received,
      reformatted: outcome.blocks.len(),
      failed_chunks: outcome.failed_chunks(),
      dropped_no_email: outcome.dropped_no_email,
      ..Default::default()
    };
    self.finish(store, outcome.blocks, &mut report).await?;
    Ok(report)
  }

  /// Runs the pipeline without the external service.
  ///
  /// The raw blocks are taken as already canonical; anything that fails the
  /// strict parser is counted under `invalid`.
  pub async fn run_raw(&self, store: &mut Store, raw: &str) -> Result<IngestReport> {
    let blocks = parse_blocks(raw);

    let mut report = IngestReport {
      journal: self.journal.to_string(),
      file: self.file.to_string(),
      received: blocks.len(),
      reformatted: blocks.len(),
      ..Default::default()
    };
    self.finish(store, blocks, &mut report).await?;
    Ok(report)
  }

  /// Shared tail of both modes: resolve, parse, persist, count.
  async fn finish(
    &self,
    store: &mut Store,
    candidates: Vec<String>,
    report: &mut IngestReport,
  ) -> Result<()> {
    let corpus = ScanCorpus::indexed().execute(store).await?;
    let resolution = resolve(&candidates, &corpus);
    report.skipped = resolution.skipped;
    report.duplicates = resolution.duplicates;

    let mut entries = Vec::with_capacity(resolution.unique.len());
    for block in &resolution.unique {
      match Entry::from_block(block) {
        Ok(entry) => entries.push(entry),
        Err(e) => {
          warn!(error = %e, "unique block failed strict parsing");
          report.invalid += 1;
        },
      }
    }

    if !self.dry_run && !entries.is_empty() {
      report.stored =
        Add::entries(self.journal, self.file, &entries).execute(store).await?;
      store.record_activity(Local::now().date_naive(), report.stored).await?;
    } else if self.dry_run {
      // Report what a real run would have written.
      report.stored = entries.len();
    }

    Ok(())
  }
}
