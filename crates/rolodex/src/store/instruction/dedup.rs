//! Global duplicate sweep across the whole store.
//!
//! Where the resolver stops new duplicates at the door, this instruction
//! cleans up a corpus that already contains them: it groups every stored
//! entry by author key and, for each key held by more than one entry, deletes
//! all but the member from the most recently updated file, rewriting each
//! affected file's count and timestamp.
//!
//! The sweep is destructive but idempotent: a second run immediately after
//! finds zero duplicates and performs no writes, and the sole remaining
//! occurrence of a key is never deleted. The whole sweep runs in one
//! transaction, so each file's rewrite is all-or-nothing.
//!
//! # Examples
//!
//! ```no_run
//! use rolodex::{store::{Dedup, Store}, prelude::*};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Store::open("rolodex.db").await?;
//!
//! // Preview before deleting anything
//! let report = Dedup::sweep().dry_run().execute(&mut store).await?;
//! println!("{} duplicate groups, {} entries to remove", report.groups.len(), report.removed_count());
//!
//! let report = Dedup::sweep().execute(&mut store).await?;
//! assert!(Dedup::sweep().execute(&mut store).await?.is_clean());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use super::*;

/// One key that was held by multiple entries.
#[derive(Debug, Clone)]
pub struct DedupGroup {
  /// The colliding author key
  pub key:     AuthorKey,
  /// The surviving entry, from the most recently updated file
  pub kept:    StoredEntry,
  /// The deleted entries, in scan order
  pub removed: Vec<StoredEntry>,
}

/// Outcome of a sweep.
#[derive(Debug, Clone, Default)]
pub struct DedupReport {
  /// Every key that had duplicates, in key order
  pub groups: Vec<DedupGroup>,
}

impl DedupReport {
  /// Total entries removed (or, in a dry run, that would be removed).
  pub fn removed_count(&self) -> usize { self.groups.iter().map(|g| g.removed.len()).sum() }

  /// True when the sweep found no duplicates.
  pub fn is_clean(&self) -> bool { self.groups.is_empty() }
}

/// Instruction performing the global duplicate sweep.
pub struct Dedup {
  /// Dry-run configuration, shared with [`Remove`]
  options: RemoveOptions,
}

impl Dedup {
  /// Creates a sweep instruction.
  pub fn sweep() -> Self { Self { options: RemoveOptions::default() } }

  /// Enables dry run mode: report the groups, delete nothing.
  pub fn dry_run(mut self) -> Self {
    self.options.dry_run = true;
    self
  }
}

#[async_trait]
impl StoreInstruction for Dedup {
  type Output = DedupReport;

  async fn execute(&self, store: &mut Store) -> Result<Self::Output> {
    let dry_run = self.options.dry_run;
    let now = Utc::now();

    let report = store
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Deterministic scan order doubles as the tie-break for equally
        // recent files.
        let mut groups: BTreeMap<AuthorKey, Vec<(i64, i64, StoredEntry)>> = BTreeMap::new();
        {
          let mut stmt = tx.prepare_cached(
            "SELECT e.id, f.id, j.name, f.name, f.updated_at,
                    e.position, e.name, e.department, e.institution, e.country, e.email
               FROM entries e
               JOIN files f ON e.file_id = f.id
               JOIN journals j ON f.journal_id = j.id
               ORDER BY j.name, f.name, e.position",
          )?;
          let mut rows = stmt.query([])?;
          while let Some(row) = rows.next()? {
            let stored = StoredEntry {
              journal:    row.get(2)?,
              file:       row.get(3)?,
              position:   row.get::<_, i64>(5)? as usize,
              updated_at: row.get(4)?,
              entry:      Entry {
                name:        row.get(6)?,
                department:  row.get(7)?,
                institution: row.get(8)?,
                country:     row.get(9)?,
                email:       row.get(10)?,
              },
            };
            let Some(key) = stored.entry.key() else { continue };
            groups.entry(key).or_default().push((row.get(0)?, row.get(1)?, stored));
          }
        }

        let mut report = DedupReport::default();
        let mut affected_files: Vec<i64> = Vec::new();

        for (key, members) in groups {
          if members.len() < 2 {
            continue;
          }

          // The most recently updated file wins; the first member among
          // equals keeps scan order as the tie-break.
          let winner = members
            .iter()
            .enumerate()
            .max_by(|(ai, a), (bi, b)| {
              a.2.updated_at.cmp(&b.2.updated_at).then(bi.cmp(ai))
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

          let mut kept = None;
          let mut removed = Vec::new();
          for (index, (entry_id, file_id, stored)) in members.into_iter().enumerate() {
            if index == winner {
              if !dry_run {
                // The index row may have pointed at a deleted member.
                tx.execute(
                  "INSERT OR REPLACE INTO author_keys (key, entry_id) VALUES (?1, ?2)",
                  params![key.as_str(), entry_id],
                )?;
              }
              kept = Some(stored);
            } else {
              if !dry_run {
                tx.execute("DELETE FROM entries WHERE id = ?1", [entry_id])?;
                affected_files.push(file_id);
              }
              removed.push(stored);
            }
          }

          if let Some(kept) = kept {
            debug!(%key, removed = removed.len(), "collapsed duplicate group");
            report.groups.push(DedupGroup { key, kept, removed });
          }
        }

        if !dry_run {
          affected_files.sort_unstable();
          affected_files.dedup();
          for file_id in affected_files {
            refresh_file(&tx, file_id, now)?;
          }
        }

        tx.commit()?;
        Ok(report)
      })
      .await?;

    Ok(report)
  }
}
