//! Duplicate detection over a corpus snapshot.
//!
//! The resolver is a pure comparison-and-partition operation: given candidate
//! blocks and a map of every author key already known to the store, it
//! partitions the candidates into the unique ones (safe to persist) and the
//! duplicates (reported with the provenance of the conflicting occurrence so
//! a human can resolve them). It holds no state and touches no storage; the
//! corpus snapshot comes from a store scan or from the key index.
//!
//! Identity is corpus-wide: two blocks with the same [`AuthorKey`] are
//! duplicates no matter which journal or file holds the earlier one, and
//! duplicates within a single batch collapse the same way.
//!
//! # Examples
//!
//! ```
//! use rolodex::resolve::{resolve, Corpus};
//!
//! let candidates =
//!   vec!["John Smith\njs@x.edu".to_string(), "JOHN SMITH\nJS@X.EDU".to_string()];
//! let resolution = resolve(&candidates, &Corpus::new());
//!
//! assert_eq!(resolution.unique.len(), 1);
//! assert_eq!(resolution.duplicate_count(), 1);
//! ```

use std::collections::{BTreeMap, HashMap};

use super::*;

/// Where a known occurrence of an author key lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
  /// Persisted in the store, with the holding file's last-updated time
  Stored {
    /// Journal holding the occurrence
    journal:    String,
    /// File within the journal
    file:       String,
    /// The file's last-updated timestamp
    updated_at: DateTime<Utc>,
  },
  /// Seen earlier in the same batch, not yet persisted
  Pending,
}

impl Display for Provenance {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Provenance::Stored { journal, file, updated_at } =>
        write!(f, "{journal}/{file} (updated {})", updated_at.format("%Y-%m-%d %H:%M")),
      Provenance::Pending => write!(f, "this upload"),
    }
  }
}

/// Snapshot of every author key known to the store.
///
/// When built from a fresh scan and multiple stored entries collide on one
/// key, the entry from the most recently updated file wins as "the" existing
/// occurrence; ties fall to deterministic scan order.
pub type Corpus = HashMap<AuthorKey, Provenance>;

/// A rejected candidate together with the occurrence it conflicts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateHit {
  /// The candidate block that was rejected
  pub candidate: String,
  /// Where the conflicting occurrence lives
  pub existing:  Provenance,
}

/// Outcome of resolving a candidate batch against a corpus.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
  /// Candidates with no prior occurrence, in input order, safe to persist
  pub unique:     Vec<String>,
  /// Rejected candidates grouped by key, each with conflict provenance
  pub duplicates: BTreeMap<AuthorKey, Vec<DuplicateHit>>,
  /// Candidates dropped because no key could be extracted
  pub skipped:    usize,
}

impl Resolution {
  /// Total number of rejected candidates across all keys.
  pub fn duplicate_count(&self) -> usize { self.duplicates.values().map(Vec::len).sum() }
}

/// Partitions candidates into unique and duplicate sets against the corpus.
///
/// For each candidate, in input order:
/// - no extractable key → skipped entirely, appearing in neither output (a
///   filtering rule, not an error);
/// - key already known, from the corpus or from an earlier candidate in the
///   same batch → recorded under `duplicates` with the conflicting
///   occurrence's provenance;
/// - otherwise → appended to `unique` and inserted into the working map as
///   [`Provenance::Pending`], so later same-key candidates in the batch
///   collapse onto it.
///
/// Running the resolver again with the same candidates, against a corpus that
/// now includes the first run's uniques, yields zero new uniques.
pub fn resolve(candidates: &[String], corpus: &Corpus) -> Resolution {
  let mut seen = corpus.clone();
  let mut resolution = Resolution::default();

  for candidate in candidates {
    let Some(key) = AuthorKey::extract(candidate) else {
      trace!("skipping candidate with no extractable key");
      resolution.skipped += 1;
      continue;
    };

    match seen.get(&key) {
      Some(existing) => {
        debug!(%key, "duplicate candidate");
        resolution
          .duplicates
          .entry(key)
          .or_default()
          .push(DuplicateHit { candidate: candidate.clone(), existing: existing.clone() });
      },
      None => {
        resolution.unique.push(candidate.clone());
        seen.insert(key, Provenance::Pending);
      },
    }
  }

  resolution
}
