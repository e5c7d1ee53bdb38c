//! Contact-entry normalization, deduplication, and journal storage.
//!
//! `rolodex` is a library for managing academic author contact entries,
//! providing:
//!
//! - Parsing of pasted or uploaded contact text into discrete blocks
//! - Reformatting into a canonical shape through a hosted text-transform
//!   service
//! - Corpus-wide duplicate detection keyed on author name and email
//! - Journal/file storage with full-text search and a flat key index
//! - Local triage of blocks missing an email or country
//!
//! # Features
//!
//! - **Explicit records**: entries are typed
//!   (name/department/institution/country/email), with the blank-line text
//!   form used only for serialization
//! - **Black-box reformatting**: the external service sits behind a trait,
//!   with chunked calls, explicit per-chunk outcomes, and progress reporting
//! - **Provenance-carrying duplicates**: every rejected candidate names the
//!   journal and file holding the conflicting occurrence
//! - **Command pattern**: composable, typed store operations
//!
//! # Getting Started
//!
//! ```no_run
//! use rolodex::{
//!   entry::Entry,
//!   store::{Add, Query, Store},
//!   prelude::*,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   // Create or open a store
//!   let mut store = Store::open(Store::default_path()).await?;
//!
//!   // Parse and add an entry
//!   let entry = Entry::from_block("Jane Doe\nExample University\nCanada\njd@y.edu")?;
//!   Add::entries("Journal A", "a-2026-08-06", &[entry]).execute(&mut store).await?;
//!
//!   // Search for entries
//!   let found = Query::text("example university").execute(&mut store).await?;
//!   println!("{} match(es)", found.len());
//!
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`entry`]: Block parsing, the canonical entry record, author keys
//! - [`reformat`]: The external transform service client and batching
//! - [`resolve`]: The pure duplicate resolver
//! - [`store`]: Journal/file storage and the instruction types
//! - [`ingest`]: The end-to-end paste-to-store pipeline
//! - [`triage`]: Local completeness flags and greeting insertion
//! - [`prelude`]: Common traits and types for ergonomic imports
//!
//! # Design Philosophy
//!
//! This library emphasizes:
//! - Explicit inputs and outputs over ambient session state
//! - Failures as values where a batch should outlive one bad chunk
//! - Corpus-wide identity for duplicate detection
//! - Clear error handling and propagation

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod entry;
pub mod error;
pub mod ingest;
pub mod reformat;
pub mod resolve;
pub mod store;
pub mod triage;

use crate::{entry::*, error::*};

/// Common traits and types for ergonomic imports.
///
/// This module provides a convenient way to import frequently used traits
/// and types with a single glob import.
///
/// # Usage
///
/// ```no_run
/// use rolodex::{entry::Entry, store::{Add, Store}, prelude::*};
///
/// async fn example() -> Result<(), RolodexError> {
///   let mut store = Store::open(Store::default_path()).await?;
///   let entry = Entry::from_block("Jane Doe\nExample University\njd@y.edu")?;
///   Add::entries("Journal A", "a-2026-08-06", &[entry]).execute(&mut store).await?;
///   Ok(())
/// }
/// ```
///
/// # Contents
///
/// Currently exports:
/// - [`StoreInstruction`](store::StoreInstruction): Trait for store operations
/// - [`TextTransform`](reformat::TextTransform): Trait for the external service seam
/// - [`RolodexError`]: Core error type for the library
pub mod prelude {
  pub use crate::{
    error::RolodexError, reformat::TextTransform, store::StoreInstruction,
  };
}
