//! Error types for the rolodex library.
//!
//! This module provides a comprehensive error type that encompasses all possible
//! failure modes when working with contact entries, including:
//! - Entry validation
//! - Store operations
//! - The external text-transform service
//! - Configuration loading
//!
//! # Examples
//!
//! ```
//! use rolodex::{entry::Entry, error::RolodexError};
//! // or `use rolodex::prelude::*` to bring in the error type
//!
//! match Entry::from_block("Jane Doe") {
//!   Err(RolodexError::InvalidEntry(reason)) => println!("Rejected: {reason}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(_) => println!("Parsed!"),
//! }
//! ```

use thiserror::Error;

/// Error type alias used for the [`rolodex`](crate) crate.
pub type Result<T> = core::result::Result<T, RolodexError>;

/// Errors that can occur when working with the rolodex library.
///
/// This enum provides a comprehensive set of error cases that can occur when:
/// - Parsing contact blocks into entries
/// - Reading and writing the journal/file store
/// - Calling the external text-transform service
/// - Loading configuration files
///
/// Most error variants provide additional context through either custom messages
/// or wrapped underlying errors.
#[derive(Error, Debug)]
pub enum RolodexError {
  /// A block of text could not be parsed into a canonical entry.
  ///
  /// This can occur when:
  /// - The block has fewer than three or more than five non-empty lines
  /// - The last line does not contain an email address
  /// - The name line is empty once the honorific is stripped
  ///
  /// The string parameter describes what was wrong with the block.
  #[error("Invalid entry: {0}")]
  InvalidEntry(String),

  /// No journal with the given name exists in the store.
  #[error("No journal named \"{0}\"")]
  JournalNotFound(String),

  /// No file with the given name exists under the given journal.
  #[error("No file named \"{1}\" in journal \"{0}\"")]
  FileNotFound(String, String),

  /// No entry exists at the given position of a file.
  ///
  /// Positions are the zero-based ordering reported by queries, so this
  /// usually means the file changed between a search and an edit.
  #[error("No entry at position {2} of \"{0}/{1}\"")]
  EntryNotFound(String, String, usize),

  /// A rename or move would collide with an existing file.
  ///
  /// File names are unique within a journal. The parameters are the journal
  /// and the file name that is already taken.
  #[error("A file named \"{1}\" already exists in journal \"{0}\"")]
  DuplicateFile(String, String),

  /// Indicates an attempt to create a journal that already exists.
  ///
  /// Journal names are unique across the store. This error includes the
  /// journal's name to help users identify which creation caused the
  /// conflict.
  #[error("A journal named \"{0}\" already exists")]
  DuplicateJournal(String),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The transform service is unreachable
  /// - The request times out
  /// - TLS/SSL errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The external text-transform service returned an unusable response.
  ///
  /// The string parameter contains the service's error message or a
  /// description of what was missing from the response.
  #[error("Transform service error: {0}")]
  TransformFailed(String),

  /// A model was not specified for the transform service request.
  ///
  /// This occurs when a request is built without calling `with_model()`.
  /// The error helps ensure requests are properly configured before being
  /// sent to avoid opaque API errors.
  #[error("No model was chosen for the transform service.")]
  TransformMissingModel,

  /// No text was supplied for the transform service to rewrite.
  #[error("No input text was supplied to the transform service.")]
  TransformMissingInput,

  /// A SQLite operation failed.
  ///
  /// This wraps errors from the `rusqlite` crate, covering:
  /// - SQL syntax errors
  /// - Constraint violations
  /// - Schema errors
  /// - Type conversion errors
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// An async SQLite operation failed.
  ///
  /// This wraps errors from the `tokio-rusqlite` crate, covering
  /// async-specific failures in store operations.
  #[error(transparent)]
  AsyncSqlite(#[from] tokio_rusqlite::Error),

  /// A file system operation failed.
  ///
  /// This occurs when:
  /// - Creating the store file fails
  /// - Reading input text or configuration from disk fails
  /// - Permission errors occur
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// A TOML configuration file could not be deserialized.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A configuration value was missing or inconsistent.
  #[error("{0}")]
  Config(String),
}
