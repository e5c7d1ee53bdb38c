//! Error types for the rolodex CLI.

use thiserror::Error;

/// Error type alias used for the CLI crate.
pub type Result<T> = core::result::Result<T, RolodexdError>;

/// Errors that can occur while running CLI commands.
///
/// Most variants wrap the library or environment errors they originate from;
/// [`RolodexdError::Uninitialized`] is the CLI's own signal that the store
/// has not been created yet.
#[derive(Error, Debug)]
pub enum RolodexdError {
  /// A library operation failed.
  #[error(transparent)]
  Rolodex(#[from] rolodex::error::RolodexError),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// An interactive prompt failed.
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// No store exists at the configured path.
  #[error("No store found at {0}. Run `rolodex init` first.")]
  Uninitialized(String),

  /// The command was given inconsistent or missing arguments.
  #[error("{0}")]
  InvalidArguments(String),
}
