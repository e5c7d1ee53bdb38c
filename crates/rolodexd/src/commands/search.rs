//! Module for searching the store.

use rolodex::{
  entry::AuthorKey,
  store::{Query, StoreInstruction},
};

use super::*;

/// Options for searching entries.
#[derive(Args)]
pub struct SearchOptions {
  /// Search query - supports full text search syntax
  pub query: String,

  /// Treat the query as an author key (`name_email`) and resolve it through
  /// the key index instead
  #[arg(long)]
  pub key: bool,
}

/// Function for the [`Commands::Search`] in the CLI.
///
/// Results carry provenance (journal, file, position) so hits can be fed
/// straight into `edit` or `remove`.
pub async fn search<I: UserInteraction>(
  interaction: &I,
  store: &mut Store,
  options: &SearchOptions,
) -> Result<()> {
  interaction.reply(ResponseContent::Info(&format!("Searching for: {}", options.query)))?;

  let entries = if options.key {
    let key: AuthorKey = options
      .query
      .parse()
      .map_err(|_| RolodexdError::InvalidArguments("empty author key".to_string()))?;
    Query::by_key(&key).execute(store).await?
  } else {
    Query::text(&options.query).execute(store).await?
  };

  interaction.reply(ResponseContent::Entries(&entries))
}
