//! Module for initializing a new rolodex store.

use super::*;

/// Function for the [`Commands::Init`] in the CLI.
///
/// Creates the store's parent directory if needed and opens the store once,
/// which lays down the schema. Running it against an existing store is
/// harmless.
pub async fn init<I: UserInteraction>(interaction: &I, store_path: &PathBuf) -> Result<()> {
  if let Some(parent) = store_path.parent() {
    std::fs::create_dir_all(parent)?;
  }

  let already = store_path.exists();
  Store::open(store_path).await?;

  if already {
    interaction
      .reply(ResponseContent::Info(&format!("Store already exists at {}", store_path.display())))
  } else {
    interaction
      .reply(ResponseContent::Success(&format!("Store created at {}", store_path.display())))
  }
}
