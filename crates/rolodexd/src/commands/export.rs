//! Module for exporting entries back to the flat text format.

use rolodex::{
  entry::join_blocks,
  store::{ListFiles, Query, StoreInstruction},
};

use super::*;

/// Options for exporting entries.
#[derive(Args)]
pub struct ExportOptions {
  /// Journal to export
  pub journal: String,

  /// Export only this file; otherwise all of the journal's files in name
  /// order
  #[arg(long)]
  pub file: Option<String>,

  /// Write to this path instead of stdout
  #[arg(long)]
  pub output: Option<PathBuf>,
}

/// Function for the [`Commands::Export`] in the CLI.
///
/// Entries are rendered in their canonical block form and separated by one
/// blank line, the same format `ingest --raw` accepts back.
pub async fn export<I: UserInteraction>(
  interaction: &I,
  store: &mut Store,
  options: &ExportOptions,
) -> Result<()> {
  let files = match &options.file {
    Some(file) => vec![file.clone()],
    None =>
      ListFiles::new(&options.journal).execute(store).await?.into_iter().map(|f| f.name).collect(),
  };

  let mut blocks = Vec::new();
  for file in &files {
    let stored = Query::in_file(&options.journal, file).execute(store).await?;
    if stored.is_empty() && options.file.is_some() {
      return Err(RolodexdError::InvalidArguments(format!(
        "no entries found in {}/{file}",
        options.journal
      )));
    }
    blocks.extend(stored.into_iter().map(|s| s.entry.to_string()));
  }

  let text = join_blocks(&blocks);
  match &options.output {
    Some(path) => {
      std::fs::write(path, format!("{text}\n"))?;
      interaction.reply(ResponseContent::Success(&format!(
        "Exported {} entr(ies) to {}",
        blocks.len(),
        path.display()
      )))
    },
    None => {
      println!("{text}");
      Ok(())
    },
  }
}
