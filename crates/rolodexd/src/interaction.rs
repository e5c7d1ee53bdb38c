//! User interaction layer: prompts, confirmations, and rendered replies.
//!
//! Commands talk to the operator through the [`UserInteraction`] trait so
//! tests can substitute a scripted implementation. The production
//! implementation, [`Console`], renders with `console` styling and asks
//! questions with `dialoguer`.

use console::style;
use dialoguer::{Confirm, Input};
use rolodex::{
  ingest::IngestReport,
  store::{DedupReport, FileMeta, JournalMeta, StoredEntry},
  triage::TriageReport,
};

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for in-progress messages
pub static WORKING_PREFIX: &str = "» ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Branch character for tree structure
pub static ITEM_PREFIX: &str = "├─";
/// Leaf character for tree structure (end of branch)
pub static LAST_ITEM_PREFIX: &str = "└─";
/// Continuation line for tree structure
pub static CONTINUE_PREFIX: &str = "│  ";

/// Content a command can send back to the operator.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// One stored entry with provenance
  Entry(&'a StoredEntry),
  /// A list of stored entries with provenance
  Entries(&'a [StoredEntry]),
  /// Journal summaries
  Journals(&'a [JournalMeta]),
  /// File summaries for one journal
  Files(&'a [FileMeta]),
  /// An ingest run's accounting
  Ingest(&'a IngestReport),
  /// A dedup sweep's report
  Dedup(&'a DedupReport),
  /// A triage pass's report
  Triage(&'a TriageReport),
  /// A success message
  Success(&'a str),
  /// An in-progress status line
  Working(&'a str),
  /// An informational message
  Info(&'a str),
}

/// Seam between commands and the terminal.
pub trait UserInteraction {
  /// Asks a yes/no question, defaulting to no.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Asks for a line of input.
  fn prompt(&self, message: &str) -> Result<String>;
  /// Renders a reply to the operator.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Terminal-backed [`UserInteraction`] implementation.
pub struct Console {
  /// Answer prompts with their defaults instead of asking (for testing)
  accept_defaults: bool,
}

impl Console {
  /// Creates a console interaction layer.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Console {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{message}", style(PROMPT_PREFIX).cyan()))
        .default(false)
        .interact()?,
    )
  }

  fn prompt(&self, message: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(String::new());
    }
    Ok(
      Input::new()
        .with_prompt(format!("{}{message}", style(PROMPT_PREFIX).cyan()))
        .allow_empty(true)
        .interact_text()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Entry(stored) => print_entry(stored, true),
      ResponseContent::Entries(entries) =>
        if entries.is_empty() {
          println!("{} No entries found", style(INFO_PREFIX).blue());
        } else {
          println!("{} {} entries:", style(INFO_PREFIX).blue(), entries.len());
          for (index, stored) in entries.iter().enumerate() {
            print_entry(stored, index + 1 == entries.len());
          }
        },
      ResponseContent::Journals(journals) => {
        println!("{} {} journal(s):", style(INFO_PREFIX).blue(), journals.len());
        for (index, journal) in journals.iter().enumerate() {
          let prefix =
            if index + 1 == journals.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!(
            "{prefix} {} ({} file(s), created {})",
            style(&journal.name).cyan(),
            journal.file_count,
            journal.created_at.format("%Y-%m-%d")
          );
        }
      },
      ResponseContent::Files(files) => {
        println!("{} {} file(s):", style(INFO_PREFIX).blue(), files.len());
        for (index, file) in files.iter().enumerate() {
          let prefix = if index + 1 == files.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!(
            "{prefix} {} ({} entries, updated {})",
            style(&file.name).cyan(),
            file.entry_count,
            file.updated_at.format("%Y-%m-%d %H:%M")
          );
        }
      },
      ResponseContent::Ingest(report) => print_ingest(report),
      ResponseContent::Dedup(report) => print_dedup(report),
      ResponseContent::Triage(report) => print_triage(report),
      ResponseContent::Success(message) =>
        println!("{} {message}", style(SUCCESS_PREFIX).green()),
      ResponseContent::Working(message) =>
        println!("{} {message}", style(WORKING_PREFIX).cyan()),
      ResponseContent::Info(message) => println!("{} {message}", style(INFO_PREFIX).blue()),
    }
    Ok(())
  }
}

/// Prints one entry as a provenance header plus indented block lines.
fn print_entry(stored: &StoredEntry, last: bool) {
  let prefix = if last { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
  println!(
    "{prefix} {} / {} [{}] (updated {})",
    style(&stored.journal).cyan(),
    style(&stored.file).cyan(),
    stored.position,
    stored.updated_at.format("%Y-%m-%d %H:%M")
  );
  let continuation = if last { "   " } else { CONTINUE_PREFIX };
  for line in stored.entry.to_string().lines() {
    println!("{continuation}{line}");
  }
}

/// Prints the ingest accounting, flagging any shortfall.
fn print_ingest(report: &IngestReport) {
  println!(
    "{} Ingest into {} / {}:",
    style(INFO_PREFIX).blue(),
    style(&report.journal).cyan(),
    style(&report.file).cyan()
  );
  println!("{ITEM_PREFIX} received:   {}", report.received);
  println!("{ITEM_PREFIX} stored:     {}", style(report.stored).green());
  println!("{ITEM_PREFIX} duplicates: {}", report.duplicate_count());
  println!(
    "{LAST_ITEM_PREFIX} dropped:    {} (chunks failed: {}, no email: {}, unparseable: {}, no \
     key: {})",
    report.shortfall(),
    report.failed_chunks,
    report.dropped_no_email,
    report.invalid,
    report.skipped
  );

  for (key, hits) in &report.duplicates {
    for hit in hits {
      println!(
        "{} duplicate of {}: {}",
        style(WARNING_PREFIX).yellow(),
        style(&hit.existing).cyan(),
        key
      );
    }
  }

  if report.shortfall() > 0 {
    println!(
      "{} {} block(s) were dropped along the way; review the input before retrying",
      style(WARNING_PREFIX).yellow(),
      report.shortfall()
    );
  }
}

/// Prints a dedup sweep report, group by group.
fn print_dedup(report: &DedupReport) {
  if report.is_clean() {
    println!("{} No duplicates found", style(SUCCESS_PREFIX).green());
    return;
  }

  println!(
    "{} {} duplicate group(s), {} entr(ies) removed:",
    style(INFO_PREFIX).blue(),
    report.groups.len(),
    report.removed_count()
  );
  for group in &report.groups {
    println!("{ITEM_PREFIX} {}", style(&group.key).cyan());
    println!("{CONTINUE_PREFIX}kept   {} / {}", group.kept.journal, group.kept.file);
    for removed in &group.removed {
      println!("{CONTINUE_PREFIX}removed {} / {}", removed.journal, removed.file);
    }
  }
}

/// Prints a triage report: flagged blocks with their reasons.
fn print_triage(report: &TriageReport) {
  let flagged = report.flagged_count();
  println!(
    "{} {} block(s) triaged, {} flagged",
    style(INFO_PREFIX).blue(),
    report.blocks.len(),
    flagged
  );

  for block in report.flagged() {
    let mut reasons = Vec::new();
    if block.missing_email {
      reasons.push("missing email");
    }
    if block.missing_country {
      reasons.push("missing country");
    }
    println!("{} {}", style(WARNING_PREFIX).yellow(), reasons.join(", "));
    for line in block.text.lines() {
      println!("{CONTINUE_PREFIX}{line}");
    }
  }
}
