//! Local, no-service triage of pasted contact blocks.
//!
//! Before blocks are sent anywhere, office staff run a quick local pass over
//! them: prepend the honorific to the name line, optionally insert a greeting
//! line after the email, and flag blocks that are missing an email address or
//! a country. Flagged blocks go back to the operator for completion; clean
//! blocks are ready for ingest or export.
//!
//! This pass is pure text manipulation with no store or network access.
//!
//! # Examples
//!
//! ```
//! use rolodex::triage::{triage, TriageOptions};
//!
//! let blocks = vec!["Jane Doe\nExample University\nCanada\njd@y.edu".to_string()];
//! let report = triage(&blocks, &TriageOptions::default());
//!
//! assert_eq!(report.flagged_count(), 0);
//! assert!(report.blocks[0].text.starts_with("Professor Jane Doe"));
//! ```

use super::*;

/// Whether a blank line separates the email from the inserted greeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GreetingGap {
  /// Greeting directly after the email line
  None,
  /// One blank line between the email and the greeting
  #[default]
  Blank,
}

/// Options controlling the triage pass.
#[derive(Debug, Clone, Default)]
pub struct TriageOptions {
  /// Insert a `Dear Professor <surname>,` line after the email line
  pub greeting: bool,
  /// Spacing between the email line and the greeting
  pub gap:      GreetingGap,
}

/// One triaged block with its completeness flags.
#[derive(Debug, Clone)]
pub struct TriagedBlock {
  /// The block text after honorific and greeting handling
  pub text:            String,
  /// No line of the block contains an email address
  pub missing_email:   bool,
  /// The block mentions no recognized country
  pub missing_country: bool,
}

impl TriagedBlock {
  /// A block with neither flag set, ready for ingest or export.
  pub fn is_clean(&self) -> bool { !self.missing_email && !self.missing_country }
}

/// Result of triaging a batch of blocks, order-preserving.
#[derive(Debug, Clone, Default)]
pub struct TriageReport {
  /// All triaged blocks in input order
  pub blocks: Vec<TriagedBlock>,
}

impl TriageReport {
  /// Blocks with no flags, in input order.
  pub fn clean(&self) -> impl Iterator<Item = &TriagedBlock> {
    self.blocks.iter().filter(|b| b.is_clean())
  }

  /// Blocks flagged for operator attention, in input order.
  pub fn flagged(&self) -> impl Iterator<Item = &TriagedBlock> {
    self.blocks.iter().filter(|b| !b.is_clean())
  }

  /// Number of flagged blocks.
  pub fn flagged_count(&self) -> usize { self.flagged().count() }
}

/// Runs the triage pass over a batch of blocks.
///
/// For each block: prepends [`HONORIFIC`] to the first line when absent,
/// optionally inserts a greeting after the first email-bearing line, then
/// flags the block when no line carries an email address or no recognized
/// country appears anywhere in it.
pub fn triage(blocks: &[String], options: &TriageOptions) -> TriageReport {
  TriageReport { blocks: blocks.iter().map(|block| triage_block(block, options)).collect() }
}

/// Triage of a single block; see [`triage`].
fn triage_block(block: &str, options: &TriageOptions) -> TriagedBlock {
  let mut lines: Vec<String> =
    block.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect();

  if let Some(first) = lines.first_mut() {
    if !first.starts_with(HONORIFIC) {
      *first = format!("{HONORIFIC} {first}");
    }
  }

  if options.greeting {
    insert_greeting(&mut lines, options.gap);
  }

  let text = lines.join("\n");
  let missing_email = !EMAIL_RE.is_match(&text);
  let missing_country = !contains_known_country(&text);

  TriagedBlock { text, missing_email, missing_country }
}

/// Inserts `Dear Professor <surname>,` after the first email-bearing line.
///
/// The surname is the last whitespace-separated word of the name line. Blocks
/// with no email line are left untouched; the missing-email flag covers them.
fn insert_greeting(lines: &mut Vec<String>, gap: GreetingGap) {
  let Some(surname) = lines.first().and_then(|name| name.split_whitespace().last()) else {
    return;
  };
  let greeting = format!("Dear {HONORIFIC} {surname},");

  if let Some(position) = lines.iter().position(|line| EMAIL_RE.is_match(line)) {
    match gap {
      GreetingGap::None => lines.insert(position + 1, greeting),
      GreetingGap::Blank => {
        lines.insert(position + 1, String::new());
        lines.insert(position + 2, greeting);
      },
    }
  }
}
