//! Core contact-entry types and the flat text format.
//!
//! This module provides the fundamental types for working with author contact
//! blocks. It handles:
//!
//! - Splitting pasted or uploaded text into discrete blocks
//! - The canonical entry shape (name, department, institution, country, email)
//! - Author-key derivation for corpus-wide duplicate detection
//!
//! A block is the unit operators paste and copy: up to five lines separated by
//! single newlines, with blocks separated from each other by a blank line. The
//! blank-line-joined string form is only a serialization format; the primary
//! representation is the [`Entry`] record.
//!
//! # Examples
//!
//! ```
//! use rolodex::entry::{parse_blocks, Entry};
//!
//! let text = "Professor Jane Doe\nDept. of Mathematics\nExample University\nCanada\njdoe@example.edu";
//! let entry = Entry::from_block(text)?;
//! assert_eq!(entry.country.as_deref(), Some("Canada"));
//! assert_eq!(entry.to_string(), text);
//!
//! let blocks = parse_blocks("one\nblock\n\n\nanother\nblock\n");
//! assert_eq!(blocks.len(), 2);
//! # Ok::<(), rolodex::error::RolodexError>(())
//! ```

use super::*;

/// Title token prepended to author names in outgoing material.
///
/// The token is fixed rather than configurable: author keys strip it before
/// comparison, so two deployments configured with different tokens would
/// derive different keys for the same corpus.
pub const HONORIFIC: &str = "Professor";

lazy_static! {
  /// Matches an email address anywhere in a line.
  pub(crate) static ref EMAIL_RE: Regex =
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();

  /// One-or-more blank lines, the separator between serialized blocks.
  static ref BLANK_LINES_RE: Regex = Regex::new(r"\n\s*\n").unwrap();
}

/// Countries recognized when deciding whether a line names a country and when
/// triaging blocks for a missing country.
pub static COUNTRIES: &[&str] = &[
  "Algeria",
  "Argentina",
  "Australia",
  "Austria",
  "Bangladesh",
  "Belgium",
  "Brazil",
  "Bulgaria",
  "Canada",
  "Chile",
  "China",
  "Colombia",
  "Croatia",
  "Czech Republic",
  "Denmark",
  "Egypt",
  "Ethiopia",
  "Finland",
  "France",
  "Germany",
  "Ghana",
  "Greece",
  "Hungary",
  "India",
  "Indonesia",
  "Iran",
  "Iraq",
  "Ireland",
  "Israel",
  "Italy",
  "Japan",
  "Jordan",
  "Kenya",
  "Kuwait",
  "Lebanon",
  "Libya",
  "Malaysia",
  "Mexico",
  "Morocco",
  "Netherlands",
  "New Zealand",
  "Nigeria",
  "Norway",
  "Oman",
  "Pakistan",
  "Peru",
  "Philippines",
  "Poland",
  "Portugal",
  "Qatar",
  "Romania",
  "Russia",
  "Saudi Arabia",
  "Serbia",
  "Singapore",
  "Slovakia",
  "Slovenia",
  "South Africa",
  "South Korea",
  "Spain",
  "Sri Lanka",
  "Sweden",
  "Switzerland",
  "Taiwan",
  "Thailand",
  "Tunisia",
  "Turkey",
  "Ukraine",
  "United Arab Emirates",
  "United Kingdom",
  "United States",
  "USA",
  "Vietnam",
  "Yemen",
];

/// Returns true if the line names a recognized country.
pub fn is_known_country(line: &str) -> bool {
  let line = line.trim();
  COUNTRIES.iter().any(|c| line.eq_ignore_ascii_case(c))
}

/// Returns true if the text mentions a recognized country anywhere.
///
/// Matching is a case-sensitive substring check, so a lowercased country name
/// buried in an email address does not count.
pub fn contains_known_country(text: &str) -> bool {
  COUNTRIES.iter().any(|c| text.contains(c))
}

/// Splits raw pasted or uploaded text into discrete blocks.
///
/// Line endings are normalized to `\n`, the text is split on one-or-more
/// blank lines, each segment is trimmed, and segments that are empty after
/// trimming are discarded. Order is preserved. Empty input yields an empty
/// list; there are no error conditions.
///
/// # Examples
///
/// ```
/// let blocks = rolodex::entry::parse_blocks("a\r\nb\r\n\r\nc\n\n\n");
/// assert_eq!(blocks, vec!["a\nb".to_string(), "c".to_string()]);
/// ```
pub fn parse_blocks(raw: &str) -> Vec<String> {
  let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
  BLANK_LINES_RE
    .split(&normalized)
    .map(str::trim)
    .filter(|segment| !segment.is_empty())
    .map(String::from)
    .collect()
}

/// Serializes blocks back to the flat text format.
///
/// Blocks are joined with exactly one blank line, the inverse of
/// [`parse_blocks`]: `parse_blocks(&join_blocks(&blocks)) == blocks` for any
/// list of non-empty blocks with no leading or trailing whitespace.
pub fn join_blocks(blocks: &[String]) -> String { blocks.join("\n\n") }

/// Decodes uploaded bytes as UTF-8 with a Latin-1 fallback.
///
/// Office exports are occasionally Latin-1 encoded; when the bytes are not
/// valid UTF-8, each byte is decoded as its Latin-1 code point instead of
/// being replaced with U+FFFD.
pub fn read_text_lossy(bytes: &[u8]) -> String {
  match std::str::from_utf8(bytes) {
    Ok(text) => text.to_owned(),
    Err(_) => bytes.iter().map(|&b| b as char).collect(),
  }
}

/// Corpus-wide identity of an author contact.
///
/// An author key is `lower(name) + "_" + lower(email)`, where `name` is the
/// block's first line with the [`HONORIFIC`] token stripped and `email` is
/// the last non-empty line. Two entries with the same key anywhere in the
/// store are duplicates regardless of which journal or file holds them.
///
/// Extraction is deliberately permissive: the last line is taken as the email
/// without checking for `@`. Email validation is the reformatter's
/// responsibility, not this layer's.
///
/// # Examples
///
/// ```
/// use rolodex::entry::AuthorKey;
///
/// let a = AuthorKey::extract("Professor Jane Doe\njdoe@example.edu").unwrap();
/// let b = AuthorKey::extract("JANE DOE\nJDOE@EXAMPLE.EDU").unwrap();
/// assert_eq!(a, b);
///
/// assert!(AuthorKey::extract("only one line").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuthorKey(String);

impl AuthorKey {
  /// Derives a key from a name line and an email line.
  ///
  /// Returns `None` when either part is empty once the honorific is stripped
  /// and whitespace trimmed; such an entry cannot participate in duplicate
  /// detection.
  pub fn from_parts(name: &str, email: &str) -> Option<Self> {
    let name = name.trim().strip_prefix(HONORIFIC).unwrap_or(name).trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() {
      return None;
    }
    Some(Self(format!("{}_{}", name.to_lowercase(), email.to_lowercase())))
  }

  /// Derives a key from a raw block.
  ///
  /// Splits the block into non-empty lines; blocks with fewer than two such
  /// lines have no key and must be skipped by callers doing duplicate
  /// detection.
  pub fn extract(block: &str) -> Option<Self> {
    let lines: Vec<&str> = block.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.len() < 2 {
      return None;
    }
    Self::from_parts(lines[0], lines[lines.len() - 1])
  }

  /// The key's canonical string form, as persisted in the key index.
  pub fn as_str(&self) -> &str { &self.0 }
}

impl Display for AuthorKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl From<AuthorKey> for String {
  fn from(key: AuthorKey) -> Self { key.0 }
}

impl FromStr for AuthorKey {
  type Err = RolodexError;

  /// Reconstructs a key from its persisted string form.
  fn from_str(s: &str) -> Result<Self> {
    if s.is_empty() {
      return Err(RolodexError::InvalidEntry("empty author key".into()));
    }
    Ok(Self(s.to_owned()))
  }
}

/// Canonical representation of one author's contact block.
///
/// This struct is the core data type for contact management. The canonical
/// serialized form is up to five non-empty lines, in order: name, department
/// (optional), institution, country (optional), email. The final line always
/// contains `@`.
///
/// # Examples
///
/// ```
/// use rolodex::entry::Entry;
///
/// let entry = Entry {
///   name:        "Professor Jane Doe".to_string(),
///   department:  None,
///   institution: "Example University".to_string(),
///   country:     Some("Canada".to_string()),
///   email:       "jdoe@example.edu".to_string(),
/// };
/// assert_eq!(entry.to_string(), "Professor Jane Doe\nExample University\nCanada\njdoe@example.edu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
  /// The author's display name, honorific included when present
  pub name:        String,
  /// Department within the institution, when known
  pub department:  Option<String>,
  /// University or institution
  pub institution: String,
  /// Country, when known
  pub country:     Option<String>,
  /// Contact email, always containing `@`
  pub email:       String,
}

impl Entry {
  /// Parses a canonical block into an [`Entry`].
  ///
  /// The block must contain three to five non-empty lines and end in a line
  /// containing `@`. Middle lines are assigned by count: with three, they are
  /// department, institution, and country in order; with one, it is the
  /// institution. With two, the second middle line is taken as a country when
  /// it names a recognized one, otherwise the pair is department and
  /// institution.
  ///
  /// # Errors
  ///
  /// Returns [`RolodexError::InvalidEntry`] describing the first problem
  /// found: wrong line count, missing `@` in the final line, or an empty name
  /// once the honorific is stripped.
  pub fn from_block(block: &str) -> Result<Self> {
    let lines: Vec<&str> = block.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    if lines.len() < 3 {
      return Err(RolodexError::InvalidEntry(format!(
        "expected at least 3 lines (name, institution, email), got {}",
        lines.len()
      )));
    }
    if lines.len() > 5 {
      return Err(RolodexError::InvalidEntry(format!(
        "expected at most 5 lines, got {}",
        lines.len()
      )));
    }

    let email = lines[lines.len() - 1];
    if !email.contains('@') {
      return Err(RolodexError::InvalidEntry(format!("last line is not an email: \"{email}\"")));
    }

    let name = lines[0];
    if name.strip_prefix(HONORIFIC).unwrap_or(name).trim().is_empty() {
      return Err(RolodexError::InvalidEntry("missing author name".into()));
    }

    let middle = &lines[1..lines.len() - 1];
    let (department, institution, country) = match middle {
      [institution] => (None, *institution, None),
      [first, second] =>
        if is_known_country(second) {
          (None, *first, Some(*second))
        } else {
          (Some(*first), *second, None)
        },
      [department, institution, country] => (Some(*department), *institution, Some(*country)),
      _ => unreachable!("line count bounded above"),
    };

    Ok(Self {
      name:        name.to_owned(),
      department:  department.map(str::to_owned),
      institution: institution.to_owned(),
      country:     country.map(str::to_owned),
      email:       email.to_owned(),
    })
  }

  /// The entry's corpus-wide identity.
  ///
  /// `Some` for every entry produced by [`Entry::from_block`]; `None` only
  /// for hand-constructed entries whose name is empty once the honorific is
  /// stripped. Such entries cannot participate in duplicate detection.
  pub fn key(&self) -> Option<AuthorKey> { AuthorKey::from_parts(&self.name, &self.email) }

  /// The display name with the honorific prepended when absent.
  pub fn titled_name(&self) -> String {
    if self.name.starts_with(HONORIFIC) {
      self.name.clone()
    } else {
      format!("{HONORIFIC} {}", self.name)
    }
  }
}

impl Display for Entry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name)?;
    if let Some(department) = &self.department {
      write!(f, "\n{department}")?;
    }
    write!(f, "\n{}", self.institution)?;
    if let Some(country) = &self.country {
      write!(f, "\n{country}")?;
    }
    write!(f, "\n{}", self.email)
  }
}

impl FromStr for Entry {
  type Err = RolodexError;

  fn from_str(s: &str) -> Result<Self> { Self::from_block(s) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_blocks_round_trip() {
    let blocks =
      vec!["Jane Doe\njd@y.edu".to_string(), "John Smith\nUniv\njs@x.edu".to_string()];
    assert_eq!(parse_blocks(&join_blocks(&blocks)), blocks);
  }

  #[test]
  fn test_parse_blocks_collapses_blank_runs() {
    let blocks = parse_blocks("a\n\n\n  \n\nb\r\n\r\nc");
    assert_eq!(blocks, vec!["a", "b", "c"]);
  }

  #[test]
  fn test_parse_blocks_empty_input() {
    assert!(parse_blocks("").is_empty());
    assert!(parse_blocks(" \n \n ").is_empty());
  }

  #[test]
  fn test_key_case_insensitive_and_stable() {
    let a = AuthorKey::extract("Professor John Smith\njs@x.edu").unwrap();
    let b = AuthorKey::extract("JOHN SMITH\nJS@X.EDU").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "john smith_js@x.edu");
    // Stability: same input, same key.
    assert_eq!(a, AuthorKey::extract("Professor John Smith\njs@x.edu").unwrap());
  }

  #[test]
  fn test_key_requires_two_lines() {
    assert!(AuthorKey::extract("Name2 (no email)").is_none());
    assert!(AuthorKey::extract("").is_none());
  }

  #[test]
  fn test_key_is_permissive_about_email_shape() {
    // No `@` check at this layer; validation belongs to the reformatter.
    let key = AuthorKey::extract("Jane Doe\nnot-an-email").unwrap();
    assert_eq!(key.as_str(), "jane doe_not-an-email");
  }

  #[test]
  fn test_from_block_five_lines() {
    let entry =
      Entry::from_block("Professor Jane Doe\nMathematics\nExample University\nCanada\njd@y.edu")
        .unwrap();
    assert_eq!(entry.department.as_deref(), Some("Mathematics"));
    assert_eq!(entry.country.as_deref(), Some("Canada"));
  }

  #[test]
  fn test_from_block_four_lines_country() {
    let entry = Entry::from_block("Jane Doe\nExample University\nJapan\njd@y.edu").unwrap();
    assert_eq!(entry.department, None);
    assert_eq!(entry.country.as_deref(), Some("Japan"));
  }

  #[test]
  fn test_from_block_four_lines_department() {
    let entry = Entry::from_block("Jane Doe\nMathematics\nExample University\njd@y.edu").unwrap();
    assert_eq!(entry.department.as_deref(), Some("Mathematics"));
    assert_eq!(entry.country, None);
  }

  #[test]
  fn test_from_block_rejects_missing_email() {
    let err = Entry::from_block("Jane Doe\nExample University\nCanada").unwrap_err();
    assert!(matches!(err, RolodexError::InvalidEntry(_)));
  }

  #[test]
  fn test_display_round_trips() {
    let block = "Professor Jane Doe\nMathematics\nExample University\nCanada\njd@y.edu";
    assert_eq!(Entry::from_block(block).unwrap().to_string(), block);
  }

  #[test]
  fn test_titled_name() {
    let entry = Entry::from_block("Jane Doe\nExample University\njd@y.edu").unwrap();
    assert_eq!(entry.titled_name(), "Professor Jane Doe");
    let entry = Entry::from_block("Professor Jane Doe\nExample University\njd@y.edu").unwrap();
    assert_eq!(entry.titled_name(), "Professor Jane Doe");
  }

  #[test]
  fn test_read_text_lossy_latin1_fallback() {
    // "Université" with a Latin-1 encoded é.
    let bytes = b"Universit\xe9";
    assert_eq!(read_text_lossy(bytes), "Université");
    assert_eq!(read_text_lossy("Université".as_bytes()), "Université");
  }
}
