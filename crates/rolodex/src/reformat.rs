//! Reformatting of raw contact blocks through an external transform service.
//!
//! This module owns the one network collaborator in the system: a hosted
//! generative-text service (Gemini-shaped) that rewrites free-form contact
//! blocks into the canonical shape. The service is treated as an opaque,
//! potentially-failing text transform behind the [`TextTransform`] trait, so
//! tests and offline flows can substitute their own implementation.
//!
//! The [`Reformatter`] layers the batch mechanics on top:
//!
//! - configurable regex removal patterns applied before splitting
//! - chunking into fixed-size batches, one service call per chunk,
//!   sequentially and in order
//! - per-chunk outcomes as explicit values rather than exceptions: a failed
//!   chunk contributes nothing and the remaining chunks continue
//! - a post-pass dropping any block whose last line lacks `@` (this layer
//!   owns the email invariant)
//! - incremental progress reporting through a caller-supplied sink
//!
//! # Examples
//!
//! ```no_run
//! use rolodex::reformat::{GeminiClient, Model, Reformatter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()
//!   .with_host("https://generativelanguage.googleapis.com")
//!   .with_api_key("...")
//!   .with_model(Model::Gemini20Flash);
//!
//! let outcome = Reformatter::new()
//!   .reformat(&client, "jane doe, example univ, canada — jd@y.edu", |_| {})
//!   .await;
//! println!("{} blocks, {} failed chunks", outcome.blocks.len(), outcome.failed_chunks());
//! # Ok(())
//! # }
//! ```

use std::time::{Duration, Instant};

use super::*;

/// Instructional template sent ahead of every chunk.
const INSTRUCTION: &str = "Rewrite every contact block below into at most five lines, in order: \
                           name, department (omit the line if unknown), university or \
                           institution, country, email address. Keep exactly one blank line \
                           between blocks and output nothing except the rewritten blocks.";

/// Fallback endpoint when no host is configured.
const DEFAULT_HOST: &str = "https://generativelanguage.googleapis.com";

/// An opaque text-in, text-out transformation.
///
/// Implementors rewrite a block of text into blank-line-separated canonical
/// entries. The production implementation is [`GeminiClient`]; tests use
/// local fakes. A failure is a per-call error with no retry obligation on
/// either side.
#[async_trait]
pub trait TextTransform: Send + Sync {
  /// Rewrites `text`, returning the transformed text.
  async fn transform(&self, text: &str) -> Result<String>;
}

/// Available models for the hosted transform service.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum Model {
  /// Fast, inexpensive tier
  #[serde(rename = "gemini-1.5-flash")]
  Gemini15Flash,
  /// Current default tier
  #[serde(rename = "gemini-2.0-flash")]
  Gemini20Flash,
}

impl Display for Model {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Model::Gemini15Flash => write!(f, "gemini-1.5-flash"),
      Model::Gemini20Flash => write!(f, "gemini-2.0-flash"),
    }
  }
}

/// One message part in the service wire format.
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
  /// Text payload of the part
  pub text: String,
}

/// A role-tagged message in the service wire format.
#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
  /// "user" for requests, "model" for responses
  #[serde(default)]
  pub role:  String,
  /// Ordered message parts
  pub parts: Vec<Part>,
}

/// Generation parameters for the transform service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
  /// Sampling temperature; low values keep the rewrite literal
  temperature:       f64,
  /// Top-p (nucleus) sampling parameter
  top_p:             f64,
  /// Maximum number of tokens to generate
  max_output_tokens: u64,
}

impl Default for GenerationConfig {
  fn default() -> Self { Self { temperature: 0.2, top_p: 0.95, max_output_tokens: 8192 } }
}

/// Request body for a `generateContent` call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
  contents:          Vec<Content>,
  generation_config: &'a GenerationConfig,
}

/// One response candidate.
#[derive(Debug, Deserialize)]
pub struct Candidate {
  /// The candidate's message content
  pub content: Content,
}

/// Response structure from the transform service.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
  /// Generated candidates; the first one is used
  #[serde(default)]
  pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
  /// Concatenated text of the first candidate.
  ///
  /// # Errors
  ///
  /// Returns [`RolodexError::TransformFailed`] when the response carries no
  /// candidates, which the service uses to signal refusals and overload.
  pub fn text(&self) -> Result<String> {
    let candidate = self
      .candidates
      .first()
      .ok_or_else(|| RolodexError::TransformFailed("response contained no candidates".into()))?;
    Ok(candidate.content.parts.iter().map(|p| p.text.as_str()).collect())
  }
}

/// Client for the hosted transform service.
///
/// Provides a fluent interface for configuring the endpoint, credentials,
/// model, and generation parameters, and implements [`TextTransform`] by
/// posting a `generateContent` request per call.
///
/// # Examples
///
/// ```no_run
/// # use rolodex::reformat::{GeminiClient, Model};
/// let client = GeminiClient::new()
///   .with_host("https://generativelanguage.googleapis.com")
///   .with_api_key("...")
///   .with_model(Model::Gemini15Flash);
/// ```
#[derive(Debug, Default)]
pub struct GeminiClient {
  /// Base URL of the service. If not specified, the public endpoint is used
  /// with a warning.
  url:     Option<Url>,
  /// API key sent with each request. Requests without one are attempted and
  /// rejected by the service.
  api_key: Option<String>,
  /// The model to use. Must be set before sending.
  model:   Option<Model>,
  /// Generation parameters, with literal-rewrite defaults.
  config:  GenerationConfig,
}

impl GeminiClient {
  /// Creates a new client with builder-style API and default settings.
  pub fn new() -> Self { Self::default() }

  /// Sets the base URL of the service.
  pub fn with_host(mut self, host: &str) -> Self {
    self.url = Url::parse(host).ok();
    self
  }

  /// Sets the API key sent with each request.
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  /// Sets the model to use.
  pub fn with_model(mut self, model: Model) -> Self {
    self.model.replace(model);
    self
  }

  /// Overrides the sampling temperature.
  pub fn with_temperature(mut self, temperature: f64) -> Self {
    self.config.temperature = temperature;
    self
  }

  /// Sends one `generateContent` request.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - No model is specified
  /// - The input text is empty
  /// - The network request fails
  /// - The response cannot be parsed
  pub async fn send(&self, text: &str) -> Result<GenerateResponse> {
    let Some(model) = self.model else {
      return Err(RolodexError::TransformMissingModel);
    };
    if text.trim().is_empty() {
      return Err(RolodexError::TransformMissingInput);
    }

    let base = self.url.clone().unwrap_or_else(|| {
      warn!("No host set, using the public endpoint");
      Url::parse(DEFAULT_HOST).expect("default host parses")
    });
    let url = base
      .join(&format!("/v1beta/models/{model}:generateContent"))
      .map_err(|e| RolodexError::Config(format!("Bad service URL: {e}")))?;

    let body = GenerateRequest {
      contents:          vec![Content {
        role:  "user".to_string(),
        parts: vec![Part { text: text.to_string() }],
      }],
      generation_config: &self.config,
    };

    let client = reqwest::Client::new();
    let mut request = client.post(url).json(&body);
    if let Some(api_key) = &self.api_key {
      request = request.header("x-goog-api-key", api_key);
    } else {
      warn!("No API key set, the service will likely reject the request");
    }

    let response = request.send().await?;
    if !response.status().is_success() {
      return Err(RolodexError::TransformFailed(format!(
        "{}: {}",
        response.status(),
        response.text().await.unwrap_or_default()
      )));
    }
    Ok(response.json().await?)
  }
}

#[async_trait]
impl TextTransform for GeminiClient {
  async fn transform(&self, text: &str) -> Result<String> { self.send(text).await?.text() }
}

/// A worked input/output example appended to the instruction template.
#[derive(Debug, Clone, Deserialize)]
pub struct ShotExample {
  /// Raw text as an operator would paste it
  pub input:  String,
  /// The same text in canonical shape
  pub output: String,
}

/// Configuration for the [`Reformatter`].
///
/// Deserializable from TOML:
///
/// ```toml
/// chunk_size = 50
/// patterns = ["\\[\\d+\\]", "page \\d+ of \\d+"]
///
/// [example]
/// input = "jane doe (example univ, canada) jd@y.edu"
/// output = "Jane Doe\nExample University\nCanada\njd@y.edu"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ReformatConfig {
  /// Ordered removal patterns applied before splitting, case-insensitive
  #[serde(default, deserialize_with = "deserialize_patterns")]
  pub patterns:   Vec<Regex>,
  /// Entries per service call
  #[serde(default = "default_chunk_size")]
  pub chunk_size: usize,
  /// Optional worked example appended to the instruction
  #[serde(default)]
  pub example:    Option<ShotExample>,
}

/// Default number of entries per service call.
fn default_chunk_size() -> usize { 50 }

impl Default for ReformatConfig {
  fn default() -> Self {
    Self { patterns: Vec::new(), chunk_size: default_chunk_size(), example: None }
  }
}

/// Custom deserializer compiling removal patterns case-insensitively.
fn deserialize_patterns<'de, D>(deserializer: D) -> std::result::Result<Vec<Regex>, D::Error>
where D: serde::Deserializer<'de> {
  let raw: Vec<String> = Vec::deserialize(deserializer)?;
  raw
    .into_iter()
    .map(|p| {
      regex::RegexBuilder::new(&p).case_insensitive(true).build().map_err(serde::de::Error::custom)
    })
    .collect()
}

/// Progress of a reformat run, reported once per chunk.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
  /// Chunks finished so far, successful or not
  pub completed: usize,
  /// Total chunks in this run
  pub total:     usize,
  /// Estimated time remaining, absent until one chunk has finished
  pub remaining: Option<Duration>,
}

/// Outcome of one chunk's service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
  /// The service call succeeded
  Completed {
    /// Number of blocks the chunk's response split into
    produced: usize,
  },
  /// The service call failed; the chunk contributed nothing
  Failed {
    /// The failure, rendered for the operator
    reason: String,
  },
}

/// Result of a reformat run.
///
/// Chunk failures are values here, not errors: a run "succeeds" even when it
/// under-delivers, and callers are expected to compare the output count with
/// the input count and surface the difference to the operator.
#[derive(Debug, Clone, Default)]
pub struct ReformatOutcome {
  /// Canonical blocks, in batch order across successful chunks
  pub blocks:           Vec<String>,
  /// Per-chunk outcomes, in chunk order
  pub chunks:           Vec<ChunkOutcome>,
  /// Blocks discarded by the email post-pass
  pub dropped_no_email: usize,
}

impl ReformatOutcome {
  /// Number of chunks that failed.
  pub fn failed_chunks(&self) -> usize {
    self.chunks.iter().filter(|c| matches!(c, ChunkOutcome::Failed { .. })).count()
  }
}

/// Batched reformatting of raw blocks through a [`TextTransform`].
#[derive(Debug, Clone, Default)]
pub struct Reformatter {
  /// Cleaning, chunking, and example configuration
  config: ReformatConfig,
}

impl Reformatter {
  /// Creates a reformatter with default configuration.
  pub fn new() -> Self { Self::default() }

  /// Creates a reformatter from an existing configuration.
  pub fn with_config(config: ReformatConfig) -> Self { Self { config } }

  /// Creates a reformatter from a TOML configuration string.
  pub fn with_config_str(toml_str: &str) -> Result<Self> {
    Ok(Self { config: toml::from_str(toml_str)? })
  }

  /// Creates a reformatter from a TOML configuration file.
  pub fn with_config_file(path: impl AsRef<Path>) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    Self::with_config_str(&content)
  }

  /// Applies the removal patterns and renormalizes block structure.
  ///
  /// Patterns are applied in order across the full text, then each block's
  /// lines are trimmed and emptied lines dropped, so removals cannot leave
  /// stray blank lines inside a block.
  fn clean(&self, raw: &str) -> Vec<String> {
    let mut text = raw.to_string();
    for pattern in &self.config.patterns {
      text = pattern.replace_all(&text, "").into_owned();
    }
    parse_blocks(&text)
      .into_iter()
      .map(|block| {
        block.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join("\n")
      })
      .collect()
  }

  /// Assembles the prompt for one chunk.
  fn prompt(&self, chunk: &str) -> String {
    match &self.config.example {
      Some(example) => format!(
        "{INSTRUCTION}\n\nExample input:\n{}\n\nExample output:\n{}\n\n{chunk}",
        example.input, example.output
      ),
      None => format!("{INSTRUCTION}\n\n{chunk}"),
    }
  }

  /// Reformats raw text into canonical blocks.
  ///
  /// The cleaned blocks are split into consecutive chunks of at most
  /// `chunk_size`, each sent through `service` in order. A chunk failure is
  /// logged, recorded as a [`ChunkOutcome::Failed`], and skipped; remaining
  /// chunks still run, so the output can silently be a subset of the input.
  /// After all chunks, any block whose last line does not contain `@` is
  /// dropped and counted.
  ///
  /// `progress` is called after each chunk with counts and an estimate of
  /// the time remaining; it is purely observational.
  pub async fn reformat(
    &self,
    service: &dyn TextTransform,
    raw: &str,
    mut progress: impl FnMut(Progress),
  ) -> ReformatOutcome {
    let cleaned = self.clean(raw);
    let chunks: Vec<&[String]> = cleaned.chunks(self.config.chunk_size.max(1)).collect();
    let total = chunks.len();
    let started = Instant::now();

    let mut outcome = ReformatOutcome::default();
    for (index, chunk) in chunks.into_iter().enumerate() {
      let prompt = self.prompt(&join_blocks(chunk));
      match service.transform(&prompt).await {
        Ok(text) => {
          let produced = parse_blocks(&text);
          debug!(chunk = index, produced = produced.len(), "chunk reformatted");
          outcome.chunks.push(ChunkOutcome::Completed { produced: produced.len() });
          outcome.blocks.extend(produced);
        },
        Err(e) => {
          warn!(chunk = index, error = %e, "transform failed, dropping chunk output");
          outcome.chunks.push(ChunkOutcome::Failed { reason: e.to_string() });
        },
      }

      let completed = index + 1;
      let remaining = (completed < total)
        .then(|| started.elapsed().div_f64(completed as f64).mul_f64((total - completed) as f64));
      progress(Progress { completed, total, remaining });
    }

    let before = outcome.blocks.len();
    outcome.blocks.retain(|block| {
      block.lines().rev().find(|l| !l.trim().is_empty()).is_some_and(|last| last.contains('@'))
    });
    outcome.dropped_no_email = before - outcome.blocks.len();
    if outcome.dropped_no_email > 0 {
      warn!(dropped = outcome.dropped_no_email, "dropped blocks without an email line");
    }

    outcome
  }
}
