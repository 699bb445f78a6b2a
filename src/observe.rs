//! Hooks for watching a scan as it happens.
//!
//! The scanner reports what it's doing through a [`ScanObserver`]. The default
//! one, [`TracingObserver`], turns each report into a `tracing` event. Tests
//! (or a UI that wants to show "decoded as ISO-8859-1") can pass their own.

use crate::{
  decode::{Base64Outcome, DecodeAttempt},
  png::RawChunk,
};

/// Receives progress reports from a scan.
///
/// Every method has an empty default, implement only the ones you care about.
pub trait ScanObserver {
  /// A chunk was read.
  fn chunk(&self, chunk: &RawChunk<'_>) {
    let _ = chunk;
  }

  /// A `tEXt` chunk had no separator and was skipped.
  fn malformed_text(&self, offset: usize) {
    let _ = offset;
  }

  /// A text keyword didn't match and was skipped.
  fn keyword_skipped(&self, keyword: &str) {
    let _ = keyword;
  }

  /// A text keyword matched, its value is about to be decoded.
  fn candidate(&self, keyword: &str) {
    let _ = keyword;
  }

  /// The text decode cascade picked an attempt.
  fn text_decoded(&self, attempt: &DecodeAttempt<'_>) {
    let _ = attempt;
  }

  /// What the Base64 stage did with the text.
  fn base64(&self, outcome: Base64Outcome) {
    let _ = outcome;
  }

  /// The first JSON parse failed and the cleaned up text is being tried.
  fn json_retry(&self, error: &serde_json::Error) {
    let _ = error;
  }
}

impl<T: ScanObserver + ?Sized> ScanObserver for &'_ T {
  fn chunk(&self, chunk: &RawChunk<'_>) {
    (**self).chunk(chunk)
  }
  fn malformed_text(&self, offset: usize) {
    (**self).malformed_text(offset)
  }
  fn keyword_skipped(&self, keyword: &str) {
    (**self).keyword_skipped(keyword)
  }
  fn candidate(&self, keyword: &str) {
    (**self).candidate(keyword)
  }
  fn text_decoded(&self, attempt: &DecodeAttempt<'_>) {
    (**self).text_decoded(attempt)
  }
  fn base64(&self, outcome: Base64Outcome) {
    (**self).base64(outcome)
  }
  fn json_retry(&self, error: &serde_json::Error) {
    (**self).json_retry(error)
  }
}

impl<T: ScanObserver + ?Sized> ScanObserver for Box<T> {
  fn chunk(&self, chunk: &RawChunk<'_>) {
    (**self).chunk(chunk)
  }
  fn malformed_text(&self, offset: usize) {
    (**self).malformed_text(offset)
  }
  fn keyword_skipped(&self, keyword: &str) {
    (**self).keyword_skipped(keyword)
  }
  fn candidate(&self, keyword: &str) {
    (**self).candidate(keyword)
  }
  fn text_decoded(&self, attempt: &DecodeAttempt<'_>) {
    (**self).text_decoded(attempt)
  }
  fn base64(&self, outcome: Base64Outcome) {
    (**self).base64(outcome)
  }
  fn json_retry(&self, error: &serde_json::Error) {
    (**self).json_retry(error)
  }
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;
impl ScanObserver for NoopObserver {}

/// Emits a `tracing` event for every report.
///
/// Chunk-level noise goes out at `TRACE`, decisions at `DEBUG`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;
impl ScanObserver for TracingObserver {
  fn chunk(&self, chunk: &RawChunk<'_>) {
    tracing::trace!(
      chunk_ty = %chunk.chunk_ty(),
      len = chunk.data().len(),
      offset = chunk.offset(),
      "chunk"
    );
  }

  fn malformed_text(&self, offset: usize) {
    tracing::debug!(offset, "text chunk without separator, skipping");
  }

  fn keyword_skipped(&self, keyword: &str) {
    tracing::trace!(keyword, "skipping text chunk");
  }

  fn candidate(&self, keyword: &str) {
    tracing::debug!(keyword, "found metadata chunk");
  }

  fn text_decoded(&self, attempt: &DecodeAttempt<'_>) {
    tracing::debug!(
      strategy = ?attempt.strategy,
      artifacts = attempt.artifact_count,
      len = attempt.text.len(),
      "decoded text"
    );
  }

  fn base64(&self, outcome: Base64Outcome) {
    tracing::debug!(?outcome, "base64 stage");
  }

  fn json_retry(&self, error: &serde_json::Error) {
    tracing::debug!(%error, "json parse failed, retrying on cleaned text");
  }
}
