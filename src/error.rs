use thiserror::Error;

/// Every way a metadata scan can end without producing a value.
///
/// `MalformedTextChunk` is only ever seen by code that drives the
/// [`TextEntry`](crate::png::TextEntry) splitter itself: the scanner skips
/// those chunks and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
  /// The first 8 bytes aren't the PNG signature (or there aren't 8 bytes).
  #[error("not a PNG container: signature mismatch")]
  InvalidContainer,

  /// A chunk claims more bytes than the buffer has left.
  #[error("chunk at offset {offset} needs {needed} bytes but only {available} remain")]
  Truncated { offset: usize, needed: u64, available: usize },

  /// A `tEXt` chunk without the zero byte between keyword and value.
  #[error("text chunk at offset {offset} has no keyword separator")]
  MalformedTextChunk { offset: usize },

  /// The scan finished and no keyword matched.
  #[error("no matching metadata chunk found")]
  NotFound,

  /// A matching chunk was found, but nothing in it parsed as JSON.
  #[error("metadata did not parse as JSON ({reason}), data began: {snippet:?}")]
  DecodeFailed { snippet: String, reason: String },

  /// The configured byte cap was hit before the scan finished.
  #[error("scan exceeded the {limit} byte limit")]
  ScanLimitExceeded { limit: usize },
}
impl ScanError {
  /// `NotFound` is a normal outcome for most callers, this makes it easy to
  /// check for.
  #[inline]
  #[must_use]
  pub const fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound)
  }
}

/// Result type for scan operations
pub type Result<T> = core::result::Result<T, ScanError>;
