//! Driving a whole scan, from buffer to JSON.

use serde_json::Value;

use crate::{
  decode::{DecodePipeline, DEFAULT_SNIPPET_LEN},
  error::{Result, ScanError},
  keyword::keyword_matches,
  observe::{ScanObserver, TracingObserver},
  png::{ChunkType, RawChunkIter, TextEntry},
};

/// Knobs for a [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanOptions {
  /// Fail with [`ScanError::ScanLimitExceeded`] rather than read a chunk
  /// ending past this many bytes. `None` means the whole buffer.
  pub max_scan_bytes: Option<usize>,
  /// How many characters of unparseable data to keep in
  /// [`ScanError::DecodeFailed`].
  pub snippet_len: usize,
}
impl Default for ScanOptions {
  #[inline]
  fn default() -> Self {
    Self { max_scan_bytes: None, snippet_len: DEFAULT_SNIPPET_LEN }
  }
}
impl ScanOptions {
  #[inline]
  #[must_use]
  pub const fn with_max_scan_bytes(self, max_scan_bytes: Option<usize>) -> Self {
    Self { max_scan_bytes, ..self }
  }

  #[inline]
  #[must_use]
  pub const fn with_snippet_len(self, snippet_len: usize) -> Self {
    Self { snippet_len, ..self }
  }
}

/// Finds and decodes the metadata text chunk in a PNG.
///
/// A scan goes through the chunks in order. Anything that isn't a `tEXt` chunk
/// with a matching keyword is skipped. The first match is decoded and that's
/// the result, success or failure. Later matches are never looked at.
///
/// ```
/// use chara_card::{png::PngWriter, ScanError, Scanner, ScanOptions};
/// let png = PngWriter::new().text_chunk("chara", br#"{"name":"Foo"}"#).finish();
/// let scanner = Scanner::new(ScanOptions::default());
/// assert_eq!(scanner.scan(&png, "chara").unwrap()["name"], "Foo");
/// assert_eq!(scanner.scan(&png[..20], "chara"), Err(ScanError::Truncated {
///   offset: 8,
///   needed: 8 + 20 + 4,
///   available: 12,
/// }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scanner<O = TracingObserver> {
  options: ScanOptions,
  observer: O,
}
impl Scanner {
  #[inline]
  #[must_use]
  pub fn new(options: ScanOptions) -> Self {
    Self { options, observer: TracingObserver }
  }
}
impl<O: ScanObserver> Scanner<O> {
  /// Swaps in a different observer.
  #[inline]
  #[must_use]
  pub fn with_observer<P: ScanObserver>(self, observer: P) -> Scanner<P> {
    Scanner { options: self.options, observer }
  }

  #[inline]
  #[must_use]
  pub const fn options(&self) -> &ScanOptions {
    &self.options
  }

  #[inline]
  #[must_use]
  pub const fn observer(&self) -> &O {
    &self.observer
  }

  /// Scans `buffer` for a text chunk matching `identifier`.
  pub fn scan(&self, buffer: &[u8], identifier: &str) -> Result<Value> {
    let mut chunks = RawChunkIter::new(buffer)?;
    if let Some(limit) = self.options.max_scan_bytes {
      chunks = chunks.with_byte_limit(limit);
    }
    for chunk in chunks {
      let chunk = chunk?;
      self.observer.chunk(&chunk);
      if chunk.chunk_ty() != ChunkType::tEXt {
        continue;
      }
      let entry = match TextEntry::try_from(chunk) {
        Ok(entry) => entry,
        Err(_) => {
          self.observer.malformed_text(chunk.offset());
          continue;
        }
      };
      if !keyword_matches(entry.keyword(), identifier) {
        self.observer.keyword_skipped(entry.keyword());
        continue;
      }
      self.observer.candidate(entry.keyword());
      return DecodePipeline::new(&self.observer)
        .with_snippet_len(self.options.snippet_len)
        .decode(entry.value());
    }
    Err(ScanError::NotFound)
  }
}

/// Scans with default options and `tracing` output.
///
/// ```
/// use chara_card::{png::PngWriter, scan_for_metadata, ScanError};
/// let png = PngWriter::new().text_chunk("Comment", b"hello").finish();
/// assert_eq!(scan_for_metadata(&png, "chara"), Err(ScanError::NotFound));
/// ```
#[inline]
pub fn scan_for_metadata(buffer: &[u8], identifier: &str) -> Result<Value> {
  Scanner::new(ScanOptions::default()).scan(buffer, identifier)
}
