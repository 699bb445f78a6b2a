//! Turning the raw bytes of a text value into JSON.
//!
//! Card writers disagree about encodings. Some store UTF-8 JSON, some store
//! Base64 of UTF-8 JSON, and some tools re-save the chunk as Latin-1 along the
//! way. The pipeline here tries, in order:
//!
//! 1. The text decode cascade: strict UTF-8, lossy UTF-8, ISO-8859-1, then a
//!    plain byte-to-char mapping. The first attempt without any U+FFFD wins.
//! 2. If the winner still has U+FFFD in it, the byte mapping is used instead.
//! 3. If the whole trimmed text is Base64, it's unwrapped, and the unwrapped
//!    bytes are read as UTF-8 or as bytes, whichever looks better.
//! 4. JSON parsing, with one retry after removing a BOM and whitespace.
//!
//! Every step is a pure function of its input, so the same bytes always pick
//! the same strategy and give the same value.

use std::borrow::Cow;

use base64::{
  alphabet,
  engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
  Engine,
};
use serde_json::Value;

use crate::{
  error::{Result, ScanError},
  observe::{NoopObserver, ScanObserver},
};

/// The character decoders put in place of bytes they couldn't make sense of.
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// How many characters of failed data go into a [`ScanError::DecodeFailed`].
pub const DEFAULT_SNIPPET_LEN: usize = 100;

/// Shown in place of the snippet when there was no text left at all.
pub const EMPTY_SNIPPET: &str = "<empty>";

/// Unpadded Base64 with non-zero trailing bits allowed. Padding is dealt with
/// by [`forgiving_base64_decode`] before this sees the text.
const BASE64_UNPADDED: GeneralPurpose = GeneralPurpose::new(
  &alphabet::STANDARD,
  GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::RequireNone)
    .with_decode_allow_trailing_bits(true),
);

/// Decodes Base64 with the leniency of a browser's `atob`.
///
/// Padding can be left off, but padding that's there has to complete the last
/// quad: `"e30"` and `"e30="` decode, `"MQ="` doesn't.
#[must_use]
pub fn forgiving_base64_decode(text: &str) -> Option<Vec<u8>> {
  let mut body = text;
  if body.len() % 4 == 0 {
    body = body.strip_suffix("==").or_else(|| body.strip_suffix('=')).unwrap_or(body);
  }
  if body.len() % 4 == 1 || body.contains('=') {
    return None;
  }
  BASE64_UNPADDED.decode(body).ok()
}

#[inline]
#[must_use]
pub fn count_artifacts(text: &str) -> usize {
  text.chars().filter(|&c| c == REPLACEMENT_CHAR).count()
}

/// How many U+FFFD a lossy UTF-8 read of `bytes` would insert. A U+FFFD that's
/// validly encoded in the input doesn't count.
#[inline]
#[must_use]
pub fn utf8_replacements(bytes: &[u8]) -> usize {
  bytes.utf8_chunks().filter(|chunk| !chunk.invalid().is_empty()).count()
}

/// Each byte becomes the char with the same value (so, Latin-1 without any
/// table lookups).
#[inline]
#[must_use]
pub fn byte_map(bytes: &[u8]) -> String {
  bytes.iter().map(|&b| char::from(b)).collect()
}

/// One way to read bytes as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextStrategy {
  /// Only accepts fully valid UTF-8.
  Utf8Strict,
  /// UTF-8 with U+FFFD for anything invalid.
  Utf8Lossy,
  /// What the `iso-8859-1` label means on the web, which is the windows-1252
  /// table.
  Iso8859_1,
  /// [`byte_map`], never fails.
  ByteMap,
}
impl TextStrategy {
  /// The order strategies are tried in. The last one always succeeds.
  pub const CASCADE: [Self; 4] = [Self::Utf8Strict, Self::Utf8Lossy, Self::Iso8859_1, Self::ByteMap];

  /// Reads the bytes with this strategy.
  ///
  /// A failed strict read doesn't have text of its own, so it reports the lossy
  /// text and the number of places that went wrong.
  #[must_use]
  pub fn decode(self, bytes: &[u8]) -> DecodeAttempt<'_> {
    let (text, artifact_count): (Cow<'_, str>, usize) = match self {
      Self::Utf8Strict => match core::str::from_utf8(bytes) {
        Ok(s) => (Cow::Borrowed(s), 0),
        Err(_) => (String::from_utf8_lossy(bytes), utf8_replacements(bytes)),
      },
      Self::Utf8Lossy => (String::from_utf8_lossy(bytes), utf8_replacements(bytes)),
      Self::Iso8859_1 => {
        let (text, had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
        let artifact_count = if had_errors { count_artifacts(&text) } else { 0 };
        (text, artifact_count)
      }
      Self::ByteMap => (Cow::Owned(byte_map(bytes)), 0),
    };
    DecodeAttempt { strategy: self, text, artifact_count }
  }
}

/// A candidate reading of some bytes as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeAttempt<'a> {
  pub strategy: TextStrategy,
  pub text: Cow<'a, str>,
  /// How many U+FFFD the decoder had to put into `text`.
  pub artifact_count: usize,
}

/// Stages 1 and 2: the cascade, then the artifact re-check.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> DecodeAttempt<'_> {
  let mut chosen = None;
  for strategy in TextStrategy::CASCADE {
    let attempt = strategy.decode(bytes);
    let clean = attempt.artifact_count == 0;
    chosen = Some(attempt);
    if clean {
      break;
    }
  }
  let chosen = match chosen {
    Some(attempt) => attempt,
    None => TextStrategy::ByteMap.decode(bytes),
  };
  if chosen.artifact_count > 0 && chosen.strategy != TextStrategy::ByteMap {
    TextStrategy::ByteMap.decode(bytes)
  } else {
    chosen
  }
}

/// What [`unwrap_base64`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base64Outcome {
  /// The trimmed text isn't entirely Base64 characters, it was used as is.
  NotBase64,
  /// It looked like Base64 but didn't decode, it was used as is.
  Undecodable,
  /// Decoded, and the bytes were read as UTF-8.
  Utf8,
  /// Decoded, and the bytes were mapped one char per byte.
  Bytes,
}

/// If the *whole* string is `[A-Za-z0-9+/]+` followed by any number of `=`.
#[must_use]
pub fn looks_like_base64(text: &str) -> bool {
  let body = text.trim_end_matches('=');
  !body.is_empty() && body.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Stage 3: unwraps Base64 text, if it is Base64.
///
/// The decoded bytes are read two ways, byte-mapped and as lossy UTF-8. UTF-8
/// is used if it has fewer U+FFFD, or if it has none and contains a `{`.
#[must_use]
pub fn unwrap_base64(text: &str) -> (Cow<'_, str>, Base64Outcome) {
  let trimmed = text.trim();
  if !looks_like_base64(trimmed) {
    return (Cow::Borrowed(text), Base64Outcome::NotBase64);
  }
  let bytes = match forgiving_base64_decode(trimmed) {
    Some(bytes) => bytes,
    None => return (Cow::Borrowed(text), Base64Outcome::Undecodable),
  };
  let mapped = TextStrategy::ByteMap.decode(&bytes);
  let utf8 = TextStrategy::Utf8Lossy.decode(&bytes);
  if utf8.artifact_count < mapped.artifact_count
    || (utf8.artifact_count == 0 && utf8.text.contains('{'))
  {
    (Cow::Owned(utf8.text.into_owned()), Base64Outcome::Utf8)
  } else {
    (Cow::Owned(mapped.text.into_owned()), Base64Outcome::Bytes)
  }
}

/// The decoding half of a scan: value bytes in, JSON out.
#[derive(Clone, Copy)]
pub struct DecodePipeline<'o> {
  observer: &'o dyn ScanObserver,
  snippet_len: usize,
}
impl core::fmt::Debug for DecodePipeline<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("DecodePipeline").field("snippet_len", &self.snippet_len).finish_non_exhaustive()
  }
}
impl Default for DecodePipeline<'static> {
  #[inline]
  fn default() -> Self {
    Self { observer: &NoopObserver, snippet_len: DEFAULT_SNIPPET_LEN }
  }
}
impl<'o> DecodePipeline<'o> {
  #[inline]
  #[must_use]
  pub fn new(observer: &'o dyn ScanObserver) -> Self {
    Self { observer, snippet_len: DEFAULT_SNIPPET_LEN }
  }

  #[inline]
  #[must_use]
  pub fn with_snippet_len(self, snippet_len: usize) -> Self {
    Self { snippet_len, ..self }
  }

  /// Runs all four stages.
  pub fn decode(&self, value: &[u8]) -> Result<Value> {
    let attempt = decode_text(value);
    self.observer.text_decoded(&attempt);
    let (text, outcome) = unwrap_base64(&attempt.text);
    self.observer.base64(outcome);
    self.parse_json(&text)
  }

  /// Stage 4: parse, and on failure strip BOMs and whitespace from both ends
  /// and parse once more.
  pub fn parse_json(&self, text: &str) -> Result<Value> {
    match serde_json::from_str(text) {
      Ok(value) => Ok(value),
      Err(first) => {
        self.observer.json_retry(&first);
        let cleaned = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
        serde_json::from_str(cleaned).map_err(|e| ScanError::DecodeFailed {
          snippet: if cleaned.is_empty() {
            EMPTY_SNIPPET.to_string()
          } else {
            cleaned.chars().take(self.snippet_len).collect()
          },
          reason: e.to_string(),
        })
      }
    }
  }
}
