use std::borrow::Cow;

use super::*;

/// Textual data, split into its keyword and value.
///
/// Spec: [tEXt](https://www.w3.org/TR/png/#11tEXt)
///
/// The PNG spec says both halves are Latin-1, but writers in the wild put
/// UTF-8 keywords and whatever they like in the value. The keyword is decoded
/// as (lossy) UTF-8 and the value is left as bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEntry<'b> {
  keyword: Cow<'b, str>,
  value: &'b [u8],
}
impl<'b> TextEntry<'b> {
  /// Splits `keyword\0value` at the first zero byte.
  #[inline]
  #[must_use]
  pub fn split(data: &'b [u8]) -> Option<Self> {
    let sep = data.iter().position(|&b| b == 0)?;
    let (keyword, value) = (&data[..sep], &data[sep + 1..]);
    Some(Self { keyword: String::from_utf8_lossy(keyword), value })
  }

  #[inline]
  #[must_use]
  pub fn keyword(&self) -> &str {
    &self.keyword
  }

  /// Everything after the separator, still undecoded.
  #[inline]
  #[must_use]
  pub const fn value(&self) -> &'b [u8] {
    self.value
  }
}
impl<'b> TryFrom<RawChunk<'b>> for TextEntry<'b> {
  type Error = ScanError;
  #[inline]
  fn try_from(raw: RawChunk<'b>) -> Result<Self, Self::Error> {
    if raw.chunk_ty != ChunkType::tEXt {
      return Err(ScanError::MalformedTextChunk { offset: raw.offset });
    }
    Self::split(raw.data).ok_or(ScanError::MalformedTextChunk { offset: raw.offset })
  }
}
