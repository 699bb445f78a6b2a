use core::iter::FusedIterator;

use super::*;

/// The four ascii bytes that say what a chunk is.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const IEND: Self = Self(*b"IEND");
  pub const tEXt: Self = Self(*b"tEXt");

  #[inline]
  #[must_use]
  pub const fn as_bytes(&self) -> &[u8; 4] {
    &self.0
  }
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char('"')?;
    core::fmt::Display::fmt(self, f)?;
    f.write_char('"')
  }
}
impl core::fmt::Display for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawChunk<'b> {
  pub(crate) chunk_ty: ChunkType,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
  pub(crate) offset: usize,
}
impl<'b> RawChunk<'b> {
  #[inline]
  #[must_use]
  pub const fn chunk_ty(&self) -> ChunkType {
    self.chunk_ty
  }

  /// The chunk's data, exactly as many bytes as its length field declared.
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }

  /// The CRC stored after the data. Nothing checks this for you.
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }

  /// Byte offset of the chunk's length field within the whole buffer.
  #[inline]
  #[must_use]
  pub const fn offset(&self) -> usize {
    self.offset
  }
}
impl Debug for RawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("chunk_ty", &self.chunk_ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .field("offset", &self.offset)
      .finish()
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// * Construction checks the signature.
/// * Each step reads length, type, data, and CRC, in that order.
/// * After an `IEND` chunk, an error, or running out of bytes exactly on a
///   chunk boundary, the iterator is done for good.
///
/// Nothing is ever read out of bounds: a chunk that doesn't fit gives
/// [`ScanError::Truncated`] instead.
#[derive(Debug, Clone)]
pub struct RawChunkIter<'b> {
  bytes: &'b [u8],
  cursor: usize,
  limit: Option<usize>,
  done: bool,
}
impl<'b> RawChunkIter<'b> {
  /// Pass the full PNG bytes, the signature is checked and skipped.
  #[inline]
  pub fn new(bytes: &'b [u8]) -> Result<Self, ScanError> {
    if is_png_header_correct(bytes) {
      Ok(Self { bytes, cursor: PNG_SIGNATURE.len(), limit: None, done: false })
    } else {
      Err(ScanError::InvalidContainer)
    }
  }

  /// Refuse to go past `limit` bytes from the start of the buffer.
  #[inline]
  #[must_use]
  pub fn with_byte_limit(self, limit: usize) -> Self {
    Self { limit: Some(limit), ..self }
  }

  /// How far into the buffer the next chunk starts.
  #[inline]
  #[must_use]
  pub const fn position(&self) -> usize {
    self.cursor
  }

  #[inline]
  fn fail(&mut self, err: ScanError) -> Option<Result<RawChunk<'b>, ScanError>> {
    self.done = true;
    Some(Err(err))
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = Result<RawChunk<'b>, ScanError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    let bytes: &'b [u8] = self.bytes;
    let offset = self.cursor;
    let remaining: &'b [u8] = &bytes[offset..];
    if remaining.is_empty() {
      self.done = true;
      return None;
    }
    let available = remaining.len();
    let truncated = |needed: u64| ScanError::Truncated { offset, needed, available };

    let (len_bytes, rest) = match try_split_off_byte_array::<4>(remaining) {
      Some(pair) => pair,
      None => return self.fail(truncated(8)),
    };
    let (type_bytes, rest) = match try_split_off_byte_array::<4>(rest) {
      Some(pair) => pair,
      None => return self.fail(truncated(8)),
    };
    let chunk_len = u64::from(u32_be(len_bytes));
    let chunk_ty = ChunkType(type_bytes);
    let is_end = chunk_ty == ChunkType::IEND;
    let crc_len: u64 = if is_end { 0 } else { 4 };

    if let Some(limit) = self.limit {
      if offset as u64 + 8 + chunk_len > limit as u64 {
        return self.fail(ScanError::ScanLimitExceeded { limit });
      }
    }

    // this compare is what keeps every slice below in bounds.
    if (rest.len() as u64) < chunk_len + crc_len {
      return self.fail(truncated(8 + chunk_len + crc_len));
    }
    let (data, rest) = rest.split_at(chunk_len as usize);
    let (declared_crc, rest) = match try_split_off_byte_array::<4>(rest) {
      Some((crc_bytes, rest)) => (u32_be(crc_bytes), rest),
      // only reachable for IEND, which may end the file without a CRC.
      None => (0, rest),
    };
    self.cursor = bytes.len() - rest.len();
    if is_end {
      self.done = true;
    }
    Some(Ok(RawChunk { chunk_ty, data, declared_crc, offset }))
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    if self.done {
      (0, Some(0))
    } else {
      let left = self.bytes.len() - self.cursor;
      (0, Some(left / 8 + 1))
    }
  }
}
impl FusedIterator for RawChunkIter<'_> {}
