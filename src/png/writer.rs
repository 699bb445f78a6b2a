use super::*;

/// Builds PNG chunk streams, with correct CRCs.
///
/// This doesn't make an *image*, just the container layout. It's enough to
/// produce data that [`RawChunkIter`] reads back, which is handy for embedding
/// a card into some existing chunks or for building test inputs.
///
/// ```
/// use chara_card::png::*;
/// let png = PngWriter::new().text_chunk("chara", b"e30=").finish();
/// let chunks: Vec<_> = RawChunkIter::new(&png).unwrap().map(Result::unwrap).collect();
/// assert_eq!(chunks.len(), 2);
/// assert!(chunks.iter().all(|c| c.is_crc_correct()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngWriter {
  bytes: Vec<u8>,
}
impl Default for PngWriter {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl PngWriter {
  /// Starts a new stream with the signature already written.
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self { bytes: PNG_SIGNATURE.to_vec() }
  }

  /// Appends a chunk of any type.
  ///
  /// ## Panics
  /// * If `data` is longer than `u32::MAX`, which no PNG chunk can be.
  #[must_use]
  pub fn chunk(mut self, chunk_ty: ChunkType, data: &[u8]) -> Self {
    let len = u32::try_from(data.len()).unwrap_or_else(|_| panic!("chunk data too long"));
    self.bytes.extend_from_slice(&len.to_be_bytes());
    self.bytes.extend_from_slice(chunk_ty.as_bytes());
    self.bytes.extend_from_slice(data);
    self.bytes.extend_from_slice(&png_crc(chunk_ty, data).to_be_bytes());
    self
  }

  /// Appends a `tEXt` chunk holding `keyword\0value`.
  #[must_use]
  pub fn text_chunk(self, keyword: &str, value: &[u8]) -> Self {
    let mut data = Vec::with_capacity(keyword.len() + 1 + value.len());
    data.extend_from_slice(keyword.as_bytes());
    data.push(0);
    data.extend_from_slice(value);
    self.chunk(ChunkType::tEXt, &data)
  }

  /// Appends the `IEND` chunk and gives back the bytes.
  #[inline]
  #[must_use]
  pub fn finish(self) -> Vec<u8> {
    self.chunk(ChunkType::IEND, &[]).bytes
  }

  /// Gives back the bytes without adding `IEND`.
  #[inline]
  #[must_use]
  pub fn into_bytes(self) -> Vec<u8> {
    self.bytes
  }
}
