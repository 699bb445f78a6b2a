use super::*;

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      c = if (c & 1) != 0 { 0xEDB8_8320_u32 ^ (c >> 1) } else { c >> 1 };
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

fn update_crc(mut crc: u32, iter: impl Iterator<Item = u8>) -> u32 {
  for byte in iter {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// CRC32 as PNG uses it: covers the chunk type and the chunk data.
#[inline]
pub(crate) fn png_crc(chunk_ty: ChunkType, data: &[u8]) -> u32 {
  let iter = chunk_ty.0.iter().copied().chain(data.iter().copied());
  update_crc(u32::MAX, iter) ^ u32::MAX
}

impl RawChunk<'_> {
  /// Computes what the CRC of this chunk *should* be.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    png_crc(self.chunk_ty, self.data)
  }

  /// If the declared CRC matches the computed one.
  ///
  /// Scanning never calls this, damaged chunks are decoded anyway.
  #[inline]
  #[must_use]
  pub fn is_crc_correct(&self) -> bool {
    self.actual_crc() == self.declared_crc
  }
}
