#![forbid(unsafe_code)]

//! Module for working with PNG chunk data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! Only the chunk *layout* matters here, not the image. A PNG is the 8 byte
//! signature followed by a series of chunks:
//!
//! * 4 bytes: big-endian length of the chunk's data.
//! * 4 bytes: the chunk type, four ascii letters.
//! * `length` bytes of data.
//! * 4 bytes: a CRC32 of the type and data.
//!
//! The [`RawChunkIter`] walks these. Unlike a lenient image decoder it *does*
//! care about the signature, and it reports a chunk that runs off the end of
//! the buffer as [`ScanError::Truncated`] instead of quietly stopping.
//!
//! ## Checksums
//!
//! The iterator reads each declared CRC but never checks it. If you want to
//! know, call [`RawChunk::is_crc_correct`] yourself.
//!
//! ## Text Chunks
//!
//! A `tEXt` chunk holds `keyword\0value`. The [`TextEntry`] type splits one of
//! these apart, leaving the value as bytes since its encoding is anyone's
//! guess.

use core::fmt::{Debug, Write};

use crate::{error::ScanError, parser_helpers::*};

mod crc32;
pub(crate) use crc32::*;

mod raw_chunk;
pub use raw_chunk::*;

mod text;
pub use text::*;

mod writer;
pub use writer::*;


/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's signature bytes are correct.
#[inline]
#[must_use]
pub fn is_png_header_correct(bytes: &[u8]) -> bool {
  bytes.starts_with(&PNG_SIGNATURE)
}
