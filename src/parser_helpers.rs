#![forbid(unsafe_code)]

//! Just has shorthands for the int parsing the chunk reader needs.

#[inline]
#[must_use]
pub fn u32_be(bytes: [u8; 4]) -> u32 {
  u32::from_be_bytes(bytes)
}

/// Splits `N` bytes off the front, or `None` if there aren't that many.
#[inline]
pub fn try_split_off_byte_array<const N: usize>(bytes: &[u8]) -> Option<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let mut a = [0_u8; N];
    a.copy_from_slice(head);
    Some((a, tail))
  } else {
    None
  }
}

#[test]
fn test_try_split_off_byte_array() {
  assert_eq!(try_split_off_byte_array::<4>(&[1, 2, 3, 4, 5]), Some(([1, 2, 3, 4], &[5_u8][..])));
  assert_eq!(try_split_off_byte_array::<4>(&[1, 2, 3, 4]), Some(([1, 2, 3, 4], &[][..])));
  assert_eq!(try_split_off_byte_array::<4>(&[1, 2, 3]), None);
  assert_eq!(u32_be([0, 0, 0x03, 0xE8]), 1000);
}
