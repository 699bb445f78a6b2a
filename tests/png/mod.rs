use chara_card::{
  png::{PngWriter, RawChunkIter, PNG_SIGNATURE},
  scan_for_metadata, ScanError,
};
use quickcheck_macros::quickcheck;
use walkdir::WalkDir;

#[test]
fn test_RawChunkIter_no_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    if let Ok(it) = RawChunkIter::new(&v) {
      for _ in it {
        //
      }
    }
    let _ = scan_for_metadata(&v, "chara");
  }
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let mut v = PNG_SIGNATURE.to_vec();
    v.extend(super::rand_bytes(1024));
    for _ in RawChunkIter::new(&v).unwrap() {
      //
    }
    let _ = scan_for_metadata(&v, "chara");
  }
}

#[test]
fn test_random_data_is_not_a_container() {
  for _ in 0..10 {
    let mut v = super::rand_bytes(64);
    v[0] = 0;
    assert_eq!(scan_for_metadata(&v, "chara"), Err(ScanError::InvalidContainer));
  }
}

/// Every chunk type and every length that runs past the end gets reported as
/// truncated, not read.
#[quickcheck]
fn declared_length_past_end_is_truncated(chunk_ty: (u8, u8, u8, u8), extra: u32, body: Vec<u8>) -> bool {
  let body_len = body.len() as u64;
  let declared = (body_len + 1 + u64::from(extra)).min(u64::from(u32::MAX));
  if declared <= body_len {
    return true;
  }
  let (a, b, c, d) = chunk_ty;
  let mut png = PngWriter::new().text_chunk("Comment", b"before").into_bytes();
  let offset = png.len();
  png.extend_from_slice(&(declared as u32).to_be_bytes());
  png.extend_from_slice(&[a, b, c, d]);
  png.extend_from_slice(&body);
  let available = png.len() - offset;
  let last = RawChunkIter::new(&png).unwrap().last();
  let is_end = [a, b, c, d] == *b"IEND";
  let needed = 8 + declared + if is_end { 0 } else { 4 };
  last == Some(Err(ScanError::Truncated { offset, needed, available }))
    && scan_for_metadata(&png, "chara") == Err(ScanError::Truncated { offset, needed, available })
}
