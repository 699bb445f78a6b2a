use std::sync::Once;

use base64::{engine::general_purpose::STANDARD, Engine};
use chara_card::{
  decode::{decode_text, DecodePipeline},
  png::{ChunkType, PngWriter, PNG_SIGNATURE},
  scan_for_metadata, CharacterData, ScanError, ScanOptions, Scanner,
};
use quickcheck_macros::quickcheck;
use rstest::rstest;
use serde_json::{json, Value};

static INIT: Once = Once::new();

fn init_tracing() {
  INIT.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_test_writer()
      .with_max_level(tracing::Level::TRACE)
      .try_init();
  });
}

fn card_png(keyword: &str, value: &[u8]) -> Vec<u8> {
  PngWriter::new()
    .chunk(ChunkType::IHDR, &[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0])
    .text_chunk(keyword, value)
    .chunk(ChunkType(*b"IDAT"), &[0x78, 0x9C, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01])
    .finish()
}

#[test]
fn test_base64_card() {
  init_tracing();
  let png = card_png("chara", STANDARD.encode(r#"{"name":"Foo"}"#).as_bytes());
  assert_eq!(scan_for_metadata(&png, "chara"), Ok(json!({"name": "Foo"})));
}

#[test]
fn test_other_keyword_not_found() {
  init_tracing();
  let png = card_png("other", STANDARD.encode(r#"{"name":"Foo"}"#).as_bytes());
  let err = scan_for_metadata(&png, "chara").unwrap_err();
  assert_eq!(err, ScanError::NotFound);
  assert!(err.is_not_found());
}

#[test]
fn test_declared_length_longer_than_buffer() {
  let mut png = PNG_SIGNATURE.to_vec();
  png.extend_from_slice(&1000_u32.to_be_bytes());
  png.extend_from_slice(b"tEXt");
  png.extend_from_slice(b"ch");
  assert_eq!(png.len() - PNG_SIGNATURE.len(), 10);
  assert_eq!(
    scan_for_metadata(&png, "chara"),
    Err(ScanError::Truncated { offset: 8, needed: 1012, available: 10 })
  );
}

#[test]
fn test_altered_signature() {
  let mut png = card_png("chara", b"{}");
  png[3] ^= 0x01;
  assert_eq!(scan_for_metadata(&png, "chara"), Err(ScanError::InvalidContainer));
  assert_eq!(scan_for_metadata(&[], "chara"), Err(ScanError::InvalidContainer));
}

#[test]
fn test_undecodable_card() {
  init_tracing();
  let png = card_png("chara", b"{name: Foo,");
  match scan_for_metadata(&png, "chara") {
    Err(ScanError::DecodeFailed { snippet, reason }) => {
      assert_eq!(snippet, "{name: Foo,");
      assert!(!reason.is_empty());
    }
    other => panic!("expected a decode failure, got {other:?}"),
  }
}

#[test]
fn test_base64_gate() {
  let png = card_png("chara", b"  not base64!!  ");
  match scan_for_metadata(&png, "chara") {
    Err(ScanError::DecodeFailed { snippet, .. }) => assert_eq!(snippet, "not base64!!"),
    other => panic!("expected a decode failure, got {other:?}"),
  }
}

#[rstest]
#[case(b"MQ=")]
#[case(b"eyJhIjoxfQ=")]
fn test_incomplete_padding_is_kept_as_text(#[case] value: &[u8]) {
  let png = card_png("chara", value);
  match scan_for_metadata(&png, "chara") {
    Err(ScanError::DecodeFailed { snippet, .. }) => assert_eq!(snippet.as_bytes(), value),
    other => panic!("expected a decode failure, got {other:?}"),
  }
  let mut padded = value.to_vec();
  padded.push(b'=');
  assert!(scan_for_metadata(&card_png("chara", &padded), "chara").is_ok());
}

#[test]
fn test_bom_after_leading_whitespace() {
  let png = card_png("chara", " \u{FEFF}{\"a\":1}".as_bytes());
  assert_eq!(scan_for_metadata(&png, "chara"), Ok(json!({"a": 1})));
}

#[rstest]
#[case(b"")]
#[case(b"  \r\n  ")]
fn test_blank_card_has_a_snippet(#[case] value: &[u8]) {
  let png = card_png("chara", value);
  match scan_for_metadata(&png, "chara") {
    Err(ScanError::DecodeFailed { snippet, reason }) => {
      assert_eq!(snippet, chara_card::decode::EMPTY_SNIPPET);
      assert!(!reason.is_empty());
    }
    other => panic!("expected a decode failure, got {other:?}"),
  }
}

#[rstest]
#[case("chara", true)]
#[case("CHARA", true)]
#[case("chara_v2", true)]
#[case("MyChara", true)]
#[case("character", true)]
#[case("other", false)]
fn test_keyword_variants(#[case] keyword: &str, #[case] found: bool) {
  let png = card_png(keyword, br#"{"name":"Foo"}"#);
  let result = scan_for_metadata(&png, "chara");
  if found {
    assert_eq!(result, Ok(json!({"name": "Foo"})));
  } else {
    assert_eq!(result, Err(ScanError::NotFound));
  }
}

#[test]
fn test_damaged_crc_still_decodes() {
  let mut png = card_png("chara", br#"{"name":"Foo"}"#);
  // the text chunk's CRC, right after IHDR and the text data
  let crc_at = 8 + (12 + 13) + 8 + "chara".len() + 1 + r#"{"name":"Foo"}"#.len();
  png[crc_at] ^= 0xFF;
  assert_eq!(scan_for_metadata(&png, "chara"), Ok(json!({"name": "Foo"})));
}

#[test]
fn test_latin1_resaved_card() {
  let png = card_png("chara", b"{\"name\":\"Zo\xeb\",\"tags\":[\"caf\xe9\"]}");
  let card = CharacterData::try_from(scan_for_metadata(&png, "chara").unwrap()).unwrap();
  assert_eq!(card.name.as_deref(), Some("Zoë"));
  assert_eq!(card.tags, Some(vec!["café".to_string()]));
}

#[test]
fn test_scan_limit_option() {
  let png = card_png("chara", b"{}");
  let scanner = Scanner::new(ScanOptions::default().with_max_scan_bytes(Some(24)));
  assert_eq!(scanner.scan(&png, "chara"), Err(ScanError::ScanLimitExceeded { limit: 24 }));
}

#[quickcheck]
fn round_trip_base64_card(name: String, tags: Vec<String>, n: i64, flag: bool) -> bool {
  let value = json!({
    "name": name,
    "tags": tags,
    "n": n,
    "data": { "flag": flag, "list": [n, null, name] },
  });
  let encoded = STANDARD.encode(serde_json::to_string(&value).unwrap());
  scan_for_metadata(&card_png("chara", encoded.as_bytes()), "chara") == Ok(value)
}

#[quickcheck]
fn round_trip_plain_card(name: String, n: u32) -> bool {
  let value = json!({ "name": name, "n": n });
  let text = serde_json::to_string(&value).unwrap();
  scan_for_metadata(&card_png("chara", text.as_bytes()), "chara") == Ok(value)
}

#[quickcheck]
fn scanning_is_deterministic(value: Vec<u8>) -> bool {
  let png = card_png("chara", &value);
  let first: Result<Value, ScanError> = scan_for_metadata(&png, "chara");
  let second = scan_for_metadata(&png, "chara");
  let pipeline = DecodePipeline::default();
  first == second
    && decode_text(&value) == decode_text(&value)
    && pipeline.decode(&value) == pipeline.decode(&value)
}
