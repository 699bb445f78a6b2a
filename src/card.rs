//! Typed views of what a scan recovers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ScanError;

/// The usual fields of a character card.
///
/// Nothing here is required, and anything not listed ends up in `extra`, so
/// any JSON object converts. This is a convenience for reading, not a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterData {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub personality: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scenario: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_mes: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mes_example: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub creator_notes: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub system_prompt: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub post_history_instructions: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alternate_greetings: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub character_book: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tags: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub creator: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub character_version: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub extensions: Option<Map<String, Value>>,
  /// Every other key.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}
impl TryFrom<Value> for CharacterData {
  type Error = serde_json::Error;
  #[inline]
  fn try_from(value: Value) -> Result<Self, Self::Error> {
    serde_json::from_value(value)
  }
}

/// The outcome of scanning one file, in a shape that's easy to hand to a UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  /// Milliseconds since the unix epoch when the report was made.
  pub timestamp: u64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filename: Option<String>,
}
impl ParseReport {
  #[must_use]
  pub fn new(filename: Option<String>, result: Result<Value, ScanError>) -> Self {
    let timestamp = std::time::SystemTime::now()
      .duration_since(std::time::UNIX_EPOCH)
      .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
      .unwrap_or(0);
    match result {
      Ok(data) => Self { success: true, data: Some(data), error: None, timestamp, filename },
      Err(e) => Self { success: false, data: None, error: Some(e.to_string()), timestamp, filename },
    }
  }
}
