//! Deciding which text keyword holds the card.

/// Any keyword containing this (ignoring case) is taken as card data.
///
/// Writers don't agree on the exact keyword, `chara`, `Chara`, `character`,
/// and `chara_v2` have all been seen.
pub const CHARA_MARKER: &str = "chara";

/// If `keyword` names the metadata chunk.
///
/// ```
/// use chara_card::keyword_matches;
/// assert!(keyword_matches("ccv3", "ccv3"));
/// assert!(keyword_matches("MyChara", "ccv3"));
/// assert!(!keyword_matches("Comment", "ccv3"));
/// ```
#[inline]
#[must_use]
pub fn keyword_matches(keyword: &str, identifier: &str) -> bool {
  keyword == identifier || keyword.to_lowercase().contains(CHARA_MARKER)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  #[rstest]
  #[case("chara", true)]
  #[case("CHARA", true)]
  #[case("chara_v2", true)]
  #[case("MyChara", true)]
  #[case("character", true)]
  #[case("other", false)]
  #[case("Comment", false)]
  #[case("", false)]
  #[case("char", false)]
  fn test_keyword_matches(#[case] keyword: &str, #[case] expected: bool) {
    assert_eq!(keyword_matches(keyword, "chara"), expected);
  }

  #[test]
  fn test_exact_identifier() {
    assert!(keyword_matches("ccv3", "ccv3"));
    assert!(!keyword_matches("CCV3", "ccv3"));
    assert!(keyword_matches("", ""));
  }
}
