// Kanji-Parts Query Parser
// Reduces raw query text to the Han characters the engine searches on

use crate::types::{ParsedQuery, Region, SearchMode};
use once_cell::sync::Lazy;
use regex::Regex;

/// Han script membership (CJK ideographs, radicals, and their extensions)
static HAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Han}").expect("static Han regex"));

/// Parse raw query text into a [`ParsedQuery`]
///
/// Non-Han characters (Latin letters, kana, punctuation, ideographic
/// description characters) are dropped. They are never an error.
///
/// # Examples
/// ```
/// # use kanji_parts::query::parse_query;
/// # use kanji_parts::types::{Region, SearchMode};
/// let parsed = parse_query("水 + 也", SearchMode::PartsToChar, Region::Standard);
/// assert_eq!(parsed.parts, vec!["水", "也"]);
///
/// let parsed = parse_query("abc", SearchMode::PartsToChar, Region::Standard);
/// assert!(parsed.is_empty());
/// ```
pub fn parse_query(text: &str, mode: SearchMode, region: Region) -> ParsedQuery {
    ParsedQuery {
        mode,
        region,
        parts: extract_han(text),
    }
}

/// Extract Han characters from text, in order, duplicates kept
pub fn extract_han(text: &str) -> Vec<String> {
    text.trim()
        .chars()
        .filter(|ch| is_han_char(*ch))
        .map(String::from)
        .collect()
}

/// Check if a single character belongs to the Han script
#[inline]
pub fn is_han_char(ch: char) -> bool {
    let mut buf = [0u8; 4];
    HAN.is_match(ch.encode_utf8(&mut buf))
}

/// Check if a symbol contains a Han character
///
/// Symbols are usually one character, but table entries may carry
/// variation selectors or other trailing marks.
#[inline]
pub fn is_han(symbol: &str) -> bool {
    HAN.is_match(symbol)
}

/// Count the Han symbols in a sequence
#[inline]
pub fn count_han<S: AsRef<str>>(symbols: &[S]) -> usize {
    symbols.iter().filter(|s| is_han(s.as_ref())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ Extraction ============

    #[test]
    fn test_extract_keeps_order_and_duplicates() {
        assert_eq!(extract_han("口口口"), vec!["口", "口", "口"]);
        assert_eq!(extract_han("角刀牛"), vec!["角", "刀", "牛"]);
    }

    #[test]
    fn test_extract_drops_non_han() {
        assert_eq!(extract_han("水a也!"), vec!["水", "也"]);
        assert_eq!(extract_han("みず水"), vec!["水"]);
        assert!(extract_han("hello").is_empty());
    }

    #[test]
    fn test_extract_whitespace_only() {
        assert!(extract_han("   ").is_empty());
        assert!(extract_han("").is_empty());
    }

    // ============ Script Detection ============

    #[test]
    fn test_radicals_are_han() {
        // Radical supplement forms used as components
        assert!(is_han_char('⺡'));
        assert!(is_han_char('氵'));
        assert!(is_han_char('亻'));
    }

    #[test]
    fn test_description_characters_are_not_han() {
        // Ideographic description characters decorate decomposition data
        assert!(!is_han_char('⿰'));
        assert!(!is_han_char('⿱'));
        assert!(!is_han("①"));
    }

    #[test]
    fn test_count_han() {
        let symbols = vec!["⿰", "氵", "也"];
        assert_eq!(count_han(&symbols), 2);
    }

    // ============ Parsing ============

    #[test]
    fn test_parse_query_carries_mode_and_region() {
        let parsed = parse_query("池", SearchMode::CharToParts, Region::Extended);
        assert_eq!(parsed.mode, SearchMode::CharToParts);
        assert_eq!(parsed.region, Region::Extended);
        assert_eq!(parsed.parts, vec!["池"]);
    }
}
