//! Tolerant percent-decoding for rule text.

use std::borrow::Cow;

/// Decode percent-encoded text, falling back to the raw input when decoding
/// fails.
///
/// Rule modifiers and values are decoded before any comparison so that
/// visually identical parameter names that differ only in encoding
/// (`a b` vs `a%20b`) end up byte-identical in canonical form.
pub fn decode_text(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(Cow::Borrowed(_)) => raw.to_string(),
        Ok(Cow::Owned(decoded)) => decoded,
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_percent_encoded() {
        assert_eq!(decode_text("a%20b"), "a b");
        assert_eq!(decode_text("caf%C3%A9"), "café");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(decode_text("plain"), "plain");
        assert_eq!(decode_text(""), "");
    }

    #[test]
    fn test_undecodable_falls_back_to_raw() {
        // %FF is not valid UTF-8 once decoded
        assert_eq!(decode_text("%FF"), "%FF");
    }

    #[test]
    fn test_plus_is_not_a_space() {
        // Query-string '+' stays literal, matching how captured parameter
        // values were recorded
        assert_eq!(decode_text("a+b"), "a+b");
    }
}
