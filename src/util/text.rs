use std::borrow::Cow;

/// Removes characters that XML 1.0 does not allow in text or attributes.
///
/// Feed content occasionally carries stray C0 control bytes or the
/// noncharacters U+FFFE/U+FFFF; escaping cannot represent them, so they are
/// dropped. Tab, newline and carriage return are kept.
///
/// Returns `Cow::Borrowed` when nothing needs removing.
///
/// # Examples
///
/// ```
/// use darling::util::strip_xml_invalid_chars;
///
/// assert_eq!(strip_xml_invalid_chars("he\x00llo"), "hello");
/// assert_eq!(strip_xml_invalid_chars("tab\there"), "tab\there");
/// ```
pub fn strip_xml_invalid_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_xml_invalid) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|&c| !is_xml_invalid(c)).collect())
}

fn is_xml_invalid(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => false,
        '\u{0}'..='\u{1f}' => true,
        '\u{fffe}' | '\u{ffff}' => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_returns_borrowed() {
        let input = "Hello, world! This is clean text.";
        let result = strip_xml_invalid_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_preserves_tabs_newlines_cr() {
        let input = "line1\nline2\ttabbed\r\nwindows";
        let result = strip_xml_invalid_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_removes_controls() {
        let input = "he\x00ll\x07o\x08 w\x0bor\x0cld\x01!";
        let result = strip_xml_invalid_chars(input);
        assert!(matches!(result, Cow::Owned(_)));
        assert_eq!(result, "hello world!");
    }

    #[test]
    fn test_removes_noncharacters() {
        assert_eq!(strip_xml_invalid_chars("a\u{fffe}b\u{ffff}c"), "abc");
    }

    #[test]
    fn test_keeps_unicode() {
        let input = "Caf\u{e9} \u{4f60}\u{597d} \u{1f389}";
        assert!(matches!(strip_xml_invalid_chars(input), Cow::Borrowed(_)));
    }
}
