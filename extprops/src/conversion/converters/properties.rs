//! Embedded `key=value` listings.

use std::mem;
use std::str::Chars;

use crate::conversion::{ConversionContext, ConversionResult, Converter};
use crate::error::ConversionError;
use crate::types::RawType;
use crate::value::{Properties, Value};

/// Parses a property listing into [`Properties`].
///
/// Entries are separated by line breaks. A key ends at the first unescaped
/// `=`, `:`, or whitespace. Lines starting with `#` or `!` are comments, a
/// trailing backslash continues an entry on the next line, and values may use
/// `\t`, `\n`, `\r`, `\f`, and `\uXXXX` escapes.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertiesConverter;

fn malformed(entry: &str, reason: impl Into<String>) -> ConversionError {
    ConversionError::MalformedEntry {
        entry: entry.to_owned(),
        reason: reason.into(),
    }
}

fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;
    for physical in text.lines() {
        let line = physical.trim_start();
        if !continuing && (line.is_empty() || line.starts_with(['#', '!'])) {
            continue;
        }
        let backslashes = line.chars().rev().take_while(|c| *c == '\\').count();
        if backslashes.is_multiple_of(2) {
            current.push_str(line);
            lines.push(mem::take(&mut current));
            continuing = false;
        } else {
            current.push_str(line.strip_suffix('\\').unwrap_or(line));
            continuing = true;
        }
    }
    if continuing {
        lines.push(current);
    }
    lines
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            key_end = index;
            break;
        }
    }
    let key = line.get(..key_end).unwrap_or(line);
    let after_key = line.get(key_end..).unwrap_or_default().trim_start();
    let value = after_key
        .strip_prefix(['=', ':'])
        .unwrap_or(after_key)
        .trim_start();
    (key, value)
}

fn read_hex4(chars: &mut Chars<'_>) -> Option<u32> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 {
        return None;
    }
    u32::from_str_radix(&digits, 16).ok()
}

fn unicode_escape(chars: &mut Chars<'_>) -> Option<char> {
    let code = read_hex4(chars)?;
    if !(0xD800..=0xDBFF).contains(&code) {
        return char::from_u32(code);
    }
    let mut rest = chars.clone();
    if rest.next() != Some('\\') || rest.next() != Some('u') {
        return None;
    }
    let low = read_hex4(&mut rest).filter(|low| (0xDC00..=0xDFFF).contains(low))?;
    *chars = rest;
    let combined = 0x1_0000 + ((code - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(combined)
}

fn unescape(raw: &str, entry: &str) -> Result<String, ConversionError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => out.push(
                unicode_escape(&mut chars)
                    .ok_or_else(|| malformed(entry, "invalid \\uXXXX escape"))?,
            ),
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Parse a property listing.
///
/// # Errors
///
/// Returns [`ConversionError::MalformedEntry`] for an invalid `\u` escape.
pub(crate) fn parse_listing(text: &str) -> Result<Properties, ConversionError> {
    let mut properties = Properties::new();
    for line in logical_lines(text) {
        let (key, value) = split_entry(&line);
        properties.insert(unescape(key, &line)?, unescape(value, &line)?);
    }
    Ok(properties)
}

impl Converter for PropertiesConverter {
    fn name(&self) -> &'static str {
        "properties"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(raw, RawType::Properties)
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        parse_listing(ctx.value()).map(|properties| Value::Properties(properties).into())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::parse_listing;
    use crate::error::ConversionError;

    #[test]
    fn parses_separators_comments_and_continuations() {
        let text = "# header\n\
                    a=1\n\
                    b : 2\n\
                    c 3\n\
                    ! bang comment\n\
                    \n\
                    long = first, \\\n    second\n\
                    path=C:\\\\temp\n";
        let properties = parse_listing(text).expect("valid listing");
        assert_eq!(properties.get("a"), Some("1"));
        assert_eq!(properties.get("b"), Some("2"));
        assert_eq!(properties.get("c"), Some("3"));
        assert_eq!(properties.get("long"), Some("first, second"));
        assert_eq!(properties.get("path"), Some("C:\\temp"));
        assert_eq!(properties.len(), 5);
    }

    #[rstest]
    #[case("key\\ with\\ spaces=v", "key with spaces", "v")]
    #[case("tab=a\\tb", "tab", "a\tb")]
    #[case("snow=\\u2603", "snow", "\u{2603}")]
    #[case("face=\\uD83D\\uDE00", "face", "\u{1F600}")]
    #[case("empty=", "empty", "")]
    #[case("bare", "bare", "")]
    fn unescapes_keys_and_values(#[case] text: &str, #[case] key: &str, #[case] value: &str) {
        let properties = parse_listing(text).expect("valid listing");
        assert_eq!(properties.get(key), Some(value));
    }

    #[test]
    fn empty_text_yields_empty_properties() {
        assert!(parse_listing("").expect("empty listing").is_empty());
    }

    #[rstest]
    #[case("bad=\\uxxxx")]
    #[case("short=\\u12")]
    #[case("lone=\\uD83D")]
    #[case("unpaired=\\uD800\\uFFFF")]
    #[case("letter=\\uD83D\\u0041")]
    #[case("low_first=\\uDE00")]
    fn invalid_unicode_escapes_are_rejected(#[case] text: &str) {
        let err = parse_listing(text).expect_err("invalid escape");
        assert!(matches!(err, ConversionError::MalformedEntry { .. }));
    }
}
