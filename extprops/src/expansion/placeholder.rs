//! Validation of custom variable patterns.
//!
//! A pattern such as `#\[(.+?)\]` or `{{(.+?)}}` becomes the [`Regex`] a
//! [`super::PatternVariableExpander`] scans with; its first capture group is
//! the variable name.

use regex::Regex;

use crate::error::ExpansionError;

/// Regex source for `pattern`, with `{{`/`}}` turned into literal braces.
///
/// Backslash escapes pass through untouched; any other brace must pair up.
fn literal_braces(pattern: &str) -> Result<String, String> {
    let mut source = String::with_capacity(pattern.len());
    let mut open = 0_usize;
    let mut chars = pattern.char_indices().peekable();
    while let Some((at, c)) = chars.next() {
        match c {
            '\\' => {
                source.push(c);
                if let Some((_, escaped)) = chars.next() {
                    source.push(escaped);
                }
            }
            '{' | '}' if chars.next_if(|&(_, next)| next == c).is_some() => {
                source.push('\\');
                source.push(c);
            }
            '{' => {
                open += 1;
                source.push(c);
            }
            '}' => {
                open = open
                    .checked_sub(1)
                    .ok_or_else(|| format!("'}}' at byte {at} closes nothing"))?;
                source.push(c);
            }
            _ => source.push(c),
        }
    }
    if open > 0 {
        return Err(format!("{open} '{{' left open"));
    }
    Ok(source)
}

/// Validate a variable pattern and compile it into a [`Regex`].
///
/// Escaped braces (`\{`) and doubled braces (`{{`) denote literal braces.
/// The compiled pattern must expose at least one capture group, whose first
/// group is the variable name.
///
/// # Errors
///
/// Returns [`ExpansionError::InvalidPattern`] when braces are mismatched,
/// the regex fails to compile, or it has no capture group.
///
/// # Examples
///
/// ```
/// use extprops::expansion::compile_placeholder;
///
/// let re = compile_placeholder(r"#\[(.+?)\]")?;
/// assert!(re.is_match("#[db.host]"));
/// assert!(compile_placeholder(r"\$\{name\}").is_err());
/// assert!(compile_placeholder("{name").is_err());
/// # Ok::<(), extprops::ExpansionError>(())
/// ```
pub fn compile_placeholder(pattern: &str) -> Result<Regex, ExpansionError> {
    let invalid = |message: String| ExpansionError::InvalidPattern {
        pattern: pattern.to_owned(),
        message,
    };
    let source = literal_braces(pattern).map_err(invalid)?;
    let regex = Regex::new(&source).map_err(|e| invalid(e.to_string()))?;
    if regex.captures_len() < 2 {
        return Err(invalid("pattern must capture the variable name".to_owned()));
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::compile_placeholder;
    use crate::error::ExpansionError;

    #[rstest]
    #[case(r"\$\{(.*?)\}")]
    #[case(r"#\[(.+?)\]")]
    #[case("{{(.+?)}}")]
    fn accepts_escaped_and_doubled_braces(#[case] pattern: &str) {
        compile_placeholder(pattern).expect("pattern should compile");
    }

    #[rstest]
    #[case("{(.+)")]
    #[case("(.+)}")]
    #[case(r"\$\{.*?\}")]
    #[case("([a-")]
    fn rejects_invalid_patterns(#[case] pattern: &str) {
        let err = compile_placeholder(pattern).expect_err("invalid");
        assert!(matches!(err, ExpansionError::InvalidPattern { .. }));
    }

    #[rstest]
    #[case("(.+)}", "'}' at byte 4 closes nothing")]
    #[case("{(.+){", "2 '{' left open")]
    fn brace_problems_are_located(#[case] pattern: &str, #[case] detail: &str) {
        match compile_placeholder(pattern) {
            Err(ExpansionError::InvalidPattern { message, .. }) => assert_eq!(message, detail),
            other => panic!("expected a brace error, got {other:?}"),
        }
    }
}
