//! Identifier validation and literal quoting for generated SQL.

use super::DbError;

/// Escape a string for use inside a SQL literal delimited by `quote_char`.
///
/// SQL escapes the delimiter by doubling it; backslashes carry no meaning.
pub fn escape_string_for_quote(s: &str, quote_char: char) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        if c == quote_char {
            result.push(c);
        }
        result.push(c);
    }
    result
}

/// Quote a string as a single-quoted SQL string literal.
#[inline]
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", escape_string_for_quote(s, '\''))
}

/// Reject names that cannot be used as a table identifier.
///
/// Empty names and names carrying quote or control characters are refused
/// outright instead of being escaped.
pub fn validate_identifier(name: &str) -> Result<(), DbError> {
    if name.trim().is_empty() {
        return Err(DbError::invalid_argument("table name is empty"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| matches!(c, '"' | '\'' | '`') || c.is_control())
    {
        return Err(DbError::invalid_argument(format!(
            "table name '{}' contains forbidden character {:?}",
            name.escape_default(),
            bad
        )));
    }
    Ok(())
}

/// Validate `name` and return it as a double-quoted identifier.
pub fn quote_identifier(name: &str) -> Result<String, DbError> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_escape_string_basic() {
        assert_eq!(escape_string_for_quote("hello", '\''), "hello");
    }

    #[rstest]
    fn test_escape_string_doubles_quote() {
        assert_eq!(escape_string_for_quote("it's", '\''), "it''s");
    }

    #[rstest]
    fn test_escape_string_leaves_backslash() {
        assert_eq!(escape_string_for_quote(r"C:\data\x.csv", '\''), r"C:\data\x.csv");
    }

    #[rstest]
    fn test_quote_literal() {
        assert_eq!(quote_literal("/tmp/o'neil.csv"), "'/tmp/o''neil.csv'");
    }

    #[rstest]
    #[case("users")]
    #[case("Sales 2024")]
    #[case("métricas")]
    fn test_quote_identifier_accepts(#[case] name: &str) {
        assert_eq!(quote_identifier(name).unwrap(), format!("\"{}\"", name));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("bad\"name")]
    #[case("bad'name")]
    #[case("bad`name")]
    #[case("line\nbreak")]
    fn test_quote_identifier_rejects(#[case] name: &str) {
        let err = quote_identifier(name).unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument { .. }));
    }
}
