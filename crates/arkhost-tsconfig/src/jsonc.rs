//! Tolerant parsing for JSON-with-comments configuration files.
//!
//! Project configuration files allow `//` and `/* */` comments and trailing
//! commas. Both are stripped before handing the text to `serde_json`, with
//! newlines preserved so any reported error positions still line up with the
//! file on disk.

use camino::Utf8Path;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Parses JSON-with-comments text into `T`.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when the stripped text is not valid JSON
/// or does not match the target shape.
pub fn parse_str<T: DeserializeOwned>(path: &Utf8Path, text: &str) -> Result<T, ConfigError> {
    let stripped = strip_trailing_commas(&strip_comments(text));
    serde_json::from_str(&stripped).map_err(|source| ConfigError::parse(path, source))
}

/// Removes `//` and `/* */` comments, keeping string contents intact.
fn strip_comments(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                result.push(c);
            }
            '/' => match chars.peek() {
                Some('/') => {
                    chars.next();
                    for nc in chars.by_ref() {
                        if nc == '\n' {
                            result.push('\n');
                            break;
                        }
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut prev = ' ';
                    for nc in chars.by_ref() {
                        if prev == '*' && nc == '/' {
                            break;
                        }
                        if nc == '\n' {
                            result.push('\n');
                        }
                        prev = nc;
                    }
                }
                _ => result.push(c),
            },
            _ => result.push(c),
        }
    }

    result
}

/// Drops commas that directly precede a closing `}` or `]`.
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                result.push(c);
            }
            ',' => {
                let mut lookahead = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() {
                        lookahead.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match chars.peek() {
                    Some('}') | Some(']') => {}
                    _ => result.push(c),
                }
                result.push_str(&lookahead);
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use camino::Utf8Path;
    use rstest::rstest;
    use serde_json::Value;

    use super::{parse_str, strip_comments, strip_trailing_commas};

    fn parse(text: &str) -> Value {
        parse_str(Utf8Path::new("test.json"), text).expect("text should parse")
    }

    #[rstest]
    #[case("{\"a\": 1} // tail", 1)]
    #[case("{/* leading */\"a\": 1}", 1)]
    #[case("{\"a\": /* inline */ 1}", 1)]
    fn strips_comments_outside_strings(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(parse(text)["a"], Value::from(expected));
    }

    #[rstest]
    fn keeps_comment_markers_inside_strings() {
        let value = parse("{\"url\": \"https://example.com/*x*/\"}");
        assert_eq!(value["url"], Value::from("https://example.com/*x*/"));
    }

    #[rstest]
    fn preserves_line_numbers_when_stripping() {
        let text = "{\n// one\n/* two\nthree */\n\"a\": 1\n}";
        let stripped = strip_comments(text);
        assert_eq!(
            stripped.matches('\n').count(),
            text.matches('\n').count(),
            "comment stripping must not shift lines"
        );
    }

    #[rstest]
    #[case("{\"a\": 1,}")]
    #[case("{\"a\": 1,\n}")]
    #[case("{\"a\": 1, \"list\": [1, 2,],}")]
    fn tolerates_trailing_commas(#[case] text: &str) {
        assert_eq!(parse(text)["a"], Value::from(1));
    }

    #[rstest]
    fn keeps_separating_commas() {
        let stripped = strip_trailing_commas("[1, 2, 3]");
        assert_eq!(stripped, "[1, 2, 3]");
    }

    #[rstest]
    fn reports_parse_errors_with_path() {
        let error = parse_str::<Value>(Utf8Path::new("broken.json"), "{oops")
            .expect_err("malformed text should fail");
        assert!(error.to_string().contains("broken.json"));
    }
}
