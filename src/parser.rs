//! Token-level parsing: primitive tokens, key tokens, delimited value
//! splitting and array header recognition.
//!
//! These functions operate on a single line's content and never touch the
//! cursor; the decoder drives them. Header recognition is deliberately
//! non-committal: a line that does not match the full header shape yields
//! `Ok(None)` so the decoder can fall back to treating it as a key-value
//! line.

use crate::error::{Error, Result};
use crate::options::Delimiter;
use crate::syntax::{
    find_closing_quote, find_unquoted_char, is_delimiter_char, is_numeric_literal,
    normalize_signed_zero, unescape, HASH, LITERAL_FALSE, LITERAL_NULL, LITERAL_TRUE,
};
use crate::value::{Number, Value};
use num_bigint::BigInt;

/// One column name from a tabular header, with its quoting recorded so
/// path expansion can skip quoted fields.
#[derive(Debug, Clone)]
pub(crate) struct HeaderField {
    pub name: String,
    pub was_quoted: bool,
}

/// Parsed form of an array header line `key?[#?len(\t||)?]{fields}?: tail?`.
#[derive(Debug, Clone)]
pub(crate) struct ArrayHeader {
    pub key: Option<String>,
    pub key_was_quoted: bool,
    /// Declared element count.
    pub length: usize,
    /// Delimiter for the tail, rows and field list. Comma unless the
    /// bracket carries a `\t` or `|` suffix.
    pub delimiter: Delimiter,
    /// Whether the length carried a `#` prefix. Accepted on decode,
    /// never emitted.
    #[allow(dead_code)]
    pub length_marker: bool,
    /// Column names, present only for the tabular form.
    pub fields: Option<Vec<HeaderField>>,
    /// Trimmed text after the colon; non-empty means the inline form.
    pub tail: String,
}

/// Parses one trimmed token into a primitive value.
///
/// Empty tokens are empty strings; quoted tokens must be fully consumed
/// by the quoted literal (trailing garbage is a syntax error); `null`,
/// `true` and `false` are reserved; anything that looks numeric becomes a
/// number; everything else is the raw token as a string.
pub(crate) fn parse_primitive_token(token: &str, line: usize) -> Result<Value> {
    let t = token.trim();
    if t.is_empty() {
        return Ok(Value::String(String::new()));
    }
    if t.starts_with('"') {
        let close = find_closing_quote(t, 1)
            .ok_or_else(|| Error::syntax_in(line, 1, "unterminated string", t))?;
        if close != t.len() - 1 {
            return Err(Error::syntax_in(
                line,
                close + 2,
                "unexpected characters after closing quote",
                t,
            ));
        }
        return Ok(Value::String(unescape(&t[1..close], line)?));
    }
    if t == LITERAL_NULL {
        return Ok(Value::Null);
    }
    if t == LITERAL_TRUE {
        return Ok(Value::Bool(true));
    }
    if t == LITERAL_FALSE {
        return Ok(Value::Bool(false));
    }
    if is_numeric_literal(t) {
        let integral = !t.contains('.') && !t.contains('e') && !t.contains('E');
        if integral {
            if let Ok(i) = t.parse::<i64>() {
                return Ok(Value::Number(Number::Integer(i)));
            }
            if let Some(b) = BigInt::parse_bytes(t.as_bytes(), 10) {
                return Ok(Value::Number(Number::Big(b)));
            }
        }
        if let Ok(f) = t.parse::<f64>() {
            return Ok(Value::Number(Number::Float(normalize_signed_zero(f))));
        }
    }
    Ok(Value::String(t.to_string()))
}

/// Parses a key starting at `start`, returning `(key, index_past_colon,
/// was_quoted)`. The colon is required.
pub(crate) fn parse_key_token(content: &str, start: usize, line: usize) -> Result<(String, usize, bool)> {
    let bytes = content.as_bytes();
    if bytes.get(start) == Some(&b'"') {
        let close = find_closing_quote(content, start + 1)
            .ok_or_else(|| Error::syntax_in(line, start + 1, "unterminated quoted key", content))?;
        let key = unescape(&content[start + 1..close], line)?;
        if bytes.get(close + 1) != Some(&b':') {
            return Err(Error::syntax_in(
                line,
                close + 2,
                "expected `:` after key",
                content,
            ));
        }
        Ok((key, close + 2, true))
    } else {
        let colon = find_unquoted_char(content, ':', start)
            .ok_or_else(|| Error::syntax_in(line, start + 1, "expected `:` after key", content))?;
        let key = content[start..colon].trim().to_string();
        if key.is_empty() {
            return Err(Error::syntax_in(line, start + 1, "empty key", content));
        }
        Ok((key, colon + 1, false))
    }
}

/// Splits `text` on the active delimiter, respecting double-quoted spans
/// (inside which a backslash escapes one character). Fields are trimmed
/// but otherwise untouched, so quoted fields keep their quotes.
pub(crate) fn parse_delimited_values(text: &str, delimiter: Delimiter) -> Vec<String> {
    let delim = delimiter.as_char() as u8;
    let bytes = text.as_bytes();
    let mut fields = Vec::new();
    let mut field_start = 0;
    let mut i = 0;
    let mut in_quotes = false;
    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes {
            match b {
                b'\\' => i += 2,
                b'"' => {
                    in_quotes = false;
                    i += 1;
                }
                _ => i += 1,
            }
        } else if b == b'"' {
            in_quotes = true;
            i += 1;
        } else if b == delim {
            fields.push(text[field_start..i].trim().to_string());
            field_start = i + 1;
            i += 1;
        } else {
            i += 1;
        }
    }
    fields.push(text[field_start..].trim().to_string());
    fields
}

/// Recognizes an array header of the form `key?[#?len(\t||)?]{fields}?: tail?`.
///
/// Returns `Ok(None)` when the line is not a header at all. Returns an
/// error only for lines that are unambiguously headers but malformed
/// (bad field list, values after a tabular header).
pub(crate) fn parse_array_header_line(
    content: &str,
    default_delimiter: Delimiter,
    line: usize,
    strict: bool,
) -> Result<Option<ArrayHeader>> {
    let s = content;
    let (key, key_was_quoted, bracket_start) = if s.starts_with('"') {
        let close = match find_closing_quote(s, 1) {
            Some(c) => c,
            None => return Ok(None),
        };
        if s.as_bytes().get(close + 1) != Some(&b'[') {
            return Ok(None);
        }
        (Some(unescape(&s[1..close], line)?), true, close + 1)
    } else if s.starts_with('[') {
        (None, false, 0)
    } else {
        let bracket = match s.find('[') {
            Some(b) => b,
            None => return Ok(None),
        };
        let key_part = &s[..bracket];
        if key_part.contains(':') || key_part.contains('"') {
            return Ok(None);
        }
        let trimmed = key_part.trim_end();
        if trimmed.is_empty() {
            return Ok(None);
        }
        (Some(trimmed.to_string()), false, bracket)
    };

    let close_bracket = match s[bracket_start..].find(']') {
        Some(p) => bracket_start + p,
        None => return Ok(None),
    };
    let mut seg = &s[bracket_start + 1..close_bracket];
    let length_marker = seg.starts_with(HASH);
    if length_marker {
        seg = &seg[1..];
    }
    let mut delimiter = default_delimiter;
    match seg.as_bytes().last() {
        Some(b'\t') => {
            delimiter = Delimiter::Tab;
            seg = &seg[..seg.len() - 1];
        }
        Some(b'|') => {
            delimiter = Delimiter::Pipe;
            seg = &seg[..seg.len() - 1];
        }
        _ => {}
    }
    if seg.is_empty() || !seg.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let length: usize = match seg.parse() {
        Ok(n) => n,
        Err(_) => return Ok(None),
    };

    let rest = &s[close_bracket + 1..];
    if let Some(inner_rest) = rest.strip_prefix('{') {
        let brace_end = match find_unquoted_char(inner_rest, '}', 0) {
            Some(p) => p,
            None => return Ok(None),
        };
        let inner = &inner_rest[..brace_end];
        let after = &inner_rest[brace_end + 1..];
        if !after.starts_with(':') {
            return Ok(None);
        }
        let fields = parse_header_fields(inner, delimiter, line, strict)?;
        if !after[1..].trim().is_empty() {
            return Err(Error::syntax_in(
                line,
                0,
                "unexpected values after tabular header",
                content,
            ));
        }
        return Ok(Some(ArrayHeader {
            key,
            key_was_quoted,
            length,
            delimiter,
            length_marker,
            fields: Some(fields),
            tail: String::new(),
        }));
    }

    if !rest.starts_with(':') {
        return Ok(None);
    }
    let tail = rest[1..].trim().to_string();
    Ok(Some(ArrayHeader {
        key,
        key_was_quoted,
        length,
        delimiter,
        length_marker,
        fields: None,
        tail,
    }))
}

/// Parses the inside of a `{...}` field list, split by the header's
/// delimiter. Strict mode rejects unquoted field names containing a
/// delimiter character other than the active one.
fn parse_header_fields(
    inner: &str,
    delimiter: Delimiter,
    line: usize,
    strict: bool,
) -> Result<Vec<HeaderField>> {
    let raw_fields = parse_delimited_values(inner, delimiter);
    let mut fields = Vec::with_capacity(raw_fields.len());
    for raw in raw_fields {
        if raw.starts_with('"') {
            let close = find_closing_quote(&raw, 1)
                .ok_or_else(|| Error::syntax(line, 0, "unterminated quoted field name"))?;
            if close != raw.len() - 1 {
                return Err(Error::syntax(
                    line,
                    0,
                    "unexpected characters after quoted field name",
                ));
            }
            fields.push(HeaderField {
                name: unescape(&raw[1..close], line)?,
                was_quoted: true,
            });
        } else {
            if raw.is_empty() {
                return Err(Error::syntax(line, 0, "empty field name in tabular header"));
            }
            if strict {
                if let Some(bad) = raw
                    .chars()
                    .find(|&c| is_delimiter_char(c) && c != delimiter.as_char())
                {
                    return Err(Error::validation(
                        line,
                        &format!(
                            "field name `{}` contains `{}` which is not the active delimiter",
                            raw,
                            bad.escape_default()
                        ),
                    ));
                }
            }
            fields.push(HeaderField {
                name: raw,
                was_quoted: false,
            });
        }
    }
    Ok(fields)
}
