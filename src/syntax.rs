//! Shared lexical grammar: reserved characters, literal predicates, the
//! string escape codec and number canonicalization.
//!
//! The encoder and decoder must agree exactly on what may appear unquoted,
//! what counts as a numeric literal, and how strings are escaped. Keeping
//! all of those rules in one module is what makes the round-trip guarantee
//! hold: a string is emitted unquoted if and only if the decoder would read
//! it back as the same string.

use crate::error::{Error, Result};
use crate::options::Delimiter;
use crate::value::Number;

pub(crate) const COLON: char = ':';
pub(crate) const QUOTE: char = '"';
pub(crate) const BACKSLASH: char = '\\';
pub(crate) const HASH: char = '#';
pub(crate) const BRACKET_OPEN: char = '[';
pub(crate) const BRACKET_CLOSE: char = ']';
pub(crate) const BRACE_OPEN: char = '{';
pub(crate) const BRACE_CLOSE: char = '}';

/// Hyphen followed by a space, the marker that opens a list item.
pub(crate) const LIST_ITEM_MARKER: &str = "- ";

pub(crate) const LITERAL_NULL: &str = "null";
pub(crate) const LITERAL_TRUE: &str = "true";
pub(crate) const LITERAL_FALSE: &str = "false";

#[inline]
pub(crate) fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[inline]
pub(crate) fn is_delimiter_char(c: char) -> bool {
    Delimiter::from_char(c).is_some()
}

#[inline]
pub(crate) fn is_structural(c: char) -> bool {
    matches!(
        c,
        BRACKET_OPEN | BRACKET_CLOSE | BRACE_OPEN | BRACE_CLOSE
    )
}

/// Exact match against the three reserved word literals.
#[inline]
pub(crate) fn is_boolean_or_null_literal(s: &str) -> bool {
    s == LITERAL_TRUE || s == LITERAL_FALSE || s == LITERAL_NULL
}

/// Does `s` read back as a number? Matches `-?\d+(\.\d+)?([eE][+-]?\d+)?`,
/// rejects integer parts with a leading zero other than `0` itself (so
/// `007` stays a string), and requires the result to parse as a finite
/// double.
pub(crate) fn is_numeric_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i = 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return false;
    }
    if bytes[int_start] == b'0' && i - int_start > 1 {
        return false;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len() && s.parse::<f64>().map(|f| f.is_finite()).unwrap_or(false)
}

/// `[A-Za-z_][A-Za-z0-9_]*` — a single segment of a dotted key path.
pub(crate) fn is_identifier_segment(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `[A-Za-z_][A-Za-z0-9_.]*` — identifier characters plus dot. Keys of
/// this shape are emitted without quotes.
pub(crate) fn is_valid_unquoted_key(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// May this string value be emitted without quotes, given the active
/// delimiter? False for anything the decoder would read back differently:
/// reserved words, numeric-looking text, text with structural characters,
/// untrimmed whitespace, or a leading list-item marker.
pub(crate) fn is_safe_unquoted_string(s: &str, delimiter: Delimiter) -> bool {
    if s.is_empty() || s != s.trim() {
        return false;
    }
    if is_boolean_or_null_literal(s) || is_numeric_literal(s) {
        return false;
    }
    if s.starts_with(LIST_ITEM_MARKER) {
        return false;
    }
    let delim = delimiter.as_char();
    s.chars().all(|c| {
        c != COLON
            && c != QUOTE
            && c != BACKSLASH
            && !is_structural(c)
            && c != '\n'
            && c != '\r'
            && c != '\t'
            && c != delim
    })
}

/// Escape a string for a quoted literal. `\r\n` collapses to a single
/// `\n` escape; the five sequences `\\ \" \n \r \t` are the only ones
/// ever produced.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str("\\n");
            }
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`]. A backslash followed by anything other than the
/// five recognized sequence characters is a syntax error, as is a
/// trailing lone backslash.
pub(crate) fn unescape(s: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                return Err(Error::syntax(
                    line,
                    0,
                    &format!("invalid escape sequence `\\{}`", other),
                ));
            }
            None => {
                return Err(Error::syntax(line, 0, "unterminated escape sequence"));
            }
        }
    }
    Ok(out)
}

/// Index of the first unescaped `"` at or after `start`, skipping the
/// byte after each backslash. `start` should point just past the opening
/// quote. Returns `None` when the quote never closes.
pub(crate) fn find_closing_quote(s: &str, start: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// First index of `ch` in `s` (at or after `start`) that lies outside any
/// double-quoted span. Inside quotes a backslash escapes the next byte.
pub(crate) fn find_unquoted_char(s: &str, ch: char, start: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let target = ch as u8;
    let mut i = start;
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
        } else if b == target {
            return Some(i);
        } else {
            i += 1;
        }
    }
    None
}

/// `-0.0` becomes `+0.0`; every other value passes through.
#[inline]
pub(crate) fn normalize_signed_zero(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x
    }
}

/// Canonical token form of a number: plain decimal, no exponent, no
/// trailing fractional zeros, `-0` as `0`. Non-finite floats render as
/// `null` (they normalize away at encoding). Big integers are emitted
/// verbatim.
pub(crate) fn format_number(n: &Number) -> String {
    match n {
        Number::Integer(i) => i.to_string(),
        Number::Big(b) => b.to_string(),
        Number::Float(f) => {
            if !f.is_finite() {
                return LITERAL_NULL.to_string();
            }
            let f = normalize_signed_zero(*f);
            if f == 0.0 {
                return "0".to_string();
            }
            // Rust's Display for f64 is already the shortest decimal
            // representation that round-trips, and it never uses an
            // exponent.
            format!("{}", f)
        }
    }
}
