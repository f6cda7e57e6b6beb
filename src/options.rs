//! Configuration options for TOON encoding and decoding.
//!
//! This module provides the types that customize codec behavior:
//!
//! - [`EncodeOptions`]: indentation, delimiter and key folding on encode
//! - [`DecodeOptions`]: indentation, strictness and path expansion on decode
//! - [`Delimiter`]: choice of delimiter for arrays and tables (comma, tab, or pipe)
//!
//! ## Examples
//!
//! ```rust
//! use toon_codec::{encode, EncodeOptions, Delimiter, toon};
//!
//! let data = toon!({"items": ["a", "b", "c"]});
//! let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
//! assert_eq!(encode(&data, &options).unwrap(), "items[3|]: a|b|c");
//! ```

/// Delimiter choice for inline arrays and tabular rows.
///
/// Comma is the default and is never written into array headers; tab and
/// pipe are suffixed inside the length bracket (`[3\t]`, `[3|]`) so the
/// decoder knows how to split values.
///
/// # Examples
///
/// ```rust
/// use toon_codec::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_char(), ',');
/// assert_eq!(Delimiter::Tab.as_char(), '\t');
/// assert_eq!(Delimiter::Pipe.as_char(), '|');
/// assert_eq!(Delimiter::from_char('|'), Some(Delimiter::Pipe));
/// assert_eq!(Delimiter::from_char('x'), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Returns the delimiter character.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    /// Returns the string representation of this delimiter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    /// The inverse of [`as_char`](Delimiter::as_char): maps a delimiter
    /// character back to its variant.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            ',' => Some(Delimiter::Comma),
            '\t' => Some(Delimiter::Tab),
            '|' => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

/// Key folding mode for the encoder.
///
/// `Safe` collapses chains of single-key objects into dotted paths
/// (`a.b.c: 1`), but only when every segment is a plain identifier and the
/// folded key cannot collide with an existing sibling key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyFolding {
    #[default]
    Off,
    Safe,
}

/// Path expansion mode for the decoder.
///
/// `Safe` splits dotted keys back into nested objects, skipping keys that
/// were quoted in the source or whose segments are not plain identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PathExpansion {
    #[default]
    Off,
    Safe,
}

/// Configuration for [`encode`](crate::encode).
///
/// # Examples
///
/// ```rust
/// use toon_codec::{EncodeOptions, Delimiter, KeyFolding};
///
/// // Defaults: 2-space indent, comma delimiter, folding off.
/// let options = EncodeOptions::new();
/// assert_eq!(options.indent, 2);
///
/// // Custom configuration.
/// let options = EncodeOptions::new()
///     .with_delimiter(Delimiter::Tab)
///     .with_key_folding(KeyFolding::Safe)
///     .with_flatten_depth(3);
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Spaces per depth level.
    pub indent: usize,
    /// Delimiter for inline array values and tabular rows.
    pub delimiter: Delimiter,
    /// Whether to collapse single-key object chains into dotted paths.
    pub key_folding: KeyFolding,
    /// Maximum number of segments per folded chain. The default is
    /// unbounded; `0` or `1` effectively disables folding.
    pub flatten_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: 2,
            delimiter: Delimiter::default(),
            key_folding: KeyFolding::default(),
            flatten_depth: usize::MAX,
        }
    }
}

impl EncodeOptions {
    /// Creates the default options (2-space indent, comma delimiter, no
    /// key folding).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation size (number of spaces per depth level).
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the delimiter for inline arrays and tabular rows.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the key folding mode.
    #[must_use]
    pub fn with_key_folding(mut self, key_folding: KeyFolding) -> Self {
        self.key_folding = key_folding;
        self
    }

    /// Caps the number of segments a folded chain may collapse.
    #[must_use]
    pub fn with_flatten_depth(mut self, flatten_depth: usize) -> Self {
        self.flatten_depth = flatten_depth;
        self
    }
}

/// Configuration for [`decode`](crate::decode).
///
/// Strict mode (the default) enforces the structural invariants of the
/// format: declared array lengths, tabular row widths, exact indentation
/// and the absence of blank lines inside array bodies. Non-strict mode
/// accepts everything strict mode accepts, plus sloppier input.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{decode, DecodeOptions};
///
/// let lenient = DecodeOptions::new().with_strict(false);
/// assert!(decode("numbers[3]: 1,2", &lenient).is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Expected spaces per depth level.
    pub indent: usize,
    /// Enforce count, width, indentation and blank-line invariants.
    pub strict: bool,
    /// Whether to expand dotted keys into nested objects.
    pub expand_paths: PathExpansion,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            indent: 2,
            strict: true,
            expand_paths: PathExpansion::default(),
        }
    }
}

impl DecodeOptions {
    /// Creates the default options (2-space indent, strict, no path
    /// expansion).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected indentation size.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables strict structural validation.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the path expansion mode.
    #[must_use]
    pub fn with_expand_paths(mut self, expand_paths: PathExpansion) -> Self {
        self.expand_paths = expand_paths;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_bijection() {
        for d in [Delimiter::Comma, Delimiter::Tab, Delimiter::Pipe] {
            assert_eq!(Delimiter::from_char(d.as_char()), Some(d));
        }
        assert_eq!(Delimiter::from_char(';'), None);
    }

    #[test]
    fn encode_defaults() {
        let options = EncodeOptions::default();
        assert_eq!(options.indent, 2);
        assert_eq!(options.delimiter, Delimiter::Comma);
        assert_eq!(options.key_folding, KeyFolding::Off);
        assert_eq!(options.flatten_depth, usize::MAX);
    }

    #[test]
    fn decode_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.indent, 2);
        assert!(options.strict);
        assert_eq!(options.expand_paths, PathExpansion::Off);
    }
}
