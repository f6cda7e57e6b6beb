//! # toon_codec
//!
//! An encoder and decoder for the TOON (Token-Oriented Object Notation)
//! format.
//!
//! ## What is TOON?
//!
//! TOON is a compact, human-readable textual encoding of the JSON data
//! model. It blends YAML-style significant indentation with CSV-style
//! tabular rows, cutting 30-60% of the tokens an equivalent JSON payload
//! would spend on braces, brackets and repeated keys — which is exactly
//! what you want when passing structured data to Large Language Models.
//!
//! ## Key Features
//!
//! - **Token-Efficient**: minimalist syntax with no redundant braces,
//!   brackets, or quotes
//! - **Tabular Arrays**: uniform object arrays collapse into a header plus
//!   one delimiter-joined row per element
//! - **Lossless**: every JSON value round-trips; strict decoding validates
//!   declared lengths, row widths and indentation
//! - **Key Folding**: optional collapsing of single-key object chains into
//!   dotted paths (`a.b.c: 1`), with a matching decode-side expansion
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use toon_codec::{decode, encode, toon, DecodeOptions, EncodeOptions};
//!
//! let value = toon!({
//!     "users": [
//!         {"id": 1, "name": "Alice", "role": "admin"},
//!         {"id": 2, "name": "Bob", "role": "user"}
//!     ]
//! });
//!
//! let text = encode(&value, &EncodeOptions::default()).unwrap();
//! assert_eq!(text, "users[2]{id,name,role}:\n  1,Alice,admin\n  2,Bob,user");
//!
//! let back = decode(&text, &DecodeOptions::default()).unwrap();
//! assert_eq!(back, value);
//! ```
//!
//! ## Encoding Rust Types
//!
//! Anything implementing `serde::Serialize` can be encoded directly; it is
//! normalized into a [`Value`] tree first.
//!
//! ```rust
//! use serde::Serialize;
//! use toon_codec::{encode, EncodeOptions};
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//! let text = encode(&user, &EncodeOptions::default()).unwrap();
//! assert_eq!(text, "id: 123\nname: Alice\nactive: true");
//! ```
//!
//! ## The Wire Format at a Glance
//!
//! ```text
//! users[2]{id,name,role}:
//!   1,Alice,admin
//!   2,Bob,user
//! numbers[3]: 1,2,3
//! empty[0]:
//! server:
//!   host: localhost
//!   port: 8080
//! ```
//!
//! Arrays declare their length in brackets; uniform object arrays add a
//! `{field,...}` header and one row per element. Strings are unquoted
//! whenever the decoder would read them back unchanged. Output uses LF
//! line endings, no trailing newline and no trailing spaces; decoding
//! accepts LF and CRLF.
//!
//! ## Strictness
//!
//! Decoding is strict by default: declared lengths must match, tabular
//! rows must be exactly as wide as their header, indentation must be an
//! exact multiple of the indent size with no tabs, and array bodies may
//! not contain blank lines. `DecodeOptions::with_strict(false)` relaxes
//! all of these while accepting every document strict mode accepts.
//!
//! ## Concurrency
//!
//! The codec is pure: no global state, no caches, no I/O. Encoding and
//! decoding are deterministic functions of their arguments, and any
//! number of threads may call them concurrently.

pub mod error;
pub mod map;
pub mod options;
pub mod value;

mod decode;
mod encode;
mod expand;
mod fold;
mod macros;
mod parser;
mod scanner;
mod ser;
mod syntax;

pub use error::{Error, ErrorKind, Result};
pub use map::Map;
pub use options::{DecodeOptions, Delimiter, EncodeOptions, KeyFolding, PathExpansion};
pub use ser::to_value;
pub use value::{Number, Value};

use serde::Serialize;

/// Encodes any `T: Serialize` as a TOON document.
///
/// The value is normalized into a [`Value`] tree via [`to_value`] first,
/// then emitted. The output has no trailing newline.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{encode, EncodeOptions};
///
/// let text = encode(&vec![1, 2, 3], &EncodeOptions::default()).unwrap();
/// assert_eq!(text, "[3]: 1,2,3");
/// ```
///
/// # Errors
///
/// Returns an error if normalization fails (e.g. a map with non-string
/// keys). Encoding an already-normalized tree cannot fail; see
/// [`encode_value`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode<T>(value: &T, options: &EncodeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let tree = to_value(value)?;
    Ok(encode_value(&tree, options))
}

/// Encodes an existing [`Value`] tree as a TOON document.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{encode_value, toon, EncodeOptions};
///
/// let value = toon!({"name": "Alice"});
/// assert_eq!(encode_value(&value, &EncodeOptions::default()), "name: Alice");
/// ```
#[must_use]
pub fn encode_value(value: &Value, options: &EncodeOptions) -> String {
    encode::encode_tree(value, options)
}

/// Encodes any `T: Serialize` as UTF-8 bytes of a TOON document.
///
/// # Errors
///
/// Returns an error if normalization fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_to_vec<T>(value: &T, options: &EncodeOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    Ok(encode(value, options)?.into_bytes())
}

/// Decodes a TOON document into a [`Value`] tree.
///
/// Empty input decodes to an empty object. The whole document is parsed
/// before anything is returned; the first error aborts the decode.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{decode, DecodeOptions};
///
/// let value = decode("numbers[3]: 1,2,3", &DecodeOptions::default()).unwrap();
/// let numbers = value.as_object().unwrap().get("numbers").unwrap();
/// assert_eq!(numbers.as_array().unwrap().len(), 3);
/// ```
///
/// # Errors
///
/// Returns an error for malformed syntax, and — in strict mode — for any
/// violated structural invariant. Errors carry line information; see
/// [`ErrorKind`] for the taxonomy.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(text: &str, options: &DecodeOptions) -> Result<Value> {
    decode::decode_str(text, options)
}

/// Decodes a TOON document from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or the document does
/// not decode; see [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_from_slice(bytes: &[u8], options: &DecodeOptions) -> Result<Value> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::custom(format!("input is not valid UTF-8: {}", e)))?;
    decode(text, options)
}
