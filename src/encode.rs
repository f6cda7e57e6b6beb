//! Encoder: a value tree to canonical TOON text.
//!
//! The encoder walks the tree once, appending lines to a [`LineWriter`].
//! Arrays pick the most compact of four forms:
//!
//! 1. empty — `key[0]:`
//! 2. inline — all elements primitive: `key[3]: a,b,c`
//! 3. tabular — uniform objects with primitive values:
//!    `key[2]{id,name}:` followed by one delimiter-joined row per element
//! 4. expanded — everything else, one `- ` list item per element
//!
//! Objects inside list items put their first field on the hyphen line;
//! when that field is an array, its body indents two levels past the
//! hyphen so the remaining fields can sit at one level.
//!
//! Output is deterministic: fields emit in insertion order, lines carry no
//! trailing whitespace, and the document has no trailing newline.

use crate::fold::{fold_entry, FoldedChain};
use crate::options::{Delimiter, EncodeOptions, KeyFolding};
use crate::syntax::{escape, format_number, is_safe_unquoted_string, is_valid_unquoted_key};
use crate::value::Value;
use crate::Map;
use std::collections::HashSet;

/// Indent-aware append-only output buffer.
///
/// Indentation strings are cached per depth; the finished document never
/// ends in a newline.
struct LineWriter {
    out: String,
    indent_size: usize,
    indent_cache: Vec<String>,
    empty: bool,
}

impl LineWriter {
    fn new(indent_size: usize) -> Self {
        LineWriter {
            out: String::with_capacity(256),
            indent_size,
            indent_cache: Vec::new(),
            empty: true,
        }
    }

    fn push(&mut self, depth: usize, content: &str) {
        if !self.empty {
            self.out.push('\n');
        }
        self.empty = false;
        while self.indent_cache.len() <= depth {
            let next = " ".repeat(self.indent_cache.len() * self.indent_size);
            self.indent_cache.push(next);
        }
        self.out.push_str(&self.indent_cache[depth]);
        self.out.push_str(content);
    }

    fn push_list_item(&mut self, depth: usize, content: &str) {
        let mut line = String::with_capacity(content.len() + 2);
        line.push_str("- ");
        line.push_str(content);
        self.push(depth, &line);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Encodes a value tree into TOON text.
pub(crate) fn encode_tree(value: &Value, options: &EncodeOptions) -> String {
    match value {
        Value::Array(arr) => {
            let mut encoder = Encoder::new(options);
            encoder.encode_array(None, arr, 0);
            encoder.writer.finish()
        }
        Value::Object(map) => {
            let mut encoder = Encoder::new(options);
            encoder.root_dotted = map.keys().filter(|k| k.contains('.')).cloned().collect();
            encoder.encode_object(map, 0, options.flatten_depth, "");
            encoder.writer.finish()
        }
        primitive => primitive_token(primitive, options.delimiter),
    }
}

/// Canonical token form of a primitive value.
fn primitive_token(value: &Value, delimiter: Delimiter) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => string_token(s, delimiter),
        // Containers never reach primitive position; every caller checks.
        Value::Array(_) | Value::Object(_) => "null".to_string(),
    }
}

fn string_token(s: &str, delimiter: Delimiter) -> String {
    if is_safe_unquoted_string(s, delimiter) {
        s.to_string()
    } else {
        quoted(s)
    }
}

fn key_token(key: &str) -> String {
    if is_valid_unquoted_key(key) {
        key.to_string()
    } else {
        quoted(key)
    }
}

fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    out.push_str(&escape(s));
    out.push('"');
    out
}

/// Column names for the tabular form: present iff the array is non-empty
/// and every element is an object with the same keys in the same order
/// and only primitive values.
fn tabular_fields(arr: &[Value]) -> Option<Vec<String>> {
    let first = arr.first()?.as_object()?;
    if first.is_empty() || !first.values().all(Value::is_primitive) {
        return None;
    }
    let fields: Vec<String> = first.keys().cloned().collect();
    for element in &arr[1..] {
        let obj = element.as_object()?;
        if obj.len() != fields.len() {
            return None;
        }
        for (i, (key, value)) in obj.iter().enumerate() {
            if key != &fields[i] || !value.is_primitive() {
                return None;
            }
        }
    }
    Some(fields)
}

fn all_primitive(arr: &[Value]) -> bool {
    arr.iter().all(Value::is_primitive)
}

fn all_primitive_arrays(arr: &[Value]) -> bool {
    arr.iter()
        .all(|v| matches!(v, Value::Array(inner) if all_primitive(inner)))
}

struct Encoder<'a> {
    options: &'a EncodeOptions,
    writer: LineWriter,
    /// Dotted literal keys present at the document root; folded paths may
    /// not collide with these.
    root_dotted: HashSet<String>,
}

impl<'a> Encoder<'a> {
    fn new(options: &'a EncodeOptions) -> Self {
        Encoder {
            options,
            writer: LineWriter::new(options.indent),
            root_dotted: HashSet::new(),
        }
    }

    fn delim(&self) -> char {
        self.options.delimiter.as_char()
    }

    /// Builds `key?[len<delim>?]{fields}?:`. The delimiter suffix only
    /// appears on headers whose body is delimiter-joined (inline and
    /// tabular forms).
    fn array_header(
        &self,
        key: Option<&str>,
        len: usize,
        fields: Option<&[String]>,
        include_delim: bool,
    ) -> String {
        let mut header = String::new();
        if let Some(key) = key {
            header.push_str(&key_token(key));
        }
        header.push('[');
        header.push_str(&len.to_string());
        if include_delim && self.options.delimiter != Delimiter::Comma {
            header.push(self.delim());
        }
        header.push(']');
        if let Some(fields) = fields {
            header.push('{');
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    header.push(self.delim());
                }
                header.push_str(&key_token(field));
            }
            header.push('}');
        }
        header.push(':');
        header
    }

    fn join_primitives(&self, arr: &[Value]) -> String {
        let mut out = String::new();
        for (i, value) in arr.iter().enumerate() {
            if i > 0 {
                out.push(self.delim());
            }
            out.push_str(&primitive_token(value, self.options.delimiter));
        }
        out
    }

    /// Single-line rendering of a primitive array, header included.
    fn inline_array_line(&self, key: Option<&str>, arr: &[Value]) -> String {
        if arr.is_empty() {
            return self.array_header(key, 0, None, false);
        }
        format!(
            "{} {}",
            self.array_header(key, arr.len(), None, true),
            self.join_primitives(arr)
        )
    }

    fn encode_object(&mut self, map: &Map, depth: usize, budget: usize, prefix: &str) {
        let siblings: HashSet<&str> = map.keys().map(String::as_str).collect();
        for (key, value) in map.iter() {
            self.encode_entry(key, value, depth, budget, prefix, &siblings);
        }
    }

    fn encode_entry(
        &mut self,
        key: &str,
        value: &Value,
        depth: usize,
        budget: usize,
        prefix: &str,
        siblings: &HashSet<&str>,
    ) {
        if self.options.key_folding == KeyFolding::Safe {
            if let Some(chain) = fold_entry(key, value, budget, siblings, prefix, &self.root_dotted)
            {
                self.encode_folded(chain, depth, budget, prefix);
                return;
            }
        }
        match value {
            Value::Array(arr) => self.encode_array(Some(key), arr, depth),
            Value::Object(obj) => {
                let line = format!("{}:", key_token(key));
                self.writer.push(depth, &line);
                if !obj.is_empty() {
                    let child_prefix = join_prefix(prefix, key);
                    self.encode_object(obj, depth + 1, self.options.flatten_depth, &child_prefix);
                }
            }
            primitive => {
                let line = format!(
                    "{}: {}",
                    key_token(key),
                    primitive_token(primitive, self.options.delimiter)
                );
                self.writer.push(depth, &line);
            }
        }
    }

    fn encode_folded(&mut self, chain: FoldedChain<'_>, depth: usize, budget: usize, prefix: &str) {
        let FoldedChain {
            path,
            segments_folded,
            leaf,
        } = chain;
        match leaf {
            Value::Array(arr) => self.encode_array(Some(&path), arr, depth),
            Value::Object(obj) if obj.is_empty() => {
                let line = format!("{}:", path);
                self.writer.push(depth, &line);
            }
            Value::Object(obj) => {
                // The chain stopped short of a leaf; the tail keeps the
                // unspent folding budget.
                let line = format!("{}:", path);
                self.writer.push(depth, &line);
                let child_prefix = join_prefix(prefix, &path);
                self.encode_object(obj, depth + 1, budget - segments_folded, &child_prefix);
            }
            primitive => {
                let line = format!(
                    "{}: {}",
                    path,
                    primitive_token(primitive, self.options.delimiter)
                );
                self.writer.push(depth, &line);
            }
        }
    }

    /// Emits an array under an optional key, selecting the form.
    fn encode_array(&mut self, key: Option<&str>, arr: &[Value], depth: usize) {
        if arr.is_empty() {
            let header = self.array_header(key, 0, None, false);
            self.writer.push(depth, &header);
            return;
        }
        if all_primitive(arr) {
            let line = self.inline_array_line(key, arr);
            self.writer.push(depth, &line);
            return;
        }
        if all_primitive_arrays(arr) {
            let header = self.array_header(key, arr.len(), None, false);
            self.writer.push(depth, &header);
            for element in arr {
                if let Value::Array(inner) = element {
                    let line = self.inline_array_line(None, inner);
                    self.writer.push_list_item(depth + 1, &line);
                }
            }
            return;
        }
        if let Some(fields) = tabular_fields(arr) {
            let header = self.array_header(key, arr.len(), Some(&fields), true);
            self.writer.push(depth, &header);
            self.encode_tabular_rows(arr, &fields, depth + 1);
            return;
        }
        let header = self.array_header(key, arr.len(), None, false);
        self.writer.push(depth, &header);
        self.encode_list_items(arr, depth + 1);
    }

    fn encode_tabular_rows(&mut self, arr: &[Value], fields: &[String], row_depth: usize) {
        for element in arr {
            if let Value::Object(obj) = element {
                let mut row = String::new();
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        row.push(self.delim());
                    }
                    let token = obj
                        .get(field)
                        .map(|v| primitive_token(v, self.options.delimiter))
                        .unwrap_or_else(|| "null".to_string());
                    row.push_str(&token);
                }
                self.writer.push(row_depth, &row);
            }
        }
    }

    /// Emits the expanded form's list items at `item_depth`.
    fn encode_list_items(&mut self, arr: &[Value], item_depth: usize) {
        for element in arr {
            match element {
                Value::Object(obj) if obj.is_empty() => self.writer.push(item_depth, "-"),
                Value::Object(obj) => self.encode_object_list_item(obj, item_depth),
                Value::Array(inner) if all_primitive(inner) => {
                    let line = self.inline_array_line(None, inner);
                    self.writer.push_list_item(item_depth, &line);
                }
                Value::Array(inner) => self.encode_array_as_list_item(None, inner, item_depth),
                primitive => {
                    let token = primitive_token(primitive, self.options.delimiter);
                    self.writer.push_list_item(item_depth, &token);
                }
            }
        }
    }

    /// Emits an array whose header sits on a hyphen line. The body, when
    /// it spans lines, indents two levels past the hyphen.
    fn encode_array_as_list_item(&mut self, key: Option<&str>, arr: &[Value], hyphen_depth: usize) {
        if arr.is_empty() {
            let line = self.array_header(key, 0, None, false);
            self.writer.push_list_item(hyphen_depth, &line);
            return;
        }
        if all_primitive(arr) {
            let line = self.inline_array_line(key, arr);
            self.writer.push_list_item(hyphen_depth, &line);
            return;
        }
        if all_primitive_arrays(arr) {
            let header = self.array_header(key, arr.len(), None, false);
            self.writer.push_list_item(hyphen_depth, &header);
            for element in arr {
                if let Value::Array(inner) = element {
                    let line = self.inline_array_line(None, inner);
                    self.writer.push_list_item(hyphen_depth + 2, &line);
                }
            }
            return;
        }
        if let Some(fields) = tabular_fields(arr) {
            let header = self.array_header(key, arr.len(), Some(&fields), true);
            self.writer.push_list_item(hyphen_depth, &header);
            self.encode_tabular_rows(arr, &fields, hyphen_depth + 2);
            return;
        }
        let header = self.array_header(key, arr.len(), None, false);
        self.writer.push_list_item(hyphen_depth, &header);
        self.encode_list_items(arr, hyphen_depth + 2);
    }

    /// Emits an object as a list item: first field on the hyphen line,
    /// remaining fields one level below it.
    fn encode_object_list_item(&mut self, obj: &Map, hyphen_depth: usize) {
        let mut entries = obj.iter();
        let (first_key, first_value) = match entries.next() {
            Some(entry) => entry,
            None => {
                self.writer.push(hyphen_depth, "-");
                return;
            }
        };
        match first_value {
            Value::Array(arr) => {
                self.encode_array_as_list_item(Some(first_key), arr, hyphen_depth);
            }
            Value::Object(inner) if inner.is_empty() => {
                let line = format!("{}:", key_token(first_key));
                self.writer.push_list_item(hyphen_depth, &line);
            }
            Value::Object(inner) => {
                let line = format!("{}:", key_token(first_key));
                self.writer.push_list_item(hyphen_depth, &line);
                self.encode_object(inner, hyphen_depth + 2, self.options.flatten_depth, "");
            }
            primitive => {
                let line = format!(
                    "{}: {}",
                    key_token(first_key),
                    primitive_token(primitive, self.options.delimiter)
                );
                self.writer.push_list_item(hyphen_depth, &line);
            }
        }
        let siblings: HashSet<&str> = obj.keys().map(String::as_str).collect();
        for (key, value) in entries {
            self.encode_entry(
                key,
                value,
                hyphen_depth + 1,
                self.options.flatten_depth,
                "",
                &siblings,
            );
        }
    }
}

fn join_prefix(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
