//! Recursive-descent decoder: depth-tagged lines to a value tree.
//!
//! The decoder walks the scanned lines through a [`LineCursor`],
//! dispatching each line on its shape: array headers open inline, tabular
//! or list array bodies; everything else is a key-value line. Depth
//! comparisons drive scoping — a shallower line returns control to the
//! caller, a deeper one without an opener is an error.
//!
//! Two structural rules deserve a note:
//!
//! - **List-item first field.** When an array header sits on a hyphen
//!   line (`- users[2]{id,name}:`), the array body is indented two levels
//!   past the hyphen so the item's remaining fields can sit at one level.
//!   `decode_array_body` takes a flag that widens the body depth for this
//!   case.
//! - **Blank lines.** Blanks never appear in the cursor; they live in a
//!   side index that strict mode consults after reading an array body,
//!   rejecting any blank between the header and the last consumed line.
//!
//! Errors are fail-fast: the first problem aborts the whole decode.

use crate::error::{Error, Result};
use crate::expand;
use crate::options::{DecodeOptions, Delimiter, PathExpansion};
use crate::parser::{
    parse_array_header_line, parse_delimited_values, parse_key_token, parse_primitive_token,
    ArrayHeader, HeaderField,
};
use crate::scanner::{scan, LineCursor, ParsedLine};
use crate::syntax::{find_unquoted_char, LIST_ITEM_MARKER};
use crate::value::Value;
use crate::Map;

/// Decodes a whole TOON document into a value tree.
pub(crate) fn decode_str(text: &str, options: &DecodeOptions) -> Result<Value> {
    let scanned = scan(text, options.indent, options.strict)?;
    let mut decoder = Decoder {
        cursor: LineCursor::new(&scanned),
        line_count: scanned.lines.len(),
        options,
    };
    decoder.decode_document()
}

struct Decoder<'a> {
    cursor: LineCursor<'a>,
    line_count: usize,
    options: &'a DecodeOptions,
}

/// A line opens a list item if it is a bare hyphen (empty object) or
/// starts with the hyphen-space marker.
fn is_list_item(content: &str) -> bool {
    content == "-" || content.starts_with(LIST_ITEM_MARKER)
}

/// A data row has its first delimiter before any unquoted colon; anything
/// else at the same depth is a key-value continuation.
fn is_data_row(content: &str, delimiter: Delimiter) -> bool {
    let delim_pos = find_unquoted_char(content, delimiter.as_char(), 0);
    let colon_pos = find_unquoted_char(content, ':', 0);
    match (delim_pos, colon_pos) {
        (Some(d), Some(c)) => d < c,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => true,
    }
}

impl<'a> Decoder<'a> {
    fn header(&self, line: &ParsedLine) -> Result<Option<ArrayHeader>> {
        parse_array_header_line(
            &line.content,
            Delimiter::Comma,
            line.line_number,
            self.options.strict,
        )
    }

    fn decode_document(&mut self) -> Result<Value> {
        let first = match self.cursor.peek() {
            Some(line) => line,
            None => return Ok(Value::Object(Map::new())),
        };
        // A keyless header on the first line is a root array.
        if let Some(header) = self.header(first)? {
            if header.key.is_none() {
                self.cursor.advance();
                let value = self.decode_array_body(&header, first, false)?;
                self.ensure_consumed()?;
                return Ok(value);
            }
        }
        // A single line with no key shape is a bare primitive document.
        if self.line_count == 1 && find_unquoted_char(&first.content, ':', 0).is_none() {
            self.cursor.advance();
            return parse_primitive_token(&first.content, first.line_number);
        }
        let value = self.decode_object(first.depth)?;
        self.ensure_consumed()?;
        Ok(value)
    }

    fn ensure_consumed(&self) -> Result<()> {
        if let Some(line) = self.cursor.peek() {
            return Err(Error::syntax_in(
                line.line_number,
                1,
                "unexpected content after document root",
                &line.raw,
            ));
        }
        Ok(())
    }

    /// Decodes a mapping whose entries sit at the depth of the next line,
    /// which must be at least `min_depth`; otherwise the mapping is empty.
    fn decode_object(&mut self, min_depth: usize) -> Result<Value> {
        let mut map = Map::new();
        let item_depth = match self.cursor.peek() {
            Some(line) if line.depth >= min_depth => line.depth,
            _ => return Ok(Value::Object(map)),
        };
        while let Some(line) = self.cursor.peek() {
            if line.depth < item_depth {
                break;
            }
            if line.depth > item_depth {
                return Err(Error::syntax_in(
                    line.line_number,
                    line.indent + 1,
                    "unexpected indentation",
                    &line.raw,
                ));
            }
            self.decode_object_entry(&mut map, line)?;
        }
        Ok(Value::Object(map))
    }

    /// Decodes one entry (array header or key-value line) into `map` and
    /// consumes everything the entry owns.
    fn decode_object_entry(&mut self, map: &mut Map, line: &'a ParsedLine) -> Result<()> {
        if let Some(header) = self.header(line)? {
            let key = match header.key.clone() {
                Some(key) => key,
                None => {
                    return Err(Error::syntax_in(
                        line.line_number,
                        1,
                        "array header without a key inside an object",
                        &line.raw,
                    ));
                }
            };
            self.cursor.advance();
            let value = self.decode_array_body(&header, line, false)?;
            return self.insert_entry(map, key, header.key_was_quoted, value);
        }

        let (key, after, was_quoted) = parse_key_token(&line.content, 0, line.line_number)?;
        let rest = line.content[after..].trim();
        self.cursor.advance();
        let value = if rest.is_empty() {
            match self.cursor.peek() {
                Some(next) if next.depth > line.depth => self.decode_object(line.depth + 1)?,
                _ => Value::Object(Map::new()),
            }
        } else {
            parse_primitive_token(rest, line.line_number)?
        };
        self.insert_entry(map, key, was_quoted, value)
    }

    /// Inserts a decoded key, expanding dotted paths when enabled. Plain
    /// duplicate keys keep their position and take the new value.
    fn insert_entry(&self, map: &mut Map, key: String, was_quoted: bool, value: Value) -> Result<()> {
        if self.options.expand_paths == PathExpansion::Safe
            && !was_quoted
            && expand::is_expandable_key(&key)
        {
            expand::insert_expanded(map, &key, value, self.options.strict)
        } else {
            map.insert(key, value);
            Ok(())
        }
    }

    /// Decodes an array body given its already-consumed header line.
    ///
    /// `first_field_of_list_item` widens the body depth from one level to
    /// two below the header line, per the list-item first-field rule.
    fn decode_array_body(
        &mut self,
        header: &ArrayHeader,
        header_line: &'a ParsedLine,
        first_field_of_list_item: bool,
    ) -> Result<Value> {
        let body_depth = header_line.depth + if first_field_of_list_item { 2 } else { 1 };

        if !header.tail.is_empty() {
            let raw = parse_delimited_values(&header.tail, header.delimiter);
            let mut items = Vec::with_capacity(raw.len());
            for field in &raw {
                items.push(parse_primitive_token(field, header_line.line_number)?);
            }
            if self.options.strict && items.len() != header.length {
                return Err(Error::range(
                    header_line.line_number,
                    "array items",
                    header.length,
                    items.len(),
                ));
            }
            return Ok(Value::Array(items));
        }

        if let Some(fields) = &header.fields {
            return self.decode_tabular_rows(header, fields, header_line, body_depth);
        }

        if header.length == 0 {
            if self.options.strict {
                if let Some(next) = self.cursor.peek() {
                    if next.depth == body_depth && is_list_item(&next.content) {
                        return Err(Error::validation(
                            next.line_number,
                            "unexpected list item after empty array header",
                        ));
                    }
                }
            }
            return Ok(Value::Array(Vec::new()));
        }

        self.decode_list_items(header, header_line, body_depth)
    }

    fn decode_tabular_rows(
        &mut self,
        header: &ArrayHeader,
        fields: &[HeaderField],
        header_line: &'a ParsedLine,
        body_depth: usize,
    ) -> Result<Value> {
        let mut rows = Vec::with_capacity(header.length);
        if self.options.strict {
            for _ in 0..header.length {
                let line = match self.cursor.peek() {
                    Some(line) if line.depth == body_depth => line,
                    Some(line) if line.depth > body_depth => {
                        return Err(Error::syntax_in(
                            line.line_number,
                            line.indent + 1,
                            "unexpected indentation",
                            &line.raw,
                        ));
                    }
                    _ => {
                        return Err(Error::range(
                            header_line.line_number,
                            "tabular rows",
                            header.length,
                            rows.len(),
                        ));
                    }
                };
                self.cursor.advance();
                rows.push(self.decode_tabular_row(line, fields, header)?);
            }
            self.validate_no_extra_tabular_rows(header, body_depth)?;
            self.validate_no_blank_lines_in_range(
                header_line.line_number,
                self.cursor.last_line_number(),
            )?;
        } else {
            while let Some(line) = self.cursor.peek() {
                if line.depth != body_depth || !is_data_row(&line.content, header.delimiter) {
                    break;
                }
                self.cursor.advance();
                rows.push(self.decode_tabular_row(line, fields, header)?);
            }
        }
        Ok(Value::Array(rows))
    }

    fn decode_tabular_row(
        &self,
        line: &ParsedLine,
        fields: &[HeaderField],
        header: &ArrayHeader,
    ) -> Result<Value> {
        let values = parse_delimited_values(&line.content, header.delimiter);
        if self.options.strict && values.len() != fields.len() {
            return Err(Error::range(
                line.line_number,
                "row values",
                fields.len(),
                values.len(),
            ));
        }
        let mut row = Map::new();
        for (i, field) in fields.iter().enumerate() {
            let value = match values.get(i) {
                Some(raw) => parse_primitive_token(raw, line.line_number)?,
                None => Value::Null,
            };
            self.insert_entry(&mut row, field.name.clone(), field.was_quoted, value)?;
        }
        Ok(Value::Object(row))
    }

    fn decode_list_items(
        &mut self,
        header: &ArrayHeader,
        header_line: &'a ParsedLine,
        body_depth: usize,
    ) -> Result<Value> {
        let mut items = Vec::with_capacity(header.length);
        if self.options.strict {
            for _ in 0..header.length {
                let line = match self.cursor.peek() {
                    Some(line) if line.depth == body_depth && is_list_item(&line.content) => line,
                    Some(line) if line.depth == body_depth => {
                        return Err(Error::syntax_in(
                            line.line_number,
                            line.indent + 1,
                            "expected a list item",
                            &line.raw,
                        ));
                    }
                    Some(line) if line.depth > body_depth => {
                        return Err(Error::syntax_in(
                            line.line_number,
                            line.indent + 1,
                            "unexpected indentation",
                            &line.raw,
                        ));
                    }
                    _ => {
                        return Err(Error::range(
                            header_line.line_number,
                            "list items",
                            header.length,
                            items.len(),
                        ));
                    }
                };
                items.push(self.decode_list_item(line)?);
            }
            self.validate_no_extra_list_items(body_depth)?;
            self.validate_no_blank_lines_in_range(
                header_line.line_number,
                self.cursor.last_line_number(),
            )?;
        } else {
            while let Some(line) = self.cursor.peek() {
                if line.depth != body_depth || !is_list_item(&line.content) {
                    break;
                }
                items.push(self.decode_list_item(line)?);
            }
        }
        Ok(Value::Array(items))
    }

    /// Decodes one list item starting at its hyphen line.
    fn decode_list_item(&mut self, line: &'a ParsedLine) -> Result<Value> {
        self.cursor.advance();
        let content = &line.content;
        if content == "-" {
            return Ok(Value::Object(Map::new()));
        }
        let item = &content[LIST_ITEM_MARKER.len()..];

        // An array header after the hyphen: either a bare nested array or
        // the first field of an object. Both indent their bodies two
        // levels past the hyphen.
        if let Some(header) =
            parse_array_header_line(item, Delimiter::Comma, line.line_number, self.options.strict)?
        {
            return match header.key.clone() {
                None => self.decode_array_body(&header, line, true),
                Some(key) => {
                    let mut map = Map::new();
                    let value = self.decode_array_body(&header, line, true)?;
                    self.insert_entry(&mut map, key, header.key_was_quoted, value)?;
                    self.decode_list_item_siblings(&mut map, line)?;
                    Ok(Value::Object(map))
                }
            };
        }

        // A key-value token opens the object form of a list item.
        if find_unquoted_char(item, ':', 0).is_some() {
            let (key, after, was_quoted) = parse_key_token(item, 0, line.line_number)?;
            let rest = item[after..].trim();
            let value = if rest.is_empty() {
                match self.cursor.peek() {
                    Some(next) if next.depth > line.depth + 1 => {
                        self.decode_object(line.depth + 2)?
                    }
                    _ => Value::Object(Map::new()),
                }
            } else {
                parse_primitive_token(rest, line.line_number)?
            };
            let mut map = Map::new();
            self.insert_entry(&mut map, key, was_quoted, value)?;
            self.decode_list_item_siblings(&mut map, line)?;
            return Ok(Value::Object(map));
        }

        parse_primitive_token(item, line.line_number)
    }

    /// Reads the remaining fields of an object-form list item, which sit
    /// one level below the hyphen line.
    fn decode_list_item_siblings(&mut self, map: &mut Map, hyphen_line: &'a ParsedLine) -> Result<()> {
        let sibling_depth = hyphen_line.depth + 1;
        while let Some(line) = self.cursor.peek() {
            if line.depth != sibling_depth || is_list_item(&line.content) {
                break;
            }
            self.decode_object_entry(map, line)?;
        }
        Ok(())
    }

    fn validate_no_extra_tabular_rows(&self, header: &ArrayHeader, body_depth: usize) -> Result<()> {
        if let Some(next) = self.cursor.peek() {
            if next.depth == body_depth && is_data_row(&next.content, header.delimiter) {
                return Err(Error::validation(
                    next.line_number,
                    "unexpected row after the declared length",
                ));
            }
        }
        Ok(())
    }

    fn validate_no_extra_list_items(&self, body_depth: usize) -> Result<()> {
        if let Some(next) = self.cursor.peek() {
            if next.depth == body_depth && is_list_item(&next.content) {
                return Err(Error::validation(
                    next.line_number,
                    "unexpected list item after the declared length",
                ));
            }
        }
        Ok(())
    }

    fn validate_no_blank_lines_in_range(&self, start: usize, end: usize) -> Result<()> {
        if let Some(blank) = self.cursor.blank_between(start, end) {
            return Err(Error::validation(
                blank.line_number,
                "blank line inside array",
            ));
        }
        Ok(())
    }
}
