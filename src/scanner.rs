//! Line scanner: raw source text to depth-annotated logical lines.
//!
//! The scanner is a single pass over the input. Each non-blank physical
//! line becomes a [`ParsedLine`] carrying its indentation, content and
//! computed depth; blank lines are tracked in a separate index so the
//! decoder can enforce the no-blank-lines-inside-arrays rule without ever
//! seeing them in the main stream.
//!
//! Strict mode rejects tabs in indentation and any indent that is not an
//! exact multiple of the configured indent size.

use crate::error::{Error, Result};
use crate::syntax::is_whitespace;

/// One non-blank logical line of TOON source.
#[derive(Debug, Clone)]
pub(crate) struct ParsedLine {
    /// The original line without its trailing `\r`/`\n`.
    pub raw: String,
    /// Count of leading space characters. Tabs never count as indentation.
    pub indent: usize,
    /// The line with leading spaces removed.
    pub content: String,
    /// `indent / indent_size`, in whole levels.
    pub depth: usize,
    /// 1-based physical line number.
    pub line_number: usize,
}

/// A blank (empty or whitespace-only) line, kept out of the main stream.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BlankLine {
    pub line_number: usize,
    #[allow(dead_code)]
    pub depth: usize,
}

/// Scanner output: the logical lines plus the blank-line index.
#[derive(Debug)]
pub(crate) struct Lines {
    pub lines: Vec<ParsedLine>,
    pub blanks: Vec<BlankLine>,
}

/// Scans `source` into logical lines. Accepts LF and CRLF terminators.
pub(crate) fn scan(source: &str, indent_size: usize, strict: bool) -> Result<Lines> {
    let estimated = source.bytes().filter(|&b| b == b'\n').count() + 1;
    let mut lines = Vec::with_capacity(estimated);
    let mut blanks = Vec::new();

    for (idx, physical) in source.split('\n').enumerate() {
        let line_number = idx + 1;
        let raw = physical.strip_suffix('\r').unwrap_or(physical);

        let indent = raw.chars().take_while(|&c| c == ' ').count();
        let content = &raw[indent..];
        let depth = if indent_size == 0 { 0 } else { indent / indent_size };

        if content.chars().all(is_whitespace) {
            // The final empty segment after a trailing newline is not a line.
            if !(line_number == estimated && raw.is_empty()) {
                blanks.push(BlankLine { line_number, depth });
            }
            continue;
        }

        if strict {
            if content.starts_with('\t') {
                return Err(Error::indentation(
                    line_number,
                    "tabs not allowed in indentation",
                    raw,
                ));
            }
            if indent_size > 0 && indent % indent_size != 0 {
                return Err(Error::indentation(
                    line_number,
                    &format!(
                        "indent of {} spaces is not a multiple of {}",
                        indent, indent_size
                    ),
                    raw,
                ));
            }
        }

        lines.push(ParsedLine {
            raw: raw.to_string(),
            indent,
            content: content.to_string(),
            depth,
            line_number,
        });
    }

    Ok(Lines { lines, blanks })
}

/// Forward-only cursor over scanned lines.
///
/// `peek` hands out references tied to the underlying line storage rather
/// than to the cursor itself, so a caller can hold a line across
/// `advance` calls.
pub(crate) struct LineCursor<'a> {
    lines: &'a [ParsedLine],
    blanks: &'a [BlankLine],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(scanned: &'a Lines) -> Self {
        LineCursor {
            lines: &scanned.lines,
            blanks: &scanned.blanks,
            pos: 0,
        }
    }

    /// The line the cursor currently points at, without consuming it.
    pub(crate) fn peek(&self) -> Option<&'a ParsedLine> {
        self.lines.get(self.pos)
    }

    /// Consumes and returns the current line.
    pub(crate) fn next(&mut self) -> Option<&'a ParsedLine> {
        let line = self.lines.get(self.pos);
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    /// Moves past the current line.
    pub(crate) fn advance(&mut self) {
        if self.pos < self.lines.len() {
            self.pos += 1;
        }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Line number of the most recently consumed line, or 0 if none.
    pub(crate) fn last_line_number(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.lines[self.pos - 1].line_number
        }
    }

    /// First blank line strictly between the two physical line numbers.
    pub(crate) fn blank_between(&self, start: usize, end: usize) -> Option<&'a BlankLine> {
        self.blanks
            .iter()
            .find(|b| b.line_number > start && b.line_number < end)
    }
}
