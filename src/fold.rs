//! Key folding: collapsing chains of single-key objects into dotted paths.
//!
//! With `KeyFolding::Safe`, an entry like `a: {b: {c: 1}}` becomes the
//! single line `a.b.c: 1`. Folding is conservative: every segment must be
//! a plain identifier, the folded key must not collide with a sibling key
//! or a dotted literal key at the document root, and the chain length is
//! capped by the `flatten_depth` option.

use crate::syntax::is_identifier_segment;
use crate::value::Value;
use std::collections::HashSet;

/// The result of walking a foldable chain: the dotted path, how many
/// segments it absorbed, and the value left at the end of the chain.
pub(crate) struct FoldedChain<'v> {
    pub path: String,
    pub segments_folded: usize,
    pub leaf: &'v Value,
}

/// Tries to fold the entry `(key, value)`.
///
/// The walk descends while the current value is a single-key object whose
/// key is an identifier, stopping at `budget` segments. Folding is
/// rejected outright when fewer than two segments were collected or the
/// dotted path collides with a sibling key or (after prefixing) with a
/// dotted literal key at the root.
pub(crate) fn fold_entry<'v>(
    key: &str,
    value: &'v Value,
    budget: usize,
    siblings: &HashSet<&str>,
    prefix: &str,
    root_dotted: &HashSet<String>,
) -> Option<FoldedChain<'v>> {
    if budget < 2 {
        return None;
    }
    if !matches!(value, Value::Object(m) if !m.is_empty()) {
        return None;
    }
    if !is_identifier_segment(key) {
        return None;
    }

    let mut path = key.to_string();
    let mut segments_folded = 1;
    let mut leaf = value;
    loop {
        let inner = match leaf {
            Value::Object(m) if m.len() == 1 && segments_folded < budget => m,
            _ => break,
        };
        let (next_key, next_value) = match inner.iter().next() {
            Some(entry) => entry,
            None => break,
        };
        if !is_identifier_segment(next_key) {
            break;
        }
        path.push('.');
        path.push_str(next_key);
        segments_folded += 1;
        leaf = next_value;
    }

    if segments_folded < 2 {
        return None;
    }
    if siblings.contains(path.as_str()) {
        return None;
    }
    if !root_dotted.is_empty() {
        let full = if prefix.is_empty() {
            path.clone()
        } else {
            format!("{}.{}", prefix, path)
        };
        if root_dotted.contains(&full) {
            return None;
        }
    }

    Some(FoldedChain {
        path,
        segments_folded,
        leaf,
    })
}
