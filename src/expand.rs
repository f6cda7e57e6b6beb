//! Dotted-key path expansion.
//!
//! With `PathExpansion::Safe`, a decoded key like `a.b.c` is split on its
//! dots and the value is merged at the nested path, turning folded output
//! back into nested objects. Only keys whose every segment is a plain
//! identifier are eligible, and keys that were quoted in the source are
//! never expanded — the decoder checks both before calling in here.
//!
//! Conflicts follow the strictness of the decode: in strict mode a
//! non-object in the path raises a `PathExpansion` error; in lenient mode
//! the last write wins. Two objects meeting at the same path deep-merge.

use crate::error::{Error, Result};
use crate::syntax::is_identifier_segment;
use crate::value::Value;
use crate::Map;

/// Is this key eligible for expansion? It must contain a dot and every
/// dot-separated segment must be an identifier.
pub(crate) fn is_expandable_key(key: &str) -> bool {
    key.contains('.') && key.split('.').all(is_identifier_segment)
}

/// Merges `value` into `map` at the dotted path `key`.
pub(crate) fn insert_expanded(map: &mut Map, key: &str, value: Value, strict: bool) -> Result<()> {
    let segments: Vec<&str> = key.split('.').collect();
    insert_at_path(map, &segments, value, strict, key)
}

fn insert_at_path(
    map: &mut Map,
    segments: &[&str],
    value: Value,
    strict: bool,
    full_path: &str,
) -> Result<()> {
    let seg = segments[0];
    if segments.len() == 1 {
        return assign_leaf(map, seg, value, strict, full_path);
    }
    let needs_fresh_object = match map.get(seg) {
        Some(Value::Object(_)) => false,
        Some(other) => {
            if strict {
                return Err(Error::path_expansion(seg, other.type_name()));
            }
            true
        }
        None => true,
    };
    if needs_fresh_object {
        map.insert(seg.to_string(), Value::Object(Map::new()));
    }
    match map.get_mut(seg) {
        Some(Value::Object(inner)) => insert_at_path(inner, &segments[1..], value, strict, full_path),
        _ => Err(Error::custom("path expansion lost its intermediate object")),
    }
}

fn assign_leaf(map: &mut Map, seg: &str, value: Value, strict: bool, full_path: &str) -> Result<()> {
    if !map.contains_key(seg) {
        map.insert(seg.to_string(), value);
        return Ok(());
    }
    let existing_is_object = matches!(map.get(seg), Some(Value::Object(_)));
    match value {
        Value::Object(incoming) if existing_is_object => {
            if let Some(Value::Object(existing)) = map.get_mut(seg) {
                deep_merge(existing, incoming, strict)
            } else {
                Err(Error::custom("path expansion lost its target object"))
            }
        }
        other => {
            if strict && existing_is_object != other.is_object() {
                let found = map.get(seg).map(|v| v.type_name()).unwrap_or("value");
                return Err(Error::path_expansion(full_path, found));
            }
            map.insert(seg.to_string(), other);
            Ok(())
        }
    }
}

fn deep_merge(dst: &mut Map, src: Map, strict: bool) -> Result<()> {
    for (key, value) in src {
        if !dst.contains_key(&key) {
            dst.insert(key, value);
            continue;
        }
        let existing_is_object = matches!(dst.get(&key), Some(Value::Object(_)));
        match value {
            Value::Object(incoming) if existing_is_object => {
                if let Some(Value::Object(existing)) = dst.get_mut(&key) {
                    deep_merge(existing, incoming, strict)?;
                }
            }
            other => {
                if strict && existing_is_object != other.is_object() {
                    let found = dst.get(&key).map(|v| v.type_name()).unwrap_or("value");
                    return Err(Error::path_expansion(&key, found));
                }
                dst.insert(key, other);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn eligibility() {
        assert!(is_expandable_key("a.b"));
        assert!(is_expandable_key("a.b.c"));
        assert!(!is_expandable_key("plain"));
        assert!(!is_expandable_key("a..b"));
        assert!(!is_expandable_key("a.1b"));
        assert!(!is_expandable_key(".a"));
    }

    #[test]
    fn builds_nested_objects() {
        let mut map = Map::new();
        insert_expanded(&mut map, "a.b.c", Value::from(1), true).unwrap();
        insert_expanded(&mut map, "a.b.d", Value::from(2), true).unwrap();
        let a = map.get("a").unwrap().as_object().unwrap();
        let b = a.get("b").unwrap().as_object().unwrap();
        assert_eq!(b.get("c"), Some(&Value::from(1)));
        assert_eq!(b.get("d"), Some(&Value::from(2)));
    }

    #[test]
    fn strict_conflict_on_non_object_intermediate() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::from(1));
        let err = insert_expanded(&mut map, "a.b", Value::from(2), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathExpansion);
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn lenient_conflict_overwrites() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::from(1));
        insert_expanded(&mut map, "a.b", Value::from(2), false).unwrap();
        let a = map.get("a").unwrap().as_object().unwrap();
        assert_eq!(a.get("b"), Some(&Value::from(2)));
    }

    #[test]
    fn leaf_conflict_between_object_and_scalar() {
        let mut map = Map::new();
        let mut nested = Map::new();
        nested.insert("x".to_string(), Value::from(1));
        map.insert("a".to_string(), Value::Object(nested));

        let err = insert_expanded(&mut map, "a", Value::from(5), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathExpansion);
    }

    #[test]
    fn objects_deep_merge_at_leaf() {
        let mut map = Map::new();
        insert_expanded(&mut map, "a.b", Value::from(1), true).unwrap();
        let mut incoming = Map::new();
        incoming.insert("c".to_string(), Value::from(2));
        insert_expanded(&mut map, "a", Value::Object(incoming), true).unwrap();

        let a = map.get("a").unwrap().as_object().unwrap();
        assert_eq!(a.get("b"), Some(&Value::from(1)));
        assert_eq!(a.get("c"), Some(&Value::from(2)));
    }
}
