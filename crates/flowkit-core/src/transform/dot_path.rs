//! Plain property-path lookup (`a.b[0].c`, `a["x.y"]`)
//!
//! This is the notation ingest processors accept for their input side.
//! Missing structure never fails; it resolves to `None`.

use serde_json::Value;

/// Split a dot path into property names
///
/// Bracketed segments may be bare (`[0]`) or quoted (`["a.b"]`, `['a']`).
/// Returns `None` for an unterminated bracket.
pub fn segments(path: &str) -> Option<Vec<String>> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut after_bracket = false;
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !after_bracket {
                    out.push(std::mem::take(&mut current));
                }
                after_bracket = false;
            }
            '[' => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                let mut name = String::new();
                match chars.peek().copied() {
                    Some(quote @ ('"' | '\'')) => {
                        chars.next();
                        loop {
                            match chars.next()? {
                                '\\' => name.push(chars.next()?),
                                ch if ch == quote => break,
                                ch => name.push(ch),
                            }
                        }
                        if chars.next()? != ']' {
                            return None;
                        }
                    }
                    _ => loop {
                        match chars.next()? {
                            ']' => break,
                            ch => name.push(ch),
                        }
                    },
                }
                out.push(name);
                after_bracket = true;
            }
            other => {
                after_bracket = false;
                current.push(other);
            }
        }
    }
    if !after_bracket {
        out.push(current);
    }
    Some(out)
}

/// Nested property lookup
///
/// A path that is itself a key of `root` is looked up directly, so keys
/// containing dots stay reachable. Numeric names index arrays.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    if let Some(direct) = root.as_object().and_then(|obj| obj.get(path)) {
        return Some(direct);
    }

    segments(path)?
        .iter()
        .try_fold(root, |node, name| match node {
            Value::Object(map) => map.get(name),
            Value::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Rewrite a dot path into a form both JSONPath and the pipeline backend accept
///
/// The first segment is kept as written. Later segments that start with an
/// integer become `[n]`, and segments containing `-` become `["seg"]`.
pub fn sanitize_json_path(path: &str) -> String {
    let mut parts = path.split('.');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        if has_integer_prefix(part) {
            out.push_str(&format!("[{}]", part));
        } else if part.contains('-') {
            out.push_str(&format!("[\"{}\"]", part));
        } else {
            out.push('.');
            out.push_str(part);
        }
    }
    out
}

/// Leading whitespace, an optional sign, then at least one digit
fn has_integer_prefix(segment: &str) -> bool {
    let trimmed = segment.trim_start();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    unsigned.chars().next().is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segments() {
        assert_eq!(segments("a.b.c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(segments("a[0].b").unwrap(), vec!["a", "0", "b"]);
        assert_eq!(segments("a[\"x.y\"].z").unwrap(), vec!["a", "x.y", "z"]);
        assert_eq!(segments("a['q']").unwrap(), vec!["a", "q"]);
        assert!(segments("a[0").is_none());
        assert!(segments("a['x").is_none());
    }

    #[test]
    fn test_nested_lookup() {
        let doc = json!({"a": {"b": [{"c": 1}, {"c": 2}]}, "x.y": "dotted"});
        assert_eq!(get(&doc, "a.b[1].c"), Some(&json!(2)));
        assert_eq!(get(&doc, "a.b.0.c"), Some(&json!(1)));
        assert_eq!(get(&doc, "x.y"), Some(&json!("dotted")));
        assert_eq!(get(&doc, "a.missing.c"), None);
        assert_eq!(get(&doc, "a.b.c"), None);
        assert_eq!(get(&doc, ""), None);
    }

    #[test]
    fn test_scalars_have_no_properties() {
        assert_eq!(get(&json!("text"), "length"), None);
        assert_eq!(get(&json!(null), "a"), None);
    }

    #[test]
    fn test_sanitize_json_path() {
        assert_eq!(sanitize_json_path("a.b.c"), "a.b.c");
        assert_eq!(sanitize_json_path("items.0.text"), "items[0].text");
        assert_eq!(sanitize_json_path("a.my-field.b"), "a[\"my-field\"].b");
        assert_eq!(sanitize_json_path("0.a"), "0.a");
        assert_eq!(sanitize_json_path("a.2abc"), "a[2abc]");
        assert_eq!(sanitize_json_path("a.-1"), "a[-1]");
        assert_eq!(sanitize_json_path(""), "");
    }
}
