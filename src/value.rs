//! Duck-typed access helpers over JSON values.

use serde_json::{Map, Value};

/// Try each candidate path in turn and return the first value found.
///
/// Used by evaluators that must drill through several vendor nesting
/// conventions (singular vs. plural keys, differently-cased wrappers) for
/// the same logical field.
pub fn first_path<'a>(map: &'a Map<String, Value>, paths: &[&[&str]]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        let (first, rest) = path.split_first()?;
        let mut current = map.get(*first)?;
        for key in rest {
            current = current.get(*key)?;
        }
        Some(current)
    })
}

/// Loose truthiness over vendor flag values.
///
/// Vendors report flags as booleans, as strings (`"true"`, `"enabled"`,
/// `"yes"`), or as numbers. Anything else is false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            s == "true" || s == "enabled" || s == "yes"
        }
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Case-insensitive substring match against a fixed vocabulary.
pub fn contains_keyword(text: &str, vocabulary: &[&str]) -> bool {
    let haystack = text.to_ascii_lowercase();
    vocabulary
        .iter()
        .any(|needle| haystack.contains(&needle.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_path_prefers_earlier_candidates() {
        let map = json!({
            "Wrapped": {"Items": [1]},
            "Items": [2]
        });
        let Value::Object(map) = map else {
            unreachable!()
        };
        let found = first_path(&map, &[&["Wrapped", "Items"], &["Items"]]).unwrap();
        assert_eq!(found, &json!([1]));
    }

    #[test]
    fn test_first_path_falls_back() {
        let map = json!({"Item": {"id": 7}});
        let Value::Object(map) = map else {
            unreachable!()
        };
        let found = first_path(&map, &[&["Items"], &["Item", "id"]]).unwrap();
        assert_eq!(found, &json!(7));
    }

    #[test]
    fn test_truthy_accepts_vendor_spellings() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!("Enabled")));
        assert!(truthy(&json!("yes")));
        assert!(truthy(&json!(1)));
        assert!(!truthy(&json!("disabled")));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!({"nested": true})));
    }

    #[test]
    fn test_contains_keyword_is_case_insensitive() {
        let vocab = &["saml", "single sign-on"];
        assert!(contains_keyword("user.authentication.SAML assertion", vocab));
        assert!(contains_keyword("Single Sign-On session started", vocab));
        assert!(!contains_keyword("password login", vocab));
    }
}
