//! Structural comparison of JSON values
//!
//! Objects are compared key by key, arrays as multisets: ordering is ignored
//! but repeated items are counted. Every difference is reported as a
//! [`Change`] addressed by a `root['key']['nested']` path.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// A single difference between an expected and an actual value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// Key present in actual but not in expected
    KeyAdded { path: String, value: JsonValue },
    /// Key present in expected but absent from actual
    KeyRemoved { path: String, value: JsonValue },
    ValueChanged {
        path: String,
        expected: JsonValue,
        actual: JsonValue,
    },
    TypeChanged {
        path: String,
        expected_type: &'static str,
        actual_type: &'static str,
        expected: JsonValue,
        actual: JsonValue,
    },
    /// List item found in actual more often than expected
    ItemAdded {
        path: String,
        item: JsonValue,
        count: usize,
    },
    /// List item found in actual less often than expected
    ItemRemoved {
        path: String,
        item: JsonValue,
        count: usize,
    },
}

impl Change {
    pub fn path(&self) -> &str {
        match self {
            Change::KeyAdded { path, .. }
            | Change::KeyRemoved { path, .. }
            | Change::ValueChanged { path, .. }
            | Change::TypeChanged { path, .. }
            | Change::ItemAdded { path, .. }
            | Change::ItemRemoved { path, .. } => path,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::KeyAdded { path, value } => {
                write!(f, "- Unexpected key in actual: {path} (value: {value})")
            }
            Change::KeyRemoved { path, value } => {
                write!(f, "- Key missing in actual: {path} (expected: {value})")
            }
            Change::ValueChanged {
                path,
                expected,
                actual,
            } => write!(
                f,
                "- Value mismatch for key {path}: expected {expected}, got {actual}"
            ),
            Change::TypeChanged {
                path,
                expected_type,
                actual_type,
                ..
            } => write!(
                f,
                "- Type mismatch for key {path}: expected {expected_type}, got {actual_type}"
            ),
            Change::ItemAdded { path, item, count } => {
                write!(f, "- Unexpected item in list {path}: {item}")?;
                write_repetition(f, *count)
            }
            Change::ItemRemoved { path, item, count } => {
                write!(f, "- Missing item in list {path}: {item}")?;
                write_repetition(f, *count)
            }
        }
    }
}

fn write_repetition(f: &mut fmt::Formatter<'_>, count: usize) -> fmt::Result {
    if count > 1 {
        write!(f, " (x{count})")?;
    }
    Ok(())
}

/// All differences found by [`diff`]; empty means the values match
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JsonDiff {
    changes: Vec<Change>,
}

impl JsonDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Pretty JSON dump of every change
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for JsonDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changes.is_empty() {
            return write!(f, "No structured differences found.");
        }
        for (i, change) in self.changes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{change}")?;
        }
        Ok(())
    }
}

/// Compare `actual` against `expected`
pub fn diff(expected: &JsonValue, actual: &JsonValue) -> JsonDiff {
    let mut changes = Vec::new();
    compare("root", expected, actual, &mut changes);
    JsonDiff { changes }
}

fn compare(path: &str, expected: &JsonValue, actual: &JsonValue, out: &mut Vec<Change>) {
    match (expected, actual) {
        (JsonValue::Object(e), JsonValue::Object(a)) => compare_objects(path, e, a, out),
        (JsonValue::Array(e), JsonValue::Array(a)) => compare_arrays(path, e, a, out),
        _ if type_name(expected) != type_name(actual) => out.push(Change::TypeChanged {
            path: path.to_string(),
            expected_type: type_name(expected),
            actual_type: type_name(actual),
            expected: expected.clone(),
            actual: actual.clone(),
        }),
        _ if expected != actual => out.push(Change::ValueChanged {
            path: path.to_string(),
            expected: expected.clone(),
            actual: actual.clone(),
        }),
        _ => {}
    }
}

fn compare_objects(
    path: &str,
    expected: &Map<String, JsonValue>,
    actual: &Map<String, JsonValue>,
    out: &mut Vec<Change>,
) {
    let mut expected_keys: Vec<&String> = expected.keys().collect();
    expected_keys.sort();
    let mut actual_keys: Vec<&String> = actual.keys().collect();
    actual_keys.sort();

    for key in &expected_keys {
        if !actual.contains_key(key.as_str()) {
            out.push(Change::KeyRemoved {
                path: child_path(path, key),
                value: expected[key.as_str()].clone(),
            });
        }
    }

    for key in &actual_keys {
        if !expected.contains_key(key.as_str()) {
            out.push(Change::KeyAdded {
                path: child_path(path, key),
                value: actual[key.as_str()].clone(),
            });
        }
    }

    for key in &expected_keys {
        if let Some(actual_value) = actual.get(key.as_str()) {
            compare(
                &child_path(path, key),
                &expected[key.as_str()],
                actual_value,
                out,
            );
        }
    }
}

fn compare_arrays(path: &str, expected: &[JsonValue], actual: &[JsonValue], out: &mut Vec<Change>) {
    let expected_counts = tally(expected);
    let actual_counts = tally(actual);

    for (key, (count, item)) in &expected_counts {
        let found = actual_counts.get(key).map_or(0, |(c, _)| *c);
        if found < *count {
            out.push(Change::ItemRemoved {
                path: path.to_string(),
                item: (*item).clone(),
                count: count - found,
            });
        }
    }

    for (key, (count, item)) in &actual_counts {
        let wanted = expected_counts.get(key).map_or(0, |(c, _)| *c);
        if *count > wanted {
            out.push(Change::ItemAdded {
                path: path.to_string(),
                item: (*item).clone(),
                count: count - wanted,
            });
        }
    }
}

/// Occurrences of each distinct item, keyed by canonical form
fn tally(items: &[JsonValue]) -> BTreeMap<String, (usize, &JsonValue)> {
    let mut counts: BTreeMap<String, (usize, &JsonValue)> = BTreeMap::new();
    for item in items {
        counts.entry(canonical(item)).or_insert((0, item)).0 += 1;
    }
    counts
}

/// Order-independent serialization: sorted object keys, sorted array items
fn canonical(value: &JsonValue) -> String {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}:{}", JsonValue::String(k.clone()), canonical(v)))
                .collect();
            entries.sort();
            format!("{{{}}}", entries.join(","))
        }
        JsonValue::Array(items) => {
            let mut parts: Vec<String> = items.iter().map(canonical).collect();
            parts.sort();
            format!("[{}]", parts.join(","))
        }
        scalar => scalar.to_string(),
    }
}

fn child_path(parent: &str, key: &str) -> String {
    format!("{parent}['{key}']")
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_order_is_ignored() {
        let expected = json!({"usage": ["exertion", "sleep"]});
        let actual = json!({"usage": ["sleep", "exertion"]});
        assert!(diff(&expected, &actual).is_empty());
    }

    #[test]
    fn key_order_is_ignored() {
        let expected = json!({
            "device": "nebulizer",
            "accessories": ["mouthpiece", "tubing"],
            "diagnosis": "Asthma",
            "ordering_provider": "Dr. Foreman"
        });
        let actual = json!({
            "ordering_provider": "Dr. Foreman",
            "diagnosis": "Asthma",
            "accessories": ["tubing", "mouthpiece"],
            "device": "nebulizer"
        });
        assert!(diff(&expected, &actual).is_empty());
    }

    #[test]
    fn missing_key_is_reported() {
        let expected = json!({"diagnosis": "COPD", "device": "x"});
        let actual = json!({"device": "x"});
        let result = diff(&expected, &actual);

        assert_eq!(
            result.changes(),
            &[Change::KeyRemoved {
                path: "root['diagnosis']".to_string(),
                value: json!("COPD"),
            }]
        );
    }

    #[test]
    fn extra_key_fails_strict_comparison() {
        let expected = json!({"device": "CPAP"});
        let actual = json!({"device": "CPAP", "add_ons": ["humidifier"]});
        let result = diff(&expected, &actual);

        assert_eq!(result.len(), 1);
        assert!(matches!(
            &result.changes()[0],
            Change::KeyAdded { path, .. } if path == "root['add_ons']"
        ));
    }

    #[test]
    fn scalar_mismatch_is_reported() {
        let expected = json!({"device": "CPAP"});
        let actual = json!({"device": "BiPAP"});
        let result = diff(&expected, &actual);

        assert_eq!(
            result.changes(),
            &[Change::ValueChanged {
                path: "root['device']".to_string(),
                expected: json!("CPAP"),
                actual: json!("BiPAP"),
            }]
        );
    }

    #[test]
    fn type_mismatch_is_reported() {
        let expected = json!({"usage": ["sleep"]});
        let actual = json!({"usage": "sleep"});
        let result = diff(&expected, &actual);

        match &result.changes()[0] {
            Change::TypeChanged {
                path,
                expected_type,
                actual_type,
                ..
            } => {
                assert_eq!(path, "root['usage']");
                assert_eq!(*expected_type, "array");
                assert_eq!(*actual_type, "string");
            }
            other => panic!("unexpected change: {other:?}"),
        }
    }

    #[test]
    fn list_membership_differences() {
        let expected = json!({"features": ["trapeze bar", "side rails"]});
        let actual = json!({"features": ["trapeze bar", "bed alarm"]});
        let result = diff(&expected, &actual);

        assert_eq!(result.len(), 2);
        assert!(result.changes().contains(&Change::ItemRemoved {
            path: "root['features']".to_string(),
            item: json!("side rails"),
            count: 1,
        }));
        assert!(result.changes().contains(&Change::ItemAdded {
            path: "root['features']".to_string(),
            item: json!("bed alarm"),
            count: 1,
        }));
    }

    #[test]
    fn repeated_items_are_counted() {
        let expected = json!({"components": ["filters"]});
        let actual = json!({"components": ["filters", "filters", "filters"]});
        let result = diff(&expected, &actual);

        assert_eq!(
            result.changes(),
            &[Change::ItemAdded {
                path: "root['components']".to_string(),
                item: json!("filters"),
                count: 2,
            }]
        );
        assert!(result.to_string().ends_with("(x2)"));
    }

    #[test]
    fn nested_objects_recurse_with_paths() {
        let expected = json!({"order": {"provider": {"name": "Dr. House"}}});
        let actual = json!({"order": {"provider": {"name": "Dr. Wilson"}}});
        let result = diff(&expected, &actual);

        assert_eq!(result.changes()[0].path(), "root['order']['provider']['name']");
    }

    #[test]
    fn objects_inside_lists_compare_by_content() {
        let expected = json!([{"a": 1, "b": [1, 2]}, {"c": 3}]);
        let actual = json!([{"c": 3}, {"b": [2, 1], "a": 1}]);
        assert!(diff(&expected, &actual).is_empty());
    }

    #[test]
    fn bullet_rendering() {
        let expected = json!({"diagnosis": "COPD", "device": "CPAP"});
        let actual = json!({"device": "BiPAP"});
        let rendered = diff(&expected, &actual).to_string();

        assert_eq!(
            rendered,
            "- Key missing in actual: root['diagnosis'] (expected: \"COPD\")\n\
             - Value mismatch for key root['device']: expected \"CPAP\", got \"BiPAP\""
        );
        assert_eq!(
            JsonDiff::default().to_string(),
            "No structured differences found."
        );
    }

    #[test]
    fn structured_dump_tags_each_change() {
        let result = diff(&json!({"device": "CPAP"}), &json!({}));
        let dump: JsonValue =
            serde_json::from_str(&result.to_pretty_json().unwrap()).unwrap();

        assert_eq!(dump[0]["kind"], "key_removed");
        assert_eq!(dump[0]["path"], "root['device']");
    }
}
