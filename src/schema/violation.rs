//! Validation violations and field paths
//!
//! Violations are data, not errors: the engine accumulates every violation it
//! finds in a candidate and returns them together with the normalized value.
//!
//! Violation kinds:
//! - MissingRequiredField: required field absent and no default declared
//! - TypeMismatch: value kind differs from the node kind
//! - ValueNotInEnum: value outside the declared `enum`
//! - OutOfRange: numeric value outside `minimum`/`maximum`
//! - DuplicateItem: repeated element in a `uniqueItems` array
//! - LimitExceeded: nesting depth or array length over the configured limit

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One step in a path from the configuration root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object field name
    Key(String),
    /// Array element index
    Index(usize),
}

/// Location of a field inside a candidate configuration.
///
/// Serialized as an array of keys and indices, e.g. `["topics", 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The configuration root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path extended by an object key.
    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(name.into()));
        Self(segments)
    }

    /// Returns a new path extended by an array index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Nesting depth of the path (root is 0).
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "$root");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> From<Vec<S>> for FieldPath {
    fn from(keys: Vec<S>) -> Self {
        Self(keys.into_iter().map(|k| PathSegment::Key(k.into())).collect())
    }
}

/// Kinds of per-field validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationKind {
    MissingRequiredField,
    TypeMismatch,
    ValueNotInEnum,
    OutOfRange,
    DuplicateItem,
    LimitExceeded,
}

impl ViolationKind {
    /// Returns the stable string code for this violation kind
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingRequiredField => "STAGE_MISSING_REQUIRED_FIELD",
            ViolationKind::TypeMismatch => "STAGE_TYPE_MISMATCH",
            ViolationKind::ValueNotInEnum => "STAGE_VALUE_NOT_IN_ENUM",
            ViolationKind::OutOfRange => "STAGE_OUT_OF_RANGE",
            ViolationKind::DuplicateItem => "STAGE_DUPLICATE_ITEM",
            ViolationKind::LimitExceeded => "STAGE_LIMIT_EXCEEDED",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Expected condition versus what the candidate actually held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationDetail {
    pub expected: String,
    pub actual: String,
}

/// A single validation failure at a specific path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: FieldPath,
    pub kind: ViolationKind,
    pub detail: ViolationDetail,
}

impl Violation {
    pub fn new(
        path: FieldPath,
        kind: ViolationKind,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path,
            kind,
            detail: ViolationDetail {
                expected: expected.into(),
                actual: actual.into(),
            },
        }
    }

    pub fn missing_field(path: FieldPath) -> Self {
        Self::new(path, ViolationKind::MissingRequiredField, "field to be present", "missing")
    }

    pub fn type_mismatch(path: FieldPath, expected: &str, actual: &str) -> Self {
        Self::new(path, ViolationKind::TypeMismatch, expected, actual)
    }

    pub fn not_in_enum(path: FieldPath, allowed: &[Value], actual: &Value) -> Self {
        let allowed: Vec<String> = allowed.iter().map(Value::to_string).collect();
        Self::new(
            path,
            ViolationKind::ValueNotInEnum,
            format!("one of [{}]", allowed.join(", ")),
            actual.to_string(),
        )
    }

    pub fn out_of_range(path: FieldPath, bound: impl Into<String>, actual: &Value) -> Self {
        Self::new(path, ViolationKind::OutOfRange, bound, actual.to_string())
    }

    pub fn duplicate_item(path: FieldPath, first_index: usize) -> Self {
        Self::new(
            path,
            ViolationKind::DuplicateItem,
            "unique items",
            format!("duplicate of item {}", first_index),
        )
    }

    pub fn limit_exceeded(
        path: FieldPath,
        limit: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(path, ViolationKind::LimitExceeded, limit, actual)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.path, self.detail.expected, self.detail.actual
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_display() {
        let path = FieldPath::root().key("default-request").key("headers");
        assert_eq!(path.to_string(), "default-request.headers");

        let path = FieldPath::root().key("topics").index(1);
        assert_eq!(path.to_string(), "topics[1]");

        assert_eq!(FieldPath::root().to_string(), "$root");
    }

    #[test]
    fn test_path_serializes_keys_and_indices() {
        let path = FieldPath::root().key("topics").index(3);
        assert_eq!(serde_json::to_value(&path).unwrap(), json!(["topics", 3]));
    }

    #[test]
    fn test_path_depth() {
        assert!(FieldPath::root().is_root());
        assert_eq!(FieldPath::from(vec!["a", "b"]).depth(), 2);
    }

    #[test]
    fn test_violation_display() {
        let v = Violation::type_mismatch(FieldPath::root().key("port"), "integer", "string");
        let display = format!("{}", v);
        assert!(display.contains("port"));
        assert!(display.contains("integer"));
        assert!(display.contains("string"));
    }

    #[test]
    fn test_violation_serialization() {
        let v = Violation::missing_field(FieldPath::root().key("uri"));
        let value = serde_json::to_value(&v).unwrap();
        assert_eq!(value["path"], json!(["uri"]));
        assert_eq!(value["kind"], "MissingRequiredField");
        assert_eq!(value["detail"]["actual"], "missing");
    }

    #[test]
    fn test_enum_violation_lists_allowed_values() {
        let v = Violation::not_in_enum(
            FieldPath::root().key("method"),
            &[json!("POST"), json!("GET")],
            &json!("PUT"),
        );
        assert_eq!(v.detail.expected, "one of [\"POST\", \"GET\"]");
        assert_eq!(v.detail.actual, "\"PUT\"");
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(ViolationKind::MissingRequiredField.code(), "STAGE_MISSING_REQUIRED_FIELD");
        assert_eq!(ViolationKind::DuplicateItem.code(), "STAGE_DUPLICATE_ITEM");
    }
}
