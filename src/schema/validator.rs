//! Validation and defaulting engine
//!
//! Walks a candidate configuration against a schema tree, depth-first over the
//! schema (not over the candidate):
//! - Absent fields take their declared default
//! - Absent required fields without a default are violations
//! - Present values are type checked, then checked against `enum` and bounds
//! - Undeclared object keys pass through unchanged
//! - Absent optional objects and arrays are treated as empty
//!
//! Validation never stops at the first violation. It does not mutate the
//! candidate or the schema and is deterministic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

use super::catalog::Catalog;
use super::errors::SchemaResult;
use super::types::{LeafRules, NodeKind, SchemaNode, Shape};
use super::violation::{FieldPath, Violation, ViolationKind};

/// Bounds on the work a single validation call may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Deepest candidate nesting level accepted (root is 0)
    pub max_depth: usize,
    /// Longest array whose elements are validated
    pub max_array_len: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_array_len: 4096,
        }
    }
}

/// Outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// True iff `violations` is empty
    pub ok: bool,
    /// Candidate with defaults applied and pass-through fields preserved
    pub normalized: Value,
    pub violations: Vec<Violation>,
    /// Paths whose value came from a schema default
    pub defaulted: Vec<FieldPath>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Violations of a single kind, in discovery order.
    pub fn violations_of(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// Hands the normalized value to the runtime, only if it was accepted.
    pub fn into_accepted(self) -> Result<Value, Vec<Violation>> {
        if self.ok {
            Ok(self.normalized)
        } else {
            Err(self.violations)
        }
    }
}

/// Stage-level validator backed by a catalog.
pub struct Validator<'a> {
    catalog: &'a Catalog,
    limits: ValidationLimits,
}

impl<'a> Validator<'a> {
    /// Creates a validator with default limits.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_limits(catalog, ValidationLimits::default())
    }

    pub fn with_limits(catalog: &'a Catalog, limits: ValidationLimits) -> Self {
        Self { catalog, limits }
    }

    pub fn limits(&self) -> ValidationLimits {
        self.limits
    }

    /// Validates a raw stage configuration.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the category or stage type is unknown
    /// (STAGE_UNKNOWN_CATEGORY, STAGE_UNKNOWN_TYPE). Field problems are
    /// reported as violations in the returned report, never as errors.
    pub fn validate_stage(
        &self,
        category: &str,
        type_key: &str,
        candidate: &Value,
    ) -> SchemaResult<ValidationReport> {
        let node = self.catalog.lookup_str(category, type_key)?;
        Ok(validate_with_limits(node, candidate, &self.limits))
    }
}

/// Validates a candidate against a node using default limits.
pub fn validate(node: &SchemaNode, candidate: &Value) -> ValidationReport {
    validate_with_limits(node, candidate, &ValidationLimits::default())
}

/// Validates a candidate against a node. A null candidate counts as absent.
pub fn validate_with_limits(
    node: &SchemaNode,
    candidate: &Value,
    limits: &ValidationLimits,
) -> ValidationReport {
    let mut walk = Walk {
        limits,
        violations: Vec::new(),
        defaulted: Vec::new(),
    };
    let present = if candidate.is_null() { None } else { Some(candidate) };
    let normalized = walk
        .node(node, present, &FieldPath::root())
        .unwrap_or(Value::Null);

    ValidationReport {
        ok: walk.violations.is_empty(),
        normalized,
        violations: walk.violations,
        defaulted: walk.defaulted,
    }
}

/// Accumulator for one validation call.
struct Walk<'l> {
    limits: &'l ValidationLimits,
    violations: Vec<Violation>,
    defaulted: Vec<FieldPath>,
}

impl Walk<'_> {
    /// Returns the normalized value for `node`, or None when the field stays absent.
    fn node<'a>(
        &mut self,
        node: &'a SchemaNode,
        candidate: Option<&'a Value>,
        path: &FieldPath,
    ) -> Option<Value> {
        let value: Cow<'a, Value> = match candidate {
            // Depth is measured on the candidate; defaults come from the catalog
            Some(value) if path.depth() > self.limits.max_depth => {
                self.depth_exceeded(path);
                return Some(value.clone());
            }
            Some(value) => Cow::Borrowed(value),
            None => match (&node.default, &node.shape) {
                (Some(default), _) => {
                    self.defaulted.push(path.clone());
                    Cow::Borrowed(default)
                }
                (None, _) if node.required => {
                    self.violations.push(Violation::missing_field(path.clone()));
                    return None;
                }
                (None, Shape::Object { .. } | Shape::OpenObject) => {
                    Cow::Owned(Value::Object(Map::new()))
                }
                (None, Shape::Array { .. }) => Cow::Owned(Value::Array(Vec::new())),
                (None, _) => return None,
            },
        };

        let normalized = match &node.shape {
            Shape::String(rules) => self.leaf(NodeKind::String, rules, &value, path),
            Shape::Integer(rules) => self.leaf(NodeKind::Integer, rules, &value, path),
            Shape::Number(rules) => self.leaf(NodeKind::Number, rules, &value, path),
            Shape::Boolean(rules) => self.leaf(NodeKind::Boolean, rules, &value, path),
            Shape::Object { properties } => self.object(properties, &value, path),
            Shape::OpenObject => self.open_object(&value, path),
            Shape::Array {
                items,
                unique_items,
            } => self.array(items, *unique_items, &value, path),
        };
        Some(normalized)
    }

    fn leaf(&mut self, kind: NodeKind, rules: &LeafRules, value: &Value, path: &FieldPath) -> Value {
        if !kind_matches(kind, value) {
            self.violations.push(Violation::type_mismatch(
                path.clone(),
                kind.type_name(),
                json_type_name(value),
            ));
            return self.carry(value, path);
        }

        if let Some(allowed) = &rules.allowed {
            if !allowed.contains(value) {
                self.violations
                    .push(Violation::not_in_enum(path.clone(), allowed, value));
            }
        }

        if let Some(n) = value.as_f64() {
            if let Some(minimum) = &rules.minimum {
                if minimum.as_f64().is_some_and(|min| n < min) {
                    self.violations.push(Violation::out_of_range(
                        path.clone(),
                        format!("value >= {}", minimum),
                        value,
                    ));
                }
            }
            if let Some(maximum) = &rules.maximum {
                if maximum.as_f64().is_some_and(|max| n > max) {
                    self.violations.push(Violation::out_of_range(
                        path.clone(),
                        format!("value <= {}", maximum),
                        value,
                    ));
                }
            }
        }

        value.clone()
    }

    fn object(
        &mut self,
        properties: &[(String, SchemaNode)],
        value: &Value,
        path: &FieldPath,
    ) -> Value {
        let fields = match value.as_object() {
            Some(fields) => fields,
            None => {
                self.violations.push(Violation::type_mismatch(
                    path.clone(),
                    "object",
                    json_type_name(value),
                ));
                return self.carry(value, path);
            }
        };

        let mut normalized = Map::new();
        for (name, child) in properties {
            // Null is how forms submit a cleared field
            let field = fields.get(name).filter(|v| !v.is_null());
            if let Some(v) = self.node(child, field, &path.key(name.as_str())) {
                normalized.insert(name.clone(), v);
            }
        }

        for (name, v) in fields {
            let declared = properties.iter().any(|(declared, _)| declared == name);
            if !declared {
                let carried = self.carry(v, &path.key(name.as_str()));
                normalized.insert(name.clone(), carried);
            }
        }

        Value::Object(normalized)
    }

    fn open_object(&mut self, value: &Value, path: &FieldPath) -> Value {
        if !value.is_object() {
            self.violations.push(Violation::type_mismatch(
                path.clone(),
                "object",
                json_type_name(value),
            ));
        }
        self.carry(value, path)
    }

    fn array(&mut self, items: &SchemaNode, unique: bool, value: &Value, path: &FieldPath) -> Value {
        let elements = match value.as_array() {
            Some(elements) => elements,
            None => {
                self.violations.push(Violation::type_mismatch(
                    path.clone(),
                    "array",
                    json_type_name(value),
                ));
                return self.carry(value, path);
            }
        };

        if elements.len() > self.limits.max_array_len {
            self.violations.push(Violation::limit_exceeded(
                path.clone(),
                format!("at most {} items", self.limits.max_array_len),
                format!("{} items", elements.len()),
            ));
            return value.clone();
        }

        let mut normalized = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            let v = self
                .node(items, Some(element), &path.index(i))
                .unwrap_or_else(|| element.clone());
            normalized.push(v);
        }

        if unique {
            for i in 1..normalized.len() {
                let earlier = normalized[..i].iter().position(|e| *e == normalized[i]);
                if let Some(first) = earlier {
                    self.violations
                        .push(Violation::duplicate_item(path.index(i), first));
                }
            }
        }

        Value::Array(normalized)
    }

    /// Copies an unvalidated value into the output, bounding its nesting.
    fn carry(&mut self, value: &Value, path: &FieldPath) -> Value {
        let too_deep = match self.limits.max_depth.checked_sub(path.depth()) {
            Some(budget) => nests_deeper_than(value, budget),
            None => true,
        };
        if too_deep {
            self.depth_exceeded(path);
        }
        value.clone()
    }

    fn depth_exceeded(&mut self, path: &FieldPath) {
        self.violations.push(Violation::limit_exceeded(
            path.clone(),
            format!("nesting depth at most {}", self.limits.max_depth),
            format!("value nested below depth {}", self.limits.max_depth),
        ));
    }
}

/// True when `value` has containers nested more than `budget` levels down.
fn nests_deeper_than(value: &Value, budget: usize) -> bool {
    let deeper = |child: &Value| budget == 0 || nests_deeper_than(child, budget - 1);
    match value {
        Value::Array(items) => items.iter().any(deeper),
        Value::Object(fields) => fields.values().any(deeper),
        _ => false,
    }
}

/// Integers accept any integral JSON number, `8080.0` included; `number`
/// accepts any number.
fn kind_matches(kind: NodeKind, value: &Value) -> bool {
    match kind {
        NodeKind::String => value.is_string(),
        NodeKind::Integer => {
            value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|n| n.fract() == 0.0)
        }
        NodeKind::Number => value.is_number(),
        NodeKind::Boolean => value.is_boolean(),
        NodeKind::Object => value.is_object(),
        NodeKind::Array => value.is_array(),
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
