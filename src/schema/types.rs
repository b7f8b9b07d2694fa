//! Schema node definitions for stage configurations
//!
//! Supported node kinds:
//! - string, integer, number, boolean: leaf values with optional `enum` and bounds
//! - object: fixed fields, or an open map when `properties` is empty
//! - array: homogeneous elements described by `items`
//!
//! Nodes are parsed from the catalog dialect (`type`, `default`, `required`,
//! `enum`, `minimum`, `maximum`, `items`, `uniqueItems`, `properties`, ...) and can
//! be rendered back into it for display tooling.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

use super::errors::{CatalogError, SchemaResult};

/// Pipeline stage categories. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageCategory {
    Source,
    Operator,
    Sink,
}

impl StageCategory {
    pub const ALL: [StageCategory; 3] = [
        StageCategory::Source,
        StageCategory::Operator,
        StageCategory::Sink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageCategory::Source => "source",
            StageCategory::Operator => "operator",
            StageCategory::Sink => "sink",
        }
    }
}

impl fmt::Display for StageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StageCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(StageCategory::Source),
            "operator" => Ok(StageCategory::Operator),
            "sink" => Ok(StageCategory::Sink),
            other => Err(CatalogError::UnknownCategory(other.to_string())),
        }
    }
}

/// Node kinds as named in the catalog dialect's `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl NodeKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::String => "string",
            NodeKind::Integer => "integer",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Object => "object",
            NodeKind::Array => "array",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, NodeKind::Integer | NodeKind::Number)
    }
}

/// Constraints on a leaf value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafRules {
    /// Allowed literals, compared by exact equality
    pub allowed: Option<Vec<Value>>,
    /// Inclusive lower bound (numeric kinds only)
    pub minimum: Option<Number>,
    /// Inclusive upper bound (numeric kinds only)
    pub maximum: Option<Number>,
}

/// Shape of a node: one variant per kind, plus the open object.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String(LeafRules),
    Integer(LeafRules),
    Number(LeafRules),
    Boolean(LeafRules),
    /// Object with declared fields, in display order
    Object {
        properties: Vec<(String, SchemaNode)>,
    },
    /// Free-form map of any values (`"properties": {}`)
    OpenObject,
    Array {
        items: Box<SchemaNode>,
        unique_items: bool,
    },
}

/// Recursive unit of a stage schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Substituted when the field is absent
    pub default: Option<Value>,
    pub required: bool,
    /// Runtime tag, carried through uninterpreted
    pub direction: Option<String>,
    pub shape: Shape,
}

impl SchemaNode {
    fn with_shape(shape: Shape) -> Self {
        Self {
            title: None,
            description: None,
            default: None,
            required: false,
            direction: None,
            shape,
        }
    }

    /// Create an optional string node
    pub fn string() -> Self {
        Self::with_shape(Shape::String(LeafRules::default()))
    }

    /// Create an optional integer node
    pub fn integer() -> Self {
        Self::with_shape(Shape::Integer(LeafRules::default()))
    }

    /// Create an optional number node
    pub fn number() -> Self {
        Self::with_shape(Shape::Number(LeafRules::default()))
    }

    /// Create an optional boolean node
    pub fn boolean() -> Self {
        Self::with_shape(Shape::Boolean(LeafRules::default()))
    }

    /// Create an optional object node with the given fields
    pub fn object<K: Into<String>>(properties: Vec<(K, SchemaNode)>) -> Self {
        Self::with_shape(Shape::Object {
            properties: properties
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        })
    }

    /// Create an optional free-form object node
    pub fn open_object() -> Self {
        Self::with_shape(Shape::OpenObject)
    }

    /// Create an optional array node
    pub fn array(items: SchemaNode) -> Self {
        Self::with_shape(Shape::Array {
            items: Box::new(items),
            unique_items: false,
        })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Restricts a leaf node to the given literals.
    ///
    /// Same rules as the catalog dialect: objects and arrays take no `enum`
    /// and the list must not be empty. Debug builds panic on a violation;
    /// release builds leave the node unchanged.
    pub fn with_enum(mut self, allowed: Vec<Value>) -> Self {
        debug_assert!(!allowed.is_empty(), "'enum' must not be empty");
        match self.leaf_rules_mut() {
            Some(rules) if !allowed.is_empty() => rules.allowed = Some(allowed),
            Some(_) => {}
            None => misuse("'enum' is not allowed on object and array nodes"),
        }
        self
    }

    /// Sets inclusive numeric bounds on an integer or number node.
    ///
    /// Debug builds panic on other kinds or when `minimum > maximum`, as the
    /// catalog dialect rejects both; release builds leave the node unchanged.
    pub fn with_range(mut self, minimum: Option<i64>, maximum: Option<i64>) -> Self {
        let ordered = match (minimum, maximum) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        debug_assert!(ordered, "'minimum' is greater than 'maximum'");
        match &mut self.shape {
            Shape::Integer(rules) | Shape::Number(rules) if ordered => {
                rules.minimum = minimum.map(Number::from);
                rules.maximum = maximum.map(Number::from);
            }
            Shape::Integer(_) | Shape::Number(_) => {}
            _ => misuse("'minimum' and 'maximum' are only allowed on integer and number nodes"),
        }
        self
    }

    /// Marks an array node as `uniqueItems`.
    ///
    /// Debug builds panic on other kinds; release builds leave the node unchanged.
    pub fn unique(mut self) -> Self {
        match &mut self.shape {
            Shape::Array { unique_items, .. } => *unique_items = true,
            _ => misuse("'uniqueItems' is only allowed on array nodes"),
        }
        self
    }

    fn leaf_rules_mut(&mut self) -> Option<&mut LeafRules> {
        match &mut self.shape {
            Shape::String(rules)
            | Shape::Integer(rules)
            | Shape::Number(rules)
            | Shape::Boolean(rules) => Some(rules),
            Shape::Object { .. } | Shape::OpenObject | Shape::Array { .. } => None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.shape {
            Shape::String(_) => NodeKind::String,
            Shape::Integer(_) => NodeKind::Integer,
            Shape::Number(_) => NodeKind::Number,
            Shape::Boolean(_) => NodeKind::Boolean,
            Shape::Object { .. } | Shape::OpenObject => NodeKind::Object,
            Shape::Array { .. } => NodeKind::Array,
        }
    }

    /// Looks up a declared child field of an object node.
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        match &self.shape {
            Shape::Object { properties } => properties
                .iter()
                .find(|(declared, _)| declared == name)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Parses a node from the catalog dialect.
    ///
    /// `path` names the node in error messages. Structural mistakes (array
    /// without `items`, bounds on a string, empty `enum`, ...) are rejected here.
    pub fn from_dialect(value: &Value, path: &str) -> SchemaResult<Self> {
        let raw = RawNode::deserialize(value)
            .map_err(|e| CatalogError::malformed(path, e.to_string()))?;
        let fail = |reason: &str| CatalogError::malformed(path, reason);

        if raw.kind != NodeKind::Array && (raw.items.is_some() || raw.unique_items.is_some()) {
            return Err(fail("'items' and 'uniqueItems' are only allowed on array nodes"));
        }
        if raw.kind != NodeKind::Object && raw.properties.is_some() {
            return Err(fail("'properties' is only allowed on object nodes"));
        }
        if !raw.kind.is_numeric() && (raw.minimum.is_some() || raw.maximum.is_some()) {
            return Err(fail("'minimum' and 'maximum' are only allowed on integer and number nodes"));
        }

        let shape = match raw.kind {
            NodeKind::Object => {
                if raw.allowed.is_some() {
                    return Err(fail("'enum' is not allowed on object nodes"));
                }
                let declared = raw
                    .properties
                    .ok_or_else(|| fail("object node must declare 'properties'"))?;
                if declared.is_empty() {
                    Shape::OpenObject
                } else {
                    let mut properties = Vec::with_capacity(declared.len());
                    for (name, child) in &declared {
                        let child_path = format!("{}.{}", path, name);
                        properties.push((name.clone(), SchemaNode::from_dialect(child, &child_path)?));
                    }
                    Shape::Object { properties }
                }
            }
            NodeKind::Array => {
                if raw.allowed.is_some() {
                    return Err(fail("'enum' is not allowed on array nodes"));
                }
                let items = raw
                    .items
                    .ok_or_else(|| fail("array node must declare 'items'"))?;
                let items = SchemaNode::from_dialect(&items, &format!("{}[]", path))?;
                Shape::Array {
                    items: Box::new(items),
                    unique_items: raw.unique_items.unwrap_or(false),
                }
            }
            leaf => {
                if matches!(&raw.allowed, Some(allowed) if allowed.is_empty()) {
                    return Err(fail("'enum' must not be empty"));
                }
                if let (Some(min), Some(max)) = (&raw.minimum, &raw.maximum) {
                    if min.as_f64() > max.as_f64() {
                        return Err(fail("'minimum' is greater than 'maximum'"));
                    }
                }
                let rules = LeafRules {
                    allowed: raw.allowed,
                    minimum: raw.minimum,
                    maximum: raw.maximum,
                };
                match leaf {
                    NodeKind::String => Shape::String(rules),
                    NodeKind::Integer => Shape::Integer(rules),
                    NodeKind::Number => Shape::Number(rules),
                    _ => Shape::Boolean(rules),
                }
            }
        };

        Ok(Self {
            title: raw.title,
            description: raw.description,
            default: raw.default,
            required: raw.required,
            direction: raw.direction,
            shape,
        })
    }

    /// Renders the node back into the catalog dialect, preserving field order.
    pub fn to_dialect(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::from(self.kind().type_name()));
        if let Some(title) = &self.title {
            out.insert("title".into(), Value::from(title.as_str()));
        }
        if let Some(description) = &self.description {
            out.insert("description".into(), Value::from(description.as_str()));
        }
        if let Some(direction) = &self.direction {
            out.insert("direction".into(), Value::from(direction.as_str()));
        }
        if let Some(default) = &self.default {
            out.insert("default".into(), default.clone());
        }
        if self.required {
            out.insert("required".into(), Value::Bool(true));
        }

        match &self.shape {
            Shape::String(rules)
            | Shape::Integer(rules)
            | Shape::Number(rules)
            | Shape::Boolean(rules) => {
                if let Some(allowed) = &rules.allowed {
                    out.insert("enum".into(), Value::Array(allowed.clone()));
                }
                if let Some(minimum) = &rules.minimum {
                    out.insert("minimum".into(), Value::Number(minimum.clone()));
                }
                if let Some(maximum) = &rules.maximum {
                    out.insert("maximum".into(), Value::Number(maximum.clone()));
                }
            }
            Shape::Object { properties } => {
                let fields: Map<String, Value> = properties
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_dialect()))
                    .collect();
                out.insert("properties".into(), Value::Object(fields));
            }
            Shape::OpenObject => {
                out.insert("properties".into(), Value::Object(Map::new()));
            }
            Shape::Array {
                items,
                unique_items,
            } => {
                if *unique_items {
                    out.insert("uniqueItems".into(), Value::Bool(true));
                }
                out.insert("items".into(), items.to_dialect());
            }
        }

        Value::Object(out)
    }
}

/// Builder misuse panics in debug builds and is ignored in release builds.
fn misuse(reason: &str) {
    if cfg!(debug_assertions) {
        panic!("{}", reason);
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dialect().serialize(serializer)
    }
}

/// Node as written in the catalog dialect, before structural checks.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNode {
    #[serde(rename = "type")]
    kind: NodeKind,
    title: Option<String>,
    description: Option<String>,
    default: Option<Value>,
    #[serde(default)]
    required: bool,
    #[serde(rename = "enum")]
    allowed: Option<Vec<Value>>,
    minimum: Option<Number>,
    maximum: Option<Number>,
    items: Option<Value>,
    #[serde(rename = "uniqueItems")]
    unique_items: Option<bool>,
    properties: Option<Map<String, Value>>,
    direction: Option<String>,
}
