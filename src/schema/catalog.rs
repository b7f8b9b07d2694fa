//! Stage schema catalog
//!
//! The catalog is built once at startup from a JSON definition keyed by
//! category, then by stage type:
//!
//! ```json
//! { "source": { "http": { "type": "object", "properties": { ... } } }, "sink": { ... } }
//! ```
//!
//! Malformed definitions fail construction. There are no mutation operations;
//! a schema change means building a new catalog.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::errors::{CatalogError, SchemaResult};
use super::types::{NodeKind, SchemaNode, Shape, StageCategory};
use super::validator::validate;

/// Catalog definition shipped with the crate.
const BUILTIN_DEFINITION: &str = include_str!("../../catalog/stages.json");

/// Immutable collection of stage schemas indexed by (category, stage type).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stages: BTreeMap<StageCategory, BTreeMap<String, SchemaNode>>,
}

impl Catalog {
    /// Builds the catalog shipped with the crate.
    pub fn builtin() -> SchemaResult<Self> {
        Self::from_json_str(BUILTIN_DEFINITION, "<builtin>")
    }

    /// Loads a catalog definition file.
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Parses a catalog definition. `origin` names the source in error messages.
    pub fn from_json_str(definition: &str, origin: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(definition)
            .map_err(|e| CatalogError::malformed(origin, format!("Invalid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Builds a catalog from an already-parsed definition.
    pub fn from_value(definition: &Value) -> SchemaResult<Self> {
        let categories = definition.as_object().ok_or_else(|| {
            CatalogError::malformed("$root", "catalog definition must be an object keyed by category")
        })?;

        let mut stages = BTreeMap::new();
        for (name, entries) in categories {
            let category: StageCategory = name
                .parse()
                .map_err(|e: CatalogError| CatalogError::malformed(name.as_str(), e.to_string()))?;
            let entries = entries.as_object().ok_or_else(|| {
                CatalogError::malformed(name.as_str(), "category must map stage types to schemas")
            })?;

            let mut schemas = BTreeMap::new();
            for (type_key, node_def) in entries {
                let path = format!("{}.{}", category, type_key);
                let node = SchemaNode::from_dialect(node_def, &path)?;
                if node.kind() != NodeKind::Object {
                    return Err(CatalogError::malformed(
                        path,
                        "stage schema root must be an object node",
                    ));
                }
                check_defaults(&node, &path)?;
                schemas.insert(type_key.clone(), node);
            }
            stages.insert(category, schemas);
        }

        Ok(Self { stages })
    }

    /// Gets the schema for a stage type.
    ///
    /// # Errors
    ///
    /// Returns STAGE_UNKNOWN_TYPE if the category has no such stage type.
    pub fn lookup(&self, category: StageCategory, type_key: &str) -> SchemaResult<&SchemaNode> {
        self.stages
            .get(&category)
            .and_then(|schemas| schemas.get(type_key))
            .ok_or_else(|| CatalogError::not_found(category.as_str(), type_key))
    }

    /// Like `lookup`, with the category given as a string.
    pub fn lookup_str(&self, category: &str, type_key: &str) -> SchemaResult<&SchemaNode> {
        self.lookup(category.parse()?, type_key)
    }

    /// Checks if a stage type exists.
    pub fn contains(&self, category: StageCategory, type_key: &str) -> bool {
        self.lookup(category, type_key).is_ok()
    }

    /// Stage types registered under a category, sorted.
    pub fn type_keys(&self, category: StageCategory) -> Vec<&str> {
        self.stages
            .get(&category)
            .map(|schemas| schemas.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Renders a stage schema in the catalog definition format.
    pub fn describe(&self, category: StageCategory, type_key: &str) -> SchemaResult<Value> {
        Ok(self.lookup(category, type_key)?.to_dialect())
    }

    /// Returns the number of stage schemas across all categories.
    pub fn entry_count(&self) -> usize {
        self.stages.values().map(BTreeMap::len).sum()
    }
}

/// Every declared default must pass its own node's validation.
fn check_defaults(node: &SchemaNode, path: &str) -> SchemaResult<()> {
    if let Some(default) = &node.default {
        let report = validate(node, default);
        if let Some(violation) = report.violations.first() {
            return Err(CatalogError::malformed(
                path,
                format!("default does not satisfy its own schema: {}", violation),
            ));
        }
    }

    match &node.shape {
        Shape::Object { properties } => {
            for (name, child) in properties {
                check_defaults(child, &format!("{}.{}", path, name))?;
            }
        }
        Shape::Array { items, .. } => check_defaults(items, &format!("{}[]", path))?,
        _ => {}
    }

    Ok(())
}
