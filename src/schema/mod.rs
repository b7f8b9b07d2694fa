//! Stage configuration schemas
//!
//! Schemas describe the configuration of pipeline stages (sources, operators,
//! sinks). A candidate configuration is validated against its stage schema,
//! producing a normalized value plus every violation found.
//!
//! # Design Principles
//!
//! - Catalog is built once and never mutated
//! - Malformed schemas fail at catalog construction, not at validation time
//! - Defaults are substituted for absent fields
//! - Undeclared fields pass through unchanged
//! - Violations accumulate; validation never aborts early
//! - Deterministic validation

mod catalog;
mod errors;
mod types;
mod validator;
mod violation;

pub use catalog::Catalog;
pub use errors::{CatalogError, SchemaResult, Severity};
pub use types::{LeafRules, NodeKind, SchemaNode, Shape, StageCategory};
pub use validator::{validate, validate_with_limits, ValidationLimits, ValidationReport, Validator};
pub use violation::{FieldPath, PathSegment, Violation, ViolationDetail, ViolationKind};
