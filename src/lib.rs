//! stageschema - schema-driven validation and defaulting for pipeline stage configurations
//!
//! A catalog of stage schemas (sources, operators, sinks) and an engine that
//! validates candidate configurations against them, returning the normalized
//! configuration together with every violation found.

pub mod cli;
pub mod observability;
pub mod schema;
