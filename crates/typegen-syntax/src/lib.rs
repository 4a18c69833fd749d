//! typegen syntax parsing library.
//!
//! Parses the per-field annotation strings carried by `#[typegen("...")]`
//! attributes, e.g. `skip,alias='foo,bar'`.

pub mod annotation;

pub use annotation::{flatten, parse, parse_flat, AnnotationError, Annotations};
