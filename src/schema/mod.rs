//! Declarative field mapping
//!
//! A [`Schema`] is an ordered set of [`FieldDescriptor`]s, each naming a
//! typed field, a path into the raw JSON document, an optional chain of
//! value transforms, and a missing-value policy. Applying a schema to a
//! raw record produces one typed row.

mod mapper;
pub mod path;
mod types;

pub use mapper::Schema;
pub use types::{FieldDescriptor, FieldType, MissingValuePolicy, Transform};

#[cfg(test)]
mod tests;
