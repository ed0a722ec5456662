//! Schema Document subsystem.
//!
//! The canonical, serializable representation of validation rules and
//! the structural validator that checks values against it.
//!
//! # Design Principles
//!
//! - A document is a pure function of the descriptor tree that derived it
//! - Validation is deterministic and side-effect free
//! - Every failure carries a condition and a faulty path
//! - Definition mistakes and data mistakes are distinct error kinds

mod document;
mod errors;
mod formats;
mod validate;

pub use document::{AdditionalProperties, InstanceCheck, Items, SchemaDocument, TypeName};
pub use errors::{
    field_path, item_path, DefinitionError, SchemaError, SchemaResult, ValidationFailure,
};
pub use formats::check_format;
pub use validate::{kind_of, validate, validate_at};
