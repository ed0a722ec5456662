//! Error types for the schema engine.
//!
//! Two distinct kinds, raised at different times:
//! - `ValidationFailure`: a value did not conform to a schema. Raised
//!   synchronously at the offending construction or mutation.
//! - `DefinitionError`: a descriptor or shape was declared incorrectly.
//!   Raised when the descriptor is built, never when data is validated.

use thiserror::Error;

/// Result type for operations that can hit either error kind.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A value failed to conform to a schema.
///
/// Carries the path to the offending field or item in dot/bracket
/// notation (e.g. `address.tags[2]`), the expected schema condition,
/// and the actual value or its kind. Union failures aggregate the
/// failures of every operand in `causes`.
#[derive(Debug, Clone, Error)]
#[error("validation failed at '{path}': expected {expected}, got {actual}")]
pub struct ValidationFailure {
    /// Field/item path, empty string for the root value
    pub path: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
    /// Operand failures for union (anyOf) aggregation
    pub causes: Vec<ValidationFailure>,
}

impl ValidationFailure {
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
            causes: Vec::new(),
        }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(path, expected, actual)
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::new(path, "field to be present", "missing")
    }

    pub fn extra_field(path: impl Into<String>) -> Self {
        Self::new(path, "no undeclared fields", "extra field present")
    }

    pub fn pattern_mismatch(path: impl Into<String>, pattern: &str, actual: &str) -> Self {
        Self::new(
            path,
            format!("string matching pattern '{}'", pattern),
            format!("'{}'", actual),
        )
    }

    pub fn format_mismatch(path: impl Into<String>, format: &str, actual: &str) -> Self {
        Self::new(
            path,
            format!("string in '{}' format", format),
            format!("'{}'", actual),
        )
    }

    pub fn out_of_bounds(path: impl Into<String>, bound: impl Into<String>, actual: f64) -> Self {
        Self::new(path, bound, actual.to_string())
    }

    pub fn length(path: impl Into<String>, bound: impl Into<String>, actual: usize) -> Self {
        Self::new(path, bound, format!("length {}", actual))
    }

    pub fn item_count(path: impl Into<String>, bound: impl Into<String>, actual: usize) -> Self {
        Self::new(path, bound, format!("{} items", actual))
    }

    /// Aggregate failure for a union where no alternative matched.
    pub fn no_alternative(
        path: impl Into<String>,
        actual: impl Into<String>,
        causes: Vec<ValidationFailure>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: format!("any of {} alternatives", causes.len()),
            actual: actual.into(),
            causes,
        }
    }
}

/// A descriptor, constraint, or shape was declared incorrectly.
#[derive(Debug, Clone, Error)]
pub enum DefinitionError {
    // ==================
    // Combinator errors
    // ==================
    /// A constraint keyword does not apply to the base descriptor's kind
    #[error("keyword '{keyword}' cannot refine a '{base}' descriptor")]
    IncompatibleKeyword { keyword: String, base: String },

    /// A union with no operands accepts nothing and is a declaration mistake
    #[error("union requires at least one operand")]
    EmptyUnion,

    /// A pattern keyword failed to compile
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ==================
    // Shape errors
    // ==================
    /// The same field name was declared twice in one shape
    #[error("field '{0}' declared more than once")]
    DuplicateField(String),

    /// A declared default does not validate against its own field schema
    #[error("default for '{field}' violates its schema: {cause}")]
    InvalidDefault {
        field: String,
        cause: ValidationFailure,
    },

    // ==================
    // Binding errors
    // ==================
    /// A container was bound to a descriptor of the wrong kind
    #[error("{container} requires an {expected} descriptor, got '{actual}'")]
    WrongDescriptorKind {
        container: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// A tuple container was bound to a descriptor without positional items
    #[error("tuple container requires positional item schemas")]
    MissingPositionalItems,
}

/// Umbrella error for operations that can fail either way.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Creates a field path from prefix and field name.
pub fn field_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Creates an item path from prefix and index.
pub fn item_path(prefix: &str, index: usize) -> String {
    format!("{}[{}]", prefix, index)
}
