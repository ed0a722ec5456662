//! Type Descriptors: immutable value classifiers.
//!
//! A descriptor knows which values it accepts and how to render that
//! rule as a Schema Document. Combination (`union`, `refine`) never
//! mutates an operand; it produces a new descriptor referencing its
//! operands. The derived document is memoized per descriptor identity
//! in a `OnceLock` (lazy, idempotent).

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::schema::{self, DefinitionError, InstanceCheck, SchemaDocument, ValidationFailure};

use super::constraint::Constraint;
use super::synth;

/// Policy for object fields outside the declared shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Additional {
    /// Unknown fields accepted without a declared schema (the default)
    Permissive,
    /// Unknown fields rejected (`additionalProperties: false`)
    Sealed,
    /// Unknown fields must validate against this descriptor
    Schema(Descriptor),
}

/// A declared object field: name, classifier, optional default.
///
/// The default is applied only at construction for missing fields,
/// never re-applied after a delete.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) descriptor: Descriptor,
    pub(crate) default: Option<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, descriptor: Descriptor, default: Value) -> Self {
        Self {
            name: name.into(),
            descriptor,
            default: Some(default),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The classifying kind behind a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Kind {
    Boolean,
    Integer,
    Float,
    Str,
    Null,
    /// Native-instance escape hatch
    Instance(InstanceCheck),
    Object {
        fields: Vec<Field>,
        additional: Additional,
    },
    Array {
        items: Descriptor,
    },
    Tuple {
        slots: Vec<Descriptor>,
    },
    Union {
        operands: Vec<Descriptor>,
    },
    Refined {
        base: Descriptor,
        constraint: Constraint,
    },
}

impl Kind {
    /// Kind name for definition-error messages.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Float => "number",
            Kind::Str => "string",
            Kind::Null => "null",
            Kind::Instance(_) => "instance",
            Kind::Object { .. } => "object",
            Kind::Array { .. } => "array",
            Kind::Tuple { .. } => "array",
            Kind::Union { .. } => "union",
            Kind::Refined { base, .. } => base.inner.kind.name(),
        }
    }
}

struct Inner {
    kind: Kind,
    schema: OnceLock<SchemaDocument>,
}

/// An immutable value classifier with a derived, cached Schema Document.
///
/// Cloning is cheap (shared inner); the schema memo is keyed by this
/// shared identity.
#[derive(Clone)]
pub struct Descriptor {
    inner: Arc<Inner>,
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Descriptor").field(&self.inner.kind).finish()
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.inner.kind == other.inner.kind
    }
}

impl Descriptor {
    fn from_kind(kind: Kind) -> Self {
        Self {
            inner: Arc::new(Inner {
                kind,
                schema: OnceLock::new(),
            }),
        }
    }

    // ==================
    // Scalar descriptors
    // ==================

    pub fn boolean() -> Self {
        Self::from_kind(Kind::Boolean)
    }

    pub fn integer() -> Self {
        Self::from_kind(Kind::Integer)
    }

    pub fn float() -> Self {
        Self::from_kind(Kind::Float)
    }

    pub fn string() -> Self {
        Self::from_kind(Kind::Str)
    }

    pub fn null_value() -> Self {
        Self::from_kind(Kind::Null)
    }

    // ==================
    // Native escape hatch
    // ==================

    /// Descriptor accepting values for which the predicate holds.
    pub fn instance_with(
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::from_kind(Kind::Instance(InstanceCheck::new(name, predicate)))
    }

    /// Descriptor accepting values that deserialize as the native type `T`.
    pub fn instance_of<T: DeserializeOwned>(name: impl Into<String>) -> Self {
        Self::instance_with(name, |value: &Value| {
            serde_json::from_value::<T>(value.clone()).is_ok()
        })
    }

    // ==================
    // Container descriptors
    // ==================

    /// Object descriptor with permissive additional properties.
    pub fn object(fields: Vec<Field>) -> Result<Self, DefinitionError> {
        Self::object_with(fields, Additional::Permissive)
    }

    /// Object descriptor rejecting undeclared fields.
    pub fn object_sealed(fields: Vec<Field>) -> Result<Self, DefinitionError> {
        Self::object_with(fields, Additional::Sealed)
    }

    /// Object descriptor with an explicit additional-field policy.
    pub fn object_with(fields: Vec<Field>, additional: Additional) -> Result<Self, DefinitionError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.clone()) {
                return Err(DefinitionError::DuplicateField(field.name.clone()));
            }
            if let Some(default) = &field.default {
                field.descriptor.validate(default).map_err(|cause| {
                    DefinitionError::InvalidDefault {
                        field: field.name.clone(),
                        cause,
                    }
                })?;
            }
        }
        Ok(Self::from_kind(Kind::Object { fields, additional }))
    }

    /// Homogeneous array descriptor.
    pub fn array(items: Descriptor) -> Self {
        Self::from_kind(Kind::Array { items })
    }

    /// Array whose elements may match any of several descriptors.
    pub fn array_any_of(alternatives: Vec<Descriptor>) -> Result<Self, DefinitionError> {
        Ok(Self::array(Self::union(alternatives)?))
    }

    /// Fixed-length, positionally-typed sequence descriptor.
    pub fn tuple(slots: Vec<Descriptor>) -> Self {
        Self::from_kind(Kind::Tuple { slots })
    }

    // ==================
    // Combinators
    // ==================

    /// Accepts a value when any operand accepts it.
    pub fn union(operands: Vec<Descriptor>) -> Result<Self, DefinitionError> {
        if operands.is_empty() {
            return Err(DefinitionError::EmptyUnion);
        }
        Ok(Self::from_kind(Kind::Union { operands }))
    }

    /// Narrows this descriptor with extra schema keywords.
    ///
    /// Keyword compatibility with the base kind is checked here, at
    /// definition time; so is a constraint default against the merged
    /// schema.
    pub fn refine(&self, constraint: Constraint) -> Result<Self, DefinitionError> {
        constraint.check_compatible(self.to_schema())?;
        let refined = Self::from_kind(Kind::Refined {
            base: self.clone(),
            constraint,
        });
        let merged = refined.to_schema();
        if let Some(default) = merged.default.clone() {
            schema::validate(&default, merged).map_err(|cause| DefinitionError::InvalidDefault {
                field: "<default>".into(),
                cause,
            })?;
        }
        Ok(refined)
    }

    // ==================
    // Observation
    // ==================

    /// The canonical Schema Document, synthesized once per descriptor.
    pub fn to_schema(&self) -> &SchemaDocument {
        self.inner
            .schema
            .get_or_init(|| synth::synthesize(&self.inner.kind))
    }

    /// The Schema Document as a plain nested mapping.
    pub fn to_value(&self) -> Value {
        self.to_schema().to_value()
    }

    /// Structural check of a candidate value against this descriptor.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationFailure> {
        schema::validate(value, self.to_schema())
    }

    /// Kind name for error messages (`object`, `array`, `union`, ...).
    pub fn kind_name(&self) -> &'static str {
        self.inner.kind.name()
    }
}
