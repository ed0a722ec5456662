//! List-like mutation-guarded sequence.
//!
//! Every incoming element is validated against the element schema
//! before the sequence mutates; a multi-element `extend` with one bad
//! element commits nothing. Whole-sequence bounds (`minItems`,
//! `maxItems`) are checked against the would-be final length on the
//! same all-or-nothing basis.

use serde_json::Value;

use crate::descriptor::Descriptor;
use crate::schema::{
    self, item_path, DefinitionError, Items, SchemaDocument, SchemaError, TypeName,
    ValidationFailure,
};

/// A validated, mutation-guarded sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedList {
    descriptor: Descriptor,
    items: Vec<Value>,
}

fn check_bounds(doc: &SchemaDocument, len: usize) -> Result<(), ValidationFailure> {
    if let Some(min) = doc.min_items {
        if len < min {
            return Err(ValidationFailure::item_count(
                "",
                format!("at least {} items", min),
                len,
            ));
        }
    }
    if let Some(max) = doc.max_items {
        if len > max {
            return Err(ValidationFailure::item_count(
                "",
                format!("at most {} items", max),
                len,
            ));
        }
    }
    Ok(())
}

impl TypedList {
    /// Constructs from the descriptor's default, or empty.
    pub fn new(descriptor: Descriptor) -> Result<Self, SchemaError> {
        Self::build(descriptor, None)
    }

    /// Constructs from a seed value. A keyed (non-sequence) seed is a
    /// validation failure, not a coercion.
    pub fn from_value(descriptor: Descriptor, seed: Value) -> Result<Self, SchemaError> {
        Self::build(descriptor, Some(seed))
    }

    fn build(descriptor: Descriptor, seed: Option<Value>) -> Result<Self, SchemaError> {
        let doc = descriptor.to_schema();
        if doc.ty != Some(TypeName::Array) {
            return Err(DefinitionError::WrongDescriptorKind {
                container: "list container",
                expected: "array",
                actual: descriptor.kind_name().to_string(),
            }
            .into());
        }

        let candidate = match seed {
            Some(value) => value,
            None => doc.default.clone().unwrap_or_else(|| Value::Array(vec![])),
        };
        schema::validate(&candidate, doc)?;
        let items = match candidate {
            Value::Array(items) => items,
            other => {
                return Err(
                    ValidationFailure::type_mismatch("", "array", schema::kind_of(&other)).into(),
                )
            }
        };

        Ok(Self { descriptor, items })
    }

    /// The schema one element at `index` must satisfy, if any.
    fn item_schema(&self, index: usize) -> Option<&SchemaDocument> {
        match &self.descriptor.to_schema().items {
            None => None,
            Some(Items::Single(schema)) => Some(schema),
            Some(Items::Positional(slots)) => slots.get(index),
        }
    }

    fn positional(&self) -> bool {
        matches!(
            self.descriptor.to_schema().items,
            Some(Items::Positional(_))
        )
    }

    /// Re-validates a whole would-be sequence; used for positional
    /// item schemas where a single-element check cannot decide.
    fn commit_whole(&mut self, candidate: Vec<Value>) -> Result<(), ValidationFailure> {
        let value = Value::Array(candidate);
        schema::validate(&value, self.descriptor.to_schema())?;
        if let Value::Array(items) = value {
            self.items = items;
        }
        Ok(())
    }

    /// Appends one validated element.
    pub fn push(&mut self, value: Value) -> Result<(), ValidationFailure> {
        if self.positional() {
            let mut candidate = self.items.clone();
            candidate.push(value);
            return self.commit_whole(candidate);
        }
        if let Some(item_doc) = self.item_schema(self.items.len()) {
            schema::validate_at(&value, item_doc, &item_path("", self.items.len()))?;
        }
        check_bounds(self.descriptor.to_schema(), self.items.len() + 1)?;
        self.items.push(value);
        Ok(())
    }

    /// Appends several elements; one bad element commits nothing.
    pub fn extend(&mut self, values: Vec<Value>) -> Result<(), ValidationFailure> {
        if self.positional() {
            let mut candidate = self.items.clone();
            candidate.extend(values);
            return self.commit_whole(candidate);
        }
        if let Some(Items::Single(item_doc)) = &self.descriptor.to_schema().items {
            for (offset, value) in values.iter().enumerate() {
                schema::validate_at(value, item_doc, &item_path("", self.items.len() + offset))?;
            }
        }
        check_bounds(self.descriptor.to_schema(), self.items.len() + values.len())?;
        self.items.extend(values);
        Ok(())
    }

    /// Inserts one validated element at `index`.
    ///
    /// Panics if `index > len`, matching `Vec::insert`.
    pub fn insert(&mut self, index: usize, value: Value) -> Result<(), ValidationFailure> {
        assert!(index <= self.items.len());
        if self.positional() {
            let mut candidate = self.items.clone();
            candidate.insert(index, value);
            return self.commit_whole(candidate);
        }
        if let Some(item_doc) = self.item_schema(index) {
            schema::validate_at(&value, item_doc, &item_path("", index))?;
        }
        check_bounds(self.descriptor.to_schema(), self.items.len() + 1)?;
        self.items.insert(index, value);
        Ok(())
    }

    /// Replaces the element at `index` after validating it.
    ///
    /// Panics if `index >= len`, matching slice indexing.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), ValidationFailure> {
        assert!(index < self.items.len());
        if let Some(item_doc) = self.item_schema(index) {
            schema::validate_at(&value, item_doc, &item_path("", index))?;
        }
        self.items[index] = value;
        Ok(())
    }

    /// Removes and returns the last element, unless that would violate
    /// `minItems` (or positional arity).
    pub fn pop(&mut self) -> Result<Option<Value>, ValidationFailure> {
        if self.items.is_empty() {
            return Ok(None);
        }
        if self.positional() {
            let mut candidate = self.items.clone();
            let value = candidate.pop();
            self.commit_whole(candidate)?;
            return Ok(value);
        }
        check_bounds(self.descriptor.to_schema(), self.items.len() - 1)?;
        Ok(self.items.pop())
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.items.clone())
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn schema(&self) -> &SchemaDocument {
        self.descriptor.to_schema()
    }
}
