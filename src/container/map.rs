//! Dict-like mutation-guarded mapping.
//!
//! A `TypedMap` is a live key/value mapping bound to an object-shaped
//! descriptor. Construction validates the fully assembled candidate
//! (seed plus default fill); every later write validates before it
//! commits, so the visible state always conforms to the bound schema.

use serde_json::{Map, Value};

use crate::descriptor::Descriptor;
use crate::schema::{
    self, AdditionalProperties, DefinitionError, SchemaDocument, SchemaError, TypeName,
    ValidationFailure,
};

/// A validated, mutation-guarded mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedMap {
    descriptor: Descriptor,
    entries: Map<String, Value>,
}

impl TypedMap {
    /// Constructs from the default table alone.
    pub fn new(descriptor: Descriptor) -> Result<Self, SchemaError> {
        Self::build(descriptor, None)
    }

    /// Constructs from a seed value, filling missing defaulted fields.
    pub fn from_value(descriptor: Descriptor, seed: Value) -> Result<Self, SchemaError> {
        Self::build(descriptor, Some(seed))
    }

    fn build(descriptor: Descriptor, seed: Option<Value>) -> Result<Self, SchemaError> {
        let doc = descriptor.to_schema();
        if doc.ty != Some(TypeName::Object) {
            return Err(DefinitionError::WrongDescriptorKind {
                container: "map container",
                expected: "object",
                actual: descriptor.kind_name().to_string(),
            }
            .into());
        }

        // Whole-value default applies only when no seed was given.
        let candidate = match seed {
            Some(value) => value,
            None => doc
                .default
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new())),
        };
        let mut entries = match candidate {
            Value::Object(map) => map,
            other => {
                return Err(
                    ValidationFailure::type_mismatch("", "object", schema::kind_of(&other)).into(),
                )
            }
        };

        // Default table: fill missing fields, never overwrite supplied ones.
        if let Some(properties) = &doc.properties {
            for (name, property) in properties {
                if let Some(default) = &property.default {
                    if !entries.contains_key(name) {
                        entries.insert(name.clone(), default.clone());
                    }
                }
            }
        }

        let assembled = Value::Object(entries);
        schema::validate(&assembled, doc)?;
        let entries = match assembled {
            Value::Object(map) => map,
            // just built as an object above
            _ => Map::new(),
        };

        Ok(Self { descriptor, entries })
    }

    /// Validates one field write against the field's own schema (or the
    /// additional-property policy for undeclared keys).
    fn check_field(&self, key: &str, value: &Value) -> Result<(), ValidationFailure> {
        let doc = self.descriptor.to_schema();
        if let Some(properties) = &doc.properties {
            if let Some(property) = properties.get(key) {
                return schema::validate_at(value, property, key);
            }
        }
        match &doc.additional_properties {
            None | Some(AdditionalProperties::Allowed(true)) => Ok(()),
            Some(AdditionalProperties::Allowed(false)) => {
                Err(ValidationFailure::extra_field(key))
            }
            Some(AdditionalProperties::Schema(extra)) => schema::validate_at(value, extra, key),
        }
    }

    /// Validated item assignment; the write commits only after the
    /// single field's schema accepts the value.
    pub fn insert(&mut self, key: &str, value: Value) -> Result<Option<Value>, ValidationFailure> {
        self.check_field(key, &value)?;
        Ok(self.entries.insert(key.to_string(), value))
    }

    /// Removes a key. Removing a required field would leave the map
    /// invalid, so it fails and leaves the entry in place. Defaults are
    /// not re-applied on delete.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, ValidationFailure> {
        if let Some(required) = &self.descriptor.to_schema().required {
            if required.iter().any(|name| name == key) && self.entries.contains_key(key) {
                return Err(ValidationFailure::missing_field(key));
            }
        }
        Ok(self.entries.remove(key))
    }

    /// All-or-nothing multi-field update: every entry is validated
    /// before any of them is written.
    pub fn merge(&mut self, updates: Map<String, Value>) -> Result<(), ValidationFailure> {
        for (key, value) in &updates {
            self.check_field(key, value)?;
        }
        for (key, value) in updates {
            self.entries.insert(key, value);
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn schema(&self) -> &SchemaDocument {
        self.descriptor.to_schema()
    }
}
