//! Attribute-record containers and explicit shape declarations.
//!
//! A `Shape` is first-class declaration data: an ordered list of
//! (name, descriptor, optional default) plus an additional-field
//! policy. Extending a shape overrides same-named fields in place and
//! appends new ones, so "inheritance" is field-list concatenation,
//! not class machinery.
//!
//! A `Record` has the same validation semantics as `TypedMap`; the
//! attribute-style `set`/`get` and the item-style `insert` are two
//! thin entry points into the same internal field write, so both
//! reject the same invalid values.

use serde_json::{Map, Value};

use crate::descriptor::{Additional, Descriptor, Field};
use crate::schema::{DefinitionError, SchemaDocument, SchemaError, ValidationFailure};

use super::map::TypedMap;

/// Ordered, explicit shape declaration for record-like containers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    fields: Vec<Field>,
    sealed: bool,
    extra_schema: Option<Descriptor>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a child shape from a parent's declaration.
    pub fn extending(parent: &Shape) -> Self {
        parent.clone()
    }

    /// Declares a field with no default (it becomes required).
    /// Redeclaring a name overrides the parent's field in place.
    pub fn field(self, name: impl Into<String>, descriptor: Descriptor) -> Self {
        self.push(Field::new(name, descriptor))
    }

    /// Declares a field with a literal default (excluded from required).
    pub fn field_with_default(
        self,
        name: impl Into<String>,
        descriptor: Descriptor,
        default: Value,
    ) -> Self {
        self.push(Field::with_default(name, descriptor, default))
    }

    fn push(mut self, field: Field) -> Self {
        match self.fields.iter().position(|f| f.name() == field.name()) {
            Some(index) => self.fields[index] = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Rejects undeclared fields (`additionalProperties: false`).
    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self.extra_schema = None;
        self
    }

    /// Undeclared fields must validate against this descriptor.
    pub fn additional_schema(mut self, descriptor: Descriptor) -> Self {
        self.sealed = false;
        self.extra_schema = Some(descriptor);
        self
    }

    /// The declared default table: field name to default value.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter_map(|f| f.default().map(|d| (f.name(), d)))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    /// Builds the object descriptor this shape declares.
    pub fn into_descriptor(self) -> Result<Descriptor, DefinitionError> {
        let additional = if self.sealed {
            Additional::Sealed
        } else {
            match self.extra_schema {
                Some(descriptor) => Additional::Schema(descriptor),
                None => Additional::Permissive,
            }
        };
        Descriptor::object_with(self.fields, additional)
    }
}

/// A validated record with attribute-style and item-style access.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    map: TypedMap,
}

impl Record {
    /// Constructs from the shape's default table alone.
    pub fn new(shape: &Shape) -> Result<Self, SchemaError> {
        Self::bind(shape.clone().into_descriptor()?)
    }

    /// Constructs from a seed value under the shape's schema.
    pub fn from_value(shape: &Shape, seed: Value) -> Result<Self, SchemaError> {
        Self::bind_value(shape.clone().into_descriptor()?, seed)
    }

    /// Binds an already-built object descriptor with no seed.
    pub fn bind(descriptor: Descriptor) -> Result<Self, SchemaError> {
        Ok(Self {
            map: TypedMap::new(descriptor)?,
        })
    }

    /// Binds an already-built object descriptor to a seed value.
    pub fn bind_value(descriptor: Descriptor, seed: Value) -> Result<Self, SchemaError> {
        Ok(Self {
            map: TypedMap::from_value(descriptor, seed)?,
        })
    }

    // Both entry points funnel through the one validated field write.
    fn set_field(&mut self, name: &str, value: Value) -> Result<Option<Value>, ValidationFailure> {
        self.map.insert(name, value)
    }

    /// Attribute-style assignment.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), ValidationFailure> {
        self.set_field(name, value).map(|_| ())
    }

    /// Item-style assignment; returns the prior value.
    pub fn insert(&mut self, name: &str, value: Value) -> Result<Option<Value>, ValidationFailure> {
        self.set_field(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Result<Option<Value>, ValidationFailure> {
        self.map.remove(name)
    }

    /// All-or-nothing multi-field update.
    pub fn merge(&mut self, updates: Map<String, Value>) -> Result<(), ValidationFailure> {
        self.map.merge(updates)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn to_value(&self) -> Value {
        self.map.to_value()
    }

    pub fn descriptor(&self) -> &Descriptor {
        self.map.descriptor()
    }

    pub fn schema(&self) -> &SchemaDocument {
        self.map.schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_declares_required_and_defaults() {
        let shape = Shape::new()
            .field("a", Descriptor::integer())
            .field_with_default("b", Descriptor::float(), json!(1.1));
        let descriptor = shape.into_descriptor().unwrap();
        let doc = descriptor.to_schema();
        assert_eq!(doc.required, Some(vec!["a".to_string()]));
        assert_eq!(
            doc.properties.as_ref().unwrap()["b"].default,
            Some(json!(1.1))
        );
    }

    #[test]
    fn test_extending_overrides_in_place_and_appends() {
        let parent = Shape::new()
            .field("a", Descriptor::integer())
            .field("b", Descriptor::string());
        let child = Shape::extending(&parent)
            .field("b", Descriptor::boolean())
            .field("c", Descriptor::float());

        let names: Vec<&str> = child.field_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let doc = child.into_descriptor().unwrap().to_schema().clone();
        assert_eq!(
            doc.properties.as_ref().unwrap()["b"].ty,
            Some(crate::schema::TypeName::Boolean)
        );
        assert_eq!(
            doc.required,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_attribute_and_item_writes_share_validation() {
        let shape = Shape::new().field_with_default("i", Descriptor::integer(), json!(20));
        let mut record = Record::new(&shape).unwrap();

        assert!(record.set("i", json!("bad")).is_err());
        assert!(record.insert("i", json!("bad")).is_err());
        record.set("i", json!(7)).unwrap();
        assert_eq!(record.get("i"), Some(&json!(7)));
        let prior = record.insert("i", json!(8)).unwrap();
        assert_eq!(prior, Some(json!(7)));
    }

    #[test]
    fn test_default_fill_on_partial_seed() {
        let shape = Shape::new().field_with_default("i", Descriptor::integer(), json!(20));
        let record = Record::from_value(&shape, json!({ "j": 9 })).unwrap();
        assert_eq!(record.to_value(), json!({ "i": 20, "j": 9 }));

        let record = Record::from_value(&shape, json!({ "i": 9 })).unwrap();
        assert_eq!(record.to_value(), json!({ "i": 9 }));
    }

    #[test]
    fn test_sealed_shape_rejects_unknown_fields() {
        let shape = Shape::new()
            .field("a", Descriptor::integer())
            .field_with_default("b", Descriptor::float(), json!(1.1))
            .sealed();

        assert!(Record::from_value(&shape, json!({ "c": 1 })).is_err());
        let mut record = Record::from_value(&shape, json!({ "a": 1 })).unwrap();
        assert!(record.set("c", json!(1)).is_err());
        assert!(!record.contains("c"));
    }
}
