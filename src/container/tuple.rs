//! Fixed-record (tuple-like) container.
//!
//! A fixed-length, positionally-typed sequence. The descriptor must
//! carry positional item schemas; the length never changes after
//! construction. Constructing from a keyed (non-sequence) value is a
//! validation failure, never a coercion.

use serde_json::Value;

use crate::descriptor::Descriptor;
use crate::schema::{
    self, item_path, DefinitionError, Items, SchemaDocument, SchemaError, TypeName,
    ValidationFailure,
};

/// A validated fixed-length positional sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedTuple {
    descriptor: Descriptor,
    items: Vec<Value>,
}

impl TypedTuple {
    /// Constructs from a seed sequence; arity and every slot type must
    /// match the positional schemas.
    pub fn from_value(descriptor: Descriptor, seed: Value) -> Result<Self, SchemaError> {
        let doc = descriptor.to_schema();
        if doc.ty != Some(TypeName::Array) {
            return Err(DefinitionError::WrongDescriptorKind {
                container: "tuple container",
                expected: "array",
                actual: descriptor.kind_name().to_string(),
            }
            .into());
        }
        if !matches!(doc.items, Some(Items::Positional(_))) {
            return Err(DefinitionError::MissingPositionalItems.into());
        }

        schema::validate(&seed, doc)?;
        let items = match seed {
            Value::Array(items) => items,
            other => {
                return Err(
                    ValidationFailure::type_mismatch("", "array", schema::kind_of(&other)).into(),
                )
            }
        };

        Ok(Self { descriptor, items })
    }

    fn slots(&self) -> &[SchemaDocument] {
        match &self.descriptor.to_schema().items {
            // from_value only accepts positional items
            Some(Items::Positional(slots)) => slots,
            _ => &[],
        }
    }

    /// Replaces the slot at `index` after validating it against that
    /// slot's schema.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), ValidationFailure> {
        let arity = self.items.len();
        match self.slots().get(index) {
            Some(slot) => schema::validate_at(&value, slot, &item_path("", index))?,
            None => {
                return Err(ValidationFailure::item_count(
                    item_path("", index),
                    format!("exactly {} items", arity),
                    index + 1,
                ))
            }
        }
        self.items[index] = value;
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn int_string_tuple() -> Descriptor {
        Descriptor::tuple(vec![Descriptor::integer(), Descriptor::string()])
    }

    #[test]
    fn test_construction_checks_slots() {
        let tuple = TypedTuple::from_value(int_string_tuple(), json!([1, "abc"])).unwrap();
        assert_eq!(tuple.to_value(), json!([1, "abc"]));

        let err = TypedTuple::from_value(int_string_tuple(), json!([1, 2])).unwrap_err();
        match err {
            SchemaError::Validation(failure) => assert_eq!(failure.path, "[1]"),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_arity_is_fixed() {
        assert!(TypedTuple::from_value(int_string_tuple(), json!([1])).is_err());
        assert!(TypedTuple::from_value(int_string_tuple(), json!([1, "a", 2])).is_err());
    }

    #[test]
    fn test_mapping_seed_is_validation_failure() {
        let result = TypedTuple::from_value(int_string_tuple(), json!({ "0": 1, "1": "a" }));
        assert!(matches!(result, Err(SchemaError::Validation(_))));
    }

    #[test]
    fn test_non_positional_descriptor_is_definition_error() {
        let result = TypedTuple::from_value(
            Descriptor::array(Descriptor::integer()),
            json!([1, 2]),
        );
        assert!(matches!(
            result,
            Err(SchemaError::Definition(
                DefinitionError::MissingPositionalItems
            ))
        ));
    }

    #[test]
    fn test_set_validates_slot() {
        let mut tuple = TypedTuple::from_value(int_string_tuple(), json!([1, "a"])).unwrap();
        tuple.set(0, json!(5)).unwrap();
        assert!(tuple.set(0, json!("nope")).is_err());
        assert!(tuple.set(2, json!(1)).is_err());
        assert_eq!(tuple.to_value(), json!([5, "a"]));
    }
}
