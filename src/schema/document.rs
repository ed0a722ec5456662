//! Canonical Schema Document representation.
//!
//! A `SchemaDocument` is the serializable form of a validation rule,
//! using the JSON Schema keyword vocabulary (`type`, `properties`,
//! `required`, `items`, `anyOf`, `additionalProperties`, `default`,
//! `minItems`, `pattern`, `format`, ...). Documents are pure data:
//! they are derived from descriptor trees and never mutated in place.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// The primary type a document classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl TypeName {
    /// Returns the type name for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Object => "object",
            TypeName::Array => "array",
            TypeName::String => "string",
            TypeName::Integer => "integer",
            TypeName::Number => "number",
            TypeName::Boolean => "boolean",
            TypeName::Null => "null",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Policy for object fields not declared under `properties`.
///
/// Absent on a document means permissive (unknown fields accepted
/// without a declared schema).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` accepts anything, `false` rejects undeclared fields
    Allowed(bool),
    /// Undeclared fields must validate against this schema
    Schema(Box<SchemaDocument>),
}

/// Item schemas for an array document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Items {
    /// Homogeneous: every element validates against one schema
    Single(Box<SchemaDocument>),
    /// Positional (tuple mode): element `i` validates against schema `i`,
    /// and the value must have exactly this many elements
    Positional(Vec<SchemaDocument>),
}

/// Native-instance predicate: the escape hatch for opaque values that
/// the keyword vocabulary cannot classify.
///
/// Compared by name so documents stay comparable; the predicate itself
/// is opaque. Exported documents carry only the `format` marker the
/// synthesizer writes alongside it.
#[derive(Clone)]
pub struct InstanceCheck {
    name: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl InstanceCheck {
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// The native type name, used in error messages and the format marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the native type-identity check.
    pub fn accepts(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for InstanceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceCheck")
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for InstanceCheck {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Canonical structural description of acceptable values.
///
/// One flat struct with optional keyword slots; which slots are set
/// depends on the node kind (object, array, union, scalar). Serializes
/// to the plain nested mapping form required by `toSchema()`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeName>,

    // Object keywords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaDocument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    // Array keywords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    // String keywords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    // Numeric keywords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    // Combinators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaDocument>>,

    // Construction default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    // Native escape hatch; not part of the serialized vocabulary
    #[serde(skip)]
    pub instance: Option<InstanceCheck>,
}

impl SchemaDocument {
    /// A bare scalar document for the given type.
    pub fn scalar(ty: TypeName) -> Self {
        Self {
            ty: Some(ty),
            ..Self::default()
        }
    }

    /// Short description of what this document expects, for error messages.
    pub fn expectation(&self) -> String {
        if let Some(check) = &self.instance {
            return format!("instance of {}", check.name());
        }
        match (&self.ty, &self.any_of) {
            (Some(ty), _) => ty.as_str().to_string(),
            (None, Some(operands)) => format!("any of {} alternatives", operands.len()),
            (None, None) => "any value".to_string(),
        }
    }

    /// Renders the document as a plain nested mapping.
    pub fn to_value(&self) -> Value {
        // Serialization of this struct cannot fail: all keys are strings
        // and every slot is plain data.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_export() {
        let doc = SchemaDocument::scalar(TypeName::Integer);
        assert_eq!(doc.to_value(), json!({ "type": "integer" }));
    }

    #[test]
    fn test_keyword_spelling() {
        let doc = SchemaDocument {
            ty: Some(TypeName::Array),
            items: Some(Items::Single(Box::new(SchemaDocument::scalar(
                TypeName::String,
            )))),
            min_items: Some(1),
            additional_properties: Some(AdditionalProperties::Allowed(false)),
            any_of: None,
            ..SchemaDocument::default()
        };
        let value = doc.to_value();
        assert_eq!(value["minItems"], json!(1));
        assert_eq!(value["additionalProperties"], json!(false));
        assert_eq!(value["items"], json!({ "type": "string" }));
    }

    #[test]
    fn test_positional_items_export_as_list() {
        let doc = SchemaDocument {
            ty: Some(TypeName::Array),
            items: Some(Items::Positional(vec![
                SchemaDocument::scalar(TypeName::Integer),
                SchemaDocument::scalar(TypeName::String),
            ])),
            ..SchemaDocument::default()
        };
        assert_eq!(
            doc.to_value()["items"],
            json!([{ "type": "integer" }, { "type": "string" }])
        );
    }

    #[test]
    fn test_absent_keywords_are_omitted() {
        let value = SchemaDocument::scalar(TypeName::Object).to_value();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("type"));
    }

    #[test]
    fn test_instance_check_equality_by_name() {
        let a = InstanceCheck::new("Duration", |v| v.is_string());
        let b = InstanceCheck::new("Duration", |v| v.is_number());
        assert_eq!(a, b);
        assert!(a.accepts(&json!("5s")));
        assert!(!a.accepts(&json!(5)));
    }

    #[test]
    fn test_instance_slot_never_serialized() {
        let doc = SchemaDocument {
            format: Some("instance:Duration".into()),
            instance: Some(InstanceCheck::new("Duration", |_| true)),
            ..SchemaDocument::default()
        };
        assert_eq!(doc.to_value(), json!({ "format": "instance:Duration" }));
    }
}
