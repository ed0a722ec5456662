//! Schema synthesizer: descriptor tree to Schema Document.
//!
//! Pure function of the descriptor tree; callers memoize the result
//! per descriptor identity. Synthesis rules:
//! - object fields without a default are `required`; defaulted fields
//!   are excluded from `required` and record the default under their
//!   property schema
//! - `additionalProperties` is emitted only when the policy is not
//!   permissive
//! - a single array item descriptor gives a homogeneous `items`
//!   schema; tuple slots give positional item schemas
//! - union gives `anyOf` in operand order
//! - refinement merges constraint keywords into the base document

use std::collections::BTreeMap;

use crate::schema::{AdditionalProperties, Items, SchemaDocument, TypeName};

use super::types::{Additional, Kind};

pub(crate) fn synthesize(kind: &Kind) -> SchemaDocument {
    match kind {
        Kind::Boolean => SchemaDocument::scalar(TypeName::Boolean),
        Kind::Integer => SchemaDocument::scalar(TypeName::Integer),
        Kind::Float => SchemaDocument::scalar(TypeName::Number),
        Kind::Str => SchemaDocument::scalar(TypeName::String),
        Kind::Null => SchemaDocument::scalar(TypeName::Null),

        Kind::Instance(check) => SchemaDocument {
            format: Some(format!("instance:{}", check.name())),
            instance: Some(check.clone()),
            ..SchemaDocument::default()
        },

        Kind::Object { fields, additional } => {
            let mut properties = BTreeMap::new();
            let mut required = Vec::new();
            for field in fields {
                let mut property = field.descriptor.to_schema().clone();
                match &field.default {
                    Some(default) => property.default = Some(default.clone()),
                    None => required.push(field.name.clone()),
                }
                properties.insert(field.name.clone(), property);
            }
            SchemaDocument {
                ty: Some(TypeName::Object),
                properties: Some(properties),
                required: if required.is_empty() {
                    None
                } else {
                    Some(required)
                },
                additional_properties: match additional {
                    Additional::Permissive => None,
                    Additional::Sealed => Some(AdditionalProperties::Allowed(false)),
                    Additional::Schema(descriptor) => Some(AdditionalProperties::Schema(
                        Box::new(descriptor.to_schema().clone()),
                    )),
                },
                ..SchemaDocument::default()
            }
        }

        Kind::Array { items } => SchemaDocument {
            ty: Some(TypeName::Array),
            items: Some(Items::Single(Box::new(items.to_schema().clone()))),
            ..SchemaDocument::default()
        },

        Kind::Tuple { slots } => SchemaDocument {
            ty: Some(TypeName::Array),
            items: Some(Items::Positional(
                slots.iter().map(|slot| slot.to_schema().clone()).collect(),
            )),
            ..SchemaDocument::default()
        },

        Kind::Union { operands } => SchemaDocument {
            any_of: Some(
                operands
                    .iter()
                    .map(|operand| operand.to_schema().clone())
                    .collect(),
            ),
            ..SchemaDocument::default()
        },

        Kind::Refined { base, constraint } => constraint.apply(base.to_schema()),
    }
}
