//! Refinement constraints: schema-keyword deltas.
//!
//! A `Constraint` carries only keyword deltas from a fixed catalogue;
//! it classifies nothing on its own. `refine` merges the deltas into
//! the base document: `required` unions, every other keyword
//! overrides. Combining a keyword with a base kind it cannot apply to
//! is a definition error raised when `refine` is called.

use regex::Regex;
use serde_json::Value;

use crate::schema::{AdditionalProperties, DefinitionError, SchemaDocument, TypeName};

use super::types::Descriptor;

/// Keyword-delta builder used with [`Descriptor::refine`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Constraint {
    pub(crate) required: Option<Vec<String>>,
    pub(crate) default: Option<Value>,
    pub(crate) additional_properties: Option<AdditionalProperties>,
    pub(crate) min_items: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) pattern: Option<String>,
    pub(crate) format: Option<String>,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) minimum: Option<f64>,
    pub(crate) maximum: Option<f64>,
}

impl Constraint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names to add to the base's `required` set (order-preserving union).
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Construction default; overrides any base default.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Allow or reject undeclared fields; overrides the base policy.
    pub fn additional(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(AdditionalProperties::Allowed(allowed));
        self
    }

    /// Undeclared fields must validate against this descriptor.
    pub fn additional_schema(mut self, descriptor: &Descriptor) -> Self {
        self.additional_properties = Some(AdditionalProperties::Schema(Box::new(
            descriptor.to_schema().clone(),
        )));
        self
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn minimum(mut self, n: f64) -> Self {
        self.minimum = Some(n);
        self
    }

    pub fn maximum(mut self, n: f64) -> Self {
        self.maximum = Some(n);
        self
    }

    /// Checks every set keyword against the base document's kind.
    pub(crate) fn check_compatible(&self, base: &SchemaDocument) -> Result<(), DefinitionError> {
        let incompatible = |keyword: &str| DefinitionError::IncompatibleKeyword {
            keyword: keyword.to_string(),
            base: base.expectation(),
        };

        let is = |ty: TypeName| base.ty == Some(ty);
        let numeric = is(TypeName::Integer) || is(TypeName::Number);

        if (self.required.is_some() || self.additional_properties.is_some())
            && !is(TypeName::Object)
        {
            let keyword = if self.required.is_some() {
                "required"
            } else {
                "additionalProperties"
            };
            return Err(incompatible(keyword));
        }
        if (self.min_items.is_some() || self.max_items.is_some()) && !is(TypeName::Array) {
            let keyword = if self.min_items.is_some() {
                "minItems"
            } else {
                "maxItems"
            };
            return Err(incompatible(keyword));
        }
        if (self.pattern.is_some()
            || self.format.is_some()
            || self.min_length.is_some()
            || self.max_length.is_some())
            && !is(TypeName::String)
        {
            let keyword = if self.pattern.is_some() {
                "pattern"
            } else if self.format.is_some() {
                "format"
            } else if self.min_length.is_some() {
                "minLength"
            } else {
                "maxLength"
            };
            return Err(incompatible(keyword));
        }
        if (self.minimum.is_some() || self.maximum.is_some()) && !numeric {
            let keyword = if self.minimum.is_some() {
                "minimum"
            } else {
                "maximum"
            };
            return Err(incompatible(keyword));
        }

        if let Some(pattern) = &self.pattern {
            Regex::new(pattern).map_err(|e| DefinitionError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    /// Merges the deltas into a base document.
    pub(crate) fn apply(&self, base: &SchemaDocument) -> SchemaDocument {
        let mut merged = base.clone();

        if let Some(names) = &self.required {
            let mut combined = merged.required.take().unwrap_or_default();
            for name in names {
                if !combined.contains(name) {
                    combined.push(name.clone());
                }
            }
            merged.required = Some(combined);
        }
        if let Some(default) = &self.default {
            merged.default = Some(default.clone());
        }
        if let Some(policy) = &self.additional_properties {
            merged.additional_properties = Some(policy.clone());
        }
        if self.min_items.is_some() {
            merged.min_items = self.min_items;
        }
        if self.max_items.is_some() {
            merged.max_items = self.max_items;
        }
        if let Some(pattern) = &self.pattern {
            merged.pattern = Some(pattern.clone());
        }
        if let Some(format) = &self.format {
            merged.format = Some(format.clone());
        }
        if self.min_length.is_some() {
            merged.min_length = self.min_length;
        }
        if self.max_length.is_some() {
            merged.max_length = self.max_length;
        }
        if self.minimum.is_some() {
            merged.minimum = self.minimum;
        }
        if self.maximum.is_some() {
            merged.maximum = self.maximum;
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Field;
    use serde_json::json;

    #[test]
    fn test_object_keyword_on_array_base_fails_at_definition() {
        let list = Descriptor::array(Descriptor::integer());
        let result = list.refine(Constraint::new().required(["a"]));
        assert!(matches!(
            result,
            Err(DefinitionError::IncompatibleKeyword { .. })
        ));
    }

    #[test]
    fn test_array_keyword_on_object_base_fails_at_definition() {
        let obj = Descriptor::object(vec![Field::new("a", Descriptor::integer())]).unwrap();
        let result = obj.refine(Constraint::new().min_items(1));
        assert!(matches!(
            result,
            Err(DefinitionError::IncompatibleKeyword { .. })
        ));
    }

    #[test]
    fn test_string_keyword_on_union_base_fails_at_definition() {
        let union = Descriptor::union(vec![Descriptor::string(), Descriptor::integer()]).unwrap();
        let result = union.refine(Constraint::new().pattern("^a"));
        assert!(matches!(
            result,
            Err(DefinitionError::IncompatibleKeyword { .. })
        ));
    }

    #[test]
    fn test_default_applies_to_any_base() {
        let union = Descriptor::union(vec![Descriptor::string(), Descriptor::integer()]).unwrap();
        let refined = union
            .refine(Constraint::new().default_value(json!("fallback")))
            .unwrap();
        assert_eq!(refined.to_schema().default, Some(json!("fallback")));
    }

    #[test]
    fn test_bad_pattern_fails_at_definition() {
        let result = Descriptor::string().refine(Constraint::new().pattern("(unclosed"));
        assert!(matches!(result, Err(DefinitionError::InvalidPattern { .. })));
    }

    #[test]
    fn test_required_unions_and_dedups() {
        let obj = Descriptor::object(vec![
            Field::new("a", Descriptor::integer()),
            Field::new("b", Descriptor::string()),
        ])
        .unwrap();
        let refined = obj
            .refine(Constraint::new().required(["b", "a"]))
            .unwrap();
        // a and b were already required by declaration (no defaults)
        assert_eq!(
            refined.to_schema().required,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_numeric_bounds_merge() {
        let refined = Descriptor::integer()
            .refine(Constraint::new().minimum(0.0).maximum(10.0))
            .unwrap();
        assert!(refined.validate(&json!(5)).is_ok());
        assert!(refined.validate(&json!(-1)).is_err());
        assert!(refined.validate(&json!(11)).is_err());
    }

    #[test]
    fn test_refine_preserves_base_checks() {
        let refined = Descriptor::integer()
            .refine(Constraint::new().minimum(0.0))
            .unwrap();
        // still an integer check, not just a bound check
        assert!(refined.validate(&json!(0.5)).is_err());
    }

    #[test]
    fn test_invalid_constraint_default_fails_at_definition() {
        let result = Descriptor::integer()
            .refine(Constraint::new().minimum(10.0).default_value(json!(3)));
        assert!(matches!(result, Err(DefinitionError::InvalidDefault { .. })));
    }
}
