//! Configuration binding.
//!
//! A `ConfigBinder` turns external configuration text into a validated
//! `Record`: the reader produces a raw value, the binder validates it
//! against an object descriptor (filling declared defaults), and the
//! result is a mutation-guarded record. Reading and parsing are
//! pluggable through `ConfigSource`; a JSON reader is built in.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::container::{Record, Shape};
use crate::descriptor::Descriptor;
use crate::observability::Logger;
use crate::schema::{DefinitionError, SchemaError, TypeName, ValidationFailure};

// ============================================================
// Errors
// ============================================================

/// Everything that can go wrong between a config file and a bound record.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("failed to read config '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse config '{path}' as {format}: {reason}")]
    Parse {
        path: String,
        format: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

impl From<SchemaError> for BindError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Validation(failure) => BindError::Validation(failure),
            SchemaError::Definition(definition) => BindError::Definition(definition),
        }
    }
}

// ============================================================
// Sources
// ============================================================

/// A pluggable reader from configuration text to a raw value.
pub trait ConfigSource {
    /// Format name used in parse errors and log fields.
    fn format(&self) -> &'static str;

    /// Parses raw text into a value, or a human-readable reason.
    fn parse(&self, text: &str) -> Result<Value, String>;
}

/// The built-in JSON reader.
pub struct JsonSource;

impl ConfigSource for JsonSource {
    fn format(&self) -> &'static str {
        "json"
    }

    fn parse(&self, text: &str) -> Result<Value, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }
}

// ============================================================
// Binder
// ============================================================

/// Binds raw configuration values to a declared object shape.
pub struct ConfigBinder {
    descriptor: Descriptor,
}

impl ConfigBinder {
    /// Builds a binder from a shape declaration.
    pub fn new(shape: &Shape) -> Result<Self, DefinitionError> {
        Self::from_descriptor(shape.clone().into_descriptor()?)
    }

    /// Builds a binder from an already-built descriptor, which must
    /// describe an object.
    pub fn from_descriptor(descriptor: Descriptor) -> Result<Self, DefinitionError> {
        if descriptor.to_schema().ty != Some(TypeName::Object) {
            return Err(DefinitionError::WrongDescriptorKind {
                container: "config binder",
                expected: "object",
                actual: descriptor.kind_name().to_string(),
            });
        }
        Ok(Self { descriptor })
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Validates a raw value and returns the bound record, with
    /// declared defaults filled for absent fields.
    pub fn bind(&self, raw: Value) -> Result<Record, BindError> {
        match Record::bind_value(self.descriptor.clone(), raw) {
            Ok(record) => Ok(record),
            Err(err) => {
                if let SchemaError::Validation(failure) = &err {
                    Logger::warn(
                        "CONFIG_REJECTED",
                        &[
                            ("path", failure.path.as_str()),
                            ("expected", failure.expected.as_str()),
                            ("actual", failure.actual.as_str()),
                        ],
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Reads a config file through the given source and binds it.
    pub fn load(&self, path: &Path, source: &dyn ConfigSource) -> Result<Record, BindError> {
        let text = fs::read_to_string(path).map_err(|e| BindError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let raw = source.parse(&text).map_err(|reason| BindError::Parse {
            path: path.display().to_string(),
            format: source.format(),
            reason,
        })?;

        let record = self.bind(raw)?;
        Logger::info(
            "CONFIG_LOADED",
            &[
                ("path", path.display().to_string().as_str()),
                ("format", source.format()),
            ],
        );
        Ok(record)
    }

    /// Overlays a raw object onto an existing record, all-or-nothing.
    pub fn merge_into(&self, record: &mut Record, overlay: Value) -> Result<(), BindError> {
        let updates = match overlay {
            Value::Object(updates) => updates,
            other => {
                return Err(ValidationFailure::type_mismatch(
                    "",
                    "object",
                    crate::schema::kind_of(&other),
                )
                .into())
            }
        };
        record.merge(updates)?;
        Ok(())
    }
}
