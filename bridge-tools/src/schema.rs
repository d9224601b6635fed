//! Parameter schemas and argument validation.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// JSON type tag accepted for a tool parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// JSON string.
    String,
    /// JSON integer.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON boolean.
    Boolean,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl ParameterKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl Display for ParameterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for supplied arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The argument payload was not a JSON object.
    #[error("arguments must be a JSON object")]
    NotAnObject,

    /// A required argument was absent.
    #[error("missing required argument `{name}`")]
    MissingArgument {
        /// Name of the absent argument.
        name: String,
    },

    /// An argument carried a value of the wrong JSON type.
    #[error("argument `{name}` must be of type {expected}")]
    InvalidType {
        /// Name of the offending argument.
        name: String,
        /// Declared parameter type.
        expected: ParameterKind,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Property {
    kind: ParameterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    required: bool,
}

/// Structural description of the arguments a tool accepts.
///
/// Covers the object/properties/required subset of JSON Schema that the MCP
/// tool listing exposes. Validation checks presence and JSON type and fills
/// declared defaults; unknown arguments pass through untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParameterSchema {
    properties: BTreeMap<String, Property>,
}

impl ParameterSchema {
    /// Creates a schema accepting an empty argument object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a required parameter.
    #[must_use]
    pub fn required(
        mut self,
        name: impl Into<String>,
        kind: ParameterKind,
        description: impl Into<String>,
    ) -> Self {
        self.properties.insert(
            name.into(),
            Property {
                kind,
                description: Some(description.into()),
                default: None,
                required: true,
            },
        );
        self
    }

    /// Declares an optional parameter with a default value.
    #[must_use]
    pub fn optional(
        mut self,
        name: impl Into<String>,
        kind: ParameterKind,
        description: impl Into<String>,
        default: Value,
    ) -> Self {
        self.properties.insert(
            name.into(),
            Property {
                kind,
                description: Some(description.into()),
                default: Some(default),
                required: false,
            },
        );
        self
    }

    /// Returns `true` when no parameters are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Validates the supplied arguments against this schema.
    ///
    /// A `null` payload is treated as an empty object so tools without
    /// parameters can be called with no arguments at all. Returns the
    /// normalized argument object with defaults filled in.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the payload is not an object, a required
    /// argument is missing, or a value has the wrong JSON type.
    pub fn validate(&self, arguments: &Value) -> Result<Value, SchemaError> {
        let mut normalized = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map.clone(),
            _ => return Err(SchemaError::NotAnObject),
        };

        for (name, property) in &self.properties {
            match normalized.get(name) {
                Some(value) => {
                    if !property.kind.matches(value) {
                        return Err(SchemaError::InvalidType {
                            name: name.clone(),
                            expected: property.kind,
                        });
                    }
                }
                None if property.required => {
                    return Err(SchemaError::MissingArgument { name: name.clone() });
                }
                None => {
                    if let Some(default) = &property.default {
                        normalized.insert(name.clone(), default.clone());
                    }
                }
            }
        }

        Ok(Value::Object(normalized))
    }

    /// Renders the schema as the JSON Schema object advertised over MCP.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (name, property) in &self.properties {
            let mut entry = Map::new();
            entry.insert("type".into(), json!(property.kind.as_str()));
            if let Some(description) = &property.description {
                entry.insert("description".into(), json!(description));
            }
            if let Some(default) = &property.default {
                entry.insert("default".into(), default.clone());
            }
            properties.insert(name.clone(), Value::Object(entry));

            if property.required {
                required.push(json!(name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .required("title", ParameterKind::String, "Resource title")
            .optional("limit", ParameterKind::Integer, "Row cap", json!(10))
    }

    #[test]
    fn validates_and_fills_defaults() {
        let normalized = schema()
            .validate(&json!({ "title": "hello" }))
            .expect("valid");
        assert_eq!(normalized, json!({ "title": "hello", "limit": 10 }));
    }

    #[test]
    fn null_arguments_mean_empty_object() {
        let normalized = ParameterSchema::new().validate(&Value::Null).expect("valid");
        assert_eq!(normalized, json!({}));
    }

    #[test]
    fn missing_required_argument_errors() {
        let err = schema().validate(&json!({})).expect_err("missing title");
        assert_eq!(
            err,
            SchemaError::MissingArgument {
                name: "title".into()
            }
        );
    }

    #[test]
    fn wrong_type_errors() {
        let err = schema()
            .validate(&json!({ "title": 7 }))
            .expect_err("wrong type");
        assert_eq!(
            err,
            SchemaError::InvalidType {
                name: "title".into(),
                expected: ParameterKind::String,
            }
        );
    }

    #[test]
    fn non_object_payload_errors() {
        let err = schema().validate(&json!([1, 2])).expect_err("not object");
        assert_eq!(err, SchemaError::NotAnObject);
    }

    #[test]
    fn unknown_arguments_pass_through() {
        let normalized = schema()
            .validate(&json!({ "title": "x", "extra": true }))
            .expect("valid");
        assert_eq!(normalized["extra"], json!(true));
    }

    #[test]
    fn renders_json_schema() {
        let rendered = schema().to_value();
        assert_eq!(rendered["type"], json!("object"));
        assert_eq!(rendered["required"], json!(["title"]));
        assert_eq!(rendered["properties"]["limit"]["default"], json!(10));
        assert_eq!(rendered["properties"]["title"]["type"], json!("string"));
    }
}
