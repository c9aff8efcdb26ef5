//! Parameter schemas for function definitions
//!
//! Function parameters are described with a JSON-Schema-like document. Any
//! schema representation can be plugged into [`ChatFunctions`] as long as it
//! exposes its top-level type tag through [`TypedSchema`].
//!
//! [`ChatFunctions`]: super::ChatFunctions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A schema document that carries a `type` tag
pub trait TypedSchema {
    /// The schema's type tag, e.g. `"object"`
    fn type_tag(&self) -> &str;
}

impl TypedSchema for serde_json::Value {
    /// Reads the `"type"` member; empty when absent or not a string
    fn type_tag(&self) -> &str {
        self.get("type").and_then(serde_json::Value::as_str).unwrap_or("")
    }
}

/// JSON Schema primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Null,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Null => "null",
        }
    }
}

/// The subset of JSON Schema used to describe function arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Type of the described value
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    /// Human readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Members of an object schema
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ParameterSchema>,

    /// Names of required members
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Element schema of an array schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterSchema>>,

    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl TypedSchema for ParameterSchema {
    fn type_tag(&self) -> &str {
        self.schema_type.as_str()
    }
}

impl ParameterSchema {
    /// Create a schema of the given type with nothing else set
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
            items: None,
            enum_values: None,
        }
    }

    pub fn object() -> Self {
        Self::of_type(SchemaType::Object)
    }

    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    pub fn integer() -> Self {
        Self::of_type(SchemaType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    /// Array whose elements follow `items`
    pub fn array(items: ParameterSchema) -> Self {
        let mut schema = Self::of_type(SchemaType::Array);
        schema.items = Some(Box::new(items));
        schema
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an object member, optionally marking it required
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        schema: ParameterSchema,
        required: bool,
    ) -> Self {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    /// Restrict the schema to the given values
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}
