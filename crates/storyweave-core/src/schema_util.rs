//! Helpers for turning Rust type information into JSON Schema that can be
//! shipped alongside a prompt as a provider `response_format`.
//!
//! Not every OpenAI-compatible provider accepts a full schema (DeepSeek only
//! knows `json_object`), so [`ResponseFormat`] offers both shapes.

use schemars::{JsonSchema, SchemaGenerator, r#gen::SchemaSettings};
use serde_json::{self, Value, json};

use crate::error::Result;

/// Generate a JSON Schema for the given `T` **inline**, i.e. without
/// `$ref` pointers to external definitions.
///
/// ```
/// use storyweave_core::schema_util::derive_response_schema;
/// use schemars::JsonSchema;
///
/// #[derive(JsonSchema)]
/// struct Segment { content: String }
///
/// let schema = derive_response_schema::<Segment>().unwrap();
/// assert_eq!(schema["type"], "object");
/// ```
pub fn derive_response_schema<T>() -> Result<Value>
where
    T: JsonSchema + 'static,
{
    let mut settings = SchemaSettings::draft07();
    settings.inline_subschemas = true;

    let generator = SchemaGenerator::new(settings);
    let root = generator.into_root_schema_for::<T>();

    Ok(serde_json::to_value(root)?)
}

/// Structured-output hint sent as `response_format`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// `{"type": "json_object"}` – any valid JSON object.
    JsonObject,
    /// `{"type": "json_schema", ...}` – strict schema-conformant output.
    JsonSchema { name: String, schema: Value },
}

impl ResponseFormat {
    /// Build a strict schema format from a Rust type.
    pub fn json_schema_for<T>(name: impl Into<String>) -> Result<Self>
    where
        T: JsonSchema + 'static,
    {
        Ok(Self::JsonSchema {
            name: name.into(),
            schema: derive_response_schema::<T>()?,
        })
    }

    pub fn to_value(&self) -> Value {
        match self {
            ResponseFormat::JsonObject => json!({ "type": "json_object" }),
            ResponseFormat::JsonSchema { name, schema } => json!({
                "type": "json_schema",
                "json_schema": {
                    "name": name,
                    "schema": schema,
                    "strict": true,
                }
            }),
        }
    }
}
