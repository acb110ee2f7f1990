//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`]: walks an [`ObjectSchema`]
//! and produces the provider-neutral JSON Schema used for function calling.
//!
//! | Field kind | JSON Schema |
//! |------------|-------------|
//! | `String` | `{"type": "string"}` |
//! | `Number` | `{"type": "number"}` |
//! | `Integer` | `{"type": "integer"}` |
//! | `Boolean` | `{"type": "boolean"}` |
//! | `Enum(values)` | `{"type": "string", "enum": values}` |
//! | `Array(kind)` | `{"type": "array", "items": <kind>}` |
//! | `Object(schema)` | nested object schema |
//! | `Optional(kind)` | `<kind>`, field left out of `required` |
//! | `Other(_)` | `{"type": "string"}` |

use board_application::ports::tool_schema::ToolSchemaPort;
use board_domain::{Field, FieldKind, ObjectSchema};
use serde_json::{Map, Value, json};

/// Default implementation producing provider-neutral JSON Schema.
pub struct JsonSchemaToolConverter;

impl JsonSchemaToolConverter {
    fn object_schema(schema: &ObjectSchema) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &schema.fields {
            properties.insert(field.name.clone(), Self::field_schema(field));
            if field.is_required() {
                required.push(json!(field.name));
            }
        }

        let mut object = Map::new();
        object.insert("type".to_string(), json!("object"));
        object.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            object.insert("required".to_string(), Value::Array(required));
        }
        Value::Object(object)
    }

    fn field_schema(field: &Field) -> Value {
        let mut property = Self::kind_schema(&field.kind);
        if let (Some(description), Value::Object(map)) = (&field.description, &mut property)
            && !description.is_empty()
        {
            map.insert("description".to_string(), json!(description));
        }
        property
    }

    fn kind_schema(kind: &FieldKind) -> Value {
        match kind {
            FieldKind::String => json!({"type": "string"}),
            FieldKind::Number => json!({"type": "number"}),
            FieldKind::Integer => json!({"type": "integer"}),
            FieldKind::Boolean => json!({"type": "boolean"}),
            FieldKind::Enum(values) => json!({"type": "string", "enum": values}),
            FieldKind::Array(items) => json!({"type": "array", "items": Self::kind_schema(items)}),
            FieldKind::Object(schema) => Self::object_schema(schema),
            FieldKind::Optional(inner) => Self::kind_schema(inner),
            FieldKind::Other(name) => {
                tracing::debug!(kind = %name, "Unsupported field kind, exposing as string");
                json!({"type": "string"})
            }
        }
    }
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn to_json_schema(&self, schema: &ObjectSchema) -> Value {
        Self::object_schema(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_domain::ToolDefinition;

    #[test]
    fn test_required_matches_non_optional_fields() {
        let schema = ObjectSchema::new()
            .required("path", FieldKind::String, "File path to read")
            .optional("offset", FieldKind::Integer, "First line")
            .optional("limit", FieldKind::Integer, "Max lines");

        let json = JsonSchemaToolConverter.to_json_schema(&schema);

        assert_eq!(json["type"], "object");
        assert_eq!(json["required"], json!(["path"]));
        assert_eq!(json["properties"]["path"]["type"], "string");
        assert_eq!(json["properties"]["path"]["description"], "File path to read");
        assert_eq!(json["properties"]["offset"]["type"], "integer");
    }

    #[test]
    fn test_required_omitted_when_all_optional() {
        let schema = ObjectSchema::new().optional("role", FieldKind::String, "");
        let json = JsonSchemaToolConverter.to_json_schema(&schema);
        assert!(json.get("required").is_none());
        assert!(json["properties"]["role"].get("description").is_none());

        let empty = JsonSchemaToolConverter.to_json_schema(&ObjectSchema::new());
        assert_eq!(empty, json!({"type": "object", "properties": {}}));
    }

    #[test]
    fn test_optional_unwrapped_before_dispatch() {
        let required = ObjectSchema::new().required("name", FieldKind::String, "n");
        let optional = ObjectSchema::new().optional("name", FieldKind::String, "n");
        let a = JsonSchemaToolConverter.to_json_schema(&required);
        let b = JsonSchemaToolConverter.to_json_schema(&optional);
        assert_eq!(a["properties"]["name"], b["properties"]["name"]);
    }

    #[test]
    fn test_enum_becomes_string_with_literals() {
        let schema = ObjectSchema::new().required(
            "state",
            FieldKind::enumeration(["backlog", "done"]),
            "Target state",
        );
        let json = JsonSchemaToolConverter.to_json_schema(&schema);
        assert_eq!(
            json["properties"]["state"],
            json!({"type": "string", "enum": ["backlog", "done"], "description": "Target state"})
        );
    }

    #[test]
    fn test_nested_optional_object_keeps_inner_required_inside() {
        let inner = ObjectSchema::new()
            .required("name", FieldKind::String, "")
            .optional("email", FieldKind::String, "");
        let schema = ObjectSchema::new()
            .required("id", FieldKind::String, "")
            .optional("owner", FieldKind::Object(inner), "Owner");

        let json = JsonSchemaToolConverter.to_json_schema(&schema);

        assert_eq!(json["required"], json!(["id"]));
        let owner = &json["properties"]["owner"];
        assert_eq!(owner["type"], "object");
        assert_eq!(owner["required"], json!(["name"]));
        assert_eq!(owner["description"], "Owner");
    }

    #[test]
    fn test_array_of_objects_recurses() {
        let edit = ObjectSchema::new()
            .required("old", FieldKind::String, "")
            .required("new", FieldKind::String, "");
        let schema = ObjectSchema::new().required(
            "edits",
            FieldKind::array(FieldKind::Object(edit)),
            "",
        );

        let json = JsonSchemaToolConverter.to_json_schema(&schema);
        let items = &json["properties"]["edits"]["items"];
        assert_eq!(json["properties"]["edits"]["type"], "array");
        assert_eq!(items["type"], "object");
        assert_eq!(items["required"], json!(["old", "new"]));
    }

    #[test]
    fn test_unsupported_kind_degrades_to_string() {
        let schema = ObjectSchema::new().required("when", FieldKind::Other("date".into()), "");
        let json = JsonSchemaToolConverter.to_json_schema(&schema);
        assert_eq!(json["properties"]["when"], json!({"type": "string"}));
        assert_eq!(json["required"], json!(["when"]));
    }

    #[test]
    fn test_tool_surface_round_trip() {
        let schema = ObjectSchema::new().required("content", FieldKind::String, "Body");
        let tool = ToolDefinition::new("post_comment", "Post a comment", schema.clone());

        let surface = JsonSchemaToolConverter.tool_surface(&tool);

        assert_eq!(surface.name, "post_comment");
        assert_eq!(surface.description, "Post a comment");
        assert_eq!(surface.parameters, JsonSchemaToolConverter.to_json_schema(&schema));
    }
}
