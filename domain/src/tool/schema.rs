//! Typed parameter descriptors
//!
//! A tool declares its parameters as an [`ObjectSchema`]: a tree of
//! [`Field`]s whose kinds form the closed [`FieldKind`] union. The
//! infrastructure schema converter pattern-matches this tree to produce the
//! JSON schema sent to the model; [`ObjectSchema::validate`] (see
//! `validation.rs`) checks and coerces raw arguments against the same tree.
//!
//! ```
//! use board_domain::tool::schema::{FieldKind, ObjectSchema};
//!
//! let schema = ObjectSchema::new()
//!     .required("path", FieldKind::String, "File path relative to the workspace")
//!     .optional("limit", FieldKind::Integer, "Maximum lines to return");
//!
//! assert_eq!(schema.required_names(), vec!["path"]);
//! ```

/// Kind of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    /// A string restricted to a literal set
    Enum(Vec<String>),
    Array(Box<FieldKind>),
    Object(ObjectSchema),
    /// Wraps any kind to mark the field as not required
    Optional(Box<FieldKind>),
    /// A kind the converter has no mapping for; exposed as a plain string
    Other(String),
}

impl FieldKind {
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn array(items: FieldKind) -> Self {
        FieldKind::Array(Box::new(items))
    }

    pub fn optional(inner: FieldKind) -> Self {
        match inner {
            FieldKind::Optional(_) => inner,
            other => FieldKind::Optional(Box::new(other)),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldKind::Optional(_))
    }

    /// Strip any `Optional` wrappers.
    pub fn unwrap_optional(&self) -> &FieldKind {
        match self {
            FieldKind::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    /// Short type name used in validation messages.
    pub fn type_name(&self) -> &str {
        match self.unwrap_optional() {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum(_) => "enum",
            FieldKind::Array(_) => "array",
            FieldKind::Object(_) => "object",
            FieldKind::Other(name) => name,
            FieldKind::Optional(_) => "optional",
        }
    }
}

/// A named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub description: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_required(&self) -> bool {
        !self.kind.is_optional()
    }
}

/// Ordered set of fields describing an object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn required(
        self,
        name: impl Into<String>,
        kind: FieldKind,
        description: impl Into<String>,
    ) -> Self {
        self.field(Field::new(name, kind).with_description(description))
    }

    pub fn optional(
        self,
        name: impl Into<String>,
        kind: FieldKind,
        description: impl Into<String>,
    ) -> Self {
        self.field(Field::new(name, FieldKind::optional(kind)).with_description(description))
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the non-optional top-level fields, in declaration order.
    pub fn required_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_names_skip_optionals() {
        let schema = ObjectSchema::new()
            .required("a", FieldKind::String, "")
            .optional("b", FieldKind::Number, "")
            .required("c", FieldKind::Boolean, "");
        assert_eq!(schema.required_names(), vec!["a", "c"]);
    }

    #[test]
    fn test_nested_required_does_not_surface() {
        let inner = ObjectSchema::new().required("name", FieldKind::String, "");
        let schema = ObjectSchema::new().optional("meta", FieldKind::Object(inner), "");
        assert!(schema.required_names().is_empty());
    }

    #[test]
    fn test_optional_is_not_double_wrapped() {
        let kind = FieldKind::optional(FieldKind::optional(FieldKind::String));
        assert_eq!(kind, FieldKind::Optional(Box::new(FieldKind::String)));
        assert_eq!(kind.unwrap_optional(), &FieldKind::String);
        assert_eq!(kind.type_name(), "string");
    }
}
