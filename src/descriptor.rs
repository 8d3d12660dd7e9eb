//! Application type descriptors
//!
//! A [`TypeDescriptor`] is the input handed to the converter chain during
//! schema resolution: a description of an application-level type (a named
//! model, a primitive, or a homogeneous collection) detached from any live
//! value. The descriptor carries only what converters need to produce a
//! schema fragment.

use serde::{Deserialize, Serialize};

/// Scalar kinds that map directly to an OpenAPI primitive schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Long,
    Float,
    Double,
    String,
    Date,
    DateTime,
    Binary,
}

impl PrimitiveKind {
    /// The `type` and optional `format` fields of the corresponding schema
    /// fragment.
    pub fn schema_parts(self) -> (&'static str, Option<&'static str>) {
        match self {
            PrimitiveKind::Boolean => ("boolean", None),
            PrimitiveKind::Integer => ("integer", Some("int32")),
            PrimitiveKind::Long => ("integer", Some("int64")),
            PrimitiveKind::Float => ("number", Some("float")),
            PrimitiveKind::Double => ("number", Some("double")),
            PrimitiveKind::String => ("string", None),
            PrimitiveKind::Date => ("string", Some("date")),
            PrimitiveKind::DateTime => ("string", Some("date-time")),
            PrimitiveKind::Binary => ("string", Some("binary")),
        }
    }
}

/// Description of an application type submitted for schema resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Fully-qualified name of the application type.
    pub type_name: String,
    /// Scalar kind, when the type maps to an OpenAPI primitive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primitive: Option<PrimitiveKind>,
    /// Element descriptor, when the type is a homogeneous collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Box<TypeDescriptor>>,
    /// Whether the value may be null/absent in payloads.
    #[serde(default)]
    pub nullable: bool,
}

impl TypeDescriptor {
    /// Descriptor for a named model type (resolved by reference).
    pub fn object(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            primitive: None,
            item: None,
            nullable: false,
        }
    }

    /// Descriptor for a primitive type.
    pub fn primitive(type_name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            type_name: type_name.into(),
            primitive: Some(kind),
            item: None,
            nullable: false,
        }
    }

    /// Descriptor for a homogeneous collection of `item`.
    pub fn array_of(item: TypeDescriptor) -> Self {
        Self {
            type_name: format!("Vec<{}>", item.type_name),
            primitive: None,
            item: Some(Box::new(item)),
            nullable: false,
        }
    }

    /// Mark the described value as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The unqualified (last path segment) name of the type, used for
    /// `$ref` targets under `#/components/schemas/`.
    pub fn simple_name(&self) -> &str {
        self.type_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.type_name)
    }
}
