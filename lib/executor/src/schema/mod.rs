//! Schema definitions and the type registry.
//!
//! Everything in this module is constructed once by the [`SchemaBuilder`]
//! and immutable afterwards: executions only ever read it, so one schema
//! can serve unsynchronized concurrent executions.

mod builder;

use std::fmt::{self, Display};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::resolver::Resolver;
use crate::response::ExecutionResult;

pub use builder::{FieldBuilder, ObjectTypeBuilder, SchemaBuilder, SchemaError};

/// Name of the implicit root object type every schema exposes.
pub const QUERY_TYPE_NAME: &str = "Query";

/// Reference to a declared type: a named type or a list of some inner
/// type. Named types are resolved through the registry at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> TypeRef {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> TypeRef {
        TypeRef::List(Box::new(inner))
    }

    pub fn int() -> TypeRef {
        TypeRef::named("Int")
    }

    pub fn float() -> TypeRef {
        TypeRef::named("Float")
    }

    pub fn string() -> TypeRef {
        TypeRef::named("String")
    }

    pub fn boolean() -> TypeRef {
        TypeRef::named("Boolean")
    }

    /// The named type under any list nesting.
    pub fn innermost_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) => inner.innermost_name(),
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
        }
    }
}

/// The built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 4] = [
        ScalarKind::Int,
        ScalarKind::Float,
        ScalarKind::String,
        ScalarKind::Boolean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::String => "String",
            ScalarKind::Boolean => "Boolean",
        }
    }

    pub fn from_name(name: &str) -> Option<ScalarKind> {
        ScalarKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether a resolver-produced JSON value conforms to this kind.
    /// `Float` accepts any number: resolver output is JSON, where `1` and
    /// `1.0` are indistinguishable once serialized.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ScalarKind::Int => value.is_i64() || value.is_u64(),
            ScalarKind::Float => value.is_number(),
            ScalarKind::String => value.is_string(),
            ScalarKind::Boolean => value.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar(ScalarKind),
    Object,
}

/// A declared type: scalar or object. Field order follows declaration
/// order; names are unique within a type (enforced at build time).
#[derive(Debug)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    fields: IndexMap<String, FieldDefinition>,
}

impl TypeDefinition {
    pub(crate) fn new_scalar(kind: ScalarKind) -> TypeDefinition {
        TypeDefinition {
            name: kind.name().to_string(),
            kind: TypeKind::Scalar(kind),
            fields: IndexMap::new(),
        }
    }

    pub(crate) fn new_object(
        name: String,
        fields: IndexMap<String, FieldDefinition>,
    ) -> TypeDefinition {
        TypeDefinition {
            name,
            kind: TypeKind::Object,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, TypeKind::Scalar(_))
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.kind {
            TypeKind::Scalar(kind) => Some(kind),
            TypeKind::Object => None,
        }
    }
}

/// A field on an object type: declared return type, argument definitions
/// in declaration order, and the resolver backing it.
pub struct FieldDefinition {
    pub name: String,
    pub field_type: TypeRef,
    pub arguments: Vec<ArgumentDefinition>,
    resolver: Arc<dyn Resolver>,
}

impl FieldDefinition {
    pub(crate) fn new(
        name: String,
        field_type: TypeRef,
        arguments: Vec<ArgumentDefinition>,
        resolver: Arc<dyn Resolver>,
    ) -> FieldDefinition {
        FieldDefinition {
            name,
            field_type,
            arguments,
            resolver,
        }
    }

    pub(crate) fn resolver(&self) -> &dyn Resolver {
        self.resolver.as_ref()
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// A declared resolver argument. An argument is either required (must
/// appear in every valid invocation) or optional (may be omitted, in
/// which case the default — or null — is bound instead).
#[derive(Debug, Clone)]
pub struct ArgumentDefinition {
    pub name: String,
    pub argument_type: TypeRef,
    pub optional: bool,
    pub default_value: Option<Value>,
}

impl ArgumentDefinition {
    pub fn required(name: impl Into<String>, argument_type: TypeRef) -> ArgumentDefinition {
        ArgumentDefinition {
            name: name.into(),
            argument_type,
            optional: false,
            default_value: None,
        }
    }

    /// Optional with no default: omission binds null.
    pub fn optional(name: impl Into<String>, argument_type: TypeRef) -> ArgumentDefinition {
        ArgumentDefinition {
            name: name.into(),
            argument_type,
            optional: true,
            default_value: None,
        }
    }

    pub fn optional_with_default(
        name: impl Into<String>,
        argument_type: TypeRef,
        default_value: Value,
    ) -> ArgumentDefinition {
        ArgumentDefinition {
            name: name.into(),
            argument_type,
            optional: true,
            default_value: Some(default_value),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown type \"{type_name}\"")]
    UnknownType { type_name: String },
    #[error("unknown field \"{field_name}\" on type \"{type_name}\"")]
    UnknownField {
        type_name: String,
        field_name: String,
    },
}

/// Read-only lookup table of every declared type, built-in scalars
/// included. Built once, then shared by reference across executions.
#[derive(Debug)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDefinition>,
}

impl TypeRegistry {
    pub(crate) fn new(types: IndexMap<String, TypeDefinition>) -> TypeRegistry {
        TypeRegistry { types }
    }

    pub fn lookup(&self, type_name: &str) -> Result<&TypeDefinition, RegistryError> {
        self.types.get(type_name).ok_or_else(|| RegistryError::UnknownType {
            type_name: type_name.to_string(),
        })
    }

    pub fn field_of(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Result<&FieldDefinition, RegistryError> {
        self.lookup(type_name)?
            .field(field_name)
            .ok_or_else(|| RegistryError::UnknownField {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
            })
    }
}

/// An immutable schema: the type registry plus the implicit `Query` root.
#[derive(Debug)]
pub struct Schema {
    registry: TypeRegistry,
}

impl Schema {
    pub(crate) fn new(registry: TypeRegistry) -> Schema {
        Schema { registry }
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Execute a query against this schema with a null root value.
    pub fn execute(&self, query: &str) -> ExecutionResult {
        crate::execute(self, query)
    }

    /// Execute a query with a caller-supplied root source value.
    pub fn execute_with_root(&self, query: &str, root_value: &Value) -> ExecutionResult {
        crate::execute_with_root(self, query, root_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TypeRegistry {
        let mut builder = SchemaBuilder::new();
        builder.query_field(FieldBuilder::new("actor", TypeRef::named("Actor")));
        builder
            .object_type("Actor")
            .field(FieldBuilder::new("name", TypeRef::string()));
        let schema = builder.finish().expect("schema should build");
        let Schema { registry } = schema;
        registry
    }

    #[test]
    fn lookup_finds_declared_and_built_in_types() {
        let registry = registry();
        assert_eq!(registry.lookup("Actor").unwrap().kind, TypeKind::Object);
        assert_eq!(
            registry.lookup("Int").unwrap().scalar_kind(),
            Some(ScalarKind::Int)
        );
        assert_eq!(registry.lookup(QUERY_TYPE_NAME).unwrap().kind, TypeKind::Object);
    }

    #[test]
    fn lookup_fails_for_unknown_types() {
        let err = registry().lookup("Ghost").unwrap_err();
        assert_eq!(err.to_string(), "unknown type \"Ghost\"");
    }

    #[test]
    fn field_of_fails_for_unknown_fields() {
        let err = registry().field_of("Actor", "height").unwrap_err();
        assert_eq!(err.to_string(), "unknown field \"height\" on type \"Actor\"");
    }

    #[test]
    fn type_refs_display_with_list_brackets() {
        assert_eq!(TypeRef::list(TypeRef::string()).to_string(), "[String]");
        assert_eq!(
            TypeRef::list(TypeRef::list(TypeRef::int())).innermost_name(),
            "Int"
        );
    }
}
