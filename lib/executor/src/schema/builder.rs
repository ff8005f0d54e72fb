use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::resolver::{PropertyResolver, Resolver, ResolverFault};
use crate::schema::{
    ArgumentDefinition, FieldDefinition, ScalarKind, Schema, TypeDefinition, TypeRef,
    TypeRegistry, QUERY_TYPE_NAME,
};

/// Schema declaration failure, reported when the builder finishes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("type \"{0}\" is declared more than once")]
    DuplicateType(String),
    #[error("field \"{field}\" is declared more than once on type \"{type_name}\"")]
    DuplicateField { type_name: String, field: String },
    #[error("argument \"{argument}\" is declared more than once on field \"{type_name}.{field}\"")]
    DuplicateArgument {
        type_name: String,
        field: String,
        argument: String,
    },
    #[error("field \"{type_name}.{field}\" references undeclared type \"{referenced}\"")]
    UnknownFieldType {
        type_name: String,
        field: String,
        referenced: String,
    },
    #[error("argument \"{argument}\" on field \"{type_name}.{field}\" must have a scalar type, got \"{referenced}\"")]
    NonScalarArgument {
        type_name: String,
        field: String,
        argument: String,
        referenced: String,
    },
    #[error("default value for argument \"{argument}\" on field \"{type_name}.{field}\" does not conform to type \"{declared}\"")]
    DefaultValueMismatch {
        type_name: String,
        field: String,
        argument: String,
        declared: String,
    },
}

/// Builder for an immutable [`Schema`].
///
/// Fields on the implicit `Query` root are registered through
/// [`SchemaBuilder::query_field`]; object types through
/// [`SchemaBuilder::object_type`]. Data-model invariants (unique names,
/// resolvable type references, scalar argument types, well-typed
/// defaults) are checked once in [`SchemaBuilder::finish`].
#[derive(Default)]
pub struct SchemaBuilder {
    query_fields: Vec<FieldBuilder>,
    types: Vec<ObjectTypeBuilder>,
}

impl SchemaBuilder {
    pub fn new() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Declare a field on the implicit `Query` root type.
    pub fn query_field(&mut self, field: FieldBuilder) -> &mut SchemaBuilder {
        self.query_fields.push(field);
        self
    }

    /// Declare an object type; attach fields through the returned builder.
    pub fn object_type(&mut self, name: impl Into<String>) -> &mut ObjectTypeBuilder {
        self.types.push(ObjectTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        });
        self.types.last_mut().expect("just pushed")
    }

    pub fn finish(self) -> Result<Schema, SchemaError> {
        let mut types: IndexMap<String, TypeDefinition> = IndexMap::new();
        for kind in ScalarKind::ALL {
            types.insert(kind.name().to_string(), TypeDefinition::new_scalar(kind));
        }

        let query = ObjectTypeBuilder {
            name: QUERY_TYPE_NAME.to_string(),
            fields: self.query_fields,
        };
        for object in std::iter::once(query).chain(self.types) {
            if types.contains_key(&object.name) {
                return Err(SchemaError::DuplicateType(object.name));
            }
            let definition = object.build()?;
            types.insert(definition.name.clone(), definition);
        }

        validate_references(&types)?;
        Ok(Schema::new(TypeRegistry::new(types)))
    }
}

fn validate_references(types: &IndexMap<String, TypeDefinition>) -> Result<(), SchemaError> {
    for definition in types.values() {
        for field in definition.fields() {
            let referenced = field.field_type.innermost_name();
            if !types.contains_key(referenced) {
                return Err(SchemaError::UnknownFieldType {
                    type_name: definition.name.clone(),
                    field: field.name.clone(),
                    referenced: referenced.to_string(),
                });
            }
            for argument in &field.arguments {
                let scalar = match &argument.argument_type {
                    TypeRef::Named(name) => ScalarKind::from_name(name),
                    TypeRef::List(_) => None,
                };
                let Some(scalar) = scalar else {
                    return Err(SchemaError::NonScalarArgument {
                        type_name: definition.name.clone(),
                        field: field.name.clone(),
                        argument: argument.name.clone(),
                        referenced: argument.argument_type.to_string(),
                    });
                };
                if let Some(default) = &argument.default_value {
                    if !default.is_null() && !scalar.accepts(default) {
                        return Err(SchemaError::DefaultValueMismatch {
                            type_name: definition.name.clone(),
                            field: field.name.clone(),
                            argument: argument.name.clone(),
                            declared: argument.argument_type.to_string(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Builder for one object type's field list.
pub struct ObjectTypeBuilder {
    name: String,
    fields: Vec<FieldBuilder>,
}

impl ObjectTypeBuilder {
    pub fn field(&mut self, field: FieldBuilder) -> &mut ObjectTypeBuilder {
        self.fields.push(field);
        self
    }

    fn build(self) -> Result<TypeDefinition, SchemaError> {
        let type_name = self.name;
        let mut fields: IndexMap<String, FieldDefinition> = IndexMap::new();
        for field in self.fields {
            let mut seen: Vec<&str> = Vec::with_capacity(field.arguments.len());
            for argument in &field.arguments {
                if seen.contains(&argument.name.as_str()) {
                    return Err(SchemaError::DuplicateArgument {
                        type_name,
                        field: field.name,
                        argument: argument.name.clone(),
                    });
                }
                seen.push(&argument.name);
            }
            let resolver = field.resolver.unwrap_or_else(|| {
                Arc::new(PropertyResolver {
                    key: field.name.clone(),
                })
            });
            let definition =
                FieldDefinition::new(field.name, field.field_type, field.arguments, resolver);
            if let Some(previous) = fields.insert(definition.name.clone(), definition) {
                return Err(SchemaError::DuplicateField {
                    type_name,
                    field: previous.name,
                });
            }
        }
        Ok(TypeDefinition::new_object(type_name, fields))
    }
}

/// Builder for a single field definition.
pub struct FieldBuilder {
    name: String,
    field_type: TypeRef,
    arguments: Vec<ArgumentDefinition>,
    resolver: Option<Arc<dyn Resolver>>,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> FieldBuilder {
        FieldBuilder {
            name: name.into(),
            field_type,
            arguments: Vec::new(),
            resolver: None,
        }
    }

    /// Declare the next resolver argument. Declaration order is the order
    /// bound arguments are handed to the resolver.
    pub fn argument(mut self, argument: ArgumentDefinition) -> FieldBuilder {
        self.arguments.push(argument);
        self
    }

    /// Attach the resolver. Fields without one fall back to reading their
    /// own key out of the source object.
    pub fn resolve<F>(mut self, resolver: F) -> FieldBuilder
    where
        F: Fn(&serde_json::Value, &[serde_json::Value]) -> Result<serde_json::Value, ResolverFault>
            + Send
            + Sync
            + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }
}
