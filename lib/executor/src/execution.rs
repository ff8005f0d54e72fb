//! The execution walk: consumes a parsed document plus the type registry,
//! invokes resolvers through the argument binder and assembles the result
//! tree in textual selection order.

use graphql_query_parser::ast::{FieldSelection, QueryDocument, SelectionSet};
use serde_json::{Map, Number, Value};
use tracing::{instrument, trace};

use crate::arguments::bind_arguments;
use crate::resolver::json_kind;
use crate::response::GraphQLError;
use crate::schema::{TypeRef, TypeRegistry, QUERY_TYPE_NAME};

/// State owned by a single execution walk: the registry it reads and the
/// field-local errors it accumulates. Never shared across executions.
struct ExecutionContext<'a> {
    registry: &'a TypeRegistry,
    errors: Vec<GraphQLError>,
}

impl ExecutionContext<'_> {
    fn record(&mut self, path: &[Value], message: String) {
        self.errors.push(GraphQLError {
            message,
            locations: None,
            path: Some(path.to_vec()),
        });
    }
}

/// Walk `document` against the registry, with `root_value` as the source
/// for the root selection set.
///
/// Returns the data tree plus every field-local error collected along the
/// way, in the order the offending fields appear in the query. One field's
/// failure nulls only its own result key; siblings and ancestors continue.
#[instrument(level = "trace", skip_all)]
pub fn execute_document(
    registry: &TypeRegistry,
    root_value: &Value,
    document: &QueryDocument,
) -> (Value, Vec<GraphQLError>) {
    let mut context = ExecutionContext {
        registry,
        errors: Vec::new(),
    };
    let mut path = Vec::new();
    let data = execute_selection_set(
        &mut context,
        &document.selection_set,
        QUERY_TYPE_NAME,
        root_value,
        &mut path,
    );
    (data, context.errors)
}

/// Result keys follow the query's textual selection order, never schema
/// declaration order and never argument order.
fn execute_selection_set(
    context: &mut ExecutionContext<'_>,
    selection_set: &SelectionSet,
    type_name: &str,
    source: &Value,
    path: &mut Vec<Value>,
) -> Value {
    let mut object = Map::with_capacity(selection_set.items.len());
    for field in &selection_set.items {
        let response_key = field.response_key();
        path.push(Value::String(response_key.to_string()));
        let value = execute_field(context, field, type_name, source, path);
        path.pop();
        object.insert(response_key.to_string(), value);
    }
    Value::Object(object)
}

fn execute_field(
    context: &mut ExecutionContext<'_>,
    field: &FieldSelection,
    type_name: &str,
    source: &Value,
    path: &mut Vec<Value>,
) -> Value {
    let registry = context.registry;
    let field_definition = match registry.field_of(type_name, &field.name) {
        Ok(definition) => definition,
        Err(err) => {
            context.record(path, err.to_string());
            return Value::Null;
        }
    };
    let bound_arguments = match bind_arguments(field_definition, &field.arguments) {
        Ok(arguments) => arguments,
        Err(err) => {
            context.record(path, err.to_string());
            return Value::Null;
        }
    };
    trace!(field = %field.name, "invoking resolver");
    let resolved = match field_definition.resolver().resolve(source, &bound_arguments) {
        Ok(value) => value,
        Err(fault) => {
            context.record(
                path,
                format!("resolver for field \"{}\" failed: {}", field.name, fault),
            );
            return Value::Null;
        }
    };
    complete_value(
        context,
        &field_definition.field_type,
        resolved,
        &field.selections,
        path,
    )
}

/// Shape the resolver's return value against the field's declared type:
/// recurse per element for lists, walk nested selections for objects,
/// check conformance for scalars. A null value short-circuits — nested
/// selections are never evaluated against null.
fn complete_value(
    context: &mut ExecutionContext<'_>,
    declared: &TypeRef,
    value: Value,
    selections: &SelectionSet,
    path: &mut Vec<Value>,
) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    match declared {
        TypeRef::List(inner) => match value {
            Value::Array(items) => {
                let mut completed = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    path.push(Value::Number(Number::from(index)));
                    completed.push(complete_value(context, inner, item, selections, path));
                    path.pop();
                }
                Value::Array(completed)
            }
            other => {
                context.record(
                    path,
                    format!(
                        "expected a list for type \"{}\", resolver returned {}",
                        declared,
                        json_kind(&other)
                    ),
                );
                Value::Null
            }
        },
        TypeRef::Named(name) => {
            let definition = match context.registry.lookup(name) {
                Ok(definition) => definition,
                Err(err) => {
                    context.record(path, err.to_string());
                    return Value::Null;
                }
            };
            match definition.scalar_kind() {
                Some(kind) => {
                    if !selections.is_empty() {
                        context.record(
                            path,
                            format!(
                                "field of scalar type \"{}\" cannot have a selection set",
                                name
                            ),
                        );
                        return Value::Null;
                    }
                    if kind.accepts(&value) {
                        value
                    } else {
                        context.record(
                            path,
                            format!(
                                "expected a value of type \"{}\", resolver returned {}",
                                name,
                                json_kind(&value)
                            ),
                        );
                        Value::Null
                    }
                }
                None => {
                    if selections.is_empty() {
                        context.record(
                            path,
                            format!(
                                "field of object type \"{}\" must have a selection set",
                                name
                            ),
                        );
                        return Value::Null;
                    }
                    if !value.is_object() {
                        context.record(
                            path,
                            format!(
                                "expected an object for type \"{}\", resolver returned {}",
                                name,
                                json_kind(&value)
                            ),
                        );
                        return Value::Null;
                    }
                    execute_selection_set(context, selections, name, &value, path)
                }
            }
        }
    }
}
