//! Argument binding: turning a field invocation's unordered literal
//! arguments into the ordered, typed parameter list its resolver expects.

use graphql_query_parser::ast::Value as LiteralValue;
use indexmap::IndexMap;
use serde_json::{Number, Value};
use thiserror::Error;

use crate::schema::{ArgumentDefinition, FieldDefinition, ScalarKind, TypeRef};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("unknown argument \"{argument}\" on field \"{field}\"")]
    UnknownArgument { field: String, argument: String },
    #[error("missing required argument \"{argument}\" on field \"{field}\"")]
    MissingArgument { field: String, argument: String },
    #[error("argument \"{argument}\" on field \"{field}\" expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        argument: String,
        expected: String,
        actual: &'static str,
    },
}

/// Bind `supplied` literals against the field's declared arguments.
///
/// Positions in the returned list mirror declaration order, never
/// query-text order — that is the mechanism making textual argument order
/// irrelevant. Pure function of its inputs.
pub fn bind_arguments(
    field: &FieldDefinition,
    supplied: &IndexMap<String, LiteralValue>,
) -> Result<Vec<Value>, BindError> {
    for name in supplied.keys() {
        if !field.arguments.iter().any(|argument| &argument.name == name) {
            return Err(BindError::UnknownArgument {
                field: field.name.clone(),
                argument: name.clone(),
            });
        }
    }
    let mut bound = Vec::with_capacity(field.arguments.len());
    for argument in &field.arguments {
        match supplied.get(&argument.name) {
            Some(literal) => bound.push(coerce_literal(field, argument, literal)?),
            None if argument.optional => {
                bound.push(argument.default_value.clone().unwrap_or(Value::Null))
            }
            None => {
                return Err(BindError::MissingArgument {
                    field: field.name.clone(),
                    argument: argument.name.clone(),
                })
            }
        }
    }
    Ok(bound)
}

/// Strict coercion: each scalar kind accepts exactly its own literal
/// form. No implicit numeric widening — an integer literal does not
/// satisfy a `Float` parameter.
fn coerce_literal(
    field: &FieldDefinition,
    argument: &ArgumentDefinition,
    literal: &LiteralValue,
) -> Result<Value, BindError> {
    let mismatch = || BindError::TypeMismatch {
        field: field.name.clone(),
        argument: argument.name.clone(),
        expected: argument.argument_type.to_string(),
        actual: literal.describe(),
    };
    let kind = match &argument.argument_type {
        TypeRef::Named(name) => ScalarKind::from_name(name),
        TypeRef::List(_) => None,
    };
    // The builder rejects non-scalar argument declarations, so `kind` is
    // always present for schemas it produced.
    let Some(kind) = kind else {
        return Err(mismatch());
    };
    if matches!(literal, LiteralValue::Null) {
        return if argument.optional {
            Ok(Value::Null)
        } else {
            Err(mismatch())
        };
    }
    match (kind, literal) {
        (ScalarKind::Int, LiteralValue::Int(value)) => Ok(Value::Number(Number::from(*value))),
        (ScalarKind::Float, LiteralValue::Float(value)) => {
            Number::from_f64(*value).map(Value::Number).ok_or_else(mismatch)
        }
        (ScalarKind::String, LiteralValue::String(value)) => Ok(Value::String(value.clone())),
        (ScalarKind::Boolean, LiteralValue::Boolean(value)) => Ok(Value::Bool(*value)),
        _ => Err(mismatch()),
    }
}
