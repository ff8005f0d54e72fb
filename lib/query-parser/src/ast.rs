//! AST types for parsed query documents.
//!
//! Selection order is significant everywhere: it determines the key order
//! of the executed result. Argument order is not; argument sets compare
//! equal regardless of the order the query text spelled them in.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::Serialize;

/// A parsed query document: the top-level selection set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDocument {
    pub selection_set: SelectionSet,
}

impl Display for QueryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selection_set)
    }
}

/// An ordered sequence of field selections.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SelectionSet {
    pub items: Vec<FieldSelection>,
}

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Display for SelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return Ok(());
        }
        write!(
            f,
            "{{{}}}",
            self.items
                .iter()
                .map(|item| format!("{}", item))
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}

/// A single requested field.
///
/// `arguments` keeps textual order for display purposes, but its equality
/// is order-insensitive (`IndexMap` semantics), and the binder never looks
/// at positions, only names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSelection {
    pub name: String,
    pub alias: Option<String>,
    pub arguments: IndexMap<String, Value>,
    pub selections: SelectionSet,
}

impl FieldSelection {
    /// The key this field occupies in the result object.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn is_leaf(&self) -> bool {
        self.selections.is_empty()
    }
}

impl Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{}: ", alias)?;
        }
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(
                f,
                "({})",
                self.arguments
                    .iter()
                    .map(|(name, value)| format!("{}: {}", name, value))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
        }
        write!(f, "{}", self.selections)
    }
}

/// A literal argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

impl Value {
    /// Short human-readable description, used in binder error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Value::Int(_) => "an integer literal",
            Value::Float(_) => "a float literal",
            Value::String(_) => "a string literal",
            Value::Boolean(_) => "a boolean literal",
            Value::Null => "null",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            // Keep the decimal point so the literal stays a float when
            // the printed form is parsed back.
            Value::Float(value) if value.fract() == 0.0 && value.is_finite() => {
                write!(f, "{:.1}", value)
            }
            Value::Float(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{:?}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Null => write!(f, "null"),
        }
    }
}
