//! Schema-bound query execution.
//!
//! A [`Schema`] declares typed object graphs whose fields are backed by
//! [`Resolver`]s with named, optionally-typed arguments. [`execute`]
//! parses a query string, binds each field invocation's arguments to the
//! resolver's declared parameters (independent of textual argument order),
//! walks the selection sets to materialize a result tree mirroring the
//! query's shape, and serializes it as `{data, errors}`.
//!
//! ```rust
//! use graphql_executor::schema::{FieldBuilder, SchemaBuilder, TypeRef};
//!
//! let mut builder = SchemaBuilder::new();
//! builder.query_field(
//!     FieldBuilder::new("hello", TypeRef::string())
//!         .resolve(|_, _| Ok(serde_json::json!("world"))),
//! );
//! let schema = builder.finish().unwrap();
//! let result = schema.execute("{hello}");
//! assert_eq!(result.to_json_string(), r#"{"data":{"hello":"world"}}"#);
//! ```
//!
//! Failures other than parse errors are field-local: they null the
//! offending result key, land in the `errors` list with that key's path,
//! and never abort sibling fields.

use graphql_query_parser::parse_query;
use serde_json::Value;

pub mod arguments;
pub mod execution;
mod json_writer;
pub mod resolver;
pub mod response;
pub mod schema;

#[cfg(test)]
mod tests;

pub use arguments::BindError;
pub use resolver::{Resolver, ResolverFault};
pub use response::{ExecutionResult, GraphQLError, GraphQLErrorLocation};
pub use schema::{
    ArgumentDefinition, FieldBuilder, ObjectTypeBuilder, RegistryError, Schema, SchemaBuilder,
    SchemaError, TypeRef, QUERY_TYPE_NAME,
};

/// Execution entrypoint: parse `query`, walk it against `schema`, with a
/// null root source value.
pub fn execute(schema: &Schema, query: &str) -> ExecutionResult {
    execute_with_root(schema, query, &Value::Null)
}

/// Like [`execute`], with a caller-supplied root source value.
pub fn execute_with_root(schema: &Schema, query: &str, root_value: &Value) -> ExecutionResult {
    let document = match parse_query(query) {
        Ok(document) => document,
        Err(err) => return ExecutionResult::from_parse_error(err),
    };
    let (data, errors) = execution::execute_document(schema.registry(), root_value, &document);
    ExecutionResult::new(data, errors)
}
