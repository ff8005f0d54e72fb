//! The final `{data, errors}` structure handed back to the caller.

use graphql_query_parser::ParseError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json_writer::write_json_value;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GraphQLError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<GraphQLErrorLocation>>,
    /// Result-key path to the offending field; list indexes appear as
    /// numbers. Absent for errors with no field (parse failures).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GraphQLErrorLocation {
    pub line: usize,
    pub column: usize,
}

/// Serialized execution outcome. `data` is always present, even when it
/// is null or only partially populated; `errors` only when at least one
/// error was recorded.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ExecutionResult {
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQLError>>,
}

impl ExecutionResult {
    pub fn new(data: Value, errors: Vec<GraphQLError>) -> ExecutionResult {
        ExecutionResult {
            data,
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }

    /// Parse failures are fatal: no resolver ran, so `data` is null and
    /// the single error carries the source location.
    pub fn from_parse_error(error: ParseError) -> ExecutionResult {
        ExecutionResult {
            data: Value::Null,
            errors: Some(vec![GraphQLError {
                message: error.to_string(),
                locations: Some(vec![GraphQLErrorLocation {
                    line: error.position.line,
                    column: error.position.column,
                }]),
                path: None,
            }]),
        }
    }

    /// Deterministic, total serialization: identical trees produce byte
    /// identical output. Object keys are written in insertion order,
    /// which the executor guarantees is textual selection order.
    pub fn to_json_string(&self) -> String {
        let mut buffer = String::with_capacity(4096);
        buffer.push_str("{\"data\":");
        write_json_value(&mut buffer, &self.data);
        if let Some(errors) = &self.errors {
            buffer.push_str(",\"errors\":");
            // GraphQLError serialization cannot fail.
            buffer.push_str(&serde_json::to_string(errors).unwrap());
        }
        buffer.push('}');
        buffer
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn errors_key_is_omitted_when_no_error_was_recorded() {
        let result = ExecutionResult::new(json!({"a": 1}), vec![]);
        assert_eq!(result.to_json_string(), r#"{"data":{"a":1}}"#);
    }

    #[test]
    fn errors_carry_path_and_message() {
        let result = ExecutionResult::new(
            json!({"actor": null}),
            vec![GraphQLError {
                message: "boom".to_string(),
                locations: None,
                path: Some(vec![json!("actor"), json!(0)]),
            }],
        );
        assert_eq!(
            result.to_json_string(),
            r#"{"data":{"actor":null},"errors":[{"message":"boom","path":["actor",0]}]}"#
        );
    }

    #[test]
    fn data_is_always_present() {
        let result = ExecutionResult::new(Value::Null, vec![]);
        assert_eq!(result.to_json_string(), r#"{"data":null}"#);
    }
}
