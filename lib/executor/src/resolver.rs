use serde_json::Value;

/// Fault raised by resolver code. Resolvers are opaque, schema-author
/// supplied functions; whatever they raise is caught by the executor and
/// recorded as a field-local error.
pub type ResolverFault = Box<dyn std::error::Error + Send + Sync>;

/// Capability interface for producing a field's value.
///
/// `arguments` always arrives in declaration order, never in query-text
/// order; the binder owns that guarantee. `source` is the value the parent
/// field resolved to, or the root value at the top level.
pub trait Resolver: Send + Sync {
    fn resolve(&self, source: &Value, arguments: &[Value]) -> Result<Value, ResolverFault>;
}

impl<F> Resolver for F
where
    F: Fn(&Value, &[Value]) -> Result<Value, ResolverFault> + Send + Sync,
{
    fn resolve(&self, source: &Value, arguments: &[Value]) -> Result<Value, ResolverFault> {
        self(source, arguments)
    }
}

/// Fallback for fields declared without an explicit resolver: read the
/// field's own key out of the source object, as plain properties do.
pub(crate) struct PropertyResolver {
    pub(crate) key: String,
}

impl Resolver for PropertyResolver {
    fn resolve(&self, source: &Value, _arguments: &[Value]) -> Result<Value, ResolverFault> {
        match source {
            Value::Object(map) => Ok(map.get(&self.key).cloned().unwrap_or(Value::Null)),
            Value::Null => Ok(Value::Null),
            other => Err(format!(
                "source value for property \"{}\" is {}, not an object",
                self.key,
                json_kind(other)
            )
            .into()),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
