use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::schema::{ArgumentDefinition, FieldBuilder, Schema, SchemaBuilder, TypeRef};

const DISHES: [&str; 6] = ["steak", "burger", "soup", "salad", "bread", "bird"];

/// The actor schema: a query root field returning an object type with
/// plain properties plus a resolver taking a required `size` and an
/// optional `prefix`.
fn actor_schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    builder.query_field(
        FieldBuilder::new("actor", TypeRef::named("Actor"))
            .resolve(|_, _| Ok(json!({"name": "Boguś Linda", "age": 432}))),
    );
    let actor = builder.object_type("Actor");
    actor.field(FieldBuilder::new("name", TypeRef::string()));
    actor.field(FieldBuilder::new("age", TypeRef::int()));
    actor.field(
        FieldBuilder::new("favDishes", TypeRef::list(TypeRef::string()))
            .argument(ArgumentDefinition::required("size", TypeRef::int()))
            .argument(ArgumentDefinition::optional("prefix", TypeRef::string()))
            .resolve(|_, arguments| {
                let size = arguments[0].as_i64().unwrap_or(0).max(0) as usize;
                let prefix = arguments[1].as_str();
                let dishes = DISHES
                    .iter()
                    .filter(|dish| prefix.map_or(true, |prefix| dish.starts_with(prefix)))
                    .take(size)
                    .map(|dish| json!(dish))
                    .collect();
                Ok(Value::Array(dishes))
            }),
    );
    builder.finish().expect("actor schema should build")
}

fn execute_equal_queries(schema: &Schema, expected: &str, queries: &[&str]) {
    for query in queries {
        assert_eq!(
            schema.execute(query).to_json_string(),
            expected,
            "query: {}",
            query
        );
    }
}

#[test]
fn arguments_are_unordered() {
    execute_equal_queries(
        &actor_schema(),
        r#"{"data":{"actor":{"favDishes":["burger","bread"]}}}"#,
        &[
            r#"{actor{favDishes(size: 2, prefix: "b")}}"#,
            r#"{actor{favDishes(prefix: "b", size: 2)}}"#,
        ],
    );
}

#[test]
fn omitted_optional_argument_disables_the_filter() {
    let result = actor_schema().execute("{actor{favDishes(size: 6)}}");
    assert_eq!(
        result.to_json_string(),
        r#"{"data":{"actor":{"favDishes":["steak","burger","soup","salad","bread","bird"]}}}"#
    );
}

#[test]
fn size_bounds_the_result_even_when_fewer_match() {
    let schema = actor_schema();
    let result = schema.execute(r#"{actor{favDishes(size: 6, prefix: "b")}}"#);
    assert_eq!(
        result.to_json_string(),
        r#"{"data":{"actor":{"favDishes":["burger","bread"]}}}"#
    );
    let result = schema.execute(r#"{actor{favDishes(size: 1, prefix: "b")}}"#);
    assert_eq!(
        result.to_json_string(),
        r#"{"data":{"actor":{"favDishes":["burger"]}}}"#
    );
}

#[test]
fn field_local_errors_do_not_abort_siblings() {
    let result = actor_schema().execute(r#"{actor{name favDishes(amount: 2)}}"#);
    assert_eq!(result.data, json!({"actor": {"name": "Boguś Linda", "favDishes": null}}));
    let errors = result.errors.expect("the failing field must be reported");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "unknown argument \"amount\" on field \"favDishes\""
    );
    assert_eq!(errors[0].path, Some(vec![json!("actor"), json!("favDishes")]));
}

#[test]
fn missing_required_argument_is_field_local() {
    let result = actor_schema().execute("{actor{age favDishes}}");
    assert_eq!(result.data, json!({"actor": {"age": 432, "favDishes": null}}));
    let errors = result.errors.expect("the failing field must be reported");
    assert_eq!(
        errors[0].message,
        "missing required argument \"size\" on field \"favDishes\""
    );
}

#[test]
fn unknown_fields_are_field_local() {
    let result = actor_schema().execute("{actor{name height}}");
    assert_eq!(result.data, json!({"actor": {"name": "Boguś Linda", "height": null}}));
    let errors = result.errors.expect("the failing field must be reported");
    assert_eq!(errors[0].message, "unknown field \"height\" on type \"Actor\"");
    assert_eq!(errors[0].path, Some(vec![json!("actor"), json!("height")]));
}

#[test]
fn result_keys_follow_textual_selection_order() {
    let schema = actor_schema();
    insta::assert_snapshot!(
        schema.execute("{actor{age name}}").to_json_string(),
        @r#"{"data":{"actor":{"age":432,"name":"Boguś Linda"}}}"#
    );
    insta::assert_snapshot!(
        schema.execute("{actor{name age}}").to_json_string(),
        @r#"{"data":{"actor":{"name":"Boguś Linda","age":432}}}"#
    );
}

#[test]
fn aliases_rename_result_keys() {
    let result = actor_schema().execute("{star: actor{fullName: name}}");
    assert_eq!(
        result.to_json_string(),
        r#"{"data":{"star":{"fullName":"Boguś Linda"}}}"#
    );
}

#[test]
fn serialization_is_deterministic() {
    let result = actor_schema().execute(r#"{actor{name age favDishes(size: 3)}}"#);
    assert_eq!(result.to_json_string(), result.to_json_string());
}

#[test]
fn parse_errors_are_fatal_and_located() {
    let result = actor_schema().execute("{actor{name}");
    assert_eq!(result.data, Value::Null);
    let errors = result.errors.expect("parse failure must be reported");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "syntax error at 1:13: expected a field name or `}`, found end of input"
    );
    let location = &errors[0].locations.as_ref().expect("parse errors carry a location")[0];
    assert_eq!((location.line, location.column), (1, 13));
}

#[test]
fn resolver_faults_are_caught_and_recorded() {
    let mut builder = SchemaBuilder::new();
    builder.query_field(
        FieldBuilder::new("flaky", TypeRef::string())
            .resolve(|_, _| Err("backing store offline".into())),
    );
    builder.query_field(FieldBuilder::new("steady", TypeRef::string()).resolve(|_, _| Ok(json!("ok"))));
    let schema = builder.finish().expect("schema should build");

    let result = schema.execute("{flaky steady}");
    assert_eq!(result.data, json!({"flaky": null, "steady": "ok"}));
    let errors = result.errors.expect("the fault must be reported");
    assert_eq!(
        errors[0].message,
        "resolver for field \"flaky\" failed: backing store offline"
    );
    assert_eq!(errors[0].path, Some(vec![json!("flaky")]));
}

/// A schema with a list-of-objects field, exercising per-element
/// recursion and per-element error paths.
fn crew_schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    builder.query_field(
        FieldBuilder::new("cast", TypeRef::list(TypeRef::named("Actor"))).resolve(|_, _| {
            Ok(json!([
                {"name": "Boguś Linda", "age": 432},
                "not an actor",
                {"name": "Janusz Gajos", "age": 86},
            ]))
        }),
    );
    let actor = builder.object_type("Actor");
    actor.field(FieldBuilder::new("name", TypeRef::string()));
    actor.field(FieldBuilder::new("age", TypeRef::int()));
    builder.finish().expect("crew schema should build")
}

#[test]
fn lists_recurse_per_element_in_source_order() {
    let result = crew_schema().execute("{cast{name}}");
    assert_eq!(
        result.data,
        json!({"cast": [{"name": "Boguś Linda"}, null, {"name": "Janusz Gajos"}]})
    );
    let errors = result.errors.expect("the malformed element must be reported");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "expected an object for type \"Actor\", resolver returned a string"
    );
    assert_eq!(errors[0].path, Some(vec![json!("cast"), json!(1)]));
}

#[test]
fn nested_selection_is_not_evaluated_against_null() {
    let mut builder = SchemaBuilder::new();
    builder.query_field(
        FieldBuilder::new("actor", TypeRef::named("Actor")).resolve(|_, _| Ok(Value::Null)),
    );
    builder
        .object_type("Actor")
        .field(FieldBuilder::new("name", TypeRef::string()));
    let schema = builder.finish().expect("schema should build");

    let result = schema.execute("{actor{name}}");
    assert_eq!(result.to_json_string(), r#"{"data":{"actor":null}}"#);
}

#[test]
fn scalar_fields_reject_selection_sets() {
    let result = actor_schema().execute("{actor{name{length}}}");
    assert_eq!(result.data, json!({"actor": {"name": null}}));
    let errors = result.errors.expect("the misuse must be reported");
    assert_eq!(
        errors[0].message,
        "field of scalar type \"String\" cannot have a selection set"
    );
}

#[test]
fn object_fields_require_selection_sets() {
    let result = actor_schema().execute("{actor}");
    assert_eq!(result.data, json!({"actor": null}));
    let errors = result.errors.expect("the misuse must be reported");
    assert_eq!(
        errors[0].message,
        "field of object type \"Actor\" must have a selection set"
    );
    assert_eq!(errors[0].path, Some(vec![json!("actor")]));
}

#[test]
fn resolver_output_must_conform_to_the_declared_scalar() {
    let mut builder = SchemaBuilder::new();
    builder.query_field(
        FieldBuilder::new("age", TypeRef::int()).resolve(|_, _| Ok(json!("four hundred"))),
    );
    let schema = builder.finish().expect("schema should build");

    let result = schema.execute("{age}");
    assert_eq!(result.data, json!({"age": null}));
    let errors = result.errors.expect("the mismatch must be reported");
    assert_eq!(
        errors[0].message,
        "expected a value of type \"Int\", resolver returned a string"
    );
}

#[test]
fn defaults_are_bound_when_the_argument_is_omitted() {
    let mut builder = SchemaBuilder::new();
    builder.query_field(
        FieldBuilder::new("dishes", TypeRef::list(TypeRef::string()))
            .argument(ArgumentDefinition::optional_with_default(
                "size",
                TypeRef::int(),
                json!(2),
            ))
            .resolve(|_, arguments| {
                let size = arguments[0].as_i64().unwrap_or(0).max(0) as usize;
                Ok(Value::Array(
                    DISHES.iter().take(size).map(|dish| json!(dish)).collect(),
                ))
            }),
    );
    let schema = builder.finish().expect("schema should build");

    assert_eq!(
        schema.execute("{dishes}").to_json_string(),
        r#"{"data":{"dishes":["steak","burger"]}}"#
    );
    assert_eq!(
        schema.execute("{dishes(size: 4)}").to_json_string(),
        r#"{"data":{"dishes":["steak","burger","soup","salad"]}}"#
    );
}

#[test]
fn root_source_value_is_visible_to_property_fields() {
    let mut builder = SchemaBuilder::new();
    builder.query_field(FieldBuilder::new("greeting", TypeRef::string()));
    let schema = builder.finish().expect("schema should build");

    let result = schema.execute_with_root("{greeting}", &json!({"greeting": "hello"}));
    assert_eq!(result.to_json_string(), r#"{"data":{"greeting":"hello"}}"#);
}
