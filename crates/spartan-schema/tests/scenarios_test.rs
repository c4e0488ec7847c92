//! End-to-end scenarios over small, realistic schemas

use pretty_assertions::assert_eq;
use serde_json::json;
use spartan_json::json_to_value;
use spartan_schema::{
    MismatchKind, RestrictOptions, SchemaDocument, ValidateOptions, compile,
};
use spartan_value::{Value, ValueKind};

fn schema(source: serde_json::Value) -> SchemaDocument {
    compile(&json_to_value(&source)).expect("schema should compile")
}

fn messages(schema: &SchemaDocument, value: serde_json::Value) -> Vec<String> {
    schema
        .validate(&json_to_value(&value), &ValidateOptions::default())
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_person_object() {
    let person = schema(json!({
        "schema": {"firstName": "string", "lastName": "string", "age": "integer"}
    }));

    assert_eq!(
        messages(&person, json!({"firstName": "Adam", "lastName": "Nelson", "age": 31})),
        Vec::<String>::new()
    );

    let mismatches = person.validate(
        &json_to_value(&json!({"firstName": "Adam", "lastName": "Nelson"})),
        &ValidateOptions::default(),
    );
    assert_eq!(mismatches.len(), 1);
    assert_eq!(
        mismatches[0].kind,
        MismatchKind::MissingRequiredField {
            field: "age".to_string()
        }
    );
    assert_eq!(mismatches[0].schema_path.to_string(), "$.schema.age");

    let mismatches = person.validate(
        &json_to_value(&json!(["Adam", "Nelson", 31])),
        &ValidateOptions::default(),
    );
    assert_eq!(mismatches.len(), 1);
    assert_eq!(
        mismatches[0].kind,
        MismatchKind::TypeMismatch {
            expected: "object",
            actual: ValueKind::Sequence
        }
    );
    assert!(mismatches[0].data_path.is_root());

    assert_eq!(
        person.zero_value(),
        Ok(json_to_value(&json!({"firstName": "", "lastName": "", "age": 0})))
    );
}

#[test]
fn test_union_with_nested_diagnostics() {
    let doc = schema(json!({
        "schema": {"foo": ["oneof", ["array", "string"], {"bar": "integer"}]}
    }));
    let mismatches = doc.validate(&json_to_value(&json!({"foo": 1})), &ValidateOptions::default());
    assert_eq!(mismatches.len(), 1);
    let mismatch = &mismatches[0];
    assert_eq!(mismatch.data_path.to_string(), "$.foo");
    assert_eq!(mismatch.actual, Value::from(1));
    assert_eq!(
        mismatch
            .alternatives
            .iter()
            .map(|failures| failures.iter().map(|m| m.message()).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
        vec![
            vec!["expected array, found number".to_string()],
            vec!["expected object, found number".to_string()],
        ]
    );
    assert_eq!(
        messages(&doc, json!({"foo": ["a", "b"]})),
        Vec::<String>::new()
    );
    assert_eq!(messages(&doc, json!({"foo": {"bar": 2}})), Vec::<String>::new());
}

#[test]
fn test_stoplight_enum() {
    let doc = schema(json!({"schema": {"stoplight": ["enum", "red", "yellow", "green"]}}));
    assert_eq!(messages(&doc, json!({"stoplight": "green"})), Vec::<String>::new());
    assert_eq!(
        messages(&doc, json!({"stoplight": "blue"})),
        vec!["expected one of \"red\", \"yellow\", \"green\" at $.stoplight"]
    );
    assert_eq!(doc.zero_value(), Ok(json_to_value(&json!({"stoplight": "red"}))));
}

#[test]
fn test_array_with_suffix_type() {
    let doc = schema(json!({
        "schema": ["array", ["tuple", "integer"], ["tuple", "string", "string", "boolean"]]
    }));
    assert_eq!(messages(&doc, json!([[1]])), Vec::<String>::new());
    assert_eq!(
        messages(&doc, json!([[2], ["a", "b", true]])),
        Vec::<String>::new()
    );
    assert_eq!(
        messages(&doc, json!([[2], ["a", "b", true], ["c", "d", false]])),
        Vec::<String>::new()
    );
    assert_eq!(
        messages(&doc, json!([[1], [2]])),
        vec![
            "expected a tuple of 3 elements, found 1 at $[1]",
            "expected string, found number at $[1][0]"
        ]
    );
    assert_eq!(
        messages(&doc, json!([])),
        vec!["expected at least 1 elements, found 0 at $"]
    );
}

#[test]
fn test_forever_label() {
    let doc = schema(json!({
        "let": {"Forever": {"loop": ["ref", "Forever"]}},
        "schema": ["ref", "Forever"]
    }));
    assert!(doc.is_recursive());

    let error = doc.zero_value().expect_err("Forever has no finite zero value");
    assert_eq!(error.label, "Forever");

    let error = doc
        .restrict(&Value::empty_mapping(), &RestrictOptions::default().with_fill_zero(true))
        .expect_err("fill needs a zero value for `loop`");
    assert_eq!(error.label, "Forever");

    // Finite data is validated as deep as it goes.
    let mut nested = json!({});
    for _ in 0..50 {
        nested = json!({"loop": nested});
    }
    assert_eq!(
        messages(&doc, nested),
        vec!["missing required field `loop` at $".to_string() + &".loop".repeat(50)]
    );

    assert_eq!(
        messages(&doc, json!({"loop": {"loop": {"loop": 4}}})),
        vec!["expected object, found number at $.loop.loop.loop"]
    );
}

#[test]
fn test_tree_label() {
    let doc = schema(json!({
        "let": {
            "Tree": {"value": "integer", "children": ["optional", ["array", ["ref", "Tree"]]]}
        },
        "schema": ["ref", "Tree"]
    }));
    let tree = json!({
        "value": 1,
        "children": [
            {"value": 2},
            {"value": 3, "children": [{"value": 4, "extra": true}]}
        ]
    });
    assert_eq!(messages(&doc, tree.clone()), Vec::<String>::new());

    let restricted = doc
        .restrict(&json_to_value(&tree), &RestrictOptions::default())
        .expect("no fill, no recursion error");
    assert_eq!(
        restricted,
        Some(json_to_value(&json!({
            "value": 1,
            "children": [
                {"value": 2},
                {"value": 3, "children": [{"value": 4}]}
            ]
        })))
    );

    assert_eq!(doc.zero_value(), Ok(json_to_value(&json!({"value": 0}))));

    let mismatches = doc.validate(
        &json_to_value(&json!({"value": 1, "children": [{"value": "x"}]})),
        &ValidateOptions::default(),
    );
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].data_path.to_string(), "$.children[0].value");
    assert_eq!(mismatches[0].schema_path.to_string(), "$.let.Tree.value");
}

#[test]
fn test_restrict_cleans_up_a_record() {
    let doc = schema(json!({
        "schema": {
            "id": "integer",
            "name": "string",
            "created": "date",
            "avatar": ["optional", "binary"],
            "tags": ["array", "string"],
            "role": ["enum", "admin", "user"]
        }
    }));
    let input = json!({
        "id": "42",
        "name": 7,
        "created": "2024-02-29",
        "avatar": "aGk=",
        "tags": ["a", 1, "b"],
        "role": "root",
        "internal": true
    });
    let restricted = doc
        .restrict(
            &json_to_value(&input),
            &RestrictOptions::default().with_coerce(true).with_fill_zero(true),
        )
        .expect("no recursion")
        .expect("fill always produces a value");

    let map = restricted.as_mapping().expect("object");
    assert_eq!(map.get("id"), Some(&Value::from(42)));
    assert_eq!(map.get("name"), Some(&Value::from("7")));
    assert_eq!(
        map.get("created").and_then(Value::as_timestamp).map(|t| t.to_rfc3339()),
        Some("2024-02-29T00:00:00+00:00".to_string())
    );
    assert_eq!(map.get("avatar"), Some(&Value::Bytes(b"hi".to_vec())));
    assert_eq!(
        map.get("tags"),
        Some(&json_to_value(&json!(["a", "1", "b"])))
    );
    assert_eq!(map.get("role"), Some(&Value::from("admin")));
    assert!(!map.contains_key("internal"));
    assert!(doc.validate(&restricted, &ValidateOptions::strict()).is_empty());
}
