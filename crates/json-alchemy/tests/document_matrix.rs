mod common;

use common::{complex, doc, items_in_list, list, required_field, simple};
use json_alchemy::{ArrayProxy, Error, ObjectProxy, ProxyKind, ProxyNode, Schema};
use serde_json::{json, Value};

#[test]
fn construction_matrix() {
    assert_eq!(ObjectProxy::new(Value::Null, Schema::empty()).unwrap(), json!({}));
    assert_eq!(ObjectProxy::new(json!({}), Schema::empty()).unwrap(), json!({}));
    assert_eq!(ArrayProxy::new(Value::Null, Schema::empty()).unwrap(), json!([]));

    let err = ProxyNode::new(f64::NAN, Schema::empty()).unwrap_err();
    assert!(matches!(err, Error::WrapType(_)));
    assert!(err.to_string().contains("Type not defined"));

    let err = ObjectProxy::new(json!({"nested": [u64::MAX]}), Schema::empty()).unwrap_err();
    assert!(matches!(err, Error::WrapType(_)));
}

#[test]
fn malformed_schema_text_is_rejected() {
    assert!(matches!(
        Schema::parse(r#"{"type": "object", "properties": {"#),
        Err(Error::MalformedSchema(_))
    ));
    let schema = Schema::parse(r#"{"description": "docstring"}"#).unwrap();
    let data = ObjectProxy::new(json!({}), schema).unwrap();
    assert_eq!(data.schema().description(), Some("docstring"));
}

#[test]
fn object_load_and_access() {
    let data = doc(json!({"my_field": "test"}), simple());
    let object = data.object().unwrap();
    assert!(object.contains_key("my_field"));
    assert_eq!(object.keys(), vec!["my_field"]);
    assert_eq!(data.get("my_field").unwrap(), "test");
    assert!(data.validate().is_ok());

    assert!(doc(json!({"my_field": 1}), simple()).validate().is_err());
    assert!(doc(json!({"wrong_field": "test"}), simple()).validate().is_err());
}

#[test]
fn direct_mutations_are_not_validated() {
    let data = doc(json!({}), simple());
    data.set("my_field", "valid value").unwrap();
    assert_eq!(data.get("my_field").unwrap(), "valid value");

    data.set("my_field", 666).unwrap();
    assert_eq!(data.get("my_field").unwrap(), 666_i64);
    assert!(data.validate().is_err());
}

#[test]
fn delete_then_validate() {
    let data = doc(json!({"identifier": 1, "my_field": "test"}), required_field());
    data.object().unwrap().remove("identifier").unwrap();
    let Err(Error::Validation(error)) = data.validate() else {
        panic!("missing identifier must fail validation");
    };
    assert_eq!(error.keyword, "required");

    data.object().unwrap().remove("my_field").unwrap();
    assert!(!data.object().unwrap().contains_key("my_field"));
    assert!(matches!(
        data.object().unwrap().remove("my_field"),
        Err(Error::KeyNotFound(_))
    ));
}

#[test]
fn array_behaves_as_sequence() {
    let data = doc(json!(["foo", "bar"]), list());
    let array = data.array().unwrap();
    assert_eq!(data.at(0).unwrap(), "foo");
    assert_eq!(data.at(-1).unwrap(), "bar");
    assert_eq!(array.len(), 2);
    assert_eq!(data, json!(["foo", "bar"]));
    assert_eq!(array.items().len(), 2);
    assert!(matches!(
        data.at(2),
        Err(Error::IndexOutOfRange { index: 2, len: 2 })
    ));
    assert!(matches!(data.at(-3), Err(Error::IndexOutOfRange { .. })));
}

#[test]
fn nested_wrapping_and_kinds() {
    let data = doc(json!({"authors": [{"family_name": "Ellis"}]}), complex());
    let authors = data.get("authors").unwrap();
    assert_eq!(authors.kind(), ProxyKind::Array);
    let first = authors.at(0).unwrap();
    assert_eq!(first.kind(), ProxyKind::Object);
    assert_eq!(first.get("family_name").unwrap(), "Ellis");
    // `$ref` resolved while building.
    assert_eq!(
        first.get("family_name").unwrap().schema().unwrap(),
        json!({"type": "string"})
    );
}

#[test]
fn append_extend_insert_kinds() {
    let data = ArrayProxy::new(json!([]), Schema::empty()).unwrap();
    data.append(13.5).unwrap();
    data.append("13.5").unwrap();
    assert_eq!(data.get(0).unwrap().kind(), ProxyKind::Number);
    assert_eq!(data.get(1).unwrap().kind(), ProxyKind::String);
    assert_eq!(data.get(1).unwrap(), "13.5");

    let data = ArrayProxy::new(json!([{}]), Schema::empty()).unwrap();
    data.extend([json!(13.5), json!("13.5")]).unwrap();
    let kinds: Vec<_> = data.items().iter().map(ProxyNode::kind).collect();
    assert_eq!(kinds, [ProxyKind::Object, ProxyKind::Number, ProxyKind::String]);
    assert_eq!(data, json!([{}, 13.5, "13.5"]));

    let data = ArrayProxy::new(json!([1]), Schema::empty()).unwrap();
    data.insert(0, "2").unwrap();
    data.insert(3, 2).unwrap();
    assert_eq!(data, json!(["2", 1, 2]));
    assert_eq!(data.get(0).unwrap().kind(), ProxyKind::String);
    assert_eq!(data.get(2).unwrap().kind(), ProxyKind::Integer);
}

fn assert_positional(data: &ProxyNode) {
    let array = data.array().unwrap();
    for (index, item) in array.items().iter().enumerate() {
        assert_eq!(
            item.schema().unwrap(),
            array.schema().item(index),
            "schema at index {index}"
        );
    }
}

#[test]
fn positional_items_follow_pop_and_set() {
    let data = doc(json!([1600, "Pennsylvania", "Avenue", "NW"]), items_in_list());
    assert!(data.validate().is_ok());

    data.array().unwrap().remove(1).unwrap();
    assert_positional(&data);
    let Err(Error::Validation(error)) = data.validate() else {
        panic!("'NW' is no street type");
    };
    assert_eq!(error.keyword, "enum");
    assert_eq!(error.instance_path, "/2");

    data.array().unwrap().set(2, "Street").unwrap();
    assert_eq!(data.at(2).unwrap().schema().unwrap(), data.array().unwrap().child_schema(2));
    assert!(data.validate().is_ok());

    data.array().unwrap().append("NW").unwrap();
    data.array().unwrap().append("Washington").unwrap();
    assert!(data.validate().is_ok());
    assert_eq!(data.at(-1).unwrap().kind(), ProxyKind::String);
    assert!(data.at(-1).unwrap().schema().unwrap().is_unconstrained());
}

#[test]
fn insert_moves_schema() {
    let data = doc(json!([1, "Avenue"]), items_in_list());
    assert_positional(&data);

    data.array().unwrap().insert(1, "sth").unwrap();
    assert_positional(&data);
    assert_eq!(data, json!([1, "sth", "Avenue"]));

    data.array().unwrap().insert(-2, "other").unwrap();
    assert_positional(&data);
    assert_eq!(data, json!([1, "other", "sth", "Avenue"]));
}

#[test]
fn passthrough_insert_shifts_positional_schemas() {
    let schema = Schema::new(json!({
        "type": "array",
        "items": [{"type": "integer"}, {"type": "string"}, {"type": "boolean"}]
    }));
    let data = doc(json!([1, "x"]), schema);
    data.array().unwrap().insert(1, true).unwrap();
    assert_eq!(data, json!([1, true, "x"]));

    let first = data.at(0).unwrap().schema().unwrap();
    assert_eq!(first.pointer(), "/items/0");
    assert_eq!(first, json!({"type": "integer"}));

    assert!(data.at(1).unwrap().schema().is_none());

    let last = data.at(2).unwrap().schema().unwrap();
    assert_eq!(last.pointer(), "/items/2");
    assert_eq!(last, json!({"type": "boolean"}));

    let Err(Error::Validation(error)) = data.validate() else {
        panic!("\"x\" sits in the boolean slot");
    };
    assert_eq!(error.instance_path, "/2");
}

#[test]
fn set_slice_matrix() {
    let cases: [(isize, isize, Vec<&str>, Value); 6] = [
        (1, 3, vec!["Main", "Street", "NW"], json!([1, "Main", "Street", "NW"])),
        (
            2,
            -1,
            vec!["Stret", "NW", "foo"],
            json!([1, "Washington", "Stret", "NW", "foo", "Avenue"]),
        ),
        (0, 2, vec!["Main"], json!(["Main", "Avenue"])),
        (2, 100, vec!["Street", "NW"], json!([1, "Washington", "Street", "NW"])),
        (
            -2,
            -1,
            vec!["Main", "Street", "NW"],
            json!([1, "Main", "Street", "NW", "Avenue"]),
        ),
        (-1, 100, vec!["NW"], json!([1, "Washington", "NW"])),
    ];

    for (start, stop, added, expected) in cases {
        let data = doc(json!([1, "Washington", "Avenue"]), items_in_list());
        assert_positional(&data);

        data.array()
            .unwrap()
            .set_slice(Some(start), Some(stop), added)
            .unwrap();
        assert_positional(&data);
        assert_eq!(data, expected, "slice [{start}:{stop}]");
    }
}

#[test]
fn deep_schema_change_after_insert() {
    let data = doc(json!([1, {"my_field": "something"}, [2.0]]), common::items_in_list_complex());
    let Err(Error::Validation(error)) = data.validate() else {
        panic!("object at a string position must fail");
    };
    assert_eq!(error.keyword, "type");

    data.array().unwrap().insert(1, "something_else").unwrap();
    assert!(data.validate().is_ok());
    let moved = data.at(2).unwrap();
    assert_eq!(
        moved.get("my_field").unwrap().schema().unwrap(),
        json!({"type": "string"})
    );
}

#[test]
fn parent_and_root_links() {
    let data = doc(json!({"authors": [{"family_name": "Ellis"}]}), complex());
    let authors = data.get("authors").unwrap();
    let first = authors.at(0).unwrap();
    let family = first.get("family_name").unwrap();

    assert_eq!(family.parent().get("family_name").unwrap(), "Ellis");
    assert_eq!(first.parent().at(0).unwrap().get("family_name").unwrap(), "Ellis");
    assert_eq!(
        authors.parent().get("authors").unwrap().at(0).unwrap().get("family_name").unwrap(),
        "Ellis"
    );
    for node in [&authors, &first, &family] {
        assert!(node.root().same_node(&data));
    }
    assert!(data.root().same_node(&data));
}

#[test]
fn links_do_not_keep_the_tree_alive() {
    let data = doc(json!({"inner": {"x": 1}}), Schema::empty());
    let inner = data.get("inner").unwrap();
    drop(data);
    assert!(inner.parent().same_node(&inner));
    assert!(inner.root().same_node(&inner));
    assert_eq!(inner, json!({"x": 1}));
}

#[test]
fn set_schema_rethreads_children() {
    let data = doc(json!([1, "Avenue"]), Schema::empty());
    data.array().unwrap().set_schema(items_in_list()).unwrap();
    assert_positional(&data);
    assert!(data.validate().is_ok());
}

#[test]
fn invalid_ref_fails_construction() {
    let mut schema = complex().fragment().clone();
    schema["properties"]["authors"]["items"]["properties"]["family_name"]["$ref"] = json!("#");
    let err = ProxyNode::new(
        json!({"authors": [{"family_name": "Ellis"}]}),
        Schema::new(schema),
    )
    .unwrap_err();
    assert!(matches!(err, Error::SchemaResolution { .. }));
    assert!(err.to_string().contains("is not accessible"));
}

#[test]
fn remote_refs_resolve_and_degrade() {
    common::init_tracing();
    let external = json!({
        "type": "object",
        "properties": {
            "authors": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {"family_name": {"$ref": "http://www.json.com"}}
                }
            }
        }
    });
    let data = doc(json!({"authors": [{"family_name": "Ellis"}]}), Schema::new(external.clone()));
    assert!(data.validate().is_ok());
    data.get("authors").unwrap().at(0).unwrap().set("family_name", 7).unwrap();
    let Err(Error::Validation(error)) = data.validate() else {
        panic!("7 is not a string");
    };
    assert_eq!(error.keyword, "type");

    let mut unreachable = external;
    unreachable["properties"]["authors"]["items"]["properties"]["family_name"]["$ref"] =
        json!("http://www.no.com");
    let data = doc(json!({"authors": [{"family_name": "Ellis"}]}), Schema::new(unreachable));
    let family = data.get("authors").unwrap().at(0).unwrap().get("family_name").unwrap();
    assert_eq!(family.schema().unwrap(), json!({}));
}

#[test]
fn leaf_immutability() {
    let cases = [
        (json!("verylongstring"), json!({"type": "string", "maxLength": 15})),
        (json!(13.5), json!({"type": "number", "multipleOf": 0.5})),
        (json!(13), json!({"type": "integer", "maximum": 15})),
    ];
    for (value, schema) in cases {
        let data = ProxyNode::new(value.clone(), Schema::new(schema)).unwrap();
        let err = data.transaction(|_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("is immutable"));
        assert!(matches!(data.update(&data), Err(Error::ImmutableMutation(_))));
        assert_eq!(data, value);
    }
}

#[test]
fn leaf_validation() {
    let cases = [
        (json!("verylongstring"), json!({"type": "string", "maxLength": 5}), ProxyKind::String),
        (json!(13.5), json!({"type": "number", "multipleOf": 0.4}), ProxyKind::Number),
        (json!(13), json!({"type": "integer", "maximum": 12}), ProxyKind::Integer),
    ];
    for (value, schema, kind) in cases {
        let data = ProxyNode::new(value, Schema::new(schema)).unwrap();
        assert!(matches!(data.validate(), Err(Error::Validation(_))));
        assert_eq!(data.kind(), kind);
    }
}

#[test]
fn read_callbacks_transform_stored_values() {
    use json_alchemy::{Callbacks, Config};

    let callbacks = Callbacks::new().on_read(&["authors", "*", "family_name"], |node| {
        Ok(json!(node.as_str().unwrap_or_default().to_uppercase()))
    });
    let config = Config::new().with_callbacks(callbacks);
    let data = ProxyNode::with_config(
        json!({"authors": [{"family_name": "Ellis"}], "family_name": "top"}),
        complex(),
        config,
    )
    .unwrap();
    let first = data.get("authors").unwrap().at(0).unwrap();
    assert_eq!(first.get("family_name").unwrap(), "ELLIS");
    assert_eq!(first.object().unwrap().stored("family_name").unwrap(), "Ellis");
    assert_eq!(data.get("family_name").unwrap(), "top");
}
