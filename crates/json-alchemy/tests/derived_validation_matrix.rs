mod common;

use common::{calculated_dict, complex, doc, template, AUTHOR};
use json_alchemy::{Error, ProxyKind, ProxyNode, Schema};
use serde_json::json;

#[test]
fn calculated_fields() {
    let data = doc(json!({}), Schema::new(calculated_dict()));
    assert_eq!(data.get("author").unwrap(), AUTHOR);

    let err = data.set("author", "But I didn't want to test").unwrap_err();
    assert!(matches!(err, Error::Hook { ref name, .. } if name == "fortests.helpers.raise_error"));
    assert!(err.to_string().contains("can't process author"));
    assert_eq!(data.get("author").unwrap(), AUTHOR);

    let mut schema = calculated_dict();
    schema["properties"]["author"]["getter"] = json!("fortests.helpers.schema_title");
    let data = doc(json!({}), Schema::new(schema));
    assert_eq!(
        data.get("author").unwrap(),
        "Test calculated fields in a dictionary"
    );
    let object = data.object().unwrap();
    assert_eq!(
        object.get_or("author", "").unwrap(),
        "Test calculated fields in a dictionary"
    );
    assert_eq!(object.get_or("notthere", "").unwrap(), "");
}

#[test]
fn getter_reads_are_pure() {
    let data = doc(json!({"author": "stored"}), Schema::new(calculated_dict()));
    let first = data.get("author").unwrap();
    let _ = data.set("author", "ignored");
    let second = data.get("author").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, AUTHOR);
}

#[test]
fn template_fields_follow_their_sources() {
    let data = doc(json!({"first_name": "John", "last_name": "Ellis"}), template());
    assert_eq!(data.get("full_name").unwrap(), "John Ellis");
    assert_eq!(data.get("full_name").unwrap().kind(), ProxyKind::String);

    data.set("full_name", "John Smith").unwrap();
    assert_eq!(data.get("full_name").unwrap(), "John Ellis");

    data.set("first_name", "Jerry").unwrap();
    assert_eq!(data.get("full_name").unwrap(), "Jerry Ellis");
}

#[test]
fn unregistered_hooks_fail_lookup() {
    let schema = Schema::new(json!({
        "type": "object",
        "properties": {
            "invalid_getter_and_setter": {
                "getter": "nowhere.to.be.found",
                "setter": "nowhere.to.be.found"
            }
        }
    }));
    let data = doc(json!({}), schema);
    assert!(matches!(
        data.get("invalid_getter_and_setter"),
        Err(Error::ImportLookup { ref name }) if name == "nowhere.to.be.found"
    ));
    assert!(matches!(
        data.set("invalid_getter_and_setter", "foo"),
        Err(Error::ImportLookup { .. })
    ));

    let data = doc(json!("foo"), Schema::new(json!({"validation": "nowhere.to.be.found"})));
    assert!(matches!(data.validate(), Err(Error::ImportLookup { .. })));
}

#[test]
fn external_validation_hook() {
    let data = doc(json!({"authors": [{"given_name": "Richard"}]}), complex());
    assert!(data.validate().is_ok());

    let first = data.get("authors").unwrap().at(0).unwrap();
    first.set("given_name", "richard").unwrap();
    let Err(Error::Validation(error)) = data.validate() else {
        panic!("lowercase given name must fail");
    };
    assert!(error.message.contains("start with an uppercase"));
    assert_eq!(error.keyword, "validation");
    assert_eq!(error.instance_path, "/authors/0/given_name");
}

#[test]
fn enum_source_membership() {
    let schema = Schema::new(json!({
        "type": "object",
        "properties": {
            "languages": {"type": "array", "items": {"type": "string"}},
            "primary": {"type": "string", "enumSource": "languages"},
            "by_code": {"type": "object"},
            "code": {"enumSource": "by_code"}
        }
    }));
    let data = doc(
        json!({
            "languages": ["en", "fr"],
            "primary": "fr",
            "by_code": {"en": "English"},
            "code": "en"
        }),
        schema,
    );
    assert!(data.validate().is_ok());

    data.set("primary", "de").unwrap();
    let Err(Error::Validation(error)) = data.validate() else {
        panic!("`de` is not a listed language");
    };
    assert_eq!(error.keyword, "enumSource");
    assert_eq!(error.instance_path, "/primary");

    data.get("languages").unwrap().array().unwrap().append("de").unwrap();
    assert!(data.validate().is_ok());

    data.set("code", "fr").unwrap();
    assert!(data.validate().is_err());
}

#[test]
fn unknown_type_is_invalid_schema() {
    let schema = Schema::new(json!({
        "type": "object",
        "properties": {"my_field": {"type": "nosuchtype"}}
    }));
    let data = doc(json!({"my_field": "test"}), schema);
    assert!(matches!(data.validate(), Err(Error::InvalidSchema(_))));
}

#[test]
fn search_synthesises_positional_schema() {
    let data = doc(
        json!({"authors": [{"family_name": "Higgs"}, {"family_name": "Englert"}]}),
        complex(),
    );
    let result = data.search("authors[*].family_name").unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.get(0).unwrap().kind(), ProxyKind::String);
    assert_eq!(result.get(1).unwrap(), "Englert");

    let items = result.schema().keyword("items").cloned().unwrap();
    let expected: Vec<_> = (0..2)
        .map(|i| {
            let node = data.get("authors").unwrap().at(i).unwrap().get("family_name").unwrap();
            node.schema().unwrap().fragment().clone()
        })
        .collect();
    assert_eq!(items, json!(expected));
    assert!(ProxyNode::from(result.clone()).validate().is_ok());

    let ProxyNode::String(first) = result.get(0).unwrap() else {
        panic!("matched family names are string leaves");
    };
    assert_eq!(first.as_str(), "Higgs");
}

#[test]
fn search_query_errors() {
    let data = doc(json!({"a": 1}), Schema::empty());
    assert!(matches!(data.search(""), Err(Error::Query(_))));
    assert!(matches!(data.search("$['a"), Err(Error::Query(_))));
}
