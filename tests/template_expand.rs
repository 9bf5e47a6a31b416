use std::collections::{BTreeMap, HashMap};

use uri_template_rs::{InputKind, TemplateError, TemplateLimits, TemplateValue, UriTemplate};

fn vars(pairs: &[(&str, TemplateValue)]) -> HashMap<String, TemplateValue> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn expand(raw: &str, pairs: &[(&str, TemplateValue)]) -> String {
    UriTemplate::new(raw)
        .expect("template should parse")
        .expand(&vars(pairs))
        .expect("expansion should succeed")
}

#[test]
fn expands_simple_path_variable() {
    assert_eq!(expand("/users/{id}", &[("id", "123".into())]), "/users/123");
}

#[test]
fn unbound_variables_produce_nothing() {
    assert_eq!(expand("/users/{id}", &[]), "/users/");
    assert_eq!(expand("/search{?q}", &[]), "/search");
    assert_eq!(expand("/x{/a,b}", &[]), "/x");
}

#[test]
fn empty_values_behave_as_unbound() {
    assert_eq!(expand("/search{?q}", &[("q", "".into())]), "/search");
    assert_eq!(
        expand("/files/{list*}", &[("list", TemplateValue::List(Vec::new()))]),
        "/files/"
    );
}

#[test]
fn expands_query_expression() {
    assert_eq!(expand("/search{?q}", &[("q", "test".into())]), "/search?q=test");
    assert_eq!(
        expand("/search{?q,lang}", &[("q", "rust".into()), ("lang", "en".into())]),
        "/search?q=rust&lang=en"
    );
}

#[test]
fn query_skips_unbound_names_without_losing_question_mark() {
    assert_eq!(expand("/search{?q,lang}", &[("lang", "en".into())]), "/search?lang=en");
}

#[test]
fn later_query_expressions_continue_with_ampersand() {
    let bindings: [(&str, TemplateValue); 2] = [("a", "1".into()), ("b", "2".into())];
    assert_eq!(expand("/x{?a}{?b}", &bindings), "/x?a=1&b=2");
    assert_eq!(expand("/x{?a}{&b}", &bindings), "/x?a=1&b=2");
    assert_eq!(expand("/x{?a}{?b}", &[("b", "2".into())]), "/x?b=2");
}

#[test]
fn literal_question_mark_counts_as_query() {
    let bindings: [(&str, TemplateValue); 1] = [("b", "2".into())];
    assert_eq!(expand("/x?fixed=1{?b}", &bindings), "/x?fixed=1&b=2");
    assert_eq!(expand("/x?fixed=1{&b}", &bindings), "/x?fixed=1&b=2");
}

#[test]
fn query_list_values_are_encoded_then_comma_joined() {
    assert_eq!(
        expand("/s{?tags}", &[("tags", ["a b", "c&d"].into())]),
        "/s?tags=a%20b,c%26d"
    );
}

#[test]
fn simple_expansion_encodes_reserved_characters() {
    assert_eq!(
        expand("/v/{var}", &[("var", "hello world/x?".into())]),
        "/v/hello%20world%2Fx%3F"
    );
}

#[test]
fn reserved_expansion_keeps_reserved_characters() {
    assert_eq!(
        expand("/map{+path}", &[("path", "/foo/bar baz?x=1".into())]),
        "/map/foo/bar%20baz?x=1"
    );
}

#[test]
fn fragment_expansion_prefixes_hash() {
    assert_eq!(expand("/doc{#section}", &[("section", "intro/a".into())]), "/doc#intro/a");
}

#[test]
fn label_and_path_operators_join_lists_with_their_separator() {
    assert_eq!(expand("/file{.ext}", &[("ext", "json".into())]), "/file.json");
    assert_eq!(expand("/file{.ext}", &[("ext", ["tar", "gz"].into())]), "/file.tar.gz");
    assert_eq!(expand("/root{/seg}", &[("seg", ["a", "b c"].into())]), "/root/a/b%20c");
}

#[test]
fn simple_list_values_are_comma_joined() {
    assert_eq!(expand("/files/{list*}", &[("list", ["a", "b", "c"].into())]), "/files/a,b,c");
}

#[test]
fn multiple_variables_take_first_value_and_join_with_comma() {
    let bindings: [(&str, TemplateValue); 2] = [("x", "1024".into()), ("y", "768".into())];
    assert_eq!(expand("/map/{x,y}", &bindings), "/map/1024,768");
    assert_eq!(expand("/map{/x,y}", &bindings), "/map/1024,768");
    assert_eq!(expand("/map/{x,y}", &[("y", "768".into())]), "/map/768");
    assert_eq!(
        expand("/map/{x,y}", &[("x", ["a", "b"].into()), ("y", "c".into())]),
        "/map/a,c"
    );
}

#[test]
fn accepts_other_variable_sources() {
    let template = UriTemplate::new("/users/{id}{?page}").expect("template should parse");

    let mut ordered = BTreeMap::new();
    ordered.insert("id".to_string(), TemplateValue::from("7"));
    assert_eq!(template.expand(&ordered).expect("expansion should succeed"), "/users/7");

    let mut fast = hashbrown::HashMap::new();
    fast.insert("id".to_string(), TemplateValue::from("7"));
    fast.insert("page".to_string(), TemplateValue::from("2"));
    assert_eq!(
        template.expand(&fast).expect("expansion should succeed"),
        "/users/7?page=2"
    );
}

#[test]
fn rejects_bound_value_over_limit() {
    let limits = TemplateLimits::builder()
        .max_variable_length(4)
        .build()
        .expect("limits should build");
    let template = UriTemplate::with_limits("/users/{id}", limits).expect("template should parse");
    let err = template
        .expand(&vars(&[("id", "abcdef".into())]))
        .expect_err("long value should fail");
    match &err {
        TemplateError::InputTooLong { input, len, max } => {
            assert_eq!(*input, InputKind::Value { name: "id".to_string() });
            assert_eq!(*len, 6);
            assert_eq!(*max, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_input_too_long());
}
