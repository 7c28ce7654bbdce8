use super::*;

fn parse(content: &str) -> Document {
    parse_document(content, "test.yml").expect("valid yaml")
}

#[test]
fn parse_document_keeps_key_order() {
    let doc = parse("zeta:\n  script: a\nalpha:\n  script: b\n");
    let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn parse_document_empty_input_is_empty_document() {
    assert!(parse("").is_empty());
    assert!(parse("# only a comment\n").is_empty());
}

#[test]
fn parse_document_rejects_top_level_sequence() {
    let err = parse_document("- a\n- b\n", "list.yml").unwrap_err();
    assert_eq!(err.error_type(), "ParseError");
    assert!(err.to_string().contains("list.yml"));
    assert!(err.to_string().contains("sequence"));
}

#[test]
fn parse_document_rejects_malformed_yaml() {
    let err = parse_document("job: [unclosed\n", "bad.yml").unwrap_err();
    assert_eq!(err.error_type(), "ParseError");
}

#[test]
fn parse_reference_tag() {
    let doc = parse("job:\n  script: !reference [.setup, script]\n");
    assert_eq!(
        doc["job"].get("script"),
        Some(&Node::Reference(vec![
            ".setup".to_string(),
            "script".to_string()
        ]))
    );
}

#[test]
fn parse_reference_inside_sequence() {
    let doc = parse("job:\n  script:\n    - !reference [.setup, script]\n    - make\n");
    let script = doc["job"].get("script").and_then(Node::as_sequence).unwrap();
    assert!(matches!(script[0], Node::Reference(ref refs) if refs.len() == 2));
    assert_eq!(script[1], Node::from("make"));
}

#[test]
fn parse_rejects_unknown_tag() {
    let err = parse_document("job: !custom value\n", "tag.yml").unwrap_err();
    assert!(err.to_string().contains("unsupported tag"));
}

#[test]
fn parse_rejects_reference_with_mapping_payload() {
    let err = parse_document("job: !reference {a: b}\n", "tag.yml").unwrap_err();
    assert!(err.to_string().contains("sequence"));
}

#[test]
fn parse_applies_merge_keys() {
    let doc = parse(
        ".defaults: &defaults\n  image: alpine\n  tags: [docker]\njob:\n  <<: *defaults\n  script: make\n",
    );
    assert_eq!(doc["job"].get("image"), Some(&Node::from("alpine")));
    assert_eq!(doc["job"].get("script"), Some(&Node::from("make")));
    assert!(!doc["job"].contains_key("<<"));
}

#[test]
fn parse_stringifies_scalar_keys() {
    let doc = parse("matrix:\n  1: one\n  true: yes\n");
    let matrix = doc["matrix"].as_mapping().unwrap();
    assert!(matrix.contains_key("1"));
    assert!(matrix.contains_key("true"));
}

#[test]
fn structural_equality_ignores_mapping_order() {
    let a = parse("job:\n  script: a\n  stage: build\n");
    let b = parse("job:\n  stage: build\n  script: a\n");
    assert_eq!(a["job"], b["job"]);
}

#[test]
fn reference_equality_is_structural() {
    let a = Node::Reference(vec![".a".to_string(), "script".to_string()]);
    let b = Node::Reference(vec![".a".to_string(), "script".to_string()]);
    let c = Node::Reference(vec![".b".to_string(), "script".to_string()]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn node_accessors() {
    let node = Node::from(vec!["a", "b"]);
    assert_eq!(node.kind(), "sequence");
    assert_eq!(node.as_sequence().map(<[Node]>::len), Some(2));
    assert!(node.as_mapping().is_none());
    assert!(node.get("a").is_none());
}
