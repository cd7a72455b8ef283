use serde_json::Value;
use vellum_core::{Document, Mark, MarkSet, Node, TextNode, VellumValue};

fn sample_document() -> Document {
    let link = Mark::new("link").with_attr("href", Value::String("/docs".to_string()));
    Document {
        children: vec![
            Node::paragraph("plain"),
            Node::Element(vellum_core::ElementNode {
                kind: "paragraph".to_string(),
                attrs: vellum_core::Attrs::default(),
                children: vec![Node::Text(TextNode {
                    text: "linked".to_string(),
                    marks: MarkSet::default().with(link).with(Mark::new("strong")),
                })],
            }),
            Node::image("/a.png"),
        ],
    }
}

#[test]
fn value_round_trips_through_json() {
    let value = VellumValue::from_document(sample_document());

    let json = value.to_json_pretty().unwrap();
    let back = VellumValue::from_json_str(&json).unwrap();

    assert_eq!(back, value);
    assert_eq!(back.schema, "vellum");
    assert_eq!(back.version, 1);
    assert_eq!(back.into_document(), sample_document());
}

#[test]
fn missing_envelope_fields_take_defaults() {
    let json = r#"{"document":{"children":[]}}"#;
    let value = VellumValue::from_json_str(json).unwrap();

    assert_eq!(value.schema, "vellum");
    assert_eq!(value.version, 1);
    assert!(value.document.children.is_empty());
}

#[test]
fn mark_order_is_canonical_after_deserialization() {
    // Marks serialized in any order land in the same canonical set.
    let json = r#"{
        "document": {
            "children": [{
                "node": "element",
                "kind": "paragraph",
                "children": [{
                    "node": "text",
                    "text": "x",
                    "marks": [
                        {"name": "strong"},
                        {"name": "em"}
                    ]
                }]
            }]
        }
    }"#;
    let value = VellumValue::from_json_str(json).unwrap();

    let Node::Element(paragraph) = &value.document.children[0] else {
        panic!("expected paragraph element");
    };
    let Node::Text(t) = &paragraph.children[0] else {
        panic!("expected text child");
    };
    let expected: MarkSet = [Mark::new("em"), Mark::new("strong")].into_iter().collect();
    assert_eq!(t.marks, expected);
}
