use serde_json::Value;
use vellum_core::{
    parse_markdown, to_markdown, Attrs, Document, ElementNode, ExtensionRegistry, Mark, MarkSet,
    Node, TextNode,
};

fn text(text: &str) -> Node {
    Node::Text(TextNode {
        text: text.to_string(),
        marks: MarkSet::default(),
    })
}

fn marked(text: &str, names: &[&str]) -> Node {
    let marks: MarkSet = names.iter().map(|n| Mark::new(*n)).collect();
    Node::Text(TextNode {
        text: text.to_string(),
        marks,
    })
}

fn paragraph(children: Vec<Node>) -> Node {
    Node::Element(ElementNode {
        kind: "paragraph".to_string(),
        attrs: Attrs::default(),
        children,
    })
}

#[test]
fn strong_delimiters_round_trip_exactly() {
    let registry = ExtensionRegistry::standard();
    let doc = Document {
        children: vec![paragraph(vec![
            text("a"),
            marked("bc", &["strong"]),
            text("de"),
        ])],
    };

    let md = to_markdown(&doc, &registry);
    assert_eq!(md, "a**bc**de");

    let parsed = parse_markdown(&md, &registry);
    assert_eq!(parsed, doc);
}

#[test]
fn enclosing_whitespace_is_expelled_from_strong() {
    let registry = ExtensionRegistry::standard();
    let doc = Document {
        children: vec![paragraph(vec![marked(" padded ", &["strong"])])],
    };

    let md = to_markdown(&doc, &registry);
    assert_eq!(md, " **padded** ");

    // The serialized form is stable under a parse/serialize cycle.
    let reparsed = parse_markdown(&md, &registry);
    assert_eq!(to_markdown(&reparsed, &registry), md);
}

#[test]
fn link_round_trips_with_href() {
    let registry = ExtensionRegistry::standard();
    let link = Mark::new("link").with_attr("href", Value::String("/docs".to_string()));
    let doc = Document {
        children: vec![paragraph(vec![
            text("see "),
            Node::Text(TextNode {
                text: "the docs".to_string(),
                marks: MarkSet::default().with(link),
            }),
        ])],
    };

    let md = to_markdown(&doc, &registry);
    assert_eq!(md, "see [the docs](/docs)");

    let parsed = parse_markdown(&md, &registry);
    assert_eq!(parsed, doc);
}

#[test]
fn adjacent_marks_continue_instead_of_reopening() {
    let registry = ExtensionRegistry::standard();
    let doc = Document {
        children: vec![paragraph(vec![
            marked("a", &["strong"]),
            marked("b", &["em", "strong"]),
        ])],
    };

    let md = to_markdown(&doc, &registry);
    assert_eq!(md, "**a*b***");

    let parsed = parse_markdown(&md, &registry);
    assert_eq!(parsed, doc);
}

#[test]
fn code_serializes_innermost() {
    let registry = ExtensionRegistry::standard();
    let doc = Document {
        children: vec![paragraph(vec![marked("x", &["code_inline", "strong"])])],
    };

    let md = to_markdown(&doc, &registry);
    assert_eq!(md, "**`x`**");

    let parsed = parse_markdown(&md, &registry);
    assert_eq!(parsed, doc);
}

#[test]
fn blocks_and_images_round_trip() {
    let registry = ExtensionRegistry::standard();
    let doc = Document {
        children: vec![
            paragraph(vec![text("intro")]),
            Node::image("/img/a.png"),
            Node::Element(ElementNode {
                kind: "list_item".to_string(),
                attrs: Attrs::default(),
                children: vec![text("first")],
            }),
        ],
    };

    let md = to_markdown(&doc, &registry);
    assert_eq!(md, "intro\n\n![](/img/a.png)\n\n- first");

    let parsed = parse_markdown(&md, &registry);
    assert_eq!(parsed, doc);
}

#[test]
fn stray_delimiters_stay_literal() {
    let registry = ExtensionRegistry::standard();
    let parsed = parse_markdown("a * b ** c", &registry);

    let Node::Element(paragraph) = &parsed.children[0] else {
        panic!("expected paragraph element");
    };
    let Node::Text(t) = &paragraph.children[0] else {
        panic!("expected text child");
    };
    assert_eq!(t.text, "a * b ** c");
    assert!(t.marks.is_empty());
}
