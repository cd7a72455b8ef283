use vellum_core::{
    doc_text, doc_text_len, offset_to_point, point_to_offset, text_between, Document,
    ExtensionRegistry, Node, Point,
};

fn two_paragraphs() -> Document {
    Document {
        children: vec![Node::paragraph("hello"), Node::paragraph("world")],
    }
}

#[test]
fn doc_text_joins_blocks_with_newlines() {
    let registry = ExtensionRegistry::standard();
    let doc = two_paragraphs();

    assert_eq!(doc_text(&doc, &registry), "hello\nworld");
    assert_eq!(doc_text_len(&doc, &registry), 11);
}

#[test]
fn offsets_map_into_the_right_block() {
    let registry = ExtensionRegistry::standard();
    let doc = two_paragraphs();

    let point = offset_to_point(&doc, &registry, 2).unwrap();
    assert_eq!(point, Point::new(vec![0, 0], 2));

    let point = offset_to_point(&doc, &registry, 7).unwrap();
    assert_eq!(point, Point::new(vec![1, 0], 1));

    assert!(offset_to_point(&doc, &registry, 99).is_none());
}

#[test]
fn point_and_offset_invert_each_other() {
    let registry = ExtensionRegistry::standard();
    let doc = two_paragraphs();

    for offset in [0usize, 3, 5, 6, 8, 11] {
        let point = offset_to_point(&doc, &registry, offset).unwrap();
        let back = point_to_offset(&doc, &registry, &point).unwrap();
        assert_eq!(back, offset, "offset {offset} did not round-trip");
    }
}

#[test]
fn text_between_spans_block_boundaries() {
    let registry = ExtensionRegistry::standard();
    let doc = two_paragraphs();

    assert_eq!(text_between(&doc, &registry, 3, 8), "lo\nwo");
    assert_eq!(text_between(&doc, &registry, 0, 5), "hello");
    assert_eq!(text_between(&doc, &registry, 5, 5), "");
}
