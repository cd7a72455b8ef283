use serde_json::Value;
use vellum_core::{
    add_mark, point_to_offset, remove_mark, toggle_mark, Document, Editor, ExtensionRegistry,
    Mark, Node, Point, Selection,
};

fn editor_with_text(text: &str) -> Editor {
    let doc = Document {
        children: vec![Node::paragraph(text)],
    };
    let selection = Selection::collapsed(Point::new(vec![0, 0], 0));
    Editor::new(doc, selection, ExtensionRegistry::standard())
}

fn row_offset(editor: &Editor, point: &Point) -> usize {
    point_to_offset(editor.doc(), editor.registry(), point).unwrap_or(0)
}

#[test]
fn toggle_mark_only_affects_selection_range() {
    let mut editor = editor_with_text("abcde");
    editor.set_selection(Selection {
        anchor: Point::new(vec![0, 0], 1),
        focus: Point::new(vec![0, 0], 3),
    });

    let tx = toggle_mark(&editor, "strong").unwrap();
    editor.apply(tx).unwrap();

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    assert_eq!(paragraph.kind, "paragraph");
    assert_eq!(paragraph.children.len(), 3);

    let texts: Vec<_> = paragraph
        .children
        .iter()
        .map(|n| match n {
            Node::Text(t) => (t.text.clone(), t.marks.contains("strong")),
            _ => ("".to_string(), false),
        })
        .collect();
    assert_eq!(
        texts,
        vec![
            ("a".to_string(), false),
            ("bc".to_string(), true),
            ("de".to_string(), false),
        ]
    );

    // selection survives the rewrite
    let a = row_offset(&editor, &editor.selection().anchor.clone());
    let b = row_offset(&editor, &editor.selection().focus.clone());
    assert_eq!((a.min(b), a.max(b)), (1, 3));

    let tx = toggle_mark(&editor, "strong").unwrap();
    editor.apply(tx).unwrap();

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    assert_eq!(paragraph.children.len(), 1);

    let Node::Text(t) = &paragraph.children[0] else {
        panic!("expected paragraph text");
    };
    assert_eq!(t.text, "abcde");
    assert!(!t.marks.contains("strong"));
}

#[test]
fn toggle_at_caret_splits_for_upcoming_input() {
    let mut editor = editor_with_text("ab");
    editor.set_selection(Selection::collapsed(Point::new(vec![0, 0], 1)));

    let tx = toggle_mark(&editor, "strong").unwrap();
    editor.apply(tx).unwrap();

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    assert_eq!(paragraph.children.len(), 3);
    let Node::Text(middle) = &paragraph.children[1] else {
        panic!("expected styled caret leaf");
    };
    assert!(middle.text.is_empty());
    assert!(middle.marks.contains("strong"));
    assert_eq!(editor.selection().focus.path, vec![0, 1]);
}

#[test]
fn add_and_remove_link_over_flat_range() {
    let mut editor = editor_with_text("read the docs now");

    let mark = Mark::new("link").with_attr("href", Value::String("/docs".to_string()));
    let tx = add_mark(&editor, 9, 13, mark).unwrap();
    editor.apply(tx).unwrap();

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    assert_eq!(paragraph.children.len(), 3);
    let Node::Text(linked) = &paragraph.children[1] else {
        panic!("expected linked text");
    };
    assert_eq!(linked.text, "docs");
    assert_eq!(
        linked.marks.get("link").and_then(|m| m.attr_str("href")),
        Some("/docs")
    );

    let tx = remove_mark(&editor, 9, 13, "link").unwrap();
    editor.apply(tx).unwrap();

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    assert_eq!(paragraph.children.len(), 1);
    let Node::Text(t) = &paragraph.children[0] else {
        panic!("expected merged text");
    };
    assert_eq!(t.text, "read the docs now");
    assert!(t.marks.is_empty());
}

#[test]
fn changing_link_href_is_remove_then_add() {
    let mut editor = editor_with_text("docs");
    let old = Mark::new("link").with_attr("href", Value::String("/old".to_string()));
    let tx = add_mark(&editor, 0, 4, old).unwrap();
    editor.apply(tx).unwrap();

    let tx = remove_mark(&editor, 0, 4, "link").unwrap();
    editor.apply(tx).unwrap();
    let new = Mark::new("link").with_attr("href", Value::String("/new".to_string()));
    let tx = add_mark(&editor, 0, 4, new).unwrap();
    editor.apply(tx).unwrap();

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    let Node::Text(t) = &paragraph.children[0] else {
        panic!("expected text child");
    };
    assert_eq!(
        t.marks.get("link").and_then(|m| m.attr_str("href")),
        Some("/new")
    );
}

#[test]
fn overlapping_marks_coexist_on_one_range() {
    let mut editor = editor_with_text("abcde");
    editor.set_selection(Selection {
        anchor: Point::new(vec![0, 0], 0),
        focus: Point::new(vec![0, 0], 5),
    });

    let tx = toggle_mark(&editor, "strong").unwrap();
    editor.apply(tx).unwrap();

    let mark = Mark::new("link").with_attr("href", Value::String("/a".to_string()));
    let tx = add_mark(&editor, 1, 3, mark).unwrap();
    editor.apply(tx).unwrap();

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    let Node::Text(middle) = &paragraph.children[1] else {
        panic!("expected overlapped text");
    };
    assert!(middle.marks.contains("strong"));
    assert!(middle.marks.contains("link"));
}
