use vellum_core::{
    apply_input_rules, Document, Editor, ExtensionRegistry, Node, Point, Selection,
};

fn editor_with_caret(text: &str, offset: usize) -> Editor {
    let doc = Document {
        children: vec![Node::paragraph(text)],
    };
    let selection = Selection::collapsed(Point::new(vec![0, 0], offset));
    Editor::new(doc, selection, ExtensionRegistry::standard())
}

#[test]
fn double_star_autoformats_to_strong() {
    let mut editor = editor_with_caret("**bold**", 8);

    assert!(apply_input_rules(&mut editor).unwrap());

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    assert_eq!(paragraph.children.len(), 1);
    let Node::Text(t) = &paragraph.children[0] else {
        panic!("expected text child");
    };
    assert_eq!(t.text, "bold");
    assert!(t.marks.contains("strong"));

    assert_eq!(editor.selection().focus.path, vec![0, 0]);
    assert_eq!(editor.selection().focus.offset, 4);
}

#[test]
fn autoformat_preserves_text_before_the_match() {
    let mut editor = editor_with_caret("note: **bold**", 14);

    assert!(apply_input_rules(&mut editor).unwrap());

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    assert_eq!(paragraph.children.len(), 2);

    let Node::Text(plain) = &paragraph.children[0] else {
        panic!("expected plain text");
    };
    assert_eq!(plain.text, "note: ");
    assert!(plain.marks.is_empty());

    let Node::Text(bold) = &paragraph.children[1] else {
        panic!("expected bold text");
    };
    assert_eq!(bold.text, "bold");
    assert!(bold.marks.contains("strong"));
}

#[test]
fn backtick_autoformats_to_inline_code() {
    let mut editor = editor_with_caret("`code`", 6);

    assert!(apply_input_rules(&mut editor).unwrap());

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    let Node::Text(t) = &paragraph.children[0] else {
        panic!("expected text child");
    };
    assert_eq!(t.text, "code");
    assert!(t.marks.contains("code_inline"));
}

#[test]
fn rule_only_fires_when_the_match_ends_at_the_caret() {
    // Caret sits before the closing delimiters.
    let mut editor = editor_with_caret("**bold**", 6);
    assert!(!apply_input_rules(&mut editor).unwrap());

    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    let Node::Text(t) = &paragraph.children[0] else {
        panic!("expected text child");
    };
    assert_eq!(t.text, "**bold**");
    assert!(t.marks.is_empty());
}

#[test]
fn unmatched_text_is_untouched() {
    let mut editor = editor_with_caret("plain text", 10);
    assert!(!apply_input_rules(&mut editor).unwrap());
    assert_eq!(
        editor.doc().children,
        vec![Node::paragraph("plain text")]
    );
}

#[test]
fn expanded_selection_never_autoformats() {
    let mut editor = editor_with_caret("**bold**", 8);
    editor.set_selection(Selection {
        anchor: Point::new(vec![0, 0], 0),
        focus: Point::new(vec![0, 0], 8),
    });
    assert!(!apply_input_rules(&mut editor).unwrap());
}
