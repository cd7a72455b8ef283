use vellum_core::{
    toggle_mark, Document, Editor, ExtensionRegistry, Node, Op, Point, Selection, Transaction,
};

fn editor_with_text(text: &str) -> Editor {
    let doc = Document {
        children: vec![Node::paragraph(text)],
    };
    let selection = Selection::collapsed(Point::new(vec![0, 0], 0));
    Editor::new(doc, selection, ExtensionRegistry::standard())
}

#[test]
fn undo_redo_handles_multi_op_insert_order() {
    let mut editor = editor_with_text("");

    let tx = Transaction::new(vec![
        Op::InsertText {
            path: vec![0, 0],
            offset: 0,
            text: "a".to_string(),
        },
        Op::InsertText {
            path: vec![0, 0],
            offset: 1,
            text: "b".to_string(),
        },
    ])
    .selection_after(Selection::collapsed(Point::new(vec![0, 0], 2)))
    .source("test:multi_insert");

    editor.apply(tx).unwrap();
    assert_eq!(editor.doc().children, vec![Node::paragraph("ab")]);
    assert_eq!(editor.selection().focus.offset, 2);

    assert!(editor.undo());
    assert_eq!(editor.doc().children, vec![Node::paragraph("")]);
    assert_eq!(editor.selection().focus.offset, 0);

    assert!(editor.redo());
    assert_eq!(editor.doc().children, vec![Node::paragraph("ab")]);
    assert_eq!(editor.selection().focus.offset, 2);
}

#[test]
fn undo_restores_the_unmarked_document() {
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
    assert_eq!(paragraph.children.len(), 3);

    assert!(editor.undo());
    assert_eq!(editor.doc().children, vec![Node::paragraph("abcde")]);

    assert!(editor.redo());
    let Node::Element(paragraph) = &editor.doc().children[0] else {
        panic!("expected paragraph element");
    };
    assert_eq!(paragraph.children.len(), 3);
    let Node::Text(middle) = &paragraph.children[1] else {
        panic!("expected marked text");
    };
    assert!(middle.marks.contains("strong"));
}

#[test]
fn new_transaction_clears_the_redo_stack() {
    let mut editor = editor_with_text("x");

    let tx = Transaction::new(vec![Op::InsertText {
        path: vec![0, 0],
        offset: 1,
        text: "y".to_string(),
    }]);
    editor.apply(tx).unwrap();

    assert!(editor.undo());
    assert!(editor.can_redo());

    let tx = Transaction::new(vec![Op::InsertText {
        path: vec![0, 0],
        offset: 1,
        text: "z".to_string(),
    }]);
    editor.apply(tx).unwrap();

    assert!(!editor.can_redo());
    assert_eq!(editor.doc().children, vec![Node::paragraph("xz")]);
}
