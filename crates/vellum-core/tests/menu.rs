use serde_json::Value;
use vellum_core::{
    formatting_menu_items, image_menu_items, toggle_mark, Attrs, Dictionary, Document, Editor,
    ElementNode, ExtensionRegistry, IconName, Node, Point, Selection,
};

fn editor_with_text(text: &str) -> Editor {
    let doc = Document {
        children: vec![Node::paragraph(text)],
    };
    let selection = Selection::collapsed(Point::new(vec![0, 0], 0));
    Editor::new(doc, selection, ExtensionRegistry::standard())
}

#[test]
fn identical_state_builds_structurally_equal_menus() {
    let editor = editor_with_text("abc");
    let dictionary = Dictionary::default();

    let first = formatting_menu_items(&editor, false, &dictionary);
    let second = formatting_menu_items(&editor, false, &dictionary);
    assert_eq!(first, second);

    let first = image_menu_items(&editor, &dictionary);
    let second = image_menu_items(&editor, &dictionary);
    assert_eq!(first, second);
}

#[test]
fn template_flags_gate_placeholder_and_highlight() {
    let editor = editor_with_text("abc");
    let dictionary = Dictionary::default();

    let items = formatting_menu_items(&editor, true, &dictionary);
    let placeholder = items.iter().find(|i| i.name == "placeholder").unwrap();
    assert!(placeholder.visible);
    let highlight = items.iter().find(|i| i.name == "mark").unwrap();
    assert!(!highlight.visible);

    let items = formatting_menu_items(&editor, false, &dictionary);
    let placeholder = items.iter().find(|i| i.name == "placeholder").unwrap();
    assert!(!placeholder.visible);
    let highlight = items.iter().find(|i| i.name == "mark").unwrap();
    assert!(highlight.visible);
}

#[test]
fn strong_item_reflects_selection_coverage() {
    let mut editor = editor_with_text("abcde");
    editor.set_selection(Selection {
        anchor: Point::new(vec![0, 0], 1),
        focus: Point::new(vec![0, 0], 3),
    });
    let tx = toggle_mark(&editor, "strong").unwrap();
    editor.apply(tx).unwrap();

    let dictionary = Dictionary::default();
    let items = formatting_menu_items(&editor, false, &dictionary);
    let strong = items.iter().find(|i| i.name == "strong").unwrap();
    assert!(strong.active);

    // Selection extended past the bold range is no longer wholly covered.
    editor.set_selection(Selection {
        anchor: Point::new(vec![0, 0], 0),
        focus: Point::new(vec![0, 2], 2),
    });
    let items = formatting_menu_items(&editor, false, &dictionary);
    let strong = items.iter().find(|i| i.name == "strong").unwrap();
    assert!(!strong.active);
}

#[test]
fn link_item_seeds_an_empty_href() {
    let editor = editor_with_text("abc");
    let items = formatting_menu_items(&editor, false, &Dictionary::default());

    let link = items.iter().find(|i| i.name == "link").unwrap();
    assert_eq!(link.icon, Some(IconName::Link));
    let attrs = link.attrs.as_ref().unwrap();
    assert_eq!(attrs.get("href"), Some(&Value::String(String::new())));
}

#[test]
fn list_context_hides_the_block_separator() {
    let doc = Document {
        children: vec![Node::Element(ElementNode {
            kind: "list_item".to_string(),
            attrs: Attrs::default(),
            children: vec![Node::Text(vellum_core::TextNode {
                text: "item".to_string(),
                marks: vellum_core::MarkSet::default(),
            })],
        })],
    };
    let selection = Selection::collapsed(Point::new(vec![0, 0], 0));
    let editor = Editor::new(doc, selection, ExtensionRegistry::standard());

    let items = formatting_menu_items(&editor, false, &Dictionary::default());
    let separators: Vec<bool> = items
        .iter()
        .filter(|i| i.name == "separator")
        .map(|i| i.visible)
        .collect();
    // template separator, block separator, trailing separator
    assert_eq!(separators, vec![false, false, true]);
}

#[test]
fn image_alignment_follows_the_layout_class() {
    let mut left_attrs = Attrs::default();
    left_attrs.insert("src".to_string(), Value::String("/a.png".to_string()));
    left_attrs.insert(
        "layout_class".to_string(),
        Value::String("left-50".to_string()),
    );

    let doc = Document {
        children: vec![
            Node::Void(vellum_core::VoidNode {
                kind: "image".to_string(),
                attrs: left_attrs,
            }),
            Node::paragraph(""),
        ],
    };
    let selection = Selection::collapsed(Point::new(vec![1, 0], 0));
    let mut editor = Editor::new(doc, selection, ExtensionRegistry::standard());
    editor.set_node_selection(Some(vec![0]));

    let items = image_menu_items(&editor, &Dictionary::default());
    let by_name = |name: &str| items.iter().find(|i| i.name == name).unwrap();

    assert!(by_name("alignLeft").active);
    assert!(!by_name("alignCenter").active);
    assert!(!by_name("alignRight").active);
    assert!(!by_name("deleteImage").active);
}

#[test]
fn image_without_layout_class_is_centered() {
    let doc = Document {
        children: vec![Node::image("/a.png"), Node::paragraph("")],
    };
    let selection = Selection::collapsed(Point::new(vec![1, 0], 0));
    let mut editor = Editor::new(doc, selection, ExtensionRegistry::standard());
    editor.set_node_selection(Some(vec![0]));

    let items = image_menu_items(&editor, &Dictionary::default());
    let center = items.iter().find(|i| i.name == "alignCenter").unwrap();
    assert!(center.active);
}

#[test]
fn no_selected_image_means_no_active_alignment() {
    let editor = editor_with_text("abc");
    let items = image_menu_items(&editor, &Dictionary::default());
    assert!(items.iter().all(|i| !i.active));
}
