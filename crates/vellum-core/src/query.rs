use crate::core::{node_at_path, Attrs, MarkSet, Node};
use crate::editor::Editor;
use crate::transform::all_selected_text_nodes_satisfy;

/// Marks on the text leaf under the selection focus.
pub fn active_marks(editor: &Editor) -> MarkSet {
    let focus = &editor.selection().focus;
    match node_at_path(editor.doc(), &focus.path) {
        Some(Node::Text(text)) => text.marks.clone(),
        _ => MarkSet::default(),
    }
}

/// Whether the selection is wholly covered by the mark named `name`. A
/// collapsed selection reads the marks at the caret.
pub fn is_mark_active(editor: &Editor, name: &str) -> bool {
    let sel = editor.selection().clone();
    if sel.is_collapsed() {
        return active_marks(editor).contains(name);
    }
    all_selected_text_nodes_satisfy(editor, &sel, &|marks| marks.contains(name)).unwrap_or(false)
}

fn attrs_match(node_attrs: &Attrs, wanted: &Attrs) -> bool {
    wanted
        .iter()
        .all(|(key, value)| node_attrs.get(key) == Some(value))
}

/// Whether a node of `kind` whose attrs contain `attrs` is selected: either
/// as the current node selection (widget-backed nodes) or as an ancestor of
/// the selection focus.
pub fn is_node_active(editor: &Editor, kind: &str, attrs: &Attrs) -> bool {
    if let Some(path) = editor.node_selection() {
        if let Some(node) = node_at_path(editor.doc(), path) {
            let node_attrs = match node {
                Node::Element(el) if el.kind == kind => Some(&el.attrs),
                Node::Void(v) if v.kind == kind => Some(&v.attrs),
                _ => None,
            };
            if let Some(node_attrs) = node_attrs {
                return attrs_match(node_attrs, attrs);
            }
        }
    }

    let focus = &editor.selection().focus;
    for depth in 1..focus.path.len() {
        let Some(Node::Element(el)) = node_at_path(editor.doc(), &focus.path[..depth]) else {
            continue;
        };
        if el.kind == kind && attrs_match(&el.attrs, attrs) {
            return true;
        }
    }
    false
}

/// Whether the selection focus sits inside a list item block.
pub fn is_in_list(editor: &Editor) -> bool {
    is_node_active(editor, "list_item", &Attrs::default())
}
