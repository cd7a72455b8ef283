use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use vellum_core::{
    add_mark, doc_text_len, node_at_path, offset_to_point, point_to_offset, remove_mark,
    text_between, CommandError, Editor, Mark, Node, Point, Selection,
};

/// A mark mutation requested over a flat-offset range: add a mark instance,
/// or strip the mark with a given name.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkChange {
    Add(Mark),
    Remove(String),
}

/// The host surface the session layer sees: current document state, one
/// transaction-dispatch entry point for mark changes, selection movement,
/// and focus. The document itself stays owned by the wrapped editor.
pub struct EditorView {
    editor: Editor,
    editable: bool,
    focused: bool,
}

/// Single-threaded shared handle to a view, for bridges that outlive one
/// call stack.
pub type SharedView = Rc<RefCell<EditorView>>;

impl EditorView {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            editable: true,
            focused: false,
        }
    }

    pub fn read_only(editor: Editor) -> Self {
        Self {
            editor,
            editable: false,
            focused: false,
        }
    }

    pub fn shared(self) -> SharedView {
        Rc::new(RefCell::new(self))
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// The current selection as an ordered flat-offset range.
    pub fn selection_range(&self) -> Range<usize> {
        let doc = self.editor.doc();
        let registry = self.editor.registry();
        let sel = self.editor.selection();
        let a = point_to_offset(doc, registry, &sel.anchor).unwrap_or(0);
        let b = point_to_offset(doc, registry, &sel.focus).unwrap_or(a);
        a.min(b)..a.max(b)
    }

    pub fn selection_text(&self) -> String {
        let range = self.selection_range();
        self.text_between(range.start, range.end)
    }

    pub fn text_between(&self, from: usize, to: usize) -> String {
        text_between(self.editor.doc(), self.editor.registry(), from, to)
    }

    /// The mark named `name` on the text leaf at `offset`, if any.
    pub fn mark_at(&self, offset: usize, name: &str) -> Option<Mark> {
        let point = offset_to_point(self.editor.doc(), self.editor.registry(), offset)?;
        match node_at_path(self.editor.doc(), &point.path)? {
            Node::Text(t) => t.marks.get(name).cloned(),
            _ => None,
        }
    }

    /// Dispatches one mark transaction over `[from, to)`. Never retried
    /// here on failure; the editor's transaction layer is authoritative.
    pub fn apply_mark_change(
        &mut self,
        range: Range<usize>,
        change: MarkChange,
    ) -> Result<(), CommandError> {
        if !self.editable {
            return Ok(());
        }
        let tx = match change {
            MarkChange::Add(mark) => add_mark(&self.editor, range.start, range.end, mark)?,
            MarkChange::Remove(name) => {
                remove_mark(&self.editor, range.start, range.end, &name)?
            }
        };
        self.editor
            .apply(tx)
            .map_err(|e| CommandError::new(format!("Failed to apply mark change: {e}")))
    }

    /// Collapses the selection at `offset`, clamped to the document.
    pub fn move_selection(&mut self, offset: usize) {
        let doc = self.editor.doc();
        let registry = self.editor.registry();
        let offset = offset.min(doc_text_len(doc, registry));
        if let Some(point) = offset_to_point(doc, registry, offset) {
            self.editor.set_selection(Selection::collapsed(point));
        }
    }

    /// Collapses the selection at a concrete document point.
    pub fn move_selection_to_point(&mut self, point: Point) {
        self.editor.set_selection(Selection::collapsed(point));
    }
}
