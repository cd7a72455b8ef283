use thiserror::Error;

use crate::core::{
    clamp_to_char_boundary, AttrPatch, Attrs, Document, MarkSet, Node, Point, Selection, TextNode,
};
use crate::extension::{ChildConstraint, CommandError, ExtensionRegistry};
use crate::ops::{Op, Path, Transaction};

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("document normalization did not converge")]
    NormalizeDidNotConverge,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct PathError(pub String);

impl From<PathError> for ApplyError {
    fn from(value: PathError) -> Self {
        ApplyError::InvalidPath(value.0)
    }
}

#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub inverse_ops: Vec<Op>,
    pub selection_before: Selection,
    pub selection_after: Selection,
}

#[derive(Debug, Clone)]
pub struct TransactionPreview {
    pub doc: Document,
    pub selection: Selection,
}

#[derive(Debug, Default)]
pub struct EditorConfig {
    pub max_undo: usize,
    pub max_normalize_iterations: usize,
}

impl EditorConfig {
    fn with_defaults(mut self) -> Self {
        if self.max_undo == 0 {
            self.max_undo = 200;
        }
        if self.max_normalize_iterations == 0 {
            self.max_normalize_iterations = 100;
        }
        self
    }
}

pub struct Editor {
    doc: Document,
    selection: Selection,
    node_selection: Option<Path>,
    registry: ExtensionRegistry,
    config: EditorConfig,
    undo_stack: Vec<UndoRecord>,
    redo_stack: Vec<UndoRecord>,
}

impl Editor {
    pub fn new(doc: Document, selection: Selection, registry: ExtensionRegistry) -> Self {
        let config = EditorConfig::default().with_defaults();
        let mut editor = Self {
            doc,
            selection,
            node_selection: None,
            registry,
            config,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        };
        editor.normalize_in_place();
        editor
    }

    pub fn with_standard_extensions() -> Self {
        let registry = ExtensionRegistry::standard();
        let doc = Document {
            children: vec![Node::paragraph("")],
        };
        let selection = Selection::collapsed(Point::new(vec![0, 0], 0));
        Self::new(doc, selection, registry)
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.node_selection = None;
        self.normalize_selection_in_place();
    }

    /// Marks a void/widget-backed node as the selected node. Cleared by any
    /// transaction or text selection change.
    pub fn set_node_selection(&mut self, path: Option<Path>) {
        self.node_selection = path;
    }

    pub fn node_selection(&self) -> Option<&Path> {
        self.node_selection.as_ref()
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(record) = self.undo_stack.pop() else {
            return false;
        };

        let UndoRecord {
            inverse_ops,
            selection_before,
            selection_after,
        } = record;

        let mut redo_ops: Vec<Op> = Vec::new();
        for op in inverse_ops.iter().cloned() {
            if let Ok(inv) = self.apply_op(op) {
                redo_ops.push(inv);
            } else {
                // If we can't apply inverse ops, stop mutating further.
                break;
            }
        }
        redo_ops.reverse();

        self.selection = selection_before.clone();
        self.normalize_in_place();

        self.redo_stack.push(UndoRecord {
            selection_before,
            selection_after,
            inverse_ops: redo_ops,
        });
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(record) = self.redo_stack.pop() else {
            return false;
        };

        let UndoRecord {
            inverse_ops,
            selection_before,
            selection_after,
        } = record;

        let mut undo_ops: Vec<Op> = Vec::new();
        for op in inverse_ops.iter().cloned() {
            if let Ok(inv) = self.apply_op(op) {
                undo_ops.push(inv);
            } else {
                break;
            }
        }
        undo_ops.reverse();

        self.selection = selection_after.clone();
        self.normalize_in_place();

        self.undo_stack.push(UndoRecord {
            selection_before,
            selection_after,
            inverse_ops: undo_ops,
        });
        true
    }

    pub fn apply(&mut self, tx: Transaction) -> Result<(), ApplyError> {
        let selection_before = self.selection.clone();

        let mut inverse_ops: Vec<Op> = Vec::new();
        for op in tx.ops.iter().cloned() {
            let inv = self.apply_op(op)?;
            inverse_ops.push(inv);
        }

        if let Some(sel) = tx.selection_after {
            self.selection = sel;
        }
        self.node_selection = None;

        let mut inverse_normalize = self.normalize_with_inverse_ops()?;
        inverse_ops.append(&mut inverse_normalize);
        inverse_ops.reverse();

        self.normalize_selection_in_place();

        let selection_after = self.selection.clone();

        self.undo_stack.push(UndoRecord {
            inverse_ops,
            selection_before,
            selection_after,
        });
        self.redo_stack.clear();
        if self.undo_stack.len() > self.config.max_undo {
            self.undo_stack.remove(0);
        }

        Ok(())
    }

    pub fn preview_transaction(&self, tx: &Transaction) -> Result<TransactionPreview, ApplyError> {
        let mut doc = self.doc.clone();
        let mut selection = self.selection.clone();

        for op in tx.ops.iter().cloned() {
            let _ = apply_op_to(&mut doc, &mut selection, op)?;
        }

        if let Some(sel) = &tx.selection_after {
            selection = sel.clone();
        }

        let mut converged = false;
        for _ in 0..self.config.max_normalize_iterations {
            let ops = normalize_ops(&doc, &self.registry);
            if ops.is_empty() {
                converged = true;
                break;
            }
            for op in ops {
                let _ = apply_op_to(&mut doc, &mut selection, op)?;
            }
        }

        if !converged {
            return Err(ApplyError::NormalizeDidNotConverge);
        }

        selection = normalize_selection(&doc, &selection);

        Ok(TransactionPreview { doc, selection })
    }

    /// Runs the command bound to `combo` in the assembled keymap. Returns
    /// whether a binding was found; the binding's own failure is an error.
    pub fn dispatch_key(&mut self, combo: &str) -> Result<bool, CommandError> {
        let Some(command) = self.registry.keymap().get(combo) else {
            return Ok(false);
        };
        (command)(self)?;
        Ok(true)
    }

    fn normalize_in_place(&mut self) {
        let _ = self.normalize_with_inverse_ops();
        self.normalize_selection_in_place();
    }

    fn normalize_selection_in_place(&mut self) {
        self.selection = normalize_selection(&self.doc, &self.selection);
    }

    fn normalize_with_inverse_ops(&mut self) -> Result<Vec<Op>, ApplyError> {
        let mut inverse_ops: Vec<Op> = Vec::new();
        for _ in 0..self.config.max_normalize_iterations {
            let ops = normalize_ops(&self.doc, &self.registry);
            if ops.is_empty() {
                return Ok(inverse_ops);
            }
            for op in ops {
                let inv = self.apply_op(op)?;
                inverse_ops.push(inv);
            }
        }
        Err(ApplyError::NormalizeDidNotConverge)
    }

    fn apply_op(&mut self, op: Op) -> Result<Op, ApplyError> {
        apply_op_to(&mut self.doc, &mut self.selection, op)
    }
}

fn apply_op_to(doc: &mut Document, selection: &mut Selection, op: Op) -> Result<Op, ApplyError> {
    match op {
        Op::InsertText { path, offset, text } => {
            let text_node = node_text_mut(doc, &path)?;
            let offset = clamp_to_char_boundary(&text_node.text, offset);
            text_node.text.insert_str(offset, &text);
            transform_selection_insert_text(selection, &path, offset, text.len());
            Ok(Op::RemoveText {
                path,
                range: offset..offset + text.len(),
            })
        }
        Op::RemoveText { path, range } => {
            let text_node = node_text_mut(doc, &path)?;
            let start =
                clamp_to_char_boundary(&text_node.text, range.start.min(text_node.text.len()));
            let end = clamp_to_char_boundary(&text_node.text, range.end.min(text_node.text.len()));
            if start >= end {
                return Ok(Op::InsertText {
                    path,
                    offset: start,
                    text: String::new(),
                });
            }
            let removed = text_node.text[start..end].to_string();
            text_node.text.replace_range(start..end, "");
            transform_selection_remove_text(selection, &path, start..end);
            Ok(Op::InsertText {
                path,
                offset: start,
                text: removed,
            })
        }
        Op::InsertNode { path, node } => {
            insert_node(doc, &path, node)?;
            transform_selection_insert_node(selection, &path);
            Ok(Op::RemoveNode { path })
        }
        Op::RemoveNode { path } => {
            let removed = remove_node(doc, &path)?;
            transform_selection_remove_node(selection, &path, &removed, doc);
            Ok(Op::InsertNode {
                path,
                node: removed,
            })
        }
        Op::SetNodeAttrs { path, patch } => {
            let node = node_mut(doc, &path)?;
            let old = match node {
                Node::Element(el) => patch_apply(&mut el.attrs, &patch),
                Node::Void(v) => patch_apply(&mut v.attrs, &patch),
                Node::Text(_) => return Err(ApplyError::InvalidPath("Text has no attrs".into())),
            };
            Ok(Op::SetNodeAttrs { path, patch: old })
        }
        Op::SetTextMarks { path, marks } => {
            let text_node = node_text_mut(doc, &path)?;
            let old = std::mem::replace(&mut text_node.marks, marks);
            Ok(Op::SetTextMarks { path, marks: old })
        }
    }
}

fn patch_apply(attrs: &mut Attrs, patch: &AttrPatch) -> AttrPatch {
    let mut old_set: Attrs = Attrs::new();
    let mut old_remove: Vec<String> = Vec::new();

    for (k, v) in &patch.set {
        if let Some(prev) = attrs.insert(k.clone(), v.clone()) {
            old_set.insert(k.clone(), prev);
        } else {
            old_remove.push(k.clone());
        }
    }

    for key in &patch.remove {
        if let Some(prev) = attrs.remove(key) {
            old_set.insert(key.clone(), prev);
        }
    }

    AttrPatch {
        set: old_set,
        remove: old_remove,
    }
}

fn transform_selection_insert_text(
    selection: &mut Selection,
    path: &[usize],
    offset: usize,
    len: usize,
) {
    for point in [&mut selection.anchor, &mut selection.focus] {
        if point.path == path && point.offset >= offset {
            point.offset = point.offset.saturating_add(len);
        }
    }
}

fn transform_selection_remove_text(
    selection: &mut Selection,
    path: &[usize],
    range: std::ops::Range<usize>,
) {
    let removed_len = range.end.saturating_sub(range.start);
    for point in [&mut selection.anchor, &mut selection.focus] {
        if point.path != path {
            continue;
        }
        if point.offset <= range.start {
            continue;
        }
        if point.offset >= range.end {
            point.offset = point.offset.saturating_sub(removed_len);
        } else {
            point.offset = range.start;
        }
    }
}

fn transform_selection_insert_node(selection: &mut Selection, path: &[usize]) {
    if path.is_empty() {
        return;
    }
    let (parent_path, index) = path.split_at(path.len() - 1);
    let index = index[0];

    for point in [&mut selection.anchor, &mut selection.focus] {
        if point.path.len() <= parent_path.len() {
            continue;
        }
        if !point.path.starts_with(parent_path) {
            continue;
        }
        let depth = parent_path.len();
        if point.path[depth] >= index {
            point.path[depth] += 1;
        }
    }
}

fn transform_selection_remove_node(
    selection: &mut Selection,
    path: &[usize],
    removed: &Node,
    doc_after_remove: &Document,
) {
    if path.is_empty() {
        return;
    }
    let (parent_path, index) = path.split_at(path.len() - 1);
    let index = index[0];

    let merge_prefix_len = match (removed, index.checked_sub(1)) {
        (Node::Text(removed_text), Some(left_index)) => {
            let mut left_path = parent_path.to_vec();
            left_path.push(left_index);
            match crate::core::node_at_path(doc_after_remove, &left_path) {
                Some(Node::Text(left_text))
                    if left_text.marks == removed_text.marks
                        && left_text.text.ends_with(&removed_text.text) =>
                {
                    Some(left_text.text.len().saturating_sub(removed_text.text.len()))
                }
                _ => None,
            }
        }
        _ => None,
    };

    for point in [&mut selection.anchor, &mut selection.focus] {
        if point.path.len() <= parent_path.len() {
            continue;
        }
        if !point.path.starts_with(parent_path) {
            continue;
        }
        let depth = parent_path.len();
        let ix = point.path[depth];
        if ix > index {
            point.path[depth] = ix - 1;
            continue;
        }
        if ix < index {
            continue;
        }

        // Point was inside the removed subtree. Map it to a nearby point.
        if let (Some(prefix), Node::Text(removed_text), Some(left_index)) =
            (merge_prefix_len, removed, index.checked_sub(1))
        {
            point.path.truncate(depth + 1);
            point.path[depth] = left_index;
            point.offset = (prefix + point.offset).min(prefix + removed_text.text.len());
        } else {
            point.path.truncate(depth + 1);
            point.path[depth] = index.saturating_sub(1);
            point.offset = 0;
        }
    }
}

fn node_mut<'a>(doc: &'a mut Document, path: &[usize]) -> Result<&'a mut Node, PathError> {
    let Some((&first, rest)) = path.split_first() else {
        return Err(PathError("Empty path".into()));
    };

    let len = doc.children.len();
    let mut node = doc
        .children
        .get_mut(first)
        .ok_or_else(|| PathError(format!("Path out of bounds at depth 0: {first} >= {len}")))?;

    for (depth, &ix) in rest.iter().enumerate() {
        node = match node {
            Node::Element(el) => {
                let len = el.children.len();
                el.children.get_mut(ix).ok_or_else(|| {
                    PathError(format!(
                        "Path out of bounds at depth {}: {ix} >= {len}",
                        depth + 1
                    ))
                })?
            }
            Node::Void(_) | Node::Text(_) => {
                return Err(PathError(format!("Non-container node at depth {depth}")));
            }
        };
    }
    Ok(node)
}

fn node_text_mut<'a>(doc: &'a mut Document, path: &[usize]) -> Result<&'a mut TextNode, PathError> {
    match node_mut(doc, path)? {
        Node::Text(t) => Ok(t),
        _ => Err(PathError("Expected Text node".into())),
    }
}

fn insert_node(doc: &mut Document, path: &[usize], node: Node) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError("Empty insert path".into()));
    }

    let (parent_path, index) = path.split_at(path.len() - 1);
    let index = index[0];

    let children = if parent_path.is_empty() {
        &mut doc.children
    } else {
        match node_mut(doc, parent_path)? {
            Node::Element(el) => &mut el.children,
            Node::Void(_) | Node::Text(_) => {
                return Err(PathError("Insert parent is not a container".into()));
            }
        }
    };

    if index > children.len() {
        return Err(PathError(format!(
            "Insert index out of bounds: {index} > {}",
            children.len()
        )));
    }
    children.insert(index, node);
    Ok(())
}

fn remove_node(doc: &mut Document, path: &[usize]) -> Result<Node, PathError> {
    if path.is_empty() {
        return Err(PathError("Empty remove path".into()));
    }

    let (parent_path, index) = path.split_at(path.len() - 1);
    let index = index[0];

    let children = if parent_path.is_empty() {
        &mut doc.children
    } else {
        match node_mut(doc, parent_path)? {
            Node::Element(el) => &mut el.children,
            Node::Void(_) | Node::Text(_) => {
                return Err(PathError("Remove parent is not a container".into()));
            }
        }
    };

    if index >= children.len() {
        return Err(PathError(format!(
            "Remove index out of bounds: {index} >= {}",
            children.len()
        )));
    }
    Ok(children.remove(index))
}

/// Structural repair passes run to a fixed point after every transaction:
/// the document is never empty, inline-only blocks keep at least one text
/// leaf, and adjacent text leaves with equal mark sets are merged.
pub(crate) fn normalize_ops(doc: &Document, registry: &ExtensionRegistry) -> Vec<Op> {
    let mut ops = Vec::new();
    ops.extend(ensure_non_empty_document(doc));
    ops.extend(ensure_text_leaf_in_inline_blocks(doc, registry));
    ops.extend(merge_adjacent_text_leaves(doc, registry));
    ops
}

fn ensure_non_empty_document(doc: &Document) -> Vec<Op> {
    if doc.children.is_empty() {
        return vec![Op::InsertNode {
            path: vec![0],
            node: Node::paragraph(""),
        }];
    }
    Vec::new()
}

fn ensure_text_leaf_in_inline_blocks(doc: &Document, registry: &ExtensionRegistry) -> Vec<Op> {
    let mut ops = Vec::new();

    fn walk(
        children: &[Node],
        path: &mut Vec<usize>,
        registry: &ExtensionRegistry,
        ops: &mut Vec<Op>,
    ) {
        for (ix, node) in children.iter().enumerate() {
            let Node::Element(el) = node else {
                continue;
            };

            path.push(ix);

            if registry.child_constraint(&el.kind) == ChildConstraint::InlineOnly {
                let has_text = el.children.iter().any(|n| matches!(n, Node::Text(_)));
                if !has_text {
                    let mut insert_path = path.clone();
                    insert_path.push(0);
                    ops.push(Op::InsertNode {
                        path: insert_path,
                        node: Node::Text(TextNode {
                            text: String::new(),
                            marks: MarkSet::default(),
                        }),
                    });
                }
            } else {
                walk(&el.children, path, registry, ops);
            }

            path.pop();
        }
    }

    walk(&doc.children, &mut Vec::new(), registry, &mut ops);
    ops
}

fn merge_adjacent_text_leaves(doc: &Document, registry: &ExtensionRegistry) -> Vec<Op> {
    let mut ops = Vec::new();

    fn walk(
        children: &[Node],
        path: &mut Vec<usize>,
        registry: &ExtensionRegistry,
        ops: &mut Vec<Op>,
    ) {
        for (ix, node) in children.iter().enumerate() {
            let Node::Element(el) = node else {
                continue;
            };

            path.push(ix);

            let constraint = match registry.node_spec(&el.kind) {
                Some(spec) => spec.children,
                None => {
                    if el.children.iter().any(|n| matches!(n, Node::Text(_))) {
                        ChildConstraint::InlineOnly
                    } else {
                        ChildConstraint::Any
                    }
                }
            };

            if constraint == ChildConstraint::InlineOnly {
                if el.children.len() >= 2 {
                    let mut ix = el.children.len();
                    while ix > 0 {
                        ix -= 1;
                        let Node::Text(right) = &el.children[ix] else {
                            continue;
                        };

                        let mut start = ix;
                        while start > 0 {
                            let Some(Node::Text(left)) = el.children.get(start - 1) else {
                                break;
                            };
                            if left.marks != right.marks {
                                break;
                            }
                            start -= 1;
                        }

                        if start == ix {
                            continue;
                        }

                        let Some(Node::Text(first)) = el.children.get(start) else {
                            continue;
                        };
                        let mut appended = String::new();
                        for node in el.children.iter().take(ix + 1).skip(start + 1) {
                            if let Node::Text(t) = node {
                                appended.push_str(&t.text);
                            }
                        }

                        if !appended.is_empty() {
                            let mut insert_text_path = path.clone();
                            insert_text_path.push(start);
                            ops.push(Op::InsertText {
                                path: insert_text_path,
                                offset: first.text.len(),
                                text: appended,
                            });
                        }

                        for remove_ix in (start + 1..=ix).rev() {
                            let mut remove_path = path.clone();
                            remove_path.push(remove_ix);
                            ops.push(Op::RemoveNode { path: remove_path });
                        }

                        ix = start;
                    }
                }
            } else {
                walk(&el.children, path, registry, ops);
            }

            path.pop();
        }
    }

    walk(&doc.children, &mut Vec::new(), registry, &mut ops);

    ops
}

pub(crate) fn normalize_selection(doc: &Document, selection: &Selection) -> Selection {
    let fallback = first_text_point(doc).unwrap_or(Point {
        path: vec![0],
        offset: 0,
    });

    let anchor = normalize_point_to_existing_text(doc, &selection.anchor).unwrap_or_else(|| {
        normalize_point_to_existing_text(doc, &selection.focus).unwrap_or_else(|| fallback.clone())
    });
    let focus =
        normalize_point_to_existing_text(doc, &selection.focus).unwrap_or_else(|| anchor.clone());

    Selection { anchor, focus }
}

fn first_text_point(doc: &Document) -> Option<Point> {
    fn walk(children: &[Node], path: &mut Vec<usize>) -> Option<Point> {
        for (ix, node) in children.iter().enumerate() {
            path.push(ix);
            match node {
                Node::Text(_) => {
                    let point = Point {
                        path: path.clone(),
                        offset: 0,
                    };
                    path.pop();
                    return Some(point);
                }
                Node::Element(el) => {
                    if let Some(point) = walk(&el.children, path) {
                        path.pop();
                        return Some(point);
                    }
                }
                Node::Void(_) => {}
            }
            path.pop();
        }
        None
    }

    walk(&doc.children, &mut Vec::new())
}

fn normalize_point_to_existing_text(doc: &Document, point: &Point) -> Option<Point> {
    if point.path.is_empty() || doc.children.is_empty() {
        return None;
    }

    fn first_text_descendant(children: &[Node], path: &mut Vec<usize>) -> Option<Point> {
        for (ix, node) in children.iter().enumerate() {
            path.push(ix);
            match node {
                Node::Text(_) => {
                    let point = Point {
                        path: path.clone(),
                        offset: 0,
                    };
                    path.pop();
                    return Some(point);
                }
                Node::Element(el) => {
                    if let Some(point) = first_text_descendant(&el.children, path) {
                        path.pop();
                        return Some(point);
                    }
                }
                Node::Void(_) => {}
            }
            path.pop();
        }
        None
    }

    let mut resolved_path: Vec<usize> = Vec::new();
    let mut children: &[Node] = &doc.children;

    for &wanted in &point.path {
        if children.is_empty() {
            break;
        }
        let ix = wanted.min(children.len() - 1);
        resolved_path.push(ix);
        let node = &children[ix];
        match node {
            Node::Text(t) => {
                return Some(Point {
                    path: resolved_path,
                    offset: point.offset.min(t.text.len()),
                });
            }
            Node::Element(el) => {
                children = &el.children;
            }
            Node::Void(_) => {
                break;
            }
        }
    }

    let node = crate::core::node_at_path(doc, &resolved_path)?;
    match node {
        Node::Text(t) => Some(Point {
            path: resolved_path,
            offset: point.offset.min(t.text.len()),
        }),
        Node::Element(el) => first_text_descendant(&el.children, &mut resolved_path),
        Node::Void(_) => None,
    }
}
