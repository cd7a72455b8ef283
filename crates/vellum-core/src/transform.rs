use std::sync::Arc;

use crate::core::{
    clamp_to_char_boundary, is_point_in_block, node_at_path, offset_to_point, point_for_global_offset,
    point_global_offset, text_blocks_in_order, total_inline_text_len, Mark, MarkSet, Node, Point,
    Selection, TextNode,
};
use crate::editor::Editor;
use crate::extension::{Command, CommandError};
use crate::ops::{Op, Transaction};

pub(crate) fn ordered_selection_points(sel: &Selection) -> (Point, Point) {
    let mut start = sel.anchor.clone();
    let mut end = sel.focus.clone();

    if start.path == end.path {
        if end.offset < start.offset {
            std::mem::swap(&mut start, &mut end);
        }
        return (start, end);
    }
    if end.path < start.path {
        std::mem::swap(&mut start, &mut end);
    }
    (start, end)
}

pub(crate) fn all_selected_text_nodes_satisfy(
    editor: &Editor,
    sel: &Selection,
    get: &dyn Fn(&MarkSet) -> bool,
) -> Result<bool, CommandError> {
    let (start, end) = ordered_selection_points(sel);
    let Some(start_block_path) = start.path.split_last().map(|(_, p)| p.to_vec()) else {
        return Err(CommandError::new("Selection start is not in a text block"));
    };
    let Some(end_block_path) = end.path.split_last().map(|(_, p)| p.to_vec()) else {
        return Err(CommandError::new("Selection end is not in a text block"));
    };

    let blocks = text_blocks_in_order(editor.doc(), editor.registry());
    let start_index = blocks
        .iter()
        .position(|b| b.path == start_block_path)
        .ok_or_else(|| CommandError::new("Selection start is not in a text block"))?;
    let end_index = blocks
        .iter()
        .position(|b| b.path == end_block_path)
        .ok_or_else(|| CommandError::new("Selection end is not in a text block"))?;

    let (start_index, end_index) = if start_index <= end_index {
        (start_index, end_index)
    } else {
        (end_index, start_index)
    };

    let start_inline_ix = start.path.last().copied().unwrap_or(0);
    let end_inline_ix = end.path.last().copied().unwrap_or(0);

    for (block_index, block) in blocks
        .iter()
        .enumerate()
        .take(end_index + 1)
        .skip(start_index)
    {
        let children = block.el.children.as_slice();
        let total_len = total_inline_text_len(children);
        if total_len == 0 {
            continue;
        }

        let start_global = if block_index == start_index {
            point_global_offset(children, start_inline_ix, start.offset)
        } else {
            0
        };
        let end_global = if block_index == end_index {
            point_global_offset(children, end_inline_ix, end.offset)
        } else {
            total_len
        };
        if start_global >= end_global {
            continue;
        }

        let mut cursor = 0usize;
        for node in children {
            let (node_start, node_end) = match node {
                Node::Text(t) => {
                    let start = cursor;
                    let end = cursor + t.text.len();
                    cursor = end;
                    (start, end)
                }
                Node::Void(v) => {
                    let start = cursor;
                    let end = cursor + v.inline_text_len();
                    cursor = end;
                    (start, end)
                }
                Node::Element(_) => {
                    continue;
                }
            };
            if end_global <= node_start || start_global >= node_end {
                continue;
            }
            if let Node::Text(t) = node {
                if !get(&t.marks) {
                    return Ok(false);
                }
            }
        }
    }

    Ok(true)
}

pub(crate) fn apply_marks_in_block(
    children: &[Node],
    start_global: usize,
    end_global: usize,
    apply: &dyn Fn(MarkSet) -> MarkSet,
) -> Vec<Node> {
    if start_global >= end_global {
        return children.to_vec();
    }

    let mut out: Vec<Node> = Vec::new();
    let mut cursor = 0usize;

    for node in children {
        let (node_start, node_end) = match node {
            Node::Text(t) => {
                let start = cursor;
                let end = cursor + t.text.len();
                cursor = end;
                (start, end)
            }
            Node::Void(v) => {
                cursor += v.inline_text_len();
                out.push(node.clone());
                continue;
            }
            Node::Element(_) => {
                out.push(node.clone());
                continue;
            }
        };

        if end_global <= node_start || start_global >= node_end {
            out.push(node.clone());
            continue;
        }

        let Node::Text(t) = node else {
            out.push(node.clone());
            continue;
        };

        let sel_start = (start_global.saturating_sub(node_start)).min(t.text.len());
        let sel_end = (end_global.saturating_sub(node_start)).min(t.text.len());

        let sel_start = clamp_to_char_boundary(&t.text, sel_start);
        let sel_end = clamp_to_char_boundary(&t.text, sel_end);

        if sel_start == 0 && sel_end == t.text.len() {
            let mut next = t.clone();
            next.marks = apply(next.marks);
            out.push(Node::Text(next));
            continue;
        }

        let prefix = t.text.get(..sel_start).unwrap_or("").to_string();
        let middle = t.text.get(sel_start..sel_end).unwrap_or("").to_string();
        let suffix = t.text.get(sel_end..).unwrap_or("").to_string();

        if !prefix.is_empty() {
            out.push(Node::Text(TextNode {
                text: prefix,
                marks: t.marks.clone(),
            }));
        }
        if !middle.is_empty() {
            out.push(Node::Text(TextNode {
                text: middle,
                marks: apply(t.marks.clone()),
            }));
        }
        if !suffix.is_empty() {
            out.push(Node::Text(TextNode {
                text: suffix,
                marks: t.marks.clone(),
            }));
        }
    }

    if out.is_empty() {
        out.push(Node::Text(TextNode {
            text: String::new(),
            marks: MarkSet::default(),
        }));
    }

    out
}

pub(crate) fn apply_mark_range(
    editor: &Editor,
    sel: &Selection,
    apply: &dyn Fn(MarkSet) -> MarkSet,
) -> Result<(Vec<Op>, Selection), CommandError> {
    let (start, end) = ordered_selection_points(sel);

    let Some(start_block_path) = start.path.split_last().map(|(_, p)| p.to_vec()) else {
        return Err(CommandError::new("Selection start is not in a text block"));
    };
    let Some(end_block_path) = end.path.split_last().map(|(_, p)| p.to_vec()) else {
        return Err(CommandError::new("Selection end is not in a text block"));
    };

    let blocks = text_blocks_in_order(editor.doc(), editor.registry());
    let start_index = blocks
        .iter()
        .position(|b| b.path == start_block_path)
        .ok_or_else(|| CommandError::new("Selection start is not in a text block"))?;
    let end_index = blocks
        .iter()
        .position(|b| b.path == end_block_path)
        .ok_or_else(|| CommandError::new("Selection end is not in a text block"))?;

    let (start_index, end_index) = if start_index <= end_index {
        (start_index, end_index)
    } else {
        (end_index, start_index)
    };

    let start_inline_ix = start.path.last().copied().unwrap_or(0);
    let end_inline_ix = end.path.last().copied().unwrap_or(0);

    let mut ops: Vec<Op> = Vec::new();
    let mut new_anchor = sel.anchor.clone();
    let mut new_focus = sel.focus.clone();

    for (block_index, block) in blocks
        .iter()
        .enumerate()
        .take(end_index + 1)
        .skip(start_index)
    {
        let children = block.el.children.as_slice();
        let total_len = total_inline_text_len(children);
        if total_len == 0 {
            continue;
        }

        let start_global = if block_index == start_index {
            point_global_offset(children, start_inline_ix, start.offset)
        } else {
            0
        };
        let end_global = if block_index == end_index {
            point_global_offset(children, end_inline_ix, end.offset)
        } else {
            total_len
        };

        if start_global >= end_global {
            continue;
        }

        let new_children = apply_marks_in_block(children, start_global, end_global, apply);

        for child_ix in (0..children.len()).rev() {
            let mut remove_path = block.path.clone();
            remove_path.push(child_ix);
            ops.push(Op::RemoveNode { path: remove_path });
        }
        for (child_ix, node) in new_children.iter().cloned().enumerate() {
            let mut insert_path = block.path.clone();
            insert_path.push(child_ix);
            ops.push(Op::InsertNode {
                path: insert_path,
                node,
            });
        }

        if is_point_in_block(&new_anchor, &block.path) {
            let global = point_global_offset(
                children,
                new_anchor.path.last().copied().unwrap_or(0),
                new_anchor.offset,
            );
            new_anchor = point_for_global_offset(&block.path, &new_children, global);
        }
        if is_point_in_block(&new_focus, &block.path) {
            let global = point_global_offset(
                children,
                new_focus.path.last().copied().unwrap_or(0),
                new_focus.offset,
            );
            new_focus = point_for_global_offset(&block.path, &new_children, global);
        }
    }

    Ok((
        ops,
        Selection {
            anchor: new_anchor,
            focus: new_focus,
        },
    ))
}

pub(crate) fn apply_marks_at_caret(
    editor: &Editor,
    apply: impl Fn(MarkSet) -> MarkSet,
) -> Result<(Vec<Op>, Selection), CommandError> {
    let focus = editor.selection().focus.clone();
    if focus.path.is_empty() {
        return Err(CommandError::new("Selection is not in a text node"));
    }
    let (child_ix, block_path) = focus
        .path
        .split_last()
        .ok_or_else(|| CommandError::new("Selection is not in a text node"))?;

    let Some(Node::Element(el)) = node_at_path(editor.doc(), block_path) else {
        return Err(CommandError::new("Selection is not in a text block"));
    };
    let Some(Node::Text(text)) = el.children.get(*child_ix) else {
        return Err(CommandError::new("Selection is not in a text node"));
    };

    let cursor = clamp_to_char_boundary(&text.text, focus.offset);
    let marks_before = text.marks.clone();
    let marks_after = apply(marks_before.clone());

    if text.text.is_empty() {
        let selection_after = Selection::collapsed(Point::new(focus.path.clone(), 0));
        return Ok((
            vec![Op::SetTextMarks {
                path: focus.path.clone(),
                marks: marks_after,
            }],
            selection_after,
        ));
    }

    let mut replacement: Vec<Node> = Vec::new();
    let base_child_ix = *child_ix;
    let mut caret_child_ix = base_child_ix;

    let left = text.text.get(..cursor).unwrap_or("").to_string();
    let right = text.text.get(cursor..).unwrap_or("").to_string();

    if !left.is_empty() {
        replacement.push(Node::Text(TextNode {
            text: left,
            marks: marks_before.clone(),
        }));
        caret_child_ix += 1;
    }

    replacement.push(Node::Text(TextNode {
        text: String::new(),
        marks: marks_after,
    }));

    if !right.is_empty() {
        replacement.push(Node::Text(TextNode {
            text: right,
            marks: marks_before,
        }));
    }

    let mut ops: Vec<Op> = Vec::new();
    ops.push(Op::RemoveNode {
        path: focus.path.clone(),
    });
    for (i, node) in replacement.into_iter().enumerate() {
        let mut path = block_path.to_vec();
        path.push(base_child_ix + i);
        ops.push(Op::InsertNode { path, node });
    }

    let mut caret_path = block_path.to_vec();
    caret_path.push(caret_child_ix);
    let selection_after = Selection::collapsed(Point::new(caret_path, 0));
    Ok((ops, selection_after))
}

/// Toggles `name` on the current selection: off if every selected text node
/// already carries it, on otherwise. A collapsed selection toggles the mark
/// for upcoming input at the caret.
pub fn toggle_mark(editor: &Editor, name: &str) -> Result<Transaction, CommandError> {
    let sel = editor.selection().clone();
    let source = format!("command:marks.toggle_{name}");

    if sel.is_collapsed() {
        let name = name.to_string();
        return apply_marks_at_caret(editor, move |marks| {
            if marks.contains(&name) {
                marks.without(&name)
            } else {
                marks.with(Mark::new(name.clone()))
            }
        })
        .map(|(ops, selection_after)| {
            Transaction::new(ops)
                .selection_after(selection_after)
                .source(source)
        });
    }

    let all_set = all_selected_text_nodes_satisfy(editor, &sel, &|marks| marks.contains(name))?;
    let apply: Box<dyn Fn(MarkSet) -> MarkSet> = if all_set {
        let name = name.to_string();
        Box::new(move |marks: MarkSet| marks.without(&name))
    } else {
        let mark = Mark::new(name);
        Box::new(move |marks: MarkSet| marks.with(mark.clone()))
    };

    apply_mark_range(editor, &sel, apply.as_ref()).map(|(ops, selection_after)| {
        Transaction::new(ops)
            .selection_after(selection_after)
            .source(source)
    })
}

fn selection_between(editor: &Editor, from: usize, to: usize) -> Result<Selection, CommandError> {
    let anchor = offset_to_point(editor.doc(), editor.registry(), from)
        .ok_or_else(|| CommandError::new(format!("Position out of range: {from}")))?;
    let focus = offset_to_point(editor.doc(), editor.registry(), to)
        .ok_or_else(|| CommandError::new(format!("Position out of range: {to}")))?;
    Ok(Selection { anchor, focus })
}

/// Applies `mark` over the flat-offset range `[from, to)`.
pub fn add_mark(
    editor: &Editor,
    from: usize,
    to: usize,
    mark: Mark,
) -> Result<Transaction, CommandError> {
    let sel = selection_between(editor, from, to)?;
    let name = mark.name.clone();
    apply_mark_range(editor, &sel, &move |marks: MarkSet| {
        marks.with(mark.clone())
    })
    .map(|(ops, selection_after)| {
        Transaction::new(ops)
            .selection_after(selection_after)
            .source(format!("command:marks.add_{name}"))
    })
}

/// Removes the mark named `name` from the flat-offset range `[from, to)`.
pub fn remove_mark(
    editor: &Editor,
    from: usize,
    to: usize,
    name: &str,
) -> Result<Transaction, CommandError> {
    let sel = selection_between(editor, from, to)?;
    let source = format!("command:marks.remove_{name}");
    let name = name.to_string();
    apply_mark_range(editor, &sel, &move |marks: MarkSet| marks.without(&name)).map(
        |(ops, selection_after)| {
            Transaction::new(ops)
                .selection_after(selection_after)
                .source(source)
        },
    )
}

/// Keymap command that toggles a mark on the current selection.
pub fn toggle_mark_command(name: &'static str) -> Command {
    Arc::new(move |editor: &mut Editor| {
        let tx = toggle_mark(editor, name)?;
        editor
            .apply(tx)
            .map_err(|e| CommandError::new(format!("Failed to toggle {name}: {e}")))
    })
}
