use regex::Regex;

use crate::core::{
    block_inline_text, clamp_to_char_boundary, element_is_text_block, node_at_path,
    point_for_global_offset, point_global_offset, Mark, MarkSet, Node, TextNode,
};
use crate::editor::Editor;
use crate::extension::CommandError;
use crate::ops::{Op, Transaction};

/// Autoformat rule: when the text before the caret matches `pattern`, the
/// whole match is replaced by its first capture group carrying `mark`.
/// Patterns are end-anchored by convention (`(?:\*\*)([^*]+)(?:\*\*)$`).
#[derive(Debug, Clone)]
pub struct InputRule {
    pub pattern: Regex,
    pub mark: String,
}

/// Builds the input rule for a mark. A malformed pattern is a configuration
/// error caught when the extension catalog is assembled.
pub fn mark_input_rule(pattern: &str, mark: &'static str) -> InputRule {
    InputRule {
        pattern: Regex::new(pattern).expect("input rule pattern must be valid"),
        mark: mark.to_string(),
    }
}

/// Runs the registry's input rules against the text before the caret in the
/// focused text block. The first matching rule rewrites the block in one
/// transaction; returns whether any rule fired.
pub fn apply_input_rules(editor: &mut Editor) -> Result<bool, CommandError> {
    let sel = editor.selection().clone();
    if !sel.is_collapsed() {
        return Ok(false);
    }

    let focus = sel.focus;
    let Some((child_ix, block_path)) = focus.path.split_last() else {
        return Ok(false);
    };
    let block_path = block_path.to_vec();

    let Some(Node::Element(el)) = node_at_path(editor.doc(), &block_path) else {
        return Ok(false);
    };
    if !element_is_text_block(el, editor.registry()) {
        return Ok(false);
    }

    let children = el.children.clone();
    let caret = point_global_offset(&children, *child_ix, focus.offset);
    let block_text = block_inline_text(&children);
    let caret = clamp_to_char_boundary(&block_text, caret);
    let before = &block_text[..caret];

    let rules: Vec<InputRule> = editor.registry().input_rules().to_vec();
    for rule in &rules {
        let Some(captures) = rule.pattern.captures(before) else {
            continue;
        };
        let whole = captures.get(0).expect("match has a whole-match group");
        if whole.end() != before.len() {
            continue;
        }
        let Some(inner) = captures.get(1) else {
            continue;
        };

        let base_marks = marks_at_global_offset(&children, whole.start());
        let replacement = TextNode {
            text: inner.as_str().to_string(),
            marks: base_marks.with(Mark::new(rule.mark.clone())),
        };

        let mut new_children = remove_text_span(&children, whole.start(), whole.end());
        insert_text_at(&mut new_children, whole.start(), replacement);

        let mut ops: Vec<Op> = Vec::new();
        for ix in (0..children.len()).rev() {
            let mut path = block_path.clone();
            path.push(ix);
            ops.push(Op::RemoveNode { path });
        }
        for (ix, node) in new_children.iter().cloned().enumerate() {
            let mut path = block_path.clone();
            path.push(ix);
            ops.push(Op::InsertNode { path, node });
        }

        let caret_after = point_for_global_offset(
            &block_path,
            &new_children,
            whole.start() + inner.as_str().len(),
        );
        let tx = Transaction::new(ops)
            .selection_after(crate::core::Selection::collapsed(caret_after))
            .source(format!("input_rule:{}", rule.mark));

        editor
            .apply(tx)
            .map_err(|e| CommandError::new(format!("Failed to apply input rule: {e}")))?;
        return Ok(true);
    }

    Ok(false)
}

fn marks_at_global_offset(children: &[Node], offset: usize) -> MarkSet {
    let mut cursor = 0usize;
    for node in children {
        match node {
            Node::Text(t) => {
                let end = cursor + t.text.len();
                if offset < end || (offset == end && t.text.is_empty()) {
                    return t.marks.clone();
                }
                cursor = end;
            }
            Node::Void(v) => cursor += v.inline_text_len(),
            Node::Element(_) => {}
        }
    }
    children
        .iter()
        .rev()
        .find_map(|n| match n {
            Node::Text(t) => Some(t.marks.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn remove_text_span(children: &[Node], start_global: usize, end_global: usize) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::new();
    let mut cursor = 0usize;

    for node in children {
        match node {
            Node::Text(t) => {
                let node_start = cursor;
                let node_end = cursor + t.text.len();
                cursor = node_end;

                if end_global <= node_start || start_global >= node_end {
                    out.push(node.clone());
                    continue;
                }

                let cut_start =
                    clamp_to_char_boundary(&t.text, start_global.saturating_sub(node_start));
                let cut_end = clamp_to_char_boundary(
                    &t.text,
                    end_global.saturating_sub(node_start).min(t.text.len()),
                );

                // Prefix and suffix stay separate leaves so the replacement
                // can be inserted between them; normalization merges any
                // equal-marks neighbors afterwards.
                let prefix = t.text.get(..cut_start).unwrap_or("");
                let suffix = t.text.get(cut_end..).unwrap_or("");
                if !prefix.is_empty() {
                    out.push(Node::Text(TextNode {
                        text: prefix.to_string(),
                        marks: t.marks.clone(),
                    }));
                }
                if !suffix.is_empty() {
                    out.push(Node::Text(TextNode {
                        text: suffix.to_string(),
                        marks: t.marks.clone(),
                    }));
                }
            }
            Node::Void(v) => {
                cursor += v.inline_text_len();
                out.push(node.clone());
            }
            Node::Element(_) => out.push(node.clone()),
        }
    }

    out
}

fn insert_text_at(children: &mut Vec<Node>, global_offset: usize, node: TextNode) {
    let mut cursor = 0usize;
    for ix in 0..children.len() {
        let len = match &children[ix] {
            Node::Text(t) => t.text.len(),
            Node::Void(v) => v.inline_text_len(),
            Node::Element(_) => 0,
        };
        if global_offset <= cursor {
            children.insert(ix, Node::Text(node));
            return;
        }
        cursor += len;
        if global_offset <= cursor {
            children.insert(ix + 1, Node::Text(node));
            return;
        }
    }
    children.push(Node::Text(node));
}
