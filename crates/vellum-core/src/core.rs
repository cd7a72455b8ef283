use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extension::{ChildConstraint, ExtensionRegistry};
use crate::ops::Path;

pub type Attrs = BTreeMap<String, serde_json::Value>;
pub type ElementKind = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Document {
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Void(VoidNode),
}

impl Node {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Element(ElementNode {
            kind: "paragraph".to_string(),
            attrs: Attrs::default(),
            children: vec![Node::Text(TextNode {
                text: text.into(),
                marks: MarkSet::default(),
            })],
        })
    }

    pub fn image(src: impl Into<String>) -> Self {
        let mut attrs = Attrs::default();
        attrs.insert("src".to_string(), Value::String(src.into()));
        Node::Void(VoidNode {
            kind: "image".to_string(),
            attrs,
        })
    }

    pub fn kind(&self) -> &str {
        match self {
            Node::Element(el) => &el.kind,
            Node::Void(v) => &v.kind,
            Node::Text(_) => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub kind: ElementKind,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidNode {
    pub kind: ElementKind,
    #[serde(default)]
    pub attrs: Attrs,
}

impl VoidNode {
    /// Width of the node in the flat text coordinate space.
    pub fn inline_text_len(&self) -> usize {
        1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    #[serde(default)]
    pub marks: MarkSet,
}

/// One inline annotation applied to a text range. A mark is immutable once
/// applied; changing an attribute is a remove followed by an add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub name: String,
    #[serde(default)]
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attrs::default(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(|v| v.as_str())
    }
}

/// The set of marks on one text leaf, ordered by name. At most one mark per
/// name; adding a mark with an existing name replaces it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Mark>", into = "Vec<Mark>")]
pub struct MarkSet {
    marks: Vec<Mark>,
}

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mark: Mark) {
        match self.marks.binary_search_by(|m| m.name.cmp(&mark.name)) {
            Ok(ix) => self.marks[ix] = mark,
            Err(ix) => self.marks.insert(ix, mark),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Mark> {
        match self.marks.binary_search_by(|m| m.name.as_str().cmp(name)) {
            Ok(ix) => Some(self.marks.remove(ix)),
            Err(_) => None,
        }
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.add(mark);
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.remove(name);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Mark> {
        self.marks
            .binary_search_by(|m| m.name.as_str().cmp(name))
            .ok()
            .map(|ix| &self.marks[ix])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

impl From<Vec<Mark>> for MarkSet {
    fn from(marks: Vec<Mark>) -> Self {
        let mut set = MarkSet::new();
        for mark in marks {
            set.add(mark);
        }
        set
    }
}

impl From<MarkSet> for Vec<Mark> {
    fn from(set: MarkSet) -> Self {
        set.marks
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut set = MarkSet::new();
        for mark in iter {
            set.add(mark);
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Attribute patch with enough information to invert itself: keys in `set`
/// are written, keys in `remove` are deleted, and applying a patch yields
/// the patch that restores the previous attrs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrPatch {
    #[serde(default)]
    pub set: Attrs,
    #[serde(default)]
    pub remove: Vec<String>,
}

pub fn node_at_path<'a>(doc: &'a Document, path: &[usize]) -> Option<&'a Node> {
    if path.is_empty() {
        return None;
    }

    let mut node = doc.children.get(path[0])?;
    for &ix in path.iter().skip(1) {
        node = match node {
            Node::Element(el) => el.children.get(ix)?,
            Node::Void(_) | Node::Text(_) => return None,
        };
    }
    Some(node)
}

pub(crate) fn clamp_to_char_boundary(s: &str, mut ix: usize) -> usize {
    ix = ix.min(s.len());
    while ix > 0 && !s.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}

pub(crate) struct TextBlock<'a> {
    pub path: Path,
    pub el: &'a ElementNode,
}

pub(crate) fn element_is_text_block(el: &ElementNode, registry: &ExtensionRegistry) -> bool {
    match registry.node_spec(&el.kind).map(|s| s.children) {
        Some(ChildConstraint::InlineOnly) => true,
        Some(_) => false,
        None => el
            .children
            .iter()
            .any(|n| matches!(n, Node::Text(_) | Node::Void(_))),
    }
}

pub(crate) fn text_blocks_in_order<'a>(
    doc: &'a Document,
    registry: &ExtensionRegistry,
) -> Vec<TextBlock<'a>> {
    fn walk<'a>(
        nodes: &'a [Node],
        path: &mut Vec<usize>,
        registry: &ExtensionRegistry,
        out: &mut Vec<TextBlock<'a>>,
    ) {
        for (ix, node) in nodes.iter().enumerate() {
            let Node::Element(el) = node else {
                continue;
            };

            path.push(ix);

            if element_is_text_block(el, registry) {
                out.push(TextBlock {
                    path: path.clone(),
                    el,
                });
            } else {
                walk(&el.children, path, registry, out);
            }

            path.pop();
        }
    }

    let mut out = Vec::new();
    walk(&doc.children, &mut Vec::new(), registry, &mut out);
    out
}

pub(crate) fn total_inline_text_len(children: &[Node]) -> usize {
    children
        .iter()
        .map(|n| match n {
            Node::Text(t) => t.text.len(),
            Node::Void(v) => v.inline_text_len(),
            Node::Element(_) => 0,
        })
        .sum()
}

pub(crate) fn block_inline_text(children: &[Node]) -> String {
    let mut out = String::new();
    for node in children {
        match node {
            Node::Text(t) => out.push_str(&t.text),
            Node::Void(v) => {
                for _ in 0..v.inline_text_len() {
                    out.push(' ');
                }
            }
            Node::Element(_) => {}
        }
    }
    out
}

pub(crate) fn point_global_offset(children: &[Node], child_ix: usize, offset: usize) -> usize {
    let mut global = 0usize;
    for (ix, node) in children.iter().enumerate() {
        match node {
            Node::Text(t) => {
                if ix < child_ix {
                    global += t.text.len();
                    continue;
                }
                if ix == child_ix {
                    global += clamp_to_char_boundary(&t.text, offset);
                }
                break;
            }
            Node::Void(v) => {
                if ix < child_ix {
                    global += v.inline_text_len();
                    continue;
                }
                if ix == child_ix {
                    global += offset.min(v.inline_text_len());
                }
                break;
            }
            Node::Element(_) => {}
        }
    }
    global
}

pub(crate) fn point_for_global_offset(
    block_path: &[usize],
    children: &[Node],
    global_offset: usize,
) -> Point {
    let mut remaining = global_offset;
    for (child_ix, node) in children.iter().enumerate() {
        match node {
            Node::Text(t) => {
                if remaining < t.text.len() {
                    let mut path = block_path.to_vec();
                    path.push(child_ix);
                    return Point::new(path, clamp_to_char_boundary(&t.text, remaining));
                }
                if remaining == t.text.len() {
                    if matches!(children.get(child_ix + 1), Some(Node::Text(_))) {
                        let mut path = block_path.to_vec();
                        path.push(child_ix + 1);
                        return Point::new(path, 0);
                    }
                    let mut path = block_path.to_vec();
                    path.push(child_ix);
                    return Point::new(path, t.text.len());
                }
                remaining = remaining.saturating_sub(t.text.len());
            }
            Node::Void(v) => {
                let len = v.inline_text_len();
                if remaining <= len {
                    let before = remaining;
                    let after = len - remaining;

                    if remaining == 0 || before <= after {
                        for (ix, prev) in children.iter().enumerate().take(child_ix).rev() {
                            if let Node::Text(t) = prev {
                                let mut path = block_path.to_vec();
                                path.push(ix);
                                return Point::new(path, t.text.len());
                            }
                        }
                    }

                    for (ix, next) in children.iter().enumerate().skip(child_ix + 1) {
                        if matches!(next, Node::Text(_)) {
                            let mut path = block_path.to_vec();
                            path.push(ix);
                            return Point::new(path, 0);
                        }
                    }
                    break;
                }
                remaining = remaining.saturating_sub(len);
            }
            Node::Element(_) => {}
        }
    }

    // Fallback to end of last text node.
    for (child_ix, node) in children.iter().enumerate().rev() {
        if let Node::Text(t) = node {
            let mut path = block_path.to_vec();
            path.push(child_ix);
            return Point::new(path, t.text.len());
        }
    }

    let mut path = block_path.to_vec();
    path.push(0);
    Point::new(path, 0)
}

pub(crate) fn is_point_in_block(point: &Point, block_path: &[usize]) -> bool {
    point.path.len() == block_path.len() + 1 && point.path.starts_with(block_path)
}

/// Full plain text of the document's text blocks, joined by a single
/// newline per block boundary. Byte offsets into this string are the flat
/// coordinate space used by mark ranges and interactive sessions.
pub fn doc_text(doc: &Document, registry: &ExtensionRegistry) -> String {
    let mut out = String::new();
    for (ix, block) in text_blocks_in_order(doc, registry).iter().enumerate() {
        if ix > 0 {
            out.push('\n');
        }
        out.push_str(&block_inline_text(&block.el.children));
    }
    out
}

pub fn doc_text_len(doc: &Document, registry: &ExtensionRegistry) -> usize {
    let blocks = text_blocks_in_order(doc, registry);
    let mut len = 0usize;
    for (ix, block) in blocks.iter().enumerate() {
        if ix > 0 {
            len += 1;
        }
        len += total_inline_text_len(&block.el.children);
    }
    len
}

pub fn offset_to_point(
    doc: &Document,
    registry: &ExtensionRegistry,
    offset: usize,
) -> Option<Point> {
    let blocks = text_blocks_in_order(doc, registry);
    let mut cursor = 0usize;
    for block in &blocks {
        let len = total_inline_text_len(&block.el.children);
        if offset <= cursor + len {
            return Some(point_for_global_offset(
                &block.path,
                &block.el.children,
                offset - cursor,
            ));
        }
        cursor += len + 1;
    }
    None
}

pub fn point_to_offset(
    doc: &Document,
    registry: &ExtensionRegistry,
    point: &Point,
) -> Option<usize> {
    let (child_ix, block_path) = point.path.split_last()?;
    let blocks = text_blocks_in_order(doc, registry);

    let mut cursor = 0usize;
    for (ix, block) in blocks.iter().enumerate() {
        if ix > 0 {
            cursor += 1;
        }
        if block.path == block_path {
            return Some(
                cursor + point_global_offset(&block.el.children, *child_ix, point.offset),
            );
        }
        cursor += total_inline_text_len(&block.el.children);
    }
    None
}

pub fn text_between(
    doc: &Document,
    registry: &ExtensionRegistry,
    from: usize,
    to: usize,
) -> String {
    let text = doc_text(doc, registry);
    let from = clamp_to_char_boundary(&text, from);
    let to = clamp_to_char_boundary(&text, to.max(from));
    text[from..to].to_string()
}
