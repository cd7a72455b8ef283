use serde_json::Value;

use crate::core::{Attrs, Document, ElementNode, Mark, MarkSet, Node, TextNode};
use crate::extension::{ExtensionRegistry, MarkMarkdown, MarkdownDelim};

/// Serializes the document to markdown using the delimiters each mark
/// extension declared. Blocks are joined by blank lines.
pub fn to_markdown(doc: &Document, registry: &ExtensionRegistry) -> String {
    let mut blocks: Vec<String> = Vec::new();
    serialize_blocks(&doc.children, registry, &mut blocks);
    blocks.join("\n\n")
}

fn serialize_blocks(children: &[Node], registry: &ExtensionRegistry, out: &mut Vec<String>) {
    for node in children {
        match node {
            Node::Element(el) => {
                let has_nested_elements =
                    el.children.iter().any(|n| matches!(n, Node::Element(_)));
                if has_nested_elements {
                    serialize_blocks(&el.children, registry, out);
                    continue;
                }
                let prefix = match el.kind.as_str() {
                    "list_item" => "- ",
                    _ => "",
                };
                out.push(format!(
                    "{prefix}{}",
                    serialize_inline(&el.children, registry)
                ));
            }
            Node::Void(v) if v.kind == "image" => {
                let src = v.attrs.get("src").and_then(|s| s.as_str()).unwrap_or("");
                out.push(format!("![]({src})"));
            }
            Node::Void(_) | Node::Text(_) => {}
        }
    }
}

fn inline_spans(children: &[Node]) -> Vec<(String, MarkSet)> {
    let mut spans: Vec<(String, MarkSet)> = Vec::new();
    for node in children {
        let Node::Text(t) = node else {
            continue;
        };
        if t.text.is_empty() {
            continue;
        }
        if let Some((text, marks)) = spans.last_mut() {
            if *marks == t.marks {
                text.push_str(&t.text);
                continue;
            }
        }
        spans.push((t.text.clone(), t.marks.clone()));
    }
    spans
}

fn has_expel(marks: &MarkSet, registry: &ExtensionRegistry) -> bool {
    marks.iter().any(|m| {
        registry
            .markdown_for(&m.name)
            .map(|md| md.expel_enclosing_whitespace)
            .unwrap_or(false)
    })
}

/// Splits a span's enclosing whitespace into its own spans carrying only
/// the marks that do not expel whitespace.
fn expel_whitespace(
    spans: Vec<(String, MarkSet)>,
    registry: &ExtensionRegistry,
) -> Vec<(String, MarkSet)> {
    let mut out: Vec<(String, MarkSet)> = Vec::new();
    for (text, marks) in spans {
        if !has_expel(&marks, registry) {
            out.push((text, marks));
            continue;
        }

        let trimmed_start = text.trim_start();
        let lead_len = text.len() - trimmed_start.len();
        let trimmed = trimmed_start.trim_end();
        let trail_len = trimmed_start.len() - trimmed.len();

        let outer_marks: MarkSet = marks
            .iter()
            .filter(|m| {
                !registry
                    .markdown_for(&m.name)
                    .map(|md| md.expel_enclosing_whitespace)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        if lead_len > 0 {
            out.push((text[..lead_len].to_string(), outer_marks.clone()));
        }
        if !trimmed.is_empty() {
            out.push((trimmed.to_string(), marks.clone()));
        }
        if trail_len > 0 {
            out.push((text[text.len() - trail_len..].to_string(), outer_marks));
        }
    }
    out
}

fn delim_order_key(mark: &Mark, registry: &ExtensionRegistry) -> (bool, usize) {
    let mixable = registry
        .markdown_for(&mark.name)
        .map(|md| md.mixable)
        .unwrap_or(true);
    // Non-mixable marks serialize innermost.
    (!mixable, registry.mark_order(&mark.name))
}

fn render_delim(delim: &MarkdownDelim, mark: &Mark) -> String {
    match delim {
        MarkdownDelim::Text(s) => (*s).to_string(),
        MarkdownDelim::Href { before, after } => {
            format!("{before}{}{after}", mark.attr_str("href").unwrap_or(""))
        }
    }
}

fn serialize_inline(children: &[Node], registry: &ExtensionRegistry) -> String {
    let spans = expel_whitespace(inline_spans(children), registry);

    let mut out = String::new();
    let mut active: Vec<Mark> = Vec::new();

    for (text, marks) in &spans {
        let mut desired: Vec<Mark> = marks.iter().cloned().collect();
        desired.sort_by_key(|m| delim_order_key(m, registry));

        let common = active
            .iter()
            .zip(desired.iter())
            .take_while(|(a, b)| a == b)
            .count();

        for mark in active.drain(common..).rev().collect::<Vec<_>>() {
            if let Some(md) = registry.markdown_for(&mark.name) {
                out.push_str(&render_delim(&md.close, &mark));
            }
        }
        for mark in desired.into_iter().skip(common) {
            if let Some(md) = registry.markdown_for(&mark.name) {
                out.push_str(&render_delim(&md.open, &mark));
            }
            active.push(mark);
        }

        out.push_str(text);
    }

    for mark in active.into_iter().rev() {
        if let Some(md) = registry.markdown_for(&mark.name) {
            out.push_str(&render_delim(&md.close, &mark));
        }
    }

    out
}

/// Parses markdown produced by [`to_markdown`] back into a document. This
/// is the inverse of the serialization contract, not a general markdown
/// grammar.
pub fn parse_markdown(input: &str, registry: &ExtensionRegistry) -> Document {
    let mut children: Vec<Node> = Vec::new();

    for block in input.split("\n\n") {
        if let Some(src) = block
            .strip_prefix("![](")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            children.push(Node::image(src));
            continue;
        }

        let (kind, rest) = match block.strip_prefix("- ") {
            Some(rest) => ("list_item", rest),
            None => ("paragraph", block),
        };

        children.push(Node::Element(ElementNode {
            kind: kind.to_string(),
            attrs: Attrs::default(),
            children: parse_inline(rest, registry),
        }));
    }

    Document { children }
}

struct Opener<'a> {
    /// Mark name the serialized form parses back into.
    mark: &'a str,
    md: &'a MarkMarkdown,
}

fn open_literal(md: &MarkMarkdown) -> Option<&'static str> {
    match &md.open {
        MarkdownDelim::Text(s) => Some(s),
        MarkdownDelim::Href { .. } => None,
    }
}

fn parse_inline(text: &str, registry: &ExtensionRegistry) -> Vec<Node> {
    let mut openers: Vec<Opener<'_>> = registry
        .mark_names()
        .filter_map(|name| {
            let md = registry.markdown_for(name)?;
            let mark = registry
                .markdown_rule(name)
                .map(|rule| rule.mark)
                .unwrap_or(name);
            Some(Opener { mark, md })
        })
        .filter(|o| open_literal(o.md).is_some())
        .collect();
    // Longest open delimiter first so `**` wins over `*`.
    openers.sort_by_key(|o| std::cmp::Reverse(open_literal(o.md).map(str::len).unwrap_or(0)));

    let mut out: Vec<Node> = Vec::new();
    let mut buf = String::new();
    // Open marks: name, close delimiter, index in `out` at open time.
    let mut stack: Vec<(String, MarkdownDelim, usize)> = Vec::new();

    fn flush(buf: &mut String, out: &mut Vec<Node>, stack: &[(String, MarkdownDelim, usize)]) {
        if buf.is_empty() {
            return;
        }
        let marks: MarkSet = stack
            .iter()
            .map(|(name, _, _)| Mark::new(name.as_str()))
            .collect();
        out.push(Node::Text(TextNode {
            text: std::mem::take(buf),
            marks,
        }));
    }

    fn patch_href(nodes: &mut [Node], name: &str, href: &str) {
        for node in nodes {
            let Node::Text(t) = node else { continue };
            if t.marks.contains(name) {
                t.marks.add(
                    Mark::new(name).with_attr("href", Value::String(href.to_string())),
                );
            }
        }
    }

    let mut i = 0usize;
    while i < text.len() {
        let rest = &text[i..];

        if let Some((name, close, open_ix)) = stack.last().cloned() {
            match &close {
                MarkdownDelim::Text(c) if rest.starts_with(c) => {
                    flush(&mut buf, &mut out, &stack);
                    stack.pop();
                    i += c.len();
                    continue;
                }
                MarkdownDelim::Href { before, after } if rest.starts_with(before) => {
                    if let Some(end) = rest[before.len()..].find(after) {
                        let href = rest[before.len()..before.len() + end].to_string();
                        flush(&mut buf, &mut out, &stack);
                        stack.pop();
                        patch_href(&mut out[open_ix..], &name, &href);
                        i += before.len() + end + after.len();
                        continue;
                    }
                }
                _ => {}
            }
        }

        let mut opened = false;
        for opener in &openers {
            let Some(open) = open_literal(opener.md) else {
                continue;
            };
            if !rest.starts_with(open) {
                continue;
            }
            if stack.iter().any(|(name, _, _)| name == opener.mark) {
                continue;
            }
            let after_open = &rest[open.len()..];
            // Left-flanking: an opener binding whitespace is a literal.
            if after_open.starts_with(|c: char| c.is_whitespace()) {
                continue;
            }
            let closeable = match &opener.md.close {
                MarkdownDelim::Text(c) => after_open.find(c).map(|ix| ix > 0).unwrap_or(false),
                MarkdownDelim::Href { before, after } => after_open
                    .find(before)
                    .map(|ix| ix > 0 && after_open[ix + before.len()..].contains(after))
                    .unwrap_or(false),
            };
            if !closeable {
                continue;
            }
            flush(&mut buf, &mut out, &stack);
            stack.push((opener.mark.to_string(), opener.md.close.clone(), out.len()));
            i += open.len();
            opened = true;
            break;
        }
        if opened {
            continue;
        }

        let ch = rest.chars().next().expect("non-empty remainder");
        buf.push(ch);
        i += ch.len_utf8();
    }

    flush(&mut buf, &mut out, &stack);

    if out.is_empty() {
        out.push(Node::Text(TextNode {
            text: String::new(),
            marks: MarkSet::default(),
        }));
    }

    out
}
