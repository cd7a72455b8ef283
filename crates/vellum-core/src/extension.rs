use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::Editor;
use crate::input_rules::InputRule;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate extension name: {name}")]
    DuplicateName { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    Block,
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildConstraint {
    None,
    BlockOnly,
    InlineOnly,
    Any,
}

/// External (DOM-shaped) source a mark or node is parsed from: a tag name,
/// or a style property with a required value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRule {
    pub tag: Option<String>,
    pub style: Option<(String, String)>,
}

impl ParseRule {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            style: None,
        }
    }

    pub fn style(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: None,
            style: Some((property.into(), value.into())),
        }
    }
}

/// External representation a mark renders to: a tag, plus the mark attrs
/// copied onto it by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRule {
    pub tag: String,
    pub attrs: Vec<String>,
}

impl RenderRule {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs = attrs.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkSpec {
    pub parse: Vec<ParseRule>,
    pub render: RenderRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
    pub role: NodeRole,
    pub is_void: bool,
    pub children: ChildConstraint,
    /// Widget-backed nodes render through an externally mounted component
    /// rather than plain markup.
    pub widget: bool,
}

/// A markdown delimiter: literal text, or a form closed over the mark's
/// `href` attribute (`[title](href)` links).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownDelim {
    Text(&'static str),
    Href {
        before: &'static str,
        after: &'static str,
    },
}

/// Serialization contract for one mark: delimiters, whether the mark can be
/// reordered against adjacent marks, and whether enclosing whitespace is
/// expelled outside the delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkMarkdown {
    pub open: MarkdownDelim,
    pub close: MarkdownDelim,
    pub mixable: bool,
    pub expel_enclosing_whitespace: bool,
}

/// Inverse mapping from the serialized form back to a mark name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownRule {
    pub mark: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaContribution {
    Mark(MarkSpec),
    Node(NodeSpec),
}

pub type Command = Arc<dyn Fn(&mut Editor) -> Result<(), CommandError> + Send + Sync>;

#[derive(Clone)]
pub struct KeyBinding {
    pub combo: &'static str,
    pub command: Command,
}

impl KeyBinding {
    pub fn new(combo: &'static str, command: Command) -> Self {
        Self { combo, command }
    }
}

/// Key combos assembled from every extension. On a combo collision the
/// later-registered extension wins.
#[derive(Clone, Default)]
pub struct Keymap {
    bindings: HashMap<String, Command>,
}

impl Keymap {
    fn insert(&mut self, binding: KeyBinding) {
        self.bindings
            .insert(binding.combo.to_string(), binding.command);
    }

    pub fn get(&self, combo: &str) -> Option<Command> {
        self.bindings.get(combo).cloned()
    }

    pub fn contains(&self, combo: &str) -> bool {
        self.bindings.contains_key(combo)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// One named contribution to the shared schema. Extensions are stateless
/// declarations; per-instance state belongs to the widget or the editor
/// session, never here.
pub trait Extension: Send + Sync {
    fn name(&self) -> &'static str;

    fn schema(&self) -> SchemaContribution;

    fn keys(&self) -> Vec<KeyBinding> {
        Vec::new()
    }

    fn input_rules(&self) -> Vec<InputRule> {
        Vec::new()
    }

    fn markdown(&self) -> Option<MarkMarkdown> {
        None
    }

    fn parse_markdown(&self) -> Option<MarkdownRule> {
        None
    }
}

#[derive(Default)]
pub struct ExtensionRegistry {
    mark_order: Vec<String>,
    marks: HashMap<String, MarkSpec>,
    nodes: HashMap<String, NodeSpec>,
    markdown: HashMap<String, MarkMarkdown>,
    markdown_rules: HashMap<String, MarkdownRule>,
    keymap: Keymap,
    input_rules: Vec<InputRule>,
}

impl ExtensionRegistry {
    pub fn new(extensions: Vec<Box<dyn Extension>>) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for extension in extensions {
            registry.register(extension.as_ref())?;
        }
        Ok(registry)
    }

    /// The full shipped catalog: the formatting marks, link, and the block
    /// nodes the menu builders know about.
    pub fn standard() -> Self {
        let extensions: Vec<Box<dyn Extension>> = vec![
            Box::new(crate::marks::Link),
            Box::new(crate::marks::Bold),
            Box::new(crate::marks::Italic),
            Box::new(crate::marks::Strikethrough),
            Box::new(crate::marks::Highlight),
            Box::new(crate::marks::Placeholder),
            Box::new(crate::marks::CodeInline),
            Box::new(crate::nodes::Paragraph),
            Box::new(crate::nodes::ListItem),
            Box::new(crate::nodes::Image),
        ];
        Self::new(extensions).expect("standard registry must be valid")
    }

    fn register(&mut self, extension: &dyn Extension) -> Result<(), RegistryError> {
        let name = extension.name();
        if self.marks.contains_key(name) || self.nodes.contains_key(name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_string(),
            });
        }

        match extension.schema() {
            SchemaContribution::Mark(spec) => {
                self.mark_order.push(name.to_string());
                self.marks.insert(name.to_string(), spec);
            }
            SchemaContribution::Node(spec) => {
                self.nodes.insert(name.to_string(), spec);
            }
        }

        if let Some(markdown) = extension.markdown() {
            self.markdown.insert(name.to_string(), markdown);
        }

        if let Some(rule) = extension.parse_markdown() {
            self.markdown_rules.insert(name.to_string(), rule);
        }

        for binding in extension.keys() {
            self.keymap.insert(binding);
        }

        self.input_rules.extend(extension.input_rules());

        Ok(())
    }

    pub fn mark_spec(&self, name: &str) -> Option<&MarkSpec> {
        self.marks.get(name)
    }

    pub fn node_spec(&self, kind: &str) -> Option<&NodeSpec> {
        self.nodes.get(kind)
    }

    pub fn is_known_kind(&self, kind: &str) -> bool {
        self.nodes.contains_key(kind)
    }

    pub fn child_constraint(&self, kind: &str) -> ChildConstraint {
        self.nodes
            .get(kind)
            .map(|s| s.children)
            .unwrap_or(ChildConstraint::Any)
    }

    /// Registration order of `name` among marks; marks registered earlier
    /// serialize as the outer delimiters.
    pub fn mark_order(&self, name: &str) -> usize {
        self.mark_order
            .iter()
            .position(|n| n == name)
            .unwrap_or(usize::MAX)
    }

    pub fn mark_names(&self) -> impl Iterator<Item = &str> {
        self.mark_order.iter().map(String::as_str)
    }

    pub fn markdown_for(&self, name: &str) -> Option<&MarkMarkdown> {
        self.markdown.get(name)
    }

    /// The mark name an extension's serialized form parses back into.
    pub fn markdown_rule(&self, name: &str) -> Option<&MarkdownRule> {
        self.markdown_rules.get(name)
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn input_rules(&self) -> &[InputRule] {
        &self.input_rules
    }
}
