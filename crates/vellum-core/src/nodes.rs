use crate::extension::{
    ChildConstraint, Extension, NodeRole, NodeSpec, SchemaContribution,
};

pub struct Paragraph;

impl Extension for Paragraph {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Node(NodeSpec {
            role: NodeRole::Block,
            is_void: false,
            children: ChildConstraint::InlineOnly,
            widget: false,
        })
    }
}

pub struct ListItem;

impl Extension for ListItem {
    fn name(&self) -> &'static str {
        "list_item"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Node(NodeSpec {
            role: NodeRole::Block,
            is_void: false,
            children: ChildConstraint::InlineOnly,
            widget: false,
        })
    }
}

/// Widget-backed image block. The visual representation is an externally
/// mounted component; alignment lives in the `layout_class` attribute.
pub struct Image;

impl Extension for Image {
    fn name(&self) -> &'static str {
        "image"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Node(NodeSpec {
            role: NodeRole::Block,
            is_void: true,
            children: ChildConstraint::None,
            widget: true,
        })
    }
}
