use serde_json::Value;

use crate::core::Attrs;
use crate::dictionary::Dictionary;
use crate::editor::Editor;
use crate::query::{is_in_list, is_mark_active, is_node_active};

/// Icon identity only; rendering is the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconName {
    Bold,
    Italic,
    Strikethrough,
    Code,
    Highlight,
    Link,
    Pencil,
    AlignLeft,
    AlignCenter,
    AlignRight,
    Trash,
    Document,
    Plus,
    Close,
    FolderOpen,
}

/// One declarative menu entry. Predicates are evaluated when the list is
/// built, so two builds against identical state compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub name: &'static str,
    pub tooltip: Option<&'static str>,
    pub icon: Option<IconName>,
    pub attrs: Option<Attrs>,
    pub visible: bool,
    pub active: bool,
}

impl MenuItem {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tooltip: None,
            icon: None,
            attrs: None,
            visible: true,
            active: false,
        }
    }

    pub fn separator() -> Self {
        Self::new("separator")
    }

    pub fn tooltip(mut self, tooltip: &'static str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    pub fn icon(mut self, icon: IconName) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

pub fn formatting_menu_items(
    editor: &Editor,
    is_template: bool,
    dictionary: &Dictionary,
) -> Vec<MenuItem> {
    let is_list = is_in_list(editor);
    let allow_blocks = !is_list;

    let mut link_attrs = Attrs::default();
    link_attrs.insert("href".to_string(), Value::String(String::new()));

    vec![
        MenuItem::new("placeholder")
            .tooltip(dictionary.placeholder)
            .icon(IconName::Pencil)
            .active(is_mark_active(editor, "placeholder"))
            .visible(is_template),
        MenuItem::separator().visible(is_template),
        MenuItem::new("strong")
            .tooltip(dictionary.strong)
            .icon(IconName::Bold)
            .active(is_mark_active(editor, "strong")),
        MenuItem::new("em")
            .tooltip(dictionary.em)
            .icon(IconName::Italic)
            .active(is_mark_active(editor, "em")),
        MenuItem::new("strikethrough")
            .tooltip(dictionary.strikethrough)
            .icon(IconName::Strikethrough)
            .active(is_mark_active(editor, "strikethrough")),
        MenuItem::new("mark")
            .tooltip(dictionary.mark)
            .icon(IconName::Highlight)
            .active(is_mark_active(editor, "mark"))
            .visible(!is_template),
        MenuItem::new("code_inline")
            .tooltip(dictionary.code_inline)
            .icon(IconName::Code)
            .active(is_mark_active(editor, "code_inline")),
        MenuItem::separator().visible(allow_blocks),
        MenuItem::separator(),
        MenuItem::new("link")
            .tooltip(dictionary.create_link)
            .icon(IconName::Link)
            .active(is_mark_active(editor, "link"))
            .attrs(link_attrs),
    ]
}

pub fn image_menu_items(editor: &Editor, dictionary: &Dictionary) -> Vec<MenuItem> {
    let mut left_attrs = Attrs::default();
    left_attrs.insert(
        "layout_class".to_string(),
        Value::String("left-50".to_string()),
    );
    let mut right_attrs = Attrs::default();
    right_attrs.insert(
        "layout_class".to_string(),
        Value::String("right-50".to_string()),
    );

    let is_left_aligned = is_node_active(editor, "image", &left_attrs);
    let is_right_aligned = is_node_active(editor, "image", &right_attrs);
    let is_centered = is_node_active(editor, "image", &Attrs::default())
        && !is_left_aligned
        && !is_right_aligned;

    vec![
        MenuItem::new("alignLeft")
            .tooltip(dictionary.align_left)
            .icon(IconName::AlignLeft)
            .active(is_left_aligned),
        MenuItem::new("alignCenter")
            .tooltip(dictionary.align_center)
            .icon(IconName::AlignCenter)
            .active(is_centered),
        MenuItem::new("alignRight")
            .tooltip(dictionary.align_right)
            .icon(IconName::AlignRight)
            .active(is_right_aligned),
        MenuItem::separator(),
        MenuItem::new("deleteImage")
            .tooltip(dictionary.delete_image)
            .icon(IconName::Trash),
    ]
}
