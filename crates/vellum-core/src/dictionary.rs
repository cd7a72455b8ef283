/// User-facing labels consumed by the menu builders and the link editor.
/// Hosts substitute their own translations; lookup machinery is theirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    pub placeholder: &'static str,
    pub strong: &'static str,
    pub em: &'static str,
    pub strikethrough: &'static str,
    pub mark: &'static str,
    pub code_inline: &'static str,
    pub create_link: &'static str,
    pub open_link: &'static str,
    pub remove_link: &'static str,
    pub find_or_create_doc: &'static str,
    pub search_or_paste_link: &'static str,
    pub create_new_doc: &'static str,
    pub align_left: &'static str,
    pub align_center: &'static str,
    pub align_right: &'static str,
    pub delete_image: &'static str,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self {
            placeholder: "Placeholder",
            strong: "Bold",
            em: "Italic",
            strikethrough: "Strikethrough",
            mark: "Highlight",
            code_inline: "Code",
            create_link: "Create link",
            open_link: "Open link",
            remove_link: "Remove link",
            find_or_create_doc: "Find or create a doc…",
            search_or_paste_link: "Search or paste a link…",
            create_new_doc: "Create a new doc",
            align_left: "Align left",
            align_center: "Align center",
            align_right: "Align right",
            delete_image: "Delete image",
        }
    }
}
