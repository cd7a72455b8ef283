use crate::extension::{
    Extension, KeyBinding, MarkMarkdown, MarkSpec, MarkdownDelim, MarkdownRule, ParseRule,
    RenderRule, SchemaContribution,
};
use crate::input_rules::{mark_input_rule, InputRule};
use crate::transform::toggle_mark_command;

pub struct Bold;

impl Extension for Bold {
    fn name(&self) -> &'static str {
        "strong"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Mark(MarkSpec {
            parse: vec![
                ParseRule::tag("b"),
                ParseRule::tag("strong"),
                ParseRule::style("font-weight", "bold"),
            ],
            render: RenderRule::tag("strong"),
        })
    }

    fn keys(&self) -> Vec<KeyBinding> {
        vec![
            KeyBinding::new("Mod-b", toggle_mark_command("strong")),
            KeyBinding::new("Mod-B", toggle_mark_command("strong")),
        ]
    }

    fn input_rules(&self) -> Vec<InputRule> {
        vec![mark_input_rule(r"(?:\*\*)([^*]+)(?:\*\*)$", "strong")]
    }

    fn markdown(&self) -> Option<MarkMarkdown> {
        Some(MarkMarkdown {
            open: MarkdownDelim::Text("**"),
            close: MarkdownDelim::Text("**"),
            mixable: true,
            expel_enclosing_whitespace: true,
        })
    }

    fn parse_markdown(&self) -> Option<MarkdownRule> {
        Some(MarkdownRule { mark: "strong" })
    }
}

pub struct Italic;

impl Extension for Italic {
    fn name(&self) -> &'static str {
        "em"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Mark(MarkSpec {
            parse: vec![
                ParseRule::tag("i"),
                ParseRule::tag("em"),
                ParseRule::style("font-style", "italic"),
            ],
            render: RenderRule::tag("em"),
        })
    }

    fn keys(&self) -> Vec<KeyBinding> {
        vec![KeyBinding::new("Mod-i", toggle_mark_command("em"))]
    }

    fn markdown(&self) -> Option<MarkMarkdown> {
        Some(MarkMarkdown {
            open: MarkdownDelim::Text("*"),
            close: MarkdownDelim::Text("*"),
            mixable: true,
            expel_enclosing_whitespace: true,
        })
    }

    fn parse_markdown(&self) -> Option<MarkdownRule> {
        Some(MarkdownRule { mark: "em" })
    }
}

pub struct Strikethrough;

impl Extension for Strikethrough {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Mark(MarkSpec {
            parse: vec![
                ParseRule::tag("s"),
                ParseRule::tag("del"),
                ParseRule::tag("strike"),
            ],
            render: RenderRule::tag("del"),
        })
    }

    fn keys(&self) -> Vec<KeyBinding> {
        vec![KeyBinding::new("Mod-d", toggle_mark_command("strikethrough"))]
    }

    fn input_rules(&self) -> Vec<InputRule> {
        vec![mark_input_rule(r"(?:~~)([^~]+)(?:~~)$", "strikethrough")]
    }

    fn markdown(&self) -> Option<MarkMarkdown> {
        Some(MarkMarkdown {
            open: MarkdownDelim::Text("~~"),
            close: MarkdownDelim::Text("~~"),
            mixable: true,
            expel_enclosing_whitespace: true,
        })
    }

    fn parse_markdown(&self) -> Option<MarkdownRule> {
        Some(MarkdownRule { mark: "strikethrough" })
    }
}

/// Highlighted text, the `<mark>` element.
pub struct Highlight;

impl Extension for Highlight {
    fn name(&self) -> &'static str {
        "mark"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Mark(MarkSpec {
            parse: vec![ParseRule::tag("mark")],
            render: RenderRule::tag("mark"),
        })
    }

    fn markdown(&self) -> Option<MarkMarkdown> {
        Some(MarkMarkdown {
            open: MarkdownDelim::Text("=="),
            close: MarkdownDelim::Text("=="),
            mixable: true,
            expel_enclosing_whitespace: true,
        })
    }

    fn parse_markdown(&self) -> Option<MarkdownRule> {
        Some(MarkdownRule { mark: "mark" })
    }
}

/// Template placeholder text; only offered while editing a template.
pub struct Placeholder;

impl Extension for Placeholder {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Mark(MarkSpec {
            parse: vec![ParseRule::style("data-placeholder", "true")],
            render: RenderRule::tag("span"),
        })
    }
}

pub struct CodeInline;

impl Extension for CodeInline {
    fn name(&self) -> &'static str {
        "code_inline"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Mark(MarkSpec {
            parse: vec![ParseRule::tag("code")],
            render: RenderRule::tag("code"),
        })
    }

    fn keys(&self) -> Vec<KeyBinding> {
        vec![KeyBinding::new("Mod-e", toggle_mark_command("code_inline"))]
    }

    fn input_rules(&self) -> Vec<InputRule> {
        vec![mark_input_rule(r"(?:`)([^`]+)(?:`)$", "code_inline")]
    }

    fn markdown(&self) -> Option<MarkMarkdown> {
        Some(MarkMarkdown {
            open: MarkdownDelim::Text("`"),
            close: MarkdownDelim::Text("`"),
            mixable: false,
            expel_enclosing_whitespace: false,
        })
    }

    fn parse_markdown(&self) -> Option<MarkdownRule> {
        Some(MarkdownRule { mark: "code_inline" })
    }
}

/// Inline link carrying `href` and an optional `title` attribute.
pub struct Link;

impl Extension for Link {
    fn name(&self) -> &'static str {
        "link"
    }

    fn schema(&self) -> SchemaContribution {
        SchemaContribution::Mark(MarkSpec {
            parse: vec![ParseRule::tag("a")],
            render: RenderRule::tag("a").with_attrs(["href", "title"]),
        })
    }

    fn markdown(&self) -> Option<MarkMarkdown> {
        Some(MarkMarkdown {
            open: MarkdownDelim::Text("["),
            close: MarkdownDelim::Href {
                before: "](",
                after: ")",
            },
            mixable: true,
            expel_enclosing_whitespace: false,
        })
    }

    fn parse_markdown(&self) -> Option<MarkdownRule> {
        Some(MarkdownRule { mark: "link" })
    }
}
