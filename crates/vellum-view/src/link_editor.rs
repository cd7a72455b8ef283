use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;
use vellum_core::{Dictionary, IconName, Mark};

use crate::search_results::{LinkSearchResult, ResultItem};
use crate::view::{EditorView, MarkChange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Info,
}

/// A committed link: what the host dispatches as one add-mark transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSelection {
    pub href: String,
    pub title: Option<String>,
    pub from: usize,
    pub to: usize,
}

/// Collaborators behind the link editor. Search and creation are optional
/// capabilities; the rest default to no-ops so hosts implement only what
/// they support.
pub trait LinkHost {
    fn has_search(&self) -> bool {
        false
    }

    /// Fire-and-forget: the host runs its search and later delivers the
    /// outcome through [`LinkEditor::search_succeeded`] or
    /// [`LinkEditor::search_failed`], keyed by the term given here.
    fn on_search_link(&mut self, _term: &str) {}

    fn has_create(&self) -> bool {
        false
    }

    fn on_create_link(&mut self, _title: &str) {}

    fn on_select_link(&mut self, selection: LinkSelection);

    fn on_remove_link(&mut self) {}

    fn on_click_link(&mut self, _href: &str) {}

    fn on_show_toast(&mut self, _message: &str, _kind: ToastKind) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEditorKey {
    Enter,
    Escape,
    ArrowUp { shift: bool },
    ArrowDown { shift: bool },
    Tab { shift: bool },
}

/// Full render state of the open overlay: input, the two toolbar buttons,
/// and the candidate list. Pure function of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkOverlay {
    pub value: String,
    pub placeholder: &'static str,
    pub autofocus: bool,
    pub open_icon: IconName,
    pub open_disabled: bool,
    pub remove_icon: IconName,
    pub results: Vec<ResultItem>,
    pub create: Option<ResultItem>,
}

/// Transient editing session for one link mark over `[from, to)`. Created
/// when the overlay opens, destroyed when it closes; exactly one of
/// commit, discard, or no-op finalizes it, whichever path fires first.
pub struct LinkEditor {
    from: usize,
    to: usize,
    mark: Option<Mark>,
    initial_value: String,
    initial_selection_length: usize,
    value: String,
    previous_value: String,
    results: HashMap<String, Vec<LinkSearchResult>>,
    selected_index: isize,
    discard_input_value: bool,
}

impl LinkEditor {
    pub fn open(from: usize, to: usize, mark: Option<Mark>) -> Self {
        let initial_value = mark
            .as_ref()
            .and_then(|m| m.attr_str("href"))
            .unwrap_or_default()
            .to_string();

        Self {
            from,
            to,
            mark,
            value: initial_value.clone(),
            initial_value,
            initial_selection_length: to.saturating_sub(from),
            previous_value: String::new(),
            results: HashMap::new(),
            selected_index: -1,
            discard_input_value: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Always within `[-1, candidate_count]`; equals the result count only
    /// while the create affordance is offered.
    pub fn selected_index(&self) -> isize {
        self.selected_index
    }

    pub fn has_finalized(&self) -> bool {
        self.discard_input_value
    }

    fn href(&self) -> &str {
        self.mark
            .as_ref()
            .and_then(|m| m.attr_str("href"))
            .unwrap_or("")
    }

    /// The typed value changed: reset the highlighted candidate and kick
    /// off a search for the trimmed term if the host supports one.
    pub fn input_changed(&mut self, value: &str, host: &mut dyn LinkHost) {
        self.value = value.to_string();
        self.selected_index = -1;

        let trimmed = value.trim();
        if !trimmed.is_empty() && host.has_search() {
            host.on_search_link(trimmed);
        }
    }

    /// Stores results under the exact query that produced them. A stale
    /// response lands under its own key and cannot clobber a newer one.
    pub fn search_succeeded(&mut self, query: &str, results: Vec<LinkSearchResult>) {
        self.results.insert(query.to_string(), results);
        self.previous_value = query.to_string();
    }

    /// A rejected search never reaches the commit path; prior candidates
    /// stay as they were.
    pub fn search_failed(&self, query: &str, error: &str) {
        warn!(query, error, "link search failed");
    }

    fn visible_results(&self) -> &[LinkSearchResult] {
        if let Some(results) = self.results.get(self.value.trim()) {
            return results;
        }
        if let Some(results) = self.results.get(&self.previous_value) {
            return results;
        }
        &[]
    }

    /// Title used when creating a new document from the overlay: the typed
    /// value, or the text under the original selection.
    pub fn suggested_link_title(&self, view: &EditorView) -> String {
        let typed = self.value.trim();
        if !typed.is_empty() {
            return typed.to_string();
        }
        view.selection_text().trim().to_string()
    }

    fn show_create(&self, view: &EditorView, host: &dyn LinkHost) -> bool {
        if !host.has_create() {
            return false;
        }
        let suggested = self.suggested_link_title(view);
        if suggested.is_empty() || suggested == self.initial_value {
            return false;
        }
        !looks_like_absolute_url(&self.value)
    }

    pub fn key_down(
        &mut self,
        key: LinkEditorKey,
        view: &mut EditorView,
        host: &mut dyn LinkHost,
    ) -> bool {
        match key {
            LinkEditorKey::Enter => {
                let results = self.visible_results().to_vec();

                if self.selected_index >= 0 {
                    if let Some(result) = results.get(self.selected_index as usize) {
                        self.save(&result.url, Some(&result.title), host);
                    } else if host.has_create()
                        && self.selected_index == results.len() as isize
                    {
                        let title = self.suggested_link_title(view);
                        self.trigger_create(&title, host);
                    }
                } else {
                    // Saves the raw input as the href.
                    let value = self.value.clone();
                    self.save(&value, Some(&value), host);
                }

                if self.initial_selection_length > 0 {
                    self.move_selection_to_end(view);
                }
                true
            }

            LinkEditorKey::Escape => {
                if !self.initial_value.is_empty() {
                    self.value = self.initial_value.clone();
                    self.move_selection_to_end(view);
                } else {
                    self.remove_link(view, host);
                }
                true
            }

            LinkEditorKey::ArrowUp { shift: true } | LinkEditorKey::ArrowDown { shift: true } => {
                false
            }

            LinkEditorKey::ArrowUp { shift: false } | LinkEditorKey::Tab { shift: true } => {
                self.selected_index = (self.selected_index - 1).max(-1);
                true
            }

            LinkEditorKey::ArrowDown { shift: false } | LinkEditorKey::Tab { shift: false } => {
                let results_len = self.visible_results().len() as isize;
                let max = if self.show_create(view, host) {
                    results_len
                } else {
                    results_len - 1
                };
                self.selected_index = (self.selected_index + 1).min(max).max(-1);
                true
            }
        }
    }

    pub fn hover_result(&mut self, index: usize) {
        self.selected_index = index as isize;
    }

    pub fn click_result(&mut self, index: usize, view: &mut EditorView, host: &mut dyn LinkHost) {
        let Some(result) = self.visible_results().get(index).cloned() else {
            return;
        };
        self.save(&result.url, Some(&result.title), host);

        if self.initial_selection_length > 0 {
            self.move_selection_to_end(view);
        }
    }

    pub fn click_create(&mut self, view: &mut EditorView, host: &mut dyn LinkHost) {
        let title = self.suggested_link_title(view);
        self.trigger_create(&title, host);

        if self.initial_selection_length > 0 {
            self.move_selection_to_end(view);
        }
    }

    /// Opens the currently bound href through the host.
    pub fn open_link(&self, host: &mut dyn LinkHost) {
        host.on_click_link(self.href());
    }

    pub fn remove_link(&mut self, view: &mut EditorView, host: &mut dyn LinkHost) {
        self.discard_input_value = true;

        if self.mark.is_some() {
            if let Err(error) =
                view.apply_mark_change(self.from..self.to, MarkChange::Remove("link".to_string()))
            {
                warn!(%error, "failed to remove link mark");
            }
        }

        host.on_remove_link();
        view.focus();
    }

    /// The overlay is closing without an explicit action. An unchanged or
    /// already-finalized session is a no-op; an emptied value removes the
    /// mark; anything else commits the trimmed value as href and title.
    pub fn closed(&mut self, view: &mut EditorView, host: &mut dyn LinkHost) {
        if self.discard_input_value {
            return;
        }

        if self.value == self.initial_value {
            return;
        }

        let href = self.value.trim().to_string();
        if href.is_empty() {
            self.remove_link(view, host);
            return;
        }

        self.save(&href, Some(&href), host);
    }

    fn save(&mut self, href: &str, title: Option<&str>, host: &mut dyn LinkHost) {
        let href = href.trim();
        if href.is_empty() {
            return;
        }

        self.discard_input_value = true;

        // Anything that is neither an absolute URL nor a relative path gets
        // a protocol prefixed.
        let href = if !is_url(href) && !href.starts_with('/') {
            format!("https://{href}")
        } else {
            href.to_string()
        };

        host.on_select_link(LinkSelection {
            href,
            title: title.map(|t| t.to_string()),
            from: self.from,
            to: self.to,
        });
    }

    fn trigger_create(&mut self, title: &str, host: &mut dyn LinkHost) {
        self.discard_input_value = true;

        let title = title.trim();
        if title.is_empty() {
            return;
        }

        host.on_create_link(title);
    }

    fn move_selection_to_end(&self, view: &mut EditorView) {
        view.move_selection(self.to);
        view.focus();
    }

    /// Declarative render state for the open overlay.
    pub fn overlay(
        &self,
        view: &EditorView,
        host: &dyn LinkHost,
        dictionary: &Dictionary,
    ) -> LinkOverlay {
        let show_create = self.show_create(view, host);
        let suggested = self.suggested_link_title(view);
        let show_results = !suggested.is_empty()
            && (show_create || !self.visible_results().is_empty());

        let results: Vec<ResultItem> = if show_results {
            self.visible_results()
                .iter()
                .enumerate()
                .map(|(ix, result)| {
                    ResultItem::from_result(result, ix as isize == self.selected_index)
                })
                .collect()
        } else {
            Vec::new()
        };

        let create = (show_results && show_create).then(|| ResultItem {
            icon: IconName::Plus,
            title: suggested,
            subtitle: Some(dictionary.create_new_doc.to_string()),
            selected: self.visible_results().len() as isize == self.selected_index,
            compact: false,
        });

        LinkOverlay {
            value: self.value.clone(),
            placeholder: if show_create {
                dictionary.find_or_create_doc
            } else {
                dictionary.search_or_paste_link
            },
            autofocus: self.href().is_empty(),
            open_icon: IconName::FolderOpen,
            open_disabled: self.value.is_empty(),
            remove_icon: if self.initial_value.is_empty() {
                IconName::Close
            } else {
                IconName::Trash
            },
            results,
            create,
        }
    }
}

/// Whether the value already carries an explicit scheme (`mailto:`,
/// `https://`, …) and needs no protocol prefixed.
pub fn is_url(value: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").expect("url pattern must be valid")
    })
    .is_match(value)
}

fn looks_like_absolute_url(value: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^https?://").expect("url pattern must be valid"))
        .is_match(value)
}
