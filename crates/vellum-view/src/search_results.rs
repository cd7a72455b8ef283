use serde::{Deserialize, Serialize};
use vellum_core::IconName;

/// One candidate offered while editing a link-like mark, as produced by the
/// host's search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSearchResult {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub url: String,
}

/// Presentation record for one candidate row. Stateless; built fresh on
/// every render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub icon: IconName,
    pub title: String,
    pub subtitle: Option<String>,
    pub selected: bool,
    pub compact: bool,
}

impl ResultItem {
    pub fn from_result(result: &LinkSearchResult, selected: bool) -> Self {
        Self {
            icon: IconName::Document,
            title: result.title.clone(),
            subtitle: result.subtitle.clone(),
            selected,
            compact: result.subtitle.is_none(),
        }
    }
}

/// Scroll offset that reveals a newly selected row inside its own results
/// container, or `None` when the row is already fully visible. The row is
/// centered in the container and the offset clamped to the container's
/// scrollable range, so outer scroll positions are never disturbed.
pub fn reveal_offset(
    item_top: f32,
    item_height: f32,
    viewport_height: f32,
    content_height: f32,
    scroll_offset: f32,
) -> Option<f32> {
    if viewport_height <= 0.0 {
        return None;
    }

    let item_bottom = item_top + item_height;
    let visible_top = scroll_offset;
    let visible_bottom = scroll_offset + viewport_height;

    if item_top >= visible_top && item_bottom <= visible_bottom {
        return None;
    }

    let max_scroll = (content_height - viewport_height).max(0.0);
    let centered = item_top + item_height / 2.0 - viewport_height / 2.0;
    Some(centered.clamp(0.0, max_scroll))
}
