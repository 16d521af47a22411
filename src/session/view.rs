//! Pure rendering of the journal list.
//!
//! The list is rebuilt from a fresh copy of the collection every time; nothing
//! is patched incrementally.

use chrono::{DateTime, Local, Utc};

use crate::journal::JournalEntry;

/// Characters of content shown in a list preview.
pub const PREVIEW_CHARS: usize = 60;

/// One row of the entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub preview: String,
    pub selected: bool,
}

/// Sort newest-`updated_at` first and mark the open entry as selected.
pub fn render_list(mut entries: Vec<JournalEntry>, current_id: Option<&str>) -> Vec<ListItem> {
    entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    entries
        .into_iter()
        .map(|entry| ListItem {
            title: entry.display_title().to_string(),
            date: local_date(&entry.updated_at),
            preview: preview(&entry.content),
            selected: current_id == Some(entry.id.as_str()),
            id: entry.id,
        })
        .collect()
}

/// First [`PREVIEW_CHARS`] characters, with `...` when cut.
pub fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub fn local_date(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

pub fn local_datetime(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Status line under the editor.
pub fn status_line(current: Option<&JournalEntry>) -> String {
    match current {
        Some(entry) => format!("Last updated: {}", local_datetime(&entry.updated_at)),
        None => "New entry".to_string(),
    }
}
