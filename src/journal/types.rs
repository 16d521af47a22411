//! Journal record definitions.
//!
//! [`JournalEntry`] is the stored record; [`SaveRequest`] is what the editor
//! sends to the store. Field names serialize in camelCase so the on-disk
//! slot stays compatible with stores written by earlier versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when an entry is saved without one.
pub const UNTITLED: &str = "Untitled";

/// One journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Store-assigned UUID v7, immutable after creation.
    pub id: String,
    /// Display title; [`UNTITLED`] when the user left it blank.
    #[serde(default)]
    pub title: String,
    /// Free-form body text.
    pub content: String,
    /// Set once, when the store first accepts the entry.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every save.
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// The title as it should be displayed.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }
}

/// A save request. `id: None` creates; `Some(id)` replaces that record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveRequest {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    /// Carried along from the open entry; the store keeps its own copy.
    pub created_at: Option<DateTime<Utc>>,
}

impl SaveRequest {
    /// Request creation of a brand-new entry.
    pub fn create(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            created_at: None,
        }
    }

    /// Request replacement of `entry` with new title/content.
    pub fn update(
        entry: &JournalEntry,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(entry.id.clone()),
            title: title.into(),
            content: content.into(),
            created_at: Some(entry.created_at),
        }
    }
}

impl From<JournalEntry> for SaveRequest {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: Some(entry.id),
            title: entry.title,
            content: entry.content,
            created_at: Some(entry.created_at),
        }
    }
}
