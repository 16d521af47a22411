//! Entry store: CRUD over the journal collection.
//!
//! The whole collection lives in one key-value slot ([`ENTRIES_KEY`]). Every
//! mutation is a read-modify-write of that slot, flushed to disk before the
//! call returns. Storage order is insertion order; sorting is left to the view.

use chrono::Utc;

use crate::journal::types::{JournalEntry, SaveRequest};
use crate::kv::{KvError, KvStore};

/// Slot holding the serialized `Vec<JournalEntry>`.
pub const ENTRIES_KEY: &str = "journal-entries";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An update named an id that is not in the collection.
    #[error("journal entry not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Persistence(#[from] KvError),
}

/// Durable journal collection backed by a [`KvStore`].
#[derive(Debug)]
pub struct EntryStore {
    kv: KvStore,
}

impl EntryStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Create or replace an entry.
    ///
    /// Without an id a fresh UUID v7 is assigned and `created_at ==
    /// updated_at`. With an id the matching record is replaced wholesale,
    /// keeping its stored `created_at`. An id with no match is rejected with
    /// [`StoreError::NotFound`] and nothing is written.
    pub fn save(&mut self, request: SaveRequest) -> Result<JournalEntry, StoreError> {
        let mut entries = self.list_all()?;
        let now = Utc::now();

        let saved = match request.id {
            None => {
                let entry = JournalEntry {
                    id: uuid::Uuid::now_v7().to_string(),
                    title: request.title,
                    content: request.content,
                    created_at: now,
                    updated_at: now,
                };
                entries.push(entry.clone());
                tracing::info!(id = %entry.id, "journal entry created");
                entry
            }
            Some(id) => {
                let Some(slot) = entries.iter_mut().find(|e| e.id == id) else {
                    tracing::warn!(id = %id, "update for unknown journal entry rejected");
                    return Err(StoreError::NotFound(id));
                };
                // Clock skew must not produce updated_at < created_at.
                let updated_at = now.max(slot.created_at);
                *slot = JournalEntry {
                    id,
                    title: request.title,
                    content: request.content,
                    created_at: slot.created_at,
                    updated_at,
                };
                tracing::info!(id = %slot.id, "journal entry updated");
                slot.clone()
            }
        };

        self.kv.set(ENTRIES_KEY, &entries)?;
        Ok(saved)
    }

    /// The full collection, in storage order.
    pub fn list_all(&self) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(self.kv.get_or_default(ENTRIES_KEY)?)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<JournalEntry>, StoreError> {
        Ok(self.list_all()?.into_iter().find(|e| e.id == id))
    }

    /// Remove every record with `id` and persist. Succeeds whether or not
    /// anything matched.
    pub fn delete_by_id(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut entries = self.list_all()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = before - entries.len();

        self.kv.set(ENTRIES_KEY, &entries)?;
        tracing::info!(id = %id, removed, "journal entry delete");
        Ok(true)
    }
}
