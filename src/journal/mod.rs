pub mod store;
pub mod types;

pub use store::{EntryStore, StoreError, ENTRIES_KEY};
pub use types::{JournalEntry, SaveRequest, UNTITLED};
