#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use jotter::analysis::{AnalysisError, Analyzer};
use jotter::journal::{EntryStore, JournalEntry, SaveRequest};
use jotter::kv::KvStore;
use jotter::session::{AnalyzeControl, EditorSession, SharedStore};
use tokio::sync::watch;

/// Shared store with no backing file.
pub fn memory_store() -> SharedStore {
    Arc::new(Mutex::new(EntryStore::new(KvStore::in_memory())))
}

/// Shared store backed by the JSON file at `path`.
pub fn file_store(path: &Path) -> SharedStore {
    Arc::new(Mutex::new(EntryStore::new(KvStore::open(path).unwrap())))
}

/// Save an entry directly through the store. Returns the stored record.
pub fn seed(store: &SharedStore, title: &str, content: &str) -> JournalEntry {
    store
        .lock()
        .unwrap()
        .save(SaveRequest::create(title, content))
        .unwrap()
}

pub fn all_entries(store: &SharedStore) -> Vec<JournalEntry> {
    store.lock().unwrap().list_all().unwrap()
}

/// What a [`ScriptedAnalyzer`] does when called.
pub enum Reply {
    Text(String),
    Fail,
    Hang,
}

/// Analyzer double that records every call and the analyze-control state
/// visible while the call is in flight.
pub struct ScriptedAnalyzer {
    reply: Reply,
    calls: Mutex<Vec<String>>,
    control: OnceLock<watch::Receiver<AnalyzeControl>>,
    seen_control: Mutex<Vec<AnalyzeControl>>,
}

impl ScriptedAnalyzer {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
            control: OnceLock::new(),
            seen_control: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seen_control(&self) -> Vec<AnalyzeControl> {
        self.seen_control.lock().unwrap().clone()
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, text: &str) -> Result<String, AnalysisError> {
        self.calls.lock().unwrap().push(text.to_string());
        if let Some(control) = self.control.get() {
            self.seen_control.lock().unwrap().push(control.borrow().clone());
        }

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(AnalysisError::Request("connection refused".into())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// A session over `store` using `analyzer`, with the analyzer watching the
/// session's analyze control.
pub fn session_with(store: &SharedStore, analyzer: &Arc<ScriptedAnalyzer>) -> EditorSession {
    let session = EditorSession::new(Arc::clone(store), analyzer.clone());
    let _ = analyzer.control.set(session.subscribe_control());
    session
}
