//! Editor session: the one open entry, its edit fields, and the analysis panel.
//!
//! [`EditorSession`] turns user actions (new, select, save, delete, analyze)
//! into [`EntryStore`] calls and one call to the [`Analyzer`]. The store stays
//! the source of truth; the session keeps only the entry being edited.
//! Rendering ([`EditorSession::view`]) is a pure function of the freshly
//! fetched collection and the open entry.

pub mod view;

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::analysis::{self, Analyzer};
use crate::journal::{EntryStore, JournalEntry, SaveRequest, StoreError, UNTITLED};
use crate::markdown;
use view::ListItem;

/// Store handle shared between the session and anything else in the process.
pub type SharedStore = Arc<Mutex<EntryStore>>;

pub const SAVE_EMPTY_MESSAGE: &str = "Please write something in your journal entry.";
pub const ANALYZE_EMPTY_MESSAGE: &str =
    "Please write something in your journal entry before analyzing.";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Rejected locally; no store or analyzer call was made.
    #[error("{0}")]
    Validation(&'static str),
    #[error("analysis cancelled")]
    AnalysisCancelled,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Task(String),
}

/// Asynchronous commands delivered to the session from outside the editor,
/// e.g. the "New Entry" menu accelerator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    NewEntry,
    Delete(String),
    CloseAnalysis,
}

/// The title/content edit fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorFields {
    pub title: String,
    pub content: String,
}

/// State of the "analyze" control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeControl {
    pub enabled: bool,
    pub label: &'static str,
}

impl AnalyzeControl {
    pub const IDLE_LABEL: &'static str = "Analyze with AI";
    pub const BUSY_LABEL: &'static str = "Analyzing...";

    pub fn idle() -> Self {
        Self {
            enabled: true,
            label: Self::IDLE_LABEL,
        }
    }

    pub fn busy() -> Self {
        Self {
            enabled: false,
            label: Self::BUSY_LABEL,
        }
    }
}

/// The analysis results panel: the raw markdown reply and its terminal rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPanel {
    pub markdown: String,
    pub rendered: String,
}

/// Outcome of [`EditorSession::select_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Loaded,
    NotFound,
}

/// Everything a front end needs to draw the editor.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub entries: Vec<ListItem>,
    pub title: String,
    pub content: String,
    pub status: String,
    pub analysis: Option<String>,
    pub analyze_control: AnalyzeControl,
}

pub struct EditorSession {
    store: SharedStore,
    analyzer: Arc<dyn Analyzer>,
    current_entry: Option<JournalEntry>,
    fields: EditorFields,
    analysis: Option<AnalysisPanel>,
    control: watch::Sender<AnalyzeControl>,
}

impl EditorSession {
    /// A session in the compose-new state.
    pub fn new(store: SharedStore, analyzer: Arc<dyn Analyzer>) -> Self {
        let (control, _) = watch::channel(AnalyzeControl::idle());
        Self {
            store,
            analyzer,
            current_entry: None,
            fields: EditorFields::default(),
            analysis: None,
            control,
        }
    }

    pub fn current_entry(&self) -> Option<&JournalEntry> {
        self.current_entry.as_ref()
    }

    pub fn fields(&self) -> &EditorFields {
        &self.fields
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.fields.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.fields.content = content.into();
    }

    pub fn analysis(&self) -> Option<&AnalysisPanel> {
        self.analysis.as_ref()
    }

    pub fn analyze_control(&self) -> AnalyzeControl {
        self.control.borrow().clone()
    }

    /// Follow the analyze control, e.g. to drive a spinner while a request runs.
    pub fn subscribe_control(&self) -> watch::Receiver<AnalyzeControl> {
        self.control.subscribe()
    }

    pub fn status(&self) -> String {
        view::status_line(self.current_entry.as_ref())
    }

    /// Dispatch a command from outside the editor.
    pub async fn handle(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        tracing::debug!(?command, "session command");
        match command {
            SessionCommand::NewEntry => self.new_entry(),
            SessionCommand::Delete(id) => self.delete_entry(&id).await?,
            SessionCommand::CloseAnalysis => self.close_analysis(),
        }
        Ok(())
    }

    /// Clear the fields and start composing a new entry.
    pub fn new_entry(&mut self) {
        self.current_entry = None;
        self.fields = EditorFields::default();
        self.analysis = None;
    }

    /// Load an entry into the editor.
    ///
    /// An unknown id leaves the session exactly as it was.
    pub async fn select_entry(&mut self, id: &str) -> Result<SelectOutcome, SessionError> {
        let lookup = id.to_string();
        let found = self.with_store(move |store| store.get_by_id(&lookup)).await?;

        let Some(entry) = found else {
            tracing::debug!(id = %id, "selected entry not found");
            return Ok(SelectOutcome::NotFound);
        };

        self.fields = EditorFields {
            title: entry.title.clone(),
            content: entry.content.clone(),
        };
        self.current_entry = Some(entry);
        self.analysis = None;
        Ok(SelectOutcome::Loaded)
    }

    /// Save the fields as a new entry or over the open one.
    pub async fn save(&mut self) -> Result<JournalEntry, SessionError> {
        let title = self.fields.title.trim();
        let content = self.fields.content.trim();

        if content.is_empty() {
            return Err(SessionError::Validation(SAVE_EMPTY_MESSAGE));
        }

        let request = SaveRequest {
            id: self.current_entry.as_ref().map(|e| e.id.clone()),
            title: (if title.is_empty() { UNTITLED } else { title }).to_string(),
            content: content.to_string(),
            created_at: self.current_entry.as_ref().map(|e| e.created_at),
        };

        let saved = self.with_store(move |store| store.save(request)).await?;

        self.fields = EditorFields {
            title: saved.title.clone(),
            content: saved.content.clone(),
        };
        self.current_entry = Some(saved.clone());
        Ok(saved)
    }

    /// Delete an entry; if it was open, fall back to composing a new one.
    pub async fn delete_entry(&mut self, id: &str) -> Result<(), SessionError> {
        let target = id.to_string();
        self.with_store(move |store| store.delete_by_id(&target)).await?;

        if self.current_entry.as_ref().is_some_and(|e| e.id == id) {
            self.new_entry();
        }
        Ok(())
    }

    /// Send the content to the analyzer and show the reply.
    ///
    /// The control is disabled for the duration of the request and restored
    /// afterwards whatever the outcome. Analyzer failures come back as the
    /// fallback text. If `cancel` completes first the panel is hidden and
    /// [`SessionError::AnalysisCancelled`] is returned. Never touches the
    /// store or the open entry.
    pub async fn analyze<C>(&mut self, cancel: C) -> Result<String, SessionError>
    where
        C: Future<Output = ()>,
    {
        let content = self.fields.content.trim().to_string();
        if content.is_empty() {
            return Err(SessionError::Validation(ANALYZE_EMPTY_MESSAGE));
        }

        self.control.send_replace(AnalyzeControl::busy());
        let analyzer = Arc::clone(&self.analyzer);

        let outcome = tokio::select! {
            text = analysis::analyze_or_fallback(&*analyzer, &content) => Some(text),
            () = cancel => None,
        };

        self.control.send_replace(AnalyzeControl::idle());

        match outcome {
            Some(text) => {
                self.analysis = Some(AnalysisPanel {
                    rendered: markdown::to_terminal_text(&text),
                    markdown: text.clone(),
                });
                Ok(text)
            }
            None => {
                tracing::info!("analysis cancelled");
                self.analysis = None;
                Err(SessionError::AnalysisCancelled)
            }
        }
    }

    pub fn close_analysis(&mut self) {
        self.analysis = None;
    }

    /// Fetch the collection and render the whole editor.
    pub async fn view(&self) -> Result<SessionView, SessionError> {
        let entries = self.with_store(|store| store.list_all()).await?;
        let current_id = self.current_entry.as_ref().map(|e| e.id.as_str());

        Ok(SessionView {
            entries: view::render_list(entries, current_id),
            title: self.fields.title.clone(),
            content: self.fields.content.clone(),
            status: self.status(),
            analysis: self.analysis.as_ref().map(|p| p.rendered.clone()),
            analyze_control: self.analyze_control(),
        })
    }

    /// Run a store operation on the blocking pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T, SessionError>
    where
        F: FnOnce(&mut EntryStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut store = store
                .lock()
                .map_err(|e| SessionError::Task(format!("store lock poisoned: {e}")))?;
            op(&mut store).map_err(SessionError::from)
        })
        .await
        .map_err(|e| SessionError::Task(format!("store task failed: {e}")))?
    }
}
