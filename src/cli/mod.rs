pub mod shell;

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use jotter::analysis;
use jotter::config::JotterConfig;
use jotter::journal::{EntryStore, JournalEntry};
use jotter::kv::KvStore;
use jotter::session::view::{self, ListItem};
use jotter::session::{EditorSession, SelectOutcome, SessionError, SharedStore};

/// Open the store file named by the config.
fn open_store(config: &JotterConfig) -> Result<EntryStore> {
    let path = config.resolved_store_path();
    let kv = KvStore::open(&path)
        .with_context(|| format!("failed to open journal store at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "journal store ready");
    Ok(EntryStore::new(kv))
}

/// Store + analyzer wired into a fresh editor session.
pub(crate) fn open_session(config: &JotterConfig) -> Result<EditorSession> {
    let store: SharedStore = Arc::new(Mutex::new(open_store(config)?));
    let analyzer = analysis::create_analyzer(&config.analysis)?;
    Ok(EditorSession::new(store, Arc::from(analyzer)))
}

pub(crate) fn print_list(items: &[ListItem]) {
    if items.is_empty() {
        println!("No entries yet.");
        return;
    }

    for (i, item) in items.iter().enumerate() {
        let marker = if item.selected { '>' } else { ' ' };
        println!("{marker}{:>3}. {}  [{}]  {}", i + 1, item.title, item.date, item.id);
        println!("      {}", item.preview.replace('\n', " "));
    }
}

pub(crate) fn print_entry(entry: &JournalEntry) {
    println!("{}", entry.display_title());
    println!("{}", "=".repeat(50));
    println!("  Id:       {}", entry.id);
    println!("  Created:  {}", view::local_datetime(&entry.created_at));
    println!("  Updated:  {}", view::local_datetime(&entry.updated_at));
    println!();
    println!("{}", entry.content);
}

pub async fn list(config: &JotterConfig) -> Result<()> {
    let session = open_session(config)?;
    let view = session.view().await?;
    print_list(&view.entries);
    Ok(())
}

pub async fn show(config: &JotterConfig, id: &str) -> Result<()> {
    let mut session = open_session(config)?;
    load(&mut session, id).await?;
    if let Some(entry) = session.current_entry() {
        print_entry(entry);
    }
    Ok(())
}

pub async fn write(
    config: &JotterConfig,
    title: Option<String>,
    content: Option<String>,
) -> Result<()> {
    let content = match content {
        Some(content) => content,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read entry content from stdin")?;
            buf
        }
    };

    let mut session = open_session(config)?;
    session.set_title(title.unwrap_or_default());
    session.set_content(content);
    let saved = session.save().await?;

    println!("Saved {} ({})", saved.display_title(), saved.id);
    Ok(())
}

pub async fn edit(
    config: &JotterConfig,
    id: &str,
    title: Option<String>,
    content: Option<String>,
) -> Result<()> {
    if title.is_none() && content.is_none() {
        bail!("nothing to change: pass --title and/or --content");
    }

    let mut session = open_session(config)?;
    load(&mut session, id).await?;
    if let Some(title) = title {
        session.set_title(title);
    }
    if let Some(content) = content {
        session.set_content(content);
    }
    let saved = session.save().await?;

    println!("Updated {} ({})", saved.display_title(), saved.id);
    Ok(())
}

pub async fn delete(config: &JotterConfig, id: &str) -> Result<()> {
    let mut session = open_session(config)?;
    session.delete_entry(id).await?;
    println!("Deleted {id}");
    Ok(())
}

pub async fn analyze(config: &JotterConfig, id: &str) -> Result<()> {
    let mut session = open_session(config)?;
    load(&mut session, id).await?;

    match run_analysis(&mut session).await {
        Ok(_) => {
            if let Some(panel) = session.analysis() {
                println!("{}", panel.rendered);
            }
            Ok(())
        }
        Err(SessionError::AnalysisCancelled) => {
            eprintln!("Analysis cancelled.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Export all entries as JSON to stdout.
pub fn export(config: &JotterConfig) -> Result<()> {
    let store = open_store(config)?;
    let entries = store.list_all()?;

    let json = serde_json::to_string_pretty(&entries)?;
    println!("{json}");
    eprintln!("Exported {} entries.", entries.len());
    Ok(())
}

async fn load(session: &mut EditorSession, id: &str) -> Result<()> {
    match session.select_entry(id).await? {
        SelectOutcome::Loaded => Ok(()),
        SelectOutcome::NotFound => bail!("no journal entry with id {id}"),
    }
}

/// Resolves on Ctrl-C. Never resolves if the signal handler can't be installed.
pub(crate) async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Analyze the session's content with a spinner while the request is out.
/// Ctrl-C cancels.
pub(crate) async fn run_analysis(session: &mut EditorSession) -> Result<String, SessionError> {
    let mut control = session.subscribe_control();
    let spinner = tokio::spawn(async move {
        let mut bar: Option<ProgressBar> = None;
        while control.changed().await.is_ok() {
            let state = control.borrow_and_update().clone();
            if state.enabled {
                break;
            }
            if bar.is_none() {
                bar = Some(spinner_bar(state.label));
            }
        }
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
    });

    let result = session.analyze(ctrl_c()).await;

    if matches!(result, Err(SessionError::Validation(_))) {
        // The control never changed, so the spinner task is still waiting.
        spinner.abort();
    } else {
        let _ = spinner.await;
    }
    result
}

fn spinner_bar(label: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} (Ctrl-C to cancel)")
            .expect("valid template"),
    );
    bar.set_message(label);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
