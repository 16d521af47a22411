//! A local journal with on-device AI analysis.
//!
//! Entries are kept in a single JSON key-value file on disk. An editor session
//! tracks the one entry being written and can send its text to a locally
//! running [Ollama](https://ollama.com/) model for free-text insights.
//!
//! # Architecture
//!
//! - **Storage**: one JSON file of named slots; the journal lives in the
//!   `"journal-entries"` slot and is rewritten wholesale on every change
//! - **Session**: the open entry, its edit fields and the analysis panel, with
//!   list rendering as a pure function of the stored collection
//! - **Analysis**: one non-streaming chat request per analysis, with a request
//!   timeout, cancellation, and a fixed fallback message on failure
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`kv`] — JSON-file key-value store
//! - [`journal`] — Journal entry types and the entry store
//! - [`session`] — Editor session state machine and list rendering
//! - [`analysis`] — Analyzer trait and the Ollama client
//! - [`markdown`] — Markdown to terminal text for analysis replies

pub mod analysis;
pub mod config;
pub mod journal;
pub mod kv;
pub mod markdown;
pub mod session;
