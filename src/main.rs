mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jotter::config::JotterConfig;

#[derive(Parser)]
#[command(name = "jotter", version, about = "Local journal with AI analysis via Ollama")]
struct Cli {
    /// Config file (defaults to ~/.jotter/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive editor (the default)
    Shell,
    /// List entries, newest first
    List,
    /// Print one entry
    Show { id: String },
    /// Write a new entry; content is read from stdin when --content is omitted
    Write {
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short)]
        content: Option<String>,
    },
    /// Change the title and/or content of an entry
    Edit {
        id: String,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short)]
        content: Option<String>,
    },
    /// Delete an entry
    Delete { id: String },
    /// Ask the local model for insights on an entry
    Analyze { id: String },
    /// Dump all entries as JSON to stdout
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => JotterConfig::load_from(path)?,
        None => JotterConfig::load()?,
    };

    // Log to stderr so stdout stays clean for list/export output.
    let filter = EnvFilter::try_new(&config.logging.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => cli::shell::run(&config).await?,
        Command::List => cli::list(&config).await?,
        Command::Show { id } => cli::show(&config, &id).await?,
        Command::Write { title, content } => cli::write(&config, title, content).await?,
        Command::Edit { id, title, content } => cli::edit(&config, &id, title, content).await?,
        Command::Delete { id } => cli::delete(&config, &id).await?,
        Command::Analyze { id } => cli::analyze(&config, &id).await?,
        Command::Export => cli::export(&config)?,
    }

    Ok(())
}
