//! Interactive editor: one [`EditorSession`] driven by line commands.

use std::future::Future;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use jotter::config::JotterConfig;
use jotter::session::{EditorSession, SelectOutcome, SessionCommand, SessionError};

use super::{ctrl_c, open_session, print_list, run_analysis};

const HELP: &str = "\
Commands:
  list                 show entries, newest first
  open <n|id>          load an entry by list number or id
  new                  start a new entry
  title <text>         set the title
  write                replace the content; finish with a line containing only \".\"
                       (Ctrl-C abandons the text)
  append <text>        add a line to the content
  show                 print the editor fields
  save                 save the entry
  delete [n|id]        delete an entry (default: the open one)
  analyze              ask the local model for insights (Ctrl-C cancels)
  close                hide the analysis
  help                 this text
  quit                 leave (Ctrl-D or Ctrl-C at the prompt works too)";

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Command(SessionCommand),
    Open(&'a str),
    Delete(Option<&'a str>),
    List,
    Title(&'a str),
    Write,
    Append(&'a str),
    Show,
    Save,
    Analyze,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse(line: &str) -> Input<'_> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "new" => Input::Command(SessionCommand::NewEntry),
        "close" => Input::Command(SessionCommand::CloseAnalysis),
        "open" if !rest.is_empty() => Input::Open(rest),
        "delete" => Input::Delete((!rest.is_empty()).then_some(rest)),
        "list" | "ls" => Input::List,
        "title" => Input::Title(rest),
        "write" => Input::Write,
        "append" => Input::Append(rest),
        "show" => Input::Show,
        "save" => Input::Save,
        "analyze" => Input::Analyze,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(line),
    }
}

struct Shell {
    session: EditorSession,
    /// Ids in the order of the last printed list, for `open <n>`.
    listed: Vec<String>,
    lines: Lines<BufReader<Stdin>>,
}

pub async fn run(config: &JotterConfig) -> Result<()> {
    let session = open_session(config)?;
    let mut shell = Shell {
        session,
        listed: Vec::new(),
        lines: BufReader::new(tokio::io::stdin()).lines(),
    };

    println!("jotter: type `help` for commands.");
    shell.list().await?;

    loop {
        prompt(&shell.session);
        let line = match next_input(&mut shell.lines, ctrl_c()).await? {
            NextInput::Line(line) => line,
            NextInput::Interrupted => {
                println!();
                break;
            }
            NextInput::End => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        match shell.dispatch(parse(&line)).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => report(&e),
        }
    }

    Ok(())
}

/// What came back from waiting on the next input line.
#[derive(Debug, PartialEq, Eq)]
enum NextInput {
    Line(String),
    End,
    Interrupted,
}

/// Wait for a line, racing `interrupt` (Ctrl-C in the shell).
async fn next_input<R, I>(lines: &mut Lines<R>, interrupt: I) -> std::io::Result<NextInput>
where
    R: AsyncBufRead + Unpin,
    I: Future<Output = ()>,
{
    tokio::select! {
        line = lines.next_line() => Ok(line?.map_or(NextInput::End, NextInput::Line)),
        () = interrupt => Ok(NextInput::Interrupted),
    }
}

fn prompt(session: &EditorSession) {
    use std::io::Write;

    let name = match session.current_entry() {
        Some(entry) => entry.display_title().to_string(),
        None => "new".to_string(),
    };
    print!("[{name}]> ");
    let _ = std::io::stdout().flush();
}

/// User-facing errors; the shell's equivalent of an alert box.
fn report(err: &SessionError) {
    match err {
        SessionError::Validation(message) => println!("! {message}"),
        SessionError::AnalysisCancelled => println!("Analysis cancelled."),
        other => println!("! {other}"),
    }
}

impl Shell {
    /// Handle one input. `Ok(false)` ends the shell.
    async fn dispatch(&mut self, input: Input<'_>) -> Result<bool, SessionError> {
        match input {
            Input::Command(command) => {
                let is_new = command == SessionCommand::NewEntry;
                self.session.handle(command).await?;
                if is_new {
                    println!("{}", self.session.status());
                }
            }
            Input::Open(target) => {
                let id = self.resolve(target);
                match self.session.select_entry(&id).await? {
                    SelectOutcome::Loaded => self.show(),
                    SelectOutcome::NotFound => println!("! No entry {target}."),
                }
            }
            Input::Delete(target) => {
                let id = match target {
                    Some(target) => self.resolve(target),
                    None => match self.session.current_entry() {
                        Some(entry) => entry.id.clone(),
                        None => {
                            println!("! Nothing open to delete.");
                            return Ok(true);
                        }
                    },
                };
                self.session.handle(SessionCommand::Delete(id)).await?;
                self.list().await?;
            }
            Input::List => self.list().await?,
            Input::Title(title) => self.session.set_title(title),
            Input::Write => {
                println!("Enter text; finish with a line containing only \".\"");
                match self.read_block().await? {
                    Some(content) => self.session.set_content(content),
                    None => println!("Write abandoned; content unchanged."),
                }
            }
            Input::Append(text) => {
                let mut content = self.session.fields().content.clone();
                if !content.is_empty() {
                    content.push('\n');
                }
                content.push_str(text);
                self.session.set_content(content);
            }
            Input::Show => self.show(),
            Input::Save => {
                let saved = self.session.save().await?;
                println!("Saved {} ({}).", saved.display_title(), saved.id);
                println!("{}", self.session.status());
                self.list().await?;
            }
            Input::Analyze => {
                run_analysis(&mut self.session).await?;
                if let Some(panel) = self.session.analysis() {
                    println!();
                    println!("Analysis");
                    println!("{}", "-".repeat(50));
                    println!("{}", panel.rendered);
                    println!();
                }
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => return Ok(false),
            Input::Unknown(line) => println!("Unknown command: {line} (try `help`)"),
        }
        Ok(true)
    }

    /// A list number from the last listing, or the text itself as an id.
    fn resolve(&self, target: &str) -> String {
        target
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.listed.get(i))
            .cloned()
            .unwrap_or_else(|| target.to_string())
    }

    async fn list(&mut self) -> Result<(), SessionError> {
        let view = self.session.view().await?;
        self.listed = view.entries.iter().map(|item| item.id.clone()).collect();
        print_list(&view.entries);
        Ok(())
    }

    fn show(&self) {
        let fields = self.session.fields();
        let title = if fields.title.is_empty() {
            "(no title)"
        } else {
            fields.title.as_str()
        };
        println!("{title}");
        println!("{}", self.session.status());
        println!();
        println!("{}", fields.content);
    }

    /// Lines up to a lone "." or end of input. `None` if Ctrl-C abandons it.
    async fn read_block(&mut self) -> Result<Option<String>, SessionError> {
        let mut block = Vec::new();
        loop {
            let next = next_input(&mut self.lines, ctrl_c())
                .await
                .map_err(|e| SessionError::Task(format!("failed to read input: {e}")))?;
            match next {
                NextInput::Line(line) if line == "." => break,
                NextInput::Line(line) => block.push(line),
                NextInput::End => break,
                NextInput::Interrupted => return Ok(None),
            }
        }
        Ok(Some(block.join("\n")))
    }
}
