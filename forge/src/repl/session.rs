//! Interactive interview loop

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::form::{FormInput, LineReader, collect_answers};
use crate::domain::{Role, Turn};
use crate::gateway::Gateway;
use crate::output::{bundle_dir, write_bundle};
use crate::pipeline::PipelineEvent;
use crate::session::{InterviewDriver, Session, StepOutcome};

/// Commands available at any prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Transcript,
    /// Write the finished documents (again)
    Save,
    Restart,
    Quit,
    Unknown(String),
}

impl SlashCommand {
    pub fn parse(input: &str) -> Self {
        let name = input.trim().trim_start_matches('/');
        let name = name.split_whitespace().next().unwrap_or_default();
        match name.to_lowercase().as_str() {
            "help" | "h" | "?" => SlashCommand::Help,
            "transcript" | "t" => SlashCommand::Transcript,
            "save" | "s" => SlashCommand::Save,
            "restart" | "reset" => SlashCommand::Restart,
            "quit" | "exit" | "q" => SlashCommand::Quit,
            _ => SlashCommand::Unknown(input.trim().to_string()),
        }
    }
}

/// Terminal front end for one interview at a time
pub struct InterviewRepl {
    driver: InterviewDriver,
    events: mpsc::UnboundedReceiver<PipelineEvent>,
    output_root: PathBuf,
}

impl InterviewRepl {
    pub fn new(gateway: Arc<dyn Gateway>, output_root: PathBuf) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            driver: InterviewDriver::new(gateway).with_events(tx),
            events,
            output_root,
        }
    }

    /// Run until the user quits or closes input
    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        self.run_with(&mut rl).await
    }

    async fn run_with(&mut self, reader: &mut dyn LineReader) -> Result<()> {
        self.print_welcome();
        info!(mode = %self.driver.mode(), "Interview started");

        let outcome = with_progress(&mut self.events, self.driver.start(Session::new())).await;
        let mut session = self.report(Session::new(), outcome);

        loop {
            let input = match session.pending_form() {
                Some(form) => collect_answers(form, reader)?,
                None => read_free_text(reader)?,
            };

            session = match input {
                FormInput::Answers(answers) => {
                    let before = session.clone();
                    let outcome = with_progress(&mut self.events, self.driver.submit(session, answers)).await;
                    self.report(before, outcome)
                }
                FormInput::Text(text) => {
                    let before = session.clone();
                    let outcome = with_progress(&mut self.events, self.driver.submit_text(session, &text)).await;
                    self.report(before, outcome)
                }
                FormInput::Command(cmd) => match SlashCommand::parse(&cmd) {
                    SlashCommand::Help => {
                        print_help();
                        session
                    }
                    SlashCommand::Transcript => {
                        print_transcript(session.turns());
                        session
                    }
                    SlashCommand::Save => {
                        if session.is_finished() {
                            self.save(&session);
                        } else {
                            println!("{}", "Nothing to save until the interview is complete.".yellow());
                        }
                        session
                    }
                    SlashCommand::Restart => {
                        println!("{}", "Starting over.".dimmed());
                        let before = session.clone();
                        let outcome = with_progress(&mut self.events, self.driver.reset(session)).await;
                        self.report(before, outcome)
                    }
                    SlashCommand::Quit => break,
                    SlashCommand::Unknown(cmd) => {
                        println!("{} {}", "Unknown command:".yellow(), cmd);
                        println!("Type /help for available commands");
                        session
                    }
                },
                FormInput::Closed => break,
            };
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Show what changed, write the bundle on completion, return the session to continue with
    fn report(&self, before: Session, outcome: StepOutcome) -> Session {
        if let Some(message) = outcome.failure() {
            println!("{} {}", "!".red().bold(), message.red());
            if let Some(kind) = outcome.failed_stage() {
                println!("  {}", format!("(stopped at step {}/3: {})", kind.step(), kind.title()).dimmed());
            }
            return outcome.into_session();
        }
        let session = outcome.into_session();

        // A reset yields a different session; show all of its turns
        let seen = if session.id() == before.id() { before.turns().len() } else { 0 };
        for turn in session.turns().iter().skip(seen) {
            if turn.role() == Role::Assistant {
                println!("\n{} {}", "AI:".bright_blue().bold(), turn.content());
            }
        }

        if session.is_finished() && !before.is_finished() {
            self.save(&session);
        }
        session
    }

    /// Write the bundle; failures are shown and leave the session intact for a retry
    fn save(&self, session: &Session) {
        let Some(bundle) = session.artifacts() else {
            return;
        };
        let dir = bundle_dir(&self.output_root, session);
        match write_bundle(bundle, &dir) {
            Ok(written) => {
                println!("\n{}", "Your product package is ready:".green().bold());
                for path in written {
                    println!("  {}", path.display());
                }
                println!("{}", "Type /restart to begin a new idea or /quit to exit.".dimmed());
            }
            Err(e) => {
                error!(?dir, error = %e, "Failed to write document bundle");
                print_save_error(&dir, &e);
            }
        }
    }

    fn print_welcome(&self) {
        println!("{}", "IdeaForge".bold());
        println!("Mode: {}", self.driver.mode().to_string().cyan());
        println!("Type /help for commands, Ctrl-D to exit");
    }
}

/// Await a driver step, printing pipeline progress as it arrives.
///
/// Events still queued when the step finishes are printed before returning,
/// so progress always precedes the step's own output.
async fn with_progress<F>(events: &mut mpsc::UnboundedReceiver<PipelineEvent>, step: F) -> StepOutcome
where
    F: Future<Output = StepOutcome>,
{
    tokio::pin!(step);
    loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => print_event(&event),
            outcome = &mut step => {
                while let Ok(event) = events.try_recv() {
                    print_event(&event);
                }
                return outcome;
            }
        }
    }
}

fn print_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::StageStarted(kind) => {
            println!(
                "  [{}/3] {} {}",
                kind.step(),
                kind.progress_label().cyan(),
                kind.progress_detail().dimmed()
            );
        }
        PipelineEvent::StageFinished { kind, chars } => {
            println!("  {} {} ({} chars)", "done".green(), kind.title(), chars);
        }
    }
}

fn print_save_error(dir: &Path, err: &eyre::Report) {
    println!(
        "{} {}",
        "!".red().bold(),
        format!("Could not write the documents to {}: {:#}", dir.display(), err).red()
    );
    println!(
        "{}",
        "The documents are kept in this session. Fix the problem and type /save to retry.".dimmed()
    );
}

fn print_transcript(turns: &[Turn]) {
    println!();
    for turn in turns {
        let stamp = turn.timestamp().with_timezone(&Local).format("%H:%M:%S");
        let label = match turn.role() {
            Role::Assistant => turn.role().transcript_label().bright_blue().bold(),
            Role::User => turn.role().transcript_label().bright_green().bold(),
        };
        println!("{} {}: {}", format!("[{}]", stamp).dimmed(), label, turn.content());
    }
    println!();
}

fn read_free_text(reader: &mut dyn LineReader) -> Result<FormInput> {
    loop {
        let Some(line) = reader.read_line(&format!("{} ", ">".bright_green()))? else {
            return Ok(FormInput::Closed);
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('/') {
            return Ok(FormInput::Command(line.to_string()));
        }
        debug!(len = line.len(), "read_free_text: got message");
        return Ok(FormInput::Text(line.to_string()));
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  /help        Show this help");
    println!("  /transcript  Show the conversation so far");
    println!("  /save        Write the finished documents again");
    println!("  /restart     Discard this interview and start over");
    println!("  /quit        Exit");
    println!();
    println!("Answer each question in turn. Required questions are marked with *.");
}
