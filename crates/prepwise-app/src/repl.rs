//! Line-based chat loop.
//!
//! Reads queries and slash commands from any `BufRead`, drives a [`Session`]
//! and writes rendered turns to any `Write`. When the last answer asks for a
//! slot, the loop collects the household or address form before returning
//! to free text.

use std::io::{self, BufRead, Write};

use prepwise_chat::{ChatError, Session, SlotRequest, Turn, QUICK_ACTIONS};

use crate::render::{self, RenderOptions};

/// What a line of input asks the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Ask(String),
    QuickAction(usize),
    Topic(String),
    Menu,
    Help,
    Reset,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "menu" => Command::Menu,
        "help" | "?" => Command::Help,
        "reset" => Command::Reset,
        "quit" | "exit" => Command::Quit,
        "topic" => Command::Topic(arg.to_string()),
        n => match n.parse::<usize>() {
            Ok(idx) if (1..=QUICK_ACTIONS.len()).contains(&idx) => Command::QuickAction(idx - 1),
            _ => Command::Unknown(line.to_string()),
        },
    }
}

/// How a slot form ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormOutcome {
    /// Submitted, rejected or re-asked; show whatever is pending next.
    Handled,
    /// Blank answer; fall back to free text.
    Skipped,
    /// Input ended.
    Closed,
}

pub struct Repl<R, W> {
    session: Session,
    input: R,
    output: W,
    opts: RenderOptions,
    json: bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(session: Session, input: R, output: W, opts: RenderOptions, json: bool) -> Self {
        Self {
            session,
            input,
            output,
            opts,
            json,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until `/quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        if !self.json {
            writeln!(
                self.output,
                "PrepWise emergency assistant ({})",
                self.session.knowledge().service_area
            )?;
            write!(self.output, "{}", render::render_menu(QUICK_ACTIONS))?;
            writeln!(self.output, "Type /help for commands.")?;
        }

        // History length at which the user skipped the pending form. The form
        // stays hidden until the conversation moves on.
        let mut skipped_at: Option<usize> = None;
        loop {
            let request = self.session.pending_slot_request();
            if request.is_pending() && skipped_at != Some(self.session.history().len()) {
                match self.slot_form(request)? {
                    FormOutcome::Handled => continue,
                    FormOutcome::Skipped => skipped_at = Some(self.session.history().len()),
                    FormOutcome::Closed => return Ok(()),
                }
            }

            let Some(line) = self.prompt("\n> ")? else {
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }
            if !self.dispatch(parse_command(&line))? {
                return Ok(());
            }
        }
    }

    /// Execute one command. Returns `false` when the loop should stop.
    fn dispatch(&mut self, command: Command) -> io::Result<bool> {
        match command {
            Command::Ask(text) => {
                let result = self.session.ask(&text);
                self.show(result)?;
            }
            Command::QuickAction(idx) => {
                let result = self.session.ask(QUICK_ACTIONS[idx].query);
                self.show(result)?;
            }
            Command::Topic(name) => {
                let result = self.session.ask_topic(&name);
                self.show(result)?;
            }
            Command::Menu => write!(self.output, "{}", render::render_menu(QUICK_ACTIONS))?,
            Command::Help => write!(self.output, "{}", render::HELP)?,
            Command::Reset => {
                self.session.reset_session();
                writeln!(self.output, "Conversation cleared.")?;
            }
            Command::Quit => return Ok(false),
            Command::Unknown(cmd) => writeln!(self.output, "Unknown command {}. Type /help.", cmd)?,
        }
        Ok(true)
    }

    fn slot_form(&mut self, request: SlotRequest) -> io::Result<FormOutcome> {
        match request {
            SlotRequest::Household => self.household_form(),
            SlotRequest::Address => self.address_form(),
            SlotRequest::None => Ok(FormOutcome::Skipped),
        }
    }

    /// Collect adults/children/pets and submit them.
    fn household_form(&mut self) -> io::Result<FormOutcome> {
        let mut counts = [0u32; 3];
        for (slot, label) in counts.iter_mut().zip(["Adults", "Children", "Pets"]) {
            let Some(answer) = self.prompt(&format!("{} (0-20, blank to skip): ", label))? else {
                return Ok(FormOutcome::Closed);
            };
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(FormOutcome::Skipped);
            }
            match answer.parse::<u32>() {
                Ok(n) => *slot = n,
                Err(_) => {
                    writeln!(self.output, "Please enter a whole number.")?;
                    return Ok(FormOutcome::Handled);
                }
            }
        }

        let [adults, children, pets] = counts;
        match self.session.submit_household(adults, children, pets) {
            Ok(()) => {
                let result = self.session.resolve();
                self.show(result)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(FormOutcome::Handled)
    }

    fn address_form(&mut self) -> io::Result<FormOutcome> {
        let Some(answer) = self.prompt("Address or ZIP (blank to skip): ")? else {
            return Ok(FormOutcome::Closed);
        };
        if answer.trim().is_empty() {
            return Ok(FormOutcome::Skipped);
        }
        match self.session.submit_address(&answer) {
            Ok(()) => {
                let result = self.session.resolve();
                self.show(result)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(FormOutcome::Handled)
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        if !self.json {
            write!(self.output, "{}", text)?;
            self.output.flush()?;
        }
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn show(&mut self, result: Result<Turn, ChatError>) -> io::Result<()> {
        match result {
            Ok(turn) if self.json => {
                let line = serde_json::to_string(&turn).map_err(io::Error::other)?;
                writeln!(self.output, "{}", line)
            }
            Ok(turn) => {
                writeln!(self.output)?;
                write!(self.output, "{}", render::render_turn(&turn, self.opts))
            }
            Err(e) => self.report(&e),
        }
    }

    fn report(&mut self, err: &ChatError) -> io::Result<()> {
        tracing::warn!(error = %err, "Request rejected");
        writeln!(self.output, "Sorry: {}", err)
    }
}
