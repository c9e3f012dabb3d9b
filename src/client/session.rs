//! Client Session
//!
//! Turns console or script lines into requests, runs the round trip and
//! renders what comes back.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use super::render::render_response;
use super::{LineSource, PersonReader, ScriptHistory, ScriptSource};
use crate::error::{DbError, Result};
use crate::network::Transport;
use crate::protocol::{Argument, CommandType, Payload, Request, Status};

/// One user's command loop
pub struct Session<T, W> {
    transport: T,
    out: W,
    scripts: ScriptHistory,
    running: bool,

    /// Command names reported by the server's HELP
    server_commands: Vec<String>,
}

impl<T: Transport, W: Write> Session<T, W> {
    pub fn new(transport: T, out: W) -> Self {
        Self {
            transport,
            out,
            scripts: ScriptHistory::new(),
            running: true,
            server_commands: Vec::new(),
        }
    }

    /// Ask the server for its command catalog.
    ///
    /// After a failed attempt the user is asked through `source` whether to
    /// try again; anything but `yes`/`y` (or end of input) gives up. Returns
    /// `false` (and keeps the local catalog) in that case; the session stays
    /// usable either way.
    pub fn initialize(&mut self, source: &mut dyn LineSource) -> Result<bool> {
        loop {
            writeln!(self.out, "Contacting the server...")?;

            match self.transport.send_and_receive(&Request::new(CommandType::Help)) {
                Ok(response) if response.status == Status::Success => {
                    if let Some(Payload::Commands(names)) = &response.data {
                        self.server_commands = names.clone();
                    }
                    writeln!(self.out, "{}", response.message)?;
                    return Ok(true);
                }
                Ok(response) => {
                    writeln!(self.out, "Server rejected the handshake: {}", response.message)?;
                }
                Err(e) => {
                    tracing::warn!("Handshake failed: {}", e);
                    writeln!(self.out, "Connection error: {}", e)?;
                }
            }

            let answer = match source.read_line("Retry? (yes/no):", &mut self.out) {
                Ok(answer) => answer.to_lowercase(),
                Err(DbError::InputClosed(_)) => break,
                Err(e) => return Err(e),
            };
            if answer != "yes" && answer != "y" {
                break;
            }
        }

        writeln!(self.out, "Warning: the server is unavailable. Working offline with the local command list.")?;
        Ok(false)
    }

    /// Read and execute lines until `exit` or end of input
    pub fn run(&mut self, source: &mut dyn LineSource) -> Result<()> {
        while self.running {
            let line = match source.read_line(">", &mut self.out) {
                Ok(line) => line,
                Err(DbError::InputClosed(_)) => break,
                Err(e) => return Err(e),
            };

            match self.execute_line(&line, source) {
                Ok(()) => {}
                Err(DbError::InputClosed(reason)) => {
                    writeln!(self.out, "Input ended ({}), command abandoned.", reason)?;
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        writeln!(self.out, "Client shutting down...")?;
        Ok(())
    }

    /// Execute one command line.
    ///
    /// Only `InputClosed` and output failures escape; everything else is
    /// reported to the user.
    pub fn execute_line(&mut self, line: &str, source: &mut dyn LineSource) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let (name, arg) = split_command(line);
        match CommandType::from_name(name) {
            Some(CommandType::Exit) => {
                self.running = false;
                Ok(())
            }
            Some(CommandType::ExecuteScript) => match arg {
                Some(path) => self.execute_script(Path::new(path)),
                None => {
                    writeln!(self.out, "Error: a script file name is required.")?;
                    Ok(())
                }
            },
            _ => match self.build_request(line, source) {
                Ok(request) => self.process_request(&request),
                Err(DbError::InputClosed(reason)) => Err(DbError::InputClosed(reason)),
                Err(DbError::Io(e)) => Err(DbError::Io(e)),
                Err(e) => {
                    writeln!(self.out, "Error: {}", e)?;
                    Ok(())
                }
            },
        }
    }

    /// Run every line of a script file.
    ///
    /// A script already on the stack is refused and skipped; the caller goes on
    /// with its next line.
    pub fn execute_script(&mut self, path: &Path) -> Result<()> {
        let guard = match self.scripts.enter(path) {
            Ok(guard) => guard,
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
                return Ok(());
            }
        };

        let file = match File::open(guard.path()) {
            Ok(file) => file,
            Err(e) => {
                writeln!(self.out, "Error: cannot open script '{}': {}", path.display(), e)?;
                return Ok(());
            }
        };

        writeln!(self.out, "--- Executing script: {} ---", path.display())?;
        let mut source = ScriptSource::new(BufReader::new(file));

        while self.running {
            let line = match source.read_line("", &mut self.out) {
                Ok(line) => line,
                Err(DbError::InputClosed(_)) => break,
                Err(e) => {
                    writeln!(self.out, "Error while reading script '{}': {}", path.display(), e)?;
                    break;
                }
            };

            match self.execute_line(&line, &mut source) {
                Ok(()) => {}
                Err(DbError::InputClosed(_)) => {
                    writeln!(self.out, "Script ended in the middle of a command.")?;
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        writeln!(self.out, "--- Finished script: {} ---", path.display())?;
        drop(guard);
        Ok(())
    }

    /// Build the request for a server-side command line
    pub fn build_request(&mut self, line: &str, source: &mut dyn LineSource) -> Result<Request> {
        let (name, arg) = split_command(line);

        let Some(command) = CommandType::from_name(name) else {
            writeln!(self.out, "Unknown command: {}", name)?;
            return Ok(Request::new(CommandType::Help));
        };

        let request = match command {
            CommandType::Help
            | CommandType::Info
            | CommandType::Show
            | CommandType::Clear
            | CommandType::AverageOfHeight => Request::new(command),

            CommandType::RemoveById => Request::with_argument(command, Argument::Id(parse_id(arg)?)),

            CommandType::Update => {
                let id = parse_id(arg)?;
                writeln!(self.out, "Entering new data for the element with ID {}", id)?;
                let person = PersonReader::new(source, &mut self.out).read_person()?;
                Request::with_argument(command, Argument::Update { id, person })
            }

            CommandType::Add | CommandType::AddIfMin => {
                let person = PersonReader::new(source, &mut self.out).read_person()?;
                Request::with_argument(command, Argument::Person(person))
            }

            CommandType::RemoveGreater | CommandType::RemoveLower => {
                writeln!(self.out, "Enter the reference element for comparison:")?;
                let person = PersonReader::new(source, &mut self.out).read_person()?;
                Request::with_argument(command, Argument::Person(person))
            }

            CommandType::CountByHairColor | CommandType::FilterLessThanHairColor => {
                let color = PersonReader::new(source, &mut self.out).read_color("hair color")?;
                Request::with_argument(command, Argument::HairColor(color))
            }

            CommandType::Exit | CommandType::ExecuteScript => {
                return Err(DbError::Protocol(format!(
                    "{} is handled by the client",
                    command.name()
                )));
            }
        };

        Ok(request)
    }

    /// Send a request and render the outcome; failures are reported, not retried
    pub fn process_request(&mut self, request: &Request) -> Result<()> {
        match self.transport.send_and_receive(request) {
            Ok(response) => {
                if let Some(Payload::Commands(names)) = &response.data {
                    self.server_commands = names.clone();
                }
                render_response(&mut self.out, &response, request.command_type)?;
            }
            Err(e) => {
                tracing::debug!("{} failed: {}", request.command_type.tag(), e);
                writeln!(self.out, "Error communicating with the server: {}", e)?;
            }
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn server_commands(&self) -> &[String] {
        &self.server_commands
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn output(&self) -> &W {
        &self.out
    }
}

/// Split `name [argument]` on the first run of whitespace
fn split_command(line: &str) -> (&str, Option<&str>) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => {
            let rest = rest.trim();
            (name, if rest.is_empty() { None } else { Some(rest) })
        }
        None => (line, None),
    }
}

fn parse_id(arg: Option<&str>) -> Result<i64> {
    let arg = arg.ok_or_else(|| DbError::Validation("an ID is required".to_string()))?;
    arg.parse::<i64>()
        .map_err(|_| DbError::Validation(format!("ID must be an integer, got '{}'", arg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("show"), ("show", None));
        assert_eq!(split_command("remove_by_id   42 "), ("remove_by_id", Some("42")));
        assert_eq!(split_command("execute_script my script.txt"), ("execute_script", Some("my script.txt")));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some("7")).unwrap(), 7);
        assert!(parse_id(None).is_err());
        assert!(parse_id(Some("seven")).is_err());
    }
}
