//! Response rendering

use std::io::{self, Write};

use crate::protocol::{CommandType, Payload, Response, Status};

/// Delimiter printed after every rendered element
pub const ELEMENT_DELIMITER: &str = "---";

/// Write a response the way the console shows it.
///
/// HELP data (the command list) is consumed by the session, not printed.
pub fn render_response(out: &mut dyn Write, response: &Response, command: CommandType) -> io::Result<()> {
    if response.status == Status::Error {
        return writeln!(out, "Server error: {}", response.message);
    }

    if !response.message.is_empty() {
        writeln!(out, "{}", response.message)?;
    }

    if command == CommandType::Help {
        return Ok(());
    }

    match &response.data {
        Some(Payload::Persons(persons)) if persons.is_empty() => {
            writeln!(out, "Collection is empty.")?;
        }
        Some(Payload::Persons(persons)) => {
            for person in persons {
                writeln!(out, "{}", person)?;
                writeln!(out, "{}", ELEMENT_DELIMITER)?;
            }
        }
        Some(Payload::Commands(names)) => {
            writeln!(out, "{}", names.join(", "))?;
        }
        None => {}
    }

    Ok(())
}
