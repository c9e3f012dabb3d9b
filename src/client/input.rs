//! Line sources
//!
//! The interactive console and script files feed the same command loop.

use std::io::{self, BufRead, BufReader, Lines, Stdin, Write};

use crate::error::{DbError, Result};

/// Where the next line of user input comes from
pub trait LineSource {
    /// Read one line, trimmed.
    ///
    /// A console writes `prompt` to `out` first; a script echoes the line it
    /// read instead. End of input is `DbError::InputClosed`.
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> Result<String>;
}

/// Interactive input
pub struct ConsoleSource<R> {
    reader: R,
}

impl<R: BufRead> ConsoleSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl ConsoleSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> LineSource for ConsoleSource<R> {
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> Result<String> {
        if !prompt.is_empty() {
            write!(out, "{} ", prompt)?;
            out.flush()?;
        }

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(DbError::InputClosed("end of console input".to_string()));
        }
        Ok(line.trim().to_string())
    }
}

/// Input read from a script file, echoed as it is consumed
pub struct ScriptSource<R> {
    lines: Lines<R>,
}

impl<R: BufRead> ScriptSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn read_line(&mut self, _prompt: &str, out: &mut dyn Write) -> Result<String> {
        match self.lines.next() {
            Some(line) => {
                let line = line?.trim().to_string();
                writeln!(out, "{}", line)?;
                Ok(line)
            }
            None => Err(DbError::InputClosed("end of script".to_string())),
        }
    }
}
