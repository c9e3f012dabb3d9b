//! Console Bridge
//!
//! Carries operator input from a blocking line source into the event loop.
//!
//! The console is read on a dedicated thread; each line is forwarded as an
//! opaque byte message over an unbounded channel that the loop awaits next to
//! the socket. The reader thread touches no other state.

use std::io::BufRead;
use std::thread;

use tokio::sync::mpsc;

use crate::error::Result;

/// Receiving end, owned by the server loop
pub struct ConsoleBridge {
    receiver: mpsc::UnboundedReceiver<Vec<u8>>,
}

/// Sending end, owned by whatever produces operator lines
#[derive(Clone)]
pub struct ConsoleSender {
    sender: mpsc::UnboundedSender<Vec<u8>>,
}

impl ConsoleSender {
    /// Forward one line. Returns `false` once the loop has gone away.
    pub fn send(&self, line: impl Into<String>) -> bool {
        self.sender.send(line.into().into_bytes()).is_ok()
    }
}

impl ConsoleBridge {
    /// Create a connected sender/bridge pair
    pub fn channel() -> (ConsoleSender, ConsoleBridge) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (ConsoleSender { sender }, ConsoleBridge { receiver })
    }

    /// Spawn a thread that forwards every line of `reader`
    pub fn spawn_reader<R>(reader: R) -> Result<ConsoleBridge>
    where
        R: BufRead + Send + 'static,
    {
        let (sender, bridge) = Self::channel();

        thread::Builder::new()
            .name("console-reader".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    match line {
                        Ok(line) => {
                            if !sender.send(line) {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::error!("Console read failed: {}", e);
                            break;
                        }
                    }
                }
                tracing::debug!("Console reader finished");
            })?;

        Ok(bridge)
    }

    /// Bridge the process's standard input
    pub fn stdin() -> Result<ConsoleBridge> {
        Self::spawn_reader(std::io::BufReader::new(std::io::stdin()))
    }

    /// Next forwarded line, `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.receiver.recv().await
    }
}
