//! Configuration for PersonDB
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::protocol::MAX_DATAGRAM_SIZE;

/// Main configuration shared by the server and the client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Collection file loaded at startup and written on `save` / shutdown
    pub data_file: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// UDP listen address (server) or target address (client)
    pub listen_addr: String,

    /// Size of the receive buffer; one datagram never exceeds it
    pub datagram_size: usize,

    /// How long the client waits for a reply (milliseconds)
    pub response_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("./persons.db"),
            listen_addr: "127.0.0.1:5555".to_string(),
            datagram_size: MAX_DATAGRAM_SIZE,
            response_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the collection file path
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set the UDP address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the receive buffer size (capped at the protocol maximum)
    pub fn datagram_size(mut self, size: usize) -> Self {
        self.config.datagram_size = size.min(MAX_DATAGRAM_SIZE);
        self
    }

    /// Set the client response timeout (in milliseconds)
    pub fn response_timeout_ms(mut self, ms: u64) -> Self {
        self.config.response_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
