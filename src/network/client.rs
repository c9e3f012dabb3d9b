//! UDP Client
//!
//! Synchronous send-and-wait exchange with the server.

use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use crate::config::Config;
use crate::error::{DbError, Result};
use crate::protocol::{decode_response, encode_request, Request, Response};

/// Anything that can carry one request and bring back its response
pub trait Transport {
    fn send_and_receive(&mut self, request: &Request) -> Result<Response>;
}

/// Datagram client with a fixed response timeout
///
/// The socket is connected to the server, so datagrams from other peers are
/// filtered by the OS. There is no request id in the envelope: keep a single
/// request in flight, and expect a reply that arrives after a timeout to be
/// read as the answer to the next request.
pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    timeout_ms: u64,
    buffer: Vec<u8>,
}

impl Client {
    /// Open a socket aimed at `config.listen_addr`
    pub fn connect(config: &Config) -> Result<Self> {
        let server_addr = config
            .listen_addr
            .to_socket_addrs()
            .map_err(|e| DbError::Config(format!("Invalid server address {}: {}", config.listen_addr, e)))?
            .next()
            .ok_or_else(|| DbError::Config(format!("No address for {}", config.listen_addr)))?;

        let bind_addr = if server_addr.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(server_addr)?;
        if config.response_timeout_ms > 0 {
            socket.set_read_timeout(Some(Duration::from_millis(config.response_timeout_ms)))?;
        }

        Ok(Self {
            socket,
            server_addr,
            timeout_ms: config.response_timeout_ms,
            buffer: vec![0u8; config.datagram_size],
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }
}

impl Transport for Client {
    fn send_and_receive(&mut self, request: &Request) -> Result<Response> {
        let bytes = encode_request(request)?;

        self.socket
            .send(&bytes)
            .map_err(|e| DbError::Network(format!("Failed to send request: {}", e)))?;
        tracing::debug!(
            "-> {} ({} bytes) sent to {}",
            request.command_type.tag(),
            bytes.len(),
            self.server_addr
        );

        let len = match self.socket.recv(&mut self.buffer) {
            Ok(len) => len,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(DbError::Timeout(self.timeout_ms));
            }
            Err(e) => {
                return Err(DbError::Network(format!("Failed to receive response: {}", e)));
            }
        };

        let response = decode_response(&self.buffer[..len])?;
        tracing::debug!("<- response received ({} bytes)", len);
        Ok(response)
    }
}
