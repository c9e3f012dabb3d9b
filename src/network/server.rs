//! UDP Server
//!
//! Single-threaded event loop over the datagram socket and the operator
//! console.
//!
//! ## States
//! ```text
//!   Listening ──event──▶ Dispatching ──done──▶ Listening
//!       │
//!       └── exit / shutdown / Ctrl+C / SIGTERM ──▶ Stopped
//! ```
//!
//! Every request is received, dispatched and answered before the next event
//! is drawn, so store operations are serialized in wake-up order.

use std::net::{SocketAddr, UdpSocket as StdUdpSocket};
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::{watch, Notify};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{DbError, Result};
use crate::protocol::{decode_request, encode_response, Response};
use crate::store::{CollectionFile, PersonStore};

use super::ConsoleBridge;

/// Event loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Listening,
    Dispatching,
    Stopped,
}

/// Observes and stops a running server from another thread
#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Arc<Notify>,
    state: watch::Receiver<LoopState>,
}

impl ServerHandle {
    /// Wake the loop and make it stop
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Latest state published by the loop
    pub fn state(&self) -> LoopState {
        *self.state.borrow()
    }
}

/// UDP server for PersonDB
pub struct Server {
    config: Config,

    /// Bound at construction so the address is known before `run`
    socket: StdUdpSocket,

    /// Owns the collection store
    dispatcher: Dispatcher,

    /// Where the collection is persisted
    file: CollectionFile,

    shutdown: Arc<Notify>,

    /// Published so handles can follow the loop
    state: watch::Sender<LoopState>,

    /// Set once `run` starts; cleared by the final save
    final_save_pending: bool,
}

impl Server {
    /// Bind the socket described by `config`
    pub fn bind(config: Config, store: PersonStore, file: CollectionFile) -> Result<Self> {
        let socket = StdUdpSocket::bind(&config.listen_addr).map_err(|e| {
            DbError::Network(format!("Failed to bind {}: {}", config.listen_addr, e))
        })?;
        socket.set_nonblocking(true)?;

        tracing::info!("Listening on {}", socket.local_addr()?);

        Ok(Self {
            config,
            socket,
            dispatcher: Dispatcher::new(store),
            file,
            shutdown: Arc::new(Notify::new()),
            state: watch::channel(LoopState::Listening).0,
            final_save_pending: false,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: Arc::clone(&self.shutdown),
            state: self.state.subscribe(),
        }
    }

    fn state(&self) -> LoopState {
        *self.state.borrow()
    }

    fn set_state(&self, state: LoopState) {
        self.state.send_replace(state);
    }

    pub fn store(&self) -> &PersonStore {
        self.dispatcher.store()
    }

    /// Run the loop until stopped, then save the collection
    pub fn run(mut self, console: Option<ConsoleBridge>) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        self.final_save_pending = true;
        let result = runtime.block_on(self.serve(console));

        self.set_state(LoopState::Stopped);
        self.final_save();
        result
    }

    /// Persist the collection now
    pub fn save(&self) -> Result<()> {
        self.file.save(self.dispatcher.store().persons())
    }

    async fn serve(&mut self, mut console: Option<ConsoleBridge>) -> Result<()> {
        let socket = UdpSocket::from_std(self.socket.try_clone()?)?;
        let mut buf = vec![0u8; self.config.datagram_size];

        let shutdown = Arc::clone(&self.shutdown);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut ctrl_c_armed = true;
        let mut terminate = Terminate::install();

        self.set_state(LoopState::Listening);

        while self.state() != LoopState::Stopped {
            tokio::select! {
                received = socket.recv_from(&mut buf) => {
                    self.set_state(LoopState::Dispatching);
                    match received {
                        Ok((len, peer)) => self.handle_datagram(&socket, &buf[..len], peer).await,
                        Err(e) => tracing::warn!("Failed to receive datagram: {}", e),
                    }
                }
                line = next_console_line(&mut console) => {
                    self.set_state(LoopState::Dispatching);
                    match line {
                        Some(bytes) => self.handle_console(&bytes),
                        None => {
                            tracing::info!("Console input closed, serving network only");
                            console = None;
                        }
                    }
                }
                _ = shutdown.notified() => {
                    tracing::info!("Shutdown requested");
                    self.set_state(LoopState::Stopped);
                }
                _ = terminate.recv() => {
                    tracing::info!("Received SIGTERM, initiating shutdown...");
                    self.set_state(LoopState::Stopped);
                }
                signal = &mut ctrl_c, if ctrl_c_armed => {
                    match signal {
                        Ok(()) => {
                            tracing::info!("Received Ctrl+C, initiating shutdown...");
                            self.set_state(LoopState::Stopped);
                        }
                        Err(e) => {
                            tracing::warn!("Ctrl+C handler unavailable: {}", e);
                            ctrl_c_armed = false;
                        }
                    }
                }
            }

            if self.state() == LoopState::Dispatching {
                self.set_state(LoopState::Listening);
            }
        }

        Ok(())
    }

    /// Decode, dispatch and answer one datagram
    async fn handle_datagram(&mut self, socket: &UdpSocket, datagram: &[u8], peer: SocketAddr) {
        let response = match decode_request(datagram) {
            Ok(request) => {
                tracing::debug!("Request {} from {}", request.command_type.tag(), peer);
                self.dispatcher.execute(request)
            }
            Err(e) => {
                tracing::warn!("Rejected datagram from {}: {}", peer, e);
                Response::error(format!("Invalid request format: {}", e))
            }
        };

        let bytes = match encode_response(&response) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Response for {} could not be encoded: {}", peer, e);
                let fallback = Response::error(format!("Response could not be sent: {}", e));
                match encode_response(&fallback) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::error!("Dropping response for {}: {}", peer, e);
                        return;
                    }
                }
            }
        };

        match socket.send_to(&bytes, peer).await {
            Ok(_) => tracing::trace!("Sent {} bytes to {}", bytes.len(), peer),
            Err(e) => tracing::warn!("Failed to send response to {}: {}", peer, e),
        }
    }

    /// Execute one operator command
    fn handle_console(&mut self, bytes: &[u8]) {
        let line = String::from_utf8_lossy(bytes);
        let command = line.trim().to_lowercase();

        match command.as_str() {
            "" => {}
            "save" => {
                println!("Saving the collection...");
                match self.save() {
                    Ok(()) => {
                        tracing::info!("Collection saved to {}", self.file.path().display());
                        println!("Collection saved.");
                    }
                    Err(e) => {
                        tracing::error!("Failed to save collection: {}", e);
                        println!("Failed to save the collection: {}", e);
                    }
                }
            }
            "exit" => {
                println!("Shutting down the server...");
                self.set_state(LoopState::Stopped);
            }
            other => {
                tracing::debug!("Unknown console command: {}", other);
                println!("Unknown server command. Available: 'save', 'exit'.");
            }
        }
    }

    /// Save once on the way out, whatever stopped the loop
    fn final_save(&mut self) {
        if !self.final_save_pending {
            return;
        }
        self.final_save_pending = false;

        match self.save() {
            Ok(()) => tracing::info!(
                "Final save: {} persons written to {}",
                self.dispatcher.store().len(),
                self.file.path().display()
            ),
            Err(e) => tracing::error!("Final save failed: {}", e),
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.final_save();
    }
}

async fn next_console_line(console: &mut Option<ConsoleBridge>) -> Option<Vec<u8>> {
    match console {
        Some(bridge) => bridge.recv().await,
        None => std::future::pending().await,
    }
}

/// SIGTERM listener; never fires where the platform has no such signal
#[cfg(unix)]
struct Terminate(Option<tokio::signal::unix::Signal>);

#[cfg(unix)]
impl Terminate {
    fn install() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(stream) => Terminate(Some(stream)),
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                Terminate(None)
            }
        }
    }

    async fn recv(&mut self) {
        match &mut self.0 {
            Some(stream) => {
                if stream.recv().await.is_none() {
                    self.0 = None;
                    std::future::pending::<()>().await;
                }
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(not(unix))]
struct Terminate;

#[cfg(not(unix))]
impl Terminate {
    fn install() -> Self {
        Terminate
    }

    async fn recv(&mut self) {
        std::future::pending().await
    }
}
