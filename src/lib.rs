//! # PersonDB
//!
//! A shared, server-resident collection of `Person` records with:
//! - A datagram (UDP) request/response protocol, one message per datagram
//! - A single-threaded event loop multiplexing the socket and an operator console
//! - A fixed command set dispatched against an in-memory sorted store
//! - A checksummed collection file saved on demand and at shutdown
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐   datagram    ┌─────────────────────────────────────────┐
//! │    Client    │ ────────────▶ │            Server Event Loop            │
//! │  (Session)   │ ◀──────────── │  socket ─┐                  ┌─ console  │
//! └──────────────┘   datagram    │          ▼                  ▼  bridge   │
//!                                │     ┌──────────┐      ┌──────────┐      │
//!                                │     │Dispatcher│      │save/exit │      │
//!                                │     └────┬─────┘      └────┬─────┘      │
//!                                └──────────┼─────────────────┼────────────┘
//!                                           ▼                 ▼
//!                                    ┌─────────────┐   ┌──────────────┐
//!                                    │ PersonStore │──▶│CollectionFile│
//!                                    │  (BTreeMap) │   │   (on disk)  │
//!                                    └─────────────┘   └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod protocol;
pub mod store;
pub mod dispatcher;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DbError, Result};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use store::{CollectionFile, PersonStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of PersonDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
