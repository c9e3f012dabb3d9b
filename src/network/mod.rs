//! Network Module
//!
//! UDP server event loop, operator console bridge and client transport.
//!
//! ## Architecture
//! - One thread runs the server loop and owns the store
//! - One helper thread reads the operator console and forwards lines
//! - Clients do a blocking round trip per command with a timeout

mod client;
mod console;
mod server;

pub use client::{Client, Transport};
pub use console::{ConsoleBridge, ConsoleSender};
pub use server::{LoopState, Server, ServerHandle};
