//! Store Module
//!
//! The in-memory collection and its durable file.
//!
//! ## Responsibilities
//! - Keep persons unique and sorted by id
//! - Assign ids and creation dates
//! - Answer the query commands
//! - Load the collection at startup, save it on demand and at shutdown
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ Header (18 bytes)                                      │
//! │   Magic: "PDBC" (4) | Version: u16 (2) | Count: u64 (8) │
//! │   BodyCRC: u32 (4)                                      │
//! ├────────────────────────────────────────────────────────┤
//! │ Body (variable)                                        │
//! │   bincode Vec<Person>, ascending by id                 │
//! └────────────────────────────────────────────────────────┘
//! ```

mod collection;
mod file;

pub use collection::{PersonStore, StoreInfo};
pub use file::CollectionFile;

// =============================================================================
// Shared Constants
// =============================================================================

/// Magic bytes identifying a collection file
pub(crate) const MAGIC: &[u8; 4] = b"PDBC";

/// Current collection file format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + Count (8) + CRC (4) = 18 bytes
pub(crate) const HEADER_SIZE: usize = 18;
