//! Collection File
//!
//! Durable copy of the collection, rewritten as a whole on every save.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{DbError, Result};
use crate::model::Person;

use super::{HEADER_SIZE, MAGIC, VERSION};

/// Reads and writes the collection file
///
/// `save` writes to a sibling temp file, fsyncs it and renames it over the
/// target, so a crash mid-save leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct CollectionFile {
    path: PathBuf,
}

impl CollectionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored person.
    ///
    /// A missing or empty file yields an empty collection. Anything else that
    /// does not parse is an error; the caller decides whether to fall back.
    pub fn load(&self) -> Result<Vec<Person>> {
        if !self.path.exists() {
            tracing::info!(
                "Collection file {} not found, starting with an empty collection",
                self.path.display()
            );
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        if bytes.is_empty() {
            tracing::info!(
                "Collection file {} is empty, starting with an empty collection",
                self.path.display()
            );
            return Ok(Vec::new());
        }

        let persons = Self::decode(&bytes)?;
        tracing::info!(
            "Loaded {} persons from {}",
            persons.len(),
            self.path.display()
        );
        Ok(persons)
    }

    /// Overwrite the file with `persons`
    pub fn save<'a>(&self, persons: impl IntoIterator<Item = &'a Person>) -> Result<()> {
        let persons: Vec<&Person> = persons.into_iter().collect();
        let bytes = Self::encode(&persons)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!("Saved {} persons to {}", persons.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    // =========================================================================
    // Format
    // =========================================================================

    fn encode(persons: &[&Person]) -> Result<Vec<u8>> {
        let body = bincode::serialize(persons)?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + body.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&(persons.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    fn decode(bytes: &[u8]) -> Result<Vec<Person>> {
        if bytes.len() < HEADER_SIZE {
            return Err(DbError::Storage(format!(
                "Collection file truncated: {} bytes, header needs {}",
                bytes.len(),
                HEADER_SIZE
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(DbError::Storage(format!(
                "Invalid collection file magic: expected PDBC, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(DbError::Storage(format!(
                "Unsupported collection file version: {}",
                version
            )));
        }

        let mut count_bytes = [0u8; 8];
        count_bytes.copy_from_slice(&bytes[6..14]);
        let count = u64::from_le_bytes(count_bytes);

        let expected_crc = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);
        let body = &bytes[HEADER_SIZE..];
        let actual_crc = crc32fast::hash(body);
        if actual_crc != expected_crc {
            return Err(DbError::Storage(format!(
                "Collection file checksum mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            )));
        }

        let persons: Vec<Person> = bincode::deserialize(body)?;
        if persons.len() as u64 != count {
            return Err(DbError::Storage(format!(
                "Collection file count mismatch: header says {}, body has {}",
                count,
                persons.len()
            )));
        }

        Ok(persons)
    }
}
