// ZIP archive adapter - Bundles named buffers with the zip crate

use std::collections::HashMap;
use std::io::{Cursor, Write};

use async_trait::async_trait;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::adapters::toml_config::Compression;
use crate::domain::errors::*;
use crate::domain::model::ArchiveBlob;
use crate::ports::*;

/// ZIP archiver adapter
pub struct ZipArchiver {
    compression: Compression,
}

impl ZipArchiver {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }
}

impl ArchiverPort for ZipArchiver {
    fn create(&self) -> Box<dyn ArchiveSession> {
        Box::new(ZipSession {
            compression: self.compression,
            entries: Vec::new(),
            positions: HashMap::new(),
        })
    }
}

/// Entries staged for one ZIP archive, in insertion order
pub struct ZipSession {
    compression: Compression,
    entries: Vec<(String, Vec<u8>)>,
    /// Index into `entries` by name
    positions: HashMap<String, usize>,
}

impl ZipSession {
    fn method(&self) -> CompressionMethod {
        match self.compression {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

fn write_archive(
    entries: Vec<(String, Vec<u8>)>,
    method: CompressionMethod,
) -> Result<ArchiveBlob, DomainError> {
    let entry_count = entries.len();
    let options = SimpleFileOptions::default().compression_method(method);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, data) in entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| DomainError::Archive(format!("Failed to add {}: {}", name, e)))?;
        writer
            .write_all(&data)
            .map_err(|e| DomainError::Archive(format!("Failed to write {}: {}", name, e)))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| DomainError::Archive(format!("Failed to finalize archive: {}", e)))?;

    Ok(ArchiveBlob {
        bytes: cursor.into_inner(),
        entry_count,
    })
}

#[async_trait]
impl ArchiveSession for ZipSession {
    fn file(&mut self, name: &str, data: Vec<u8>) {
        match self.positions.get(name) {
            Some(&index) => self.entries[index].1 = data,
            None => {
                self.positions.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), data));
            }
        }
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Consumes the staged entries; the session is empty afterwards
    async fn generate(&mut self) -> Result<ArchiveBlob, DomainError> {
        let method = self.method();
        let entries = std::mem::take(&mut self.entries);
        self.positions.clear();

        tokio::task::spawn_blocking(move || write_archive(entries, method))
            .await
            .map_err(|e| DomainError::Archive(format!("Archive task failed: {}", e)))?
    }
}
