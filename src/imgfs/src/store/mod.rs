//! The on-disk store format and its in-memory mirror: header, metadata
//! table, and append-only payload region (spec.md §3, §4.1).

mod header;
mod metadata;

pub use header::{Header, HEADER_SIZE, STORE_NAME};
pub use metadata::{MetadataRecord, Resolution, Validity, MAX_IMG_ID, METADATA_SIZE};

use crate::error::{ImgFsError, Result};
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Owns the open file handle and the metadata table; the exclusive handle
/// through which every operation reads or writes the store (spec.md §3
/// "Ownership", §4.1 "Contract").
pub struct Store {
    file: File,
    pub header: Header,
    pub metadata: Vec<MetadataRecord>,
}

impl Store {
    /// Stamps a fresh file with a header and `max_files` zeroed metadata
    /// records (spec.md §4.2.7 `create`).
    pub fn create<P: AsRef<Path>>(path: P, header: Header) -> Result<Store> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let max_files = header.max_files as usize;
        let mut metadata = Vec::new();
        metadata
            .try_reserve_exact(max_files)
            .map_err(|_| ImgFsError::OutOfMemory)?;
        metadata.resize_with(max_files, MetadataRecord::empty);

        header.write_to(&mut file)?;
        for record in &metadata {
            record.write_to(&mut file)?;
        }
        file.flush()?;

        info!(
            "created imgFS store: max_files={}, thumb={:?}, small={:?}",
            header.max_files,
            header.thumb_res(),
            header.small_res()
        );

        Ok(Store {
            file,
            header,
            metadata,
        })
    }

    /// Opens an existing store file, reading the header and the full
    /// metadata table (spec.md §4.1 `open`).
    pub fn open<P: AsRef<Path>>(path: P, writable: bool) -> Result<Store> {
        let mut file = OpenOptions::new().read(true).write(writable).open(path)?;

        let header = Header::read_from(&mut file)?;

        let max_files = header.max_files as usize;
        let mut metadata = Vec::new();
        metadata
            .try_reserve_exact(max_files)
            .map_err(|_| ImgFsError::OutOfMemory)?;
        for _ in 0..max_files {
            metadata.push(MetadataRecord::read_from(&mut file)?);
        }

        info!(
            "opened imgFS store: {} files, {}/{} slots used",
            header.name, header.nb_files, header.max_files
        );

        Ok(Store {
            file,
            header,
            metadata,
        })
    }

    fn metadata_offset(index: usize) -> u64 {
        (HEADER_SIZE + index * METADATA_SIZE) as u64
    }

    /// Persists the in-memory header to its fixed offset at the start of
    /// the file.
    pub fn write_header(&mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.header.write_to(&mut self.file)?;
        self.file.flush()?;
        Ok(())
    }

    /// Persists a single in-memory metadata record to its fixed slot
    /// offset.
    pub fn write_metadata(&mut self, index: usize) -> Result<()> {
        self.file.seek(SeekFrom::Start(Self::metadata_offset(index)))?;
        self.metadata[index].write_to(&mut self.file)?;
        self.file.flush()?;
        Ok(())
    }

    /// Appends `bytes` to the end of the payload region and returns the
    /// offset at which they were written.
    pub fn append_payload(&mut self, bytes: &[u8]) -> Result<u64> {
        let offset = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(bytes)?;
        self.file.flush()?;
        debug!("appended {} bytes at offset {}", bytes.len(), offset);
        Ok(offset)
    }

    /// Random-access read of `size` bytes starting at `offset`.
    pub fn read_payload(&mut self, offset: u64, size: u32) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; size as usize];
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Locates the unique valid slot with a matching `img_id`, scanning
    /// only as far as needed to account for every valid slot (spec.md
    /// §4.2.3, §4.2.6).
    pub fn find_by_id(&self, img_id: &str) -> Option<usize> {
        let mut seen = 0u32;
        for (i, record) in self.metadata.iter().enumerate() {
            if seen >= self.header.nb_files {
                break;
            }
            if record.is_valid() {
                seen += 1;
                if record.img_id == img_id {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Finds the first `EMPTY` slot, scanning the full `max_files` range
    /// (spec.md §4.2.2 step 2).
    pub fn find_empty_slot(&self) -> Option<usize> {
        self.metadata.iter().position(|record| !record.is_valid())
    }

    /// Flushes and releases the file and metadata table. Idempotent and
    /// infallible by construction: ownership is simply dropped, which
    /// `Drop` below already does for every other exit path.
    pub fn close(self) {}
}

impl Drop for Store {
    fn drop(&mut self) {
        let _ = self.file.flush();
    }
}
