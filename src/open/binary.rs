//! Binary resource handles.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Error, Result};
use crate::resource::ResolvedPath;

/// An open resource read as raw bytes.
///
/// Owns the [`ResolvedPath`] it was opened from, so an archive extraction
/// stays on disk until the handle is dropped.
#[derive(Debug)]
pub struct BinaryFile {
    reader: BufReader<File>,
    resolved: ResolvedPath,
}

impl BinaryFile {
    pub(crate) fn new(file: File, resolved: ResolvedPath, capacity: Option<usize>) -> Self {
        let reader = match capacity {
            Some(capacity) => BufReader::with_capacity(capacity, file),
            None => BufReader::new(file),
        };
        Self { reader, resolved }
    }

    /// Path of the opened file.
    pub fn path(&self) -> &Path {
        self.resolved.path()
    }

    /// Read everything that remains.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.reader
            .read_to_end(&mut buf)
            .map_err(|e| Error::io(self.resolved.path(), e))?;
        Ok(buf)
    }

    /// Close the file, keeping the resolved path.
    pub fn into_resolved(self) -> ResolvedPath {
        self.resolved
    }
}

impl Read for BinaryFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for BinaryFile {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
    }
}

impl Seek for BinaryFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}
