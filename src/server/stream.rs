//! Byte streams used as response bodies.
//!
//! A [`Stream`] is a small read/write/seek abstraction over an underlying
//! resource. Three implementations are provided:
//!
//! - [`MemoryStream`] - an in-memory buffer, the default response body
//! - [`FileStream`] - a wrapper around an open [`std::fs::File`]
//! - [`NullStream`] - always empty, discards writes; used to strip bodies
//!   from `HEAD` responses
//!
//! I/O failures are surfaced as [`std::io::Error`] exactly as the underlying
//! resource reports them.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Descriptive metadata about a stream's underlying resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMetadata {
    /// Resource kind (`memory`, `file`, `null`)
    pub kind: &'static str,
    /// Location of the resource, if it has one
    pub uri: Option<PathBuf>,
    pub readable: bool,
    pub writable: bool,
    pub seekable: bool,
}

/// Read/write/seek access to a body resource.
pub trait Stream: Send + fmt::Debug {
    /// Read up to `len` bytes from the current position.
    fn read(&mut self, len: usize) -> io::Result<Vec<u8>>;

    /// Write `data` at the current position, returning the bytes written.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;

    fn rewind(&mut self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    fn tell(&mut self) -> io::Result<u64>;

    fn eof(&mut self) -> bool;

    /// Total size in bytes, `None` when the resource cannot tell.
    fn size(&self) -> Option<u64>;

    fn is_readable(&self) -> bool;

    fn is_writable(&self) -> bool;

    fn is_seekable(&self) -> bool;

    fn metadata(&self) -> StreamMetadata;

    /// Everything from the current position to the end.
    fn contents(&mut self) -> io::Result<Vec<u8>>;
}

/// In-memory body.
#[derive(Debug, Default, Clone)]
pub struct MemoryStream {
    inner: Cursor<Vec<u8>>,
}

impl MemoryStream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing bytes; the position starts at the beginning.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Cursor::new(bytes.into()),
        }
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl Stream for MemoryStream {
    fn read(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0; len];
        let n = Read::read(&mut self.inner, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        Write::write(&mut self.inner, data)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(&mut self.inner, pos)
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.inner.position())
    }

    fn eof(&mut self) -> bool {
        self.inner.position() >= self.inner.get_ref().len() as u64
    }

    fn size(&self) -> Option<u64> {
        Some(self.inner.get_ref().len() as u64)
    }

    fn is_readable(&self) -> bool {
        true
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn is_seekable(&self) -> bool {
        true
    }

    fn metadata(&self) -> StreamMetadata {
        StreamMetadata {
            kind: "memory",
            uri: None,
            readable: true,
            writable: true,
            seekable: true,
        }
    }

    fn contents(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        Read::read_to_end(&mut self.inner, &mut out)?;
        Ok(out)
    }
}

/// Body backed by a file on disk.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    path: PathBuf,
    readable: bool,
    writable: bool,
}

impl FileStream {
    /// Open an existing file read-only.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self {
            file,
            path,
            readable: true,
            writable: false,
        })
    }

    /// Create (or truncate) a file for reading and writing.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            file,
            path,
            readable: true,
            writable: true,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Stream for FileStream {
    fn read(&mut self, len: usize) -> io::Result<Vec<u8>> {
        if !self.readable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream is not readable",
            ));
        }
        let mut buf = Vec::with_capacity(len);
        Read::by_ref(&mut self.file)
            .take(len as u64)
            .read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if !self.writable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream is not writable",
            ));
        }
        Write::write(&mut self.file, data)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(&mut self.file, pos)
    }

    fn tell(&mut self) -> io::Result<u64> {
        self.file.stream_position()
    }

    fn eof(&mut self) -> bool {
        match (self.file.stream_position(), self.size()) {
            (Ok(pos), Some(size)) => pos >= size,
            _ => true,
        }
    }

    fn size(&self) -> Option<u64> {
        self.file.metadata().ok().map(|m| m.len())
    }

    fn is_readable(&self) -> bool {
        self.readable
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn is_seekable(&self) -> bool {
        true
    }

    fn metadata(&self) -> StreamMetadata {
        StreamMetadata {
            kind: "file",
            uri: Some(self.path.clone()),
            readable: self.readable,
            writable: self.writable,
            seekable: true,
        }
    }

    fn contents(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.file.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// A stream with nothing in it.
///
/// Reports size 0 and eof, reads return no bytes and writes are discarded
/// (while reporting the full length as written).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStream;

impl Stream for NullStream {
    fn read(&mut self, _len: usize) -> io::Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        Ok(data.len())
    }

    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Ok(0)
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(0)
    }

    fn eof(&mut self) -> bool {
        true
    }

    fn size(&self) -> Option<u64> {
        Some(0)
    }

    fn is_readable(&self) -> bool {
        true
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn is_seekable(&self) -> bool {
        true
    }

    fn metadata(&self) -> StreamMetadata {
        StreamMetadata {
            kind: "null",
            uri: None,
            readable: true,
            writable: true,
            seekable: true,
        }
    }

    fn contents(&mut self) -> io::Result<Vec<u8>> {
        Ok(Vec::new())
    }
}
