use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::Mmap;

use crate::error::Result;

/// Somewhere an image can be read from, any number of times.
///
/// Each call to [`ImageSource::open_handle`] yields a fresh handle positioned
/// at the start of the image, so the bounds probe and the region decoder
/// never share a read position.
pub trait ImageSource {
    fn open_handle(&self) -> Result<SourceHandle>;

    /// Short human-readable name used in log records.
    fn describe(&self) -> String;
}

#[derive(Clone)]
enum SharedBytes {
    Mapped(Arc<Mmap>),
    Owned(Arc<[u8]>),
}

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        match self {
            SharedBytes::Mapped(map) => map,
            SharedBytes::Owned(bytes) => bytes,
        }
    }
}

/// Independent seekable reader over a source's bytes.
pub struct SourceHandle {
    cursor: Cursor<SharedBytes>,
}

impl SourceHandle {
    fn new(bytes: SharedBytes) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    /// Total length of the underlying image data.
    pub fn len(&self) -> u64 {
        self.cursor.get_ref().as_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Read for SourceHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for SourceHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

/// Memory-mapped image file. Pages are only faulted in for the rows a
/// decode actually touches.
pub struct FileSource {
    path: PathBuf,
    map: Arc<Mmap>,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // The mapping is read-only and the viewer never writes through it.
        let map = unsafe { Mmap::map(&file)? };
        Ok(Self {
            path: path.to_path_buf(),
            map: Arc::new(map),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileSource {
    fn open_handle(&self) -> Result<SourceHandle> {
        Ok(SourceHandle::new(SharedBytes::Mapped(Arc::clone(&self.map))))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Image bytes already held in memory, shared between handles.
#[derive(Clone)]
pub struct MemorySource {
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Drain a host-supplied stream into a shareable source.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::new(bytes))
    }
}

impl ImageSource for MemorySource {
    fn open_handle(&self) -> Result<SourceHandle> {
        Ok(SourceHandle::new(SharedBytes::Owned(Arc::clone(&self.bytes))))
    }

    fn describe(&self) -> String {
        format!("<memory, {} bytes>", self.bytes.len())
    }
}
