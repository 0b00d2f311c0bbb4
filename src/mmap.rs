//! Feature-gated convenience: memory-map a file and hand the mapping to
//! [`Reader::new`](crate::reader::Reader::new). The memory-mapping layer
//! itself is the out-of-scope external collaborator the format spec calls
//! out; this module is just the glue that owns the mapping long enough for
//! a `Reader` to borrow out of it.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::Result;
use crate::reader::Reader;

/// Owns a read-only memory map and lends out zero-copy [`Reader`]s over it.
pub struct MappedObject {
    mmap: Mmap,
}

impl MappedObject {
    /// Opens and maps `path`, validating the header eagerly so a bad magic
    /// is reported at open time rather than on first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the caller is responsible for the file not being
        // truncated or rewritten by another process while this mapping is
        // alive, the usual caveat of file-backed memory maps.
        let mmap = unsafe { Mmap::map(&file)? };
        Reader::new(&mmap)?;
        Ok(MappedObject { mmap })
    }

    /// Borrows a fresh [`Reader`] over the mapping. Cheap: it re-parses only
    /// the fixed 64-byte header.
    pub fn reader(&self) -> Reader<'_> {
        Reader::new(&self.mmap).expect("validated at open")
    }
}
