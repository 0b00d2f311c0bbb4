//! Single-pass serializer: a thin layer of primitive `write` calls plus a
//! string-interning map, driven by a [`crate::builder::Builder`] or by a
//! caller following the block-order driver contract directly.

use std::collections::HashMap;
use std::io::{Seek, SeekFrom, Write};

use byteorder::{LE, WriteBytesExt};

use crate::format::{HEADER_SIZE, MAGIC, N_BLOCKS};

/// Wraps a byte sink and tracks the running write position itself, since the
/// sink is only required to support `Write + Seek` — it does not report its
/// own position the way the codec's internal offset bookkeeping needs.
pub struct Writer<W> {
    sink: W,
    off: u32,
    strings: HashMap<Vec<u8>, u32>,
}

impl<W: Write + Seek> Writer<W> {
    pub fn new(sink: W) -> Self {
        Writer {
            sink,
            off: 0,
            strings: HashMap::new(),
        }
    }

    /// Current byte position. The driver uses this to populate
    /// `Header.offsets` as each block boundary is reached.
    pub fn offset(&self) -> u32 {
        self.off
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Appends raw bytes verbatim, with no interpretation. Used for the
    /// magic and for string-pool contents.
    pub fn raw_string(&mut self, s: &[u8]) -> std::io::Result<()> {
        self.bytes(s)
    }

    pub fn bytes(&mut self, b: &[u8]) -> std::io::Result<()> {
        self.sink.write_all(b)?;
        self.off += b.len() as u32;
        Ok(())
    }

    pub fn write_byte(&mut self, x: u8) -> std::io::Result<()> {
        self.u8(x)
    }

    pub fn u8(&mut self, x: u8) -> std::io::Result<()> {
        self.sink.write_u8(x)?;
        self.off += 1;
        Ok(())
    }

    pub fn u16(&mut self, x: u16) -> std::io::Result<()> {
        self.sink.write_u16::<LE>(x)?;
        self.off += 2;
        Ok(())
    }

    pub fn u32(&mut self, x: u32) -> std::io::Result<()> {
        self.sink.write_u32::<LE>(x)?;
        self.off += 4;
        Ok(())
    }

    pub fn u64(&mut self, x: u64) -> std::io::Result<()> {
        self.sink.write_u64::<LE>(x)?;
        self.off += 8;
        Ok(())
    }

    pub fn i32(&mut self, x: i32) -> std::io::Result<()> {
        self.sink.write_i32::<LE>(x)?;
        self.off += 4;
        Ok(())
    }

    pub fn i64(&mut self, x: i64) -> std::io::Result<()> {
        self.sink.write_i64::<LE>(x)?;
        self.off += 8;
        Ok(())
    }

    /// Writes `len(magic) + 4 + 4*N_BLOCKS` zero bytes so the string pool
    /// begins at a known offset; the real header is stamped in later by
    /// [`Writer::patch_header`] once every block boundary is known.
    pub fn reserve_header(&mut self) -> std::io::Result<()> {
        self.bytes(&vec![0u8; HEADER_SIZE as usize])
    }

    /// Idempotent: records `strings[s] = off` and appends `s`'s bytes the
    /// first time it is seen; a later call with the same content is a no-op.
    pub fn add_string(&mut self, s: &[u8]) -> std::io::Result<()> {
        if self.strings.contains_key(s) {
            return Ok(());
        }
        let off = self.off;
        self.strings.insert(s.to_vec(), off);
        self.raw_string(s)
    }

    /// Writes a string-ref (`len`, `off`) pointing at a previously interned
    /// string. Calling this on a string that was never `add_string`-ed is a
    /// contract violation, not a data error: it panics identifying the
    /// offending string.
    pub fn string_ref(&mut self, s: &[u8]) -> std::io::Result<()> {
        let off = *self
            .strings
            .get(s)
            .unwrap_or_else(|| panic!("string_ref: {s:?} was never add_string-ed"));
        self.u32(s.len() as u32)?;
        self.u32(off)
    }

    /// Seeks to file start and overwrites the header with the magic, the
    /// flag word, and the captured per-block offsets, then restores the
    /// write cursor. `offsets` must have exactly `N_BLOCKS` entries, one
    /// absolute byte position per block in `BLOCK_ORDER`.
    pub fn patch_header(&mut self, flags: u32, offsets: &[u32; N_BLOCKS]) -> std::io::Result<()> {
        let resume_at = self.off;
        self.sink.seek(SeekFrom::Start(0))?;
        self.sink.write_all(&MAGIC)?;
        self.sink.write_u32::<LE>(flags)?;
        for o in offsets {
            self.sink.write_u32::<LE>(*o)?;
        }
        self.sink.seek(SeekFrom::Start(resume_at as u64))?;
        tracing::trace!(flags, ?offsets, "patched object header");
        Ok(())
    }
}
